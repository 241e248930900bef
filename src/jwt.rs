use std::sync::Arc;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::app::AppState;
use crate::authz::EvaluationContext;
use crate::errors::{AppError, AppResult};
use crate::models::project::UserProjectMembership;
use crate::models::rbac::OrgRole;

/// Upper bound for `JWT_EXP_HOURS`, one year.
const MAX_EXP_HOURS: i64 = 24 * 365;

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: Arc<Vec<u8>>,
    pub exp_hours: i64,
}

impl JwtConfig {
    pub fn from_env() -> AppResult<Self> {
        let secret = std::env::var("JWT_SECRET").map_err(|_| AppError::configuration("JWT_SECRET not set"))?;
        let exp_hours = parse_exp_hours(std::env::var("JWT_EXP_HOURS").ok().as_deref())?;

        Ok(Self::new(secret, exp_hours))
    }

    pub fn new(secret: impl Into<String>, exp_hours: i64) -> Self {
        Self {
            secret: Arc::new(secret.into().into_bytes()),
            exp_hours,
        }
    }

    /// Token for `user_id`, optionally scoped to a selected organization,
    /// carrying the user's project memberships in that organization.
    pub fn encode(
        &self,
        user_id: Uuid,
        org: Option<(Uuid, OrgRole)>,
        projects: &[UserProjectMembership],
    ) -> AppResult<String> {
        use chrono::{Duration, Utc};

        let now = Utc::now();
        let exp = Duration::try_hours(self.exp_hours)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| AppError::configuration(format!("token lifetime of {} hours is out of range", self.exp_hours)))?;

        let claims = Claims {
            sub: user_id,
            org_id: org.map(|(id, _)| id),
            org_role: org.map(|(_, role)| role.as_str().to_string()),
            projects: projects.to_vec(),
            exp: exp.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        jsonwebtoken::encode(&Header::default(), &claims, &EncodingKey::from_secret(&self.secret))
            .map_err(|err| AppError::token(err.to_string()))
    }

    pub fn decode(&self, token: &str) -> AppResult<Claims> {
        let mut validation = Validation::default();
        validation.validate_exp = true;

        jsonwebtoken::decode::<Claims>(token, &DecodingKey::from_secret(&self.secret), &validation)
            .map(|data| data.claims)
            .map_err(|err| AppError::token(err.to_string()))
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_id: Option<Uuid>,
    /// Raw role name; issuers may be ahead of this build's role list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_role: Option<String>,
    /// Project memberships, signed together with the org role.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub projects: Vec<UserProjectMembership>,
    pub exp: usize,
    pub iat: usize,
}

fn parse_exp_hours(raw: Option<&str>) -> AppResult<i64> {
    let hours = match raw {
        Some(val) => val
            .parse::<i64>()
            .map_err(|_| AppError::configuration("JWT_EXP_HOURS must be a valid integer"))?,
        None => 24,
    };

    if !(1..=MAX_EXP_HOURS).contains(&hours) {
        return Err(AppError::configuration(format!(
            "JWT_EXP_HOURS must be between 1 and {}",
            MAX_EXP_HOURS
        )));
    }

    Ok(hours)
}

/// Caller identity and roles, read once from the bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub org_id: Option<Uuid>,
    pub org_role: Option<OrgRole>,
    pub projects: Vec<UserProjectMembership>,
}

impl AuthUser {
    /// Context for one request. Both roles come from the same token; the
    /// caller only names which of its projects is active.
    pub fn context(&self, project_id: Option<Uuid>) -> EvaluationContext {
        let ctx = EvaluationContext {
            user_id: self.user_id,
            org_role: self.org_role,
            project_role: None,
        };

        match project_id {
            Some(project_id) => ctx.in_project(&self.projects, project_id),
            None => ctx,
        }
    }
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        let org_role = claims.org_role.as_deref().and_then(OrgRole::parse);
        if claims.org_role.is_some() && org_role.is_none() {
            tracing::warn!(user_id = %claims.sub, role = ?claims.org_role, "unrecognised org role in token, treating as none");
        }

        Self {
            user_id: claims.sub,
            org_id: claims.org_id,
            org_role,
            projects: claims.projects,
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| AppError::unauthorized("Authorization header missing"))?;

        let claims = state.jwt.decode(token)?;

        Ok(claims.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::rbac::{ProjectPermission, ProjectRole};

    fn membership(project_id: Uuid, role: &str) -> UserProjectMembership {
        UserProjectMembership {
            project_id,
            role: role.to_string(),
        }
    }

    #[test]
    fn org_scoped_token_round_trips_roles() {
        let jwt = JwtConfig::new("test-secret", 1);
        let user = Uuid::new_v4();
        let org = Uuid::new_v4();
        let project = Uuid::new_v4();

        let token = jwt
            .encode(user, Some((org, OrgRole::ProjAdmin)), &[membership(project, "project_manager")])
            .unwrap();
        let auth: AuthUser = jwt.decode(&token).unwrap().into();

        assert_eq!(auth.user_id, user);
        assert_eq!(auth.org_id, Some(org));
        assert_eq!(auth.org_role, Some(OrgRole::ProjAdmin));
        assert_eq!(auth.context(Some(project)).project_role, Some(ProjectRole::ProjectManager));
        assert_eq!(auth.context(None).project_role, None);
    }

    #[test]
    fn project_role_only_comes_from_signed_memberships() {
        let project = Uuid::new_v4();
        let claims = Claims {
            sub: Uuid::new_v4(),
            org_id: Some(Uuid::new_v4()),
            org_role: Some("member".to_string()),
            projects: vec![membership(project, "viewer")],
            exp: 0,
            iat: 0,
        };
        let auth = AuthUser::from(claims);

        let ctx = auth.context(Some(project));
        assert_eq!(ctx.project_role, Some(ProjectRole::Viewer));
        assert!(!ctx.has_project_permission(ProjectPermission::DeleteProject));
        assert_eq!(auth.context(Some(Uuid::new_v4())).project_role, None);
    }

    #[test]
    fn unknown_role_claim_becomes_none() {
        let project = Uuid::new_v4();
        let claims = Claims {
            sub: Uuid::new_v4(),
            org_id: None,
            org_role: Some("root".to_string()),
            projects: vec![membership(project, "overlord")],
            exp: 0,
            iat: 0,
        };
        let auth = AuthUser::from(claims);
        assert_eq!(auth.org_role, None);

        let ctx = auth.context(Some(project));
        assert_eq!(ctx.project_role, None);
        assert!(!ctx.is_admin());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = JwtConfig::new("one", 1).encode(Uuid::new_v4(), None, &[]).unwrap();
        assert!(matches!(JwtConfig::new("two", 1).decode(&token), Err(AppError::Token(_))));
    }

    #[test]
    fn exp_hours_are_range_checked() {
        assert_eq!(parse_exp_hours(None).unwrap(), 24);
        assert_eq!(parse_exp_hours(Some("48")).unwrap(), 48);
        assert!(matches!(parse_exp_hours(Some("soon")), Err(AppError::Configuration(_))));
        assert!(matches!(parse_exp_hours(Some("0")), Err(AppError::Configuration(_))));
        assert!(matches!(
            parse_exp_hours(Some("9223372036854775807")),
            Err(AppError::Configuration(_))
        ));
    }

    #[test]
    fn oversized_lifetime_is_an_error_not_a_panic() {
        let jwt = JwtConfig::new("test-secret", i64::MAX);
        assert!(matches!(
            jwt.encode(Uuid::new_v4(), None, &[]),
            Err(AppError::Configuration(_))
        ));
    }
}
