//! RBAC decision API
//!
//! Read-only view of the role tables plus decision endpoints for the caller
//! identified by the bearer token. Every decision is computed fresh from one
//! `EvaluationContext` built per request. Requests only name the active
//! project; the role in it comes from the token.

use axum::{
    extract::{Path, Query},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::app::AppState;
use crate::authz::{self, EvaluationContext, GateRequest, PermissionScope};
use crate::jwt::AuthUser;
use crate::models::project::ProjectListScope;
use crate::models::rbac::{
    EffectivePermissions, OrgPermission, OrgRole, ProjectPermission, ProjectRole,
};

// =============================================================================
// ROUTER
// =============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        // Registry
        .route("/roles", get(list_roles))
        .route("/org-roles/:role/permissions", get(get_org_role_permissions))
        .route("/project-roles/:role/permissions", get(get_project_role_permissions))
        // Caller
        .route("/me/permissions", get(get_my_permissions))
        .route("/me/has-permission", get(has_named_permission))
        // Decisions
        .route("/evaluate", post(evaluate))
        .route("/tasks/can-edit", post(can_edit_task))
        .route("/tasks/can-delete", post(can_delete_task))
}

// =============================================================================
// PAYLOADS
// =============================================================================

#[derive(Debug, Serialize, ToSchema)]
pub struct OrgRoleGrants {
    pub role: OrgRole,
    pub permissions: Vec<OrgPermission>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProjectRoleGrants {
    pub role: ProjectRole,
    pub permissions: Vec<ProjectPermission>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RoleTables {
    pub org_roles: Vec<OrgRoleGrants>,
    pub project_roles: Vec<ProjectRoleGrants>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ActiveProjectQuery {
    /// Active project, if any.
    pub project_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NamedPermissionQuery {
    /// Permission wire name, e.g. `manage_teams` or `edit_any_task`.
    pub name: String,
    #[serde(default)]
    pub scope: PermissionScope,
    pub project_id: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MyPermissionsResponse {
    pub org_id: Option<Uuid>,
    pub project_id: Option<Uuid>,
    pub permissions: EffectivePermissions,
    pub project_list_scope: ProjectListScope,
}

/// Permission names are taken as strings so that a name this build does not
/// know is denied instead of rejected.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct EvaluateRequest {
    pub project_id: Option<Uuid>,
    #[schema(example = "manage_members")]
    pub permission: Option<String>,
    #[schema(example = "manage_teams")]
    pub org_permission: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct TaskCheckRequest {
    pub project_id: Option<Uuid>,
    pub assignee_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DecisionResponse {
    pub allowed: bool,
}

impl From<bool> for DecisionResponse {
    fn from(allowed: bool) -> Self {
        Self { allowed }
    }
}

pub fn role_tables() -> RoleTables {
    RoleTables {
        org_roles: OrgRole::ALL
            .into_iter()
            .map(|role| OrgRoleGrants {
                role,
                permissions: authz::permissions_for_org_role(role).iter().copied().collect(),
            })
            .collect(),
        project_roles: ProjectRole::ALL
            .into_iter()
            .map(|role| ProjectRoleGrants {
                role,
                permissions: authz::permissions_for_project_role(role).iter().copied().collect(),
            })
            .collect(),
    }
}

// =============================================================================
// REGISTRY ENDPOINTS
// =============================================================================

/// Both role tables
#[utoipa::path(
    get,
    path = "/rbac/roles",
    tag = "RBAC",
    responses(
        (status = 200, description = "Role to permission tables", body = RoleTables),
    )
)]
pub async fn list_roles() -> Json<RoleTables> {
    Json(role_tables())
}

/// Permissions of one organization role (unknown role -> empty list)
#[utoipa::path(
    get,
    path = "/rbac/org-roles/{role}/permissions",
    tag = "RBAC",
    params(("role" = String, Path, description = "Organization role name")),
    responses(
        (status = 200, description = "Granted permissions", body = Vec<OrgPermission>),
    )
)]
pub async fn get_org_role_permissions(Path(role): Path<String>) -> Json<Vec<OrgPermission>> {
    Json(authz::permissions_for_org_role_name(&role).iter().copied().collect())
}

/// Permissions of one project role (unknown role -> empty list)
#[utoipa::path(
    get,
    path = "/rbac/project-roles/{role}/permissions",
    tag = "RBAC",
    params(("role" = String, Path, description = "Project role name")),
    responses(
        (status = 200, description = "Granted permissions", body = Vec<ProjectPermission>),
    )
)]
pub async fn get_project_role_permissions(Path(role): Path<String>) -> Json<Vec<ProjectPermission>> {
    Json(authz::permissions_for_project_role_name(&role).iter().copied().collect())
}

// =============================================================================
// CALLER ENDPOINTS
// =============================================================================

/// Effective permissions of the caller
#[utoipa::path(
    get,
    path = "/rbac/me/permissions",
    tag = "RBAC",
    params(ActiveProjectQuery),
    responses(
        (status = 200, description = "Effective permissions", body = MyPermissionsResponse),
        (status = 401, description = "Missing or invalid token"),
    ),
    security(("bearerAuth" = []))
)]
pub async fn get_my_permissions(
    auth: AuthUser,
    Query(query): Query<ActiveProjectQuery>,
) -> Json<MyPermissionsResponse> {
    let ctx = auth.context(query.project_id);

    Json(MyPermissionsResponse {
        org_id: auth.org_id,
        project_id: query.project_id,
        permissions: ctx.effective_permissions(),
        project_list_scope: ctx.project_list_scope(),
    })
}

/// Check one permission by name
#[utoipa::path(
    get,
    path = "/rbac/me/has-permission",
    tag = "RBAC",
    params(NamedPermissionQuery),
    responses(
        (status = 200, description = "Decision", body = DecisionResponse),
        (status = 401, description = "Missing or invalid token"),
    ),
    security(("bearerAuth" = []))
)]
pub async fn has_named_permission(
    auth: AuthUser,
    Query(query): Query<NamedPermissionQuery>,
) -> Json<DecisionResponse> {
    let ctx = auth.context(query.project_id);
    Json(ctx.has_permission_named(&query.name, query.scope).into())
}

// =============================================================================
// DECISION ENDPOINTS
// =============================================================================

/// Gate decision for a project and/or org permission
#[utoipa::path(
    post,
    path = "/rbac/evaluate",
    tag = "RBAC",
    request_body = EvaluateRequest,
    responses(
        (status = 200, description = "Decision", body = DecisionResponse),
        (status = 401, description = "Missing or invalid token"),
    ),
    security(("bearerAuth" = []))
)]
pub async fn evaluate(auth: AuthUser, Json(req): Json<EvaluateRequest>) -> Json<DecisionResponse> {
    let ctx = auth.context(req.project_id);
    Json(evaluate_named(&ctx, req.permission.as_deref(), req.org_permission.as_deref()).into())
}

fn evaluate_named(ctx: &EvaluationContext, permission: Option<&str>, org_permission: Option<&str>) -> bool {
    let permission = match permission.map(ProjectPermission::parse) {
        Some(None) => {
            tracing::debug!(user_id = %ctx.user_id, name = ?permission, "unknown project permission, denied");
            return false;
        }
        other => other.flatten(),
    };
    let org_permission = match org_permission.map(OrgPermission::parse) {
        Some(None) => {
            tracing::debug!(user_id = %ctx.user_id, name = ?org_permission, "unknown org permission, denied");
            return false;
        }
        other => other.flatten(),
    };

    authz::evaluate(
        &GateRequest {
            permission,
            org_permission,
        },
        ctx,
    )
}

/// May the caller edit a task with this assignee
#[utoipa::path(
    post,
    path = "/rbac/tasks/can-edit",
    tag = "RBAC",
    request_body = TaskCheckRequest,
    responses(
        (status = 200, description = "Decision", body = DecisionResponse),
        (status = 401, description = "Missing or invalid token"),
    ),
    security(("bearerAuth" = []))
)]
pub async fn can_edit_task(auth: AuthUser, Json(req): Json<TaskCheckRequest>) -> Json<DecisionResponse> {
    let ctx = auth.context(req.project_id);
    Json(ctx.can_edit_task(req.assignee_id).into())
}

/// May the caller delete a task with this assignee
#[utoipa::path(
    post,
    path = "/rbac/tasks/can-delete",
    tag = "RBAC",
    request_body = TaskCheckRequest,
    responses(
        (status = 200, description = "Decision", body = DecisionResponse),
        (status = 401, description = "Missing or invalid token"),
    ),
    security(("bearerAuth" = []))
)]
pub async fn can_delete_task(auth: AuthUser, Json(req): Json<TaskCheckRequest>) -> Json<DecisionResponse> {
    let ctx = auth.context(req.project_id);
    Json(ctx.can_delete_task(req.assignee_id).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_permission_names_deny() {
        let ctx = EvaluationContext::new(Uuid::new_v4()).with_org_role(OrgRole::OrgAdmin);

        assert!(evaluate_named(&ctx, Some("view"), None));
        assert!(!evaluate_named(&ctx, Some("teleport"), None));
        assert!(!evaluate_named(&ctx, None, Some("teleport")));
        assert!(!evaluate_named(&ctx, Some("view"), Some("view")));
        assert!(evaluate_named(&ctx, None, None));
    }

    #[test]
    fn role_tables_list_every_role_in_order() {
        let tables = role_tables();
        let org: Vec<_> = tables.org_roles.iter().map(|g| g.role).collect();
        let project: Vec<_> = tables.project_roles.iter().map(|g| g.role).collect();
        assert_eq!(org, OrgRole::ALL.to_vec());
        assert_eq!(project, ProjectRole::ALL.to_vec());
        assert!(tables.org_roles[2].permissions.is_empty());
        assert_eq!(tables.project_roles[4].permissions, vec![ProjectPermission::View]);
    }
}
