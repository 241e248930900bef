use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::rbac::ProjectRole;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProjectMember {
    pub id: Uuid,
    pub project_id: Uuid,
    pub user_id: Uuid,
    #[schema(example = "team_member")]
    pub role: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl ProjectMember {
    pub fn project_role(&self) -> Option<ProjectRole> {
        ProjectRole::parse(&self.role)
    }
}

/// One entry of the current user's own project list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserProjectMembership {
    pub project_id: Uuid,
    /// Raw role name; unknown names resolve to no role.
    #[schema(example = "viewer")]
    pub role: String,
}

impl UserProjectMembership {
    pub fn project_role(&self) -> Option<ProjectRole> {
        ProjectRole::parse(&self.role)
    }
}

/// Which project listing a user is entitled to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProjectListScope {
    /// Every project in the organization.
    All,
    /// Only projects the user is a member of.
    Mine,
}
