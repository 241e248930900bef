use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::rbac::OrgRole;

/// One row of an organization's member listing.
///
/// `role` is kept as the raw string the backend sent; use [`OrgMember::org_role`]
/// to read it, which maps unrecognised values to `None`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrgMember {
    pub id: Uuid,
    pub org_id: Uuid,
    pub user_id: Uuid,
    #[schema(example = "proj_admin")]
    pub role: String,
    pub joined_at: DateTime<Utc>,
    pub email: String,
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl OrgMember {
    pub fn org_role(&self) -> Option<OrgRole> {
        OrgRole::parse(&self.role)
    }
}

/// An organization the current user belongs to, as returned by "list my organizations".
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserMembership {
    pub org_id: Uuid,
    pub org_name: String,
    #[schema(example = "member")]
    pub role: String,
}

impl UserMembership {
    pub fn org_role(&self) -> Option<OrgRole> {
        OrgRole::parse(&self.role)
    }
}
