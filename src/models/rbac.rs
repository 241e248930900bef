use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// =============================================================================
// PARSE ERROR
// =============================================================================

/// Returned by the strict `FromStr` impls. Evaluation paths use the lenient
/// `parse` constructors instead and treat an unknown value as absent.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RoleParseError {
    #[error("unknown organization role: {0}")]
    OrgRole(String),
    #[error("unknown project role: {0}")]
    ProjectRole(String),
    #[error("unknown organization permission: {0}")]
    OrgPermission(String),
    #[error("unknown project permission: {0}")]
    ProjectPermission(String),
}

// =============================================================================
// ORGANIZATION ROLE
// =============================================================================

/// Role a user holds inside one organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrgRole {
    OrgAdmin,
    ProjAdmin,
    Member,
}

impl OrgRole {
    pub const ALL: [OrgRole; 3] = [OrgRole::OrgAdmin, OrgRole::ProjAdmin, OrgRole::Member];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrgRole::OrgAdmin => "org_admin",
            OrgRole::ProjAdmin => "proj_admin",
            OrgRole::Member => "member",
        }
    }

    /// Exact match on the wire name; anything else is `None`.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.as_str() == s)
    }
}

impl fmt::Display for OrgRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for OrgRole {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| RoleParseError::OrgRole(s.to_string()))
    }
}

// =============================================================================
// PROJECT ROLE
// =============================================================================

/// Role a user holds inside one project. Independent per project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProjectRole {
    Owner,
    Admin,
    ProjectManager,
    TeamMember,
    Viewer,
}

impl ProjectRole {
    pub const ALL: [ProjectRole; 5] = [
        ProjectRole::Owner,
        ProjectRole::Admin,
        ProjectRole::ProjectManager,
        ProjectRole::TeamMember,
        ProjectRole::Viewer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectRole::Owner => "owner",
            ProjectRole::Admin => "admin",
            ProjectRole::ProjectManager => "project_manager",
            ProjectRole::TeamMember => "team_member",
            ProjectRole::Viewer => "viewer",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.as_str() == s)
    }
}

impl fmt::Display for ProjectRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ProjectRole {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| RoleParseError::ProjectRole(s.to_string()))
    }
}

// =============================================================================
// ORGANIZATION PERMISSION
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrgPermission {
    ManageOrgMembers,
    ManageOrgRoles,
    ManageProjects,
    ManageTeams,
    ManageOrgSettings,
    ViewAnalytics,
}

impl OrgPermission {
    pub const ALL: [OrgPermission; 6] = [
        OrgPermission::ManageOrgMembers,
        OrgPermission::ManageOrgRoles,
        OrgPermission::ManageProjects,
        OrgPermission::ManageTeams,
        OrgPermission::ManageOrgSettings,
        OrgPermission::ViewAnalytics,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrgPermission::ManageOrgMembers => "manage_org_members",
            OrgPermission::ManageOrgRoles => "manage_org_roles",
            OrgPermission::ManageProjects => "manage_projects",
            OrgPermission::ManageTeams => "manage_teams",
            OrgPermission::ManageOrgSettings => "manage_org_settings",
            OrgPermission::ViewAnalytics => "view_analytics",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|perm| perm.as_str() == s)
    }
}

impl fmt::Display for OrgPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for OrgPermission {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| RoleParseError::OrgPermission(s.to_string()))
    }
}

// =============================================================================
// PROJECT PERMISSION
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProjectPermission {
    DeleteProject,
    EditProject,
    ManageMembers,
    AssignRoles,
    CreateTask,
    EditAnyTask,
    DeleteAnyTask,
    EditAssignedTask,
    DeleteAssignedTask,
    AssignTask,
    ChangeStatus,
    PostComment,
    LogTime,
    ManageAttachments,
    View,
}

impl ProjectPermission {
    pub const ALL: [ProjectPermission; 15] = [
        ProjectPermission::DeleteProject,
        ProjectPermission::EditProject,
        ProjectPermission::ManageMembers,
        ProjectPermission::AssignRoles,
        ProjectPermission::CreateTask,
        ProjectPermission::EditAnyTask,
        ProjectPermission::DeleteAnyTask,
        ProjectPermission::EditAssignedTask,
        ProjectPermission::DeleteAssignedTask,
        ProjectPermission::AssignTask,
        ProjectPermission::ChangeStatus,
        ProjectPermission::PostComment,
        ProjectPermission::LogTime,
        ProjectPermission::ManageAttachments,
        ProjectPermission::View,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectPermission::DeleteProject => "delete_project",
            ProjectPermission::EditProject => "edit_project",
            ProjectPermission::ManageMembers => "manage_members",
            ProjectPermission::AssignRoles => "assign_roles",
            ProjectPermission::CreateTask => "create_task",
            ProjectPermission::EditAnyTask => "edit_any_task",
            ProjectPermission::DeleteAnyTask => "delete_any_task",
            ProjectPermission::EditAssignedTask => "edit_assigned_task",
            ProjectPermission::DeleteAssignedTask => "delete_assigned_task",
            ProjectPermission::AssignTask => "assign_task",
            ProjectPermission::ChangeStatus => "change_status",
            ProjectPermission::PostComment => "post_comment",
            ProjectPermission::LogTime => "log_time",
            ProjectPermission::ManageAttachments => "manage_attachments",
            ProjectPermission::View => "view",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|perm| perm.as_str() == s)
    }
}

impl fmt::Display for ProjectPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ProjectPermission {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| RoleParseError::ProjectPermission(s.to_string()))
    }
}

// =============================================================================
// EFFECTIVE PERMISSIONS (computed)
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct EffectivePermissions {
    pub user_id: Uuid,
    pub org_role: Option<OrgRole>,
    pub project_role: Option<ProjectRole>,
    pub is_admin: bool,
    pub org_permissions: Vec<OrgPermission>,
    /// Includes everything implied by the org_admin override.
    pub project_permissions: Vec<ProjectPermission>,
}
