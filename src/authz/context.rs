use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::evaluator;
use crate::models::org::{OrgMember, UserMembership};
use crate::models::project::{ProjectListScope, ProjectMember, UserProjectMembership};
use crate::models::rbac::{
    EffectivePermissions, OrgPermission, OrgRole, ProjectPermission, ProjectRole,
};

/// Snapshot of who is asking and in which roles.
///
/// Resolve it once per request or render pass and reuse it for every check in
/// that pass, so the org role and project role always come from the same
/// point in time. It carries roles only, never decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluationContext {
    pub user_id: Uuid,
    pub org_role: Option<OrgRole>,
    pub project_role: Option<ProjectRole>,
}

/// Which table a raw permission name should be looked up in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PermissionScope {
    #[default]
    Org,
    Project,
}

impl EvaluationContext {
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            org_role: None,
            project_role: None,
        }
    }

    pub fn with_org_role(mut self, role: OrgRole) -> Self {
        self.org_role = Some(role);
        self
    }

    pub fn with_project_role(mut self, role: ProjectRole) -> Self {
        self.project_role = Some(role);
        self
    }

    /// Same user and org, no active project.
    pub fn without_project(mut self) -> Self {
        self.project_role = None;
        self
    }

    /// Build from the raw strings a backend hands out. Unrecognised role names
    /// become `None`.
    pub fn from_raw(user_id: Uuid, org_role: Option<&str>, project_role: Option<&str>) -> Self {
        Self {
            user_id,
            org_role: org_role.and_then(OrgRole::parse),
            project_role: project_role.and_then(ProjectRole::parse),
        }
    }

    /// Pick the current user's entries out of the org and project member
    /// listings.
    pub fn resolve(
        user_id: Uuid,
        org_members: &[OrgMember],
        project_members: Option<&[ProjectMember]>,
    ) -> Self {
        let org_role = org_members
            .iter()
            .find(|m| m.user_id == user_id)
            .and_then(OrgMember::org_role);
        let project_role = project_members
            .and_then(|members| members.iter().find(|m| m.user_id == user_id))
            .and_then(ProjectMember::project_role);

        tracing::debug!(
            user_id = %user_id,
            org_role = ?org_role,
            project_role = ?project_role,
            "resolved evaluation context"
        );

        Self {
            user_id,
            org_role,
            project_role,
        }
    }

    /// Context after switching to `org_id`, taken from the user's own
    /// membership list. Not a member there means no org role.
    pub fn for_org(user_id: Uuid, memberships: &[UserMembership], org_id: Uuid) -> Self {
        let org_role = memberships
            .iter()
            .find(|m| m.org_id == org_id)
            .and_then(UserMembership::org_role);

        Self {
            user_id,
            org_role,
            project_role: None,
        }
    }

    /// Same user and org, active project switched to `project_id`. The role is
    /// taken from the user's own project list; not listed means no project role.
    pub fn in_project(mut self, memberships: &[UserProjectMembership], project_id: Uuid) -> Self {
        self.project_role = memberships
            .iter()
            .find(|m| m.project_id == project_id)
            .and_then(UserProjectMembership::project_role);
        self
    }

    pub fn has_org_permission(&self, permission: OrgPermission) -> bool {
        evaluator::has_org_permission(self.org_role, permission)
    }

    pub fn has_project_permission(&self, permission: ProjectPermission) -> bool {
        evaluator::has_project_permission(self.org_role, self.project_role, permission)
    }

    pub fn can_edit_task(&self, task_assignee_id: Option<Uuid>) -> bool {
        evaluator::can_edit_task(self.org_role, self.project_role, task_assignee_id, self.user_id)
    }

    pub fn can_delete_task(&self, task_assignee_id: Option<Uuid>) -> bool {
        evaluator::can_delete_task(self.org_role, self.project_role, task_assignee_id, self.user_id)
    }

    pub fn is_admin(&self) -> bool {
        evaluator::is_admin(self.org_role)
    }

    /// Check a permission by its wire name. Names that do not belong to the
    /// chosen scope are denied.
    pub fn has_permission_named(&self, name: &str, scope: PermissionScope) -> bool {
        match scope {
            PermissionScope::Org => OrgPermission::parse(name)
                .map(|p| self.has_org_permission(p))
                .unwrap_or(false),
            PermissionScope::Project => ProjectPermission::parse(name)
                .map(|p| self.has_project_permission(p))
                .unwrap_or(false),
        }
    }

    pub fn project_list_scope(&self) -> ProjectListScope {
        if self.is_admin() {
            ProjectListScope::All
        } else {
            ProjectListScope::Mine
        }
    }

    /// Everything this context is granted, in declaration order. Project
    /// permissions include the org_admin override.
    pub fn effective_permissions(&self) -> EffectivePermissions {
        EffectivePermissions {
            user_id: self.user_id,
            org_role: self.org_role,
            project_role: self.project_role,
            is_admin: self.is_admin(),
            org_permissions: OrgPermission::ALL
                .into_iter()
                .filter(|p| self.has_org_permission(*p))
                .collect(),
            project_permissions: ProjectPermission::ALL
                .into_iter()
                .filter(|p| self.has_project_permission(*p))
                .collect(),
        }
    }
}
