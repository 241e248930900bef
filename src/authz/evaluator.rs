use uuid::Uuid;

use super::registry::{permissions_for_org_role, permissions_for_project_role};
use crate::models::rbac::{OrgPermission, OrgRole, ProjectPermission, ProjectRole};

/// Organization-scope check. No org role means no org permissions.
pub fn has_org_permission(org_role: Option<OrgRole>, permission: OrgPermission) -> bool {
    let Some(role) = org_role else {
        tracing::debug!(permission = %permission, "no org role, denied");
        return false;
    };

    let granted = permissions_for_org_role(role).contains(&permission);
    tracing::debug!(org_role = %role, permission = %permission, granted, "org permission check");
    granted
}

/// Project-scope check.
///
/// Evaluation order:
/// 1. org_admin -> allow, even without a project membership
/// 2. no project role -> deny
/// 3. project role table lookup
pub fn has_project_permission(
    org_role: Option<OrgRole>,
    project_role: Option<ProjectRole>,
    permission: ProjectPermission,
) -> bool {
    if org_role == Some(OrgRole::OrgAdmin) {
        tracing::debug!(permission = %permission, "org_admin override");
        return true;
    }

    let Some(role) = project_role else {
        tracing::debug!(permission = %permission, "no project membership, denied");
        return false;
    };

    let granted = permissions_for_project_role(role).contains(&permission);
    tracing::debug!(project_role = %role, permission = %permission, granted, "project permission check");
    granted
}

pub fn can_edit_task(
    org_role: Option<OrgRole>,
    project_role: Option<ProjectRole>,
    task_assignee_id: Option<Uuid>,
    current_user_id: Uuid,
) -> bool {
    can_act_on_task(
        org_role,
        project_role,
        ProjectPermission::EditAnyTask,
        ProjectPermission::EditAssignedTask,
        task_assignee_id,
        current_user_id,
    )
}

pub fn can_delete_task(
    org_role: Option<OrgRole>,
    project_role: Option<ProjectRole>,
    task_assignee_id: Option<Uuid>,
    current_user_id: Uuid,
) -> bool {
    can_act_on_task(
        org_role,
        project_role,
        ProjectPermission::DeleteAnyTask,
        ProjectPermission::DeleteAssignedTask,
        task_assignee_id,
        current_user_id,
    )
}

/// "Any" dominates "assigned"; the assigned variant needs an exact assignee match.
fn can_act_on_task(
    org_role: Option<OrgRole>,
    project_role: Option<ProjectRole>,
    any: ProjectPermission,
    assigned: ProjectPermission,
    task_assignee_id: Option<Uuid>,
    current_user_id: Uuid,
) -> bool {
    if has_project_permission(org_role, project_role, any) {
        return true;
    }

    if has_project_permission(org_role, project_role, assigned) {
        let own = task_assignee_id == Some(current_user_id);
        tracing::debug!(
            user_id = %current_user_id,
            assignee = ?task_assignee_id,
            permission = %assigned,
            own,
            "assigned task check"
        );
        return own;
    }

    false
}

/// Admin by role identity: org_admin or proj_admin.
pub fn is_admin(org_role: Option<OrgRole>) -> bool {
    matches!(org_role, Some(OrgRole::OrgAdmin | OrgRole::ProjAdmin))
}
