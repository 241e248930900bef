//! Property-based tests for evaluator determinism and the fail-closed rules.

use proptest::prelude::*;
use uuid::Uuid;

use super::*;
use crate::models::rbac::{OrgPermission, OrgRole, ProjectPermission, ProjectRole};

fn org_role() -> impl Strategy<Value = Option<OrgRole>> {
    prop::option::of(prop::sample::select(OrgRole::ALL.to_vec()))
}

fn project_role() -> impl Strategy<Value = Option<ProjectRole>> {
    prop::option::of(prop::sample::select(ProjectRole::ALL.to_vec()))
}

fn org_permission() -> impl Strategy<Value = OrgPermission> {
    prop::sample::select(OrgPermission::ALL.to_vec())
}

fn project_permission() -> impl Strategy<Value = ProjectPermission> {
    prop::sample::select(ProjectPermission::ALL.to_vec())
}

/// Small pool of ids so assignee and current user collide often.
fn user_id() -> impl Strategy<Value = Uuid> {
    (0u128..3).prop_map(Uuid::from_u128)
}

proptest! {
    /// Property: identical inputs always give identical answers.
    #[test]
    fn prop_evaluator_is_deterministic(
        org in org_role(),
        project in project_role(),
        org_perm in org_permission(),
        project_perm in project_permission(),
        assignee in prop::option::of(user_id()),
        current in user_id(),
    ) {
        prop_assert_eq!(has_org_permission(org, org_perm), has_org_permission(org, org_perm));
        prop_assert_eq!(
            has_project_permission(org, project, project_perm),
            has_project_permission(org, project, project_perm)
        );
        prop_assert_eq!(
            can_edit_task(org, project, assignee, current),
            can_edit_task(org, project, assignee, current)
        );
        prop_assert_eq!(
            can_delete_task(org, project, assignee, current),
            can_delete_task(org, project, assignee, current)
        );
        prop_assert_eq!(is_admin(org), is_admin(org));

        let ctx = EvaluationContext { user_id: current, org_role: org, project_role: project };
        let request = GateRequest { permission: Some(project_perm), org_permission: Some(org_perm) };
        prop_assert_eq!(evaluate(&request, &ctx), evaluate(&request, &ctx));
    }

    /// Property: a gate decision depends only on the roles, not on earlier
    /// decisions or on which context value carried them.
    #[test]
    fn prop_gate_matches_rebuilt_context(
        org in org_role(),
        project in project_role(),
        other_org in org_role(),
        other_project in project_role(),
        project_perm in prop::option::of(project_permission()),
        org_perm in prop::option::of(org_permission()),
        current in user_id(),
    ) {
        let request = GateRequest { permission: project_perm, org_permission: org_perm };
        let ctx = EvaluationContext { user_id: current, org_role: org, project_role: project };
        let first = evaluate(&request, &ctx);

        let other = EvaluationContext { user_id: current, org_role: other_org, project_role: other_project };
        let _ = evaluate(&request, &other);

        let rebuilt = EvaluationContext::from_raw(
            current,
            org.map(|r| r.as_str()),
            project.map(|r| r.as_str()),
        );
        prop_assert_eq!(rebuilt, ctx);
        prop_assert_eq!(evaluate(&request, &rebuilt), first);
        prop_assert_eq!(evaluate(&request, &ctx), first);
    }

    /// Property: without an org role, no org permission is ever granted.
    #[test]
    fn prop_no_org_role_denies(perm in org_permission()) {
        prop_assert!(!has_org_permission(None, perm));
    }

    /// Property: org_admin holds every project permission regardless of project role.
    #[test]
    fn prop_org_admin_override(project in project_role(), perm in project_permission()) {
        prop_assert!(has_project_permission(Some(OrgRole::OrgAdmin), project, perm));
    }

    /// Property: below org_admin, a missing project role denies everything.
    #[test]
    fn prop_missing_project_role_denies(perm in project_permission()) {
        prop_assert!(!has_project_permission(Some(OrgRole::ProjAdmin), None, perm));
        prop_assert!(!has_project_permission(Some(OrgRole::Member), None, perm));
        prop_assert!(!has_project_permission(None, None, perm));
    }

    /// Property: a task edit by someone who is not the assignee needs EDIT_ANY_TASK.
    #[test]
    fn prop_foreign_task_edit_needs_edit_any(
        org in org_role(),
        project in project_role(),
        assignee in prop::option::of(user_id()),
        current in user_id(),
    ) {
        prop_assume!(assignee != Some(current));
        prop_assert_eq!(
            can_edit_task(org, project, assignee, current),
            has_project_permission(org, project, ProjectPermission::EditAnyTask)
        );
        prop_assert_eq!(
            can_delete_task(org, project, assignee, current),
            has_project_permission(org, project, ProjectPermission::DeleteAnyTask)
        );
    }

    /// Property: the gate is the conjunction of the two single-axis checks.
    #[test]
    fn prop_gate_is_conjunction(
        org in org_role(),
        project in project_role(),
        project_perm in prop::option::of(project_permission()),
        org_perm in prop::option::of(org_permission()),
    ) {
        let ctx = EvaluationContext { user_id: Uuid::nil(), org_role: org, project_role: project };
        let request = GateRequest { permission: project_perm, org_permission: org_perm };

        let expected = project_perm.map_or(true, |p| has_project_permission(org, project, p))
            && org_perm.map_or(true, |p| has_org_permission(org, p));
        prop_assert_eq!(evaluate(&request, &ctx), expected);
    }
}
