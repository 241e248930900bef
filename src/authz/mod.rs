//! Authorization module - role registry, evaluator and gate
//!
//! Two scopes of roles feed one decision:
//! - organization roles (`org_admin`, `proj_admin`, `member`)
//! - project roles (`owner` down to `viewer`), one per project
//!
//! An `org_admin` holds every project permission in its organization without a
//! project membership. Anything missing or unrecognised denies.

mod context;
mod evaluator;
mod gate;
mod registry;

#[cfg(test)]
mod proptest_purity;

pub use context::{EvaluationContext, PermissionScope};
pub use evaluator::{can_delete_task, can_edit_task, has_org_permission, has_project_permission, is_admin};
pub use gate::{evaluate, GateRequest, PermissionGate};
pub use registry::{
    permissions_for_org_role, permissions_for_org_role_name, permissions_for_project_role,
    permissions_for_project_role_name, RoleRegistry,
};
