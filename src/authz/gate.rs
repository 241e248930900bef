use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::context::EvaluationContext;
use crate::models::rbac::{OrgPermission, ProjectPermission};

/// What a gated feature asks for. An absent axis is not checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GateRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission: Option<ProjectPermission>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_permission: Option<OrgPermission>,
}

impl GateRequest {
    pub fn project(permission: ProjectPermission) -> Self {
        Self {
            permission: Some(permission),
            org_permission: None,
        }
    }

    pub fn org(permission: OrgPermission) -> Self {
        Self {
            permission: None,
            org_permission: Some(permission),
        }
    }

    pub fn and_org(mut self, permission: OrgPermission) -> Self {
        self.org_permission = Some(permission);
        self
    }
}

/// Every requested axis must pass; an empty request passes.
pub fn evaluate(request: &GateRequest, ctx: &EvaluationContext) -> bool {
    if let Some(permission) = request.permission {
        if !ctx.has_project_permission(permission) {
            tracing::debug!(user_id = %ctx.user_id, permission = %permission, "gate closed on project permission");
            return false;
        }
    }

    if let Some(permission) = request.org_permission {
        if !ctx.has_org_permission(permission) {
            tracing::debug!(user_id = %ctx.user_id, permission = %permission, "gate closed on org permission");
            return false;
        }
    }

    true
}

/// Render-if-permitted: yields the children when the request passes for the
/// given context, the fallback otherwise.
#[derive(Debug, Clone)]
pub struct PermissionGate<T> {
    request: GateRequest,
    fallback: T,
}

impl<T> PermissionGate<T> {
    pub fn new(request: GateRequest, fallback: T) -> Self {
        Self { request, fallback }
    }

    /// Children are only built when the gate is open.
    pub fn render(self, ctx: &EvaluationContext, children: impl FnOnce() -> T) -> T {
        if evaluate(&self.request, ctx) {
            children()
        } else {
            self.fallback
        }
    }
}

impl<T: Default> PermissionGate<T> {
    pub fn hidden(request: GateRequest) -> Self {
        Self::new(request, T::default())
    }
}
