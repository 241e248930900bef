use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    /// Number of roles known to the registry across both scopes.
    pub roles_loaded: usize,
}

#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses((status = 200, description = "Health check", body = HealthResponse))
)]
pub async fn health() -> Json<HealthResponse> {
    let tables = crate::routes::rbac::role_tables();

    Json(HealthResponse {
        status: "ok",
        roles_loaded: tables.org_roles.len() + tables.project_roles.len(),
    })
}
