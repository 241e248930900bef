pub mod app;
pub mod authz;
pub mod docs;
pub mod errors;
pub mod jwt;
pub mod models;
pub mod routes;

// Re-export commonly used items for tests
pub use app::{create_app, router, AppState};
pub use authz::{EvaluationContext, GateRequest, PermissionGate};
