use std::sync::Arc;

use axum::http::Method;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::errors::AppResult;
use crate::jwt::JwtConfig;
use crate::routes::{health, rbac};

#[derive(Clone)]
pub struct AppState {
    pub jwt: Arc<JwtConfig>,
}

impl AppState {
    pub fn new(jwt: JwtConfig) -> Self {
        Self { jwt: Arc::new(jwt) }
    }
}

pub async fn create_app() -> AppResult<Router> {
    let jwt_config = JwtConfig::from_env()?;
    Ok(router(AppState::new(jwt_config)))
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_origin(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health::health))
        .nest("/rbac", rbac::routes())
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
