//! Public configuration endpoint.

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use std::sync::Arc;

use crate::auth::{AuthState, OptionalAuth};

/// Version embedded at compile time from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Serialize)]
struct ConfigResponse {
    authenticated: bool,
    access_token_validity: u64,
    version: &'static str,
}

pub fn router(state: Arc<AuthState>) -> Router {
    Router::new()
        .route("/config", get(get_config))
        .with_state(state)
}

async fn get_config(
    State(state): State<Arc<AuthState>>,
    OptionalAuth(user): OptionalAuth,
) -> Json<ConfigResponse> {
    Json(ConfigResponse {
        authenticated: user.is_some(),
        access_token_validity: state.access_token.validity,
        version: VERSION,
    })
}
