pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod jwt;

pub use config::ServerConfig;

use api::create_api_router;
use auth::{AccessRules, AuthState, authorize, jwt_authentication};
use axum::{Router, middleware};
use std::sync::Arc;
use tokio::net::TcpListener;

/// Wrap `router` with the authentication filter and, inside it, the
/// authorization rules. Every route of `router` is covered.
pub fn with_auth(router: Router, state: Arc<AuthState>, rules: Arc<AccessRules>) -> Router {
    router
        .layer(middleware::from_fn_with_state(rules, authorize))
        .layer(middleware::from_fn_with_state(state, jwt_authentication))
}

/// Create the application router with the given configuration.
pub fn create_app(config: &ServerConfig) -> Router {
    let state = Arc::new(AuthState::new(config));
    let rules = Arc::new(AccessRules::default_rules());

    with_auth(create_api_router(state.clone()), state, rules)
}

/// Serve the app on `listener` until the server exits.
pub async fn run_server(config: ServerConfig, listener: TcpListener) -> Result<(), std::io::Error> {
    let app = create_app(&config);
    axum::serve(listener, app).await
}
