mod admin;
mod config;
mod error;
mod login;
mod notice;
mod users;

use axum::Router;
use std::sync::Arc;

use crate::auth::AuthState;

pub use error::{ApiError, ResultExt};
pub use users::{MsgResponse, UserInfo};

/// Create the API router. Routes carry their full paths so that the
/// filter and the rule table see the same path the client sent.
pub fn create_api_router(state: Arc<AuthState>) -> Router {
    Router::new()
        .merge(login::router(state.clone()))
        .merge(users::router(state.clone()))
        .merge(notice::router())
        .merge(admin::router())
        .merge(config::router(state))
}
