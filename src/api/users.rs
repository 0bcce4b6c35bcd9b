//! User endpoints under `/user/v1`.
//!
//! - GET `/profile` - The caller's identity (requires authentication)
//! - POST `/logout` - Clear both auth cookies

use axum::{
    Json, Router,
    extract::State,
    http::HeaderMap,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Serialize;
use std::sync::Arc;

use crate::auth::{Auth, AuthState, OptionalAuth, Principal, clear_login_cookies};

/// Identity as exposed to clients.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub user_id: String,
    pub user_name: String,
    pub roles: String,
}

impl From<Principal> for UserInfo {
    fn from(principal: Principal) -> Self {
        Self {
            user_id: principal.subject_id,
            user_name: principal.display_name,
            roles: principal.roles,
        }
    }
}

#[derive(Serialize)]
pub struct MsgResponse {
    pub result: i32,
    pub msg: String,
}

pub fn router(state: Arc<AuthState>) -> Router {
    Router::new()
        .route("/user/v1/profile", get(profile))
        .route("/user/v1/logout", post(logout))
        .with_state(state)
}

async fn profile(Auth(principal): Auth) -> Json<UserInfo> {
    Json(UserInfo::from(principal))
}

/// Always succeeds; works whether or not the caller is still authenticated.
async fn logout(
    State(state): State<Arc<AuthState>>,
    OptionalAuth(principal): OptionalAuth,
) -> impl IntoResponse {
    if let Some(principal) = &principal {
        tracing::info!(subject = %principal.subject_id, "Logged out");
    }

    let mut headers = HeaderMap::new();
    clear_login_cookies(&state, &mut headers);

    (
        headers,
        Json(MsgResponse {
            result: 1,
            msg: "Logged out".to_string(),
        }),
    )
}
