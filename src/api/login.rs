//! Login endpoints under `/login/v1`.
//!
//! These paths are excluded from the authentication filter, so handlers here
//! read the cookies themselves.
//!
//! - POST `/loginInfo` - Identity from the access cookie, or empty fields
//! - POST `/loginSuccess` - Issue cookies for a principal (test-mode only)

use axum::{
    Json, Router,
    extract::State,
    http::HeaderMap,
    routing::post,
};
use std::sync::Arc;

use super::users::UserInfo;
use crate::auth::{AuthState, Inspection, inspect, read_token};
use crate::jwt::{TokenKind, unix_now};

pub fn router(state: Arc<AuthState>) -> Router {
    let router = Router::new().route("/login/v1/loginInfo", post(login_info));

    #[cfg(feature = "test-mode")]
    let router = router.route("/login/v1/loginSuccess", post(test_mode::login_success));

    router.with_state(state)
}

/// Report who the access cookie belongs to.
/// Any token that is not currently valid reports empty fields.
async fn login_info(State(state): State<Arc<AuthState>>, headers: HeaderMap) -> Json<UserInfo> {
    let token = read_token(&headers, &state.access_token);

    let info = match unix_now() {
        Ok(now) => match inspect(&state.jwt, token, TokenKind::Access, now) {
            Inspection::Valid(claims) => UserInfo::from(claims.principal()),
            Inspection::Expired(_) | Inspection::Invalid(_) => UserInfo::default(),
        },
        Err(e) => {
            tracing::error!(error = %e, "Cannot read clock");
            UserInfo::default()
        }
    };

    Json(info)
}

#[cfg(feature = "test-mode")]
mod test_mode {
    use axum::{Json, extract::State, http::HeaderMap, response::IntoResponse};
    use serde::Deserialize;
    use std::sync::Arc;

    use super::super::error::{ApiError, ResultExt};
    use super::super::users::MsgResponse;
    use crate::auth::{AuthState, Principal, issue_login_cookies};
    use crate::jwt::unix_now;

    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct LoginRequest {
        user_id: String,
        #[serde(default)]
        user_name: String,
        #[serde(default)]
        roles: String,
    }

    /// Stand-in for the host's credential check: trusts the posted identity.
    pub async fn login_success(
        State(state): State<Arc<AuthState>>,
        Json(payload): Json<LoginRequest>,
    ) -> Result<impl IntoResponse, ApiError> {
        let user_id = payload.user_id.trim();
        if user_id.is_empty() {
            return Err(ApiError::bad_request("userId cannot be empty"));
        }

        let principal = Principal {
            subject_id: user_id.to_string(),
            display_name: payload.user_name,
            roles: payload.roles,
        };

        let now = unix_now().token_err("Failed to read clock")?;
        let mut headers = HeaderMap::new();
        issue_login_cookies(&state, &principal, now, &mut headers)
            .token_err("Failed to issue login tokens")?;

        Ok((
            headers,
            Json(MsgResponse {
                result: 1,
                msg: format!("{} logged in", principal.display_name),
            }),
        ))
    }
}
