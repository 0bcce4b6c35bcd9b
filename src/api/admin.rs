//! Admin API endpoints.
//!
//! Access to `/admin/` is restricted to `ROLE_ADMIN` by the rule table.

use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::auth::Auth;

pub fn router() -> Router {
    Router::new().route("/admin/v1/status", get(status))
}

#[derive(Serialize)]
struct StatusResponse {
    status: &'static str,
    admin: String,
}

async fn status(Auth(principal): Auth) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok",
        admin: principal.subject_id,
    })
}
