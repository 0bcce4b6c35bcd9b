use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::auth::Auth;

pub fn router() -> Router {
    Router::new().route("/notice/v1/list", get(list_notices))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NoticeList {
    viewer: String,
    notices: Vec<String>,
}

async fn list_notices(Auth(principal): Auth) -> Json<NoticeList> {
    Json(NoticeList {
        viewer: principal.subject_id,
        notices: Vec::new(),
    })
}
