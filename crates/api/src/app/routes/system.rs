use axum::{extract::Extension, http::StatusCode, http::Uri, response::IntoResponse, Json};

use crate::app::dto::{MessageResponse, PrivateResponse};
use crate::app::errors::json_error;
use crate::context::PrincipalContext;

pub async fn root() -> &'static str {
    "Lumora backend is running"
}

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn public() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "public API is working",
    })
}

/// Reachable only past the auth middleware. In API-key mode there is no
/// principal, so only the message is returned.
pub async fn private(principal: Option<Extension<PrincipalContext>>) -> Json<PrivateResponse> {
    let principal = principal.map(|Extension(p)| p);
    Json(PrivateResponse {
        message: "private API is accessible",
        account_id: principal.map(|p| p.account_id()),
        role: principal.map(|p| p.role()),
    })
}

pub async fn not_found(uri: Uri) -> impl IntoResponse {
    json_error(
        StatusCode::NOT_FOUND,
        "not_found",
        format!("no route for {}", uri.path()),
    )
}
