use axum::{
    routing::{get, post},
    Router,
};

pub mod accounts;
pub mod children;
pub mod system;

/// Router for all account-scoped (token-authenticated) endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/api/me", get(accounts::me))
        .route("/api/children", get(children::list).post(children::create))
        .route("/api/children/:id/progress", post(children::record_progress))
}
