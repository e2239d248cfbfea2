//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store selection and credential gate construction
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::{AppServices, AuthBackend, StartupError};

/// Build the full HTTP router from configuration (public entrypoint used by `main.rs`).
///
/// Hosts that manage their own listener can serve the returned router directly.
pub async fn build_app(config: &AppConfig) -> Result<Router, StartupError> {
    let auth = services::build_auth(config)?;
    let services = services::build_services(config).await?;
    Ok(router(auth, services))
}

/// Assemble routes for the given auth mode.
///
/// Token mode exposes registration, login and the account-scoped routes.
/// API-key mode only guards `/api/private`: a shared key carries no identity.
pub fn router(auth: AuthBackend, services: AppServices) -> Router {
    let public = Router::new()
        .route("/", get(routes::system::root))
        .route("/health", get(routes::system::health))
        .route("/api/public", get(routes::system::public));

    let app = match auth {
        AuthBackend::Token(gate) => {
            let auth_state = middleware::TokenAuthState {
                validator: Arc::new(gate.clone()),
            };

            let protected = Router::new()
                .route("/api/private", get(routes::system::private))
                .merge(routes::router())
                .route_layer(axum::middleware::from_fn_with_state(
                    auth_state,
                    middleware::token_auth_middleware,
                ));

            public
                .route("/register", post(routes::accounts::register))
                .route("/login", post(routes::accounts::login))
                .merge(protected)
                .layer(Extension(gate))
        }
        AuthBackend::ApiKey(key) => {
            let protected = Router::new()
                .route("/api/private", get(routes::system::private))
                .route_layer(axum::middleware::from_fn_with_state(
                    middleware::ApiKeyState { key },
                    middleware::api_key_middleware,
                ));

            public.merge(protected)
        }
    };

    app.fallback(routes::system::not_found)
        .layer(Extension(services))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}
