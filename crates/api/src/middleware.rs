use std::sync::Arc;

use axum::{
    extract::State,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use lumora_auth::{StaticKey, TokenValidator};

use crate::app::errors::ApiError;
use crate::context::PrincipalContext;

pub const API_KEY_HEADER: &str = "x-api-key";

#[derive(Clone)]
pub struct TokenAuthState {
    pub validator: Arc<dyn TokenValidator>,
}

/// Require a valid session token and expose its claims as [`PrincipalContext`].
pub async fn token_auth_middleware(
    State(state): State<TokenAuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token(req.headers())?;

    let claims = state.validator.validate(token, Utc::now()).map_err(|e| {
        tracing::info!(reason = %e, path = %req.uri().path(), "token rejected");
        ApiError::from(e)
    })?;

    req.extensions_mut().insert(PrincipalContext::from(&claims));

    Ok(next.run(req).await)
}

#[derive(Clone)]
pub struct ApiKeyState {
    pub key: StaticKey,
}

/// Require the configured static key in `x-api-key`.
pub async fn api_key_middleware(
    State(state): State<ApiKeyState>,
    req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let presented = req
        .headers()
        .get(API_KEY_HEADER)
        .ok_or(ApiError::Unauthorized)?
        .to_str()
        .map_err(|_| ApiError::Unauthorized)?;

    if !state.key.check(presented) {
        tracing::info!(path = %req.uri().path(), "api key rejected");
        return Err(ApiError::InvalidApiKey);
    }

    Ok(next.run(req).await)
}

/// Accepts `Authorization: Bearer <token>` as well as a bare `Authorization: <token>`.
fn extract_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or(ApiError::Unauthorized)?;

    let header = header.to_str().map_err(|_| ApiError::Unauthorized)?;

    let token = header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
        .unwrap_or(header)
        .trim();

    if token.is_empty() {
        return Err(ApiError::Unauthorized);
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header::AUTHORIZATION, HeaderValue};

    fn headers(value: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        h
    }

    #[test]
    fn accepts_bearer_and_bare_tokens() {
        assert_eq!(extract_token(&headers("Bearer abc.def.ghi")).unwrap(), "abc.def.ghi");
        assert_eq!(extract_token(&headers("bearer abc")).unwrap(), "abc");
        assert_eq!(extract_token(&headers("abc.def.ghi")).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn missing_or_blank_header_is_unauthorized() {
        assert!(matches!(extract_token(&HeaderMap::new()), Err(ApiError::Unauthorized)));
        assert!(matches!(extract_token(&headers("Bearer   ")), Err(ApiError::Unauthorized)));
    }
}
