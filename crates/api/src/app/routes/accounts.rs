use axum::{
    extract::{rejection::JsonRejection, Extension},
    Json,
};
use chrono::Utc;

use lumora_auth::{Account, CredentialGate, Role};
use lumora_core::{validate_display_name, validate_password_strength, Email};

use crate::app::dto::{AccountResponse, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::context::PrincipalContext;

/// POST /register - create an account with a hashed password.
pub async fn register(
    Extension(services): Extension<AppServices>,
    Extension(gate): Extension<CredentialGate>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<RegisterResponse>, ApiError> {
    let Json(req) = payload?;

    validate_display_name(&req.name)?;
    let email = Email::parse(&req.email)?;
    validate_password_strength(&req.password)?;
    let role: Role = req
        .role
        .parse()
        .map_err(|e: lumora_auth::UnknownRole| ApiError::Validation(e.to_string()))?;

    let password_hash = gate.hash_password(req.password).await?;
    let account = Account::new(&req.name, email, password_hash, role, Utc::now());

    let account = services.accounts.insert(account).await.map_err(|e| {
        if let lumora_infra::StoreError::Conflict(_) = e {
            tracing::info!("registration rejected: email already registered");
            return ApiError::Conflict("email already registered".to_string());
        }
        ApiError::from(e)
    })?;

    tracing::info!(account_id = %account.id, role = %account.role, "account registered");

    Ok(Json(RegisterResponse {
        message: "account registered",
        id: account.id,
    }))
}

/// POST /login - exchange email + password for a session token.
///
/// Unknown emails and wrong passwords produce the same 400 response, and
/// unknown emails still pay for one bcrypt verification.
pub async fn login(
    Extension(services): Extension<AppServices>,
    Extension(gate): Extension<CredentialGate>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(req) = payload?;

    let account = match Email::parse(&req.email) {
        Ok(email) => services.accounts.find_by_email(&email).await?,
        Err(_) => None,
    };

    let Some(account) = account else {
        gate.verify_decoy(req.password).await?;
        tracing::info!(reason = "unknown_email", "login failed");
        return Err(ApiError::LoginFailed);
    };

    if !gate.verify_password(req.password, account.password_hash.clone()).await? {
        tracing::info!(account_id = %account.id, reason = "wrong_password", "login failed");
        return Err(ApiError::LoginFailed);
    }

    let issued = gate.issue_token(account.id, account.role)?;
    tracing::info!(account_id = %account.id, expires_at = %issued.expires_at, "token issued");

    Ok(Json(LoginResponse {
        token: issued.token,
        expires_at: issued.expires_at,
    }))
}

/// GET /api/me - the caller's current account, read from the store.
pub async fn me(
    Extension(services): Extension<AppServices>,
    Extension(principal): Extension<PrincipalContext>,
) -> Result<Json<AccountResponse>, ApiError> {
    let account = services
        .accounts
        .find_by_id(principal.account_id())
        .await?
        .ok_or(ApiError::Unauthorized)?;

    Ok(Json(account.into()))
}
