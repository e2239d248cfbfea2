//! API-side authorization guard.
//!
//! Checked at the handler boundary before any store access.

use lumora_auth::{authorize, Permission};

use crate::app::errors::ApiError;
use crate::context::PrincipalContext;

pub fn require(principal: &PrincipalContext, permission: Permission) -> Result<(), ApiError> {
    authorize(principal.principal(), permission).map_err(|e| {
        tracing::info!(
            account_id = %principal.account_id(),
            role = %principal.role(),
            permission = %permission,
            "authorization denied"
        );
        ApiError::from(e)
    })
}
