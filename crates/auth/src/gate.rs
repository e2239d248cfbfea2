//! The credential & access gate: one object the HTTP layer talks to.
//!
//! Everything is injected through [`GateConfig`]; nothing here reads the
//! process environment.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use lumora_core::AccountId;

use crate::password::check_plaintext;
use crate::{
    CredentialError, IssuedToken, PasswordHash, PasswordHasher, Role, SessionClaims, SigningKeys,
    TokenError, TokenService, TokenValidator,
};

#[derive(Debug, Clone)]
pub struct GateConfig {
    pub bcrypt_cost: u32,
    pub signing_keys: SigningKeys,
}

impl GateConfig {
    pub fn new(signing_keys: SigningKeys) -> Self {
        Self {
            bcrypt_cost: crate::DEFAULT_COST,
            signing_keys,
        }
    }

    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }
}

/// Cheap to clone; shares one hasher and token service.
#[derive(Clone)]
pub struct CredentialGate {
    inner: Arc<GateInner>,
}

struct GateInner {
    hasher: PasswordHasher,
    tokens: TokenService,
    /// Verified against when an email is unknown so login timing does not
    /// reveal which emails are registered.
    decoy_hash: PasswordHash,
}

impl CredentialGate {
    pub fn new(config: GateConfig) -> Result<Self, CredentialError> {
        let hasher = PasswordHasher::with_cost(config.bcrypt_cost)?;
        let decoy_hash = hasher.hash("lumora-decoy-credential")?;

        Ok(Self {
            inner: Arc::new(GateInner {
                hasher,
                tokens: TokenService::new(config.signing_keys),
                decoy_hash,
            }),
        })
    }

    /// Hash a new password on the blocking pool.
    pub async fn hash_password(&self, plaintext: String) -> Result<PasswordHash, CredentialError> {
        check_plaintext(&plaintext)?;
        let hasher = self.inner.hasher;
        tokio::task::spawn_blocking(move || hasher.hash(&plaintext))
            .await
            .map_err(|e| CredentialError::Worker(e.to_string()))?
    }

    /// Verify a password against a stored hash on the blocking pool.
    pub async fn verify_password(
        &self,
        plaintext: String,
        hash: PasswordHash,
    ) -> Result<bool, CredentialError> {
        let hasher = self.inner.hasher;
        tokio::task::spawn_blocking(move || hasher.verify(&plaintext, &hash))
            .await
            .map_err(|e| CredentialError::Worker(e.to_string()))
    }

    /// Spend the same work as a real verification, for unknown accounts.
    pub async fn verify_decoy(&self, plaintext: String) -> Result<(), CredentialError> {
        self.verify_password(plaintext, self.inner.decoy_hash.clone())
            .await
            .map(|_| ())
    }

    pub fn issue_token(&self, account_id: AccountId, role: Role) -> Result<IssuedToken, TokenError> {
        self.issue_token_at(account_id, role, Utc::now())
    }

    pub fn issue_token_at(
        &self,
        account_id: AccountId,
        role: Role,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, TokenError> {
        self.inner.tokens.issue(account_id, role, now)
    }

    pub fn verify_token(&self, token: &str) -> Result<SessionClaims, TokenError> {
        self.verify_token_at(token, Utc::now())
    }

    pub fn verify_token_at(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, TokenError> {
        self.inner.tokens.verify(token, now)
    }
}

impl TokenValidator for CredentialGate {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, TokenError> {
        self.verify_token_at(token, now)
    }
}
