//! Salted one-way password hashing (bcrypt).

use thiserror::Error;

/// bcrypt work factor used for stored credentials.
///
/// Each increment doubles the cost of hashing and of every brute-force guess.
pub const DEFAULT_COST: u32 = 10;

/// Lowest cost bcrypt accepts. Only suitable for tests.
pub const MIN_COST: u32 = 4;

/// Highest cost bcrypt accepts.
pub const MAX_COST: u32 = 31;

/// bcrypt ignores input past this many bytes.
pub const MAX_PASSWORD_BYTES: usize = 72;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("password must not be empty")]
    EmptyPassword,

    #[error("password must be at most {MAX_PASSWORD_BYTES} bytes")]
    PasswordTooLong,

    #[error("bcrypt cost {0} is outside {MIN_COST}..={MAX_COST}")]
    InvalidCost(u32),

    #[error("password hashing failed: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    #[error("hashing worker failed: {0}")]
    Worker(String),
}

/// A stored password hash in bcrypt's modular-crypt format (`$2b$10$...`).
///
/// `Debug` is redacted so hashes never end up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap a hash loaded from storage. Not validated until verification.
    pub fn from_stored(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl core::fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// Hashes and verifies passwords at a fixed bcrypt cost.
///
/// Both operations are CPU-bound and block the calling thread; async callers
/// go through [`crate::CredentialGate`], which runs them on the blocking pool.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new() -> Self {
        Self { cost: DEFAULT_COST }
    }

    pub fn with_cost(cost: u32) -> Result<Self, CredentialError> {
        if !(MIN_COST..=MAX_COST).contains(&cost) {
            return Err(CredentialError::InvalidCost(cost));
        }
        Ok(Self { cost })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn hash(&self, plaintext: &str) -> Result<PasswordHash, CredentialError> {
        check_plaintext(plaintext)?;
        Ok(PasswordHash(bcrypt::hash(plaintext, self.cost)?))
    }

    /// Check `plaintext` against a stored hash.
    ///
    /// A malformed stored hash never verifies. Plaintexts `hash` would refuse
    /// never verify either, since bcrypt only reads the first 72 bytes.
    pub fn verify(&self, plaintext: &str, hash: &PasswordHash) -> bool {
        if plaintext.is_empty() || plaintext.len() > MAX_PASSWORD_BYTES {
            return false;
        }
        match bcrypt::verify(plaintext, hash.as_str()) {
            Ok(matches) => matches,
            Err(e) => {
                tracing::warn!(error = %e, "stored password hash could not be parsed");
                false
            }
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn check_plaintext(plaintext: &str) -> Result<(), CredentialError> {
    if plaintext.is_empty() {
        return Err(CredentialError::EmptyPassword);
    }
    if plaintext.len() > MAX_PASSWORD_BYTES {
        return Err(CredentialError::PasswordTooLong);
    }
    Ok(())
}
