//! Static shared-key mode: one configured secret compared against the
//! `x-api-key` header. Coarser than per-account tokens (no identity, no expiry).

use subtle::ConstantTimeEq;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StaticKeyError {
    #[error("static API key must not be empty")]
    Empty,
}

#[derive(Clone)]
pub struct StaticKey(Vec<u8>);

impl StaticKey {
    pub fn new(secret: impl Into<String>) -> Result<Self, StaticKeyError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(StaticKeyError::Empty);
        }
        Ok(Self(secret.into_bytes()))
    }

    /// Constant-time comparison of a presented key against the configured one.
    ///
    /// Only the length of the configured key can leak through timing.
    pub fn check(&self, presented: &str) -> bool {
        self.0.as_slice().ct_eq(presented.as_bytes()).into()
    }
}

impl core::fmt::Debug for StaticKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("StaticKey(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_only_exact_key() {
        let key = StaticKey::new("k-123").unwrap();
        assert!(key.check("k-123"));
        assert!(!key.check("k-124"));
        assert!(!key.check("k-12"));
        assert!(!key.check(""));
    }

    #[test]
    fn empty_secret_is_rejected() {
        assert_eq!(StaticKey::new("").unwrap_err(), StaticKeyError::Empty);
    }
}
