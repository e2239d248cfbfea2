//! Signed bearer tokens (HS256 JWT) with key-id based rotation.
//!
//! Tokens are signed with the current key and carry its `kid` in the header.
//! Verification accepts the current key and any previous keys still
//! configured, so a secret can be rotated without invalidating live sessions.
//! There is no revocation: a token stays valid until its `exp`.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Timelike, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind,
};
use serde::Serialize;
use thiserror::Error;

use lumora_core::AccountId;

use crate::{Role, SessionClaims, validate_claims};

/// Lifetime of an issued token.
pub const TOKEN_TTL_SECONDS: i64 = 60 * 60;

/// Secrets shorter than this are accepted but logged as weak.
const RECOMMENDED_SECRET_BYTES: usize = 32;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// No token, or something that is not structurally a token.
    #[error("missing or malformed token")]
    Unauthorized,

    /// Well-formed token that fails signature or time-window checks.
    #[error("invalid or expired token")]
    InvalidToken,

    #[error("token signing failed: {0}")]
    Signing(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SigningKeyError {
    #[error("signing key id must not be empty")]
    EmptyKeyId,

    #[error("signing secret for key '{0}' must not be empty")]
    EmptySecret(String),

    #[error("duplicate signing key id '{0}'")]
    DuplicateKeyId(String),
}

/// One HMAC secret and the id it is published under.
#[derive(Clone)]
pub struct SigningKey {
    kid: String,
    secret: Vec<u8>,
}

impl SigningKey {
    pub fn new(kid: impl Into<String>, secret: impl Into<Vec<u8>>) -> Result<Self, SigningKeyError> {
        let kid = kid.into();
        let secret = secret.into();
        if kid.trim().is_empty() {
            return Err(SigningKeyError::EmptyKeyId);
        }
        if secret.is_empty() {
            return Err(SigningKeyError::EmptySecret(kid));
        }
        if secret.len() < RECOMMENDED_SECRET_BYTES {
            tracing::warn!(kid = %kid, "signing secret is shorter than {RECOMMENDED_SECRET_BYTES} bytes");
        }
        Ok(Self { kid, secret })
    }

    pub fn kid(&self) -> &str {
        &self.kid
    }
}

impl core::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SigningKey")
            .field("kid", &self.kid)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// The process-wide key set: one signing key plus verify-only predecessors.
#[derive(Debug, Clone)]
pub struct SigningKeys {
    current: SigningKey,
    previous: Vec<SigningKey>,
}

impl SigningKeys {
    pub fn new(current: SigningKey) -> Self {
        Self {
            current,
            previous: Vec::new(),
        }
    }

    /// Keep accepting tokens signed by a retired key.
    pub fn with_previous(mut self, key: SigningKey) -> Result<Self, SigningKeyError> {
        if self.iter().any(|k| k.kid == key.kid) {
            return Err(SigningKeyError::DuplicateKeyId(key.kid));
        }
        self.previous.push(key);
        Ok(self)
    }

    pub fn current(&self) -> &SigningKey {
        &self.current
    }

    pub fn iter(&self) -> impl Iterator<Item = &SigningKey> {
        std::iter::once(&self.current).chain(self.previous.iter())
    }
}

/// A freshly signed token and the instant it stops being accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Validates bearer tokens (the seam used by HTTP middleware).
pub trait TokenValidator: Send + Sync {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, TokenError>;
}

/// Issues and verifies HS256 session tokens.
pub struct TokenService {
    current_kid: String,
    encoding: EncodingKey,
    decoding: HashMap<String, DecodingKey>,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(keys: SigningKeys) -> Self {
        let current = keys.current();
        let encoding = EncodingKey::from_secret(&current.secret);
        let decoding = keys
            .iter()
            .map(|k| (k.kid.clone(), DecodingKey::from_secret(&k.secret)))
            .collect();

        // Expiry is checked against an injected clock in `validate_claims`.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iat", "sub"]);

        Self {
            current_kid: current.kid.clone(),
            encoding,
            decoding,
            validation,
            ttl: Duration::seconds(TOKEN_TTL_SECONDS),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(
        &self,
        account_id: AccountId,
        role: Role,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, TokenError> {
        // Claims carry whole seconds; truncate so `expires_at` matches the token.
        let issued_at = now.with_nanosecond(0).unwrap_or(now);
        let claims = SessionClaims {
            sub: account_id,
            role,
            issued_at,
            expires_at: issued_at + self.ttl,
        };

        let mut header = Header::new(Algorithm::HS256);
        header.kid = Some(self.current_kid.clone());

        let token = jsonwebtoken::encode(&header, &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))?;

        Ok(IssuedToken {
            token,
            expires_at: claims.expires_at,
        })
    }

    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, TokenError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(TokenError::Unauthorized);
        }

        let header = jsonwebtoken::decode_header(token).map_err(|_| TokenError::Unauthorized)?;
        // Tokens without a kid are checked against the current key only.
        let kid = header.kid.as_deref().unwrap_or(&self.current_kid);
        let key = self.decoding.get(kid).ok_or(TokenError::InvalidToken)?;

        let data = jsonwebtoken::decode::<SessionClaims>(token, key, &self.validation)
            .map_err(|e| classify(e.kind()))?;

        validate_claims(&data.claims, now).map_err(|e| {
            tracing::debug!(reason = %e, "token outside its validity window");
            TokenError::InvalidToken
        })?;

        Ok(data.claims)
    }
}

impl TokenValidator for TokenService {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, TokenError> {
        self.verify(token, now)
    }
}

fn classify(kind: &ErrorKind) -> TokenError {
    match kind {
        ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Json(_) | ErrorKind::Utf8(_) => {
            TokenError::Unauthorized
        }
        _ => TokenError::InvalidToken,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn keys(kid: &str, secret: &str) -> SigningKeys {
        SigningKeys::new(SigningKey::new(kid, secret.as_bytes().to_vec()).unwrap())
    }

    fn service() -> TokenService {
        TokenService::new(keys("primary", "a-test-secret-that-is-32-bytes-long"))
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap()
    }

    /// Replace the first character of the signature segment with another
    /// valid base64url character.
    fn tamper_signature(token: &str) -> String {
        let (head, sig) = token.rsplit_once('.').unwrap();
        let mut chars: Vec<char> = sig.chars().collect();
        chars[0] = if chars[0] == 'A' { 'B' } else { 'A' };
        format!("{head}.{}", chars.into_iter().collect::<String>())
    }

    #[test]
    fn issue_then_verify_returns_original_claims() {
        let svc = service();
        let account = AccountId::new();
        let issued = svc.issue(account, Role::Teacher, t0()).unwrap();

        let claims = svc.verify(&issued.token, t0()).unwrap();
        assert_eq!(claims.sub, account);
        assert_eq!(claims.role, Role::Teacher);
        assert_eq!(claims.issued_at, t0());
        assert_eq!(claims.expires_at, issued.expires_at);
        assert_eq!(issued.expires_at, t0() + Duration::hours(1));
    }

    #[test]
    fn expiry_is_exclusive_at_exp() {
        let svc = service();
        let issued = svc.issue(AccountId::new(), Role::Parent, t0()).unwrap();

        let just_before = t0() + Duration::seconds(TOKEN_TTL_SECONDS - 1);
        assert!(svc.verify(&issued.token, just_before).is_ok());
        assert_eq!(
            svc.verify(&issued.token, issued.expires_at),
            Err(TokenError::InvalidToken)
        );
        assert_eq!(
            svc.verify(&issued.token, t0() + Duration::hours(2)),
            Err(TokenError::InvalidToken)
        );
    }

    #[test]
    fn subsecond_issue_time_is_truncated() {
        let svc = service();
        let now = t0() + Duration::milliseconds(750);
        let issued = svc.issue(AccountId::new(), Role::Parent, now).unwrap();
        assert_eq!(issued.expires_at, t0() + Duration::hours(1));
        assert!(svc.verify(&issued.token, now).is_ok());
    }

    #[test]
    fn tampered_signature_is_invalid() {
        let svc = service();
        let issued = svc.issue(AccountId::new(), Role::Parent, t0()).unwrap();
        let tampered = tamper_signature(&issued.token);
        assert_ne!(tampered, issued.token);
        assert_eq!(svc.verify(&tampered, t0()), Err(TokenError::InvalidToken));
    }

    #[test]
    fn token_from_other_secret_is_invalid() {
        let other = TokenService::new(keys("primary", "some-other-secret-entirely-0000000"));
        let issued = other.issue(AccountId::new(), Role::Parent, t0()).unwrap();
        assert_eq!(service().verify(&issued.token, t0()), Err(TokenError::InvalidToken));
    }

    #[test]
    fn empty_and_garbage_tokens_are_unauthorized() {
        let svc = service();
        assert_eq!(svc.verify("", t0()), Err(TokenError::Unauthorized));
        assert_eq!(svc.verify("   ", t0()), Err(TokenError::Unauthorized));
        assert_eq!(svc.verify("not-a-token", t0()), Err(TokenError::Unauthorized));
        assert_eq!(svc.verify("a.b.c", t0()), Err(TokenError::Unauthorized));
    }

    #[test]
    fn unknown_kid_is_invalid() {
        let issuer = TokenService::new(keys("retired", "a-test-secret-that-is-32-bytes-long"));
        let issued = issuer.issue(AccountId::new(), Role::Parent, t0()).unwrap();
        assert_eq!(service().verify(&issued.token, t0()), Err(TokenError::InvalidToken));
    }

    #[test]
    fn rotated_keys_still_verify_old_tokens() {
        let old = TokenService::new(keys("2025", "old-secret-old-secret-old-secret!!"));
        let old_token = old.issue(AccountId::new(), Role::School, t0()).unwrap();

        let rotated = TokenService::new(
            keys("2026", "new-secret-new-secret-new-secret!!")
                .with_previous(SigningKey::new("2025", b"old-secret-old-secret-old-secret!!".to_vec()).unwrap())
                .unwrap(),
        );
        let claims = rotated.verify(&old_token.token, t0()).unwrap();
        assert_eq!(claims.role, Role::School);

        let new_token = rotated.issue(AccountId::new(), Role::Parent, t0()).unwrap();
        let header = jsonwebtoken::decode_header(&new_token.token).unwrap();
        assert_eq!(header.kid.as_deref(), Some("2026"));
    }

    #[test]
    fn duplicate_and_empty_keys_are_rejected() {
        assert_eq!(SigningKey::new("", b"x".to_vec()).unwrap_err(), SigningKeyError::EmptyKeyId);
        assert!(matches!(
            SigningKey::new("k", Vec::new()),
            Err(SigningKeyError::EmptySecret(_))
        ));
        let dup = keys("k", "secret").with_previous(SigningKey::new("k", b"other".to_vec()).unwrap());
        assert!(matches!(dup, Err(SigningKeyError::DuplicateKeyId(_))));
    }

    #[test]
    fn debug_does_not_print_secret() {
        let key = SigningKey::new("primary", b"super-secret".to_vec()).unwrap();
        assert!(!format!("{key:?}").contains("super-secret"));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn accepted_strictly_inside_window(
            role_idx in 0usize..3,
            offset in 0i64..TOKEN_TTL_SECONDS,
        ) {
            let svc = service();
            let account = AccountId::new();
            let role = Role::ALL[role_idx];
            let issued = svc.issue(account, role, t0()).unwrap();

            let claims = svc.verify(&issued.token, t0() + Duration::seconds(offset)).unwrap();
            prop_assert_eq!(claims.sub, account);
            prop_assert_eq!(claims.role, role);
        }

        #[test]
        fn rejected_at_or_after_exp(extra in 0i64..86_400) {
            let svc = service();
            let issued = svc.issue(AccountId::new(), Role::Parent, t0()).unwrap();
            let at = issued.expires_at + Duration::seconds(extra);
            prop_assert_eq!(svc.verify(&issued.token, at), Err(TokenError::InvalidToken));
        }
    }
}
