use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use lumora_core::AccountId;

use crate::Role;

/// Session claims carried inside a signed token.
///
/// Timestamps use the standard JWT numeric-date claims (`iat`, `exp`) with
/// whole-second precision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject: the account the token was issued to.
    pub sub: AccountId,

    /// Role as of issuance time.
    pub role: Role,

    #[serde(rename = "iat", with = "chrono::serde::ts_seconds")]
    pub issued_at: DateTime<Utc>,

    #[serde(rename = "exp", with = "chrono::serde::ts_seconds")]
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClaimsValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (expires_at <= issued_at)")]
    InvalidTimeWindow,
}

/// Deterministically validate the time window of decoded claims.
///
/// Signature verification happens before this, in [`crate::TokenService`].
pub fn validate_claims(claims: &SessionClaims, now: DateTime<Utc>) -> Result<(), ClaimsValidationError> {
    if claims.expires_at <= claims.issued_at {
        return Err(ClaimsValidationError::InvalidTimeWindow);
    }
    if now < claims.issued_at {
        return Err(ClaimsValidationError::NotYetValid);
    }
    if now >= claims.expires_at {
        return Err(ClaimsValidationError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn claims_at(issued_at: DateTime<Utc>, ttl: Duration) -> SessionClaims {
        SessionClaims {
            sub: AccountId::new(),
            role: Role::Parent,
            issued_at,
            expires_at: issued_at + ttl,
        }
    }

    #[test]
    fn window_boundaries() {
        let t0 = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
        let claims = claims_at(t0, Duration::hours(1));

        assert_eq!(validate_claims(&claims, t0), Ok(()));
        assert_eq!(
            validate_claims(&claims, t0 - Duration::seconds(1)),
            Err(ClaimsValidationError::NotYetValid)
        );
        assert_eq!(
            validate_claims(&claims, t0 + Duration::hours(1)),
            Err(ClaimsValidationError::Expired)
        );
    }

    #[test]
    fn inverted_window_is_rejected() {
        let t0 = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
        let claims = claims_at(t0, Duration::zero());
        assert_eq!(
            validate_claims(&claims, t0),
            Err(ClaimsValidationError::InvalidTimeWindow)
        );
    }

    #[test]
    fn serializes_as_numeric_dates() {
        let t0 = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let claims = claims_at(t0, Duration::hours(1));
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["iat"], t0.timestamp());
        assert_eq!(json["exp"], t0.timestamp() + 3600);
        assert_eq!(json["role"], "parent");
    }
}
