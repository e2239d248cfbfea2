//! Normalized email address.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

const MAX_EMAIL_LEN: usize = 254;

/// A syntactically valid, normalized email address.
///
/// Normalization trims surrounding whitespace and lower-cases the whole
/// address, so uniqueness checks are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let email = raw.trim().to_lowercase();

        if email.is_empty() {
            return Err(DomainError::validation("email is required"));
        }
        if email.len() > MAX_EMAIL_LEN {
            return Err(DomainError::validation("email is too long"));
        }
        if email.chars().any(char::is_whitespace) {
            return Err(DomainError::validation("email must not contain whitespace"));
        }

        let (local, domain) = email
            .split_once('@')
            .ok_or_else(|| DomainError::validation("email must contain '@'"))?;

        if local.is_empty() || domain.contains('@') {
            return Err(DomainError::validation("email is malformed"));
        }
        if !domain.contains('.') || domain.split('.').any(str::is_empty) {
            return Err(DomainError::validation("email domain is malformed"));
        }

        Ok(Self(email))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Email {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Email {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}
