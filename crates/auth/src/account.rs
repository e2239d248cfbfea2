use chrono::{DateTime, Utc};

use lumora_core::{AccountId, Email};

use crate::{PasswordHash, Role};

/// A registered account. Holds the password hash, never the plaintext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    pub email: Email,
    pub password_hash: PasswordHash,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn new(
        name: &str,
        email: Email,
        password_hash: PasswordHash,
        role: Role,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: AccountId::new(),
            name: name.trim().to_string(),
            email,
            password_hash,
            role,
            created_at,
        }
    }
}
