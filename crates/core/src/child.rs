//! Child records tracked on behalf of a parent account.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AccountId, ChildId, DomainError};

const MAX_CHILD_AGE: u8 = 25;

/// One entry in a child's progress log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub recorded_at: DateTime<Utc>,
    pub recorded_by: AccountId,
    /// Opaque prediction payload produced by the client-side model.
    pub prediction: serde_json::Value,
}

/// A child registered by a parent, optionally linked to a school account.
///
/// The progress log is append-only and kept in insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildRecord {
    pub id: ChildId,
    pub name: String,
    pub age: u8,
    pub parent_id: AccountId,
    pub school_id: Option<AccountId>,
    pub progress: Vec<ProgressSnapshot>,
    pub created_at: DateTime<Utc>,
}

impl ChildRecord {
    pub fn new(
        name: &str,
        age: u8,
        parent_id: AccountId,
        school_id: Option<AccountId>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("child name is required"));
        }
        if age > MAX_CHILD_AGE {
            return Err(DomainError::validation(format!(
                "child age must be at most {MAX_CHILD_AGE}"
            )));
        }

        Ok(Self {
            id: ChildId::new(),
            name: name.to_string(),
            age,
            parent_id,
            school_id,
            progress: Vec::new(),
            created_at,
        })
    }

    /// Whether `account` may see this record (its parent or linked school).
    pub fn is_visible_to(&self, account: AccountId) -> bool {
        self.parent_id == account || self.school_id == Some(account)
    }
}
