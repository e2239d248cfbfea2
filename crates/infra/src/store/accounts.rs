use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use lumora_auth::Account;
use lumora_core::{AccountId, Email};

use super::StoreError;

/// Account registry keyed by id, unique by normalized email.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Insert a new account. A taken email yields [`StoreError::Conflict`].
    async fn insert(&self, account: Account) -> Result<Account, StoreError>;

    async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, StoreError>;

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, StoreError>;
}

/// In-memory account store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    inner: RwLock<HashMap<AccountId, Account>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> StoreError {
    StoreError::Backend("account store lock poisoned".to_string())
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn insert(&self, account: Account) -> Result<Account, StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        if map.values().any(|a| a.email == account.email) {
            return Err(StoreError::Conflict("email already registered".to_string()));
        }
        map.insert(account.id, account.clone());
        Ok(account)
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, StoreError> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.values().find(|a| &a.email == email).cloned())
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.get(&id).cloned())
    }
}
