use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use lumora_core::{AccountId, ChildId, ChildRecord, ProgressSnapshot};

use super::StoreError;

#[async_trait]
pub trait ChildStore: Send + Sync {
    async fn insert(&self, child: ChildRecord) -> Result<ChildRecord, StoreError>;

    async fn get(&self, id: ChildId) -> Result<Option<ChildRecord>, StoreError>;

    /// Children whose parent or school is `account`, oldest first.
    async fn list_visible_to(&self, account: AccountId) -> Result<Vec<ChildRecord>, StoreError>;

    /// Append to the progress log and return the updated record.
    async fn append_progress(
        &self,
        id: ChildId,
        snapshot: ProgressSnapshot,
    ) -> Result<ChildRecord, StoreError>;
}

/// In-memory child store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryChildStore {
    inner: RwLock<HashMap<ChildId, ChildRecord>>,
}

impl InMemoryChildStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> StoreError {
    StoreError::Backend("child store lock poisoned".to_string())
}

#[async_trait]
impl ChildStore for InMemoryChildStore {
    async fn insert(&self, child: ChildRecord) -> Result<ChildRecord, StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        if map.contains_key(&child.id) {
            return Err(StoreError::Conflict(format!("child {} already exists", child.id)));
        }
        map.insert(child.id, child.clone());
        Ok(child)
    }

    async fn get(&self, id: ChildId) -> Result<Option<ChildRecord>, StoreError> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.get(&id).cloned())
    }

    async fn list_visible_to(&self, account: AccountId) -> Result<Vec<ChildRecord>, StoreError> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        let mut children: Vec<ChildRecord> = map
            .values()
            .filter(|c| c.is_visible_to(account))
            .cloned()
            .collect();
        children.sort_by_key(|c| (c.created_at, *c.id.as_uuid()));
        Ok(children)
    }

    async fn append_progress(
        &self,
        id: ChildId,
        snapshot: ProgressSnapshot,
    ) -> Result<ChildRecord, StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        let child = map.get_mut(&id).ok_or(StoreError::NotFound)?;
        child.progress.push(snapshot);
        Ok(child.clone())
    }
}
