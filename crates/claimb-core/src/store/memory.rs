use super::{record_order, LocalStore, StoredRecord};
use crate::error::AppResult;
use async_trait::async_trait;
use claimb_types::EntityKind;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};

type Bucket = BTreeMap<String, StoredRecord>;

/// Process-local store. Each write holds the lock for the whole batch.
#[derive(Debug, Default)]
pub struct MemoryStore {
    buckets: RwLock<HashMap<(EntityKind, String), Bucket>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self, kind: EntityKind, owner: &str) -> usize {
        self.buckets.read().get(&(kind, owner.to_string())).map_or(0, BTreeMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.read().values().all(BTreeMap::is_empty)
    }
}

#[async_trait]
impl LocalStore for MemoryStore {
    async fn read(
        &self,
        kind: EntityKind,
        owner: &str,
        limit: Option<usize>,
    ) -> AppResult<Vec<StoredRecord>> {
        let buckets = self.buckets.read();
        let mut records: Vec<StoredRecord> = buckets
            .get(&(kind, owner.to_string()))
            .map(|bucket| bucket.values().cloned().collect())
            .unwrap_or_default();
        records.sort_by(record_order);
        if let Some(limit) = limit {
            records.truncate(limit);
        }
        Ok(records)
    }

    async fn write(
        &self,
        kind: EntityKind,
        owner: &str,
        records: Vec<StoredRecord>,
    ) -> AppResult<()> {
        let mut buckets = self.buckets.write();
        let bucket = buckets.entry((kind, owner.to_string())).or_default();
        for record in records {
            bucket.insert(record.id.clone(), record);
        }
        Ok(())
    }

    async fn clear_all(&self) -> AppResult<()> {
        self.buckets.write().clear();
        Ok(())
    }
}
