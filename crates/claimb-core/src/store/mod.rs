//! Local entity cache.
//!
//! The store is schema-agnostic: it keeps JSON payloads keyed by
//! `(kind, owner, id)` and ordered by a numeric sort key. Typed access goes
//! through [`read_entities`] / [`write_entities`].
//!
//! Writes merge by id and apply a whole batch or nothing.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::error::AppResult;
use async_trait::async_trait;
use claimb_types::{Entity, EntityKind};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub id: String,
    pub sort_key: i64,
    pub payload: serde_json::Value,
}

impl StoredRecord {
    pub fn from_entity<E: Entity>(entity: &E) -> AppResult<Self> {
        Ok(Self {
            id: entity.entity_id(),
            sort_key: entity.sort_key(),
            payload: serde_json::to_value(entity)?,
        })
    }

    pub fn into_entity<E: Entity>(self) -> AppResult<E> {
        Ok(serde_json::from_value(self.payload)?)
    }
}

/// Read order: newest first, ties by id ascending.
pub(crate) fn record_order(a: &StoredRecord, b: &StoredRecord) -> Ordering {
    b.sort_key.cmp(&a.sort_key).then_with(|| a.id.cmp(&b.id))
}

#[async_trait]
pub trait LocalStore: Send + Sync {
    /// Cached records for `owner`, newest first, at most `limit` of them.
    async fn read(
        &self,
        kind: EntityKind,
        owner: &str,
        limit: Option<usize>,
    ) -> AppResult<Vec<StoredRecord>>;

    /// Insert or replace `records` by id. Records not mentioned are kept.
    async fn write(
        &self,
        kind: EntityKind,
        owner: &str,
        records: Vec<StoredRecord>,
    ) -> AppResult<()>;

    /// Drop every cached record of every kind.
    async fn clear_all(&self) -> AppResult<()>;
}

pub async fn read_entities<E: Entity>(
    store: &dyn LocalStore,
    owner: &str,
    limit: Option<usize>,
) -> AppResult<Vec<E>> {
    store.read(E::KIND, owner, limit).await?.into_iter().map(StoredRecord::into_entity).collect()
}

pub async fn write_entities<E: Entity>(
    store: &dyn LocalStore,
    owner: &str,
    entities: &[E],
) -> AppResult<()> {
    if entities.is_empty() {
        return Ok(());
    }
    let records = entities.iter().map(StoredRecord::from_entity).collect::<AppResult<Vec<_>>>()?;
    store.write(E::KIND, owner, records).await
}
