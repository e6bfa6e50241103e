//! SQLite-backed entity cache.
#![allow(clippy::cast_possible_wrap, reason = "row limits are far below i64::MAX")]

use super::{LocalStore, StoredRecord};
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use claimb_types::EntityKind;
use parking_lot::Mutex;
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Arc;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS entities (
        kind TEXT NOT NULL,
        owner TEXT NOT NULL,
        id TEXT NOT NULL,
        sort_key INTEGER NOT NULL,
        payload TEXT NOT NULL,
        synced_at INTEGER NOT NULL,
        PRIMARY KEY (kind, owner, id)
    );
    CREATE INDEX IF NOT EXISTS idx_entities_order ON entities (kind, owner, sort_key DESC);";

/// Store backed by a single SQLite connection.
///
/// Blocking SQLite calls run on tokio's blocking pool. Each `write` is one
/// transaction.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    pub fn open(path: &Path) -> AppResult<Self> {
        let conn = Connection::open(path)?;
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |_row| Ok(()))?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> AppResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> AppResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn: Arc::new(Mutex::new(conn)) })
    }

    async fn blocking<T, F>(&self, f: F) -> AppResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> AppResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn.lock();
            f(&mut guard)
        })
        .await?
    }
}

#[async_trait]
impl LocalStore for SqliteStore {
    async fn read(
        &self,
        kind: EntityKind,
        owner: &str,
        limit: Option<usize>,
    ) -> AppResult<Vec<StoredRecord>> {
        let owner = owner.to_string();
        let limit = limit.map_or(-1_i64, |n| n as i64);
        self.blocking(move |conn| {
            let mut stmt = conn.prepare_cached(
                "SELECT id, sort_key, payload FROM entities
                 WHERE kind = ?1 AND owner = ?2
                 ORDER BY sort_key DESC, id ASC
                 LIMIT ?3",
            )?;
            let rows = stmt.query_map(params![kind.as_str(), owner, limit], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?, row.get::<_, String>(2)?))
            })?;

            let mut records = Vec::new();
            for row in rows {
                let (id, sort_key, payload) = row?;
                let payload = serde_json::from_str(&payload).map_err(|e| {
                    AppError::Storage(format!("corrupt cached {} {}: {}", kind, id, e))
                })?;
                records.push(StoredRecord { id, sort_key, payload });
            }
            Ok(records)
        })
        .await
    }

    async fn write(
        &self,
        kind: EntityKind,
        owner: &str,
        records: Vec<StoredRecord>,
    ) -> AppResult<()> {
        let owner = owner.to_string();
        let synced_at = chrono::Utc::now().timestamp_millis();
        self.blocking(move |conn| {
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare_cached(
                    "INSERT INTO entities (kind, owner, id, sort_key, payload, synced_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                     ON CONFLICT (kind, owner, id) DO UPDATE SET
                         sort_key = excluded.sort_key,
                         payload = excluded.payload,
                         synced_at = excluded.synced_at",
                )?;
                for record in &records {
                    let payload = serde_json::to_string(&record.payload)?;
                    let _rows_affected: usize = stmt.execute(params![
                        kind.as_str(),
                        owner,
                        record.id,
                        record.sort_key,
                        payload,
                        synced_at
                    ])?;
                }
            }
            tx.commit()?;
            tracing::debug!(%kind, %owner, count = records.len(), "Cached records written");
            Ok(())
        })
        .await
    }

    async fn clear_all(&self) -> AppResult<()> {
        self.blocking(|conn| {
            let _rows_affected: usize = conn.execute("DELETE FROM entities", [])?;
            Ok(())
        })
        .await
    }
}
