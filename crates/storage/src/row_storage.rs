//! Row storage adapter.
//!
//! Reads and commits table-shaped rows on top of a [`KvStore`]:
//! - `select` looks up one physical key and returns its live rows
//! - `commit` encodes every non-empty row group of every table into one
//!   atomic batched write, stamping each row with the block hash and number
//!
//! # Locking
//!
//! One reader-writer lock guards the store. Any number of `select` calls run
//! concurrently; a `commit` excludes every other `select` and `commit` while
//! its batch is applied. Encoding happens before the write lock is taken.
//! With `lock_timeout` configured, a call that cannot get the lock in time
//! fails with [`StorageError::LockTimeout`] instead of waiting forever.

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use rowstore_types::config::StorageConfig;
use rowstore_types::{Entries, Hash, TableData, decode_entries, encode_entries};
use snafu::ResultExt;
use tracing::{debug, error, trace, warn};

use crate::error::{CodecSnafu, LockMode, Result, StorageError, StorageOp};
use crate::keys::physical_key;
use crate::kv::{KvStore, WriteBatch};

/// Versioned row storage as seen by the table layer above it.
pub trait Storage: Send + Sync {
    /// Returns the live rows stored under `key` in `table`.
    ///
    /// A key that was never written yields an empty collection.
    fn select(&self, table: &str, key: &str) -> Result<Entries>;

    /// Writes every non-empty row group in `tables` atomically, stamping each
    /// row with `hash` and `number`.
    ///
    /// Returns the number of physical keys written.
    fn commit(&self, hash: &Hash, number: i64, tables: &[TableData]) -> Result<usize>;

    /// Whether the storage expects only dirty rows in a commit.
    fn only_dirty(&self) -> bool;
}

/// [`Storage`] over a shared [`KvStore`] handle.
///
/// The store is created and torn down by its owner; the adapter only holds a
/// shared reference to it.
pub struct RowStorage<S> {
    store: Arc<S>,
    lock: RwLock<()>,
    config: StorageConfig,
}

impl<S: KvStore> RowStorage<S> {
    /// Creates an adapter with the default configuration.
    pub fn new(store: Arc<S>) -> Self {
        Self::with_config(store, StorageConfig::default())
    }

    /// Creates an adapter with the given configuration.
    pub fn with_config(store: Arc<S>, config: StorageConfig) -> Self {
        Self { store, lock: RwLock::new(()), config }
    }

    /// The shared store handle.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    fn read_guard(&self) -> Result<RwLockReadGuard<'_, ()>> {
        let Some(timeout) = self.config.lock_timeout else {
            return Ok(self.lock.read());
        };
        self.lock.try_read_for(timeout).ok_or_else(|| {
            warn!(timeout = ?timeout, "Timed out waiting for storage read lock");
            StorageError::LockTimeout { mode: LockMode::Read, timeout }
        })
    }

    fn write_guard(&self) -> Result<RwLockWriteGuard<'_, ()>> {
        let Some(timeout) = self.config.lock_timeout else {
            return Ok(self.lock.write());
        };
        self.lock.try_write_for(timeout).ok_or_else(|| {
            warn!(timeout = ?timeout, "Timed out waiting for storage write lock");
            StorageError::LockTimeout { mode: LockMode::Write, timeout }
        })
    }
}

impl<S: KvStore> Storage for RowStorage<S> {
    fn select(&self, table: &str, key: &str) -> Result<Entries> {
        let entry_key = physical_key(table, key);
        let _guard = self.read_guard()?;

        let value = self.store.get(entry_key.as_bytes()).map_err(|source| {
            error!(key = %entry_key, error = %source, "Query store failed");
            StorageError::Io { operation: StorageOp::Query, source }
        })?;

        let Some(value) = value else {
            return Ok(Entries::new());
        };

        decode_entries(&value)
            .inspect_err(|e| error!(key = %entry_key, error = %e, "Stored rows are corrupt"))
            .context(CodecSnafu { key: entry_key })
    }

    fn commit(&self, hash: &Hash, number: i64, tables: &[TableData]) -> Result<usize> {
        let mut batch = WriteBatch::new();
        let mut total = 0usize;

        for table in tables {
            for (key, entries) in &table.data {
                if entries.is_empty() {
                    continue;
                }
                let entry_key = physical_key(&table.table_name, key);
                let blob = encode_entries(entries, hash, number)
                    .inspect_err(|e| error!(key = %entry_key, error = %e, "Row encoding failed"))
                    .context(CodecSnafu { key: entry_key.as_str() })?;

                trace!(key = %entry_key, entries = entries.len(), len = blob.len(), "Staged rows");
                batch.put(entry_key, blob);
                total += 1;
            }
        }

        let _guard = self.write_guard()?;
        self.store.write(batch, self.config.durability).map_err(|source| {
            error!(block_number = number, keys = total, error = %source, "Commit store failed");
            StorageError::Io { operation: StorageOp::Commit, source }
        })?;

        debug!(block_number = number, keys = total, "Committed rows");
        Ok(total)
    }

    fn only_dirty(&self) -> bool {
        false
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::disallowed_methods)]
mod tests {
    use std::time::Duration;

    use rowstore_types::{Entry, EntryStatus, HASH_FIELD, NUM_FIELD};

    use super::*;
    use crate::engine::StorageEngine;

    fn create_test_storage() -> RowStorage<StorageEngine> {
        let engine = StorageEngine::open_in_memory().expect("open engine");
        RowStorage::new(Arc::new(engine))
    }

    fn row(fields: &[(&str, &str)]) -> Entry {
        fields.iter().map(|(k, v)| (*k, *v)).collect()
    }

    fn table(name: &str, rows: &[(&str, Vec<Entry>)]) -> TableData {
        let mut data = TableData::new(name);
        for (key, entries) in rows {
            data.insert(*key, Entries::from(entries.clone()));
        }
        data
    }

    #[test]
    fn test_commit_then_select() {
        let storage = create_test_storage();
        let hash = [0xAA; 32];

        let written = storage
            .commit(&hash, 42, &[table("acc", &[("alice", vec![row(&[("balance", "100")])])])])
            .unwrap();
        assert_eq!(written, 1);

        let entries = storage.select("acc", "alice").unwrap();
        assert_eq!(entries.len(), 1);
        let entry = entries.get(0).unwrap();
        assert_eq!(entry.get_field("balance"), Some("100"));
        assert_eq!(entry.get_field(HASH_FIELD), Some("aa".repeat(32).as_str()));
        assert_eq!(entry.get_field(NUM_FIELD), Some("42"));
        assert_eq!(entry.len(), 3);
        assert!(!entry.dirty());
    }

    #[test]
    fn test_select_never_written_is_empty() {
        let storage = create_test_storage();
        assert!(storage.select("acc", "nobody").unwrap().is_empty());
    }

    #[test]
    fn test_commit_counts_keys_not_rows() {
        let storage = create_test_storage();
        let rows = vec![row(&[("n", "1")]), row(&[("n", "2")]), row(&[("n", "3")])];

        let written = storage.commit(&[1; 32], 1, &[table("t", &[("k", rows)])]).unwrap();
        assert_eq!(written, 1);
        assert_eq!(storage.select("t", "k").unwrap().len(), 3);
    }

    #[test]
    fn test_commit_skips_empty_groups() {
        let storage = create_test_storage();

        let written = storage
            .commit(
                &[1; 32],
                7,
                &[table("t", &[("empty", vec![]), ("full", vec![row(&[("a", "b")])])])],
            )
            .unwrap();
        assert_eq!(written, 1);
        assert_eq!(storage.store().get(b"t_empty").unwrap(), None, "no physical write");
    }

    #[test]
    fn test_commit_rewrites_whole_group() {
        let storage = create_test_storage();
        let two = vec![row(&[("v", "1")]), row(&[("v", "2")])];
        storage.commit(&[1; 32], 1, &[table("t", &[("k", two)])]).unwrap();
        storage.commit(&[2; 32], 2, &[table("t", &[("k", vec![row(&[("v", "3")])])])]).unwrap();

        let entries = storage.select("t", "k").unwrap();
        assert_eq!(entries.len(), 1);
        let entry = entries.get(0).unwrap();
        assert_eq!(entry.get_field("v"), Some("3"));
        assert_eq!(entry.block_hash(), Some([2; 32]));
        assert_eq!(entry.block_number(), Some(2));
    }

    #[test]
    fn test_deleted_rows_are_stored_but_not_selected() {
        let storage = create_test_storage();
        let mut tombstone = row(&[("name", "old")]);
        tombstone.set_status(EntryStatus::Deleted);
        let live = row(&[("name", "new")]);

        storage.commit(&[3; 32], 3, &[table("t", &[("k", vec![tombstone, live])])]).unwrap();

        let raw = storage.store().get(b"t_k").unwrap().expect("stored");
        assert!(String::from_utf8(raw).unwrap().contains("old"));

        let entries = storage.select("t", "k").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries.get(0).unwrap().get_field("name"), Some("new"));
    }

    #[test]
    fn test_all_deleted_group_selects_empty() {
        let storage = create_test_storage();
        let mut tombstone = row(&[("name", "old")]);
        tombstone.set_status(EntryStatus::Deleted);

        let written = storage.commit(&[3; 32], 3, &[table("t", &[("k", vec![tombstone])])]);
        assert_eq!(written.unwrap(), 1);
        assert!(storage.select("t", "k").unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_blob_is_codec_error() {
        let storage = create_test_storage();
        let mut batch = WriteBatch::new();
        batch.put("t_k", "{\"values\": [");
        storage.store().write(batch, Default::default()).unwrap();

        let err = storage.select("t", "k").unwrap_err();
        assert!(matches!(err, StorageError::Codec { ref key, .. } if key == "t_k"), "{err}");
    }

    #[test]
    fn test_empty_commit_writes_nothing() {
        let storage = create_test_storage();
        assert_eq!(storage.commit(&[0; 32], 0, &[]).unwrap(), 0);
        assert_eq!(storage.commit(&[0; 32], 0, &[TableData::new("t")]).unwrap(), 0);
    }

    #[test]
    fn test_only_dirty_is_false() {
        assert!(!create_test_storage().only_dirty());
    }

    #[test]
    fn test_read_lock_timeout_while_write_held() {
        let engine = StorageEngine::open_in_memory().expect("open engine");
        let config = StorageConfig::builder()
            .lock_timeout(Duration::from_millis(20))
            .build()
            .expect("valid config");
        let storage = RowStorage::with_config(Arc::new(engine), config);

        let held = storage.lock.write();
        let err = storage.select("t", "k").unwrap_err();
        assert!(matches!(err, StorageError::LockTimeout { mode: LockMode::Read, .. }));
        let err = storage.commit(&[0; 32], 0, &[]).unwrap_err();
        assert!(matches!(err, StorageError::LockTimeout { mode: LockMode::Write, .. }));
        drop(held);

        assert!(storage.select("t", "k").unwrap().is_empty());
    }

    #[test]
    fn test_write_lock_timeout_while_read_held() {
        let engine = StorageEngine::open_in_memory().expect("open engine");
        let config = StorageConfig::builder()
            .lock_timeout(Duration::from_millis(20))
            .build()
            .expect("valid config");
        let storage = RowStorage::with_config(Arc::new(engine), config);

        let reader = storage.lock.read();
        let rows = vec![row(&[("a", "b")])];
        let err = storage.commit(&[0; 32], 0, &[table("t", &[("k", rows)])]).unwrap_err();
        assert!(matches!(err, StorageError::LockTimeout { mode: LockMode::Write, .. }));
        drop(reader);

        assert!(storage.select("t", "k").unwrap().is_empty(), "timed out commit wrote nothing");
    }
}
