//! redb storage engine wrapper.
//!
//! Provides a thin wrapper around redb with:
//! - Database lifecycle management
//! - Convenient constructors
//! - The [`KvStore`] contract used by the row storage adapter

use std::path::Path;
use std::sync::Arc;

use redb::backends::InMemoryBackend;
use redb::{Database, Durability, ReadableTable, TableError};
use rowstore_types::config::CommitDurability;
use snafu::ResultExt;

use crate::kv::{
    CommitSnafu, KvError, KvStore, Result, StorageSnafu, TableSnafu, TransactionSnafu, WriteBatch,
};
use crate::tables::Tables;

/// Storage engine backed by redb.
///
/// The engine owns the database handle; clones share it. Opening and closing
/// the database is the embedding process's job. The row storage adapter only
/// ever borrows the engine through an `Arc`.
#[derive(Clone)]
pub struct StorageEngine {
    db: Arc<Database>,
}

#[allow(clippy::result_large_err)]
impl StorageEngine {
    /// Open or create a database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let db = Database::create(path)
            .map_err(|source| KvError::Open { path: path.display().to_string(), source })?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Create a new in-memory database, for tests.
    pub fn open_in_memory() -> Result<Self> {
        let db = Database::builder()
            .create_with_backend(InMemoryBackend::new())
            .map_err(|source| KvError::Open { path: ":memory:".to_string(), source })?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Get a clone of the database handle.
    pub fn db(&self) -> Arc<Database> {
        Arc::clone(&self.db)
    }
}

/// Maps the configured commit durability onto redb's.
fn redb_durability(durability: CommitDurability) -> Durability {
    match durability {
        CommitDurability::Relaxed => Durability::Eventual,
        CommitDurability::Immediate => Durability::Immediate,
    }
}

impl KvStore for StorageEngine {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let txn = self.db.begin_read().context(TransactionSnafu)?;
        let table = match txn.open_table(Tables::ROWS) {
            Ok(table) => table,
            // Nothing has been committed yet
            Err(TableError::TableDoesNotExist(_)) => return Ok(None),
            Err(source) => return Err(KvError::Table { source }),
        };

        let value = table.get(key).context(StorageSnafu)?;
        Ok(value.map(|guard| guard.value().to_vec()))
    }

    fn write(&self, batch: WriteBatch, durability: CommitDurability) -> Result<()> {
        let mut txn = self.db.begin_write().context(TransactionSnafu)?;
        txn.set_durability(redb_durability(durability));

        {
            let mut table = txn.open_table(Tables::ROWS).context(TableSnafu)?;
            for (key, value) in batch.iter() {
                table.insert(key, value).context(StorageSnafu)?;
            }
        }

        // Dropping an uncommitted transaction aborts it, so an early return
        // above leaves the store untouched.
        txn.commit().context(CommitSnafu)?;
        Ok(())
    }
}
