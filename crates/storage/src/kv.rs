//! Contract of the underlying key-value store.
//!
//! The row storage adapter needs three things from its store: point reads
//! that report "not found" as `Ok(None)`, all-or-nothing batched writes with
//! a durability flag, and snapshot-consistent reads. [`KvStore`] captures
//! that contract; [`crate::StorageEngine`] implements it on redb.

use rowstore_types::config::CommitDurability;
use snafu::Snafu;

/// Errors reported by the underlying store.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum KvError {
    #[snafu(display("Failed to open database at {path}: {source}"))]
    Open { path: String, source: redb::DatabaseError },

    #[snafu(display("Transaction error: {source}"))]
    Transaction { source: redb::TransactionError },

    #[snafu(display("Table error: {source}"))]
    Table { source: redb::TableError },

    #[snafu(display("Storage error: {source}"))]
    Storage { source: redb::StorageError },

    #[snafu(display("Commit error: {source}"))]
    Commit { source: redb::CommitError },
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, KvError>;

/// Puts staged in memory and applied to the store as one atomic write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteBatch {
    puts: Vec<(Vec<u8>, Vec<u8>)>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages a put. A later put of the same key wins.
    pub fn put(&mut self, key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) {
        self.puts.push((key.into(), value.into()));
    }

    /// Number of staged puts.
    pub fn len(&self) -> usize {
        self.puts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.puts.is_empty()
    }

    /// Staged puts in staging order.
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &[u8])> {
        self.puts.iter().map(|(k, v)| (k.as_slice(), v.as_slice()))
    }
}

/// Byte-oriented ordered key-value store.
pub trait KvStore: Send + Sync {
    /// Reads one key from a consistent snapshot.
    ///
    /// A missing key is `Ok(None)`, never an error.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;

    /// Applies every put in `batch` atomically: all land or none do.
    fn write(&self, batch: WriteBatch, durability: CommitDurability) -> Result<()>;
}
