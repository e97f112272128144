//! Versioned row storage for the ledger state engine.
//!
//! This crate provides:
//! - A redb-backed embedded key-value engine ([`StorageEngine`])
//! - The [`KvStore`] contract the adapter needs from that engine
//! - Physical key composition (`{table}_{row_key}`)
//! - The [`RowStorage`] adapter: `select` and atomic multi-table `commit`
//!   with per-row block hash and number stamps, guarded by one reader-writer lock

mod engine;
mod error;
mod keys;
mod kv;
mod row_storage;
mod tables;

pub use engine::StorageEngine;
pub use error::{LockMode, Result, StorageError, StorageOp};
pub use keys::{KEY_SEPARATOR, physical_key};
pub use kv::{KvError, KvStore, WriteBatch};
pub use row_storage::{RowStorage, Storage};
pub use tables::Tables;
