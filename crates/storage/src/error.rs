//! Errors returned by the row storage adapter.
//!
//! # Recovery Guide
//!
//! | Variant       | Retryable | Recovery Action                                          |
//! | ------------- | --------- | -------------------------------------------------------- |
//! | `Io`          | Maybe     | Check disk health; a failed commit has unknown durability |
//! | `Codec`       | No        | Stored bytes are corrupt; restore or re-commit the key   |
//! | `LockTimeout` | Yes       | Retry with backoff                                        |

use std::fmt;
use std::time::Duration;

use rowstore_types::{CodecError, ErrorCode};
use snafu::Snafu;

use crate::kv::KvError;

/// Adapter operation that touched the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageOp {
    /// Point lookup from `select`.
    Query,
    /// Batched write from `commit`.
    Commit,
}

impl fmt::Display for StorageOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Query => write!(f, "Query"),
            Self::Commit => write!(f, "Commit"),
        }
    }
}

/// Mode the storage lock was requested in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockMode {
    Read,
    Write,
}

impl fmt::Display for LockMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => write!(f, "read"),
            Self::Write => write!(f, "write"),
        }
    }
}

/// Row storage error types.
///
/// Every variant aborts the whole `select` or `commit`; nothing is partially
/// returned or partially applied.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum StorageError {
    /// The underlying store failed a read or the batched write.
    #[snafu(display("{operation} store failed: {source}"))]
    Io { operation: StorageOp, source: KvError },

    /// Bytes at `key` are not a row blob, or rows for `key` could not be encoded.
    #[snafu(display("Row codec failed for key {key}: {source}"))]
    Codec { key: String, source: CodecError },

    /// The storage lock was not acquired in time. No I/O was attempted.
    #[snafu(display("Timed out after {timeout:?} waiting for {mode} lock"))]
    LockTimeout { mode: LockMode, timeout: Duration },
}

impl StorageError {
    /// Returns the machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Io { .. } => ErrorCode::StorageIo,
            Self::Codec { .. } => ErrorCode::StorageCorruption,
            Self::LockTimeout { .. } => ErrorCode::StorageLockTimeout,
        }
    }

    /// Whether the caller may retry the operation as-is.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        self.code().is_retryable()
    }
}

/// Result type for row storage operations.
pub type Result<T, E = StorageError> = std::result::Result<T, E>;
