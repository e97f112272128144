//! Machine-readable error codes for rowstore failures.
//!
//! Each error variant across the workspace maps to an [`ErrorCode`] with a
//! numeric identifier, retryability classification, and suggested recovery
//! action. Codes are organized into ranges:
//!
//! | Range     | Domain      | Examples                             |
//! |-----------|-------------|--------------------------------------|
//! | 1000–1099 | Storage     | Store I/O, lock acquisition          |
//! | 1100–1199 | Storage I/O | Corrupt or unreadable row blobs      |
//! | 3200–3299 | Application | Configuration                        |

use core::fmt;

/// Machine-readable error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    /// The underlying store reported a failure on read or batched write.
    StorageIo = 1000,
    /// The storage lock was not acquired within the configured timeout.
    StorageLockTimeout = 1001,
    /// Stored bytes could not be decoded as a row blob, or rows could not be encoded.
    StorageCorruption = 1101,
    /// Configuration error.
    AppConfig = 3201,
}

impl ErrorCode {
    /// Returns the numeric code value.
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Converts a numeric code to an `ErrorCode`, returning `None` for unknown values.
    #[must_use]
    pub fn from_u16(code: u16) -> Option<Self> {
        match code {
            1000 => Some(Self::StorageIo),
            1001 => Some(Self::StorageLockTimeout),
            1101 => Some(Self::StorageCorruption),
            3201 => Some(Self::AppConfig),
            _ => None,
        }
    }

    /// Whether this error is retryable.
    ///
    /// Nothing is retried inside rowstore; this classification is for the
    /// caller's retry policy.
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::StorageIo | Self::StorageLockTimeout)
    }

    /// Suggested recovery action for this error code.
    #[must_use]
    pub const fn suggested_action(self) -> &'static str {
        match self {
            Self::StorageIo => {
                "Check disk space, filesystem permissions, and I/O health. A failed commit has unknown durability; re-commit the block."
            },
            Self::StorageLockTimeout => {
                "Retry with backoff. A long-running commit or a burst of reads is holding the storage lock."
            },
            Self::StorageCorruption => {
                "Restore the affected key from backup or re-commit the block that last wrote it."
            },
            Self::AppConfig => "Fix the configuration value and restart.",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u16())
    }
}
