//! Row, commit stamp, codec, and configuration types for rowstore.
//!
//! This crate provides the foundational types shared by the storage adapter:
//! - Rows ([`Entry`]), row collections ([`Entries`]), and per-table commit batches ([`TableData`])
//! - The 32-byte commit [`Hash`] and its hex form
//! - The row codec that turns row collections into stored blobs and back
//! - Error codes and configuration

pub mod codec;
pub mod config;
pub mod error;
pub mod hash;
pub mod types;

// Re-export commonly used types at crate root
pub use codec::{CodecError, decode_entries, encode_entries};
pub use error::ErrorCode;
pub use hash::{Hash, ZERO_HASH, hash_to_hex, parse_hash_hex};
pub use types::*;
