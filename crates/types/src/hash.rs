//! Commit stamp hashes.
//!
//! Every committed row carries the hash of the block it was written for. The
//! hash is opaque to this crate: it is supplied by the caller, stored as
//! lowercase hex, and parsed back for provenance checks.

/// 32-byte block hash supplied with each commit.
pub type Hash = [u8; 32];

/// Length of a hash rendered as hex.
pub const HASH_HEX_LEN: usize = 64;

/// Zero hash: 32 zero bytes.
pub const ZERO_HASH: Hash = [0u8; 32];

/// Renders a hash as 64 lowercase hex characters.
#[inline]
pub fn hash_to_hex(hash: &Hash) -> String {
    hex::encode(hash)
}

/// Parses a 64-character hex string back into a hash.
///
/// Accepts upper or lower case. Returns `None` for any other length or
/// for non-hex characters.
pub fn parse_hash_hex(s: &str) -> Option<Hash> {
    if s.len() != HASH_HEX_LEN {
        return None;
    }
    let mut out = ZERO_HASH;
    hex::decode_to_slice(s, &mut out).ok()?;
    Some(out)
}
