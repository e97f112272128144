//! Proptest strategies for rowstore domain types.
//!
//! Strategies produce well-formed rows and commit batches. Table names and row
//! keys never contain the key separator, so generated batches never collide
//! on a physical key.
//!
//! # Usage
//!
//! ```no_run
//! use rowstore_test_utils::strategies;
//! use proptest::prelude::*;
//!
//! proptest! {
//!     #[test]
//!     fn my_property(entries in strategies::arb_entries()) {
//!         // test invariant with randomly generated rows
//!     }
//! }
//! ```

use proptest::prelude::*;
use rowstore_types::{Entries, Entry, Hash, TableData};

/// Generates a field name that never starts with `_`, so it cannot clash with
/// the reserved stamp and status fields.
pub fn arb_field_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,15}"
}

/// Generates an arbitrary field value, including quotes, control characters,
/// and non-ASCII text.
pub fn arb_field_value() -> impl Strategy<Value = String> {
    any::<String>()
}

/// Generates a live row with 0-8 fields.
pub fn arb_entry() -> impl Strategy<Value = Entry> {
    proptest::collection::btree_map(arb_field_name(), arb_field_value(), 0..8)
        .prop_map(|fields| fields.into_iter().collect::<Entry>())
}

/// Generates 0-6 live rows.
pub fn arb_entries() -> impl Strategy<Value = Entries> {
    proptest::collection::vec(arb_entry(), 0..6).prop_map(Entries::from)
}

/// Generates an arbitrary 32-byte hash.
pub fn arb_hash() -> impl Strategy<Value = Hash> {
    any::<[u8; 32]>()
}

/// Generates a table name or row key without the `_` separator.
pub fn arb_key() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,11}"
}

/// Generates a table batch with 0-5 row keys, some of which may be empty.
pub fn arb_table_data() -> impl Strategy<Value = TableData> {
    (arb_key(), proptest::collection::btree_map(arb_key(), arb_entries(), 0..5)).prop_map(
        |(table_name, data)| TableData { table_name, data },
    )
}
