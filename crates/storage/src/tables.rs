//! Table definitions for redb storage.
//!
//! Row blobs live in a single table. The physical key composed by the keys
//! module is the only index.

use redb::TableDefinition;

/// Table definitions for row storage.
pub struct Tables;

impl Tables {
    /// Row storage: physical key → serialized row blob
    /// Key format: {table_name}_{row_key}
    pub const ROWS: TableDefinition<'static, &'static [u8], &'static [u8]> =
        TableDefinition::new("rows");
}
