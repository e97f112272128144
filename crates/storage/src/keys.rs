//! Physical key composition.
//!
//! Every row collection is stored under `{table_name}_{row_key}`. Table names
//! and row keys containing the separator can collide (`"a_b" + "c"` and
//! `"a" + "b_c"` compose to the same key); avoiding that is up to the caller.

/// Separator between table name and row key.
pub const KEY_SEPARATOR: char = '_';

/// Composes the physical key for a row key in a table.
///
/// Format: {table_name}_{row_key}
pub fn physical_key(table: &str, key: &str) -> String {
    let mut out = String::with_capacity(table.len() + 1 + key.len());
    out.push_str(table);
    out.push(KEY_SEPARATOR);
    out.push_str(key);
    out
}
