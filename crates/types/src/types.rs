//! Row types shared by the codec and the storage adapter.
//!
//! - [`Entry`]: one row of named string fields plus a live/deleted status
//! - [`Entries`]: the ordered rows stored under one physical key
//! - [`TableData`]: the row-key → rows writes for one table in a commit

use std::collections::BTreeMap;
use std::fmt;

use crate::hash::{Hash, parse_hash_hex};

// ============================================================================
// Reserved Field Names
// ============================================================================

/// Field injected at commit time holding the block hash as lowercase hex.
pub const HASH_FIELD: &str = "_hash_";

/// Field injected at commit time holding the block number.
pub const NUM_FIELD: &str = "_num_";

/// Field holding the row status discriminant (`"0"` live, `"1"` deleted).
pub const STATUS_FIELD: &str = "_status_";

// ============================================================================
// Entry Status
// ============================================================================

/// Liveness of a row.
///
/// Persisted as the decimal discriminant in [`STATUS_FIELD`]. A row with no
/// status field is [`EntryStatus::Normal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EntryStatus {
    /// Live row, returned by reads.
    #[default]
    Normal = 0,
    /// Soft-deleted row, filtered out on decode.
    Deleted = 1,
}

impl EntryStatus {
    /// Returns the persisted field value for this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "0",
            Self::Deleted => "1",
        }
    }

    /// Parses a persisted status value. Only the exact discriminants match.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "0" => Some(Self::Normal),
            "1" => Some(Self::Deleted),
            _ => None,
        }
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "normal"),
            Self::Deleted => write!(f, "deleted"),
        }
    }
}

// ============================================================================
// Entry
// ============================================================================

/// One row: named string fields plus a dirty flag.
///
/// The dirty flag is bookkeeping for the caller and is never persisted.
/// Field order carries no meaning; fields are kept sorted so encoded rows
/// are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entry {
    fields: BTreeMap<String, String>,
    dirty: bool,
}

impl Entry {
    /// Creates an empty, clean row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value of a field, if set.
    pub fn get_field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Sets a field and marks the row dirty.
    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
        self.dirty = true;
    }

    /// Removes a field, returning its previous value.
    pub fn remove_field(&mut self, name: &str) -> Option<String> {
        let removed = self.fields.remove(name);
        if removed.is_some() {
            self.dirty = true;
        }
        removed
    }

    /// All fields of the row, including reserved ones.
    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    /// Number of fields in the row.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the row has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Status recorded in [`STATUS_FIELD`].
    ///
    /// Returns `None` if the field holds something other than a known
    /// discriminant.
    pub fn status(&self) -> Option<EntryStatus> {
        match self.fields.get(STATUS_FIELD) {
            None => Some(EntryStatus::Normal),
            Some(value) => EntryStatus::parse(value),
        }
    }

    /// Raw status discriminant as an integer. A missing field reads as `0`.
    ///
    /// # Errors
    ///
    /// Returns the unparsable text if the field is not a decimal integer.
    pub fn status_code(&self) -> Result<i64, &str> {
        match self.fields.get(STATUS_FIELD) {
            None => Ok(EntryStatus::Normal as i64),
            Some(value) => value.parse().map_err(|_| value.as_str()),
        }
    }

    /// Records a status on the row.
    pub fn set_status(&mut self, status: EntryStatus) {
        self.set_field(STATUS_FIELD, status.as_str());
    }

    /// Whether the row is a tombstone.
    pub fn is_deleted(&self) -> bool {
        self.status() == Some(EntryStatus::Deleted)
    }

    /// Caller bookkeeping flag.
    pub fn dirty(&self) -> bool {
        self.dirty
    }

    /// Sets the caller bookkeeping flag.
    pub fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }

    /// Block hash this row was committed under, if stamped.
    pub fn block_hash(&self) -> Option<Hash> {
        self.get_field(HASH_FIELD).and_then(parse_hash_hex)
    }

    /// Block number this row was committed under, if stamped.
    pub fn block_number(&self) -> Option<i64> {
        self.get_field(NUM_FIELD).and_then(|n| n.parse().ok())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Entry {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut entry = Self::new();
        for (name, value) in iter {
            entry.set_field(name, value);
        }
        entry
    }
}

// ============================================================================
// Entries
// ============================================================================

/// Rows sharing one physical key, in insertion or decode order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entries {
    entries: Vec<Entry>,
}

impl Entries {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a row.
    pub fn add_entry(&mut self, entry: Entry) {
        self.entries.push(entry);
    }

    /// Returns the row at `index`.
    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }
}

impl FromIterator<Entry> for Entries {
    fn from_iter<I: IntoIterator<Item = Entry>>(iter: I) -> Self {
        Self { entries: iter.into_iter().collect() }
    }
}

impl From<Vec<Entry>> for Entries {
    fn from(entries: Vec<Entry>) -> Self {
        Self { entries }
    }
}

impl IntoIterator for Entries {
    type Item = Entry;
    type IntoIter = std::vec::IntoIter<Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Entries {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// ============================================================================
// Table Data
// ============================================================================

/// Writes for one table within a commit.
///
/// Row keys iterate in lexicographic order, which fixes the order in which a
/// commit stages physical keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableData {
    /// Table the rows belong to.
    pub table_name: String,
    /// Row key → rows to store under that key.
    pub data: BTreeMap<String, Entries>,
}

impl TableData {
    /// Creates an empty batch for `table_name`.
    pub fn new(table_name: impl Into<String>) -> Self {
        Self { table_name: table_name.into(), data: BTreeMap::new() }
    }

    /// Sets the rows for a row key, replacing any previous rows.
    pub fn insert(&mut self, key: impl Into<String>, entries: Entries) {
        self.data.insert(key.into(), entries);
    }

    /// Number of row keys with at least one row.
    pub fn non_empty_keys(&self) -> usize {
        self.data.values().filter(|entries| !entries.is_empty()).count()
    }
}
