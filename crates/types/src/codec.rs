//! Row codec: converts row collections to and from stored blobs.
//!
//! The stored format is a JSON object with a single `values` array. Each
//! element is a flat object of the row's fields plus the commit stamp:
//!
//! ```text
//! {"values":[{"balance":"100","_hash_":"aaaa…","_num_":42}, …]}
//! ```
//!
//! Encoding always writes `_hash_` and `_num_`, overwriting any caller field
//! of the same name. Decoding keeps only rows whose status is normal.

use serde_json::{Map, Value};
use snafu::{ResultExt, Snafu};

use crate::hash::{Hash, hash_to_hex};
use crate::types::{Entries, Entry, EntryStatus, HASH_FIELD, NUM_FIELD};

/// Name of the array holding the rows of a blob.
pub const VALUES_FIELD: &str = "values";

/// Error type for codec operations.
#[derive(Debug, Snafu)]
pub enum CodecError {
    /// Stored bytes are not valid JSON.
    #[snafu(display("Malformed row blob: {source}"))]
    Json {
        /// The underlying parser error.
        source: serde_json::Error,
    },

    /// JSON parsed but does not have the row blob shape.
    #[snafu(display("Unexpected row blob shape: {message}"))]
    Shape {
        /// What was wrong with the shape.
        message: String,
    },

    /// A row carries a status value that is not an integer.
    #[snafu(display("Invalid row status {value:?}"))]
    InvalidStatus {
        /// The stored status value.
        value: String,
    },

    /// Serializing a row collection failed.
    #[snafu(display("Encoding failed: {source}"))]
    Encode {
        /// The underlying serializer error.
        source: serde_json::Error,
    },
}

/// Encodes rows into a blob, stamping each row with `hash` and `number`.
///
/// # Errors
///
/// Returns `CodecError::Encode` if serialization fails.
pub fn encode_entries(entries: &Entries, hash: &Hash, number: i64) -> Result<Vec<u8>, CodecError> {
    let hash_hex = hash_to_hex(hash);
    let values: Vec<Value> = entries
        .iter()
        .map(|entry| {
            let mut row: Map<String, Value> = entry
                .fields()
                .iter()
                .map(|(name, value)| (name.clone(), Value::String(value.clone())))
                .collect();
            row.insert(HASH_FIELD.to_string(), Value::String(hash_hex.clone()));
            row.insert(NUM_FIELD.to_string(), Value::from(number));
            Value::Object(row)
        })
        .collect();

    let mut blob = Map::with_capacity(1);
    blob.insert(VALUES_FIELD.to_string(), Value::Array(values));
    serde_json::to_vec(&Value::Object(blob)).context(EncodeSnafu)
}

/// Decodes a blob into its live rows.
///
/// Empty input means nothing is stored and yields an empty collection, as
/// does a blob without a `values` array. Decoded rows are clean.
///
/// # Errors
///
/// Returns `CodecError` if the bytes are not JSON, do not have the blob shape,
/// or a row carries a non-integer status.
pub fn decode_entries(bytes: &[u8]) -> Result<Entries, CodecError> {
    let mut entries = Entries::new();
    if bytes.is_empty() {
        return Ok(entries);
    }

    let mut blob = match serde_json::from_slice::<Value>(bytes).context(JsonSnafu)? {
        Value::Object(blob) => blob,
        other => {
            return ShapeSnafu { message: format!("expected object, found {}", kind(&other)) }
                .fail();
        },
    };

    let values = match blob.remove(VALUES_FIELD) {
        None | Some(Value::Null) => return Ok(entries),
        Some(Value::Array(values)) => values,
        Some(other) => {
            return ShapeSnafu {
                message: format!("`{VALUES_FIELD}` must be an array, found {}", kind(&other)),
            }
            .fail();
        },
    };

    for (index, value) in values.into_iter().enumerate() {
        let row = match value {
            Value::Object(row) => row,
            other => {
                return ShapeSnafu {
                    message: format!("row {index} must be an object, found {}", kind(&other)),
                }
                .fail();
            },
        };

        let mut entry = Entry::new();
        for (name, field) in row {
            let text = field_text(&field).ok_or_else(|| CodecError::Shape {
                message: format!("field `{name}` of row {index} is {}", kind(&field)),
            })?;
            entry.set_field(name, text);
        }

        // Any status other than normal hides the row, not only deleted
        let live = match entry.status_code() {
            Ok(code) => code == EntryStatus::Normal as i64,
            Err(value) => return InvalidStatusSnafu { value }.fail(),
        };
        if live {
            entry.set_dirty(false);
            entries.add_entry(entry);
        }
    }

    Ok(entries)
}

/// Text form of a scalar field value.
fn field_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
