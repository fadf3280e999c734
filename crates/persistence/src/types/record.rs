//! Record and record-id types.
//!
//! A [`Record`] is a JSON object whose field order is preserved. Every stored
//! record carries an `id` field holding a positive integer, represented here as
//! [`RecordId`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{StorageError, StorageResult};

/// Name of the key field carried by every record.
pub const ID_FIELD: &str = "id";

/// A stored record: an insertion-ordered map of field name to JSON value.
pub type Record = Map<String, Value>;

/// The key of a record within its collection.
///
/// Ids are positive integers that fit in an `i64`, so every backend can store
/// them natively.
///
/// # Examples
///
/// ```
/// use placeholder_persistence::types::RecordId;
///
/// assert_eq!(RecordId::parse("42"), Some(RecordId::new(42).unwrap()));
/// assert_eq!(RecordId::parse("no-id-like-this"), None);
/// assert_eq!(RecordId::parse("0"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(i64);

impl RecordId {
    /// The id handed out by a collection that has never held a record.
    pub const FIRST: RecordId = RecordId(1);

    /// Returns the id to allocate given a collection's high-water mark.
    ///
    /// `None` means the id space is exhausted: the mark is already `i64::MAX`.
    pub fn after(high_water: Option<RecordId>) -> Option<RecordId> {
        match high_water {
            Some(hw) => hw.next(),
            None => Some(Self::FIRST),
        }
    }

    /// Creates an id, returning `None` unless `value` is positive.
    pub fn new(value: i64) -> Option<Self> {
        (value > 0).then_some(Self(value))
    }

    /// Returns the raw integer value.
    pub fn get(self) -> i64 {
        self.0
    }

    /// Returns the id immediately after this one, or `None` at `i64::MAX`.
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }

    /// Parses an id from a path segment.
    ///
    /// Returns `None` for anything that is not a positive decimal integer.
    pub fn parse(raw: &str) -> Option<Self> {
        raw.trim().parse::<i64>().ok().and_then(Self::new)
    }

    /// Reads an id from a JSON value (an integer or a string of digits).
    pub fn from_value(value: &Value) -> Result<Self, String> {
        let parsed = match value {
            Value::Number(n) => n.as_i64().and_then(Self::new),
            Value::String(s) => Self::parse(s),
            _ => None,
        };
        parsed.ok_or_else(|| format!("`id` must be a positive integer, got {}", value))
    }

    /// Parses a path id for `resource`, mapping anything unparseable to
    /// [`StorageError::NotFound`].
    pub fn parse_key(resource: &str, raw: &str) -> StorageResult<Self> {
        Self::parse(raw).ok_or_else(|| StorageError::not_found(resource, raw))
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid record id: {}", s))
    }
}

impl From<RecordId> for Value {
    fn from(id: RecordId) -> Self {
        Value::from(id.0)
    }
}

/// Returns the id a stored record carries, if it has a valid one.
pub fn record_id(record: &Record) -> Option<RecordId> {
    record
        .get(ID_FIELD)
        .and_then(|v| RecordId::from_value(v).ok())
}

/// Reads the caller-supplied id of a payload.
///
/// An absent or `null` id means "allocate one"; anything else must be a valid
/// [`RecordId`] or the payload is rejected.
pub fn requested_id(resource: &str, record: &Record) -> StorageResult<Option<RecordId>> {
    match record.get(ID_FIELD) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => RecordId::from_value(value)
            .map(Some)
            .map_err(|message| StorageError::InvalidRecord {
                resource: resource.to_string(),
                message,
            }),
    }
}

/// Writes `id` into the record as a JSON integer.
///
/// An existing `id` field keeps its position; otherwise `id` becomes the first
/// field.
pub fn assign_id(record: &mut Record, id: RecordId) {
    if record.contains_key(ID_FIELD) {
        record.insert(ID_FIELD.to_string(), id.into());
    } else {
        let rest = std::mem::take(record);
        record.insert(ID_FIELD.to_string(), id.into());
        record.extend(rest);
    }
}

/// Shallow-merges `payload` into `target`.
///
/// Top-level payload fields replace the stored ones, every other stored field
/// is kept, and the stored `id` is never touched.
pub fn merge_into(target: &mut Record, payload: Record) {
    for (key, value) in payload {
        if key == ID_FIELD {
            continue;
        }
        target.insert(key, value);
    }
}
