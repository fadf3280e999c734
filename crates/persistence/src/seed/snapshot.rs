//! Snapshot files.
//!
//! A snapshot is a JSON object mapping each resource name to an array of flat
//! record objects:
//!
//! ```json
//! {
//!   "albums": [{ "userId": 1, "id": 1, "title": "quidem molestiae enim" }],
//!   "users":  [{ "id": 1, "name": "Leanne Graham", "username": "Bret" }]
//! }
//! ```

use std::path::Path;

use serde_json::Value;

use crate::error::{SeedError, SeedResult};
use crate::types::Record;

/// The initial contents of every collection, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    collections: Vec<(String, Vec<Record>)>,
}

impl Snapshot {
    /// Reads a snapshot from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> SeedResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Parses a snapshot from JSON text.
    pub fn from_json_str(text: &str) -> SeedResult<Self> {
        Self::from_value(serde_json::from_str(text)?)
    }

    /// Builds a snapshot from an already parsed JSON value.
    pub fn from_value(value: Value) -> SeedResult<Self> {
        let Value::Object(root) = value else {
            return Err(invalid("top level must be an object of resource arrays"));
        };

        let mut collections = Vec::with_capacity(root.len());
        for (resource, entries) in root {
            let Value::Array(entries) = entries else {
                return Err(invalid(format!("`{}` must be an array of records", resource)));
            };

            let mut records = Vec::with_capacity(entries.len());
            for (position, entry) in entries.into_iter().enumerate() {
                match entry {
                    Value::Object(record) => records.push(record),
                    other => {
                        return Err(invalid(format!(
                            "`{}`[{}] must be an object, got {}",
                            resource,
                            position,
                            kind_of(&other)
                        )));
                    }
                }
            }
            collections.push((resource, records));
        }

        Ok(Self { collections })
    }

    /// Resource names in file order.
    pub fn resources(&self) -> impl Iterator<Item = &str> {
        self.collections.iter().map(|(name, _)| name.as_str())
    }

    /// Records of one resource.
    pub fn records(&self, resource: &str) -> Option<&[Record]> {
        self.collections
            .iter()
            .find(|(name, _)| name == resource)
            .map(|(_, records)| records.as_slice())
    }

    /// Iterates over `(resource, records)` pairs in file order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Record])> {
        self.collections
            .iter()
            .map(|(name, records)| (name.as_str(), records.as_slice()))
    }

    /// Keeps only the resources for which `keep` returns `true`.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.collections.retain(|(name, _)| keep(name));
    }

    /// Number of resources.
    pub fn len(&self) -> usize {
        self.collections.len()
    }

    /// Returns `true` if the snapshot names no resources.
    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    /// Total number of records across all resources.
    pub fn total_records(&self) -> usize {
        self.collections.iter().map(|(_, records)| records.len()).sum()
    }
}

fn invalid(message: impl Into<String>) -> SeedError {
    SeedError::InvalidSnapshot {
        message: message.into(),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_from_value_keeps_file_order() {
        let snapshot = Snapshot::from_value(json!({
            "users": [{"id": 1, "name": "Leanne Graham"}],
            "albums": [{"userId": 1, "id": 1, "title": "a"}, {"userId": 1, "id": 2, "title": "b"}]
        }))
        .unwrap();

        let names: Vec<_> = snapshot.resources().collect();
        assert_eq!(names, vec!["users", "albums"]);
        assert_eq!(snapshot.total_records(), 3);
        assert_eq!(snapshot.records("albums").unwrap()[1]["title"], json!("b"));
        assert!(snapshot.records("photos").is_none());
    }

    #[test]
    fn test_rejects_malformed_shapes() {
        assert!(matches!(
            Snapshot::from_value(json!([1, 2])),
            Err(SeedError::InvalidSnapshot { .. })
        ));
        assert!(matches!(
            Snapshot::from_value(json!({"albums": {"id": 1}})),
            Err(SeedError::InvalidSnapshot { .. })
        ));
        let err = Snapshot::from_value(json!({"albums": [{"id": 1}, 7]})).unwrap_err();
        assert!(err.to_string().contains("`albums`[1] must be an object, got a number"));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            Snapshot::from_json_str("{ not json"),
            Err(SeedError::Parse(_))
        ));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"todos": [{{"userId": 1, "id": 1, "title": "t", "completed": false}}]}}"#)
            .unwrap();

        let snapshot = Snapshot::from_path(file.path()).unwrap();
        assert_eq!(snapshot.len(), 1);

        let missing = Snapshot::from_path(file.path().with_extension("missing"));
        assert!(matches!(missing, Err(SeedError::Io { .. })));
    }

    #[test]
    fn test_retain() {
        let mut snapshot =
            Snapshot::from_value(json!({"albums": [], "users": [], "posts": []})).unwrap();
        snapshot.retain(|name| name != "users");
        assert_eq!(snapshot.resources().collect::<Vec<_>>(), vec!["albums", "posts"]);
    }
}
