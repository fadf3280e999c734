//! Resource shapes.
//!
//! A [`ResourceSchema`] names a collection and describes the fields its records
//! usually carry. Only the defaults are acted upon: a field with a default is
//! filled in on create when the payload leaves it out. Nothing else is
//! validated beyond the `id`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::record::{ID_FIELD, Record};

/// A known field of a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Field name as it appears in records.
    pub name: String,

    /// Whether records are expected to carry this field.
    #[serde(default)]
    pub required: bool,

    /// Value filled in on create when the field is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl FieldSpec {
    /// A field that records are expected to carry.
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: true,
            default: None,
        }
    }

    /// An optional field with no default.
    pub fn optional(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: false,
            default: None,
        }
    }

    /// Sets the default value for this field.
    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }
}

/// The shape of one collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceSchema {
    /// Collection name, e.g. `albums`.
    pub name: String,

    /// Known fields, in the order records usually list them.
    pub fields: Vec<FieldSpec>,
}

impl ResourceSchema {
    /// Creates a schema with only the `id` field.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: vec![FieldSpec::required(ID_FIELD)],
        }
    }

    /// Adds a field.
    pub fn with_field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// Returns the field names.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Fills in defaulted fields the record does not carry.
    pub fn apply_defaults(&self, record: &mut Record) {
        for field in &self.fields {
            if let Some(default) = &field.default {
                if !record.contains_key(&field.name) {
                    record.insert(field.name.clone(), default.clone());
                }
            }
        }
    }

    /// The six standard collections served out of the box.
    pub fn defaults() -> Vec<ResourceSchema> {
        vec![
            ResourceSchema::new("albums")
                .with_field(FieldSpec::required("userId"))
                .with_field(FieldSpec::required("title")),
            ResourceSchema::new("users")
                .with_field(FieldSpec::required("name"))
                .with_field(FieldSpec::required("username"))
                .with_field(FieldSpec::required("email"))
                .with_field(FieldSpec::optional("address"))
                .with_field(FieldSpec::optional("phone"))
                .with_field(FieldSpec::optional("website"))
                .with_field(FieldSpec::optional("company")),
            ResourceSchema::new("posts")
                .with_field(FieldSpec::required("userId"))
                .with_field(FieldSpec::required("title"))
                .with_field(FieldSpec::optional("body")),
            ResourceSchema::new("comments")
                .with_field(FieldSpec::required("postId"))
                .with_field(FieldSpec::required("name"))
                .with_field(FieldSpec::required("email"))
                .with_field(FieldSpec::optional("body")),
            ResourceSchema::new("photos")
                .with_field(FieldSpec::required("albumId"))
                .with_field(FieldSpec::required("title"))
                .with_field(FieldSpec::required("url"))
                .with_field(FieldSpec::optional("thumbnailUrl")),
            ResourceSchema::new("todos")
                .with_field(FieldSpec::required("userId"))
                .with_field(FieldSpec::required("title"))
                .with_field(FieldSpec::required("completed").with_default(Value::Bool(false))),
        ]
    }
}
