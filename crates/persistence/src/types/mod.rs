//! Core types for records and resource shapes.
//!
//! - [`Record`] / [`RecordId`] - Stored records and their keys
//! - [`ResourceSchema`] / [`FieldSpec`] - Collection shapes and create-time defaults

mod record;
mod schema;

pub use record::{
    ID_FIELD, Record, RecordId, assign_id, merge_into, record_id, requested_id,
};
pub use schema::{FieldSpec, ResourceSchema};
