//! Transport-agnostic request execution.
//!
//! An [`Operation`] names one of the five record interactions. [`execute`]
//! runs it against a [`ResourceRegistry`] and produces an [`Envelope`], the
//! status plus the `data` payload. HTTP handlers only translate requests into
//! operations and envelopes into responses.

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use http::StatusCode;
use placeholder_persistence::{Record, ResourceRegistry};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::RestResult;

/// One record interaction against a named resource.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Insert a record, allocating an id if the payload has none.
    Create {
        /// Target collection.
        resource: String,
        /// The record to insert.
        payload: Record,
    },
    /// Return every record in insertion order.
    List {
        /// Target collection.
        resource: String,
    },
    /// Return one record.
    Read {
        /// Target collection.
        resource: String,
        /// Raw id from the path.
        id: String,
    },
    /// Merge a payload into an existing record.
    Update {
        /// Target collection.
        resource: String,
        /// Raw id from the path.
        id: String,
        /// Fields to overwrite.
        payload: Record,
    },
    /// Remove one record.
    Delete {
        /// Target collection.
        resource: String,
        /// Raw id from the path.
        id: String,
    },
}

impl Operation {
    /// Returns the collection this operation targets.
    pub fn resource(&self) -> &str {
        match self {
            Operation::Create { resource, .. }
            | Operation::List { resource }
            | Operation::Read { resource, .. }
            | Operation::Update { resource, .. }
            | Operation::Delete { resource, .. } => resource,
        }
    }

    /// Returns a short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Create { .. } => "create",
            Operation::List { .. } => "list",
            Operation::Read { .. } => "read",
            Operation::Update { .. } => "update",
            Operation::Delete { .. } => "delete",
        }
    }
}

/// The outcome of a successful operation.
///
/// Serialized as `{"data": ...}` with the given status.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    /// HTTP status to respond with.
    pub status: StatusCode,
    /// The `data` payload.
    pub data: Value,
}

impl Envelope {
    /// 200 with `data`.
    pub fn ok(data: Value) -> Self {
        Self {
            status: StatusCode::OK,
            data,
        }
    }

    /// 201 with `data`.
    pub fn created(data: Value) -> Self {
        Self {
            status: StatusCode::CREATED,
            data,
        }
    }

    /// Returns the `id` of the record in `data`, if any.
    pub fn record_id(&self) -> Option<&Value> {
        self.data.get("id")
    }
}

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({ "data": self.data }))).into_response()
    }
}

/// Runs `operation` against the matching store.
///
/// # Errors
///
/// Storage failures are converted with `From<StorageError>`, so an unknown
/// resource, a missing record, a duplicate key and backend trouble all come
/// back as the matching [`RestError`](crate::RestError).
pub async fn execute(registry: &ResourceRegistry, operation: Operation) -> RestResult<Envelope> {
    let store = registry.store_for(operation.resource())?;

    debug!(
        operation = operation.name(),
        resource = operation.resource(),
        "Executing operation"
    );

    let envelope = match operation {
        Operation::Create { payload, .. } => {
            let created = store.create(payload).await?;
            Envelope::created(Value::Object(created))
        }
        Operation::List { .. } => {
            let records = store.list().await?;
            Envelope::ok(Value::Array(
                records.into_iter().map(Value::Object).collect(),
            ))
        }
        Operation::Read { id, .. } => Envelope::ok(Value::Object(store.get(&id).await?)),
        Operation::Update { id, payload, .. } => {
            Envelope::ok(Value::Object(store.update(&id, payload).await?))
        }
        Operation::Delete { id, .. } => {
            store.delete(&id).await?;
            Envelope::ok(Value::Object(Map::new()))
        }
    };

    Ok(envelope)
}
