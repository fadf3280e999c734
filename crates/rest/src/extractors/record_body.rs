//! Record body extractor.
//!
//! Extracts a JSON object from the request body.

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    response::{IntoResponse, Response},
};
use placeholder_persistence::Record;
use serde_json::Value;

use crate::error::RestError;

/// Axum extractor for a record payload.
///
/// The body must parse as JSON and be an object. Anything else is rejected
/// with `400 Bad Request` before a handler runs.
///
/// # Example
///
/// ```rust,ignore
/// use placeholder_rest::extractors::RecordBody;
///
/// async fn handler(RecordBody(record): RecordBody) {
///     println!("{} fields", record.len());
/// }
/// ```
#[derive(Debug)]
pub struct RecordBody(pub Record);

impl RecordBody {
    /// Consumes the extractor and returns the record.
    pub fn into_inner(self) -> Record {
        self.0
    }
}

/// Error type for record body extraction failures.
#[derive(Debug)]
pub enum RecordBodyRejection {
    /// The body could not be read.
    Unreadable(String),
    /// The body is not valid JSON.
    InvalidJson(String),
    /// The body is valid JSON but not an object.
    NotAnObject(&'static str),
}

impl IntoResponse for RecordBodyRejection {
    fn into_response(self) -> Response {
        let message = match self {
            RecordBodyRejection::Unreadable(msg) => format!("Failed to read body: {}", msg),
            RecordBodyRejection::InvalidJson(msg) => format!("Invalid JSON: {}", msg),
            RecordBodyRejection::NotAnObject(kind) => {
                format!("Record must be a JSON object, got {}", kind)
            }
        };
        RestError::BadRequest { message }.into_response()
    }
}

impl<S> FromRequest<S> for RecordBody
where
    S: Send + Sync,
{
    type Rejection = RecordBodyRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| RecordBodyRejection::Unreadable(e.to_string()))?;

        parse_record(&bytes).map(RecordBody)
    }
}

fn parse_record(bytes: &[u8]) -> Result<Record, RecordBodyRejection> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|e| RecordBodyRejection::InvalidJson(e.to_string()))?;

    match value {
        Value::Object(record) => Ok(record),
        Value::Array(_) => Err(RecordBodyRejection::NotAnObject("an array")),
        Value::String(_) => Err(RecordBodyRejection::NotAnObject("a string")),
        Value::Number(_) => Err(RecordBodyRejection::NotAnObject("a number")),
        Value::Bool(_) => Err(RecordBodyRejection::NotAnObject("a boolean")),
        Value::Null => Err(RecordBodyRejection::NotAnObject("null")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_object() {
        let record = parse_record(br#"{"title": "t", "id": 3}"#).unwrap();
        assert_eq!(record["title"], "t");
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["title", "id"]);
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            parse_record(b"{\"title\": "),
            Err(RecordBodyRejection::InvalidJson(_))
        ));
        assert!(matches!(
            parse_record(b""),
            Err(RecordBodyRejection::InvalidJson(_))
        ));
    }

    #[test]
    fn test_rejects_non_objects() {
        assert!(matches!(
            parse_record(b"[1, 2]"),
            Err(RecordBodyRejection::NotAnObject("an array"))
        ));
        assert!(matches!(
            parse_record(b"null"),
            Err(RecordBodyRejection::NotAnObject("null"))
        ));
    }
}
