//! Create handler.
//!
//! `POST [base]/[resource]`

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::error::RestResult;
use crate::extractors::RecordBody;
use crate::operation::{Operation, execute};
use crate::state::AppState;

/// Handler for record creation.
///
/// The store allocates an id when the body has none.
///
/// # Response
///
/// - `201 Created` - `{"data": <record>}` with a `Location` header
/// - `400 Bad Request` - Body is not a JSON object, or `id` is not a positive integer
/// - `404 Not Found` - Unknown resource
/// - `500 Internal Server Error` - The id is already taken
///
/// # Example
///
/// ```http
/// POST /albums HTTP/1.1
/// Content-Type: application/json
///
/// {"userId": 1, "title": "New Album"}
/// ```
pub async fn create_handler(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    RecordBody(payload): RecordBody,
) -> RestResult<Response> {
    debug!(resource = %resource, "Processing create request");

    let envelope = execute(
        state.registry(),
        Operation::Create {
            resource: resource.clone(),
            payload,
        },
    )
    .await?;

    let location = envelope
        .record_id()
        .map(|id| state.config().record_url(&resource, id));

    debug!(resource = %resource, location = ?location, "Record created");

    match location {
        Some(location) => Ok(([(header::LOCATION, location)], envelope).into_response()),
        None => Ok(envelope.into_response()),
    }
}
