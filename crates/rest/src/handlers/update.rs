//! Update handler.
//!
//! `PUT [base]/[resource]/[id]` and `PATCH [base]/[resource]/[id]`

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::error::RestResult;
use crate::extractors::RecordBody;
use crate::operation::{Operation, execute};
use crate::state::AppState;

/// Handler for updating a record.
///
/// PUT and PATCH share merge semantics: fields in the body overwrite stored
/// ones, absent fields are kept, and the stored `id` never changes.
///
/// # Response
///
/// - `200 OK` - `{"data": <merged record>}`
/// - `400 Bad Request` - Body is not a JSON object
/// - `404 Not Found` - Unknown resource or no such record
///
/// # Example
///
/// ```http
/// PUT /todos/10 HTTP/1.1
/// Content-Type: application/json
///
/// {"title": "x"}
/// ```
pub async fn update_handler(
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, String)>,
    RecordBody(payload): RecordBody,
) -> RestResult<Response> {
    debug!(
        resource = %resource,
        id = %id,
        fields = payload.len(),
        "Processing update request"
    );

    let envelope = execute(
        state.registry(),
        Operation::Update {
            resource,
            id,
            payload,
        },
    )
    .await?;
    Ok(envelope.into_response())
}
