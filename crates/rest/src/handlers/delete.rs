//! Delete handler.
//!
//! `DELETE [base]/[resource]/[id]`

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::error::RestResult;
use crate::operation::{Operation, execute};
use crate::state::AppState;

/// Handler for deleting a record.
///
/// # Response
///
/// - `200 OK` - `{"data": {}}`
/// - `404 Not Found` - Unknown resource or no such record
pub async fn delete_handler(
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, String)>,
) -> RestResult<Response> {
    debug!(resource = %resource, id = %id, "Processing delete request");

    let envelope = execute(
        state.registry(),
        Operation::Delete {
            resource: resource.clone(),
            id: id.clone(),
        },
    )
    .await?;

    debug!(resource = %resource, id = %id, "Record deleted");
    Ok(envelope.into_response())
}
