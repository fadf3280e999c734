//! Read handler.
//!
//! `GET [base]/[resource]/[id]`

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::error::RestResult;
use crate::operation::{Operation, execute};
use crate::state::AppState;

/// Handler for reading one record.
///
/// # Response
///
/// - `200 OK` - `{"data": <record>}`
/// - `404 Not Found` - Unknown resource, no such record, or an id that is not a positive integer
pub async fn read_handler(
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, String)>,
) -> RestResult<Response> {
    debug!(resource = %resource, id = %id, "Processing read request");

    let envelope = execute(state.registry(), Operation::Read { resource, id }).await?;
    Ok(envelope.into_response())
}
