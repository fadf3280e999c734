//! List handler.
//!
//! `GET [base]/[resource]`

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::error::RestResult;
use crate::operation::{Operation, execute};
use crate::state::AppState;

/// Handler for listing a collection.
///
/// Returns `{"data": [...]}` in insertion order, or 404 for an unknown
/// resource.
pub async fn list_handler(
    State(state): State<AppState>,
    Path(resource): Path<String>,
) -> RestResult<Response> {
    debug!(resource = %resource, "Processing list request");

    let envelope = execute(state.registry(), Operation::List { resource }).await?;
    Ok(envelope.into_response())
}
