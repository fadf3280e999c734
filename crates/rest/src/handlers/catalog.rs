//! Catalog handler.
//!
//! `GET [base]/`

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::debug;

use crate::error::RestResult;
use crate::operation::Envelope;
use crate::state::AppState;

/// Lists every configured resource with its fields, record count and URL.
pub async fn catalog_handler(State(state): State<AppState>) -> RestResult<Response> {
    debug!("Processing catalog request");

    let base_url = state.base_url().trim_end_matches('/');
    let resources: Vec<_> = state
        .registry()
        .catalog()
        .await?
        .into_iter()
        .map(|summary| {
            json!({
                "name": summary.name,
                "url": format!("{}/{}", base_url, summary.name),
                "fields": summary.fields,
                "count": summary.count,
            })
        })
        .collect();

    Ok(Envelope::ok(json!({
        "backend": state.registry().backend_kind().to_string(),
        "resources": resources,
    }))
    .into_response())
}
