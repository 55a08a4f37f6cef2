//! Inspection API handlers.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use log::{debug, error};
use serde_json::{json, Value};
use thiserror::Error;

use super::super::types::AppState;
use crate::batch::{run_inspection, ProgressTracker};
use crate::inspect::InspectionContext;
use crate::models::Site;

const INVALID_INPUT: &str = "Invalid input. Expected { websites: [...] }";

#[derive(Error, Debug)]
enum RequestError {
    #[error("body is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("`websites` is missing or not an array")]
    MissingWebsites,

    #[error("websites[{index}] is not an {{id, url}} object: {source}")]
    InvalidSite {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Extracts the `websites` array from a request body.
fn parse_websites(body: &[u8]) -> Result<Vec<Site>, RequestError> {
    let value: Value = serde_json::from_slice(body)?;
    let websites = value
        .get("websites")
        .and_then(Value::as_array)
        .ok_or(RequestError::MissingWebsites)?;
    websites
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            serde_json::from_value::<Site>(entry.clone())
                .map_err(|source| RequestError::InvalidSite { index, source })
        })
        .collect()
}

/// `POST /api/screenshot`: full inspection with capture
pub async fn inspect_handler(State(state): State<AppState>, body: Bytes) -> Response {
    let ctx = Arc::clone(&state.full);
    run_request(state, ctx, &body).await
}

/// `POST /api/screenshot-fast`: liveness and certificate only
pub async fn fast_inspect_handler(State(state): State<AppState>, body: Bytes) -> Response {
    let ctx = Arc::clone(&state.fast);
    run_request(state, ctx, &body).await
}

async fn run_request(state: AppState, ctx: Arc<InspectionContext>, body: &[u8]) -> Response {
    let sites = match parse_websites(body) {
        Ok(sites) => sites,
        Err(e) => {
            debug!("Rejected inspection request: {e}");
            return (StatusCode::BAD_REQUEST, Json(json!({ "error": INVALID_INPUT })))
                .into_response();
        }
    };

    let tracker = Arc::new(ProgressTracker::new(&sites));
    state.set_latest(Arc::clone(&tracker));

    // A panic inside the run comes back as a JoinError and is answered with 500
    match tokio::spawn(run_inspection(ctx, sites, tracker)).await {
        Ok(outcome) => {
            state.counters.record(&outcome.report);
            (StatusCode::OK, Json(outcome.results)).into_response()
        }
        Err(e) => {
            error!("Inspection run failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal Server Error", "details": e.to_string() })),
            )
                .into_response()
        }
    }
}

/// `OPTIONS` on the API routes (CORS preflight)
pub async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Any other method on the API routes
pub async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, "POST, OPTIONS")],
        Json(json!({ "error": "Method Not Allowed. Use POST." })),
    )
        .into_response()
}
