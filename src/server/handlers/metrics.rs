//! Prometheus metrics handler.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt::Write;
use std::sync::atomic::Ordering;
use strum::IntoEnumIterator;

use super::super::types::AppState;
use crate::error_handling::ErrorType;

/// Prometheus-compatible metrics endpoint
pub async fn metrics_handler(State(state): State<AppState>) -> Response {
    let counters = &state.counters;
    let stats = &state.stats;

    let mut metrics = format!(
        r#"# HELP site_status_runs_total Inspection runs served
# TYPE site_status_runs_total counter
site_status_runs_total {}

# HELP site_status_sites_inspected_total Sites inspected across all runs
# TYPE site_status_sites_inspected_total counter
site_status_sites_inspected_total {}

# HELP site_status_sites_total Inspected sites by reported status
# TYPE site_status_sites_total counter
site_status_sites_total{{status="up"}} {}
site_status_sites_total{{status="down"}} {}
site_status_sites_total{{status="error"}} {}

# HELP site_status_captures_total Screenshots stored
# TYPE site_status_captures_total counter
site_status_captures_total {}

# HELP site_status_errors_total Errors encountered by category
# TYPE site_status_errors_total counter
"#,
        counters.runs.load(Ordering::SeqCst),
        counters.sites.load(Ordering::SeqCst),
        counters.up.load(Ordering::SeqCst),
        counters.down.load(Ordering::SeqCst),
        counters.error.load(Ordering::SeqCst),
        counters.captures.load(Ordering::SeqCst),
    );

    for error_type in ErrorType::iter() {
        let _ = writeln!(
            metrics,
            "site_status_errors_total{{category=\"{:?}\"}} {}",
            error_type,
            stats.get_error_count(error_type)
        );
    }

    let _ = write!(
        metrics,
        r#"
# HELP site_status_info_total Notable non-error events
# TYPE site_status_info_total counter
site_status_info_total {}
"#,
        stats.total_info()
    );

    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4")],
        metrics,
    )
        .into_response()
}
