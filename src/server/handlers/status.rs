//! JSON status handler.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::atomic::Ordering;

use super::super::types::{AppState, ErrorCounts, InfoCounts, StatusResponse};
use crate::error_handling::{ErrorType, InfoType};

/// JSON status endpoint: lifetime totals plus the progress of the latest run
pub async fn status_handler(State(state): State<AppState>) -> Response {
    let stats = &state.stats;
    let counters = &state.counters;

    let response = StatusResponse {
        uptime_seconds: state.start_time.elapsed().as_secs_f64(),
        runs: counters.runs.load(Ordering::SeqCst),
        sites_inspected: counters.sites.load(Ordering::SeqCst),
        up: counters.up.load(Ordering::SeqCst),
        down: counters.down.load(Ordering::SeqCst),
        error: counters.error.load(Ordering::SeqCst),
        captures: counters.captures.load(Ordering::SeqCst),
        current_run: state.latest_snapshot(),
        errors: ErrorCounts {
            total: stats.total_errors(),
            probe: stats.sum_errors(&[
                ErrorType::ProbeTimeoutError,
                ErrorType::ProbeConnectError,
                ErrorType::ProbeBuilderError,
                ErrorType::ProbeRequestError,
            ]),
            tls: stats.sum_errors(&[
                ErrorType::TlsConnectError,
                ErrorType::TlsHandshakeError,
                ErrorType::TlsTimeoutError,
                ErrorType::TlsCertificateError,
            ]),
            capture: stats.sum_errors(&[
                ErrorType::CaptureLaunchError,
                ErrorType::CaptureNavigationError,
                ErrorType::CaptureScreenshotError,
                ErrorType::CaptureProviderError,
            ]),
            storage: stats.sum_errors(&[
                ErrorType::StorageUploadError,
                ErrorType::StorageWriteError,
            ]),
            task_panic: stats.get_error_count(ErrorType::SiteTaskPanic),
        },
        info: InfoCounts {
            total: stats.total_info(),
            status_overridden: stats.get_info_count(InfoType::StatusOverridden),
            ssl_overridden: stats.get_info_count(InfoType::SslOverridden),
            capture_skipped: stats.get_info_count(InfoType::CaptureSkipped),
            certificate_expired: stats.get_info_count(InfoType::CertificateExpired),
        },
    };

    let json = match serde_json::to_string_pretty(&response) {
        Ok(json) => json,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to serialize status: {}", e),
            )
                .into_response();
        }
    };

    (StatusCode::OK, [("content-type", "application/json")], json).into_response()
}
