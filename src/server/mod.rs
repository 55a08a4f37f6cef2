//! HTTP server for the inspection API.
//!
//! Routes:
//! - `POST /api/screenshot` - full inspection with capture
//! - `POST /api/screenshot-fast` - liveness and certificate only
//! - `GET /status` - JSON progress and counters
//! - `GET /metrics` - Prometheus-compatible metrics
//! - `GET /screenshots/*` - locally stored screenshots
//!
//! Every response carries permissive CORS headers.

mod handlers;
mod types;

use std::net::SocketAddr;

use anyhow::Context;
use axum::http::{header, HeaderValue};
use axum::middleware::map_response;
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use tower_http::services::ServeDir;

use handlers::{
    fast_inspect_handler, inspect_handler, method_not_allowed, metrics_handler, preflight,
    status_handler,
};
pub use types::{AppState, RunCounters};

async fn add_cors_headers(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET,POST,OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type, Authorization"),
    );
    response
}

/// Builds the application router.
pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route(
            "/api/screenshot",
            post(inspect_handler)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        .route(
            "/api/screenshot-fast",
            post(fast_inspect_handler)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        .route("/metrics", get(metrics_handler))
        .route("/status", get(status_handler));

    if let Some(dir) = &state.public_dir {
        router = router.nest_service("/screenshots", ServeDir::new(dir));
    }

    router
        .layer(map_response(add_cors_headers))
        .with_state(state)
}

/// Binds `addr` and serves the API until the process exits.
pub async fn start_server(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind inspection server to {addr}"))?;
    let local = listener.local_addr().context("Failed to read bound address")?;

    log::info!("Inspection server listening on http://{local}/");
    log::info!("  - Inspect: POST http://{local}/api/screenshot");
    log::info!("  - Fast:    POST http://{local}/api/screenshot-fast");
    log::info!("  - Status:  http://{local}/status");
    log::info!("  - Metrics: http://{local}/metrics");

    axum::serve(listener, build_router(state))
        .await
        .context("Inspection server error")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CaptureBackendKind, Config};

    #[tokio::test]
    async fn test_start_server_reports_bind_failure() {
        let mut config = Config::default();
        config.capture.backend = CaptureBackendKind::Disabled;
        let state = AppState::from_config(&config, None).unwrap();

        let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = taken.local_addr().unwrap();

        let err = start_server(addr, state)
            .await
            .expect_err("bind should fail while the port is taken");
        assert!(format!("{err:#}").contains("Failed to bind inspection server"));
    }
}
