// Shared test helpers: a scripted capture backend and an in-process API server.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use site_status::capture::{CaptureBackend, CaptureEngine};
use site_status::config::{CaptureBackendKind, Config};
use site_status::error_handling::{CaptureError, ProcessingStats};
use site_status::server::{build_router, AppState};
use site_status::sink::{LocalDirSink, SinkChain};
use site_status::InspectionContext;

/// Capture backend that returns a tiny JPEG, or fails for URLs containing "broken".
#[derive(Default)]
pub struct ScriptedBackend {
    pub calls: AtomicUsize,
}

#[async_trait]
impl CaptureBackend for ScriptedBackend {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn capture(&self, url: &str) -> Result<Vec<u8>, CaptureError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if url.contains("broken") {
            return Err(CaptureError::Navigation {
                url: url.to_string(),
                reason: "net::ERR_CONNECTION_RESET".to_string(),
            });
        }
        Ok(vec![0xff, 0xd8, 0xff, 0xd9])
    }
}

impl ScriptedBackend {
    #[allow(dead_code)] // Used by some test files only
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

/// Config with short timeouts and no progress logging.
#[allow(dead_code)] // Used by some test files only
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.capture.backend = CaptureBackendKind::External;
    config.probe_timeout = Duration::from_secs(2);
    config.tls_timeout = Duration::from_secs(2);
    config.progress_interval = None;
    config
}

/// Inspection context that captures through `backend` into `dir`.
#[allow(dead_code)] // Used by some test files only
pub fn capture_context(
    backend: Arc<ScriptedBackend>,
    dir: &Path,
    stats: Arc<ProcessingStats>,
) -> Arc<InspectionContext> {
    let sinks = SinkChain::new(vec![Arc::new(LocalDirSink::new(dir))]);
    Arc::new(InspectionContext::new(
        test_config(),
        Arc::new(reqwest::Client::new()),
        CaptureEngine::new(backend, sinks),
        stats,
    ))
}

/// Liveness-only context sharing `stats`.
#[allow(dead_code)] // Used by some test files only
pub fn fast_context(stats: Arc<ProcessingStats>) -> Arc<InspectionContext> {
    Arc::new(InspectionContext::new(
        test_config().liveness_only(),
        Arc::new(reqwest::Client::new()),
        CaptureEngine::disabled(),
        stats,
    ))
}

/// Serves the API on an ephemeral port and returns its address.
#[allow(dead_code)] // Used by some test files only
pub async fn spawn_api(state: AppState) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local address");
    tokio::spawn(async move {
        let _ = axum::serve(listener, build_router(state)).await;
    });
    addr
}

/// A local port with nothing listening on it.
#[allow(dead_code)] // Used by some test files only
pub fn closed_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    listener.local_addr().expect("Failed to read address").port()
}
