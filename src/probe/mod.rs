//! Liveness probing.
//!
//! A single HEAD request per invocation, no body, no retries. The outcome is
//! classified as `up` (2xx), `down` (any other status) or `error` (the request
//! itself failed).

use std::time::{Duration, Instant};

use log::debug;

use crate::error_handling::{error_chain_message, update_error_stats, ProcessingStats};
use crate::models::LivenessOutcome;

/// Probes `url` with a HEAD request bounded by `timeout`.
///
/// # Arguments
///
/// * `client` - Shared HTTP client
/// * `url` - Target URL (as registered; not normalized)
/// * `timeout` - Total deadline for the request
/// * `stats` - Failure counters
///
/// # Returns
///
/// `up` with the round-trip latency in milliseconds, `down` with
/// `HTTP Status: <code>`, or `error` with the request failure description.
pub async fn probe_liveness(
    client: &reqwest::Client,
    url: &str,
    timeout: Duration,
    stats: &ProcessingStats,
) -> LivenessOutcome {
    let start = Instant::now();
    match client.head(url).timeout(timeout).send().await {
        Ok(response) => {
            let elapsed_ms = start.elapsed().as_millis() as u64;
            let status = response.status();
            debug!("Probe {url} -> {status} in {elapsed_ms}ms");
            if status.is_success() {
                LivenessOutcome::up(elapsed_ms)
            } else {
                LivenessOutcome::down(status.as_u16())
            }
        }
        Err(e) => {
            update_error_stats(stats, &e);
            let message = error_chain_message(&e);
            debug!("Probe {url} failed: {message}");
            LivenessOutcome::error(message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handling::ErrorType;
    use crate::models::SiteStatus;
    use httptest::{matchers::*, responders::*, Expectation, Server};

    #[tokio::test]
    async fn test_probe_success_is_up_with_latency() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("HEAD", "/"))
                .respond_with(status_code(200)),
        );
        let url = server.url("/").to_string();
        let stats = ProcessingStats::new();

        let outcome =
            probe_liveness(&reqwest::Client::new(), &url, Duration::from_secs(5), &stats).await;

        assert_eq!(outcome.status, SiteStatus::Up);
        assert!(outcome.response_time_ms.is_some());
        assert!(outcome.error_message.is_none());
        assert_eq!(stats.total_errors(), 0);
    }

    #[tokio::test]
    async fn test_probe_non_success_is_down_with_code() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("HEAD", "/maintenance"))
                .respond_with(status_code(503)),
        );
        let url = server.url("/maintenance").to_string();
        let stats = ProcessingStats::new();

        let outcome =
            probe_liveness(&reqwest::Client::new(), &url, Duration::from_secs(5), &stats).await;

        assert_eq!(outcome.status, SiteStatus::Down);
        assert_eq!(outcome.error_message.as_deref(), Some("HTTP Status: 503"));
        assert!(outcome.response_time_ms.is_none());
    }

    #[tokio::test]
    async fn test_probe_sends_exactly_one_request() {
        let server = Server::run();
        // No retries: a 500 is observed once and reported
        server.expect(
            Expectation::matching(request::method_path("HEAD", "/flaky"))
                .times(1)
                .respond_with(status_code(500)),
        );
        let url = server.url("/flaky").to_string();
        let stats = ProcessingStats::new();

        let outcome =
            probe_liveness(&reqwest::Client::new(), &url, Duration::from_secs(5), &stats).await;
        assert_eq!(outcome.status, SiteStatus::Down);
    }

    #[tokio::test]
    async fn test_probe_timeout_is_error() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("HEAD", "/slow"))
                .respond_with(delay_and_then(
                    Duration::from_secs(3),
                    status_code(200),
                )),
        );
        let url = server.url("/slow").to_string();
        let stats = ProcessingStats::new();

        let outcome = probe_liveness(
            &reqwest::Client::new(),
            &url,
            Duration::from_millis(200),
            &stats,
        )
        .await;

        assert_eq!(outcome.status, SiteStatus::Error);
        assert!(outcome.error_message.is_some());
        assert_eq!(stats.get_error_count(ErrorType::ProbeTimeoutError), 1);
    }

    #[tokio::test]
    async fn test_probe_malformed_url_is_error() {
        let stats = ProcessingStats::new();
        let outcome = probe_liveness(
            &reqwest::Client::new(),
            "not a url",
            Duration::from_secs(1),
            &stats,
        )
        .await;
        assert_eq!(outcome.status, SiteStatus::Error);
        assert!(!outcome.error_message.unwrap_or_default().is_empty());
    }

    #[tokio::test]
    async fn test_probe_refused_connection_is_error() {
        // Bind then drop a listener to get a port nothing is listening on
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let stats = ProcessingStats::new();
        let outcome = probe_liveness(
            &reqwest::Client::new(),
            &format!("http://127.0.0.1:{port}/"),
            Duration::from_secs(2),
            &stats,
        )
        .await;
        assert_eq!(outcome.status, SiteStatus::Error);
        assert_eq!(stats.get_error_count(ErrorType::ProbeConnectError), 1);
    }
}
