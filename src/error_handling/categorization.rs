//! Error categorization.

use super::stats::ProcessingStats;
use super::types::ErrorType;

/// Categorizes a failed liveness probe request.
///
/// Status errors never reach here: a non-success response is a `down`
/// outcome, not a probe failure.
pub fn categorize_reqwest_error(error: &reqwest::Error) -> ErrorType {
    if error.is_timeout() {
        ErrorType::ProbeTimeoutError
    } else if error.is_connect() {
        ErrorType::ProbeConnectError
    } else if error.is_builder() {
        ErrorType::ProbeBuilderError
    } else {
        ErrorType::ProbeRequestError
    }
}

/// Records a probe failure in the processing statistics.
pub fn update_error_stats(stats: &ProcessingStats, error: &reqwest::Error) {
    stats.increment_error(categorize_reqwest_error(error));
}

/// Renders an error and its full source chain on one line.
///
/// `reqwest` keeps the interesting part ("dns error", "connection refused")
/// in the source chain, so the top-level `Display` alone is not enough for a
/// useful `error_message`.
pub fn error_chain_message(error: &(dyn std::error::Error + 'static)) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.contains(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Outer(Inner);
    #[derive(Debug)]
    struct Inner;

    impl std::fmt::Display for Outer {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "error sending request")
        }
    }
    impl std::error::Error for Outer {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            Some(&self.0)
        }
    }
    impl std::fmt::Display for Inner {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "dns error")
        }
    }
    impl std::error::Error for Inner {}

    #[test]
    fn test_error_chain_message_includes_sources() {
        let err = Outer(Inner);
        assert_eq!(error_chain_message(&err), "error sending request: dns error");
    }

    #[tokio::test]
    async fn test_categorize_builder_error() {
        let err = reqwest::Client::new()
            .head("not a url")
            .send()
            .await
            .expect_err("invalid URL should fail");
        assert_eq!(categorize_reqwest_error(&err), ErrorType::ProbeBuilderError);

        let stats = ProcessingStats::new();
        update_error_stats(&stats, &err);
        assert_eq!(stats.get_error_count(ErrorType::ProbeBuilderError), 1);
    }
}
