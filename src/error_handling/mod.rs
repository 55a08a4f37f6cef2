//! Error handling and processing statistics.
//!
//! This module provides:
//! - Typed errors for initialization, certificate, capture and storage failures
//! - Processing statistics tracking (error and info counters)
//! - Categorization of probe failures
//!
//! Failures inside the enrichment subsystems never propagate past the
//! orchestrator; they are counted here and collapsed into the merged result.

mod categorization;
mod stats;
mod types;

// Re-export public API
pub use categorization::{categorize_reqwest_error, error_chain_message, update_error_stats};
pub use stats::ProcessingStats;
pub use types::{
    CaptureError, CertificateError, ErrorType, InfoType, InitializationError, StorageError,
};

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_processing_stats_initialization() {
        let stats = ProcessingStats::new();
        for error_type in ErrorType::iter() {
            assert_eq!(stats.get_error_count(error_type), 0);
        }
        for info_type in InfoType::iter() {
            assert_eq!(stats.get_info_count(info_type), 0);
        }
    }

    #[test]
    fn test_processing_stats_increment() {
        let stats = ProcessingStats::new();
        stats.increment_error(ErrorType::TlsTimeoutError);
        stats.increment_error(ErrorType::TlsTimeoutError);
        assert_eq!(stats.get_error_count(ErrorType::TlsTimeoutError), 2);

        stats.increment_info(InfoType::StatusOverridden);
        assert_eq!(stats.get_info_count(InfoType::StatusOverridden), 1);
    }

    #[test]
    fn test_processing_stats_totals() {
        let stats = ProcessingStats::new();
        stats.increment_error(ErrorType::ProbeTimeoutError);
        stats.increment_error(ErrorType::CaptureLaunchError);
        stats.increment_info(InfoType::CaptureSkipped);

        assert_eq!(stats.total_errors(), 2);
        assert_eq!(stats.total_info(), 1);
        assert_eq!(
            stats.sum_errors(&[ErrorType::ProbeTimeoutError, ErrorType::TlsTimeoutError]),
            1
        );
    }
}
