//! Statistics printing.

use log::info;
use strum::IntoEnumIterator;

use crate::batch::BatchReport;
use crate::error_handling::{ErrorType, InfoType, ProcessingStats};

/// Prints a one-line summary of a run.
pub fn print_batch_summary(report: &BatchReport) {
    info!(
        "✅ Inspected {} site{} ({} up, {} down, {} error, {} screenshot{}) in {:.1}s",
        report.total,
        if report.total == 1 { "" } else { "s" },
        report.up,
        report.down,
        report.error,
        report.captures,
        if report.captures == 1 { "" } else { "s" },
        report.elapsed_seconds
    );
}

/// Prints error and info statistics to the log.
pub fn print_error_statistics(error_stats: &ProcessingStats) {
    let total_errors = error_stats.total_errors();
    let total_info = error_stats.total_info();

    if total_errors > 0 {
        info!("Error Counts ({} total):", total_errors);
        for error_type in ErrorType::iter() {
            let count = error_stats.get_error_count(error_type);
            if count > 0 {
                info!("   {}: {}", error_type.as_str(), count);
            }
        }
    }

    if total_info > 0 {
        info!("Info Counts ({} total):", total_info);
        for info_type in InfoType::iter() {
            let count = error_stats.get_info_count(info_type);
            if count > 0 {
                info!("   {}: {}", info_type.as_str(), count);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_error_statistics_no_errors() {
        let stats = ProcessingStats::new();
        // Should not panic when there are no errors
        print_error_statistics(&stats);
    }

    #[test]
    fn test_print_error_statistics_all_types() {
        let stats = ProcessingStats::new();
        stats.increment_error(ErrorType::ProbeTimeoutError);
        stats.increment_error(ErrorType::CaptureNavigationError);
        stats.increment_info(InfoType::StatusOverridden);
        print_error_statistics(&stats);
    }

    #[test]
    fn test_print_batch_summary() {
        print_batch_summary(&BatchReport::default());
        print_batch_summary(&BatchReport {
            total: 1,
            up: 1,
            captures: 1,
            ..Default::default()
        });
    }
}
