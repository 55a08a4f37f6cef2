use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Artifact filename for a site: `screenshot_{id}_{unix_millis}_{seq}.jpeg`.
///
/// The process-wide sequence keeps names distinct when two captures of the
/// same site land in the same millisecond.
pub fn artifact_filename(site_id: i64) -> String {
    let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!(
        "screenshot_{}_{}_{}.jpeg",
        site_id,
        Utc::now().timestamp_millis(),
        seq
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_filename_shape() {
        let name = artifact_filename(42);
        assert!(name.starts_with("screenshot_42_"));
        assert!(name.ends_with(".jpeg"));
        assert_eq!(name.trim_end_matches(".jpeg").split('_').count(), 4);
    }

    #[test]
    fn test_filenames_are_unique_for_same_site() {
        let names: HashSet<String> = (0..500).map(|_| artifact_filename(7)).collect();
        assert_eq!(names.len(), 500);
    }
}
