//! Certificate extraction utilities.

use chrono::{DateTime, Utc};

use crate::error_handling::CertificateError;
use crate::models::CertificateInfo;

const SECONDS_PER_DAY: i64 = 86_400;

/// The `notBefore`/`notAfter` bounds of a certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidityWindow {
    pub not_before: DateTime<Utc>,
    pub not_after: DateTime<Utc>,
}

/// Reads the validity window from a DER-encoded X.509 certificate.
///
/// # Errors
///
/// Returns `CertificateError::Parse` if the DER cannot be parsed or a bound is
/// outside the range `chrono` can represent.
pub(crate) fn extract_validity_window(der: &[u8]) -> Result<ValidityWindow, CertificateError> {
    let (_, cert) = x509_parser::parse_x509_certificate(der)
        .map_err(|e| CertificateError::Parse(e.to_string()))?;
    let validity = cert.validity();

    let not_before = DateTime::from_timestamp(validity.not_before.timestamp(), 0)
        .ok_or_else(|| CertificateError::Parse("notBefore out of range".to_string()))?;
    let not_after = DateTime::from_timestamp(validity.not_after.timestamp(), 0)
        .ok_or_else(|| CertificateError::Parse("notAfter out of range".to_string()))?;

    Ok(ValidityWindow {
        not_before,
        not_after,
    })
}

/// Evaluates a validity window at `now`.
///
/// `days_remaining` is the floor of the remaining time in whole days: `0` for a
/// certificate expiring within the current day, negative once expired.
pub fn certificate_info_at(window: &ValidityWindow, now: DateTime<Utc>) -> CertificateInfo {
    let valid = window.not_before <= now && now <= window.not_after;
    let days_remaining = (window.not_after - now)
        .num_seconds()
        .div_euclid(SECONDS_PER_DAY);

    CertificateInfo {
        valid,
        expires_on: Some(window.not_after.date_naive()),
        days_remaining: Some(days_remaining),
        issued_on: Some(window.not_before.date_naive()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_valid_certificate_days_remaining() {
        let window = ValidityWindow {
            not_before: now() - Duration::days(30),
            not_after: now() + Duration::days(45) + Duration::hours(3),
        };
        let info = certificate_info_at(&window, now());
        assert!(info.valid);
        assert_eq!(info.days_remaining, Some(45));
        assert_eq!(info.expires_on, NaiveDate::from_ymd_opt(2025, 7, 16));
        assert_eq!(info.issued_on, NaiveDate::from_ymd_opt(2025, 5, 2));
    }

    #[test]
    fn test_expiring_exactly_now_is_zero_days() {
        let window = ValidityWindow {
            not_before: now() - Duration::days(90),
            not_after: now(),
        };
        let info = certificate_info_at(&window, now());
        // Bounds are inclusive
        assert!(info.valid);
        assert_eq!(info.days_remaining, Some(0));
        assert!(info.is_expired());
    }

    #[test]
    fn test_expired_certificate_is_negative() {
        let window = ValidityWindow {
            not_before: now() - Duration::days(90),
            not_after: now() - Duration::seconds(1),
        };
        let info = certificate_info_at(&window, now());
        assert!(!info.valid);
        assert_eq!(info.days_remaining, Some(-1));

        let long_expired = ValidityWindow {
            not_before: now() - Duration::days(400),
            not_after: now() - Duration::days(10) - Duration::hours(1),
        };
        assert_eq!(
            certificate_info_at(&long_expired, now()).days_remaining,
            Some(-11)
        );
    }

    #[test]
    fn test_not_yet_valid_certificate() {
        let window = ValidityWindow {
            not_before: now() + Duration::days(1),
            not_after: now() + Duration::days(91),
        };
        let info = certificate_info_at(&window, now());
        assert!(!info.valid);
        assert_eq!(info.days_remaining, Some(91));
    }

    #[test]
    fn test_garbage_der_is_parse_error() {
        let err = extract_validity_window(b"definitely not a certificate")
            .expect_err("garbage should not parse");
        assert!(matches!(err, CertificateError::Parse(_)));
    }
}
