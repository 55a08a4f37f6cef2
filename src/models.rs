//! Data types shared by the inspection pipeline.
//!
//! `Site` is what the URL store hands us; `InspectionResult` is what goes back.
//! The intermediate outcomes (`LivenessOutcome`, `CertificateInfo`,
//! `CaptureResult`) are produced by the individual checks and merged by
//! [`crate::inspect`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A registered website as supplied by the URL store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    pub id: i64,
    pub url: String,
}

impl Site {
    pub fn new(id: i64, url: impl Into<String>) -> Self {
        Self {
            id,
            url: url.into(),
        }
    }

    /// True when the URL uses the `https` scheme.
    pub fn is_secure(&self) -> bool {
        is_secure_url(&self.url)
    }
}

/// True when `url` uses the `https` scheme (case-insensitive).
pub fn is_secure_url(url: &str) -> bool {
    url.get(..8)
        .map(|scheme| scheme.eq_ignore_ascii_case("https://"))
        .unwrap_or(false)
}

/// Reachability classification of a site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SiteStatus {
    /// The probe got a success-class response.
    Up,
    /// The remote answered with a non-success status code.
    Down,
    /// The probe itself failed (timeout, DNS, connection reset, bad URL).
    Error,
}

/// Outcome of a single liveness probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LivenessOutcome {
    pub status: SiteStatus,
    pub response_time_ms: Option<u64>,
    pub error_message: Option<String>,
}

impl LivenessOutcome {
    pub fn up(response_time_ms: u64) -> Self {
        Self {
            status: SiteStatus::Up,
            response_time_ms: Some(response_time_ms),
            error_message: None,
        }
    }

    pub fn down(status_code: u16) -> Self {
        Self {
            status: SiteStatus::Down,
            response_time_ms: None,
            error_message: Some(format!("HTTP Status: {status_code}")),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: SiteStatus::Error,
            response_time_ms: None,
            error_message: Some(message.into()),
        }
    }
}

/// Validity window of the certificate presented by an HTTPS endpoint.
///
/// `valid == false` with every other field empty means the certificate could
/// not be inspected at all (plain HTTP, handshake failure, timeout).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CertificateInfo {
    pub valid: bool,
    pub expires_on: Option<NaiveDate>,
    pub days_remaining: Option<i64>,
    pub issued_on: Option<NaiveDate>,
}

impl CertificateInfo {
    /// The "no certificate information" value.
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// True when `days_remaining` is known and the certificate is at or past expiry.
    pub fn is_expired(&self) -> bool {
        self.days_remaining.map(|d| d <= 0).unwrap_or(false)
    }
}

/// Where a captured screenshot ended up, if anywhere.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptureResult {
    pub stored_reference: Option<String>,
}

impl CaptureResult {
    pub fn stored(reference: impl Into<String>) -> Self {
        Self {
            stored_reference: Some(reference.into()),
        }
    }

    pub fn none() -> Self {
        Self::default()
    }
}

/// Merged inspection record for one site.
///
/// Field names on the wire match what the dashboard already stores, so the
/// stored reference is serialized as `screenshot_path` and the latency as
/// `response_time`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectionResult {
    pub id: i64,
    pub url: String,
    #[serde(
        rename = "screenshot_path",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub stored_reference: Option<String>,
    pub status: SiteStatus,
    pub ssl_valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssl_expires: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssl_days_remaining: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssl_issued_date: Option<NaiveDate>,
    #[serde(
        rename = "response_time",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub response_time_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl InspectionResult {
    /// Result recorded for a site whose inspection failed outright.
    pub fn failed(site: &Site, message: impl Into<String>) -> Self {
        Self {
            id: site.id,
            url: site.url.clone(),
            stored_reference: None,
            status: SiteStatus::Error,
            ssl_valid: false,
            ssl_expires: None,
            ssl_days_remaining: None,
            ssl_issued_date: None,
            response_time_ms: None,
            error_message: Some(message.into()),
        }
    }
}
