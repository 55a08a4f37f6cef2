//! Site inspection orchestration.
//!
//! Runs the liveness probe and the certificate inspection concurrently,
//! captures the page when the probe did not error, and merges the three
//! outcomes into one [`InspectionResult`].

use std::sync::Arc;

use log::debug;

use crate::capture::CaptureEngine;
use crate::config::{Config, OverridePolicy};
use crate::error_handling::{InfoType, ProcessingStats};
use crate::models::{
    CaptureResult, CertificateInfo, InspectionResult, LivenessOutcome, Site, SiteStatus,
};
use crate::probe::probe_liveness;
use crate::tls::inspect_certificate;

/// Read-only state shared by every per-site task.
pub struct InspectionContext {
    pub config: Config,
    pub client: Arc<reqwest::Client>,
    pub capture: CaptureEngine,
    pub stats: Arc<ProcessingStats>,
}

impl InspectionContext {
    pub fn new(
        config: Config,
        client: Arc<reqwest::Client>,
        capture: CaptureEngine,
        stats: Arc<ProcessingStats>,
    ) -> Self {
        Self {
            config,
            client,
            capture,
            stats,
        }
    }
}

/// Inspects one site.
///
/// Never fails: every subsystem degrades to its "unavailable" value and the
/// merge step decides what the record says.
pub async fn inspect_site(ctx: &InspectionContext, site: &Site) -> InspectionResult {
    let stats = ctx.stats.as_ref();

    let (liveness, certificate) = tokio::join!(
        probe_liveness(&ctx.client, &site.url, ctx.config.probe_timeout, stats),
        inspect_certificate(&site.url, ctx.config.tls_timeout, stats),
    );

    let capture = if liveness.status == SiteStatus::Error {
        if ctx.capture.is_enabled() {
            stats.increment_info(InfoType::CaptureSkipped);
            debug!("Skipping capture of {} after probe error", site.url);
        }
        CaptureResult::none()
    } else {
        ctx.capture.capture_site(site, stats).await
    };

    let result = merge(
        site,
        liveness,
        certificate,
        capture,
        ctx.config.override_policy,
        stats,
    );
    debug!(
        "Inspected {} (id {}): status={} ssl_valid={} screenshot={}",
        result.url,
        result.id,
        result.status,
        result.ssl_valid,
        result.stored_reference.is_some()
    );
    result
}

/// Combines the individual outcomes into the record reported for `site`.
///
/// A stored capture always clears the error message. Under
/// [`OverridePolicy::CaptureImpliesHealthy`] it also forces `status = up` and,
/// for `https` URLs, `ssl_valid = true`. Certificate dates are always reported
/// as observed.
pub fn merge(
    site: &Site,
    liveness: LivenessOutcome,
    certificate: CertificateInfo,
    capture: CaptureResult,
    policy: OverridePolicy,
    stats: &ProcessingStats,
) -> InspectionResult {
    let mut result = InspectionResult {
        id: site.id,
        url: site.url.clone(),
        stored_reference: capture.stored_reference,
        status: liveness.status,
        ssl_valid: certificate.valid,
        ssl_expires: certificate.expires_on,
        ssl_days_remaining: certificate.days_remaining,
        ssl_issued_date: certificate.issued_on,
        response_time_ms: liveness.response_time_ms,
        error_message: liveness.error_message,
    };

    if result.stored_reference.is_none() {
        return result;
    }
    result.error_message = None;

    if policy == OverridePolicy::CaptureImpliesHealthy {
        if result.status != SiteStatus::Up {
            stats.increment_info(InfoType::StatusOverridden);
            result.status = SiteStatus::Up;
        }
        if site.is_secure() && !result.ssl_valid {
            stats.increment_info(InfoType::SslOverridden);
            result.ssl_valid = true;
        }
    }

    result
}
