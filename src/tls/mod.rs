//! TLS certificate inspection.
//!
//! Opens a raw TLS handshake to an HTTPS target and reports the validity
//! window of the leaf certificate. Chain trust is deliberately not enforced
//! here: an expired or self-signed certificate must still be readable so its
//! dates can be reported. Handshake signatures are still verified.
//!
//! Uses `tokio-rustls` for the handshake and `x509-parser` for the certificate.

mod extract;

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use log::debug;
use tokio::net::TcpStream;
use tokio_rustls::rustls::client::danger::{
    HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier,
};
use tokio_rustls::rustls::crypto::{
    ring, verify_tls12_signature, verify_tls13_signature, WebPkiSupportedAlgorithms,
};
use tokio_rustls::rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use tokio_rustls::rustls::{ClientConfig, DigitallySignedStruct, SignatureScheme};
use tokio_rustls::TlsConnector;
use url::{Host, Url};

use crate::config::DEFAULT_TLS_PORT;
use crate::error_handling::{CertificateError, ErrorType, InfoType, ProcessingStats};
use crate::models::{is_secure_url, CertificateInfo};

pub use extract::{certificate_info_at, ValidityWindow};
use extract::extract_validity_window;

/// Accepts any presented chain while still checking handshake signatures.
#[derive(Debug)]
struct InspectOnlyVerifier {
    algorithms: WebPkiSupportedAlgorithms,
}

impl ServerCertVerifier for InspectOnlyVerifier {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, tokio_rustls::rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, tokio_rustls::rustls::Error> {
        verify_tls12_signature(message, cert, dss, &self.algorithms)
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, tokio_rustls::rustls::Error> {
        verify_tls13_signature(message, cert, dss, &self.algorithms)
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.algorithms.supported_schemes()
    }
}

fn inspector_client_config() -> Result<Arc<ClientConfig>, CertificateError> {
    let provider = Arc::new(ring::default_provider());
    let algorithms = provider.signature_verification_algorithms;
    let config = ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()?
        .dangerous()
        .with_custom_certificate_verifier(Arc::new(InspectOnlyVerifier { algorithms }))
        .with_no_client_auth();
    Ok(Arc::new(config))
}

/// Resolves the connect target and SNI name for an `https` URL.
fn target_of(url: &str) -> Result<(String, u16, ServerName<'static>), CertificateError> {
    let parsed = Url::parse(url).map_err(|_| CertificateError::MissingHost(url.to_string()))?;
    let port = parsed.port().unwrap_or(DEFAULT_TLS_PORT);
    match parsed.host() {
        Some(Host::Domain(domain)) => {
            let server_name = ServerName::try_from(domain.to_string())
                .map_err(|_| CertificateError::InvalidServerName(domain.to_string()))?;
            Ok((domain.to_string(), port, server_name))
        }
        Some(Host::Ipv4(ip)) => Ok((
            ip.to_string(),
            port,
            ServerName::IpAddress(IpAddr::V4(ip).into()),
        )),
        Some(Host::Ipv6(ip)) => Ok((
            ip.to_string(),
            port,
            ServerName::IpAddress(IpAddr::V6(ip).into()),
        )),
        None => Err(CertificateError::MissingHost(url.to_string())),
    }
}

/// Connects, completes the handshake, and reads the leaf certificate's window.
///
/// The whole exchange (TCP connect and handshake) shares one `deadline`. The
/// stream is owned by this function and dropped on every return path.
///
/// # Errors
///
/// Returns a `CertificateError` describing the step that failed.
pub async fn fetch_validity_window(
    url: &str,
    deadline: Duration,
) -> Result<ValidityWindow, CertificateError> {
    let (host, port, server_name) = target_of(url)?;
    let config = inspector_client_config()?;

    let handshake = async {
        let sock = TcpStream::connect((host.as_str(), port))
            .await
            .map_err(|source| CertificateError::Connect {
                host: host.clone(),
                port,
                source,
            })?;

        let connector = TlsConnector::from(config);
        let tls_stream = connector
            .connect(server_name, sock)
            .await
            .map_err(|source| CertificateError::Handshake {
                host: host.clone(),
                source,
            })?;

        let certs = tls_stream
            .get_ref()
            .1
            .peer_certificates()
            .ok_or_else(|| CertificateError::NoCertificate(host.clone()))?;
        let leaf = certs
            .first()
            .ok_or_else(|| CertificateError::NoCertificate(host.clone()))?;
        extract_validity_window(leaf.as_ref())
    };

    match tokio::time::timeout(deadline, handshake).await {
        Ok(result) => result,
        Err(_) => Err(CertificateError::Timeout {
            host: host.clone(),
            port,
            secs: deadline.as_secs(),
        }),
    }
}

/// Inspects the certificate of `url`.
///
/// Non-`https` URLs return the unavailable value without touching the
/// network. Every failure is counted, logged at debug level and collapsed to
/// `valid = false`; certificate problems never fail an inspection.
pub async fn inspect_certificate(
    url: &str,
    deadline: Duration,
    stats: &ProcessingStats,
) -> CertificateInfo {
    if !is_secure_url(url) {
        return CertificateInfo::unavailable();
    }

    match fetch_validity_window(url, deadline).await {
        Ok(window) => {
            let info = certificate_info_at(&window, Utc::now());
            if info.is_expired() {
                stats.increment_info(InfoType::CertificateExpired);
            }
            debug!(
                "Certificate for {url}: valid={} expires={:?} days_remaining={:?}",
                info.valid, info.expires_on, info.days_remaining
            );
            info
        }
        Err(e) => {
            stats.increment_error(ErrorType::from(&e));
            debug!("Certificate inspection for {url} unavailable: {e}");
            CertificateInfo::unavailable()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use rcgen::{date_time_ymd, CertificateParams, KeyPair};
    use tokio::net::TcpListener;
    use tokio_rustls::rustls::pki_types::{PrivateKeyDer, PrivatePkcs8KeyDer};
    use tokio_rustls::rustls::ServerConfig;
    use tokio_rustls::TlsAcceptor;

    /// Serves a self-signed certificate with the given validity dates on an
    /// ephemeral local port.
    async fn serve_certificate(
        not_before: (i32, u8, u8),
        not_after: (i32, u8, u8),
    ) -> (u16, tokio::task::JoinHandle<()>) {
        let mut params = CertificateParams::new(vec!["localhost".to_string()]).unwrap();
        params.not_before = date_time_ymd(not_before.0, not_before.1, not_before.2);
        params.not_after = date_time_ymd(not_after.0, not_after.1, not_after.2);
        let key_pair = KeyPair::generate().unwrap();
        let cert = params.self_signed(&key_pair).unwrap();
        let key = PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(key_pair.serialize_der()));

        let config = ServerConfig::builder_with_provider(Arc::new(ring::default_provider()))
            .with_safe_default_protocol_versions()
            .unwrap()
            .with_no_client_auth()
            .with_single_cert(vec![cert.der().clone()], key)
            .unwrap();
        let acceptor = TlsAcceptor::from(Arc::new(config));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = tokio::spawn(async move {
            while let Ok((sock, _)) = listener.accept().await {
                let _ = acceptor.accept(sock).await;
            }
        });
        (port, server)
    }

    #[tokio::test]
    async fn test_plain_http_is_unavailable_without_network() {
        let stats = ProcessingStats::new();
        let info = inspect_certificate(
            "http://plain.example",
            Duration::from_millis(1),
            &stats,
        )
        .await;
        assert_eq!(info, CertificateInfo::unavailable());
        assert_eq!(stats.total_errors(), 0);
    }

    #[test]
    fn test_target_uses_url_port_or_default() {
        let (host, port, _) = target_of("https://example.com/path").unwrap();
        assert_eq!(host, "example.com");
        assert_eq!(port, 443);

        let (host, port, name) = target_of("https://127.0.0.1:8443/").unwrap();
        assert_eq!(host, "127.0.0.1");
        assert_eq!(port, 8443);
        assert!(matches!(name, ServerName::IpAddress(_)));
    }

    #[test]
    fn test_target_rejects_unparsable_url() {
        assert!(matches!(
            target_of("https://"),
            Err(CertificateError::MissingHost(_))
        ));
    }

    #[tokio::test]
    async fn test_refused_connection_is_unavailable() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let stats = ProcessingStats::new();
        let info = inspect_certificate(
            &format!("https://127.0.0.1:{port}/"),
            Duration::from_secs(2),
            &stats,
        )
        .await;
        assert!(!info.valid);
        assert!(info.expires_on.is_none());
        assert_eq!(stats.get_error_count(ErrorType::TlsConnectError), 1);
    }

    #[tokio::test]
    async fn test_silent_server_times_out() {
        // Accepts the TCP connection but never answers the ClientHello
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = tokio::spawn(async move {
            let (_sock, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
        });

        let err = fetch_validity_window(
            &format!("https://127.0.0.1:{port}/"),
            Duration::from_millis(300),
        )
        .await
        .expect_err("handshake should time out");
        assert!(matches!(err, CertificateError::Timeout { .. }));
        server.abort();
    }

    #[tokio::test]
    async fn test_non_tls_server_is_handshake_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = tokio::spawn(async move {
            use tokio::io::AsyncWriteExt;
            let (mut sock, _) = listener.accept().await.unwrap();
            let _ = sock
                .write_all(b"HTTP/1.1 400 Bad Request\r\nContent-Length: 0\r\n\r\n")
                .await;
        });

        let stats = ProcessingStats::new();
        let info = inspect_certificate(
            &format!("https://127.0.0.1:{port}/"),
            Duration::from_secs(2),
            &stats,
        )
        .await;
        assert!(!info.valid);
        assert_eq!(stats.get_error_count(ErrorType::TlsHandshakeError), 1);
        let _ = server.await;
    }

    #[tokio::test]
    async fn test_expired_self_signed_certificate_is_still_read() {
        let (port, server) = serve_certificate((2020, 1, 1), (2021, 1, 1)).await;
        let stats = ProcessingStats::new();

        let info = inspect_certificate(
            &format!("https://127.0.0.1:{port}/"),
            Duration::from_secs(5),
            &stats,
        )
        .await;

        assert!(!info.valid);
        assert!(info.days_remaining.unwrap() < 0);
        assert!(info.is_expired());
        assert_eq!(info.expires_on, NaiveDate::from_ymd_opt(2021, 1, 1));
        assert_eq!(info.issued_on, NaiveDate::from_ymd_opt(2020, 1, 1));
        assert_eq!(stats.total_errors(), 0);
        assert_eq!(stats.get_info_count(InfoType::CertificateExpired), 1);
        server.abort();
    }

    #[tokio::test]
    async fn test_in_window_self_signed_certificate_is_valid() {
        let (port, server) = serve_certificate((2024, 1, 1), (2099, 1, 1)).await;
        let url = format!("https://127.0.0.1:{port}/");

        let window = fetch_validity_window(&url, Duration::from_secs(5))
            .await
            .expect("handshake should succeed");
        assert_eq!(
            window.not_before,
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(
            window.not_after,
            Utc.with_ymd_and_hms(2099, 1, 1, 0, 0, 0).unwrap()
        );
        let at = Utc.with_ymd_and_hms(2098, 11, 17, 12, 0, 0).unwrap();
        let info = certificate_info_at(&window, at);
        assert!(info.valid);
        assert_eq!(info.days_remaining, Some(44));

        let stats = ProcessingStats::new();
        let info = inspect_certificate(&url, Duration::from_secs(5), &stats).await;
        assert!(info.valid);
        assert!(info.days_remaining.unwrap() > 0);
        assert_eq!(info.expires_on, NaiveDate::from_ymd_opt(2099, 1, 1));
        assert_eq!(stats.total_errors(), 0);
        assert_eq!(stats.total_info(), 0);
        server.abort();
    }

    #[tokio::test]
    #[ignore] // requires network access
    async fn test_real_certificate() {
        let stats = ProcessingStats::new();
        let info = inspect_certificate("https://example.com", Duration::from_secs(5), &stats).await;
        assert!(info.valid);
        assert!(info.days_remaining.unwrap_or_default() > 0);
    }
}
