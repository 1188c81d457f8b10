//! 证书检查 (rustls 纯异步实现)
//!
//! Chains are accepted whatever their trust status so that expired and self-signed
//! certificates still report their validity window. Handshake signatures are verified.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::{verify_tls12_signature, verify_tls13_signature, CryptoProvider};
use rustls::{ClientConfig, DigitallySignedStruct, SignatureScheme};
use rustls_pki_types::{CertificateDer, ServerName, UnixTime};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_rustls::TlsConnector;
use x509_parser::prelude::*;

use crate::error::{CoreError, CoreResult};
use crate::traits::CertChecker;
use crate::types::LeafCertificate;

const HTTPS_PORT: u16 = 443;

/// Skips chain and hostname validation, keeps signature checks.
#[derive(Debug)]
struct AcceptAnyChain {
    provider: Arc<CryptoProvider>,
}

impl ServerCertVerifier for AcceptAnyChain {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls12_signature(message, cert, dss, &self.provider.signature_verification_algorithms)
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls13_signature(message, cert, dss, &self.provider.signature_verification_algorithms)
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.provider
            .signature_verification_algorithms
            .supported_schemes()
    }
}

/// [`CertChecker`] that performs a real TCP connect + TLS handshake.
pub struct TlsCertChecker {
    connector: TlsConnector,
    /// Applied separately to the connect and to the handshake.
    timeout: Duration,
    port: u16,
}

impl TlsCertChecker {
    pub fn new(timeout: Duration) -> CoreResult<Self> {
        let provider = Arc::new(rustls::crypto::ring::default_provider());
        let config = ClientConfig::builder_with_provider(Arc::clone(&provider))
            .with_safe_default_protocol_versions()
            .map_err(|e| CoreError::ConfigError(format!("TLS client setup failed: {e}")))?
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(AcceptAnyChain { provider }))
            .with_no_client_auth();

        Ok(Self {
            connector: TlsConnector::from(Arc::new(config)),
            timeout,
            port: HTTPS_PORT,
        })
    }

    /// Probe a port other than 443.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }
}

#[async_trait]
impl CertChecker for TlsCertChecker {
    async fn check(&self, host: &str) -> CoreResult<LeafCertificate> {
        let fail = |detail: String| CoreError::CertCheck {
            host: host.to_string(),
            detail,
        };
        let started = std::time::Instant::now();

        let server_name = ServerName::try_from(host.to_string())
            .map_err(|e| fail(format!("invalid server name: {e}")))?;

        let stream = timeout(self.timeout, TcpStream::connect((host, self.port)))
            .await
            .map_err(|_| fail(format!("connect timed out after {:?}", self.timeout)))?
            .map_err(|e| fail(format!("connect failed: {e}")))?;

        let tls_stream = timeout(self.timeout, self.connector.connect(server_name, stream))
            .await
            .map_err(|_| fail(format!("TLS handshake timed out after {:?}", self.timeout)))?
            .map_err(|e| fail(format!("TLS handshake failed: {e}")))?;

        let (_, connection) = tls_stream.get_ref();
        let leaf = connection
            .peer_certificates()
            .and_then(|certs| certs.first())
            .ok_or_else(|| fail("no certificate presented".to_string()))?;

        let cert = parse_leaf(leaf.as_ref()).map_err(fail)?;
        log::debug!(
            "[cert] {host}: CN={} expires {} ({:?})",
            cert.subject_common_name,
            cert.not_after,
            started.elapsed()
        );
        Ok(cert)
    }
}

fn parse_leaf(der: &[u8]) -> Result<LeafCertificate, String> {
    let (_, cert) =
        X509Certificate::from_der(der).map_err(|e| format!("certificate parse failed: {e}"))?;

    let subject_common_name = cert
        .subject()
        .iter_common_name()
        .next()
        .and_then(|cn| cn.as_str().ok())
        .unwrap_or_default()
        .to_string();
    let validity = cert.validity();

    Ok(LeafCertificate {
        subject_common_name,
        issuer: cert.issuer().to_string(),
        not_before: to_utc(validity.not_before)?,
        not_after: to_utc(validity.not_after)?,
    })
}

fn to_utc(time: ASN1Time) -> Result<DateTime<Utc>, String> {
    DateTime::from_timestamp(time.timestamp(), 0)
        .ok_or_else(|| format!("certificate time out of range: {}", time.timestamp()))
}
