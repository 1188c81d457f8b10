//! Certificate probe abstract Trait

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::LeafCertificate;

/// Reads the leaf certificate a host presents on port 443.
#[async_trait]
pub trait CertChecker: Send + Sync {
    /// # Arguments
    /// * `host` - FQDN, used both to connect and as SNI
    ///
    /// # Errors
    /// [`CoreError::CertCheck`](crate::CoreError::CertCheck) on connect, handshake or
    /// parse failure. Callers record such hosts as unreachable.
    async fn check(&self, host: &str) -> CoreResult<LeafCertificate>;
}
