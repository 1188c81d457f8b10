//! Delegated credential lifecycle.
//!
//! Accounts configured with a role identifier collect through short-lived credentials
//! obtained from the vendor STS. A [`CredentialManager`] owns one account's current
//! credential and refreshes it before it expires; concurrent callers that find the
//! credential stale share a single refresh.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

use crate::error::Result;
use crate::utils::log_sanitizer::mask_secret;

/// Session name sent with every AssumeRole call.
pub const ROLE_SESSION_NAME: &str = "dns_exporter_session";
/// Requested lifetime of a delegated credential, in seconds.
pub const ROLE_SESSION_DURATION_SECS: u32 = 3600;

/// A delegated credential is refreshed once `now` is within this window of its expiration.
pub fn refresh_lookahead() -> Duration {
    Duration::minutes(5)
}

/// Key material used to sign one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessCredential {
    pub access_key_id: String,
    pub access_key_secret: String,
    /// Session token; present only for delegated credentials.
    pub security_token: Option<String>,
}

impl AccessCredential {
    pub fn new(access_key_id: impl Into<String>, access_key_secret: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            access_key_secret: access_key_secret.into(),
            security_token: None,
        }
    }
}

/// A short-lived credential returned by the vendor STS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegatedCredential {
    pub access_key_id: String,
    pub access_key_secret: String,
    pub security_token: String,
    pub expiration: DateTime<Utc>,
}

impl DelegatedCredential {
    /// Usable at `now` iff `now < expiration - lookahead`.
    pub fn is_usable_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expiration - refresh_lookahead()
    }

    pub fn to_access(&self) -> AccessCredential {
        AccessCredential {
            access_key_id: self.access_key_id.clone(),
            access_key_secret: self.access_key_secret.clone(),
            security_token: Some(self.security_token.clone()),
        }
    }
}

/// Exchanges an account's static secret for a delegated credential.
///
/// Implemented by each vendor's STS client.
#[async_trait]
pub trait RoleAssumer: Send + Sync {
    async fn assume_role(&self) -> Result<DelegatedCredential>;
}

/// Owns the signing credential of one account.
pub struct CredentialManager {
    label: String,
    static_credential: AccessCredential,
    assumer: Option<Arc<dyn RoleAssumer>>,
    current: RwLock<Option<DelegatedCredential>>,
}

impl CredentialManager {
    /// Manager for an account without delegation; always resolves to the static secret.
    pub fn fixed(label: impl Into<String>, credential: AccessCredential) -> Self {
        Self {
            label: label.into(),
            static_credential: credential,
            assumer: None,
            current: RwLock::new(None),
        }
    }

    /// Manager that obtains delegated credentials through `assumer`.
    pub fn delegated(
        label: impl Into<String>,
        credential: AccessCredential,
        assumer: Arc<dyn RoleAssumer>,
    ) -> Self {
        Self {
            label: label.into(),
            static_credential: credential,
            assumer: Some(assumer),
            current: RwLock::new(None),
        }
    }

    pub fn is_delegated(&self) -> bool {
        self.assumer.is_some()
    }

    /// The credential to sign the next request with.
    ///
    /// # Errors
    /// Propagates the STS error when a refresh is needed and fails. There is no internal
    /// retry; the next call tries again.
    pub async fn resolve(&self) -> Result<AccessCredential> {
        let Some(assumer) = &self.assumer else {
            return Ok(self.static_credential.clone());
        };
        self.valid_delegated(assumer.as_ref())
            .await
            .map(|c| c.to_access())
    }

    async fn valid_delegated(&self, assumer: &dyn RoleAssumer) -> Result<DelegatedCredential> {
        {
            let current = self.current.read().await;
            if let Some(credential) = current.as_ref()
                && credential.is_usable_at(Utc::now())
            {
                return Ok(credential.clone());
            }
        }

        let mut current = self.current.write().await;
        // Another caller may have refreshed while this one waited for the write lock.
        if let Some(credential) = current.as_ref()
            && credential.is_usable_at(Utc::now())
        {
            return Ok(credential.clone());
        }

        log::info!("[{}] Refreshing delegated credential", self.label);
        let refreshed = assumer.assume_role().await.inspect_err(|e| {
            log::warn!("[{}] Delegated credential refresh failed: {e}", self.label);
        })?;
        log::debug!(
            "[{}] Delegated credential {} valid until {}",
            self.label,
            mask_secret(&refreshed.access_key_id),
            refreshed.expiration
        );
        *current = Some(refreshed.clone());
        Ok(refreshed)
    }

    #[cfg(test)]
    async fn seed(&self, credential: DelegatedCredential) {
        *self.current.write().await = Some(credential);
    }
}
