//! Provider factory abstract Trait

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use cloud_dns_exporter_provider::{
    create_credential_manager, create_provider, Account, CredentialManager, DnsProvider,
    ProviderType,
};
use tokio::sync::RwLock;

use crate::error::CoreResult;

/// Builds the adapter for one account at the start of each collection task.
#[async_trait]
pub trait ProviderFactory: Send + Sync {
    async fn create(&self, account: &Account) -> CoreResult<Arc<dyn DnsProvider>>;
}

/// Factory backed by the vendor adapters.
///
/// Adapters are cheap and rebuilt per task, but credential managers are kept in a
/// registry keyed by `(provider, account)` so delegated credentials survive across
/// passes and overlapping passes share a single refresh.
#[derive(Default)]
pub struct DefaultProviderFactory {
    credentials: RwLock<HashMap<(ProviderType, String), Arc<CredentialManager>>>,
}

impl DefaultProviderFactory {
    pub fn new() -> Self {
        Self::default()
    }

    async fn credential_manager(&self, account: &Account) -> CoreResult<Arc<CredentialManager>> {
        let key = (account.provider, account.name.clone());
        if let Some(manager) = self.credentials.read().await.get(&key) {
            return Ok(Arc::clone(manager));
        }

        let mut registry = self.credentials.write().await;
        if let Some(manager) = registry.get(&key) {
            return Ok(Arc::clone(manager));
        }
        let manager = Arc::new(create_credential_manager(account)?);
        log::debug!(
            "Registered credential manager for {}/{} (delegated: {})",
            account.provider,
            account.name,
            manager.is_delegated()
        );
        registry.insert(key, Arc::clone(&manager));
        Ok(manager)
    }

    /// Number of registered credential managers.
    pub async fn registered(&self) -> usize {
        self.credentials.read().await.len()
    }
}

#[async_trait]
impl ProviderFactory for DefaultProviderFactory {
    async fn create(&self, account: &Account) -> CoreResult<Arc<dyn DnsProvider>> {
        let credentials = self.credential_manager(account).await?;
        Ok(create_provider(account, credentials)?)
    }
}
