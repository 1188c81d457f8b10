//! Adapter and credential-manager factories.

use std::sync::Arc;

use crate::credentials::{AccessCredential, CredentialManager};
use crate::error::{ProviderError, Result};
use crate::traits::DnsProvider;
use crate::types::{Account, ProviderType};

#[cfg(feature = "aliyun")]
use crate::providers::{AliyunProvider, AliyunRoleAssumer};
#[cfg(feature = "tencent")]
use crate::providers::{TencentProvider, TencentRoleAssumer};

/// Creates the adapter for `account`, signing through `credentials`.
///
/// The adapter is selected by [`Account::provider`]. Providers whose feature is
/// disabled fail with [`ProviderError::Unknown`].
///
/// # Examples
///
/// ```rust,no_run
/// use std::collections::HashMap;
/// use std::sync::Arc;
/// use cloud_dns_exporter_provider::{
///     create_credential_manager, create_provider, Account, ProviderType,
/// };
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let fields = HashMap::from([
///     ("name".to_string(), "prod".to_string()),
///     ("secretId".to_string(), "LTAI...".to_string()),
///     ("secretKey".to_string(), "...".to_string()),
/// ]);
/// let account = Account::from_map(ProviderType::Aliyun, &fields)?;
/// let credentials = Arc::new(create_credential_manager(&account)?);
/// let provider = create_provider(&account, credentials)?;
/// # Ok(())
/// # }
/// ```
pub fn create_provider(
    account: &Account,
    credentials: Arc<CredentialManager>,
) -> Result<Arc<dyn DnsProvider>> {
    match account.provider {
        #[cfg(feature = "aliyun")]
        ProviderType::Aliyun => Ok(Arc::new(AliyunProvider::new(account.clone(), credentials)?)),
        #[cfg(feature = "tencent")]
        ProviderType::Tencent => Ok(Arc::new(TencentProvider::new(account.clone(), credentials)?)),
        #[allow(unreachable_patterns)]
        other => Err(not_compiled_in(other)),
    }
}

/// Creates the credential manager for `account`.
///
/// Accounts with a `roleArn` get a manager backed by the vendor STS; all others
/// resolve to their static secret.
pub fn create_credential_manager(account: &Account) -> Result<CredentialManager> {
    let label = format!("{}/{}", account.provider, account.name);
    let credential = AccessCredential::new(&account.secret_id, &account.secret_key);

    let Some(role_arn) = account.role_arn.as_deref() else {
        return Ok(CredentialManager::fixed(label, credential));
    };

    let assumer: Arc<dyn crate::credentials::RoleAssumer> = match account.provider {
        #[cfg(feature = "aliyun")]
        ProviderType::Aliyun => Arc::new(AliyunRoleAssumer::new(credential.clone(), role_arn)?),
        #[cfg(feature = "tencent")]
        ProviderType::Tencent => Arc::new(TencentRoleAssumer::new(
            credential.clone(),
            role_arn,
            account.region.clone(),
        )?),
        #[allow(unreachable_patterns)]
        other => return Err(not_compiled_in(other)),
    };

    Ok(CredentialManager::delegated(label, credential, assumer))
}

#[allow(dead_code)]
fn not_compiled_in(provider: ProviderType) -> ProviderError {
    ProviderError::Unknown {
        provider: provider.to_string(),
        raw_code: None,
        raw_message: format!("provider '{provider}' is not enabled in this build"),
    }
}
