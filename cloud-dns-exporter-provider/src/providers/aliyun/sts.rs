//! 阿里云 STS AssumeRole

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::credentials::{
    AccessCredential, DelegatedCredential, ROLE_SESSION_DURATION_SECS, ROLE_SESSION_NAME,
    RoleAssumer,
};
use crate::error::{ProviderError, Result};
use crate::traits::ErrorContext;

use super::AliyunEndpoint;
use super::http::AliyunClient;
use super::types::{AssumeRoleParams, AssumeRoleResponse};

/// Exchanges an account's static AccessKey for a RAM role session.
pub struct AliyunRoleAssumer {
    client: AliyunClient,
    endpoint: AliyunEndpoint,
    credential: AccessCredential,
    role_arn: String,
}

impl AliyunRoleAssumer {
    pub fn new(credential: AccessCredential, role_arn: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: AliyunClient::new(1)?,
            endpoint: AliyunEndpoint::sts(),
            credential,
            role_arn: role_arn.into(),
        })
    }
}

#[async_trait]
impl RoleAssumer for AliyunRoleAssumer {
    async fn assume_role(&self) -> Result<DelegatedCredential> {
        let params = AssumeRoleParams {
            role_arn: &self.role_arn,
            role_session_name: ROLE_SESSION_NAME,
            duration_seconds: ROLE_SESSION_DURATION_SECS,
        };
        let response: AssumeRoleResponse = self
            .client
            .call(
                &self.credential,
                &self.endpoint,
                "AssumeRole",
                &params,
                ErrorContext::role(&self.role_arn),
            )
            .await?;

        into_delegated(response, &self.role_arn)
    }
}

fn into_delegated(response: AssumeRoleResponse, role_arn: &str) -> Result<DelegatedCredential> {
    let exchange_error = |detail: String| ProviderError::CredentialExchange {
        provider: "aliyun".to_string(),
        role: role_arn.to_string(),
        detail,
    };

    let credentials = response
        .credentials
        .ok_or_else(|| exchange_error("response carries no Credentials".to_string()))?;
    let expiration = DateTime::parse_from_rfc3339(&credentials.expiration)
        .map_err(|e| exchange_error(format!("invalid Expiration '{}': {e}", credentials.expiration)))?
        .with_timezone(&Utc);

    Ok(DelegatedCredential {
        access_key_id: credentials.access_key_id,
        access_key_secret: credentials.access_key_secret,
        security_token: credentials.security_token,
        expiration,
    })
}
