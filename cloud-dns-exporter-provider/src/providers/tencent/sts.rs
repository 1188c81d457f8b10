//! 腾讯云 STS AssumeRole

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::credentials::{
    AccessCredential, DelegatedCredential, ROLE_SESSION_DURATION_SECS, ROLE_SESSION_NAME,
    RoleAssumer,
};
use crate::error::{ProviderError, Result};
use crate::traits::ErrorContext;

use super::http::TencentClient;
use super::types::{AssumeRoleParams, AssumeRoleResponse};
use super::{DEFAULT_REGION, TencentEndpoint};

/// Exchanges an account's static SecretId/SecretKey for a CAM role session.
pub struct TencentRoleAssumer {
    client: TencentClient,
    endpoint: TencentEndpoint,
    credential: AccessCredential,
    role_arn: String,
}

impl TencentRoleAssumer {
    /// `region` falls back to `ap-guangzhou`; STS rejects requests without one.
    pub fn new(
        credential: AccessCredential,
        role_arn: impl Into<String>,
        region: Option<String>,
    ) -> Result<Self> {
        Ok(Self {
            client: TencentClient::new(1)?,
            endpoint: TencentEndpoint::sts(region.unwrap_or_else(|| DEFAULT_REGION.to_string())),
            credential,
            role_arn: role_arn.into(),
        })
    }
}

#[async_trait]
impl RoleAssumer for TencentRoleAssumer {
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
        provider: "tencent".to_string(),
        role: role_arn.to_string(),
        detail,
    };

    let credentials = response
        .credentials
        .ok_or_else(|| exchange_error("response carries no Credentials".to_string()))?;

    // ExpiredTime (unix seconds) is authoritative; Expiration is the same instant as text.
    let expiration = match (response.expired_time, response.expiration.as_deref()) {
        (Some(ts), _) => DateTime::from_timestamp(ts, 0)
            .ok_or_else(|| exchange_error(format!("invalid ExpiredTime {ts}")))?,
        (None, Some(text)) => DateTime::parse_from_rfc3339(text)
            .map_err(|e| exchange_error(format!("invalid Expiration '{text}': {e}")))?
            .with_timezone(&Utc),
        (None, None) => return Err(exchange_error("response carries no expiration".to_string())),
    };

    Ok(DelegatedCredential {
        access_key_id: credentials.tmp_secret_id,
        access_key_secret: credentials.tmp_secret_key,
        security_token: credentials.token,
        expiration,
    })
}
