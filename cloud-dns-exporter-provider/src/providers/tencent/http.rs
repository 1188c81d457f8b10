//! 腾讯云 API 请求执行 (JSON body, 统一 `Response` 信封)

use chrono::Utc;
use reqwest::{Client, RequestBuilder};
use serde::{Serialize, de::DeserializeOwned};

use crate::credentials::AccessCredential;
use crate::error::{ProviderError, Result};
use crate::http_client;
use crate::providers::common::create_http_client;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::TencentEndpoint;
use super::error::TencentErrorMapper;
use super::sign::authorization;
use super::types::TencentError;

/// Signed request executor shared by the DNS adapter and the STS client.
pub(crate) struct TencentClient {
    http: Client,
    max_retries: u32,
}

impl TencentClient {
    pub fn new(max_retries: u32) -> Result<Self> {
        Ok(Self {
            http: create_http_client(TencentErrorMapper.provider_name())?,
            max_retries,
        })
    }

    pub async fn call<T: DeserializeOwned, B: Serialize>(
        &self,
        credential: &AccessCredential,
        endpoint: &TencentEndpoint,
        action: &str,
        body: &B,
        ctx: ErrorContext,
    ) -> Result<T> {
        let mapper = TencentErrorMapper;
        let payload =
            serde_json::to_string(body).map_err(|e| ProviderError::SerializationError {
                provider: mapper.provider_name().to_string(),
                detail: e.to_string(),
            })?;

        let label = format!("{} {action}", endpoint.host);
        let reply = http_client::send_with_retry(
            || self.signed_request(credential, endpoint, action, &payload),
            mapper.provider_name(),
            &label,
            self.max_retries,
        )
        .await?;

        let envelope: serde_json::Value = reply.json(mapper.provider_name())?;
        let response = unwrap_envelope(envelope, &mapper, ctx)?;
        serde_json::from_value(response).map_err(|e| mapper.parse_error(e))
    }
}

impl TencentClient {
    /// Build a request signed with the current timestamp.
    fn signed_request(
        &self,
        credential: &AccessCredential,
        endpoint: &TencentEndpoint,
        action: &str,
        payload: &str,
    ) -> RequestBuilder {
        let timestamp = Utc::now().timestamp();
        let auth = authorization(
            &credential.access_key_id,
            &credential.access_key_secret,
            endpoint,
            action,
            payload,
            timestamp,
        );

        let mut request = self
            .http
            .post(format!("https://{}", endpoint.host))
            .header("Content-Type", "application/json; charset=utf-8")
            .header("Host", endpoint.host)
            .header("X-TC-Action", action)
            .header("X-TC-Version", endpoint.version)
            .header("X-TC-Timestamp", timestamp.to_string())
            .header("Authorization", auth);
        if let Some(region) = endpoint.region.as_deref() {
            request = request.header("X-TC-Region", region);
        }
        if let Some(token) = credential.security_token.as_deref() {
            request = request.header("X-TC-Token", token);
        }
        request.body(payload.to_string())
    }
}

/// Extract `Response`, turning an embedded `Error` into a mapped [`ProviderError`].
fn unwrap_envelope(
    mut envelope: serde_json::Value,
    mapper: &TencentErrorMapper,
    ctx: ErrorContext,
) -> Result<serde_json::Value> {
    let Some(response) = envelope.get_mut("Response").map(serde_json::Value::take) else {
        return Err(mapper.parse_error("Missing Response in body"));
    };

    if let Some(error) = response.get("Error") {
        let error: TencentError =
            serde_json::from_value(error.clone()).map_err(|e| mapper.parse_error(e))?;
        return Err(mapper.map_error(RawApiError::with_code(error.code, error.message), ctx));
    }

    Ok(response)
}
