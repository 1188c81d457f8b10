//! 阿里云 RPC 请求执行 (参数通过 query string 传递, body 为空)

use chrono::Utc;
use reqwest::{Client, RequestBuilder};
use serde::{Serialize, de::DeserializeOwned};

use crate::credentials::AccessCredential;
use crate::error::{ProviderError, Result};
use crate::http_client;
use crate::providers::common::create_http_client;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::error::AliyunErrorMapper;
use super::sign::{SignInput, authorization};
use super::types::to_query_string;
use super::{AliyunEndpoint, EMPTY_BODY_SHA256};

/// Signed request executor shared by the DNS adapter and the STS client.
pub(crate) struct AliyunClient {
    http: Client,
    max_retries: u32,
}

impl AliyunClient {
    pub fn new(max_retries: u32) -> Result<Self> {
        Ok(Self {
            http: create_http_client(AliyunErrorMapper.provider_name())?,
            max_retries,
        })
    }

    pub async fn call<T: DeserializeOwned, P: Serialize>(
        &self,
        credential: &AccessCredential,
        endpoint: &AliyunEndpoint,
        action: &str,
        params: &P,
        ctx: ErrorContext,
    ) -> Result<T> {
        let mapper = AliyunErrorMapper;
        let query_string = to_query_string(params)?;

        let label = format!("{} {action}", endpoint.host);
        let reply = http_client::send_with_retry(
            || self.signed_request(credential, endpoint, action, &query_string),
            mapper.provider_name(),
            &label,
            self.max_retries,
        )
        .await?;

        // Error bodies and (rarely) 200 bodies carry Code/Message
        let value: serde_json::Value = match reply.json(mapper.provider_name()) {
            Ok(value) => value,
            Err(_) if reply.is_error_status() => {
                return Err(ProviderError::NetworkError {
                    provider: mapper.provider_name().to_string(),
                    detail: format!("HTTP {} from {label}", reply.status),
                });
            }
            Err(e) => return Err(e),
        };

        if let Some(raw) = api_error(&value) {
            log::debug!("[aliyun] {label}: {} - {}", raw.code.as_deref().unwrap_or_default(), raw.message);
            return Err(mapper.map_error(raw, ctx));
        }
        if reply.is_error_status() {
            return Err(mapper.unknown_error(RawApiError::with_code(
                reply.status.to_string(),
                format!("HTTP {} from {label}", reply.status),
            )));
        }

        serde_json::from_value(value).map_err(|e| mapper.parse_error(e))
    }
}

impl AliyunClient {
    /// Build a request signed with a fresh timestamp and nonce.
    ///
    /// Aliyun rejects a reused `x-acs-signature-nonce`, so retries must not resend
    /// an earlier request.
    fn signed_request(
        &self,
        credential: &AccessCredential,
        endpoint: &AliyunEndpoint,
        action: &str,
        query_string: &str,
    ) -> RequestBuilder {
        let timestamp = Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
        let nonce = uuid::Uuid::new_v4().to_string();

        let auth = authorization(
            credential,
            endpoint,
            &SignInput {
                action,
                query_string,
                timestamp: &timestamp,
                nonce: &nonce,
            },
        );

        let url = if query_string.is_empty() {
            format!("https://{}/", endpoint.host)
        } else {
            format!("https://{}/?{query_string}", endpoint.host)
        };

        let mut request = self
            .http
            .post(&url)
            .header("Host", &endpoint.host)
            .header("x-acs-action", action)
            .header("x-acs-version", endpoint.version)
            .header("x-acs-date", &timestamp)
            .header("x-acs-signature-nonce", &nonce)
            .header("x-acs-content-sha256", EMPTY_BODY_SHA256)
            .header("Authorization", auth);
        if let Some(token) = credential.security_token.as_deref() {
            request = request.header("x-acs-security-token", token);
        }
        request
    }
}

fn api_error(value: &serde_json::Value) -> Option<RawApiError> {
    let code = value.get("Code").and_then(|v| v.as_str())?;
    let message = value
        .get("Message")
        .and_then(|v| v.as_str())
        .unwrap_or_default();
    Some(RawApiError::with_code(code, message))
}
