//! Shared HTTP execution for all vendor adapters.
//!
//! Adapters sign and build their own `RequestBuilder`; this module sends it,
//! classifies transport failures into [`ProviderError`] and retries the transient ones.

use std::time::Duration;

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;

use crate::error::{ProviderError, Result};
use crate::utils::log_sanitizer::truncate_for_log;

/// Upper bound for a server-provided `Retry-After`.
const MAX_RETRY_AFTER_SECS: u64 = 30;
/// Upper bound for exponential backoff.
const MAX_BACKOFF_MS: u64 = 10_000;
const BASE_BACKOFF_MS: u64 = 100;

/// A fully read HTTP response.
#[derive(Debug)]
pub(crate) struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn is_error_status(&self) -> bool {
        self.status >= 400
    }

    /// Deserialize the body, logging a truncated copy on failure.
    pub fn json<T: DeserializeOwned>(&self, provider: &str) -> Result<T> {
        parse_json(&self.body, provider)
    }
}

pub(crate) fn parse_json<T: DeserializeOwned>(body: &str, provider: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| {
        log::error!("[{provider}] JSON parse failed: {e}");
        log::error!("[{provider}] Raw response: {}", truncate_for_log(body));
        ProviderError::ParseError {
            provider: provider.to_string(),
            detail: e.to_string(),
        }
    })
}

/// Send a request once.
///
/// HTTP 429 becomes [`ProviderError::RateLimited`] and 502-504 become
/// [`ProviderError::NetworkError`]; other statuses are returned to the caller,
/// which knows how to read the vendor's error envelope.
pub(crate) async fn send_once(
    request: RequestBuilder,
    provider: &str,
    label: &str,
) -> Result<HttpReply> {
    log::debug!("[{provider}] POST {label}");

    let response = request.send().await.map_err(|e| {
        if e.is_timeout() {
            ProviderError::Timeout {
                provider: provider.to_string(),
                detail: e.to_string(),
            }
        } else {
            ProviderError::NetworkError {
                provider: provider.to_string(),
                detail: e.to_string(),
            }
        }
    })?;

    let status = response.status().as_u16();
    let retry_after = response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());

    if status == 429 {
        let body = response.text().await.unwrap_or_default();
        log::warn!("[{provider}] Rate limited (HTTP 429), retry_after={retry_after:?}");
        return Err(ProviderError::RateLimited {
            provider: provider.to_string(),
            retry_after,
            raw_message: Some(truncate_for_log(&body)),
        });
    }

    if matches!(status, 502..=504) {
        let body = response.text().await.unwrap_or_default();
        log::warn!("[{provider}] Upstream unavailable (HTTP {status})");
        return Err(ProviderError::NetworkError {
            provider: provider.to_string(),
            detail: format!("HTTP {status}: {}", truncate_for_log(&body)),
        });
    }

    let body = response
        .text()
        .await
        .map_err(|e| ProviderError::NetworkError {
            provider: provider.to_string(),
            detail: format!("Failed to read response body: {e}"),
        })?;

    log::debug!(
        "[{provider}] HTTP {status} {label}: {}",
        truncate_for_log(&body)
    );

    Ok(HttpReply { status, body })
}

/// Send a request, retrying transient failures up to `max_retries` extra times.
///
/// `build` is called once per attempt so that every attempt carries a fresh
/// signature (timestamp and nonce). Business errors (bad credentials, missing
/// zone, ...) are never retried here; only [`is_retryable`] failures are.
pub(crate) async fn send_with_retry<F>(
    mut build: F,
    provider: &str,
    label: &str,
    max_retries: u32,
) -> Result<HttpReply>
where
    F: FnMut() -> RequestBuilder,
{
    let mut attempt = 0;
    loop {
        match send_once(build(), provider, label).await {
            Err(e) if attempt < max_retries && is_retryable(&e) => {
                let delay = retry_delay(&e, attempt);
                log::warn!(
                    "[{provider}] {label} failed (attempt {}/{}), retrying in {:.1}s: {e}",
                    attempt + 1,
                    max_retries + 1,
                    delay.as_secs_f32(),
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            other => return other,
        }
    }
}

fn is_retryable(error: &ProviderError) -> bool {
    matches!(
        error,
        ProviderError::NetworkError { .. }
            | ProviderError::Timeout { .. }
            | ProviderError::RateLimited { .. }
    )
}

fn retry_delay(error: &ProviderError, attempt: u32) -> Duration {
    match error {
        ProviderError::RateLimited {
            retry_after: Some(secs),
            ..
        } => Duration::from_secs((*secs).min(MAX_RETRY_AFTER_SECS)),
        _ => backoff_delay(attempt),
    }
}

/// 100ms, 200ms, 400ms, ... capped at 10s.
fn backoff_delay(attempt: u32) -> Duration {
    let shift = attempt.min(20);
    let delay_ms = BASE_BACKOFF_MS.saturating_mul(1_u64 << shift);
    Duration::from_millis(delay_ms.min(MAX_BACKOFF_MS))
}
