//! Provider 公共工具函数

use std::future::Future;
use std::time::Duration;

use hmac::{Hmac, Mac};
use reqwest::Client;
use sha2::{Digest, Sha256};

use crate::error::{ProviderError, Result};

type HmacSha256 = Hmac<Sha256>;

// ============ HTTP Client ============

/// 默认连接超时（秒）
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// 默认请求超时（秒）
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Build the HTTP client shared by one adapter and its STS client.
pub fn create_http_client(provider: &str) -> Result<Client> {
    Client::builder()
        .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
        .build()
        .map_err(|e| ProviderError::NetworkError {
            provider: provider.to_string(),
            detail: format!("Failed to create HTTP client: {e}"),
        })
}

// ============ Hashing ============

/// HMAC-SHA256 计算（供 aliyun/tencent 签名使用）
#[allow(clippy::expect_used)]
pub fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

// ============ 域名名称处理 ============

/// 去掉域名末尾的点
pub fn normalize_domain_name(name: &str) -> String {
    name.trim_end_matches('.').to_string()
}

/// Fully-qualified record name.
/// 如: "www" + "example.com" -> "www.example.com"
/// 如: "@" / "" + "example.com" -> "example.com"
pub fn full_record_name(label: &str, zone_name: &str) -> String {
    let zone = normalize_domain_name(zone_name);
    let label = label.trim();

    if label == "@" || label.is_empty() {
        zone
    } else {
        format!("{label}.{zone}")
    }
}

// ============ Partial failure handling ============

/// Combine the public and (optional) private listing of one account.
///
/// A failing class is logged and skipped. Only when every attempted class fails is an
/// error returned, so the caller keeps its previous snapshot instead of an empty one.
pub(crate) async fn merge_visibility_classes<T>(
    provider: &str,
    account: &str,
    listing: &str,
    public: impl Future<Output = Result<Vec<T>>>,
    private: Option<impl Future<Output = Result<Vec<T>>>>,
) -> Result<Vec<T>> {
    let mut items = Vec::new();
    let mut succeeded = 0_usize;
    let mut last_error = None;

    let mut absorb = |class: &str, result: Result<Vec<T>>| match result {
        Ok(batch) => {
            log::debug!(
                "[{provider}] {account}: {} {class} {listing}",
                batch.len()
            );
            items.extend(batch);
            succeeded += 1;
        }
        Err(e) => {
            log_failure(&e, &format!("[{provider}] {account}: listing {class} {listing} failed"));
            last_error = Some(e);
        }
    };

    absorb("public", public.await);
    if let Some(private) = private {
        absorb("private", private.await);
    }

    match last_error {
        Some(e) if succeeded == 0 => Err(ProviderError::CollectionFailed {
            provider: provider.to_string(),
            listing: listing.to_string(),
            detail: e.to_string(),
        }),
        _ => Ok(items),
    }
}

/// List records zone by zone; a failing zone is logged and skipped.
pub(crate) async fn collect_per_zone<Z, T, F, Fut>(
    provider: &str,
    zones: Vec<Z>,
    zone_label: impl Fn(&Z) -> String,
    mut list_zone: F,
) -> Vec<T>
where
    F: FnMut(Z) -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    let mut records = Vec::new();
    for zone in zones {
        let label = zone_label(&zone);
        match list_zone(zone).await {
            Ok(batch) => records.extend(batch),
            Err(e) => log_failure(&e, &format!("[{provider}] Skipping zone {label}")),
        }
    }
    records
}

pub(crate) fn log_failure(error: &ProviderError, context: &str) {
    if error.is_expected() {
        log::warn!("{context}: {error}");
    } else {
        log::error!("{context}: {error}");
    }
}
