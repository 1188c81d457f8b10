//! 腾讯云 DNS Provider (`DNSPod` 公网解析 + PrivateDNS 内网解析)

mod error;
mod http;
mod provider;
mod sign;
mod sts;
mod types;

use std::sync::Arc;

use crate::credentials::CredentialManager;
use crate::error::Result;
use crate::types::Account;

pub use sts::TencentRoleAssumer;

use http::TencentClient;

/// STS requires a region; used when the account does not set one.
const DEFAULT_REGION: &str = "ap-guangzhou";

/// `DescribeDomainList` / PrivateDNS 单页条数
pub(crate) const ZONE_PAGE_SIZE: u32 = 100;
/// `DescribeRecordList` 单页条数
pub(crate) const RECORD_PAGE_SIZE: u32 = 500;

/// A Tencent Cloud API product endpoint.
#[derive(Debug, Clone)]
pub(crate) struct TencentEndpoint {
    pub host: &'static str,
    /// Service name used in the TC3 credential scope.
    pub service: &'static str,
    pub version: &'static str,
    pub region: Option<String>,
}

impl TencentEndpoint {
    fn dnspod() -> Self {
        Self {
            host: "dnspod.tencentcloudapi.com",
            service: "dnspod",
            version: "2021-03-23",
            region: None,
        }
    }

    fn privatedns(region: Option<String>) -> Self {
        Self {
            host: "privatedns.tencentcloudapi.com",
            service: "privatedns",
            version: "2020-10-28",
            region,
        }
    }

    fn sts(region: String) -> Self {
        Self {
            host: "sts.tencentcloudapi.com",
            service: "sts",
            version: "2018-08-13",
            region: Some(region),
        }
    }
}

/// Tencent Cloud adapter bound to one account.
///
/// Public zones come from `DNSPod`, private zones from PrivateDNS. Requests are signed
/// with TC3-HMAC-SHA256; delegated credentials additionally send `X-TC-Token`.
pub struct TencentProvider {
    pub(crate) client: TencentClient,
    pub(crate) account: Account,
    pub(crate) credentials: Arc<CredentialManager>,
    pub(crate) dnspod: TencentEndpoint,
    pub(crate) privatedns: TencentEndpoint,
}

/// Builder for [`TencentProvider`] with configurable retry behavior.
pub struct TencentProviderBuilder {
    account: Account,
    credentials: Arc<CredentialManager>,
    max_retries: u32,
}

impl TencentProviderBuilder {
    /// Set the maximum number of automatic retries for transient errors (default: 2).
    #[must_use]
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    pub fn build(self) -> Result<TencentProvider> {
        Ok(TencentProvider {
            client: TencentClient::new(self.max_retries)?,
            dnspod: TencentEndpoint::dnspod(),
            privatedns: TencentEndpoint::privatedns(self.account.region.clone()),
            account: self.account,
            credentials: self.credentials,
        })
    }
}

impl TencentProvider {
    pub fn new(account: Account, credentials: Arc<CredentialManager>) -> Result<Self> {
        Self::builder(account, credentials).build()
    }

    pub fn builder(account: Account, credentials: Arc<CredentialManager>) -> TencentProviderBuilder {
        TencentProviderBuilder {
            account,
            credentials,
            max_retries: 2,
        }
    }
}
