//! 阿里云 DNS Provider (Alidns 公网解析 + PrivateZone 内网解析)

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

pub use sts::AliyunRoleAssumer;

use http::AliyunClient;

/// 空 body 的 SHA256 hash (固定值)
pub(crate) const EMPTY_BODY_SHA256: &str =
    "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

const ALIDNS_HOST: &str = "alidns.cn-hangzhou.aliyuncs.com";
const ALIDNS_VERSION: &str = "2015-01-09";
const PVTZ_VERSION: &str = "2018-01-01";
const STS_HOST: &str = "sts.aliyuncs.com";
const STS_VERSION: &str = "2015-04-01";
/// PrivateZone is served per region; used when the account does not set one.
const DEFAULT_REGION: &str = "cn-hangzhou";

/// `DescribeDomains` / `DescribeZones` / `DescribeZoneRecords` 单页条数
pub(crate) const ZONE_PAGE_SIZE: u32 = 100;
/// `DescribeDomainRecords` 单页条数
pub(crate) const RECORD_PAGE_SIZE: u32 = 500;

/// An API product endpoint (host + API version).
#[derive(Debug, Clone)]
pub(crate) struct AliyunEndpoint {
    pub host: String,
    pub version: &'static str,
}

impl AliyunEndpoint {
    fn alidns() -> Self {
        Self {
            host: ALIDNS_HOST.to_string(),
            version: ALIDNS_VERSION,
        }
    }

    fn pvtz(region: &str) -> Self {
        Self {
            host: format!("pvtz.{region}.aliyuncs.com"),
            version: PVTZ_VERSION,
        }
    }

    fn sts() -> Self {
        Self {
            host: STS_HOST.to_string(),
            version: STS_VERSION,
        }
    }
}

/// Aliyun adapter bound to one account.
///
/// Public zones come from Alidns, private zones from PrivateZone. Requests are signed
/// with ACS3-HMAC-SHA256 using whatever credential the account's
/// [`CredentialManager`] resolves.
pub struct AliyunProvider {
    pub(crate) client: AliyunClient,
    pub(crate) account: Account,
    pub(crate) credentials: Arc<CredentialManager>,
    pub(crate) alidns: AliyunEndpoint,
    pub(crate) pvtz: AliyunEndpoint,
}

/// Builder for [`AliyunProvider`] with configurable retry behavior.
pub struct AliyunProviderBuilder {
    account: Account,
    credentials: Arc<CredentialManager>,
    max_retries: u32,
}

impl AliyunProviderBuilder {
    /// Set the maximum number of automatic retries for transient errors (default: 2).
    #[must_use]
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    pub fn build(self) -> Result<AliyunProvider> {
        let region = self.account.region.as_deref().unwrap_or(DEFAULT_REGION);
        Ok(AliyunProvider {
            client: AliyunClient::new(self.max_retries)?,
            pvtz: AliyunEndpoint::pvtz(region),
            alidns: AliyunEndpoint::alidns(),
            account: self.account,
            credentials: self.credentials,
        })
    }
}

impl AliyunProvider {
    pub fn new(account: Account, credentials: Arc<CredentialManager>) -> Result<Self> {
        Self::builder(account, credentials).build()
    }

    pub fn builder(account: Account, credentials: Arc<CredentialManager>) -> AliyunProviderBuilder {
        AliyunProviderBuilder {
            account,
            credentials,
            max_retries: 2,
        }
    }
}
