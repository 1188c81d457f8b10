use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::types::{Domain, Record};

/// 原始 API 错误（内部使用）
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    /// 错误码（各 Provider 格式不同）
    pub code: Option<String>,
    /// 原始错误消息
    pub message: String,
}

impl RawApiError {
    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }
}

/// Extra information used when mapping a raw API error.
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorContext {
    /// Domain name or zone id the failing call was about.
    pub domain: Option<String>,
    /// Role being assumed, for STS calls.
    pub role: Option<String>,
}

impl ErrorContext {
    pub fn domain(domain: impl Into<String>) -> Self {
        Self {
            domain: Some(domain.into()),
            role: None,
        }
    }

    pub fn role(role: impl Into<String>) -> Self {
        Self {
            domain: None,
            role: Some(role.into()),
        }
    }
}

/// Provider 错误映射 Trait（内部使用）
/// 各 Provider 实现此 trait 以将原始 API 错误映射到统一错误类型
pub(crate) trait ProviderErrorMapper {
    /// 返回 Provider 标识符
    fn provider_name(&self) -> &'static str;

    /// 将原始 API 错误映射到统一错误类型
    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError;

    fn parse_error(&self, detail: impl ToString) -> ProviderError {
        ProviderError::ParseError {
            provider: self.provider_name().to_string(),
            detail: detail.to_string(),
        }
    }

    fn unknown_error(&self, raw: RawApiError) -> ProviderError {
        ProviderError::Unknown {
            provider: self.provider_name().to_string(),
            raw_code: raw.code,
            raw_message: raw.message,
        }
    }
}

/// Read-only view of one cloud account's DNS inventory.
///
/// An adapter is bound to a single account. Each listing independently covers the
/// public zones and, when the account enables it, the private zones. A failure in one
/// visibility class is logged and the other class is still returned; `Err` means no
/// class could be collected at all (or no credential could be obtained).
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Provider identifier (`aliyun`, `tencent`).
    fn id(&self) -> &'static str;

    /// All zones of the account.
    async fn list_domains(&self) -> Result<Vec<Domain>>;

    /// All records across all zones of the account.
    async fn list_records(&self) -> Result<Vec<Record>>;
}
