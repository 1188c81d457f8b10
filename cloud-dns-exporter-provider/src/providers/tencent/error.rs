//! 腾讯云错误映射

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

/// 腾讯云错误码映射 (`DNSPod` / PrivateDNS / STS)
/// 参考: <https://cloud.tencent.com/document/api/1427/56192>
pub(crate) struct TencentErrorMapper;

impl ProviderErrorMapper for TencentErrorMapper {
    fn provider_name(&self) -> &'static str {
        "tencent"
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        let provider = self.provider_name().to_string();
        match raw.code.as_deref() {
            // ============ STS AssumeRole 失败 ============
            // 放在认证错误之前: 角色不可扮演时 STS 同样返回 AuthFailure.*
            Some(code)
                if context.role.is_some()
                    && (code.starts_with("InvalidParameter")
                        || code.starts_with("UnauthorizedOperation")
                        || code == "AuthFailure.UnauthorizedOperation"
                        || code.starts_with("ResourceNotFound")) =>
            {
                ProviderError::CredentialExchange {
                    provider,
                    role: context.role.unwrap_or_default(),
                    detail: format!("{code}: {}", raw.message),
                }
            }

            // ============ 认证错误 ============
            Some(
                "AuthFailure"
                | "AuthFailure.SecretIdNotFound"
                | "AuthFailure.SignatureFailure"
                | "AuthFailure.SignatureExpire"
                | "AuthFailure.TokenFailure"
                | "AuthFailure.InvalidSecretId"
                | "AuthFailure.InvalidAuthorization",
            ) => ProviderError::InvalidCredentials {
                provider,
                raw_message: Some(raw.message),
            },

            // ============ 无记录 / 域名不存在 ============
            Some("ResourceNotFound.NoDataOfRecord") => ProviderError::NoRecords {
                provider,
                domain: context.domain.unwrap_or_default(),
            },
            Some("ResourceNotFound.NoDataOfDomain") => match context.domain {
                // 列表请求: 账号下没有任何域名
                None => ProviderError::NoRecords {
                    provider,
                    domain: String::new(),
                },
                Some(domain) => ProviderError::DomainNotFound {
                    provider,
                    domain,
                    raw_message: Some(raw.message),
                },
            },
            Some(
                "InvalidParameterValue.DomainNotExists"
                | "InvalidParameter.DomainNotExist"
                | "ResourceNotFound.ZoneNotExists",
            ) => ProviderError::DomainNotFound {
                provider,
                domain: context.domain.unwrap_or_default(),
                raw_message: Some(raw.message),
            },

            // ============ 频率限流（可重试） ============
            Some("RequestLimitExceeded" | "RequestLimitExceeded.UinLimitExceeded" | "LimitExceeded") => {
                ProviderError::RateLimited {
                    provider,
                    retry_after: None,
                    raw_message: Some(raw.message),
                }
            }

            // ============ 权限不足 ============
            Some(code)
                if code.starts_with("UnauthorizedOperation")
                    || code.starts_with("OperationDenied")
                    || code == "AuthFailure.UnauthorizedOperation" =>
            {
                ProviderError::PermissionDenied {
                    provider,
                    raw_message: Some(raw.message),
                }
            }

            _ => self.unknown_error(raw),
        }
    }
}
