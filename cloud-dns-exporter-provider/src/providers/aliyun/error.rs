//! 阿里云错误映射

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

/// 阿里云错误码映射 (Alidns / PrivateZone / STS)
/// 参考: <https://api.aliyun.com/document/Alidns/2015-01-09/errorCode>
pub(crate) struct AliyunErrorMapper;

impl ProviderErrorMapper for AliyunErrorMapper {
    fn provider_name(&self) -> &'static str {
        "aliyun"
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        let provider = self.provider_name().to_string();
        match raw.code.as_deref() {
            // ============ 认证错误 ============
            Some(
                "InvalidAccessKeyId.NotFound"
                | "InvalidAccessKeyId.Inactive"
                | "SignatureDoesNotMatch"
                | "InvalidSecurityToken.Expired"
                | "InvalidSecurityToken.Malformed"
                | "InvalidSecurityToken.MismatchWithAccessKey",
            ) => ProviderError::InvalidCredentials {
                provider,
                raw_message: Some(raw.message),
            },

            // ============ STS AssumeRole 失败 ============
            Some(code)
                if context.role.is_some()
                    && (code.starts_with("NoPermission")
                        || code.starts_with("EntityNotExist.Role")
                        || code.starts_with("InvalidParameter.RoleArn")) =>
            {
                ProviderError::CredentialExchange {
                    provider,
                    role: context.role.unwrap_or_default(),
                    detail: format!("{code}: {}", raw.message),
                }
            }

            // ============ 域名 / Zone 不存在 ============
            Some(
                "InvalidDomainName.NoExist"
                | "DomainNotFound"
                | "Zone.NotExists"
                | "Zone.Invalid.Id",
            ) => ProviderError::DomainNotFound {
                provider,
                domain: context.domain.unwrap_or_default(),
                raw_message: Some(raw.message),
            },

            // ============ 频率限流（可重试） ============
            Some("Throttling" | "Throttling.User" | "Throttling.Api" | "System.Busy") => {
                ProviderError::RateLimited {
                    provider,
                    retry_after: None,
                    raw_message: Some(raw.message),
                }
            }

            // ============ 权限不足 ============
            Some(
                "Forbidden"
                | "Forbidden.RAM"
                | "Forbidden.NotAuthorized"
                | "NoPermission"
                | "IncorrectDomainUser"
                | "InvalidUser.NotFound",
            ) => ProviderError::PermissionDenied {
                provider,
                raw_message: Some(raw.message),
            },

            _ => self.unknown_error(raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(code: &str, ctx: ErrorContext) -> ProviderError {
        AliyunErrorMapper.map_error(RawApiError::with_code(code, "msg"), ctx)
    }

    #[test]
    fn auth_codes() {
        for code in ["InvalidAccessKeyId.NotFound", "SignatureDoesNotMatch", "InvalidSecurityToken.Expired"] {
            assert!(
                matches!(map(code, ErrorContext::default()), ProviderError::InvalidCredentials { .. }),
                "{code}"
            );
        }
    }

    #[test]
    fn role_failures_only_during_assume_role() {
        let sts = map("NoPermission", ErrorContext::role("acs:ram::1:role/dns"));
        let dns = map("NoPermission", ErrorContext::default());
        assert!(
            matches!(&sts, ProviderError::CredentialExchange { role, .. } if role == "acs:ram::1:role/dns"),
            "got {sts:?}"
        );
        assert!(matches!(dns, ProviderError::PermissionDenied { .. }), "got {dns:?}");
    }

    #[test]
    fn missing_zone_carries_context() {
        let e = map("Zone.NotExists", ErrorContext::domain("zone-1"));
        assert!(matches!(&e, ProviderError::DomainNotFound { domain, .. } if domain == "zone-1"));
    }

    #[test]
    fn throttling_is_rate_limited() {
        assert!(matches!(
            map("Throttling.User", ErrorContext::default()),
            ProviderError::RateLimited { .. }
        ));
    }

    #[test]
    fn unknown_code_preserved() {
        let e = map("Something.New", ErrorContext::default());
        assert!(
            matches!(&e, ProviderError::Unknown { raw_code: Some(c), .. } if c == "Something.New")
        );
    }
}
