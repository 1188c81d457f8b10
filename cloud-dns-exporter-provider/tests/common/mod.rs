//! 共享测试工具和辅助函数

#![allow(dead_code)]

use std::collections::HashMap;
use std::env;
use std::sync::Arc;

use cloud_dns_exporter_provider::{
    Account, DnsProvider, ProviderType, create_credential_manager, create_provider,
};

/// 跳过测试的宏（当环境变量缺失时）
#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("跳过测试: 缺少环境变量 {}", $var);
                return;
            }
        )+
    };
}

/// 断言 `Option` 为 `Some`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_some {
    ($expr:expr $(,)?) => {{
        let opt = $expr;
        assert!(opt.is_some(), "expected Some(..), got None");
        let Some(val) = opt else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let opt = $expr;
        assert!(opt.is_some(), "{}", format_args!($($msg)+));
        let Some(val) = opt else {
            return;
        };
        val
    }};
}

/// 断言 `Result` 为 `Ok`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {res:?}",
            format_args!($($msg)+)
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

/// 测试上下文 - 封装 Provider 和账号
pub struct TestContext {
    pub provider: Arc<dyn DnsProvider>,
    pub account: Account,
}

impl TestContext {
    /// 创建 Aliyun 测试上下文
    pub fn aliyun() -> Option<Self> {
        Self::from_env(
            ProviderType::Aliyun,
            "ALIYUN_ACCESS_KEY_ID",
            "ALIYUN_ACCESS_KEY_SECRET",
            "ALIYUN_ROLE_ARN",
        )
    }

    /// 创建腾讯云测试上下文
    pub fn tencent() -> Option<Self> {
        Self::from_env(
            ProviderType::Tencent,
            "TENCENT_SECRET_ID",
            "TENCENT_SECRET_KEY",
            "TENCENT_ROLE_ARN",
        )
    }

    /// `TEST_ENABLE_PRIVATE_DNS` 与 `*_ROLE_ARN` 为可选项
    fn from_env(provider: ProviderType, id_var: &str, key_var: &str, role_var: &str) -> Option<Self> {
        let mut fields = HashMap::from([
            ("name".to_string(), "integration".to_string()),
            ("secretId".to_string(), env::var(id_var).ok()?),
            ("secretKey".to_string(), env::var(key_var).ok()?),
        ]);
        if let Ok(role) = env::var(role_var) {
            fields.insert("roleArn".to_string(), role);
        }
        if let Ok(flag) = env::var("TEST_ENABLE_PRIVATE_DNS") {
            fields.insert("enablePrivateDNS".to_string(), flag);
        }

        let account = Account::from_map(provider, &fields).ok()?;
        let credentials = Arc::new(create_credential_manager(&account).ok()?);
        let provider = create_provider(&account, credentials).ok()?;

        Some(Self { provider, account })
    }
}
