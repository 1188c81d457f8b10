//! Aliyun Provider 集成测试 (只读)
//!
//! 运行方式:
//! ```bash
//! ALIYUN_ACCESS_KEY_ID=xxx ALIYUN_ACCESS_KEY_SECRET=xxx \
//!     cargo test -p cloud-dns-exporter-provider --test aliyun_test -- --ignored --nocapture
//! ```
//!
//! 可选: `ALIYUN_ROLE_ARN` 走 STS 临时凭证, `TEST_ENABLE_PRIVATE_DNS=true` 同时采集内网解析。

mod common;

use std::collections::HashSet;

use common::TestContext;
use cloud_dns_exporter_provider::{DomainType, RecordStatus};

#[tokio::test]
#[ignore = "integration test: requires ALIYUN_ACCESS_KEY_ID and ALIYUN_ACCESS_KEY_SECRET"]
async fn test_aliyun_list_domains() {
    skip_if_no_credentials!("ALIYUN_ACCESS_KEY_ID", "ALIYUN_ACCESS_KEY_SECRET");

    let ctx = require_some!(TestContext::aliyun(), "创建测试上下文失败");
    let domains = require_ok!(ctx.provider.list_domains().await, "list_domains 调用失败");

    let ids: HashSet<_> = domains.iter().map(|d| d.domain_id.as_str()).collect();
    assert_eq!(ids.len(), domains.len(), "domain_id 应唯一");
    for domain in &domains {
        let prefix = match domain.domain_type {
            DomainType::Public => "public_",
            DomainType::Private => "private_",
        };
        assert!(domain.domain_id.starts_with(prefix), "{}", domain.domain_id);
        assert_eq!(domain.cloud_provider, "aliyun");
    }

    println!("✓ list_domains 测试通过，共 {} 个域名", domains.len());
}

#[tokio::test]
#[ignore = "integration test: requires ALIYUN_ACCESS_KEY_ID and ALIYUN_ACCESS_KEY_SECRET"]
async fn test_aliyun_list_records() {
    skip_if_no_credentials!("ALIYUN_ACCESS_KEY_ID", "ALIYUN_ACCESS_KEY_SECRET");

    let ctx = require_some!(TestContext::aliyun(), "创建测试上下文失败");
    let records = require_ok!(ctx.provider.list_records().await, "list_records 调用失败");

    for record in &records {
        assert!(
            record.full_record.ends_with(&record.domain_name),
            "{} 应以 {} 结尾",
            record.full_record,
            record.domain_name
        );
        if !ctx.account.enable_private_dns {
            assert_eq!(record.domain_type, DomainType::Public);
        }
    }
    let enabled = records
        .iter()
        .filter(|r| r.record_status == RecordStatus::Enable)
        .count();

    println!(
        "✓ list_records 测试通过，共 {} 条记录 ({enabled} 条启用)",
        records.len()
    );
}
