//! 腾讯云 TC3-HMAC-SHA256 签名

use chrono::{DateTime, Utc};

use crate::providers::common::{hmac_sha256, sha256_hex};

use super::TencentEndpoint;

const ALGORITHM: &str = "TC3-HMAC-SHA256";
const SIGNED_HEADERS: &str = "content-type;host;x-tc-action";

/// 生成 TC3-HMAC-SHA256 Authorization 头
///
/// The credential scope is `<date>/<service>/tc3_request`, where the service comes
/// from the endpoint. A session token is sent as a plain header and is not signed.
pub(crate) fn authorization(
    secret_id: &str,
    secret_key: &str,
    endpoint: &TencentEndpoint,
    action: &str,
    payload: &str,
    timestamp: i64,
) -> String {
    let date = DateTime::from_timestamp(timestamp, 0)
        .unwrap_or_else(Utc::now)
        .format("%Y-%m-%d")
        .to_string();
    let service = endpoint.service;

    // 1. 规范请求串
    let canonical_headers = format!(
        "content-type:application/json; charset=utf-8\nhost:{}\nx-tc-action:{}\n",
        endpoint.host,
        action.to_lowercase()
    );
    let canonical_request = format!(
        "POST\n/\n\n{canonical_headers}\n{SIGNED_HEADERS}\n{}",
        sha256_hex(payload.as_bytes())
    );

    // 2. 待签名字符串
    let credential_scope = format!("{date}/{service}/tc3_request");
    let string_to_sign = format!(
        "{ALGORITHM}\n{timestamp}\n{credential_scope}\n{}",
        sha256_hex(canonical_request.as_bytes())
    );

    // 3. 派生签名密钥
    let secret_date = hmac_sha256(format!("TC3{secret_key}").as_bytes(), date.as_bytes());
    let secret_service = hmac_sha256(&secret_date, service.as_bytes());
    let secret_signing = hmac_sha256(&secret_service, b"tc3_request");
    let signature = hex::encode(hmac_sha256(&secret_signing, string_to_sign.as_bytes()));

    format!(
        "{ALGORITHM} Credential={secret_id}/{credential_scope}, SignedHeaders={SIGNED_HEADERS}, Signature={signature}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2024-01-15 08:00:00 UTC
    const TS: i64 = 1_705_305_600;

    fn credential_of(auth: &str) -> &str {
        auth.split("Credential=")
            .nth(1)
            .and_then(|s| s.split(',').next())
            .unwrap_or_default()
    }

    fn signature_of(auth: &str) -> &str {
        auth.rsplit("Signature=").next().unwrap_or_default()
    }

    #[test]
    fn scope_uses_endpoint_service() {
        let dnspod = authorization("AKID", "key", &TencentEndpoint::dnspod(), "DescribeRecordList", "{}", TS);
        let private = authorization(
            "AKID",
            "key",
            &TencentEndpoint::privatedns(None),
            "DescribePrivateZoneList",
            "{}",
            TS,
        );
        assert_eq!(credential_of(&dnspod), "AKID/2024-01-15/dnspod/tc3_request");
        assert_eq!(credential_of(&private), "AKID/2024-01-15/privatedns/tc3_request");
    }

    #[test]
    fn output_format() {
        let auth = authorization("AKID", "key", &TencentEndpoint::dnspod(), "DescribeDomainList", "{}", TS);
        assert!(auth.starts_with("TC3-HMAC-SHA256 Credential="), "got: {auth}");
        assert!(auth.contains(", SignedHeaders=content-type;host;x-tc-action, "));
        let signature = signature_of(&auth);
        assert_eq!(signature.len(), 64);
        assert!(signature.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn deterministic_and_input_sensitive() {
        let ep = TencentEndpoint::dnspod();
        let a = authorization("id", "key", &ep, "DescribeRecordList", r#"{"Domain":"a.com"}"#, TS);
        let b = authorization("id", "key", &ep, "DescribeRecordList", r#"{"Domain":"a.com"}"#, TS);
        let other_payload = authorization("id", "key", &ep, "DescribeRecordList", r#"{"Domain":"b.com"}"#, TS);
        let other_key = authorization("id", "key-2", &ep, "DescribeRecordList", r#"{"Domain":"a.com"}"#, TS);
        let next_day = authorization("id", "key", &ep, "DescribeRecordList", r#"{"Domain":"a.com"}"#, TS + 86_400);

        assert_eq!(a, b);
        assert_ne!(signature_of(&a), signature_of(&other_payload));
        assert_ne!(signature_of(&a), signature_of(&other_key));
        assert_ne!(signature_of(&a), signature_of(&next_day));
        assert_eq!(credential_of(&next_day), "id/2024-01-16/dnspod/tc3_request");
    }
}
