//! 阿里云 API 请求参数 / 响应结构

use std::collections::BTreeMap;
use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::error::{ProviderError, Result};

// ============ RFC3986 URL 编码 ============

/// RFC3986 URL 编码
pub fn url_encode(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for byte in s.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~') {
            result.push(char::from(byte));
        } else {
            let _ = write!(result, "%{byte:02X}");
        }
    }
    result
}

/// Serialize request parameters into the sorted, encoded RPC query string.
///
/// Top-level fields only; `None` fields are omitted.
pub fn to_query_string<T: Serialize>(params: &T) -> Result<String> {
    let value = serde_json::to_value(params).map_err(|e| ProviderError::SerializationError {
        provider: "aliyun".to_string(),
        detail: e.to_string(),
    })?;

    let mut sorted = BTreeMap::new();
    if let serde_json::Value::Object(map) = value {
        for (key, value) in map {
            let rendered = match value {
                serde_json::Value::Null => continue,
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            sorted.insert(key, rendered);
        }
    }

    Ok(sorted
        .iter()
        .map(|(k, v)| format!("{}={}", url_encode(k), url_encode(v)))
        .collect::<Vec<_>>()
        .join("&"))
}

// ============ 请求参数 ============

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PageParams {
    pub page_number: u32,
    pub page_size: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DomainRecordsParams<'a> {
    pub domain_name: &'a str,
    pub page_number: u32,
    pub page_size: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ZoneRecordsParams<'a> {
    pub zone_id: &'a str,
    pub page_number: u32,
    pub page_size: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AssumeRoleParams<'a> {
    pub role_arn: &'a str,
    pub role_session_name: &'a str,
    pub duration_seconds: u32,
}

// ============ Alidns 公网解析 ============

#[derive(Debug, Deserialize)]
pub struct DescribeDomainsResponse {
    #[serde(rename = "Domains")]
    pub domains: Option<DomainsWrapper>,
}

#[derive(Debug, Deserialize)]
pub struct DomainsWrapper {
    #[serde(rename = "Domain", default)]
    pub domain: Vec<AlidnsDomain>,
}

#[derive(Debug, Deserialize)]
pub struct AlidnsDomain {
    #[serde(rename = "DomainName")]
    pub domain_name: String,
    #[serde(rename = "Remark")]
    pub remark: Option<String>,
    /// e.g. `2015-12-12T09:23Z`
    #[serde(rename = "CreateTime")]
    pub create_time: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DescribeDomainRecordsResponse {
    #[serde(rename = "DomainRecords")]
    pub domain_records: Option<DomainRecordsWrapper>,
}

#[derive(Debug, Deserialize)]
pub struct DomainRecordsWrapper {
    #[serde(rename = "Record", default)]
    pub record: Vec<AlidnsRecord>,
}

#[derive(Debug, Deserialize)]
pub struct AlidnsRecord {
    #[serde(rename = "RecordId")]
    pub record_id: String,
    #[serde(rename = "RR")]
    pub rr: String,
    #[serde(rename = "Type")]
    pub record_type: String,
    #[serde(rename = "Value")]
    pub value: String,
    #[serde(rename = "TTL", default)]
    pub ttl: u32,
    #[serde(rename = "Weight")]
    pub weight: Option<u32>,
    #[serde(rename = "Status", default)]
    pub status: String,
    #[serde(rename = "Remark")]
    pub remark: Option<String>,
    /// 毫秒时间戳
    #[serde(rename = "UpdateTimestamp")]
    pub update_timestamp: Option<i64>,
}

// ============ PrivateZone 内网解析 ============

#[derive(Debug, Deserialize)]
pub struct DescribeZonesResponse {
    #[serde(rename = "Zones")]
    pub zones: Option<ZonesWrapper>,
}

#[derive(Debug, Deserialize)]
pub struct ZonesWrapper {
    #[serde(rename = "Zone", default)]
    pub zone: Vec<PvtzZone>,
}

#[derive(Debug, Deserialize)]
pub struct PvtzZone {
    #[serde(rename = "ZoneId")]
    pub zone_id: String,
    #[serde(rename = "ZoneName")]
    pub zone_name: String,
    #[serde(rename = "Remark")]
    pub remark: Option<String>,
    #[serde(rename = "CreateTime")]
    pub create_time: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DescribeZoneRecordsResponse {
    #[serde(rename = "Records")]
    pub records: Option<ZoneRecordsWrapper>,
}

#[derive(Debug, Deserialize)]
pub struct ZoneRecordsWrapper {
    #[serde(rename = "Record", default)]
    pub record: Vec<PvtzRecord>,
}

#[derive(Debug, Deserialize)]
pub struct PvtzRecord {
    #[serde(rename = "RecordId")]
    pub record_id: i64,
    #[serde(rename = "Rr")]
    pub rr: String,
    #[serde(rename = "Type")]
    pub record_type: String,
    #[serde(rename = "Value")]
    pub value: String,
    #[serde(rename = "Ttl", default)]
    pub ttl: u32,
    #[serde(rename = "Weight")]
    pub weight: Option<u32>,
    #[serde(rename = "Status", default)]
    pub status: String,
    #[serde(rename = "Remark")]
    pub remark: Option<String>,
}

// ============ STS ============

#[derive(Debug, Deserialize)]
pub struct AssumeRoleResponse {
    #[serde(rename = "Credentials")]
    pub credentials: Option<StsCredentials>,
}

#[derive(Debug, Deserialize)]
pub struct StsCredentials {
    #[serde(rename = "AccessKeyId")]
    pub access_key_id: String,
    #[serde(rename = "AccessKeySecret")]
    pub access_key_secret: String,
    #[serde(rename = "SecurityToken")]
    pub security_token: String,
    /// RFC 3339, e.g. `2015-04-09T11:52:19Z`
    #[serde(rename = "Expiration")]
    pub expiration: String,
}
