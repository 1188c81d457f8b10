//! 腾讯云 API 请求参数 / 响应结构

use serde::{Deserialize, Serialize};

// ============ 请求参数 ============

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DomainListParams {
    #[serde(rename = "Type")]
    pub domain_type: &'static str,
    pub offset: u32,
    pub limit: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RecordListParams<'a> {
    pub domain: &'a str,
    pub offset: u32,
    pub limit: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct OffsetParams {
    pub offset: u32,
    pub limit: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ZoneRecordListParams<'a> {
    pub zone_id: &'a str,
    pub offset: u32,
    pub limit: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AssumeRoleParams<'a> {
    pub role_arn: &'a str,
    pub role_session_name: &'a str,
    pub duration_seconds: u32,
}

// ============ 响应 ============

/// Error payload nested inside `Response`.
#[derive(Debug, Deserialize)]
pub struct TencentError {
    #[serde(rename = "Code")]
    pub code: String,
    #[serde(rename = "Message", default)]
    pub message: String,
}

// ---- DNSPod ----

#[derive(Debug, Deserialize)]
pub struct DomainListResponse {
    #[serde(rename = "DomainList", default)]
    pub domain_list: Vec<DnspodDomain>,
}

#[derive(Debug, Deserialize)]
pub struct DnspodDomain {
    #[serde(rename = "DomainId")]
    pub domain_id: u64,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Status", default)]
    pub status: String,
    #[serde(rename = "Remark")]
    pub remark: Option<String>,
    #[serde(rename = "CreatedOn")]
    pub created_on: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RecordListResponse {
    #[serde(rename = "RecordList", default)]
    pub record_list: Vec<DnspodRecord>,
}

#[derive(Debug, Deserialize)]
pub struct DnspodRecord {
    #[serde(rename = "RecordId")]
    pub record_id: u64,
    #[serde(rename = "Name")]
    pub name: String,
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
    #[serde(rename = "UpdatedOn")]
    pub updated_on: Option<String>,
}

// ---- PrivateDNS ----

#[derive(Debug, Deserialize)]
pub struct PrivateZoneListResponse {
    #[serde(rename = "PrivateZoneSet", default)]
    pub private_zone_set: Vec<PrivateZone>,
}

#[derive(Debug, Deserialize)]
pub struct PrivateZone {
    #[serde(rename = "ZoneId")]
    pub zone_id: String,
    #[serde(rename = "Domain")]
    pub domain: String,
    #[serde(rename = "Status", default)]
    pub status: String,
    #[serde(rename = "Remark")]
    pub remark: Option<String>,
    #[serde(rename = "CreatedOn")]
    pub created_on: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PrivateZoneRecordListResponse {
    #[serde(rename = "RecordSet", default)]
    pub record_set: Vec<PrivateZoneRecord>,
}

#[derive(Debug, Deserialize)]
pub struct PrivateZoneRecord {
    #[serde(rename = "RecordId")]
    pub record_id: String,
    #[serde(rename = "SubDomain")]
    pub sub_domain: String,
    #[serde(rename = "RecordType")]
    pub record_type: String,
    #[serde(rename = "RecordValue")]
    pub record_value: String,
    #[serde(rename = "TTL", default)]
    pub ttl: u32,
    #[serde(rename = "Weight")]
    pub weight: Option<u32>,
    #[serde(rename = "Status", default)]
    pub status: String,
    #[serde(rename = "Remark")]
    pub remark: Option<String>,
    #[serde(rename = "UpdatedOn")]
    pub updated_on: Option<String>,
}

// ---- STS ----

#[derive(Debug, Deserialize)]
pub struct AssumeRoleResponse {
    #[serde(rename = "Credentials")]
    pub credentials: Option<StsCredentials>,
    /// Unix seconds.
    #[serde(rename = "ExpiredTime")]
    pub expired_time: Option<i64>,
    /// RFC 3339.
    #[serde(rename = "Expiration")]
    pub expiration: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StsCredentials {
    #[serde(rename = "Token")]
    pub token: String,
    #[serde(rename = "TmpSecretId")]
    pub tmp_secret_id: String,
    #[serde(rename = "TmpSecretKey")]
    pub tmp_secret_key: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_serialize_pascal_case() {
        let body = serde_json::to_string(&DomainListParams {
            domain_type: "ALL",
            offset: 100,
            limit: 100,
        })
        .unwrap_or_default();
        assert_eq!(body, r#"{"Type":"ALL","Offset":100,"Limit":100}"#);

        let body = serde_json::to_string(&ZoneRecordListParams {
            zone_id: "zone-1",
            offset: 0,
            limit: 100,
        })
        .unwrap_or_default();
        assert_eq!(body, r#"{"ZoneId":"zone-1","Offset":0,"Limit":100}"#);
    }

    #[test]
    fn record_list_with_null_weight() {
        let parsed: Result<RecordListResponse, _> = serde_json::from_str(
            r#"{"RecordCountInfo":{"TotalCount":1},"RecordList":[{
                "RecordId":556507778,"Name":"@","Type":"A","Value":"192.0.2.1","TTL":600,
                "Weight":null,"Status":"ENABLE","Remark":"","UpdatedOn":"2021-03-28 11:27:09",
                "Line":"默认","LineId":"0","MonitorStatus":"","MX":0
            }],"RequestId":"x"}"#,
        );
        assert!(parsed.is_ok(), "parse failed: {parsed:?}");
        let Ok(parsed) = parsed else { return };
        assert_eq!(parsed.record_list.len(), 1);
        assert_eq!(parsed.record_list[0].weight, None);
    }
}
