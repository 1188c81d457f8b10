//! 阿里云 ACS3-HMAC-SHA256 签名

use crate::credentials::AccessCredential;
use crate::providers::common::{hmac_sha256, sha256_hex};

use super::{AliyunEndpoint, EMPTY_BODY_SHA256};

/// Per-request values covered by the signature.
pub(crate) struct SignInput<'a> {
    pub action: &'a str,
    pub query_string: &'a str,
    pub timestamp: &'a str,
    pub nonce: &'a str,
}

/// 生成 ACS3-HMAC-SHA256 Authorization 头
/// 参考: <https://www.alibabacloud.com/help/zh/sdk/product-overview/v3-request-structure-and-signature>
///
/// With a delegated credential, `x-acs-security-token` is part of the signed headers.
pub(crate) fn authorization(
    credential: &AccessCredential,
    endpoint: &AliyunEndpoint,
    input: &SignInput<'_>,
) -> String {
    let mut headers: Vec<(&str, &str)> = vec![
        ("host", endpoint.host.as_str()),
        ("x-acs-action", input.action),
        ("x-acs-content-sha256", EMPTY_BODY_SHA256),
        ("x-acs-date", input.timestamp),
    ];
    if let Some(token) = credential.security_token.as_deref() {
        headers.push(("x-acs-security-token", token));
    }
    headers.push(("x-acs-signature-nonce", input.nonce));
    headers.push(("x-acs-version", endpoint.version));

    let canonical_headers: String = headers
        .iter()
        .map(|(name, value)| format!("{name}:{value}\n"))
        .collect();
    let signed_headers = headers
        .iter()
        .map(|(name, _)| *name)
        .collect::<Vec<_>>()
        .join(";");

    // RPC 风格: 参数在 query string 中, body 为空
    let canonical_request = format!(
        "POST\n/\n{}\n{canonical_headers}\n{signed_headers}\n{EMPTY_BODY_SHA256}",
        input.query_string
    );
    log::trace!("CanonicalRequest:\n{canonical_request}");

    let string_to_sign = format!(
        "ACS3-HMAC-SHA256\n{}",
        sha256_hex(canonical_request.as_bytes())
    );

    let signature = hex::encode(hmac_sha256(
        credential.access_key_secret.as_bytes(),
        string_to_sign.as_bytes(),
    ));

    format!(
        "ACS3-HMAC-SHA256 Credential={},SignedHeaders={signed_headers},Signature={signature}",
        credential.access_key_id
    )
}
