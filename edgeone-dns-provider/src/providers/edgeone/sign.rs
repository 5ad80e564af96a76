//! EdgeOne TC3-HMAC-SHA256 签名
//!
//! The provider recomputes the signature from the headers it receives, so
//! every byte of the canonical request has to match what is sent.

use chrono::{DateTime, Utc};

use crate::providers::common::{hmac_sha256, sha256_hex};
use crate::types::Credentials;

use super::{EDGEONE_SERVICE, EDGEONE_VERSION, endpoint_host};

pub(crate) const ALGORITHM: &str = "TC3-HMAC-SHA256";
pub(crate) const CONTENT_TYPE: &str = "application/json; charset=utf-8";
pub(crate) const SIGNED_HEADERS: &str = "content-type;host;x-tc-action";
const SCOPE_SUFFIX: &str = "tc3_request";

/// Headers produced by [`sign`] for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    pub authorization: String,
    pub content_type: &'static str,
    pub host: String,
    pub action: String,
    pub timestamp: String,
    pub version: &'static str,
    pub token: Option<String>,
}

impl SignedHeaders {
    /// `(name, value)` pairs in the order they are sent.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("Authorization", self.authorization.as_str()),
            ("Content-Type", self.content_type),
            ("Host", self.host.as_str()),
            ("X-TC-Action", self.action.as_str()),
            ("X-TC-Timestamp", self.timestamp.as_str()),
            ("X-TC-Version", self.version),
        ]
        .into_iter()
        .chain(self.token.as_deref().map(|token| ("X-TC-Token", token)))
    }
}

/// 生成 TC3-HMAC-SHA256 签名头
///
/// `now` is read once by the caller; both the credential scope date and the
/// `X-TC-Timestamp` header derive from it.
pub fn sign(
    credentials: &Credentials,
    action: &str,
    payload: &str,
    now: DateTime<Utc>,
) -> SignedHeaders {
    let timestamp = now.timestamp();
    let date = now.format("%Y-%m-%d").to_string();
    let host = endpoint_host(credentials.region.as_deref());

    // 1. 拼接规范请求串
    let canonical_headers = format!(
        "content-type:{CONTENT_TYPE}\nhost:{host}\nx-tc-action:{}\n",
        action.to_lowercase()
    );
    let hashed_payload = sha256_hex(payload.as_bytes());
    let canonical_request =
        format!("POST\n/\n\n{canonical_headers}\n{SIGNED_HEADERS}\n{hashed_payload}");

    // 2. 拼接待签名字符串
    let credential_scope = format!("{date}/{EDGEONE_SERVICE}/{SCOPE_SUFFIX}");
    let hashed_canonical_request = sha256_hex(canonical_request.as_bytes());
    let string_to_sign =
        format!("{ALGORITHM}\n{timestamp}\n{credential_scope}\n{hashed_canonical_request}");

    // 3. 计算签名
    let secret_date = hmac_sha256(
        format!("TC3{}", credentials.secret_key).as_bytes(),
        date.as_bytes(),
    );
    let secret_service = hmac_sha256(&secret_date, EDGEONE_SERVICE.as_bytes());
    let secret_signing = hmac_sha256(&secret_service, SCOPE_SUFFIX.as_bytes());
    let signature = hex::encode(hmac_sha256(&secret_signing, string_to_sign.as_bytes()));

    // 4. 拼接 Authorization
    let authorization = format!(
        "{ALGORITHM} Credential={}/{credential_scope}, SignedHeaders={SIGNED_HEADERS}, Signature={signature}",
        credentials.secret_id
    );

    SignedHeaders {
        authorization,
        content_type: CONTENT_TYPE,
        host,
        action: action.to_string(),
        timestamp: timestamp.to_string(),
        version: EDGEONE_VERSION,
        token: credentials
            .session_token
            .clone()
            .filter(|token| !token.is_empty()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"{"Filters":[{"Name":"zone-name","Values":["example.com"]}]}"#;

    fn credentials() -> Credentials {
        Credentials::new("AKIDEXAMPLE", "secret-key-example")
    }

    fn at(timestamp: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(timestamp, 0).unwrap()
    }

    fn signature(headers: &SignedHeaders) -> &str {
        headers.authorization.rsplit("Signature=").next().unwrap()
    }

    // 1_705_305_600 = 2024-01-15 08:00:00 UTC
    #[test]
    fn sign_known_answer() {
        let headers = sign(&credentials(), "DescribeZones", PAYLOAD, at(1_705_305_600));
        assert_eq!(
            headers.authorization,
            "TC3-HMAC-SHA256 Credential=AKIDEXAMPLE/2024-01-15/teo/tc3_request, \
             SignedHeaders=content-type;host;x-tc-action, \
             Signature=aadd89ffeaefab9def1cf0ef86747f764bdf4c92cac88264ed090c1df33f407b"
        );
        assert_eq!(headers.host, "teo.tencentcloudapi.com");
        assert_eq!(headers.timestamp, "1705305600");
        assert_eq!(headers.action, "DescribeZones");
        assert_eq!(headers.version, "2022-09-01");
        assert_eq!(headers.token, None);
    }

    #[test]
    fn sign_known_answer_regional_host() {
        let mut creds = credentials();
        creds.region = Some("ap-guangzhou".to_string());
        let headers = sign(&creds, "DescribeZones", PAYLOAD, at(1_705_305_600));
        assert_eq!(headers.host, "teo.ap-guangzhou.tencentcloudapi.com");
        assert_eq!(
            signature(&headers),
            "86c332f14acd2a30f2d19208cd797f8949ca2e7e01c25b228e5299674a6ed756"
        );
    }

    #[test]
    fn sign_deterministic() {
        let a = sign(&credentials(), "DescribeZones", PAYLOAD, at(1_705_305_600));
        let b = sign(&credentials(), "DescribeZones", PAYLOAD, at(1_705_305_600));
        assert_eq!(a, b, "same inputs should produce identical output");
    }

    #[test]
    fn sign_sensitive_to_every_input() {
        let base = sign(&credentials(), "DescribeZones", PAYLOAD, at(1_705_305_600));

        let other_key = Credentials::new("AKIDEXAMPLE", "secret-key-example2");
        let variants = [
            sign(&other_key, "DescribeZones", PAYLOAD, at(1_705_305_600)),
            sign(&credentials(), "DescribeZones", &PAYLOAD.replace("example", "exbmple"), at(1_705_305_600)),
            sign(&credentials(), "DescribeDnsRecords", PAYLOAD, at(1_705_305_600)),
            sign(&credentials(), "DescribeZones", PAYLOAD, at(1_705_305_601)),
        ];

        let mut seen = vec![signature(&base).to_string()];
        for variant in &variants {
            let sig = signature(variant).to_string();
            assert!(!seen.contains(&sig), "signature collision: {sig}");
            seen.push(sig);
        }
    }

    #[test]
    fn sign_date_derived_from_timestamp() {
        let morning = sign(&credentials(), "DescribeZones", "{}", at(1_705_305_600));
        let evening = sign(&credentials(), "DescribeZones", "{}", at(1_705_348_800));
        let next_day = sign(&credentials(), "DescribeZones", "{}", at(1_705_392_000));

        assert!(morning.authorization.contains("/2024-01-15/teo/tc3_request"));
        assert!(evening.authorization.contains("/2024-01-15/teo/tc3_request"));
        assert!(next_day.authorization.contains("/2024-01-16/teo/tc3_request"));
    }

    #[test]
    fn session_token_only_when_present() {
        let plain = sign(&credentials(), "DescribeZones", "{}", at(1_705_305_600));
        assert!(plain.iter().all(|(name, _)| name != "X-TC-Token"));
        assert_eq!(plain.iter().count(), 6);

        let mut creds = credentials();
        creds.session_token = Some("sts-token".to_string());
        let with_token = sign(&creds, "DescribeZones", "{}", at(1_705_305_600));
        assert!(
            with_token
                .iter()
                .any(|(name, value)| name == "X-TC-Token" && value == "sts-token")
        );
        // the token is not part of the signed headers
        assert_eq!(signature(&plain), signature(&with_token));
    }

    #[test]
    fn headers_in_send_order() {
        let headers = sign(&credentials(), "CreateDnsRecord", "{}", at(1_705_305_600));
        let names: Vec<_> = headers.iter().map(|(name, _)| name).collect();
        assert_eq!(
            names,
            [
                "Authorization",
                "Content-Type",
                "Host",
                "X-TC-Action",
                "X-TC-Timestamp",
                "X-TC-Version"
            ]
        );
    }
}
