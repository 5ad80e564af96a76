//! Absolute/relative DNS name conversion.
//!
//! Zone names may be given with or without the trailing root dot. Absolute
//! names produced here never carry it, because that is the form the API
//! stores and filters on.

use crate::error::{ProviderError, Result};

/// 去掉域名末尾的点
pub fn normalize_domain_name(name: &str) -> &str {
    name.strip_suffix('.').unwrap_or(name)
}

/// 将相对名称转换为完整域名
///
/// - `"www"` + `"example.com."` -> `"www.example.com"`
/// - `"@"` / `""` + `"example.com"` -> `"example.com"`
/// - `"www.example.com."` (already absolute) -> `"www.example.com"`
pub fn absolute_name(name: &str, zone: &str) -> String {
    let zone = normalize_domain_name(zone);

    if name == "@" || name.is_empty() {
        zone.to_string()
    } else if let Some(fqdn) = name.strip_suffix('.') {
        fqdn.to_string()
    } else if zone.is_empty() {
        name.to_string()
    } else {
        format!("{name}.{zone}")
    }
}

/// 将完整域名转换为相对名称
///
/// - `"www.example.com"` + `"example.com"` -> `"www"`
/// - `"example.com"` + `"example.com."` -> `"@"`
/// - names outside the zone are returned unchanged (without trailing dot)
pub fn relative_name(fqdn: &str, zone: &str) -> String {
    let full = normalize_domain_name(fqdn);
    let zone = normalize_domain_name(zone);

    if full.eq_ignore_ascii_case(zone) {
        return "@".to_string();
    }

    let split = full.len().checked_sub(zone.len() + 1);
    match split {
        Some(idx)
            if !zone.is_empty()
                && full.as_bytes()[idx] == b'.'
                && full[idx + 1..].eq_ignore_ascii_case(zone) =>
        {
            full[..idx].to_string()
        }
        _ => full.to_string(),
    }
}

/// 转换为 IDNA ASCII 形式（Punycode）
///
/// ASCII names are only lower-cased, so labels such as `_acme-challenge` or
/// `*` pass through untouched.
pub fn to_ascii_name(name: &str) -> Result<String> {
    if name.is_ascii() {
        return Ok(name.to_ascii_lowercase());
    }
    idna::domain_to_ascii(name).map_err(|e| ProviderError::InvalidRecord {
        detail: format!("invalid domain name '{name}': {e}"),
    })
}
