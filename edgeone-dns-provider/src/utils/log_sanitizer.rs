//! Log sanitization utilities
//!
//! Keeps request payloads, response bodies and key material from being
//! fully exposed in debug/error logs.

/// Maximum number of bytes of a body included in log output.
const TRUNCATE_LIMIT: usize = 512;

/// Number of leading characters of a secret id kept visible.
const VISIBLE_ID_PREFIX: usize = 8;

/// Truncate a request/response body for safe logging.
///
/// Cuts on a char boundary and appends the original length.
pub fn truncate_for_log(s: &str) -> String {
    if s.len() <= TRUNCATE_LIMIT {
        return s.to_string();
    }
    let mut end = TRUNCATE_LIMIT;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... [truncated, total {} bytes]", &s[..end], s.len())
}

/// Mask a `SecretId` so only its prefix shows up in logs.
pub fn mask_secret_id(secret_id: &str) -> String {
    match secret_id.char_indices().nth(VISIBLE_ID_PREFIX) {
        Some((idx, _)) => format!("{}****", &secret_id[..idx]),
        None => "****".to_string(),
    }
}
