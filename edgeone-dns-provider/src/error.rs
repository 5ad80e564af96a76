use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for all EdgeOne provider operations.
///
/// Every failure aborts the enclosing operation immediately. Nothing is
/// retried and nothing already created, modified or deleted is rolled back.
///
/// The type is `Clone` so a single zone resolution failure can be handed to
/// every caller waiting on it.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum ProviderError {
    /// A network-level error occurred (DNS resolution failure, connection refused, etc.).
    #[error("Network error: {detail}")]
    NetworkError {
        /// Error details.
        detail: String,
    },

    /// The HTTP request timed out.
    #[error("Request timeout: {detail}")]
    Timeout {
        /// Error details.
        detail: String,
    },

    /// The provider rejected the credentials or the request signature.
    #[error("[{action}] Invalid credentials: {raw_message}")]
    InvalidCredentials {
        /// API action that failed.
        action: String,
        /// Original error message from the API.
        raw_message: String,
    },

    /// The API rate limit has been exceeded.
    #[error("[{action}] Rate limited: {raw_message}")]
    RateLimited {
        /// API action that failed.
        action: String,
        /// Original error message from the API.
        raw_message: String,
    },

    /// Any other error reported in the response's `Error` field.
    #[error("[{action}] API error {raw_code}: {message}")]
    ApiError {
        /// API action that failed.
        action: String,
        /// Error code, e.g. `InvalidParameter.ZoneNotExists`.
        raw_code: String,
        /// Error message from the API.
        message: String,
    },

    /// The API answered without error but the payload is unusable
    /// (e.g. a create that returned no record id).
    #[error("[{action}] Invalid result: {detail}")]
    InvalidResult {
        /// API action that returned the result.
        action: String,
        /// What was wrong with it.
        detail: String,
    },

    /// No zone matches the requested domain.
    #[error("Zone '{zone}' not found")]
    ZoneNotFound {
        /// Domain name that was looked up.
        zone: String,
    },

    /// The caller driving a zone resolution was cancelled before it finished.
    #[error("Resolution of zone '{zone}' was cancelled")]
    Cancelled {
        /// Domain name that was being resolved.
        zone: String,
    },

    /// Failed to parse an API response.
    #[error("Parse error: {detail}")]
    ParseError {
        /// Details about the parse failure.
        detail: String,
    },

    /// Failed to serialize a request body.
    #[error("Serialization error: {detail}")]
    SerializationError {
        /// Details about the serialization failure.
        detail: String,
    },

    /// A record could not be converted to or from its typed form.
    #[error("Invalid record: {detail}")]
    InvalidRecord {
        /// Details about the conversion failure.
        detail: String,
    },

    /// Missing or malformed configuration.
    #[error("Configuration error: {detail}")]
    Config {
        /// Details about the configuration problem.
        detail: String,
    },
}

impl ProviderError {
    /// 是否为预期行为（用户输入、资源不存在等），用于日志分级。
    ///
    /// 返回 `true` 时应使用 `warn` 级别，`false` 时使用 `error` 级别。
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials { .. }
                | Self::ApiError { .. }
                | Self::ZoneNotFound { .. }
                | Self::InvalidRecord { .. }
                | Self::Config { .. }
        )
    }
}

/// Result type alias for provider operations.
pub type Result<T> = std::result::Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display_carries_action_and_message() {
        let err = ProviderError::ApiError {
            action: "CreateDnsRecord".to_string(),
            raw_code: "InvalidParameter".to_string(),
            message: "bad ttl".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "[CreateDnsRecord] API error InvalidParameter: bad ttl"
        );
        assert!(err.is_expected());
    }

    #[test]
    fn serializes_with_code_tag() {
        let err = ProviderError::ZoneNotFound {
            zone: "example.com".to_string(),
        };
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "ZoneNotFound");
        assert_eq!(json["zone"], "example.com");
    }

    #[test]
    fn api_error_serializes_code_tag_and_raw_code() {
        let err = ProviderError::ApiError {
            action: "ModifyDnsRecords".to_string(),
            raw_code: "InvalidParameter.ZoneNotExists".to_string(),
            message: "zone gone".to_string(),
        };
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "ApiError");
        assert_eq!(json["raw_code"], "InvalidParameter.ZoneNotExists");
        assert_eq!(json["action"], "ModifyDnsRecords");

        let back: ProviderError = serde_json::from_value(json).unwrap();
        assert!(
            matches!(back, ProviderError::ApiError { ref raw_code, .. } if raw_code == "InvalidParameter.ZoneNotExists"),
            "{back:?}"
        );
    }

    #[test]
    fn transport_errors_are_unexpected() {
        let err = ProviderError::Timeout {
            detail: "deadline".to_string(),
        };
        assert!(!err.is_expected());
    }
}
