//! EdgeOne error mapping

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::EdgeOneProvider;

/// EdgeOne error code mapping
/// Reference: <https://cloud.tencent.com/document/api/1552/80729>
impl ProviderErrorMapper for EdgeOneProvider {
    fn provider_name(&self) -> &'static str {
        "edgeone"
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        let code = raw.code.as_deref().unwrap_or_default();

        // ============ Authentication error ============
        if code.starts_with("AuthFailure")
            || matches!(
                code,
                "UnauthorizedOperation.CamUnauthorized" | "InvalidParameter.InvalidSecretId"
            )
        {
            return ProviderError::InvalidCredentials {
                action: context.action,
                raw_message: raw.message,
            };
        }

        // ============ Frequency limit ============
        if code.starts_with("RequestLimitExceeded") {
            return ProviderError::RateLimited {
                action: context.action,
                raw_message: raw.message,
            };
        }

        // ============ Other errors fallback ============
        self.api_error(raw, context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> EdgeOneProvider {
        EdgeOneProvider::new("id".to_string(), "key".to_string()).unwrap()
    }

    fn ctx() -> ErrorContext {
        ErrorContext::for_action("DescribeZones")
    }

    #[test]
    fn auth_failure_maps_to_invalid_credentials() {
        let p = provider();
        for code in [
            "AuthFailure",
            "AuthFailure.SignatureFailure",
            "AuthFailure.SignatureExpire",
            "UnauthorizedOperation.CamUnauthorized",
        ] {
            let err = p.map_error(RawApiError::with_code(code, "auth failed"), ctx());
            assert!(
                matches!(err, ProviderError::InvalidCredentials { ref action, .. } if action == "DescribeZones"),
                "expected InvalidCredentials for code '{code}', got {err:?}"
            );
        }
    }

    #[test]
    fn rate_limit_codes_map_to_rate_limited() {
        let p = provider();
        for code in ["RequestLimitExceeded", "RequestLimitExceeded.UinLimitExceeded"] {
            let err = p.map_error(RawApiError::with_code(code, "slow down"), ctx());
            assert!(
                matches!(err, ProviderError::RateLimited { .. }),
                "expected RateLimited for code '{code}', got {err:?}"
            );
        }
    }

    #[test]
    fn other_codes_keep_code_and_message() {
        let p = provider();
        let err = p.map_error(
            RawApiError::with_code("InvalidParameter.ZoneNotExists", "zone gone"),
            ctx(),
        );
        assert!(
            matches!(
                err,
                ProviderError::ApiError { ref raw_code, ref message, .. }
                    if raw_code == "InvalidParameter.ZoneNotExists" && message == "zone gone"
            ),
            "got {err:?}"
        );
    }
}
