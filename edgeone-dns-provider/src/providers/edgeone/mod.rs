//! 腾讯云 EdgeOne（`teo`）DNS Provider

mod error;
mod http;
mod provider;
mod sign;
mod types;

use std::env;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{ProviderError, Result};
use crate::http_client::{ReqwestTransport, Transport};
use crate::types::Credentials;
use crate::utils::log_sanitizer::mask_secret_id;
use crate::zone_cache::ZoneCache;

pub use sign::{SignedHeaders, sign};
pub use types::EdgeOneRecord;

pub(crate) const EDGEONE_SERVICE: &str = "teo";
pub(crate) const EDGEONE_API_DOMAIN: &str = "tencentcloudapi.com";
pub(crate) const EDGEONE_VERSION: &str = "2022-09-01";
/// `DescribeDnsRecords` 单页最大记录数
pub(crate) const MAX_PAGE_SIZE: u32 = 1000;

pub const ENV_SECRET_ID: &str = "TC_SECRET_ID";
pub const ENV_SECRET_KEY: &str = "TC_SECRET_KEY";
pub const ENV_SESSION_TOKEN: &str = "TC_SESSION_TOKEN";
pub const ENV_REGION: &str = "TC_REGION";

/// API host, `teo.<region>.tencentcloudapi.com` when a region is set.
///
/// Used both as the request endpoint and as the signed `host` header.
pub fn endpoint_host(region: Option<&str>) -> String {
    match region.filter(|r| !r.is_empty()) {
        Some(region) => format!("{EDGEONE_SERVICE}.{region}.{EDGEONE_API_DOMAIN}"),
        None => format!("{EDGEONE_SERVICE}.{EDGEONE_API_DOMAIN}"),
    }
}

/// 腾讯云 EdgeOne DNS Provider
///
/// Every operation resolves the zone through the provider's [`ZoneCache`]
/// before touching records. Multi-call operations are not transactional: a
/// failure part way through leaves already-applied changes in place.
pub struct EdgeOneProvider {
    pub(crate) credentials: Credentials,
    pub(crate) endpoint: String,
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) zone_cache: Arc<ZoneCache>,
}

impl std::fmt::Debug for EdgeOneProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EdgeOneProvider")
            .field("credentials", &self.credentials)
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

/// EdgeOne Provider Builder
pub struct EdgeOneProviderBuilder {
    credentials: Credentials,
    zone_cache_ttl: Duration,
    zone_cache: Option<Arc<ZoneCache>>,
    transport: Option<Arc<dyn Transport>>,
}

impl EdgeOneProviderBuilder {
    fn new(secret_id: String, secret_key: String) -> Self {
        Self {
            credentials: Credentials::new(secret_id, secret_key),
            zone_cache_ttl: crate::zone_cache::DEFAULT_ZONE_ID_TTL,
            zone_cache: None,
            transport: None,
        }
    }

    /// Temporary credentials token, sent as `X-TC-Token`.
    pub fn session_token(mut self, token: impl Into<String>) -> Self {
        self.credentials.session_token = Some(token.into());
        self
    }

    /// Use the regional endpoint `teo.<region>.tencentcloudapi.com`.
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.credentials.region = Some(region.into());
        self
    }

    /// How long a resolved zone id stays fresh. Ignored when
    /// [`zone_cache`](Self::zone_cache) supplies a cache.
    pub fn zone_cache_ttl(mut self, ttl: Duration) -> Self {
        self.zone_cache_ttl = ttl;
        self
    }

    /// Share a zone cache with other provider instances.
    pub fn zone_cache(mut self, cache: Arc<ZoneCache>) -> Self {
        self.zone_cache = Some(cache);
        self
    }

    /// Replace the default `reqwest` transport.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn build(self) -> Result<EdgeOneProvider> {
        if self.credentials.secret_id.is_empty() || self.credentials.secret_key.is_empty() {
            return Err(ProviderError::Config {
                detail: "SecretId and SecretKey must not be empty".to_string(),
            });
        }

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new()?),
        };
        let zone_cache = self
            .zone_cache
            .unwrap_or_else(|| Arc::new(ZoneCache::new(self.zone_cache_ttl)));
        let endpoint = format!(
            "https://{}",
            endpoint_host(self.credentials.region.as_deref())
        );

        log::debug!(
            "EdgeOne provider for {} at {endpoint}",
            mask_secret_id(&self.credentials.secret_id)
        );

        Ok(EdgeOneProvider {
            credentials: self.credentials,
            endpoint,
            transport,
            zone_cache,
        })
    }
}

impl EdgeOneProvider {
    pub fn new(secret_id: String, secret_key: String) -> Result<Self> {
        Self::builder(secret_id, secret_key).build()
    }

    pub fn builder(secret_id: String, secret_key: String) -> EdgeOneProviderBuilder {
        EdgeOneProviderBuilder::new(secret_id, secret_key)
    }

    /// Builder pre-filled from `TC_SECRET_ID`, `TC_SECRET_KEY` and the
    /// optional `TC_SESSION_TOKEN` / `TC_REGION`.
    pub fn builder_from_env() -> Result<EdgeOneProviderBuilder> {
        let required = |name: &str| {
            env::var(name).map_err(|_| ProviderError::Config {
                detail: format!("environment variable {name} is not set"),
            })
        };

        let mut builder = Self::builder(required(ENV_SECRET_ID)?, required(ENV_SECRET_KEY)?);
        if let Ok(token) = env::var(ENV_SESSION_TOKEN) {
            builder = builder.session_token(token);
        }
        if let Ok(region) = env::var(ENV_REGION) {
            builder = builder.region(region);
        }
        Ok(builder)
    }

    /// The zone cache used by this provider.
    pub fn zone_cache(&self) -> &Arc<ZoneCache> {
        &self.zone_cache
    }
}
