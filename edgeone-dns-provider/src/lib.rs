//! # edgeone-dns-provider
//!
//! DNS record management for Tencent Cloud EdgeOne (`teo`) sites.
//!
//! The crate signs API requests with TC3-HMAC-SHA256, resolves a site's
//! domain to its zone id through a shared single-flight cache, and reconciles
//! desired records against what the site already holds.
//!
//! ## Feature Flags
//!
//! ### TLS Backend
//!
//! - **`native-tls`** *(default)*: Use the platform's native TLS implementation.
//! - **`rustls`**: Use rustls. Recommended for cross-compilation and Android targets.
//!
//! ## Quick Start
//!
//! Add to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! edgeone-dns-provider = "0.1"
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::time::Duration;
//!
//! use edgeone_dns_provider::{DnsRecord, DnsRecordProvider, EdgeOneProvider, RecordData};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // 1. Create a provider from TC_SECRET_ID / TC_SECRET_KEY
//!     let provider = EdgeOneProvider::builder_from_env()?.build()?;
//!
//!     // 2. List records of a site
//!     for record in provider.get_records("example.com.").await? {
//!         println!("{} {} {}", record.name, record.data.record_type(), record.data.presentation());
//!     }
//!
//!     // 3. Point www at a new address, reusing the existing record
//!     let www = DnsRecord::new(
//!         "www",
//!         Duration::from_secs(600),
//!         RecordData::A { address: "192.0.2.10".parse()? },
//!     );
//!     provider.set_records("example.com.", &[www]).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Record Operations
//!
//! - **append**: creates every record, no matching.
//! - **set**: reuses existing records of the same name and type, newest
//!   first, and creates the rest. Content is not compared.
//! - **delete**: removes records matching name, type and content; an empty
//!   content matches every record of that name and type.
//!
//! Operations issue several API calls and are not transactional: the first
//! failure is returned and earlier changes stay applied.
//!
//! ## Zone Cache
//!
//! Zone ids are cached for 10 minutes by default. Concurrent lookups of the
//! same domain share one `DescribeZones` call. Share a [`ZoneCache`] between
//! providers with [`EdgeOneProviderBuilder::zone_cache`].
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, ProviderError>`](ProviderError):
//!
//! - [`ProviderError::InvalidCredentials`]: authentication or signature failure
//! - [`ProviderError::RateLimited`]: API rate limit exceeded
//! - [`ProviderError::ApiError`]: any other error the API reported
//! - [`ProviderError::ZoneNotFound`]: no site matches the domain
//! - [`ProviderError::NetworkError`] / [`ProviderError::Timeout`]: transport failure
//!
//! Nothing is retried. See [`ProviderError`] for the full list.

mod error;
mod http_client;
mod providers;
mod reconcile;
mod traits;
mod types;
mod utils;
mod zone_cache;

// Re-export error types
pub use error::{ProviderError, Result};

// Re-export traits (the error mapper stays internal)
pub use traits::{DnsRecordProvider, RecordFinder, RecordMutator};

// Re-export types
pub use types::{Credentials, DnsRecord, RecordData, ResourceRecord};

// Re-export reconciliation
pub use reconcile::{
    DEFAULT_TTL, DesiredRecord, MAX_TTL, MIN_TTL, Reconciler, RecordQuery, RecordUpdate,
};

// Re-export transport and cache
pub use http_client::{ReqwestTransport, Transport};
pub use zone_cache::{DEFAULT_ZONE_ID_TTL, ZoneCache};

// Re-export utils
pub use utils::names::{absolute_name, relative_name};

// Re-export the provider
pub use providers::{
    EdgeOneProvider, EdgeOneProviderBuilder, EdgeOneRecord, SignedHeaders, endpoint_host, sign,
};
