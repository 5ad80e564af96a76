//! DNS Provider implementations

/// Shared utilities used by provider implementations.
pub mod common;

mod edgeone;

pub use edgeone::{
    EdgeOneProvider, EdgeOneProviderBuilder, EdgeOneRecord, SignedHeaders, endpoint_host, sign,
};
