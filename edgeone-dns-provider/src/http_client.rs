//! HTTP transport
//!
//! The provider signs every request itself and hands the finished header set
//! to a [`Transport`]. The default implementation sends it with `reqwest`;
//! tests inject their own.
//!
//! The transport performs no retries. A failed request surfaces as
//! [`ProviderError::NetworkError`] or [`ProviderError::Timeout`] and aborts the
//! operation that issued it.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::error::{ProviderError, Result};
use crate::providers::common::create_http_client;
use crate::providers::SignedHeaders;
use crate::utils::log_sanitizer::truncate_for_log;

/// Sends one signed API request and returns the raw response body.
///
/// The body is returned whatever the HTTP status: Tencent Cloud reports
/// failures inside the JSON envelope.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, endpoint: &str, headers: &SignedHeaders, body: String)
    -> Result<Vec<u8>>;
}

/// [`Transport`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Client with the default connect/request timeouts.
    pub fn new() -> Result<Self> {
        Ok(Self::with_client(create_http_client()?))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(
        &self,
        endpoint: &str,
        headers: &SignedHeaders,
        body: String,
    ) -> Result<Vec<u8>> {
        log::debug!("POST {endpoint} Action: {}", headers.action);

        let mut request = self.client.post(endpoint);
        for (name, value) in headers.iter() {
            request = request.header(name, value);
        }

        // Send request
        let response = request.body(body).send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout {
                    detail: e.to_string(),
                }
            } else {
                ProviderError::NetworkError {
                    detail: e.to_string(),
                }
            }
        })?;

        let status_code = response.status().as_u16();
        log::debug!("Response Status: {status_code}");

        // Read response body
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ProviderError::NetworkError {
                detail: format!("Failed to read response body: {e}"),
            })?;

        log::debug!(
            "Response Body: {}",
            truncate_for_log(&String::from_utf8_lossy(&bytes))
        );

        Ok(bytes.to_vec())
    }
}

/// Parse a JSON response body.
pub(crate) fn parse_json<T>(body: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    serde_json::from_slice(body).map_err(|e| {
        log::error!("JSON parse failed: {e}");
        log::error!(
            "Raw response: {}",
            truncate_for_log(&String::from_utf8_lossy(body))
        );
        ProviderError::ParseError {
            detail: e.to_string(),
        }
    })
}
