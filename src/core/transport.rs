// src/core/transport.rs

//! The transport seam: executes one outbound invalidation call against one
//! endpoint and classifies the result. Stateless between calls, exactly one
//! attempt per call; retry policy belongs to the caller.

use crate::core::endpoint::ServerEndpoint;
use crate::core::errors::FlushError;
use crate::core::outcome::TransportError;
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends one invalidation request. `Ok(())` means the proxy acknowledged
    /// with a success status; everything else is classified into a
    /// [`TransportError`]. The timeout applies to the whole call.
    async fn send(
        &self,
        endpoint: &ServerEndpoint,
        method: &str,
        path: &str,
        headers: &[(String, String)],
        timeout: Duration,
    ) -> Result<(), TransportError>;
}

/// The production transport, backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, FlushError> {
        // A redirect from a cache proxy is not an acknowledgement; never follow it.
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| {
                FlushError::Configuration(format!("failed to build HTTP client: {e}"))
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        endpoint: &ServerEndpoint,
        method: &str,
        path: &str,
        headers: &[(String, String)],
        timeout: Duration,
    ) -> Result<(), TransportError> {
        let method = reqwest::Method::from_bytes(method.as_bytes())
            .map_err(|_| TransportError::ConnectionFailed(format!("invalid method '{method}'")))?;
        let url = Url::parse(&format!("{}{}", endpoint.base_url(), path))
            .map_err(|e| TransportError::ConnectionFailed(format!("invalid request URL: {e}")))?;

        let mut request = self.client.request(method, url).timeout(timeout);
        for (name, value) in headers {
            request = request.header(name, value);
        }

        match request.send().await {
            Ok(response) if response.status().is_success() => Ok(()),
            Ok(response) => Err(TransportError::ProxyError(response.status().as_u16())),
            Err(e) if e.is_timeout() => Err(TransportError::ConnectionFailed(format!(
                "timed out after {timeout:?}"
            ))),
            Err(e) => Err(TransportError::ConnectionFailed(e.to_string())),
        }
    }
}
