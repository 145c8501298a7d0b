// src/core/endpoint.rs

//! Identifies one reverse-proxy cache server reachable over HTTP.

use crate::core::errors::FlushError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single cache-proxy instance. Immutable once configured; the set of
/// endpoints is fixed for the process lifetime.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServerEndpoint {
    pub host: String,
    pub port: u16,
    pub use_tls: bool,
}

impl ServerEndpoint {
    /// Parses a `"host"` or `"host:port"` server spec from configuration.
    /// A bare host gets the default port for the scheme (80, or 443 with TLS).
    pub fn parse(spec: &str, use_tls: bool) -> Result<Self, FlushError> {
        let spec = spec.trim();
        if spec.is_empty() {
            return Err(FlushError::Configuration(
                "server spec cannot be empty".to_string(),
            ));
        }

        let (host, port) = match spec.rsplit_once(':') {
            Some((host, port_str))
                if !port_str.is_empty() && port_str.chars().all(|c| c.is_ascii_digit()) =>
            {
                let port = port_str.parse::<u16>().map_err(|_| {
                    FlushError::Configuration(format!(
                        "invalid port '{port_str}' in server spec '{spec}'"
                    ))
                })?;
                (host, Some(port))
            }
            Some(_) => {
                return Err(FlushError::Configuration(format!(
                    "invalid server spec '{spec}', expected 'host' or 'host:port'"
                )));
            }
            None => (spec, None),
        };

        if host.is_empty() {
            return Err(FlushError::Configuration(format!(
                "missing host in server spec '{spec}'"
            )));
        }
        let port = port.unwrap_or(if use_tls { 443 } else { 80 });
        if port == 0 {
            return Err(FlushError::Configuration(format!(
                "port cannot be 0 in server spec '{spec}'"
            )));
        }

        Ok(Self {
            host: host.to_string(),
            port,
            use_tls,
        })
    }

    /// The `host:port` pair, used for duplicate detection and logging.
    pub fn authority(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// The base URL for outbound requests, e.g. `http://cache1:80`.
    pub fn base_url(&self) -> String {
        let scheme = if self.use_tls { "https" } else { "http" };
        format!("{scheme}://{}:{}", self.host, self.port)
    }
}

impl fmt::Display for ServerEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}
