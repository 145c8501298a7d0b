// src/core/outcome.rs

//! Per-endpoint and aggregate results of one invalidation request.
//!
//! Transport failures form a closed set of kinds, classified once at the point
//! of execution. They are carried as data so the caller decides policy
//! (log-and-continue, fail-the-deploy) instead of the dispatcher imposing it.

use crate::core::endpoint::ServerEndpoint;
use crate::core::template::Mode;
use thiserror::Error;

/// Classification of a failed transport call against one endpoint.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Network-level failure: connection refused, DNS, timeout.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The proxy was reached but answered with a non-success status.
    #[error("proxy returned status {0}")]
    ProxyError(u16),
}

/// The result of notifying a single endpoint. `mode` records the effective
/// mode used on the wire, which may differ from the requested one when purge
/// support is not installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidationOutcome {
    pub endpoint: ServerEndpoint,
    pub mode: Mode,
    pub succeeded: bool,
    pub error_detail: Option<String>,
}

impl InvalidationOutcome {
    pub fn success(endpoint: ServerEndpoint, mode: Mode) -> Self {
        Self {
            endpoint,
            mode,
            succeeded: true,
            error_detail: None,
        }
    }

    pub fn failure(endpoint: ServerEndpoint, mode: Mode, detail: impl Into<String>) -> Self {
        Self {
            endpoint,
            mode,
            succeeded: false,
            error_detail: Some(detail.into()),
        }
    }
}

/// Aggregate outcome of notifying all configured endpoints for one request.
/// `outcomes` is ordered by endpoint configuration order, not completion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchResult {
    pub all_succeeded: bool,
    pub outcomes: Vec<InvalidationOutcome>,
}

impl BatchResult {
    pub fn from_outcomes(outcomes: Vec<InvalidationOutcome>) -> Self {
        Self {
            all_succeeded: outcomes.iter().all(|o| o.succeeded),
            outcomes,
        }
    }
}
