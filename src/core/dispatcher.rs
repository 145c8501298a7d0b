// src/core/dispatcher.rs

//! The invalidation dispatcher: fans one request out to every configured
//! cache server, executes the per-endpoint calls concurrently, and aggregates
//! their outcomes without letting one server's failure block the others.

use crate::core::endpoint::ServerEndpoint;
use crate::core::errors::FlushError;
use crate::core::outcome::{BatchResult, InvalidationOutcome, TransportError};
use crate::core::template::{InvalidationPolicy, Mode};
use crate::core::transport::Transport;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// A configured, immutable dispatcher. One instance is constructed at startup
/// and lives for the process lifetime; there is no other process-wide state.
pub struct Dispatcher {
    endpoints: Vec<ServerEndpoint>,
    policy: InvalidationPolicy,
    default_mode: Mode,
    timeout: Duration,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("endpoints", &self.endpoints)
            .field("policy", &self.policy)
            .field("default_mode", &self.default_mode)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// Validates the endpoint set and builds the dispatcher.
    pub fn new(
        endpoints: Vec<ServerEndpoint>,
        policy: InvalidationPolicy,
        default_mode: Mode,
        timeout: Duration,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, FlushError> {
        if endpoints.is_empty() {
            return Err(FlushError::Configuration(
                "at least one cache server must be configured".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for endpoint in &endpoints {
            if !seen.insert((endpoint.host.clone(), endpoint.port)) {
                return Err(FlushError::Configuration(format!(
                    "duplicate cache server '{}'",
                    endpoint.authority()
                )));
            }
        }
        if timeout.is_zero() {
            return Err(FlushError::Configuration(
                "per-endpoint timeout cannot be zero".to_string(),
            ));
        }
        policy.validate()?;

        Ok(Self {
            endpoints,
            policy,
            default_mode,
            timeout,
            transport,
        })
    }

    pub fn endpoints(&self) -> &[ServerEndpoint] {
        &self.endpoints
    }

    /// Instructs every proxy to re-fetch and replace its cached copy of `path`.
    pub async fn refresh(&self, path: &str) -> Result<BatchResult, FlushError> {
        self.invalidate(path, Some(Mode::Refresh)).await
    }

    /// Instructs every proxy to discard its cached copy of `path`. Downgrades
    /// to refresh semantics when purge support is not installed.
    pub async fn purge(&self, path: &str) -> Result<BatchResult, FlushError> {
        self.invalidate(path, Some(Mode::Purge)).await
    }

    /// Notifies every configured endpoint about `path`, using the dispatcher's
    /// default mode unless `mode` overrides it. Partial failure is data in the
    /// returned [`BatchResult`], never an error of this call.
    pub async fn invalidate(
        &self,
        path: &str,
        mode: Option<Mode>,
    ) -> Result<BatchResult, FlushError> {
        self.invalidate_with_cancel(path, mode, &CancellationToken::new())
            .await
    }

    /// Like [`invalidate`](Self::invalidate), but abortable. On cancellation,
    /// in-flight calls are aborted and the outcomes already collected are
    /// returned (still in configuration order); if nothing completed, the call
    /// fails with [`FlushError::Cancelled`].
    pub async fn invalidate_with_cancel(
        &self,
        path: &str,
        mode: Option<Mode>,
        cancel: &CancellationToken,
    ) -> Result<BatchResult, FlushError> {
        validate_path(path)?;

        let requested = mode.unwrap_or(self.default_mode);
        let (effective, template) = self.policy.resolve(requested);
        if effective != requested {
            debug!(
                path,
                requested = %requested,
                "purge support not installed, downgrading to refresh"
            );
        }
        let method = template.method.clone();
        let headers = template.headers();

        let mut tasks = JoinSet::new();
        for (index, endpoint) in self.endpoints.iter().cloned().enumerate() {
            let transport = self.transport.clone();
            let method = method.clone();
            let headers = headers.clone();
            let path = path.to_string();
            let timeout = self.timeout;
            tasks.spawn(async move {
                let result = transport
                    .send(&endpoint, &method, &path, &headers, timeout)
                    .await;
                (index, endpoint, result)
            });
        }

        // Outcomes are buffered by endpoint index so the result order matches
        // configuration order regardless of completion order.
        let mut slots: Vec<Option<InvalidationOutcome>> = vec![None; self.endpoints.len()];
        let mut cancelled = false;

        loop {
            tokio::select! {
                _ = cancel.cancelled(), if !cancelled => {
                    cancelled = true;
                    tasks.abort_all();
                }
                joined = tasks.join_next() => {
                    let Some(joined) = joined else { break };
                    match joined {
                        Ok((index, endpoint, result)) => {
                            slots[index] = Some(self.record(path, endpoint, effective, result));
                        }
                        Err(e) if e.is_cancelled() => continue,
                        Err(e) => warn!(path, error = %e, "invalidation task failed"),
                    }
                }
            }
        }

        if cancelled {
            let outcomes: Vec<_> = slots.into_iter().flatten().collect();
            if outcomes.is_empty() {
                return Err(FlushError::Cancelled);
            }
            warn!(
                path,
                collected = outcomes.len(),
                endpoints = self.endpoints.len(),
                "invalidation cancelled, returning partial results"
            );
            return Ok(BatchResult::from_outcomes(outcomes));
        }

        let outcomes = slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.unwrap_or_else(|| {
                    InvalidationOutcome::failure(
                        self.endpoints[index].clone(),
                        effective,
                        "invalidation task failed",
                    )
                })
            })
            .collect();
        Ok(BatchResult::from_outcomes(outcomes))
    }

    /// Classifies one transport result into an outcome and emits its log event.
    fn record(
        &self,
        path: &str,
        endpoint: ServerEndpoint,
        mode: Mode,
        result: Result<(), TransportError>,
    ) -> InvalidationOutcome {
        match result {
            Ok(()) => {
                info!(path, endpoint = %endpoint, mode = %mode, "cache invalidation delivered");
                InvalidationOutcome::success(endpoint, mode)
            }
            Err(e) => {
                warn!(path, endpoint = %endpoint, mode = %mode, error = %e, "cache invalidation failed");
                InvalidationOutcome::failure(endpoint, mode, e.to_string())
            }
        }
    }
}

/// Paths must be absolute URL paths, safe to place on a request line.
fn validate_path(path: &str) -> Result<(), FlushError> {
    if path.is_empty() {
        return Err(FlushError::InvalidArgument(
            "path cannot be empty".to_string(),
        ));
    }
    if !path.starts_with('/') {
        return Err(FlushError::InvalidArgument(format!(
            "path '{path}' must start with '/'"
        )));
    }
    if path.chars().any(|c| c.is_ascii_control() || c == ' ') {
        return Err(FlushError::InvalidArgument(format!(
            "path '{path}' contains whitespace or control characters"
        )));
    }
    Ok(())
}
