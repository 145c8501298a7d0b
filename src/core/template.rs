// src/core/template.rs

//! Invalidation modes and the configuration-driven request templates that
//! describe how each mode is expressed on the wire. Method and header names
//! are data, not code, so a new proxy product is a config change, not a branch.

use crate::core::errors::FlushError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What the caller wants the proxy to do with its cached copy of a path.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Re-fetch origin content and replace the cache entry.
    #[default]
    Refresh,
    /// Discard the cache entry without re-fetching.
    Purge,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Refresh => "refresh",
            Mode::Purge => "purge",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The wire shape of one invalidation call: an HTTP method plus an optional
/// signalling header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTemplate {
    pub method: String,
    pub header: Option<String>,
    pub header_value: Option<String>,
}

impl RequestTemplate {
    /// The nginx-style refresh shape: a plain GET with a bypass-and-repopulate header.
    pub fn refresh_default() -> Self {
        Self {
            method: "GET".to_string(),
            header: Some("X-Refresh".to_string()),
            header_value: Some("1".to_string()),
        }
    }

    /// The nginx cache-purge module shape: a bare PURGE request.
    pub fn purge_default() -> Self {
        Self {
            method: "PURGE".to_string(),
            header: None,
            header_value: None,
        }
    }

    /// The headers to attach to an outbound call built from this template.
    pub fn headers(&self) -> Vec<(String, String)> {
        match &self.header {
            Some(name) => vec![(
                name.clone(),
                self.header_value.clone().unwrap_or_else(|| "1".to_string()),
            )],
            None => vec![],
        }
    }

    pub fn validate(&self, mode: Mode) -> Result<(), FlushError> {
        let method = self.method.trim();
        if method.is_empty() {
            return Err(FlushError::Configuration(format!(
                "{mode} template method cannot be empty"
            )));
        }
        if !method
            .chars()
            .all(|c| c.is_ascii_alphabetic() || c == '-' || c == '_')
        {
            return Err(FlushError::Configuration(format!(
                "{mode} template method '{method}' is not a valid HTTP method token"
            )));
        }
        if let Some(name) = &self.header
            && (name.trim().is_empty() || !name.chars().all(|c| c.is_ascii_graphic() && c != ':'))
        {
            return Err(FlushError::Configuration(format!(
                "{mode} template header name '{name}' is not a valid HTTP header name"
            )));
        }
        Ok(())
    }
}

/// The per-deployment policy mapping a requested mode to the template actually
/// sent. `purge_installed` mirrors a deployment-time capability flag: when the
/// proxy has no purge support, purge requests downgrade to refresh semantics.
#[derive(Debug, Clone)]
pub struct InvalidationPolicy {
    pub refresh: RequestTemplate,
    pub purge: RequestTemplate,
    pub purge_installed: bool,
}

impl InvalidationPolicy {
    /// Resolves a requested mode into the effective mode and its template.
    pub fn resolve(&self, requested: Mode) -> (Mode, &RequestTemplate) {
        match requested {
            Mode::Refresh => (Mode::Refresh, &self.refresh),
            Mode::Purge if self.purge_installed => (Mode::Purge, &self.purge),
            Mode::Purge => (Mode::Refresh, &self.refresh),
        }
    }

    pub fn validate(&self) -> Result<(), FlushError> {
        self.refresh.validate(Mode::Refresh)?;
        self.purge.validate(Mode::Purge)
    }
}

impl Default for InvalidationPolicy {
    fn default() -> Self {
        Self {
            refresh: RequestTemplate::refresh_default(),
            purge: RequestTemplate::purge_default(),
            purge_installed: true,
        }
    }
}
