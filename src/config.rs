// src/config.rs

//! Manages configuration: loading, resolving server specs, and validation.

use crate::core::endpoint::ServerEndpoint;
use crate::core::template::{InvalidationPolicy, Mode, RequestTemplate};
use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fs;
use std::time::Duration;

/// The `[refresh]` section: how a refresh call is expressed on the wire.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RefreshConfig {
    #[serde(default = "default_refresh_method")]
    pub method: String,
    #[serde(default = "default_refresh_header")]
    pub header: Option<String>,
    #[serde(default = "default_refresh_header_value")]
    pub header_value: Option<String>,
}

fn default_refresh_method() -> String {
    "GET".to_string()
}
fn default_refresh_header() -> Option<String> {
    Some("X-Refresh".to_string())
}
fn default_refresh_header_value() -> Option<String> {
    Some("1".to_string())
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            method: default_refresh_method(),
            header: default_refresh_header(),
            header_value: default_refresh_header_value(),
        }
    }
}

impl RefreshConfig {
    pub fn template(&self) -> RequestTemplate {
        RequestTemplate {
            method: self.method.clone(),
            header: self.header.clone(),
            header_value: self.header_value.clone(),
        }
    }
}

/// The `[purge]` section. `installed` is a deployment-time capability flag:
/// when false, purge requests fall back to refresh semantics.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PurgeConfig {
    #[serde(default = "default_purge_installed")]
    pub installed: bool,
    #[serde(default = "default_purge_method")]
    pub method: String,
    #[serde(default)]
    pub header: Option<String>,
    #[serde(default)]
    pub header_value: Option<String>,
}

fn default_purge_installed() -> bool {
    true
}
fn default_purge_method() -> String {
    "PURGE".to_string()
}

impl Default for PurgeConfig {
    fn default() -> Self {
        Self {
            installed: default_purge_installed(),
            method: default_purge_method(),
            header: None,
            header_value: None,
        }
    }
}

impl PurgeConfig {
    pub fn template(&self) -> RequestTemplate {
        RequestTemplate {
            method: self.method.clone(),
            header: self.header.clone(),
            header_value: self.header_value.clone(),
        }
    }
}

/// A raw representation of the config file before validation and resolution.
#[derive(Deserialize)]
struct RawConfig {
    #[serde(default)]
    servers: Vec<String>,
    #[serde(default)]
    use_tls: bool,
    #[serde(default)]
    default_mode: Mode,
    #[serde(default = "default_timeout", with = "humantime_serde")]
    timeout: Duration,
    #[serde(default = "default_log_level")]
    log_level: String,
    #[serde(default)]
    refresh: RefreshConfig,
    #[serde(default)]
    purge: PurgeConfig,
}

fn default_timeout() -> Duration {
    // Invalidation runs inside page-save pipelines; it must not hang them.
    Duration::from_secs(3)
}
fn default_log_level() -> String {
    "info".to_string()
}

/// The final, validated configuration with server specs resolved to endpoints.
#[derive(Debug, Clone)]
pub struct Config {
    pub endpoints: Vec<ServerEndpoint>,
    pub default_mode: Mode,
    pub timeout: Duration,
    pub log_level: String,
    pub refresh: RefreshConfig,
    pub purge: PurgeConfig,
}

impl Config {
    /// Creates a new `Config` instance by reading and parsing a TOML file.
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at '{path}'"))?;
        Self::from_toml_str(&contents).with_context(|| format!("Invalid configuration in '{path}'"))
    }

    /// Parses and validates configuration from a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(contents).context("Failed to parse TOML")?;

        let endpoints = raw
            .servers
            .iter()
            .map(|spec| ServerEndpoint::parse(spec, raw.use_tls))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let config = Config {
            endpoints,
            default_mode: raw.default_mode,
            timeout: raw.timeout,
            log_level: raw.log_level,
            refresh: raw.refresh,
            purge: raw.purge,
        };

        config.validate()?;
        Ok(config)
    }

    /// The mode-to-template policy this configuration describes.
    pub fn policy(&self) -> InvalidationPolicy {
        InvalidationPolicy {
            refresh: self.refresh.template(),
            purge: self.purge.template(),
            purge_installed: self.purge.installed,
        }
    }

    /// Validates the resolved configuration to ensure logical consistency.
    fn validate(&self) -> Result<()> {
        if self.endpoints.is_empty() {
            return Err(anyhow!("servers cannot be empty"));
        }
        let mut seen = std::collections::HashSet::new();
        for endpoint in &self.endpoints {
            if !seen.insert((endpoint.host.as_str(), endpoint.port)) {
                return Err(anyhow!("duplicate server '{}'", endpoint.authority()));
            }
        }
        if self.timeout.is_zero() {
            return Err(anyhow!("timeout cannot be 0"));
        }
        if self.log_level.trim().is_empty() {
            return Err(anyhow!("log_level cannot be empty"));
        }
        self.policy().validate()?;
        Ok(())
    }
}
