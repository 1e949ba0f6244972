use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::health::HealthCheckSpec;
use crate::port::ExtendedValidator;
use crate::retry::RetryPolicy;

/// Retry policy parameters (`[retry]` in config.toml).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Wait before the first retry, in milliseconds.
    pub base_interval_ms: u64,
    /// Multiplier applied to the wait after each retry (>= 1.0).
    pub backoff_factor: f64,
    /// Upper bound on any single wait, in milliseconds.
    pub max_interval_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::from(RetryPolicy::default())
    }
}

impl From<RetryPolicy> for RetryConfig {
    fn from(p: RetryPolicy) -> Self {
        Self {
            max_retries: p.max_retries,
            base_interval_ms: p.base_interval.as_millis() as u64,
            backoff_factor: p.backoff_factor,
            max_interval_ms: p.max_interval.as_millis() as u64,
        }
    }
}

impl RetryConfig {
    /// Unvalidated policy; `open_with_retry` validates it.
    pub fn to_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            base_interval: Duration::from_millis(self.base_interval_ms),
            backoff_factor: self.backoff_factor,
            max_interval: Duration::from_millis(self.max_interval_ms),
        }
    }
}

/// Default health probe (`[health]`). Payloads are hex strings, e.g. `"0d0a"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthConfig {
    pub probe: String,
    pub expect: String,
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,
}

fn default_probe_timeout_ms() -> u64 {
    500
}

impl HealthConfig {
    pub fn to_spec(&self) -> Result<HealthCheckSpec> {
        let probe = hex::decode(self.probe.trim()).context("health.probe is not valid hex")?;
        let expect = hex::decode(self.expect.trim()).context("health.expect is not valid hex")?;
        Ok(HealthCheckSpec::new(
            probe,
            expect,
            Duration::from_millis(self.probe_timeout_ms),
        ))
    }
}

/// Site policy on top of the base validation rules (`[validation]`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// If non-empty, only these endpoints may be opened.
    #[serde(default)]
    pub allowed_endpoints: Vec<String>,
    /// If non-empty, only these baud rates are accepted.
    #[serde(default)]
    pub allowed_baud_rates: Vec<u32>,
    /// Reject a zero timeout.
    #[serde(default)]
    pub require_timeout: bool,
    /// Reject timeouts above this many milliseconds.
    #[serde(default)]
    pub max_timeout_ms: Option<u64>,
}

impl ValidationConfig {
    pub fn to_validator(&self) -> ExtendedValidator {
        let mut v = ExtendedValidator::new().require_timeout(self.require_timeout);
        if !self.allowed_endpoints.is_empty() {
            v = v.allow_endpoints(self.allowed_endpoints.iter().cloned());
        }
        if !self.allowed_baud_rates.is_empty() {
            v = v.allow_baud_rates(self.allowed_baud_rates.iter().copied());
        }
        if let Some(max) = self.max_timeout_ms {
            v = v.max_timeout_ms(max);
        }
        v
    }
}

/// Global configuration loaded from `~/.config/sercon/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SerconConfig {
    /// Retry policy; if missing, `RetryPolicy::default()` is used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
    /// Default health probe for `sercon check`.
    #[serde(default)]
    pub health: Option<HealthConfig>,
    #[serde(default)]
    pub validation: Option<ValidationConfig>,
}

impl SerconConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
            .as_ref()
            .map(RetryConfig::to_policy)
            .unwrap_or_default()
    }

    pub fn validator(&self) -> ExtendedValidator {
        self.validation
            .as_ref()
            .map(ValidationConfig::to_validator)
            .unwrap_or_default()
    }

    pub fn health_spec(&self) -> Result<Option<HealthCheckSpec>> {
        self.health.as_ref().map(HealthConfig::to_spec).transpose()
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("sercon")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<SerconConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = SerconConfig {
            retry: Some(RetryConfig::default()),
            ..SerconConfig::default()
        };
        let text = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, text)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from_path(&path)
}

pub fn load_from_path(path: &Path) -> Result<SerconConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("cannot read config {}", path.display()))?;
    let cfg: SerconConfig =
        toml::from_str(&data).with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}
