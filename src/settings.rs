use std::path::PathBuf;
use std::time::Duration;

use anyhow::{ensure, Context, Result};
use config::{Config, ConfigBuilder, Environment};
use serde::Deserialize;

use crate::fetcher::{RetryPolicy, DEFAULT_MAX_ATTEMPTS};

pub const BASE_URL: &str = "https://putusan3.mahkamahagung.go.id/pengadilan.html";
pub const DEFAULT_OUTPUT: &str = "data/daftar_pengadilan.csv";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_BACKOFF_MAX_MS: u64 = 30_000;
pub const ENV_PREFIX: &str = "PUTUSAN";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub base_url: String,
    pub output: PathBuf,
    pub timeout_secs: u64,
    pub max_attempts: u32,
    /// 0 disables backoff between attempts.
    pub backoff_base_ms: u64,
    pub backoff_max_ms: u64,
    pub log_filter: String,
}

/// Values given on the command line. `None` leaves the lower layers alone.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub output: Option<String>,
    pub timeout_secs: Option<u64>,
    pub max_attempts: Option<u32>,
    pub backoff_base_ms: Option<u64>,
    pub log_filter: Option<String>,
}

impl Settings {
    /// Defaults, then `PUTUSAN_*` environment variables, then `overrides`.
    pub fn load(overrides: &Overrides) -> Result<Self> {
        Self::from_env(Environment::with_prefix(ENV_PREFIX), overrides)
    }

    fn from_env(env: Environment, o: &Overrides) -> Result<Self> {
        let settings: Settings = defaults()?
            .add_source(env.try_parsing(true))
            .set_override_option("base_url", o.base_url.clone())?
            .set_override_option("output", o.output.clone())?
            .set_override_option("timeout_secs", o.timeout_secs)?
            .set_override_option("max_attempts", o.max_attempts)?
            .set_override_option("backoff_base_ms", o.backoff_base_ms)?
            .set_override_option("log_filter", o.log_filter.clone())?
            .build()
            .context("Failed to read settings")?
            .try_deserialize()
            .context("Invalid settings")?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        ensure!(self.max_attempts >= 1, "max_attempts must be at least 1");
        ensure!(self.timeout_secs >= 1, "timeout_secs must be at least 1");
        ensure!(!self.base_url.trim().is_empty(), "base_url must not be empty");
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            base_delay: Duration::from_millis(self.backoff_base_ms),
            max_delay: Duration::from_millis(self.backoff_max_ms),
        }
    }
}

/// Names of the `PUTUSAN_*` variables among `vars`, sorted.
pub fn env_keys(vars: impl IntoIterator<Item = (String, String)>) -> Vec<String> {
    let prefix = format!("{}_", ENV_PREFIX);
    let mut keys: Vec<String> = vars
        .into_iter()
        .map(|(k, _)| k)
        .filter(|k| k.to_ascii_uppercase().starts_with(&prefix))
        .collect();
    keys.sort();
    keys
}

fn defaults() -> Result<ConfigBuilder<config::builder::DefaultState>> {
    Ok(Config::builder()
        .set_default("base_url", BASE_URL)?
        .set_default("output", DEFAULT_OUTPUT)?
        .set_default("timeout_secs", DEFAULT_TIMEOUT_SECS)?
        .set_default("max_attempts", DEFAULT_MAX_ATTEMPTS)?
        .set_default("backoff_base_ms", 0u64)?
        .set_default("backoff_max_ms", DEFAULT_BACKOFF_MAX_MS)?
        .set_default("log_filter", "info")?)
}
