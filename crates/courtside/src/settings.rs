//! Runtime configuration, read from a TOML file and `COURTSIDE_*`
//! environment variables (the environment wins).

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use anyhow::Context as _;
use courtside_core::cache::{CachePolicy, DEFAULT_TTL};
use courtside_source::{
  DEFAULT_BASE_URL, DEFAULT_RANKINGS_ENDPOINT, DEFAULT_TIMEOUT, SourceConfig,
};
use serde::Deserialize;

fn default_base_url() -> String { DEFAULT_BASE_URL.to_owned() }
fn default_rankings_endpoint() -> String { DEFAULT_RANKINGS_ENDPOINT.to_owned() }
fn default_timeout_secs() -> u64 { DEFAULT_TIMEOUT.as_secs() }
fn default_host() -> String { "127.0.0.1".to_owned() }
fn default_port() -> u16 { 8600 }
fn default_cache_ttl_secs() -> u64 { DEFAULT_TTL.as_secs() }

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  /// Upstream API key. Required to ingest.
  #[serde(default)]
  pub api_key:               Option<String>,
  #[serde(default = "default_base_url")]
  pub api_base_url:          String,
  #[serde(default = "default_rankings_endpoint")]
  pub rankings_endpoint:     String,
  #[serde(default = "default_timeout_secs")]
  pub request_timeout_secs:  u64,
  pub store_path:            PathBuf,
  #[serde(default = "default_host")]
  pub host:                  String,
  #[serde(default = "default_port")]
  pub port:                  u16,
  #[serde(default = "default_cache_ttl_secs")]
  pub cache_ttl_secs:        u64,
  /// Re-run ingestion this often while serving. Unset disables refresh.
  #[serde(default)]
  pub refresh_interval_secs: Option<u64>,
}

impl Settings {
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let builder = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("COURTSIDE").try_parsing(true));
    Self::from_builder(builder)
  }

  fn from_builder(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
  ) -> anyhow::Result<Self> {
    builder
      .build()
      .context("failed to read configuration")?
      .try_deserialize()
      .context("failed to deserialise Settings")
  }

  /// Source settings, or [`courtside_core::Error::MissingCredential`] when no
  /// API key is configured.
  pub fn source_config(&self) -> Result<SourceConfig, courtside_core::Error> {
    let api_key = self
      .api_key
      .as_deref()
      .map(str::trim)
      .filter(|k| !k.is_empty())
      .ok_or_else(|| courtside_core::Error::MissingCredential("api_key".into()))?;
    Ok(SourceConfig {
      api_key:           api_key.to_owned(),
      base_url:          self.api_base_url.clone(),
      rankings_endpoint: self.rankings_endpoint.clone(),
      timeout:           Duration::from_secs(self.request_timeout_secs),
    })
  }

  pub fn cache_policy(&self) -> CachePolicy {
    CachePolicy { ttl: Duration::from_secs(self.cache_ttl_secs) }
  }

  pub fn refresh_interval(&self) -> Option<Duration> {
    self
      .refresh_interval_secs
      .filter(|s| *s > 0)
      .map(Duration::from_secs)
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn store_path(&self) -> PathBuf { expand_tilde(&self.store_path) }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
