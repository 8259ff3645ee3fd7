//! Async HTTP client for the Sportradar tennis API.
//!
//! [`SportradarClient`] implements [`DocumentSource`]: one `GET` per entity
//! family, authenticated with an `x-api-key` header. Every failure is folded
//! into [`FetchOutcome::Unavailable`] so a single bad endpoint never aborts
//! an ingestion run.

use std::time::Duration;

use courtside_core::{
  document::{EntityFamily, FetchOutcome},
  store::DocumentSource,
};
use reqwest::{Client, StatusCode, header::ACCEPT};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://api.sportradar.com/tennis/trial/v3/en";
pub const DEFAULT_RANKINGS_ENDPOINT: &str = "double_competitors_rankings.json";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] courtside_core::Error),

  #[error("failed to build HTTP client: {0}")]
  Http(#[from] reqwest::Error),
}

/// Connection settings for the upstream API.
#[derive(Debug, Clone)]
pub struct SourceConfig {
  pub api_key:           String,
  pub base_url:          String,
  /// Path of the rankings document; singles lists live at `rankings.json`.
  pub rankings_endpoint: String,
  pub timeout:           Duration,
}

impl SourceConfig {
  pub fn new(api_key: impl Into<String>) -> Self {
    Self {
      api_key:           api_key.into(),
      base_url:          DEFAULT_BASE_URL.to_owned(),
      rankings_endpoint: DEFAULT_RANKINGS_ENDPOINT.to_owned(),
      timeout:           DEFAULT_TIMEOUT,
    }
  }
}

/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct SportradarClient {
  client: Client,
  config: SourceConfig,
}

impl SportradarClient {
  /// Fails with [`courtside_core::Error::MissingCredential`] when no API key
  /// is configured.
  pub fn new(config: SourceConfig) -> Result<Self, Error> {
    if config.api_key.trim().is_empty() {
      return Err(courtside_core::Error::MissingCredential("api_key".into()).into());
    }
    let client = Client::builder().timeout(config.timeout).build()?;
    Ok(Self { client, config })
  }

  fn endpoint(&self, family: EntityFamily) -> &str {
    match family {
      EntityFamily::Competitions => "competitions.json",
      EntityFamily::Complexes => "complexes.json",
      EntityFamily::Rankings => &self.config.rankings_endpoint,
    }
  }

  pub fn url(&self, family: EntityFamily) -> String {
    format!(
      "{}/{}",
      self.config.base_url.trim_end_matches('/'),
      self.endpoint(family).trim_start_matches('/')
    )
  }
}

/// Reason a response status makes the document unusable, or `None` on
/// success.
pub fn status_problem(status: StatusCode) -> Option<String> {
  if status.is_success() {
    None
  } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
    Some(format!("HTTP {status}: check the API key and plan"))
  } else if status == StatusCode::NOT_FOUND {
    Some(format!("HTTP {status}: endpoint not available for this key"))
  } else {
    Some(format!("HTTP {status}"))
  }
}

fn unavailable(family: EntityFamily, reason: String) -> FetchOutcome {
  warn!(%family, %reason, "fetch failed");
  FetchOutcome::Unavailable { reason }
}

impl DocumentSource for SportradarClient {
  async fn fetch(&self, family: EntityFamily) -> FetchOutcome {
    let url = self.url(family);
    debug!(%family, %url, "fetching document");

    let resp = match self
      .client
      .get(&url)
      .header(ACCEPT, "application/json")
      .header("x-api-key", &self.config.api_key)
      .send()
      .await
    {
      Ok(resp) => resp,
      Err(e) => return unavailable(family, format!("request failed: {e}")),
    };

    if let Some(reason) = status_problem(resp.status()) {
      return unavailable(family, reason);
    }

    match resp.json::<Value>().await {
      Ok(doc) => FetchOutcome::Document(doc),
      Err(e) => unavailable(family, format!("response is not JSON: {e}")),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_api_key_is_fatal() {
    let err = SportradarClient::new(SourceConfig::new("  ")).err().unwrap();
    assert!(matches!(
      err,
      Error::Core(courtside_core::Error::MissingCredential(_))
    ));
  }

  #[test]
  fn urls_per_family() {
    let mut config = SourceConfig::new("key");
    config.base_url = "https://example.test/tennis/".into();
    config.rankings_endpoint = "rankings.json".into();
    let client = SportradarClient::new(config).unwrap();

    assert_eq!(
      client.url(EntityFamily::Competitions),
      "https://example.test/tennis/competitions.json"
    );
    assert_eq!(
      client.url(EntityFamily::Complexes),
      "https://example.test/tennis/complexes.json"
    );
    assert_eq!(
      client.url(EntityFamily::Rankings),
      "https://example.test/tennis/rankings.json"
    );
  }

  #[test]
  fn status_classification() {
    assert_eq!(status_problem(StatusCode::OK), None);
    assert!(status_problem(StatusCode::FORBIDDEN).unwrap().contains("403"));
    assert!(status_problem(StatusCode::NOT_FOUND).unwrap().contains("404"));
    assert!(
      status_problem(StatusCode::INTERNAL_SERVER_ERROR)
        .unwrap()
        .contains("500")
    );
  }

  #[tokio::test]
  async fn unreachable_host_is_unavailable() {
    let mut config = SourceConfig::new("key");
    config.base_url = "http://127.0.0.1:1".into();
    config.timeout = Duration::from_secs(2);
    let client = SportradarClient::new(config).unwrap();

    let outcome = client.fetch(EntityFamily::Competitions).await;
    assert!(matches!(outcome, FetchOutcome::Unavailable { .. }));
  }
}
