//! courtside binary.
//!
//! Reads `courtside.toml` (or the path given with `--config`) and either
//! runs one ingestion into the SQLite store or serves the JSON API over it.

mod settings;

use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use courtside_core::{
  cache::CachedStore,
  ingest::{IngestReport, ingest},
  store::TennisStore,
};
use courtside_source::SportradarClient;
use courtside_store_sqlite::SqliteStore;
use tokio::{net::TcpListener, time::MissedTickBehavior};
use tracing::{error, info, level_filters::LevelFilter, warn};
use tracing_subscriber::EnvFilter;

use settings::Settings;

#[derive(Parser)]
#[command(author, version, about = "Courtside tennis data pipeline")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "courtside.toml", global = true)]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Fetch every document family once and upsert it into the store.
  Ingest,
  /// Serve the JSON API over the store.
  Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let settings = Settings::load(&cli.config)?;

  match cli.command {
    Command::Ingest => run_ingest(&settings).await,
    Command::Serve => serve(&settings).await,
  }
}

async fn open_store(settings: &Settings) -> anyhow::Result<SqliteStore> {
  let path = settings.store_path();
  SqliteStore::open(&path)
    .await
    .with_context(|| format!("failed to open store at {path:?}"))
}

fn source(settings: &Settings) -> anyhow::Result<SportradarClient> {
  let config = settings.source_config()?;
  Ok(SportradarClient::new(config)?)
}

// ─── ingest ──────────────────────────────────────────────────────────────────

async fn run_ingest(settings: &Settings) -> anyhow::Result<()> {
  // Check the credential before touching the store.
  let source = source(settings)?;
  let store = open_store(settings).await?;

  let report = ingest(&source, &store).await.context("ingestion failed")?;
  if report.is_empty() {
    warn!("no records were written; check the API key and endpoints");
  }
  println!("{}", serde_json::to_string_pretty(&report)?);
  Ok(())
}

// ─── serve ───────────────────────────────────────────────────────────────────

async fn serve(settings: &Settings) -> anyhow::Result<()> {
  let store = Arc::new(CachedStore::new(
    open_store(settings).await?,
    settings.cache_policy(),
  ));
  info!(ttl_secs = store.policy().ttl.as_secs(), "table reads are cached");

  if let Some(every) = settings.refresh_interval() {
    let source = source(settings).context("periodic refresh needs an API key")?;
    info!(every_secs = every.as_secs(), "periodic refresh enabled");
    tokio::spawn(refresh(source, store.clone(), every));
  }

  let app = courtside_api::api_router(store);
  let address = settings.address();

  info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Re-run ingestion every `every`, starting one interval from now. A failed
/// run is logged and the loop carries on.
async fn refresh<S>(source: SportradarClient, store: Arc<S>, every: Duration)
where
  S: TennisStore + 'static,
{
  let mut ticker = tokio::time::interval(every);
  ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
  // The first tick completes immediately.
  ticker.tick().await;

  loop {
    ticker.tick().await;
    match ingest(&source, store.as_ref()).await {
      Ok(report) => log_report(&report),
      Err(e) => error!(error = %e, "scheduled ingestion failed"),
    }
  }
}

fn log_report(report: &IngestReport) {
  if report.is_empty() {
    warn!(run_id = %report.run_id, "scheduled ingestion wrote no records");
  } else {
    info!(
      run_id = %report.run_id,
      records = report.total_written(),
      warnings = report.warnings.len(),
      "scheduled ingestion complete"
    );
  }
}
