//! The ingestion pipeline: fetch → normalize → upsert.
//!
//! One run fetches each document family once, normalizes it, and upserts the
//! resulting batches parent-table first. Soft warnings are collected into the
//! [`IngestReport`]; only store errors abort the run. Batches already written
//! when a later one fails stay written.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{Instrument as _, info, info_span, warn};
use uuid::Uuid;

use crate::{
  document::{
    EntityFamily, SoftWarning, normalize_competitions, normalize_complexes,
    normalize_rankings,
  },
  record::{Record, Table},
  store::{DocumentSource, TennisStore},
};

/// Outcome of one ingestion run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
  pub run_id:      Uuid,
  pub started_at:  DateTime<Utc>,
  pub finished_at: DateTime<Utc>,
  /// Records submitted per table. Tables with nothing to write are absent.
  pub written:     BTreeMap<Table, usize>,
  /// Entries dropped by the normalizer.
  pub skipped:     usize,
  pub warnings:    Vec<SoftWarning>,
}

impl IngestReport {
  fn start(run_id: Uuid) -> Self {
    let now = Utc::now();
    Self {
      run_id,
      started_at: now,
      finished_at: now,
      written: BTreeMap::new(),
      skipped: 0,
      warnings: vec![],
    }
  }

  pub fn total_written(&self) -> usize { self.written.values().sum() }

  /// `true` when the run wrote nothing at all. Whether that is a failure is
  /// the caller's call.
  pub fn is_empty(&self) -> bool { self.total_written() == 0 }
}

/// Run one ingestion from `source` into `store`.
pub async fn ingest<D, S>(source: &D, store: &S) -> Result<IngestReport, S::Error>
where
  D: DocumentSource,
  S: TennisStore,
{
  let run_id = Uuid::new_v4();
  run(source, store, run_id)
    .instrument(info_span!("ingest", %run_id))
    .await
}

async fn run<D, S>(source: &D, store: &S, run_id: Uuid) -> Result<IngestReport, S::Error>
where
  D: DocumentSource,
  S: TennisStore,
{
  let mut report = IngestReport::start(run_id);

  info!("fetching competitions");
  let comps = normalize_competitions(&source.fetch(EntityFamily::Competitions).await);
  report.absorb(comps.warning, comps.skipped);
  write(store, comps.batch.categories, &mut report).await?;
  write(store, comps.batch.competitions, &mut report).await?;

  info!("fetching complexes");
  let complexes = normalize_complexes(&source.fetch(EntityFamily::Complexes).await);
  report.absorb(complexes.warning, complexes.skipped);
  write(store, complexes.batch.complexes, &mut report).await?;
  write(store, complexes.batch.venues, &mut report).await?;

  info!("fetching rankings");
  let rankings = normalize_rankings(&source.fetch(EntityFamily::Rankings).await);
  report.absorb(rankings.warning, rankings.skipped);
  write(store, rankings.batch.competitors, &mut report).await?;
  write(store, rankings.batch.rankings, &mut report).await?;

  report.finished_at = Utc::now();
  if report.is_empty() {
    warn!(warnings = report.warnings.len(), "ingestion wrote no records");
  } else {
    info!(records = report.total_written(), "ingestion complete");
  }
  Ok(report)
}

impl IngestReport {
  fn absorb(&mut self, warning: Option<SoftWarning>, skipped: usize) {
    self.warnings.extend(warning);
    self.skipped += skipped;
  }
}

async fn write<R, S>(
  store: &S,
  records: Vec<R>,
  report: &mut IngestReport,
) -> Result<(), S::Error>
where
  R: Record,
  S: TennisStore,
{
  if records.is_empty() {
    return Ok(());
  }
  let written = store.upsert(records).await?;
  info!(table = %R::TABLE, rows = written, "upserted");
  report.written.insert(R::TABLE, written);
  Ok(())
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;
  use crate::{
    document::FetchOutcome,
    record::{Competitor, Ranking},
    test_support::{FixedSource, MemoryStore},
    view::Tables,
  };

  fn full_source() -> FixedSource {
    FixedSource {
      competitions: FetchOutcome::Document(json!({
        "competitions": [
          { "id": "c1", "name": "Wimbledon", "category": { "id": "cat1", "name": "ATP" } },
          { "id": "c2", "name": "Wimbledon Doubles", "parent_id": "c1",
            "category": { "id": "cat1", "name": "ATP" } }
        ]
      })),
      complexes: FetchOutcome::Document(json!({
        "complexes": [
          { "id": "x1", "name": "All England Club",
            "venues": [ { "id": "v1", "name": "Centre Court", "country_name": "United Kingdom" } ] }
        ]
      })),
      rankings: FetchOutcome::Document(json!({
        "rankings": [
          { "id": "atp", "name": "ATP", "competitor_rankings": [
            { "rank": 1, "movement": 0, "points": 9000, "competitor": { "id": "p1", "name": "A" } },
            { "rank": 2, "movement": 1, "points": 8000, "competitor": { "id": "p2", "name": "B" } }
          ] },
          { "id": "race", "name": "Race", "competitor_rankings": [
            { "rank": 1, "movement": -1, "points": 100, "competitor": { "id": "p1", "name": "A" } }
          ] }
        ]
      })),
    }
  }

  #[tokio::test]
  async fn ingest_writes_every_table() {
    let store = MemoryStore::default();
    let report = ingest(&full_source(), &store).await.unwrap();

    assert!(report.warnings.is_empty());
    assert_eq!(report.written[&Table::Categories], 1);
    assert_eq!(report.written[&Table::Competitions], 2);
    assert_eq!(report.written[&Table::Complexes], 1);
    assert_eq!(report.written[&Table::Venues], 1);
    assert_eq!(report.written[&Table::Competitors], 3);
    assert_eq!(report.written[&Table::CompetitorRankings], 3);

    // Competitor repeats collapse in the store.
    let competitors: Vec<Competitor> = store.read_all().await.unwrap();
    assert_eq!(competitors.len(), 2);
    let rankings: Vec<Ranking> = store.read_all().await.unwrap();
    assert_eq!(rankings.len(), 3);
  }

  #[tokio::test]
  async fn reingesting_is_idempotent() {
    let store = MemoryStore::default();
    ingest(&full_source(), &store).await.unwrap();
    let once = Tables::load(&store).await.unwrap();

    ingest(&full_source(), &store).await.unwrap();
    let twice = Tables::load(&store).await.unwrap();

    assert_eq!(once, twice);
  }

  #[tokio::test]
  async fn unavailable_family_degrades_to_warning() {
    let mut source = full_source();
    source.rankings = FetchOutcome::Unavailable { reason: "HTTP 403".into() };

    let store = MemoryStore::default();
    let report = ingest(&source, &store).await.unwrap();

    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].family(), EntityFamily::Rankings);
    assert!(!report.written.contains_key(&Table::Competitors));
    assert_eq!(report.written[&Table::Competitions], 2);
  }

  #[tokio::test]
  async fn all_sources_down_yields_empty_report() {
    let down = || FetchOutcome::Unavailable { reason: "timeout".into() };
    let source = FixedSource {
      competitions: down(),
      complexes:    FetchOutcome::Document(json!({ "message": "Forbidden" })),
      rankings:     down(),
    };

    let store = MemoryStore::default();
    let report = ingest(&source, &store).await.unwrap();

    assert!(report.is_empty());
    assert_eq!(report.warnings.len(), 3);
    assert!(matches!(
      report.warnings[1],
      SoftWarning::MalformedDocument { family: EntityFamily::Complexes, .. }
    ));
    assert_eq!(store.writes.load(std::sync::atomic::Ordering::SeqCst), 0);
  }

  #[test]
  fn report_serializes_table_names() {
    let mut report = IngestReport::start(Uuid::nil());
    report.written.insert(Table::CompetitorRankings, 4);
    let v = serde_json::to_value(&report).unwrap();
    assert_eq!(v["written"]["competitor_rankings"], 4);
  }
}
