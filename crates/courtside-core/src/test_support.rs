//! In-memory doubles for the store and source traits, used by unit tests.

use std::{
  collections::HashMap,
  sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
  },
};

use serde_json::Value;

use crate::{
  document::{EntityFamily, FetchOutcome},
  record::{Record, Table},
  store::{DocumentSource, TennisStore},
};

type Row = (Vec<String>, Value);

/// A table store backed by a `HashMap`, counting the calls it receives.
#[derive(Default)]
pub struct MemoryStore {
  tables:     Mutex<HashMap<Table, Vec<Row>>>,
  pub reads:  AtomicUsize,
  pub writes: AtomicUsize,
}

impl MemoryStore {
  pub fn reads(&self) -> usize { self.reads.load(Ordering::SeqCst) }
}

impl TennisStore for MemoryStore {
  type Error = serde_json::Error;

  async fn upsert<R: Record>(&self, records: Vec<R>) -> Result<usize, Self::Error> {
    self.writes.fetch_add(1, Ordering::SeqCst);
    let mut encoded = Vec::with_capacity(records.len());
    for record in &records {
      let key = record.key().into_iter().map(str::to_owned).collect();
      encoded.push((key, serde_json::to_value(record)?));
    }

    let mut tables = self.tables.lock().unwrap();
    let rows = tables.entry(R::TABLE).or_default();
    for (key, value) in encoded {
      match rows.iter_mut().find(|(k, _)| *k == key) {
        Some(row) => row.1 = value,
        None => rows.push((key, value)),
      }
    }
    Ok(records.len())
  }

  async fn read_all<R: Record>(&self) -> Result<Vec<R>, Self::Error> {
    self.reads.fetch_add(1, Ordering::SeqCst);
    let rows: Vec<Value> = self
      .tables
      .lock()
      .unwrap()
      .get(&R::TABLE)
      .map(|rows| rows.iter().map(|(_, v)| v.clone()).collect())
      .unwrap_or_default();
    rows.into_iter().map(serde_json::from_value).collect()
  }
}

/// A document source returning canned outcomes.
pub struct FixedSource {
  pub competitions: FetchOutcome,
  pub complexes:    FetchOutcome,
  pub rankings:     FetchOutcome,
}

impl DocumentSource for FixedSource {
  async fn fetch(&self, family: EntityFamily) -> FetchOutcome {
    match family {
      EntityFamily::Competitions => self.competitions.clone(),
      EntityFamily::Complexes => self.complexes.clone(),
      EntityFamily::Rankings => self.rankings.clone(),
    }
  }
}
