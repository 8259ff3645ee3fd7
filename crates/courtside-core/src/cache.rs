//! [`CachedStore`]: time-bounded memoisation of table reads.
//!
//! Entries are keyed by `(table, query parameters)` and expire after the
//! configured TTL. Any upsert through the cache invalidates every entry for
//! the written table, so a caller never reads its own writes stale.

use std::{
  any::Any,
  collections::HashMap,
  sync::{Arc, Mutex, MutexGuard, PoisonError},
  time::{Duration, Instant},
};

use strum::IntoEnumIterator as _;
use tracing::debug;

use crate::{
  record::{Record, Table},
  store::TennisStore,
};

/// Default lifetime of a cached read.
pub const DEFAULT_TTL: Duration = Duration::from_secs(600);

/// Expiry policy for [`CachedStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
  pub ttl: Duration,
}

impl Default for CachePolicy {
  fn default() -> Self { Self { ttl: DEFAULT_TTL } }
}

/// Identifies one cached read.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
  pub table:  Table,
  /// Canonical rendering of the read's query parameters; empty for a
  /// full-table read.
  pub params: String,
}

impl CacheKey {
  pub fn read_all(table: Table) -> Self {
    Self { table, params: String::new() }
  }
}

struct Entry {
  stored_at: Instant,
  rows:      Arc<dyn Any + Send + Sync>,
}

#[derive(Default)]
struct CacheState {
  entries:     HashMap<CacheKey, Entry>,
  /// Bumped on every invalidation of a table; a read that straddles a write
  /// is not cached.
  generations: HashMap<Table, u64>,
}

/// A [`TennisStore`] wrapper that memoises `read_all` results.
pub struct CachedStore<S> {
  inner:  S,
  policy: CachePolicy,
  state:  Mutex<CacheState>,
}

impl<S: TennisStore> CachedStore<S> {
  pub fn new(inner: S, policy: CachePolicy) -> Self {
    Self { inner, policy, state: Mutex::new(CacheState::default()) }
  }

  pub fn inner(&self) -> &S { &self.inner }

  pub fn policy(&self) -> CachePolicy { self.policy }

  /// Drop every cached read of `table`.
  pub fn invalidate(&self, table: Table) {
    let mut state = self.lock();
    state.entries.retain(|key, _| key.table != table);
    *state.generations.entry(table).or_default() += 1;
  }

  /// Drop every cached read.
  pub fn clear(&self) {
    let mut state = self.lock();
    state.entries.clear();
    for table in Table::iter() {
      *state.generations.entry(table).or_default() += 1;
    }
  }

  fn lock(&self) -> MutexGuard<'_, CacheState> {
    self.state.lock().unwrap_or_else(PoisonError::into_inner)
  }

  fn generation(&self, table: Table) -> u64 {
    self.lock().generations.get(&table).copied().unwrap_or_default()
  }

  fn lookup<R: Record>(&self, key: &CacheKey) -> Option<Vec<R>> {
    let mut state = self.lock();
    let fresh = match state.entries.get(key) {
      Some(entry) => entry.stored_at.elapsed() < self.policy.ttl,
      None => return None,
    };
    if !fresh {
      state.entries.remove(key);
      return None;
    }
    state
      .entries
      .get(key)
      .and_then(|entry| entry.rows.downcast_ref::<Vec<R>>())
      .cloned()
  }

  fn remember<R: Record>(&self, key: CacheKey, generation: u64, rows: Vec<R>) {
    let mut state = self.lock();
    let current = state.generations.get(&key.table).copied().unwrap_or_default();
    if current != generation {
      return;
    }
    state
      .entries
      .insert(key, Entry { stored_at: Instant::now(), rows: Arc::new(rows) });
  }
}

impl<S: TennisStore> TennisStore for CachedStore<S> {
  type Error = S::Error;

  async fn upsert<R: Record>(&self, records: Vec<R>) -> Result<usize, S::Error> {
    let written = self.inner.upsert(records).await;
    // Partial writes may have landed even on error.
    self.invalidate(R::TABLE);
    written
  }

  async fn read_all<R: Record>(&self) -> Result<Vec<R>, S::Error> {
    let key = CacheKey::read_all(R::TABLE);
    if let Some(rows) = self.lookup::<R>(&key) {
      debug!(table = %R::TABLE, rows = rows.len(), "cache hit");
      return Ok(rows);
    }

    debug!(table = %R::TABLE, "cache miss");
    let generation = self.generation(R::TABLE);
    let rows = self.inner.read_all::<R>().await?;
    self.remember(key, generation, rows.clone());
    Ok(rows)
  }
}
