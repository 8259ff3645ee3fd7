//! The store and source abstractions.
//!
//! [`TennisStore`] is implemented by storage backends (e.g.
//! `courtside-store-sqlite`) and wrapped by [`crate::cache::CachedStore`].
//! [`DocumentSource`] is implemented by upstream fetchers (e.g.
//! `courtside-source`). Higher layers depend on these traits, not on any
//! concrete backend.

use std::future::Future;

use crate::{
  document::{EntityFamily, FetchOutcome},
  record::Record,
};

/// Abstraction over the durable, upsert-capable table store.
///
/// A store handle is constructed once at process start and passed by
/// reference to every operation; dropping it releases the connection.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait TennisStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Upsert a batch of records into `R::TABLE`, keyed by the table's primary
  /// key. Existing rows are overwritten column by column; new keys are
  /// inserted. Returns the number of records written.
  ///
  /// The batch is submitted as one logical operation. Upserting the same
  /// record twice leaves the same stored state as upserting it once.
  fn upsert<R: Record>(
    &self,
    records: Vec<R>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Return every stored row of `R::TABLE`, in insertion order. No
  /// pagination is applied.
  fn read_all<R: Record>(
    &self,
  ) -> impl Future<Output = Result<Vec<R>, Self::Error>> + Send + '_;
}

/// An upstream provider of raw documents, one per [`EntityFamily`].
///
/// Implementations make a single attempt per call and never fail: transport
/// errors and non-success statuses come back as
/// [`FetchOutcome::Unavailable`].
pub trait DocumentSource: Send + Sync {
  fn fetch(
    &self,
    family: EntityFamily,
  ) -> impl Future<Output = FetchOutcome> + Send + '_;
}
