//! Error types for `courtside-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A credential or connection setting required before any ingestion or
  /// storage access is absent. Always fatal.
  #[error("missing credential: {0}")]
  MissingCredential(String),

  #[error("competition hierarchy contains a cycle through {0}")]
  HierarchyCycle(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
