//! Error type for `courtside-store-sqlite`.

use courtside_core::record::Table;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] courtside_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  /// A record serialized to something other than a flat JSON object.
  #[error("record for table {0} is not a flat row")]
  NotARow(Table),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
