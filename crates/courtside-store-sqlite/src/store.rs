//! [`SqliteStore`]: the SQLite implementation of [`TennisStore`].

use std::path::Path;

use courtside_core::{record::Record, store::TennisStore};
use rusqlite::types::Value as SqlValue;
use tracing::debug;

use crate::{
  Error, Result,
  encode::{decode_row, encode_row, select_all_sql, upsert_sql},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Courtside table store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    if path.as_os_str().is_empty() {
      return Err(courtside_core::Error::MissingCredential("store path".into()).into());
    }
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, mostly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── TennisStore impl ────────────────────────────────────────────────────────

impl TennisStore for SqliteStore {
  type Error = Error;

  async fn upsert<R: Record>(&self, records: Vec<R>) -> Result<usize> {
    let rows = records
      .iter()
      .map(encode_row)
      .collect::<Result<Vec<Vec<SqlValue>>>>()?;
    if rows.is_empty() {
      return Ok(0);
    }
    let sql = upsert_sql(R::TABLE);

    let written = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        {
          let mut stmt = tx.prepare_cached(&sql)?;
          for row in &rows {
            stmt.execute(rusqlite::params_from_iter(row.iter()))?;
          }
        }
        tx.commit()?;
        Ok(rows.len())
      })
      .await?;

    debug!(table = %R::TABLE, rows = written, "upsert committed");
    Ok(written)
  }

  async fn read_all<R: Record>(&self) -> Result<Vec<R>> {
    let sql = select_all_sql(R::TABLE);
    let width = R::TABLE.columns().len();

    let raw: Vec<Vec<SqlValue>> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], |row| {
            (0..width)
              .map(|i| row.get::<_, SqlValue>(i))
              .collect::<rusqlite::Result<Vec<_>>>()
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    debug!(table = %R::TABLE, rows = raw.len(), "read table");
    raw.into_iter().map(decode_row).collect()
  }
}
