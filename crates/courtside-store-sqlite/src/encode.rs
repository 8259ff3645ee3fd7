//! Bridging between flat records and SQLite rows.
//!
//! A record is serialized to a JSON object and its fields are laid out in the
//! order of [`Table::columns`]. Reading reverses this: each column becomes a
//! JSON field and the object is deserialized back into the record type.

use courtside_core::record::{Record, Table};
use rusqlite::types::Value as SqlValue;
use serde_json::{Map, Number, Value as JsonValue};

use crate::{Error, Result};

// ─── SQL text ────────────────────────────────────────────────────────────────

fn quote(ident: &str) -> String { format!("\"{ident}\"") }

fn quoted_list(idents: &[&str]) -> String {
  idents.iter().map(|c| quote(c)).collect::<Vec<_>>().join(", ")
}

/// `INSERT ... ON CONFLICT (pk) DO UPDATE SET` for every non-key column.
pub fn upsert_sql(table: Table) -> String {
  let columns = table.columns();
  let key = table.primary_key();

  let placeholders = (1..=columns.len())
    .map(|i| format!("?{i}"))
    .collect::<Vec<_>>()
    .join(", ");

  let updates: Vec<String> = columns
    .iter()
    .filter(|c| !key.contains(*c))
    .map(|c| format!("{q} = excluded.{q}", q = quote(c)))
    .collect();
  let on_conflict = if updates.is_empty() {
    "DO NOTHING".to_owned()
  } else {
    format!("DO UPDATE SET {}", updates.join(", "))
  };

  format!(
    "INSERT INTO {} ({}) VALUES ({}) ON CONFLICT ({}) {}",
    quote(table.name()),
    quoted_list(columns),
    placeholders,
    quoted_list(key),
    on_conflict,
  )
}

/// `SELECT` of every column, oldest row first.
pub fn select_all_sql(table: Table) -> String {
  format!(
    "SELECT {} FROM {} ORDER BY rowid",
    quoted_list(table.columns()),
    quote(table.name()),
  )
}

// ─── Values ──────────────────────────────────────────────────────────────────

fn to_sql(value: JsonValue) -> SqlValue {
  match value {
    JsonValue::Null => SqlValue::Null,
    JsonValue::Bool(b) => SqlValue::Integer(b.into()),
    JsonValue::Number(n) => match n.as_i64() {
      Some(i) => SqlValue::Integer(i),
      None => n.as_f64().map_or(SqlValue::Null, SqlValue::Real),
    },
    JsonValue::String(s) => SqlValue::Text(s),
    nested => SqlValue::Text(nested.to_string()),
  }
}

fn to_json(value: SqlValue) -> JsonValue {
  match value {
    SqlValue::Null | SqlValue::Blob(_) => JsonValue::Null,
    SqlValue::Integer(i) => JsonValue::Number(i.into()),
    SqlValue::Real(f) => Number::from_f64(f).map_or(JsonValue::Null, JsonValue::Number),
    SqlValue::Text(s) => JsonValue::String(s),
  }
}

/// Lay a record out as one SQL value per column.
pub fn encode_row<R: Record>(record: &R) -> Result<Vec<SqlValue>> {
  let JsonValue::Object(mut fields) = serde_json::to_value(record)? else {
    return Err(Error::NotARow(R::TABLE));
  };
  Ok(
    R::TABLE
      .columns()
      .iter()
      .map(|c| to_sql(fields.remove(*c).unwrap_or(JsonValue::Null)))
      .collect(),
  )
}

/// Rebuild a record from column values in [`Table::columns`] order.
pub fn decode_row<R: Record>(values: Vec<SqlValue>) -> Result<R> {
  let fields: Map<String, JsonValue> = R::TABLE
    .columns()
    .iter()
    .zip(values)
    .map(|(c, v)| ((*c).to_owned(), to_json(v)))
    .collect();
  Ok(serde_json::from_value(JsonValue::Object(fields))?)
}
