//! Flat entity records, the rows of the six stored tables.
//!
//! Records carry no nested structure. Relationships are expressed as plain
//! foreign-key id fields and resolved at read time by the view builder.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use strum::{Display, EnumIter, IntoStaticStr};

// ─── Tables ──────────────────────────────────────────────────────────────────

/// The stored tables, named as the durable store knows them.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Display,
  EnumIter,
  IntoStaticStr,
  Serialize,
  Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Table {
  Categories,
  Competitions,
  Competitors,
  CompetitorRankings,
  Complexes,
  Venues,
}

impl Table {
  pub fn name(self) -> &'static str { self.into() }

  /// Column names in storage order. These match the serde field names of the
  /// record type stored in the table.
  pub fn columns(self) -> &'static [&'static str] {
    match self {
      Table::Categories => &["category_id", "category_name", "gender"],
      Table::Competitions => &[
        "competition_id",
        "competition_name",
        "parent_id",
        "type",
        "gender",
        "level",
        "category_id",
      ],
      Table::Competitors => &[
        "competitor_id",
        "name",
        "country",
        "country_code",
        "abbreviation",
      ],
      Table::CompetitorRankings => &[
        "ranking_id",
        "ranking_name",
        "competitor_id",
        "rank",
        "movement",
        "points",
        "competitions_played",
      ],
      Table::Complexes => &["complex_id", "complex_name"],
      Table::Venues => &[
        "venue_id",
        "venue_name",
        "city_name",
        "country_name",
        "country_code",
        "timezone",
        "complex_id",
      ],
    }
  }

  /// Columns forming the upsert conflict target.
  pub fn primary_key(self) -> &'static [&'static str] {
    match self {
      Table::Categories => &["category_id"],
      Table::Competitions => &["competition_id"],
      Table::Competitors => &["competitor_id"],
      Table::CompetitorRankings => &["ranking_id", "competitor_id"],
      Table::Complexes => &["complex_id"],
      Table::Venues => &["venue_id"],
    }
  }
}

// ─── Record trait ────────────────────────────────────────────────────────────

/// A flat row belonging to exactly one [`Table`].
pub trait Record:
  Serialize + DeserializeOwned + Clone + Send + Sync + 'static
{
  const TABLE: Table;

  /// Primary-key values, in the order of [`Table::primary_key`].
  fn key(&self) -> Vec<&str>;
}

// ─── Competitions ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
  pub category_id:   String,
  pub category_name: String,
  pub gender:        Option<String>,
}

impl Record for Category {
  const TABLE: Table = Table::Categories;

  fn key(&self) -> Vec<&str> { vec![self.category_id.as_str()] }
}

/// A competition. `parent_id` points at another competition and forms a
/// tree; see [`crate::hierarchy`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Competition {
  pub competition_id:   String,
  pub competition_name: String,
  pub parent_id:        Option<String>,
  /// `singles`, `doubles`, `mixed`, ...
  #[serde(rename = "type")]
  pub kind:             Option<String>,
  pub gender:           Option<String>,
  pub level:            Option<String>,
  pub category_id:      Option<String>,
}

impl Record for Competition {
  const TABLE: Table = Table::Competitions;

  fn key(&self) -> Vec<&str> { vec![self.competition_id.as_str()] }
}

// ─── Rankings ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Competitor {
  pub competitor_id: String,
  pub name:          Option<String>,
  pub country:       Option<String>,
  pub country_code:  Option<String>,
  pub abbreviation:  Option<String>,
}

impl Record for Competitor {
  const TABLE: Table = Table::Competitors;

  fn key(&self) -> Vec<&str> { vec![self.competitor_id.as_str()] }
}

/// One competitor's position in one ranking list.
///
/// Keyed on `(ranking_id, competitor_id)`: a later snapshot of the same list
/// replaces the earlier one for that competitor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
  pub ranking_id:          String,
  pub ranking_name:        Option<String>,
  pub competitor_id:       String,
  pub rank:                Option<u32>,
  pub movement:            Option<i32>,
  pub points:              Option<f64>,
  pub competitions_played: Option<u32>,
}

impl Record for Ranking {
  const TABLE: Table = Table::CompetitorRankings;

  fn key(&self) -> Vec<&str> {
    vec![self.ranking_id.as_str(), self.competitor_id.as_str()]
  }
}

// ─── Venues ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Complex {
  pub complex_id:   String,
  pub complex_name: String,
}

impl Record for Complex {
  const TABLE: Table = Table::Complexes;

  fn key(&self) -> Vec<&str> { vec![self.complex_id.as_str()] }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Venue {
  pub venue_id:     String,
  pub venue_name:   String,
  pub city_name:    Option<String>,
  pub country_name: Option<String>,
  pub country_code: Option<String>,
  pub timezone:     Option<String>,
  pub complex_id:   String,
}

impl Record for Venue {
  const TABLE: Table = Table::Venues;

  fn key(&self) -> Vec<&str> { vec![self.venue_id.as_str()] }
}

#[cfg(test)]
mod tests {
  use serde_json::Value;

  use super::*;

  fn serialized_keys<R: Record>(record: &R) -> Vec<String> {
    match serde_json::to_value(record).unwrap() {
      Value::Object(map) => map.keys().cloned().collect(),
      other => panic!("expected object, got {other:?}"),
    }
  }

  fn assert_columns_match<R: Record>(record: R) {
    let mut keys = serialized_keys(&record);
    let mut cols: Vec<String> =
      R::TABLE.columns().iter().map(|c| c.to_string()).collect();
    keys.sort();
    cols.sort();
    assert_eq!(keys, cols, "column list drifted for {}", R::TABLE);
  }

  #[test]
  fn columns_match_serialized_fields() {
    assert_columns_match(Category {
      category_id:   "c".into(),
      category_name: "ATP".into(),
      gender:        None,
    });
    assert_columns_match(Competition {
      competition_id:   "c".into(),
      competition_name: "Wimbledon".into(),
      parent_id:        None,
      kind:             None,
      gender:           None,
      level:            None,
      category_id:      None,
    });
    assert_columns_match(Competitor {
      competitor_id: "p".into(),
      name:          None,
      country:       None,
      country_code:  None,
      abbreviation:  None,
    });
    assert_columns_match(Ranking {
      ranking_id:          "r".into(),
      ranking_name:        None,
      competitor_id:       "p".into(),
      rank:                None,
      movement:            None,
      points:              None,
      competitions_played: None,
    });
    assert_columns_match(Complex {
      complex_id:   "x".into(),
      complex_name: "Centre".into(),
    });
    assert_columns_match(Venue {
      venue_id:     "v".into(),
      venue_name:   "Court 1".into(),
      city_name:    None,
      country_name: None,
      country_code: None,
      timezone:     None,
      complex_id:   "x".into(),
    });
  }

  #[test]
  fn primary_key_columns_are_columns() {
    use strum::IntoEnumIterator as _;
    for table in Table::iter() {
      for pk in table.primary_key() {
        assert!(table.columns().contains(pk), "{table}: {pk}");
      }
    }
  }

  #[test]
  fn table_names_are_snake_case() {
    assert_eq!(Table::CompetitorRankings.name(), "competitor_rankings");
    assert_eq!(Table::Categories.to_string(), "categories");
  }

  #[test]
  fn competition_kind_serializes_as_type() {
    let c = Competition {
      competition_id:   "sr:competition:1".into(),
      competition_name: "Wimbledon".into(),
      parent_id:        None,
      kind:             Some("singles".into()),
      gender:           Some("men".into()),
      level:            None,
      category_id:      None,
    };
    let v = serde_json::to_value(&c).unwrap();
    assert_eq!(v["type"], "singles");
  }
}
