//! Normalizer: raw nested API documents → flat entity records.
//!
//! Each upstream document family carries one top-level collection key. The
//! normalizer walks that collection and emits two flat record sequences with
//! explicit foreign keys in place of nested children.
//!
//! Nothing here is fatal. An unavailable source or a document without its
//! collection key degrades to an empty batch plus a [`SoftWarning`]; a single
//! entry that fails to parse is skipped and counted.

mod dto;

use std::{collections::HashMap, fmt};

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use strum::{Display, IntoStaticStr};
use tracing::warn;

use crate::record::{Category, Competition, Competitor, Complex, Ranking, Venue};
use dto::{
  CompetitionDto, CompetitorRankingDto, ComplexDto, RankingListDto, VenueDto,
};

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// The upstream document families, one per fetch.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Display,
  IntoStaticStr,
  Serialize,
  Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EntityFamily {
  Competitions,
  Complexes,
  Rankings,
}

impl EntityFamily {
  /// The top-level key under which the family's collection lives.
  pub fn collection_key(self) -> &'static str { self.into() }
}

/// What a document source hands back for one family.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
  Document(Value),
  /// The fetch failed or returned a non-success status.
  Unavailable { reason: String },
}

// ─── Outputs ─────────────────────────────────────────────────────────────────

/// A non-fatal condition that caused a family to yield no records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SoftWarning {
  SourceUnavailable {
    family: EntityFamily,
    reason: String,
  },
  MalformedDocument {
    family:      EntityFamily,
    missing_key: String,
  },
}

impl SoftWarning {
  pub fn family(&self) -> EntityFamily {
    match self {
      Self::SourceUnavailable { family, .. } => *family,
      Self::MalformedDocument { family, .. } => *family,
    }
  }
}

impl fmt::Display for SoftWarning {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::SourceUnavailable { family, reason } => {
        write!(f, "{family} source unavailable: {reason}")
      }
      Self::MalformedDocument { family, missing_key } => {
        write!(f, "{family} document has no {missing_key:?} collection")
      }
    }
  }
}

/// The result of normalizing one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Normalized<B> {
  pub batch:   B,
  /// Set when the whole document was unusable; `batch` is then empty.
  pub warning: Option<SoftWarning>,
  /// Entries present in the document but dropped because they failed to
  /// parse (e.g. no `id`).
  pub skipped: usize,
}

impl<B: Default> Normalized<B> {
  fn degraded(warning: SoftWarning) -> Self {
    warn!(family = %warning.family(), "{warning}");
    Self { batch: B::default(), warning: Some(warning), skipped: 0 }
  }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompetitionBatch {
  pub categories:   Vec<Category>,
  pub competitions: Vec<Competition>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComplexBatch {
  pub complexes: Vec<Complex>,
  pub venues:    Vec<Venue>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankingBatch {
  /// One entry per ranking entry; the same competitor may repeat across
  /// lists.
  pub competitors: Vec<Competitor>,
  pub rankings:    Vec<Ranking>,
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Locate the family's collection inside `outcome`.
fn collection(
  family: EntityFamily,
  outcome: &FetchOutcome,
) -> Result<&[Value], SoftWarning> {
  match outcome {
    FetchOutcome::Unavailable { reason } => Err(SoftWarning::SourceUnavailable {
      family,
      reason: reason.clone(),
    }),
    FetchOutcome::Document(doc) => doc
      .get(family.collection_key())
      .and_then(Value::as_array)
      .map(Vec::as_slice)
      .ok_or_else(|| SoftWarning::MalformedDocument {
        family,
        missing_key: family.collection_key().to_owned(),
      }),
  }
}

/// Parse one entry, logging and counting it as skipped on failure.
fn parse_entry<T: DeserializeOwned>(
  family: EntityFamily,
  entry: &Value,
  skipped: &mut usize,
) -> Option<T> {
  match T::deserialize(entry) {
    Ok(parsed) => Some(parsed),
    Err(error) => {
      warn!(%family, %error, "skipping unparseable entry");
      *skipped += 1;
      None
    }
  }
}

// ─── Competitions ────────────────────────────────────────────────────────────

/// Flatten a competitions document into categories and competitions.
///
/// Categories are deduplicated by id. When two competitions embed the same
/// category id, the one processed last decides the stored attributes; the
/// category keeps the position of its first appearance.
pub fn normalize_competitions(
  outcome: &FetchOutcome,
) -> Normalized<CompetitionBatch> {
  let family = EntityFamily::Competitions;
  let entries = match collection(family, outcome) {
    Ok(entries) => entries,
    Err(warning) => return Normalized::degraded(warning),
  };

  let mut skipped = 0;
  let mut batch = CompetitionBatch::default();
  let mut category_index: HashMap<String, usize> = HashMap::new();

  for entry in entries {
    let Some(dto) = parse_entry::<CompetitionDto>(family, entry, &mut skipped)
    else {
      continue;
    };

    let category = dto.category().unwrap_or_default();
    let category_id = category.id.clone();

    // Only a category with both an id and a name becomes a record.
    if let (Some(id), Some(name)) = (category.id, category.name) {
      let category = Category {
        category_id:   id,
        category_name: name,
        gender:        category.gender,
      };
      match category_index.get(&category.category_id) {
        Some(&idx) => batch.categories[idx] = category,
        None => {
          category_index
            .insert(category.category_id.clone(), batch.categories.len());
          batch.categories.push(category);
        }
      }
    }

    batch.competitions.push(Competition {
      competition_id: dto.id,
      competition_name: dto.name,
      parent_id: dto.parent_id,
      kind: dto.kind,
      gender: dto.gender,
      level: dto.level,
      category_id,
    });
  }

  Normalized { batch, warning: None, skipped }
}

// ─── Complexes ───────────────────────────────────────────────────────────────

/// Flatten a complexes document into complexes and their venues.
pub fn normalize_complexes(outcome: &FetchOutcome) -> Normalized<ComplexBatch> {
  let family = EntityFamily::Complexes;
  let entries = match collection(family, outcome) {
    Ok(entries) => entries,
    Err(warning) => return Normalized::degraded(warning),
  };

  let mut skipped = 0;
  let mut batch = ComplexBatch::default();

  for entry in entries {
    let Some(dto) = parse_entry::<ComplexDto>(family, entry, &mut skipped)
    else {
      continue;
    };

    for raw in dto.venues.iter().flatten() {
      let Some(venue) = parse_entry::<VenueDto>(family, raw, &mut skipped)
      else {
        continue;
      };
      batch.venues.push(Venue {
        venue_id:     venue.id,
        venue_name:   venue.name,
        city_name:    venue.city_name,
        country_name: venue.country_name,
        country_code: venue.country_code,
        timezone:     venue.timezone,
        complex_id:   dto.id.clone(),
      });
    }

    batch.complexes.push(Complex { complex_id: dto.id, complex_name: dto.name });
  }

  Normalized { batch, warning: None, skipped }
}

// ─── Rankings ────────────────────────────────────────────────────────────────

/// Flatten a rankings document into competitors and ranking rows.
///
/// Competitors are emitted once per ranking entry and are not deduplicated;
/// the store's upsert collapses repeats.
pub fn normalize_rankings(outcome: &FetchOutcome) -> Normalized<RankingBatch> {
  let family = EntityFamily::Rankings;
  let lists = match collection(family, outcome) {
    Ok(lists) => lists,
    Err(warning) => return Normalized::degraded(warning),
  };

  let mut skipped = 0;
  let mut batch = RankingBatch::default();

  for raw_list in lists {
    let Some(list) = parse_entry::<RankingListDto>(family, raw_list, &mut skipped)
    else {
      continue;
    };
    let ranking_id = list.ranking_id();

    for raw in list.competitor_rankings.iter().flatten() {
      let Some(entry) =
        parse_entry::<CompetitorRankingDto>(family, raw, &mut skipped)
      else {
        continue;
      };
      let competitor = entry.competitor;

      batch.rankings.push(Ranking {
        ranking_id:          ranking_id.clone(),
        ranking_name:        list.name.clone(),
        competitor_id:       competitor.id.clone(),
        rank:                entry.rank,
        movement:            entry.movement,
        points:              entry.points,
        competitions_played: entry.competitions_played,
      });
      batch.competitors.push(Competitor {
        competitor_id: competitor.id,
        name:          competitor.name,
        country:       competitor.country,
        country_code:  competitor.country_code,
        abbreviation:  competitor.abbreviation,
      });
    }
  }

  Normalized { batch, warning: None, skipped }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn doc(value: Value) -> FetchOutcome { FetchOutcome::Document(value) }

  // ── Degraded documents ──────────────────────────────────────────────────

  #[test]
  fn missing_collection_key_yields_empty_batches_and_warning() {
    let outcome = doc(json!({ "generated_at": "2024-01-01T00:00:00+00:00" }));

    let comps = normalize_competitions(&outcome);
    assert!(comps.batch.categories.is_empty());
    assert!(comps.batch.competitions.is_empty());
    assert!(matches!(
      comps.warning,
      Some(SoftWarning::MalformedDocument { family: EntityFamily::Competitions, ref missing_key })
        if missing_key == "competitions"
    ));

    let complexes = normalize_complexes(&outcome);
    assert_eq!(complexes.batch, ComplexBatch::default());
    assert!(complexes.warning.is_some());

    let rankings = normalize_rankings(&outcome);
    assert_eq!(rankings.batch, RankingBatch::default());
    assert!(rankings.warning.is_some());
  }

  #[test]
  fn collection_that_is_not_a_list_is_malformed() {
    let outcome = doc(json!({ "complexes": { "id": "x" } }));
    let result = normalize_complexes(&outcome);
    assert!(result.batch.complexes.is_empty());
    assert!(matches!(
      result.warning,
      Some(SoftWarning::MalformedDocument { .. })
    ));
  }

  #[test]
  fn unavailable_source_yields_soft_warning() {
    let outcome = FetchOutcome::Unavailable { reason: "HTTP 403".into() };
    let result = normalize_rankings(&outcome);
    assert!(result.batch.competitors.is_empty());
    assert!(result.batch.rankings.is_empty());
    assert_eq!(
      result.warning,
      Some(SoftWarning::SourceUnavailable {
        family: EntityFamily::Rankings,
        reason: "HTTP 403".into(),
      })
    );
  }

  // ── Competitions ────────────────────────────────────────────────────────

  #[test]
  fn competitions_emit_categories_and_foreign_keys() {
    let outcome = doc(json!({
      "competitions": [
        {
          "id": "sr:competition:620",
          "name": "ATP Vienna, Austria Men Singles",
          "parent_id": "sr:competition:2553",
          "type": "singles",
          "gender": "men",
          "level": "atp_500",
          "category": { "id": "sr:category:3", "name": "ATP" }
        },
        {
          "id": "sr:competition:2553",
          "name": "ATP Vienna, Austria",
          "type": "singles",
          "gender": "men"
        }
      ]
    }));

    let result = normalize_competitions(&outcome);
    assert!(result.warning.is_none());
    assert_eq!(result.batch.categories.len(), 1);
    assert_eq!(result.batch.categories[0].category_name, "ATP");

    let comps = &result.batch.competitions;
    assert_eq!(comps.len(), 2);
    assert_eq!(comps[0].category_id.as_deref(), Some("sr:category:3"));
    assert_eq!(comps[0].parent_id.as_deref(), Some("sr:competition:2553"));
    assert_eq!(comps[0].kind.as_deref(), Some("singles"));
    assert_eq!(comps[0].level.as_deref(), Some("atp_500"));
    assert_eq!(comps[1].category_id, None);
    assert_eq!(comps[1].parent_id, None);
  }

  #[test]
  fn duplicate_category_is_last_seen_wins() {
    let outcome = doc(json!({
      "competitions": [
        { "id": "c1", "name": "One", "category": { "id": "cat1", "name": "ATP" } },
        { "id": "c2", "name": "Two", "category": { "id": "cat2", "name": "WTA" } },
        { "id": "c3", "name": "Three", "category": { "id": "cat1", "name": "ATP Tour" } }
      ]
    }));

    let result = normalize_competitions(&outcome);
    let cats = &result.batch.categories;
    assert_eq!(cats.len(), 2);
    assert_eq!(cats[0].category_id, "cat1");
    assert_eq!(cats[0].category_name, "ATP Tour");
    assert_eq!(cats[1].category_id, "cat2");
  }

  #[test]
  fn partial_category_keeps_its_competition() {
    let outcome = doc(json!({
      "competitions": [
        { "id": "c1", "name": "Wimbledon", "category": {} },
        { "id": "c2", "name": "Roland Garros", "category": { "id": "cat1" } },
        { "id": "c3", "name": "US Open", "category": { "name": "ATP" } },
        { "id": "c4", "name": "Australian Open", "category": null }
      ]
    }));

    let result = normalize_competitions(&outcome);
    assert_eq!(result.skipped, 0);
    assert!(result.batch.categories.is_empty());

    let comps = &result.batch.competitions;
    assert_eq!(comps.len(), 4);
    assert_eq!(comps[0].category_id, None);
    assert_eq!(comps[1].category_id.as_deref(), Some("cat1"));
    assert_eq!(comps[2].category_id, None);
    assert_eq!(comps[3].category_id, None);
  }

  #[test]
  fn category_of_wrong_shape_reads_as_absent() {
    let outcome = doc(json!({
      "competitions": [ { "id": "c1", "name": "Wimbledon", "category": "ATP" } ]
    }));

    let result = normalize_competitions(&outcome);
    assert_eq!(result.skipped, 0);
    assert_eq!(result.batch.competitions.len(), 1);
    assert_eq!(result.batch.competitions[0].category_id, None);
  }

  #[test]
  fn competition_without_id_is_skipped() {
    let outcome = doc(json!({
      "competitions": [
        { "name": "Nameless" },
        { "id": "c1", "name": "Wimbledon" }
      ]
    }));

    let result = normalize_competitions(&outcome);
    assert_eq!(result.skipped, 1);
    assert_eq!(result.batch.competitions.len(), 1);
    assert!(result.warning.is_none());
  }

  // ── Complexes ───────────────────────────────────────────────────────────

  #[test]
  fn complexes_emit_venues_with_parent_id() {
    let outcome = doc(json!({
      "complexes": [
        {
          "id": "sr:complex:705",
          "name": "Nacional Tenis Club",
          "venues": [
            {
              "id": "sr:venue:1708",
              "name": "Court Central",
              "city_name": "Montevideo",
              "country_name": "Uruguay",
              "country_code": "URY",
              "timezone": "America/Montevideo"
            },
            { "id": "sr:venue:1709", "name": "Court 1" }
          ]
        },
        { "id": "sr:complex:706", "name": "Empty Complex" }
      ]
    }));

    let result = normalize_complexes(&outcome);
    assert_eq!(result.batch.complexes.len(), 2);
    assert_eq!(result.batch.venues.len(), 2);
    assert!(
      result
        .batch
        .venues
        .iter()
        .all(|v| v.complex_id == "sr:complex:705")
    );
    assert_eq!(result.batch.venues[0].timezone.as_deref(), Some("America/Montevideo"));
    assert_eq!(result.batch.venues[1].city_name, None);
  }

  #[test]
  fn malformed_venue_does_not_drop_its_complex() {
    let outcome = doc(json!({
      "complexes": [
        { "id": "x1", "name": "Centre", "venues": [ { "name": "no id" } ] }
      ]
    }));

    let result = normalize_complexes(&outcome);
    assert_eq!(result.batch.complexes.len(), 1);
    assert!(result.batch.venues.is_empty());
    assert_eq!(result.skipped, 1);
  }

  // ── Rankings ────────────────────────────────────────────────────────────

  #[test]
  fn rankings_carry_list_context_and_repeat_competitors() {
    let player = json!({
      "id": "sr:competitor:1",
      "name": "Doe, Jane",
      "country": "Finland",
      "country_code": "FIN",
      "abbreviation": "DOE"
    });
    let outcome = doc(json!({
      "rankings": [
        {
          "type_id": 1,
          "name": "ATP",
          "competitor_rankings": [
            { "rank": 1, "movement": 2, "points": 9855, "competitions_played": 19, "competitor": player.clone() }
          ]
        },
        {
          "id": "doubles",
          "name": "ATP Doubles",
          "competitor_rankings": [
            { "rank": 7, "movement": -1, "points": 4000, "competitor": player }
          ]
        }
      ]
    }));

    let result = normalize_rankings(&outcome);
    assert_eq!(result.batch.competitors.len(), 2);
    assert_eq!(
      result.batch.competitors[0].competitor_id,
      result.batch.competitors[1].competitor_id
    );

    let ranks = &result.batch.rankings;
    assert_eq!(ranks.len(), 2);
    assert_eq!(ranks[0].ranking_id, "1");
    assert_eq!(ranks[0].ranking_name.as_deref(), Some("ATP"));
    assert_eq!(ranks[0].rank, Some(1));
    assert_eq!(ranks[0].competitions_played, Some(19));
    assert_eq!(ranks[1].ranking_id, "doubles");
    assert_eq!(ranks[1].movement, Some(-1));
    assert_eq!(ranks[1].competitions_played, None);
  }

  #[test]
  fn fractional_points_keep_the_entry() {
    let outcome = doc(json!({
      "rankings": [
        { "id": "atp", "competitor_rankings": [
          { "rank": 12, "points": 1234.5, "competitor": { "id": "p1", "name": "A" } }
        ] }
      ]
    }));

    let result = normalize_rankings(&outcome);
    assert_eq!(result.skipped, 0);
    assert_eq!(result.batch.competitors.len(), 1);
    assert_eq!(result.batch.rankings.len(), 1);
    assert_eq!(result.batch.rankings[0].points, Some(1234.5));
  }

  #[test]
  fn ranking_list_without_id_uses_empty_id() {
    let outcome = doc(json!({
      "rankings": [
        { "competitor_rankings": [ { "rank": 3, "competitor": { "id": "p1" } } ] }
      ]
    }));

    let result = normalize_rankings(&outcome);
    assert_eq!(result.batch.rankings[0].ranking_id, "");
    assert_eq!(result.batch.rankings[0].ranking_name, None);
  }

  #[test]
  fn ranking_entry_without_competitor_is_skipped() {
    let outcome = doc(json!({
      "rankings": [
        {
          "id": "r",
          "competitor_rankings": [
            { "rank": 1 },
            { "rank": 2, "competitor": { "id": "p2", "name": "B" } }
          ]
        }
      ]
    }));

    let result = normalize_rankings(&outcome);
    assert_eq!(result.skipped, 1);
    assert_eq!(result.batch.rankings.len(), 1);
    assert_eq!(result.batch.competitors[0].competitor_id, "p2");
  }
}
