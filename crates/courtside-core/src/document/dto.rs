//! Wire shapes of the upstream API documents.
//!
//! Only the fields the normalizer reads are declared; everything else in the
//! payload is ignored. Nested collections are kept as raw [`Value`]s so a
//! single malformed child can be skipped without losing its siblings.

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct CompetitionDto {
  pub id:        String,
  pub name:      String,
  pub parent_id: Option<String>,
  #[serde(rename = "type")]
  pub kind:      Option<String>,
  pub gender:    Option<String>,
  pub level:     Option<String>,
  category:      Option<Value>,
}

impl CompetitionDto {
  /// The embedded category, if it is an object. Its fields may each be
  /// missing; a category of the wrong shape reads as absent.
  pub fn category(&self) -> Option<CategoryDto> {
    self
      .category
      .clone()
      .and_then(|raw| serde_json::from_value(raw).ok())
  }
}

#[derive(Debug, Default, Deserialize)]
pub struct CategoryDto {
  pub id:     Option<String>,
  pub name:   Option<String>,
  pub gender: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ComplexDto {
  pub id:     String,
  pub name:   String,
  pub venues: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
pub struct VenueDto {
  pub id:           String,
  pub name:         String,
  pub city_name:    Option<String>,
  pub country_name: Option<String>,
  pub country_code: Option<String>,
  pub timezone:     Option<String>,
}

/// One named ranking list (e.g. ATP doubles, WTA doubles).
#[derive(Debug, Deserialize)]
pub struct RankingListDto {
  pub id:                  Option<String>,
  pub type_id:             Option<u64>,
  pub name:                Option<String>,
  pub competitor_rankings: Option<Vec<Value>>,
}

impl RankingListDto {
  /// The list's identifier: `id`, else the numeric `type_id`, else empty.
  pub fn ranking_id(&self) -> String {
    match (&self.id, self.type_id) {
      (Some(id), _) => id.clone(),
      (None, Some(type_id)) => type_id.to_string(),
      (None, None) => String::new(),
    }
  }
}

#[derive(Debug, Deserialize)]
pub struct CompetitorRankingDto {
  pub rank:                Option<u32>,
  pub movement:            Option<i32>,
  pub points:              Option<f64>,
  pub competitions_played: Option<u32>,
  pub competitor:          CompetitorDto,
}

#[derive(Debug, Deserialize)]
pub struct CompetitorDto {
  pub id:           String,
  pub name:         Option<String>,
  pub country:      Option<String>,
  pub country_code: Option<String>,
  pub abbreviation: Option<String>,
}
