//! Declarative view filters.
//!
//! Every field is optional and an empty set means "no restriction". All
//! present fields are ANDed; each is an independent predicate, so the order
//! in which they are applied does not matter.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{CompetitionCategoryRow, RankingRow, VenueComplexRow};

/// Inclusive rank bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankRange {
  pub min: u32,
  pub max: u32,
}

impl RankRange {
  pub fn contains(&self, rank: u32) -> bool {
    self.min <= rank && rank <= self.max
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewFilter {
  /// Competition view: category name is one of these.
  pub category_names:  BTreeSet<String>,
  /// Competition view: competition gender is one of these.
  pub genders:         BTreeSet<String>,
  /// Ranking view: rank within bounds. Rows without a rank never match.
  pub rank_range:      Option<RankRange>,
  /// Ranking view: competitor country is one of these.
  pub countries:       BTreeSet<String>,
  /// Ranking view: case-insensitive substring of the competitor name,
  /// matched literally. Only an empty needle is unrestricted.
  pub name_substring:  Option<String>,
  /// Venue view: venue country is one of these.
  pub venue_countries: BTreeSet<String>,
}

/// `true` when `set` is empty or contains `value`. A missing value only
/// passes an empty set.
fn member(set: &BTreeSet<String>, value: Option<&str>) -> bool {
  set.is_empty() || value.is_some_and(|v| set.contains(v))
}

impl ViewFilter {
  pub fn matches_competition(&self, row: &CompetitionCategoryRow) -> bool {
    member(&self.category_names, row.category_name.as_deref())
      && member(&self.genders, row.gender.as_deref())
  }

  pub fn matches_ranking(&self, row: &RankingRow) -> bool {
    let in_range = match self.rank_range {
      None => true,
      Some(range) => row.rank.is_some_and(|r| range.contains(r)),
    };
    let name_ok = match self.name_substring.as_deref() {
      None | Some("") => true,
      Some(needle) => {
        let needle = needle.to_lowercase();
        row
          .name
          .as_deref()
          .is_some_and(|n| n.to_lowercase().contains(&needle))
      }
    };
    in_range && name_ok && member(&self.countries, row.country.as_deref())
  }

  pub fn matches_venue(&self, row: &VenueComplexRow) -> bool {
    member(&self.venue_countries, row.country_name.as_deref())
  }
}

pub fn filter_competitions(
  rows: &[CompetitionCategoryRow],
  filter: &ViewFilter,
) -> Vec<CompetitionCategoryRow> {
  rows
    .iter()
    .filter(|r| filter.matches_competition(r))
    .cloned()
    .collect()
}

pub fn filter_rankings(rows: &[RankingRow], filter: &ViewFilter) -> Vec<RankingRow> {
  rows
    .iter()
    .filter(|r| filter.matches_ranking(r))
    .cloned()
    .collect()
}

pub fn filter_venues(
  rows: &[VenueComplexRow],
  filter: &ViewFilter,
) -> Vec<VenueComplexRow> {
  rows
    .iter()
    .filter(|r| filter.matches_venue(r))
    .cloned()
    .collect()
}

// ─── Picker options ──────────────────────────────────────────────────────────

/// The distinct values a dashboard offers for each filter field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
  pub category_names:  BTreeSet<String>,
  pub genders:         BTreeSet<String>,
  pub countries:       BTreeSet<String>,
  pub venue_countries: BTreeSet<String>,
  /// Lowest and highest rank present, if any row is ranked.
  pub rank_bounds:     Option<RankRange>,
}

impl FilterOptions {
  pub fn collect(
    competitions: &[CompetitionCategoryRow],
    rankings: &[RankingRow],
    venues: &[VenueComplexRow],
  ) -> Self {
    let ranks = rankings.iter().filter_map(|r| r.rank);
    let rank_bounds = ranks
      .clone()
      .min()
      .zip(ranks.max())
      .map(|(min, max)| RankRange { min, max });

    Self {
      category_names: competitions
        .iter()
        .filter_map(|r| r.category_name.clone())
        .collect(),
      genders: competitions.iter().filter_map(|r| r.gender.clone()).collect(),
      countries: rankings.iter().filter_map(|r| r.country.clone()).collect(),
      venue_countries: venues
        .iter()
        .filter_map(|r| r.country_name.clone())
        .collect(),
      rank_bounds,
    }
  }
}
