//! Query parameters shared by several endpoints, and their translation into
//! a [`ViewFilter`].
//!
//! Set-valued parameters are comma-separated: `?country=Spain,Italy`.

use std::collections::BTreeSet;

use courtside_core::view::{RankRange, ViewFilter};
use serde::Deserialize;

use crate::error::ApiError;

/// Split a comma-separated parameter into a set, dropping blank items.
pub fn split_set(raw: Option<&str>) -> BTreeSet<String> {
  raw
    .map(|s| {
      s.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
        .collect()
    })
    .unwrap_or_default()
}

// ─── Competitions ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct CompetitionParams {
  /// Comma-separated category names.
  pub category: Option<String>,
  /// Comma-separated competition genders.
  pub gender:   Option<String>,
}

impl CompetitionParams {
  pub fn filter(&self) -> ViewFilter {
    ViewFilter {
      category_names: split_set(self.category.as_deref()),
      genders: split_set(self.gender.as_deref()),
      ..Default::default()
    }
  }
}

// ─── Rankings ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct RankingParams {
  pub min_rank: Option<u32>,
  pub max_rank: Option<u32>,
  /// Comma-separated competitor countries.
  pub country:  Option<String>,
  /// Case-insensitive name substring.
  pub q:        Option<String>,
}

impl RankingParams {
  /// A lone bound leaves the other side open. An inverted range is rejected.
  pub fn filter(&self) -> Result<ViewFilter, ApiError> {
    let rank_range = match (self.min_rank, self.max_rank) {
      (None, None) => None,
      (min, max) => {
        let range = RankRange {
          min: min.unwrap_or(0),
          max: max.unwrap_or(u32::MAX),
        };
        if range.min > range.max {
          return Err(ApiError::BadRequest(format!(
            "min_rank {} exceeds max_rank {}",
            range.min, range.max
          )));
        }
        Some(range)
      }
    };
    Ok(ViewFilter {
      rank_range,
      countries: split_set(self.country.as_deref()),
      name_substring: self.q.clone(),
      ..Default::default()
    })
  }
}

// ─── Venues ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct VenueParams {
  /// Comma-separated venue countries.
  pub country: Option<String>,
}

impl VenueParams {
  pub fn filter(&self) -> ViewFilter {
    ViewFilter {
      venue_countries: split_set(self.country.as_deref()),
      ..Default::default()
    }
  }
}
