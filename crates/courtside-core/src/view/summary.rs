//! Ranked orderings and the dashboard summary.

use std::{cmp::Ordering, collections::BTreeSet};

use serde::{Deserialize, Serialize};

use super::{RankingRow, Tables};
use crate::aggregate::{
  Movement, SortOrder, by_count_desc, compare_floats_nulls_last,
  compare_nulls_last, count_by, movement_breakdown,
};

/// Number of countries listed in [`DashboardSummary::top_countries`].
const TOP_COUNTRIES: usize = 10;

/// A grouping key and the number of rows in its group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Count<K> {
  pub key:   K,
  pub count: usize,
}

impl<K> From<(K, usize)> for Count<K> {
  fn from((key, count): (K, usize)) -> Self { Self { key, count } }
}

/// Rows that carry a rank. Unranked competitors never appear in ranked
/// views.
pub fn ranked(rows: &[RankingRow]) -> Vec<RankingRow> {
  rows.iter().filter(|r| r.rank.is_some()).cloned().collect()
}

fn display_cmp(a: &RankingRow, b: &RankingRow) -> Ordering {
  compare_nulls_last(&a.rank, &b.rank, SortOrder::Ascending)
    .then_with(|| compare_floats_nulls_last(a.points, b.points, SortOrder::Descending))
    .then_with(|| compare_nulls_last(&a.name, &b.name, SortOrder::Ascending))
}

/// Rank ascending, then points descending, then name ascending. Remaining
/// ties keep their input order.
pub fn display_order(rows: &[RankingRow]) -> Vec<RankingRow> {
  let mut sorted = rows.to_vec();
  sorted.sort_by(display_cmp);
  sorted
}

/// The best `n` ranked rows in display order.
pub fn top_ranked(rows: &[RankingRow], n: usize) -> Vec<RankingRow> {
  let mut sorted = display_order(&ranked(rows));
  sorted.truncate(n);
  sorted
}

/// Headline figures across the whole store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSummary {
  pub total_competitions:        usize,
  pub total_competitors:         usize,
  /// Distinct non-null competitor countries.
  pub countries_represented:     usize,
  /// Competitor count per country, largest first.
  pub top_countries:             Vec<Count<String>>,
  pub competitions_per_category: Vec<Count<String>>,
  /// Movement labels over all ranked rows.
  pub movement:                  Vec<Count<Movement>>,
}

impl DashboardSummary {
  pub fn build(tables: &Tables) -> Self {
    let countries: BTreeSet<&str> = tables
      .competitors
      .iter()
      .filter_map(|c| c.country.as_deref())
      .collect();

    let top_countries = by_count_desc(count_by(&tables.competitors, |c| {
      c.country.clone()
    }))
    .into_iter()
    .take(TOP_COUNTRIES)
    .map(Count::from)
    .collect();

    let competitions_per_category =
      count_by(&tables.competition_category(), |r| r.category_name.clone())
        .into_iter()
        .map(Count::from)
        .collect();

    let movement = movement_breakdown(&ranked(&tables.ranking_view()), |r| {
      r.movement
    })
    .into_iter()
    .map(Count::from)
    .collect();

    Self {
      total_competitions: tables.competitions.len(),
      total_competitors: tables.competitors.len(),
      countries_represented: countries.len(),
      top_countries,
      competitions_per_category,
      movement,
    }
  }
}
