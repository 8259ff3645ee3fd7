//! View builder: stored tables → joined, filtered analytical views.
//!
//! Three left outer joins feed every view:
//!
//! | View | Left | Right | On |
//! |------|------|-------|----|
//! | [`CompetitionCategoryRow`] | competitions | categories | `category_id` |
//! | [`RankingRow`] | competitors | rankings | `competitor_id` |
//! | [`VenueComplexRow`] | venues | complexes | `complex_id` |
//!
//! Every left row survives its join. An unresolved foreign key is not an
//! error; the right-hand columns are simply `None`.

mod filter;
mod summary;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
  record::{Category, Competition, Competitor, Complex, Ranking, Venue},
  store::TennisStore,
};

pub use filter::{
  FilterOptions, RankRange, ViewFilter, filter_competitions, filter_rankings,
  filter_venues,
};
pub use summary::{
  Count, DashboardSummary, display_order, ranked, top_ranked,
};

// ─── Tables ──────────────────────────────────────────────────────────────────

/// A snapshot of all six stored tables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tables {
  pub categories:   Vec<Category>,
  pub competitions: Vec<Competition>,
  pub competitors:  Vec<Competitor>,
  pub rankings:     Vec<Ranking>,
  pub complexes:    Vec<Complex>,
  pub venues:       Vec<Venue>,
}

impl Tables {
  /// Read every table from `store`.
  pub async fn load<S: TennisStore>(store: &S) -> Result<Self, S::Error> {
    Ok(Self {
      categories:   store.read_all().await?,
      competitions: store.read_all().await?,
      competitors:  store.read_all().await?,
      rankings:     store.read_all().await?,
      complexes:    store.read_all().await?,
      venues:       store.read_all().await?,
    })
  }

  pub fn competition_category(&self) -> Vec<CompetitionCategoryRow> {
    join_competition_category(&self.competitions, &self.categories)
  }

  pub fn ranking_view(&self) -> Vec<RankingRow> {
    join_ranking_view(&self.competitors, &self.rankings)
  }

  pub fn venue_complex(&self) -> Vec<VenueComplexRow> {
    join_venue_complex(&self.venues, &self.complexes)
  }
}

// ─── Joined rows ─────────────────────────────────────────────────────────────

/// A competition with its category's columns, if the category resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitionCategoryRow {
  pub competition_id:   String,
  pub competition_name: String,
  pub parent_id:        Option<String>,
  #[serde(rename = "type")]
  pub kind:             Option<String>,
  pub gender:           Option<String>,
  pub level:            Option<String>,
  pub category_id:      Option<String>,
  pub category_name:    Option<String>,
  pub category_gender:  Option<String>,
}

/// A competitor paired with one of its rankings, or with none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingRow {
  pub competitor_id:       String,
  pub name:                Option<String>,
  pub country:             Option<String>,
  pub country_code:        Option<String>,
  pub abbreviation:        Option<String>,
  pub ranking_id:          Option<String>,
  pub ranking_name:        Option<String>,
  pub rank:                Option<u32>,
  pub movement:            Option<i32>,
  pub points:              Option<f64>,
  pub competitions_played: Option<u32>,
}

/// A venue with its complex's name, if the complex resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueComplexRow {
  pub venue_id:     String,
  pub venue_name:   String,
  pub city_name:    Option<String>,
  pub country_name: Option<String>,
  pub country_code: Option<String>,
  pub timezone:     Option<String>,
  pub complex_id:   String,
  pub complex_name: Option<String>,
}

// ─── Joins ───────────────────────────────────────────────────────────────────

/// `competitions LEFT JOIN categories USING (category_id)`.
pub fn join_competition_category(
  competitions: &[Competition],
  categories: &[Category],
) -> Vec<CompetitionCategoryRow> {
  let by_id: HashMap<&str, &Category> = categories
    .iter()
    .map(|c| (c.category_id.as_str(), c))
    .collect();

  competitions
    .iter()
    .map(|comp| {
      let category = comp
        .category_id
        .as_deref()
        .and_then(|id| by_id.get(id).copied());
      CompetitionCategoryRow {
        competition_id:   comp.competition_id.clone(),
        competition_name: comp.competition_name.clone(),
        parent_id:        comp.parent_id.clone(),
        kind:             comp.kind.clone(),
        gender:           comp.gender.clone(),
        level:            comp.level.clone(),
        category_id:      comp.category_id.clone(),
        category_name:    category.map(|c| c.category_name.clone()),
        category_gender:  category.and_then(|c| c.gender.clone()),
      }
    })
    .collect()
}

/// `competitors LEFT JOIN rankings USING (competitor_id)`.
///
/// A competitor listed in several rankings yields one row per ranking, in
/// ranking-table order. Rankings whose competitor is unknown do not appear.
pub fn join_ranking_view(
  competitors: &[Competitor],
  rankings: &[Ranking],
) -> Vec<RankingRow> {
  let mut by_competitor: HashMap<&str, Vec<&Ranking>> = HashMap::new();
  for ranking in rankings {
    by_competitor
      .entry(ranking.competitor_id.as_str())
      .or_default()
      .push(ranking);
  }

  let mut rows = Vec::with_capacity(competitors.len().max(rankings.len()));
  for comp in competitors {
    let base = RankingRow {
      competitor_id:       comp.competitor_id.clone(),
      name:                comp.name.clone(),
      country:             comp.country.clone(),
      country_code:        comp.country_code.clone(),
      abbreviation:        comp.abbreviation.clone(),
      ranking_id:          None,
      ranking_name:        None,
      rank:                None,
      movement:            None,
      points:              None,
      competitions_played: None,
    };

    match by_competitor.get(comp.competitor_id.as_str()) {
      None => rows.push(base),
      Some(matches) => {
        for r in matches {
          rows.push(RankingRow {
            ranking_id: Some(r.ranking_id.clone()),
            ranking_name: r.ranking_name.clone(),
            rank: r.rank,
            movement: r.movement,
            points: r.points,
            competitions_played: r.competitions_played,
            ..base.clone()
          });
        }
      }
    }
  }
  rows
}

/// `venues LEFT JOIN complexes USING (complex_id)`.
pub fn join_venue_complex(
  venues: &[Venue],
  complexes: &[Complex],
) -> Vec<VenueComplexRow> {
  let by_id: HashMap<&str, &Complex> = complexes
    .iter()
    .map(|c| (c.complex_id.as_str(), c))
    .collect();

  venues
    .iter()
    .map(|v| VenueComplexRow {
      venue_id:     v.venue_id.clone(),
      venue_name:   v.venue_name.clone(),
      city_name:    v.city_name.clone(),
      country_name: v.country_name.clone(),
      country_code: v.country_code.clone(),
      timezone:     v.timezone.clone(),
      complex_id:   v.complex_id.clone(),
      complex_name: by_id
        .get(v.complex_id.as_str())
        .map(|c| c.complex_name.clone()),
    })
    .collect()
}

#[cfg(test)]
pub(crate) mod fixtures {
  use crate::record::{Competitor, Ranking};

  pub fn competitor(id: &str, name: Option<&str>, country: Option<&str>) -> Competitor {
    Competitor {
      competitor_id: id.into(),
      name:          name.map(Into::into),
      country:       country.map(Into::into),
      country_code:  None,
      abbreviation:  None,
    }
  }

  pub fn ranking(competitor_id: &str, rank: Option<u32>, points: Option<f64>) -> Ranking {
    Ranking {
      ranking_id:          "atp".into(),
      ranking_name:        Some("ATP".into()),
      competitor_id:       competitor_id.into(),
      rank,
      movement:            None,
      points,
      competitions_played: None,
    }
  }
}
