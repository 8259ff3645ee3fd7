//! Handlers for `/rankings` endpoints.
//!
//! All three endpoints work on ranked rows only; competitors without a rank
//! are left out.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use courtside_core::{
  aggregate::{Movement, movement_breakdown},
  record::{Competitor, Ranking},
  store::TennisStore,
  view::{
    Count, RankingRow, display_order, filter_rankings, join_ranking_view, ranked,
    top_ranked,
  },
};
use serde::Deserialize;

use crate::{error::ApiError, params::RankingParams};

/// Default size of `/rankings/top`.
pub const DEFAULT_TOP: usize = 10;

async fn ranking_rows<S: TennisStore>(store: &S) -> Result<Vec<RankingRow>, ApiError> {
  let competitors: Vec<Competitor> =
    store.read_all().await.map_err(ApiError::store)?;
  let rankings: Vec<Ranking> = store.read_all().await.map_err(ApiError::store)?;
  Ok(join_ranking_view(&competitors, &rankings))
}

async fn filtered<S: TennisStore>(
  store: &S,
  params: &RankingParams,
) -> Result<Vec<RankingRow>, ApiError> {
  let filter = params.filter()?;
  let rows = ranking_rows(store).await?;
  Ok(ranked(&filter_rankings(&rows, &filter)))
}

/// `GET /rankings[?min_rank=][&max_rank=][&country=][&q=]` in display order.
pub async fn list<S: TennisStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<RankingParams>,
) -> Result<Json<Vec<RankingRow>>, ApiError> {
  let rows = filtered(store.as_ref(), &params).await?;
  Ok(Json(display_order(&rows)))
}

#[derive(Debug, Deserialize, Default)]
pub struct TopParams {
  pub n: Option<usize>,
}

/// `GET /rankings/top[?n=<count>]`
pub async fn top<S: TennisStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<TopParams>,
) -> Result<Json<Vec<RankingRow>>, ApiError> {
  let rows = ranking_rows(store.as_ref()).await?;
  Ok(Json(top_ranked(&rows, params.n.unwrap_or(DEFAULT_TOP))))
}

/// `GET /rankings/movement`. Accepts the same filters as `/rankings`.
pub async fn movement<S: TennisStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<RankingParams>,
) -> Result<Json<Vec<Count<Movement>>>, ApiError> {
  let rows = filtered(store.as_ref(), &params).await?;
  let breakdown = movement_breakdown(&rows, |r| r.movement)
    .into_iter()
    .map(Count::from)
    .collect();
  Ok(Json(breakdown))
}
