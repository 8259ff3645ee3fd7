//! Whole-store endpoints: `/filters` and `/dashboard`.

use std::sync::Arc;

use axum::{Json, extract::State};
use courtside_core::{
  store::TennisStore,
  view::{DashboardSummary, FilterOptions, Tables},
};

use crate::error::ApiError;

/// `GET /filters`: the values each filter parameter can take.
pub async fn filters<S: TennisStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<FilterOptions>, ApiError> {
  let tables = Tables::load(store.as_ref()).await.map_err(ApiError::store)?;
  Ok(Json(FilterOptions::collect(
    &tables.competition_category(),
    &tables.ranking_view(),
    &tables.venue_complex(),
  )))
}

/// `GET /dashboard`
pub async fn dashboard<S: TennisStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<DashboardSummary>, ApiError> {
  let tables = Tables::load(store.as_ref()).await.map_err(ApiError::store)?;
  Ok(Json(DashboardSummary::build(&tables)))
}
