//! Handler for `GET /venues`.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use courtside_core::{
  record::{Complex, Venue},
  store::TennisStore,
  view::{VenueComplexRow, filter_venues, join_venue_complex},
};

use crate::{error::ApiError, params::VenueParams};

/// `GET /venues[?country=<countries>]`
pub async fn list<S: TennisStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<VenueParams>,
) -> Result<Json<Vec<VenueComplexRow>>, ApiError> {
  let venues: Vec<Venue> = store.read_all().await.map_err(ApiError::store)?;
  let complexes: Vec<Complex> = store.read_all().await.map_err(ApiError::store)?;
  let rows = join_venue_complex(&venues, &complexes);
  Ok(Json(filter_venues(&rows, &params.filter())))
}
