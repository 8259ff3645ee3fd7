//! Handlers for `/competitions` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/competitions` | Optional `?category=` and `?gender=` |
//! | `GET`  | `/competitions/per-category` | Same filters, counted by category name |
//! | `GET`  | `/competitions/{id}/children` | 404 if the competition is unknown |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use courtside_core::{
  aggregate::count_by,
  hierarchy::CompetitionTree,
  record::{Category, Competition},
  store::TennisStore,
  view::{CompetitionCategoryRow, Count, filter_competitions, join_competition_category},
};

use crate::{error::ApiError, params::CompetitionParams};

async fn filtered<S: TennisStore>(
  store: &S,
  params: &CompetitionParams,
) -> Result<Vec<CompetitionCategoryRow>, ApiError> {
  let competitions: Vec<Competition> =
    store.read_all().await.map_err(ApiError::store)?;
  let categories: Vec<Category> = store.read_all().await.map_err(ApiError::store)?;
  let rows = join_competition_category(&competitions, &categories);
  Ok(filter_competitions(&rows, &params.filter()))
}

// ─── List ────────────────────────────────────────────────────────────────────

/// `GET /competitions[?category=<names>][&gender=<genders>]`
pub async fn list<S: TennisStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<CompetitionParams>,
) -> Result<Json<Vec<CompetitionCategoryRow>>, ApiError> {
  Ok(Json(filtered(store.as_ref(), &params).await?))
}

// ─── Per category ────────────────────────────────────────────────────────────

/// `GET /competitions/per-category`. Competitions without a resolved
/// category are not counted.
pub async fn per_category<S: TennisStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<CompetitionParams>,
) -> Result<Json<Vec<Count<String>>>, ApiError> {
  let rows = filtered(store.as_ref(), &params).await?;
  let counts = count_by(&rows, |r| r.category_name.clone())
    .into_iter()
    .map(Count::from)
    .collect();
  Ok(Json(counts))
}

// ─── Children ────────────────────────────────────────────────────────────────

/// `GET /competitions/{id}/children`
pub async fn children<S: TennisStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<Json<Vec<Competition>>, ApiError> {
  let competitions: Vec<Competition> =
    store.read_all().await.map_err(ApiError::store)?;
  let tree = CompetitionTree::build(&competitions)?;
  let children = tree
    .children(&id)
    .ok_or_else(|| ApiError::NotFound(format!("competition {id} not found")))?;
  Ok(Json(children.into_iter().cloned().collect()))
}
