//! JSON REST API over the Courtside views.
//!
//! Exposes an axum [`Router`] backed by any [`TennisStore`]. Every endpoint
//! is a read; writes happen only through ingestion.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", courtside_api::api_router(store.clone()))
//! ```

pub mod competitions;
pub mod error;
pub mod overview;
pub mod params;
pub mod rankings;
pub mod venues;

use std::sync::Arc;

use axum::{Router, routing::get};
use courtside_core::store::TennisStore;
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: TennisStore + 'static,
{
  Router::new()
    // Competitions
    .route("/competitions", get(competitions::list::<S>))
    .route("/competitions/per-category", get(competitions::per_category::<S>))
    .route("/competitions/{id}/children", get(competitions::children::<S>))
    // Rankings
    .route("/rankings", get(rankings::list::<S>))
    .route("/rankings/top", get(rankings::top::<S>))
    .route("/rankings/movement", get(rankings::movement::<S>))
    // Venues
    .route("/venues", get(venues::list::<S>))
    // Overview
    .route("/filters", get(overview::filters::<S>))
    .route("/dashboard", get(overview::dashboard::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(store)
}
