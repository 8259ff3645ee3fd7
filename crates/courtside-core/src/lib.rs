//! Core types and pipeline logic for Courtside.
//!
//! This crate has no HTTP or database dependencies. It owns the flat entity
//! records and the normalizer that produces them from raw API documents. It
//! also defines the store abstraction records are written through and the
//! views built back out of stored tables.

// Trait impls use native `async fn`; the `Send` bounds live on the trait
// signatures.
#![allow(async_fn_in_trait)]

pub mod aggregate;
pub mod cache;
pub mod document;
pub mod error;
pub mod hierarchy;
pub mod ingest;
pub mod record;
pub mod store;
pub mod view;

pub use error::{Error, Result};

#[cfg(test)]
mod test_support;
