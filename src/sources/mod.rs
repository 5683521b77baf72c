//! Food data sources
//!
//! Decoders for provider payloads. Every source yields `FoodRecord`s with
//! nutrition per serving and a normalized serving unit; network access is left
//! to the caller.

pub mod barcode;
pub mod fdc;

use thiserror::Error;

use crate::models::FoodRecord;
use crate::nutrition::{filter_valid, rank};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Invalid payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Barcode {0} not found in database. Try manual search.")]
    ProductNotFound(String),

    #[error("Product {0} has no name")]
    MissingName(String),
}

pub type SourceResult<T> = Result<T, SourceError>;

/// Drop implausible records, then order the rest by relevance to `query`
pub fn prepare_candidates(records: Vec<FoodRecord>, query: &str) -> Vec<FoodRecord> {
    let total = records.len();
    let valid = filter_valid(records);
    tracing::debug!(total, kept = valid.len(), query, "Prepared search candidates");
    rank(valid, query)
}
