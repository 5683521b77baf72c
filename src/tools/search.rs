//! Food search MCP tools
//!
//! Turn provider payloads into validated, ranked candidates.

use serde::Serialize;

use crate::models::{FoodRecord, Nutrition};
use crate::nutrition::{confidence, validate, validate_record, Validation};
use crate::sources::{barcode, fdc, prepare_candidates};

/// A search candidate with its data-quality score
#[derive(Debug, Serialize)]
pub struct Candidate {
    #[serde(flatten)]
    pub food: FoodRecord,
    pub confidence: u8,
}

impl From<FoodRecord> for Candidate {
    fn from(food: FoodRecord) -> Self {
        let confidence = confidence(&food);
        Self { food, confidence }
    }
}

/// Response for search_foods
#[derive(Debug, Serialize)]
pub struct SearchFoodsResponse {
    pub query: String,
    pub results: Vec<Candidate>,
    pub total: usize,
    /// Records dropped as implausible
    pub filtered_out: usize,
}

/// Minimum query length worth searching for
const MIN_QUERY_LEN: usize = 2;

/// Normalize, validate and rank a FoodData Central search response
pub fn search_foods(payload: &str, query: &str, limit: usize) -> Result<SearchFoodsResponse, String> {
    let query = query.trim();
    if query.chars().count() < MIN_QUERY_LEN {
        return Ok(SearchFoodsResponse {
            query: query.to_string(),
            results: Vec::new(),
            total: 0,
            filtered_out: 0,
        });
    }

    let records = fdc::parse_search_response(payload)
        .map_err(|e| format!("Failed to read search results: {}", e))?;
    let received = records.len();

    let ranked = prepare_candidates(records, query);
    let filtered_out = received - ranked.len();

    let results: Vec<Candidate> = ranked
        .into_iter()
        .take(limit.max(1))
        .map(Candidate::from)
        .collect();
    let total = results.len();

    Ok(SearchFoodsResponse {
        query: query.to_string(),
        results,
        total,
        filtered_out,
    })
}

/// Response for lookup_barcode
#[derive(Debug, Serialize)]
pub struct LookupBarcodeResponse {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub validation: Validation,
}

/// Decode an Open Food Facts product payload for a scanned code
pub fn lookup_barcode(code: &str, payload: &str) -> Result<LookupBarcodeResponse, String> {
    if code.trim().is_empty() {
        return Err("barcode cannot be empty".to_string());
    }

    let food = barcode::parse_product(code, payload).map_err(|e| e.to_string())?;
    let validation = validate_record(&food);

    Ok(LookupBarcodeResponse {
        candidate: Candidate::from(food),
        validation,
    })
}

/// Check one set of per-serving values
pub fn validate_food(nutrition: &Nutrition) -> Validation {
    validate(nutrition)
}
