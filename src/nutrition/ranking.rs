//! Search relevance ranking
//!
//! Orders candidate foods for a query with a fixed additive score. The weights
//! are empirical; keep them as they are.

use regex::Regex;

use crate::models::{DataType, FoodRecord};

const PREFIX_MATCH: f64 = 100.0;
const CONTAINS_MATCH: f64 = 50.0;
const ALL_TERMS_PRESENT: f64 = 40.0;
const WORD_BOUNDARY_TERM: f64 = 15.0;
const LENGTH_BONUS_MAX: f64 = 30.0;
const LENGTH_BONUS_PER_CHAR: f64 = 0.3;
const DESCRIPTOR_PENALTY: f64 = 3.0;
const BRANDED_BONUS: f64 = 5.0;
const BRAND_MATCH_BONUS: f64 = 20.0;
const GENERIC_BONUS: f64 = 8.0;

/// Preparation descriptors that make a name more specific than the search
pub const PREPARATION_DESCRIPTORS: [&str; 13] = [
    "raw", "cooked", "roasted", "fried", "baked", "grilled", "steamed", "boiled", "skin",
    "bone", "without", "with", "added",
];

/// A tokenized query with its word-boundary patterns compiled once
#[derive(Debug, Clone)]
pub struct QueryTerms {
    terms: Vec<String>,
    boundary_patterns: Vec<Regex>,
}

impl QueryTerms {
    /// Lower-cased whitespace tokens of `query`
    pub fn parse(query: &str) -> Self {
        let terms: Vec<String> = query
            .to_lowercase()
            .split_whitespace()
            .map(str::to_string)
            .collect();

        let boundary_patterns = terms
            .iter()
            .filter_map(|term| match Regex::new(&format!(r"\b{}", regex::escape(term))) {
                Ok(re) => Some(re),
                Err(e) => {
                    tracing::warn!("No word-boundary scoring for \"{}\": {}", term, e);
                    None
                }
            })
            .collect();

        Self { terms, boundary_patterns }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Relevance of one record for a parsed query
pub fn relevance_score(record: &FoodRecord, query: &QueryTerms) -> f64 {
    let name = record.name.to_lowercase();
    let terms = query.terms();
    let mut score = 0.0;

    let full_query = terms.join(" ");
    if name.starts_with(&full_query) {
        score += PREFIX_MATCH;
    } else if name.contains(&full_query) {
        score += CONTAINS_MATCH;
    }

    if terms.iter().all(|term| name.contains(term.as_str())) {
        score += ALL_TERMS_PRESENT;
    }

    for pattern in &query.boundary_patterns {
        if pattern.is_match(&name) {
            score += WORD_BOUNDARY_TERM;
        }
    }

    // Shorter names are usually the generic food
    let length = name.chars().count() as f64;
    score += (LENGTH_BONUS_MAX - length * LENGTH_BONUS_PER_CHAR).max(0.0);

    for descriptor in PREPARATION_DESCRIPTORS {
        if name.contains(descriptor) {
            score -= DESCRIPTOR_PENALTY;
        }
    }

    if record.data_type == DataType::Branded {
        if let Some(brand) = record.brand() {
            score += BRANDED_BONUS;
            let brand = brand.to_lowercase();
            if terms.iter().any(|term| brand.contains(term.as_str())) {
                score += BRAND_MATCH_BONUS;
            }
        }
    }

    if record.data_type.is_generic_reference() {
        score += GENERIC_BONUS;
    }

    score
}

/// Sort records by descending relevance to `query`
///
/// An empty list or blank query returns the input untouched. Equal scores keep
/// their incoming order.
pub fn rank(records: Vec<FoodRecord>, query: &str) -> Vec<FoodRecord> {
    let query = QueryTerms::parse(query);
    if records.is_empty() || query.is_empty() {
        return records;
    }

    let mut scored: Vec<(f64, FoodRecord)> = records
        .into_iter()
        .map(|record| (relevance_score(&record, &query), record))
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored.into_iter().map(|(_, record)| record).collect()
}
