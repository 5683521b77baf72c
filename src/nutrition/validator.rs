//! Nutrition plausibility checks
//!
//! Cross-checks reported calories against the Atwater estimate from protein,
//! carbohydrate and fat, and rejects records that no real food could have.
//! Validation only classifies; it never corrects a record.

use serde::Serialize;
use thiserror::Error;

use super::converter::to_base_amount;
use crate::models::{DataType, FoodRecord, Nutrition};

/// Pure fat tops out around 900 kcal per 100 g
pub const MAX_CALORIES_PER_100: f64 = 900.0;
/// 100 g of food can't hold more than 100 g of macros; 5 g slack for rounding
pub const MAX_MACROS_PER_100: f64 = 105.0;
/// Allowed deviation of reported calories from the Atwater estimate
pub const ATWATER_TOLERANCE: f64 = 0.30;
/// Below this estimate, excess calories alone are not flagged
pub const HIGH_CHECK_MIN_EXPECTED: f64 = 20.0;
/// Below this estimate, missing calories are not flagged
pub const LOW_CHECK_MIN_EXPECTED: f64 = 50.0;
/// Unexplained calories tolerated when macros are near zero
///
/// Alcohol energy is not part of the Atwater sum, so spirits (about 230 kcal
/// per 100 g with no macros) exceed this and are rejected. Beer and wine stay
/// under it.
pub const SMALL_MACRO_SLACK: f64 = 100.0;

/// Expected calories from macros: protein and carbs 4 kcal/g, fat 9 kcal/g
pub fn expected_calories(protein: f64, carbs: f64, fat: f64) -> f64 {
    protein * 4.0 + carbs * 4.0 + fat * 9.0
}

/// Why a record was rejected; the message is for diagnostics only
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Implausibility {
    #[error("{field} must be a non-negative number")]
    NegativeValue { field: &'static str },

    #[error("Calories too high ({calories}): exceeds maximum possible (~{limit} for pure fat)")]
    CaloriesTooHigh { calories: f64, limit: f64 },

    #[error("Macro totals exceed {limit}g ({total:.1}g)")]
    MacrosTooHigh { total: f64, limit: f64 },

    #[error("Calories ({calories}) significantly higher than expected from macros ({expected:.0})")]
    CaloriesAboveMacros { calories: f64, expected: f64 },

    #[error("Calories ({calories}) too low for macros (expected ~{expected:.0})")]
    CaloriesBelowMacros { calories: f64, expected: f64 },
}

/// Outcome of validating one record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Validation {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<Result<(), Implausibility>> for Validation {
    fn from(result: Result<(), Implausibility>) -> Self {
        match result {
            Ok(()) => Validation { valid: true, reason: None },
            Err(e) => Validation { valid: false, reason: Some(e.to_string()) },
        }
    }
}

/// How many "100 g" units the serving spans, for the absolute ceilings
///
/// Servings up to 100 g (or ml) use the plain per-100 ceilings; larger servings
/// raise them proportionally. Servings in units without a mass or volume keep
/// the plain ceilings.
pub fn basis_scale(serving_size: f64, serving_unit: &str) -> f64 {
    match to_base_amount(serving_size, serving_unit) {
        Some((amount, _)) if amount > 100.0 => amount / 100.0,
        _ => 1.0,
    }
}

/// Run the plausibility checks against ceilings scaled by `scale`
pub fn check(nutrition: &Nutrition, scale: f64) -> Result<(), Implausibility> {
    if let Some(field) = nutrition.invalid_field() {
        return Err(Implausibility::NegativeValue { field });
    }

    // Nothing reported, nothing to contradict
    if nutrition.is_empty() {
        return Ok(());
    }

    let Nutrition { calories, protein, carbs, fat, .. } = *nutrition;

    let calorie_limit = MAX_CALORIES_PER_100 * scale;
    if calories > calorie_limit {
        return Err(Implausibility::CaloriesTooHigh { calories, limit: calorie_limit });
    }

    let total = protein + carbs + fat;
    let macro_limit = MAX_MACROS_PER_100 * scale;
    if total > macro_limit {
        return Err(Implausibility::MacrosTooHigh { total, limit: macro_limit });
    }

    let expected = expected_calories(protein, carbs, fat);
    let upper = expected * (1.0 + ATWATER_TOLERANCE);
    if calories > upper
        && (expected > HIGH_CHECK_MIN_EXPECTED || calories - upper > SMALL_MACRO_SLACK)
    {
        return Err(Implausibility::CaloriesAboveMacros { calories, expected });
    }

    if expected > LOW_CHECK_MIN_EXPECTED && calories < expected * ATWATER_TOLERANCE {
        return Err(Implausibility::CaloriesBelowMacros { calories, expected });
    }

    Ok(())
}

/// Validate nutrition reported on a 100 g / 100 ml basis
pub fn validate(nutrition: &Nutrition) -> Validation {
    check(nutrition, 1.0).into()
}

/// Validate a record using its own serving as the basis
pub fn validate_record(record: &FoodRecord) -> Validation {
    check_record(record).into()
}

fn check_record(record: &FoodRecord) -> Result<(), Implausibility> {
    check(
        &record.nutrition,
        basis_scale(record.serving_size, &record.serving_unit),
    )
}

/// Keep only plausible records, in their original order
pub fn filter_valid(records: Vec<FoodRecord>) -> Vec<FoodRecord> {
    records
        .into_iter()
        .filter(|record| match check_record(record) {
            Ok(()) => true,
            Err(reason) => {
                tracing::debug!("Filtered out \"{}\": {}", record.name, reason);
                false
            }
        })
        .collect()
}

/// Confidence in a record's nutrition data, 0 to 100
///
/// Implausible records score 0. Otherwise the score drops with distance from
/// the Atwater estimate (at most 30 points) and shifts by data source.
pub fn confidence(record: &FoodRecord) -> u8 {
    if check_record(record).is_err() {
        return 0;
    }

    let n = &record.nutrition;
    let mut score = 100.0;

    let expected = expected_calories(n.protein, n.carbs, n.fat);
    if expected > 0.0 {
        let percent_diff = (n.calories - expected).abs() / expected;
        score -= (percent_diff * 100.0).min(30.0);
    }

    score += match record.data_type {
        DataType::Foundation | DataType::SrLegacy => 10.0,
        DataType::Survey => 5.0,
        DataType::Branded => -5.0,
        _ => 0.0,
    };

    score.clamp(0.0, 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SourceId;

    fn record(name: &str, nutrition: Nutrition, size: f64, unit: &str) -> FoodRecord {
        FoodRecord {
            source_id: SourceId::from(name.to_string()),
            name: name.to_string(),
            brand_name: None,
            nutrition,
            serving_size: size,
            serving_unit: unit.to_string(),
            data_type: DataType::Branded,
        }
    }

    fn macros(calories: f64, protein: f64, carbs: f64, fat: f64) -> Nutrition {
        Nutrition::new(calories, protein, carbs, fat, 0.0)
    }

    #[test]
    fn test_expected_calories() {
        assert!((expected_calories(10.0, 20.0, 5.0) - 165.0).abs() < 1e-9);
    }

    #[test]
    fn test_apple_is_valid() {
        let v = validate(&macros(52.0, 0.3, 14.0, 0.2));
        assert!(v.valid);
        assert_eq!(v.reason, None);
    }

    #[test]
    fn test_calories_without_macros_is_invalid() {
        let v = validate(&macros(900.0, 1.0, 1.0, 1.0));
        assert!(!v.valid);
        let reason = v.reason.unwrap();
        assert!(reason.contains("higher than expected from macros"), "{}", reason);
        assert!(reason.contains("(17)"), "{}", reason);
    }

    #[test]
    fn test_all_zero_is_valid() {
        assert!(validate(&Nutrition::zero()).valid);
    }

    #[test]
    fn test_small_unexplained_calories_tolerated() {
        // Light beer: most energy comes from alcohol, which the formula ignores
        assert!(validate(&macros(43.0, 0.5, 3.6, 0.0)).valid);
        // Black coffee
        assert!(validate(&macros(2.0, 0.3, 0.0, 0.0)).valid);
    }

    #[test]
    fn test_spirits_exceed_slack() {
        // 40% vodka: all energy from alcohol, none from macros
        let v = validate(&macros(231.0, 0.0, 0.0, 0.0));
        assert!(!v.valid);
        assert!(v.reason.unwrap().contains("higher than expected from macros"));
    }

    #[test]
    fn test_negative_values_are_invalid() {
        let err = check(&macros(-500.0, -10.0, 0.0, 0.0), 1.0).unwrap_err();
        assert_eq!(err, Implausibility::NegativeValue { field: "calories" });
        assert!(!validate(&Nutrition::new(40.0, 1.0, 8.0, 0.0, -2.0)).valid);

        let records = vec![
            record("negative", macros(-500.0, -10.0, 0.0, 0.0), 100.0, "g"),
            record("apple", macros(52.0, 0.3, 14.0, 0.2), 100.0, "g"),
        ];
        let kept = filter_valid(records);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].name, "apple");
    }

    #[test]
    fn test_calorie_ceiling() {
        let err = check(&macros(950.0, 0.0, 0.0, 100.0), 1.0).unwrap_err();
        assert!(matches!(err, Implausibility::CaloriesTooHigh { .. }));
    }

    #[test]
    fn test_macro_ceiling() {
        let err = check(&macros(400.0, 40.0, 40.0, 30.0), 1.0).unwrap_err();
        assert_eq!(err.to_string(), "Macro totals exceed 105g (110.0g)");
    }

    #[test]
    fn test_calories_too_low() {
        let err = check(&macros(10.0, 20.0, 20.0, 0.0), 1.0).unwrap_err();
        assert!(matches!(err, Implausibility::CaloriesBelowMacros { .. }));
    }

    #[test]
    fn test_ceilings_scale_with_large_servings() {
        // 200 g serving of something fatty: fine per 100 g, too much for a flat cap
        let big = record("Pork belly", macros(1040.0, 18.0, 0.0, 106.0), 200.0, "g");
        assert!(validate_record(&big).valid);

        let flat = record("Pork belly", macros(1040.0, 18.0, 0.0, 106.0), 100.0, "g");
        assert!(!validate_record(&flat).valid);
    }

    #[test]
    fn test_small_servings_keep_plain_ceiling() {
        assert_eq!(basis_scale(30.0, "g"), 1.0);
        assert_eq!(basis_scale(2.0, "slice"), 1.0);
        assert!((basis_scale(2.0, "cup") - 4.8).abs() < 1e-9);
    }

    #[test]
    fn test_filter_valid_preserves_order() {
        let records = vec![
            record("a", macros(52.0, 0.3, 14.0, 0.2), 100.0, "g"),
            record("bad", macros(900.0, 1.0, 1.0, 1.0), 100.0, "g"),
            record("b", Nutrition::zero(), 100.0, "g"),
            record("c", macros(165.0, 31.0, 0.0, 3.6), 100.0, "g"),
        ];
        let kept = filter_valid(records);
        let names: Vec<&str> = kept.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert!(kept.iter().all(|r| validate_record(r).valid));
    }

    #[test]
    fn test_confidence() {
        let mut chicken = record("Chicken", macros(165.0, 31.0, 0.0, 3.6), 100.0, "g");
        chicken.data_type = DataType::SrLegacy;
        // expected 156.4, diff 5.5% -> 100 - 5.5 + 10, capped
        assert_eq!(confidence(&chicken), 100);

        chicken.data_type = DataType::Branded;
        assert_eq!(confidence(&chicken), 90);

        let bad = record("bad", macros(900.0, 1.0, 1.0, 1.0), 100.0, "g");
        assert_eq!(confidence(&bad), 0);
    }
}
