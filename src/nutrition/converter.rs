//! Unit conversion functions
//!
//! Converts quantities between units of the same dimension and turns display
//! amounts into serving multipliers.

use serde::{Deserialize, Serialize};

use super::units::{normalize, Dimension, Unit, STANDARD_VOLUME_UNITS, STANDARD_WEIGHT_UNITS};

/// Number of base servings of a food; always dimensionless
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Servings(f64);

impl Servings {
    /// A servings multiplier, rejecting non-finite and non-positive values
    pub fn new(value: f64) -> Option<Self> {
        (value.is_finite() && value > 0.0).then_some(Self(value))
    }

    pub fn one() -> Self {
        Self(1.0)
    }

    pub fn get(&self) -> f64 {
        self.0
    }
}

/// A user-facing quantity in some unit, as shown in a stepper or picker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Amount {
    pub value: f64,
    pub unit: String,
}

impl Amount {
    pub fn new(value: f64, unit: impl Into<String>) -> Self {
        Self { value, unit: unit.into() }
    }
}

/// Convert a value between two units of the same dimension
///
/// Returns `None` when the units sit in different dimensions or either one is
/// unrecognized. Identical units (after normalization) return the value as is.
pub fn convert(value: f64, from_unit: &str, to_unit: &str) -> Option<f64> {
    let from = normalize(from_unit);
    let to = normalize(to_unit);

    if from == to {
        return Some(value);
    }

    let (from, to) = (Unit::parse(&from)?, Unit::parse(&to)?);
    if from.dimension() != to.dimension() {
        return None;
    }

    Some(value * from.base_factor() / to.base_factor())
}

/// Convert a quantity into its dimension's base unit (grams or milliliters)
pub fn to_base_amount(value: f64, unit: &str) -> Option<(f64, Dimension)> {
    let unit = Unit::parse(unit)?;
    Some((value * unit.base_factor(), unit.dimension()))
}

/// Units a quantity in `unit` can be displayed in
///
/// Recognized units get the user-facing list for their dimension; anything else
/// only converts to itself.
pub fn compatible_units(unit: &str) -> Vec<String> {
    let list: &[&str] = match Unit::parse(unit).map(|u| u.dimension()) {
        Some(Dimension::Weight) => &STANDARD_WEIGHT_UNITS,
        Some(Dimension::Volume) => &STANDARD_VOLUME_UNITS,
        None => return vec![unit.to_string()],
    };
    list.iter().map(|u| u.to_string()).collect()
}

/// Render a conversion ratio as an "A:B" string for display
///
/// Examples: `1.0` -> "1:1", `0.005` -> "1:200", `0.5` -> "0.50:1", `28.3495` -> "28.35:1".
/// Non-finite or non-positive ratios render as an empty string.
pub fn format_conversion_factor(ratio: f64) -> String {
    if !ratio.is_finite() || ratio <= 0.0 {
        return String::new();
    }
    if ratio == 1.0 {
        return "1:1".to_string();
    }
    if ratio < 0.01 {
        return format!("1:{}", (1.0 / ratio).round());
    }
    if ratio < 1.0 {
        return format!("{:.2}:1", ratio);
    }
    format!("{}:1", (ratio * 100.0).round() / 100.0)
}

/// Work out how many servings an amount in some unit represents
///
/// 150 g of a food whose serving is 100 g is 1.5 servings. Returns `None` when
/// the amount can't be expressed in the serving unit, so callers never log a
/// guessed quantity.
pub fn servings_for_amount(
    amount: f64,
    unit: &str,
    serving_size: f64,
    serving_unit: &str,
) -> Option<Servings> {
    if !(serving_size > 0.0) {
        return None;
    }

    match convert(amount, unit, serving_unit) {
        Some(in_serving_unit) => Servings::new(in_serving_unit / serving_size),
        None => {
            tracing::warn!(
                "No conversion from '{}' to serving unit '{}'; amount {} not logged",
                unit,
                serving_unit,
                amount
            );
            None
        }
    }
}
