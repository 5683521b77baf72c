//! Unit vocabulary and normalization
//!
//! Maps the unit spellings and codes used by food data sources onto a closed set of
//! canonical tokens, partitioned into weight and volume dimensions.

use serde::{Deserialize, Serialize};

/// Physical dimension of a canonical unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    /// Mass units, base gram
    Weight,
    /// Volume units, base milliliter
    Volume,
}

impl Dimension {
    /// The base unit every conversion in this dimension goes through
    pub fn base_unit(&self) -> Unit {
        match self {
            Dimension::Weight => Unit::Gram,
            Dimension::Volume => Unit::Milliliter,
        }
    }
}

/// A canonical unit token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    Gram,
    Ounce,
    Pound,
    Kilogram,
    Milligram,
    Milliliter,
    Cup,
    Tablespoon,
    Teaspoon,
    FluidOunce,
    Liter,
    Pint,
    Quart,
    Gallon,
}

// ============================================================================
// Weight Conversion Constants (to grams)
// ============================================================================

pub const G_PER_MG: f64 = 0.001;
pub const G_PER_KG: f64 = 1000.0;
pub const G_PER_OZ: f64 = 28.3495;
pub const G_PER_LB: f64 = 453.592;

// ============================================================================
// Volume Conversion Constants (to milliliters)
// ============================================================================

/// Nutrition-label cup, not the 236.588 ml US customary cup
pub const ML_PER_CUP: f64 = 240.0;
pub const ML_PER_TBSP: f64 = 15.0;
pub const ML_PER_TSP: f64 = 5.0;
pub const ML_PER_FL_OZ: f64 = 29.5735;
pub const ML_PER_LITER: f64 = 1000.0;
pub const ML_PER_PINT: f64 = 473.176;
pub const ML_PER_QUART: f64 = 946.353;
pub const ML_PER_GALLON: f64 = 3785.41;

/// Unit substituted when a source omits the serving unit
pub const DEFAULT_UNIT: &str = "g";

/// Weight units offered in unit pickers
pub const STANDARD_WEIGHT_UNITS: [&str; 4] = ["g", "oz", "lb", "kg"];
/// Volume units offered in unit pickers
pub const STANDARD_VOLUME_UNITS: [&str; 6] = ["ml", "cup", "tbsp", "tsp", "fl oz", "l"];

impl Unit {
    /// Look up a raw spelling in the alias table
    ///
    /// Accepts full words, plurals, abbreviations and the FoodData Central unit
    /// codes (`GRM`, `MLT`), case-insensitively.
    pub fn parse(raw: &str) -> Option<Self> {
        let lower = raw.to_lowercase();
        let unit = match lower.trim() {
            "grm" | "gram" | "grams" | "g" => Unit::Gram,
            "ounce" | "ounces" | "oz" => Unit::Ounce,
            "pound" | "pounds" | "lbs" | "lb" => Unit::Pound,
            "kilogram" | "kilograms" | "kg" => Unit::Kilogram,
            "milligram" | "milligrams" | "mg" => Unit::Milligram,

            "mlt" | "milliliter" | "milliliters" | "ml" => Unit::Milliliter,
            "cup" | "cups" | "c" => Unit::Cup,
            "tablespoon" | "tablespoons" | "tbsp" | "tbs" | "tb" => Unit::Tablespoon,
            "teaspoon" | "teaspoons" | "tsp" | "ts" => Unit::Teaspoon,
            "fluid ounce" | "fluid ounces" | "fl oz" | "floz" | "fl. oz" | "fl. oz." => {
                Unit::FluidOunce
            }
            "liter" | "liters" | "litre" | "litres" | "l" => Unit::Liter,
            "pint" | "pints" | "pt" => Unit::Pint,
            "quart" | "quarts" | "qt" => Unit::Quart,
            "gallon" | "gallons" | "gal" => Unit::Gallon,
            _ => return None,
        };
        Some(unit)
    }

    /// Canonical token
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Gram => "g",
            Unit::Ounce => "oz",
            Unit::Pound => "lb",
            Unit::Kilogram => "kg",
            Unit::Milligram => "mg",
            Unit::Milliliter => "ml",
            Unit::Cup => "cup",
            Unit::Tablespoon => "tbsp",
            Unit::Teaspoon => "tsp",
            Unit::FluidOunce => "fl oz",
            Unit::Liter => "l",
            Unit::Pint => "pint",
            Unit::Quart => "quart",
            Unit::Gallon => "gallon",
        }
    }

    /// User-facing label, which differs from the token for liters and gallons
    pub fn display_name(&self) -> &'static str {
        match self {
            Unit::Liter => "L",
            Unit::Gallon => "gal",
            other => other.as_str(),
        }
    }

    pub fn dimension(&self) -> Dimension {
        match self {
            Unit::Gram | Unit::Ounce | Unit::Pound | Unit::Kilogram | Unit::Milligram => {
                Dimension::Weight
            }
            _ => Dimension::Volume,
        }
    }

    /// How many grams (weight) or milliliters (volume) one of this unit holds
    pub fn base_factor(&self) -> f64 {
        match self {
            Unit::Gram => 1.0,
            Unit::Ounce => G_PER_OZ,
            Unit::Pound => G_PER_LB,
            Unit::Kilogram => G_PER_KG,
            Unit::Milligram => G_PER_MG,
            Unit::Milliliter => 1.0,
            Unit::Cup => ML_PER_CUP,
            Unit::Tablespoon => ML_PER_TBSP,
            Unit::Teaspoon => ML_PER_TSP,
            Unit::FluidOunce => ML_PER_FL_OZ,
            Unit::Liter => ML_PER_LITER,
            Unit::Pint => ML_PER_PINT,
            Unit::Quart => ML_PER_QUART,
            Unit::Gallon => ML_PER_GALLON,
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Normalization
// ============================================================================

/// Normalize a raw unit string to its canonical token
///
/// Unrecognized spellings come back lower-cased and trimmed; they belong to no
/// dimension, so they have no conversions besides themselves.
pub fn normalize(raw: &str) -> String {
    match Unit::parse(raw) {
        Some(unit) => unit.as_str().to_string(),
        None => raw.trim().to_lowercase(),
    }
}

/// Normalize a possibly absent unit, substituting grams for missing or blank input
pub fn normalize_or_default(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(s) if !s.is_empty() => normalize(s),
        _ => DEFAULT_UNIT.to_string(),
    }
}

/// Dimension of a unit string, if it is recognized
pub fn categorize_unit(unit: &str) -> Option<Dimension> {
    Unit::parse(unit).map(|u| u.dimension())
}

pub fn is_weight_unit(unit: &str) -> bool {
    categorize_unit(unit) == Some(Dimension::Weight)
}

pub fn is_volume_unit(unit: &str) -> bool {
    categorize_unit(unit) == Some(Dimension::Volume)
}

/// Conversion factor to grams for a weight unit
pub fn grams_per_unit(unit: &str) -> Option<f64> {
    Unit::parse(unit)
        .filter(|u| u.dimension() == Dimension::Weight)
        .map(|u| u.base_factor())
}

/// Conversion factor to milliliters for a volume unit
pub fn ml_per_unit(unit: &str) -> Option<f64> {
    Unit::parse(unit)
        .filter(|u| u.dimension() == Dimension::Volume)
        .map(|u| u.base_factor())
}

/// Display label for a unit string; unknown units are shown as given
pub fn display_name(unit: &str) -> String {
    match Unit::parse(unit) {
        Some(u) => u.display_name().to_string(),
        None => unit.to_string(),
    }
}
