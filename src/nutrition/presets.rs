//! Portion presets
//!
//! Quick quantity shortcuts for a selected food and stepper increments per unit.

use serde::Serialize;

use super::units::{normalize, Dimension, Unit};
use crate::models::FoodRecord;

/// A one-tap portion choice
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortionPreset {
    pub label: String,
    pub amount: f64,
    pub unit: String,
}

impl PortionPreset {
    fn new(label: &str, amount: f64, unit: &str) -> Self {
        Self {
            label: label.to_string(),
            amount,
            unit: unit.to_string(),
        }
    }
}

const SERVING_MULTIPLES: [(&str, f64); 4] = [("½", 0.5), ("1", 1.0), ("1.5", 1.5), ("2", 2.0)];

/// Presets for a food, scaled off its own serving
///
/// Serving multiples are always offered in the native unit. Weight-based foods
/// also get 4 oz and 100g; volume-based foods get 1 cup and ½ cup.
pub fn portion_presets(food: &FoodRecord) -> Vec<PortionPreset> {
    presets_for_serving(food.serving_size, &food.serving_unit)
}

pub fn presets_for_serving(serving_size: f64, serving_unit: &str) -> Vec<PortionPreset> {
    let unit = normalize(serving_unit);

    let mut presets: Vec<PortionPreset> = SERVING_MULTIPLES
        .iter()
        .map(|(label, factor)| PortionPreset::new(label, serving_size * factor, &unit))
        .collect();

    match Unit::parse(&unit).map(|u| (u, u.dimension())) {
        Some((native, Dimension::Weight)) => {
            if native != Unit::Ounce {
                presets.push(PortionPreset::new("4 oz", 4.0, "oz"));
            }
            if native != Unit::Gram || serving_size != 100.0 {
                presets.push(PortionPreset::new("100g", 100.0, "g"));
            }
        }
        Some((native, Dimension::Volume)) => {
            if native != Unit::Cup {
                presets.push(PortionPreset::new("1 cup", 1.0, "cup"));
                presets.push(PortionPreset::new("½ cup", 0.5, "cup"));
            }
        }
        None => {}
    }

    presets
}

/// Increment for +/- stepper controls in a given unit
pub fn step_size(unit: &str) -> f64 {
    match normalize(unit).as_str() {
        "g" => 10.0,
        "oz" => 0.5,
        "lb" => 0.25,
        "kg" => 0.1,
        "ml" => 25.0,
        "cup" => 0.25,
        "tbsp" => 0.5,
        "tsp" => 0.5,
        "fl oz" => 1.0,
        "l" => 0.1,
        _ => 1.0,
    }
}
