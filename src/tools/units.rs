//! Unit conversion MCP tools

use serde::Serialize;

use crate::nutrition::{
    compatible_units, convert, format_conversion_factor, normalize, presets_for_serving,
    step_size, units::display_name, PortionPreset,
};

/// Response for convert_unit
#[derive(Debug, Serialize)]
pub struct ConvertUnitResponse {
    pub value: f64,
    pub from_unit: String,
    pub to_unit: String,
    pub result: f64,
    /// Display ratio of one `from_unit` in `to_unit`, e.g. "28.35:1"
    pub factor: String,
}

pub fn convert_unit(value: f64, from_unit: &str, to_unit: &str) -> Result<ConvertUnitResponse, String> {
    if !value.is_finite() {
        return Err("value must be a finite number".to_string());
    }

    let result = convert(value, from_unit, to_unit).ok_or_else(|| {
        format!(
            "Cannot convert '{}' to '{}': units are unknown or measure different things",
            from_unit, to_unit
        )
    })?;
    let factor = convert(1.0, from_unit, to_unit)
        .map(format_conversion_factor)
        .unwrap_or_default();

    Ok(ConvertUnitResponse {
        value,
        from_unit: normalize(from_unit),
        to_unit: normalize(to_unit),
        result,
        factor,
    })
}

/// A unit option for a picker
#[derive(Debug, Serialize)]
pub struct UnitOption {
    pub unit: String,
    pub label: String,
    pub step: f64,
}

/// Response for compatible_units
#[derive(Debug, Serialize)]
pub struct CompatibleUnitsResponse {
    pub unit: String,
    pub units: Vec<UnitOption>,
}

pub fn list_compatible_units(unit: &str) -> CompatibleUnitsResponse {
    let unit = normalize(unit);
    let units = compatible_units(&unit)
        .into_iter()
        .map(|u| UnitOption {
            label: display_name(&u),
            step: step_size(&u),
            unit: u,
        })
        .collect();

    CompatibleUnitsResponse { unit, units }
}

/// Response for portion_presets
#[derive(Debug, Serialize)]
pub struct PortionPresetsResponse {
    pub serving_size: f64,
    pub serving_unit: String,
    pub presets: Vec<PortionPreset>,
}

pub fn portion_presets(serving_size: f64, serving_unit: &str) -> Result<PortionPresetsResponse, String> {
    if !(serving_size.is_finite() && serving_size > 0.0) {
        return Err("serving_size must be greater than 0".to_string());
    }

    Ok(PortionPresetsResponse {
        serving_size,
        serving_unit: normalize(serving_unit),
        presets: presets_for_serving(serving_size, serving_unit),
    })
}
