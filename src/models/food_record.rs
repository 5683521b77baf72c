//! Food record model
//!
//! The canonical food entity produced from search results, barcode lookups and
//! custom entries. Nutrition is always per one serving.

use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::Nutrition;

/// Identity of a food within the combined food universe
///
/// FoodData Central ids are rendered as decimal strings; barcode products and
/// custom foods carry a prefix so the three id spaces never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceId(String);

pub const BARCODE_PREFIX: &str = "barcode-";
pub const CUSTOM_PREFIX: &str = "custom-";

impl SourceId {
    pub fn fdc(fdc_id: i64) -> Self {
        Self(fdc_id.to_string())
    }

    pub fn barcode(code: &str) -> Self {
        Self(format!("{}{}", BARCODE_PREFIX, code.trim()))
    }

    /// Custom food id from a creation timestamp in milliseconds
    pub fn custom(millis: i64) -> Self {
        Self(format!("{}{}", CUSTOM_PREFIX, millis))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_custom(&self) -> bool {
        self.0.starts_with(CUSTOM_PREFIX)
    }

    pub fn is_barcode(&self) -> bool {
        self.0.starts_with(BARCODE_PREFIX)
    }
}

impl From<String> for SourceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a record's data came from
///
/// Only used to weight ranking and confidence, never to accept or reject data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DataType {
    Foundation,
    SrLegacy,
    Survey,
    Branded,
    Barcode,
    Custom,
    Unknown(String),
}

impl DataType {
    pub fn as_str(&self) -> &str {
        match self {
            DataType::Foundation => "Foundation",
            DataType::SrLegacy => "SR Legacy",
            DataType::Survey => "Survey (FNDDS)",
            DataType::Branded => "Branded",
            DataType::Barcode => "Barcode",
            DataType::Custom => "Custom",
            DataType::Unknown(s) => s,
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.trim() {
            "Foundation" => DataType::Foundation,
            "SR Legacy" => DataType::SrLegacy,
            "Survey (FNDDS)" => DataType::Survey,
            "Branded" => DataType::Branded,
            "Barcode" => DataType::Barcode,
            "Custom" => DataType::Custom,
            other => DataType::Unknown(other.to_string()),
        }
    }

    /// Survey and legacy reference data, boosted for generic searches
    pub fn is_generic_reference(&self) -> bool {
        matches!(self, DataType::Survey | DataType::SrLegacy)
    }
}

impl From<String> for DataType {
    fn from(s: String) -> Self {
        DataType::from_str(&s)
    }
}

impl From<DataType> for String {
    fn from(dt: DataType) -> Self {
        dt.as_str().to_string()
    }
}

/// A normalized food ready to be validated, ranked and logged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodRecord {
    pub source_id: SourceId,
    pub name: String,
    pub brand_name: Option<String>,
    #[serde(flatten)]
    pub nutrition: Nutrition,
    pub serving_size: f64,
    /// Canonical unit token, or a pass-through spelling for unknown units
    pub serving_unit: String,
    pub data_type: DataType,
}

impl FoodRecord {
    /// Read the shared food columns of a logged entry, recent or custom food row
    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let source_id: String = row.get("source_id")?;
        let data_type: String = row.get("data_type")?;
        Ok(Self {
            source_id: SourceId::from(source_id),
            name: row.get("name")?,
            brand_name: row.get("brand_name")?,
            nutrition: Nutrition {
                calories: row.get("calories")?,
                protein: row.get("protein")?,
                carbs: row.get("carbs")?,
                fat: row.get("fat")?,
                fiber: row.get("fiber")?,
            },
            serving_size: row.get("serving_size")?,
            serving_unit: row.get("serving_unit")?,
            data_type: DataType::from(data_type),
        })
    }

    /// Brand name when present and non-blank
    pub fn brand(&self) -> Option<&str> {
        self.brand_name
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_id_prefixes() {
        assert_eq!(SourceId::fdc(171077).as_str(), "171077");
        assert!(SourceId::barcode(" 0123 ").is_barcode());
        assert_eq!(SourceId::barcode("0123").as_str(), "barcode-0123");
        assert!(SourceId::custom(1700000000000).is_custom());
        assert!(!SourceId::fdc(1).is_custom());
    }

    #[test]
    fn test_data_type_round_trip_strings() {
        assert_eq!(DataType::from_str("Survey (FNDDS)"), DataType::Survey);
        assert_eq!(DataType::from_str("SR Legacy"), DataType::SrLegacy);
        assert_eq!(
            DataType::from_str("Experimental"),
            DataType::Unknown("Experimental".to_string())
        );
        assert!(DataType::Survey.is_generic_reference());
        assert!(!DataType::Foundation.is_generic_reference());
    }

    #[test]
    fn test_serializes_flat() {
        let record = FoodRecord {
            source_id: SourceId::fdc(1),
            name: "Apple".to_string(),
            brand_name: None,
            nutrition: Nutrition::new(52.0, 0.3, 14.0, 0.2, 2.4),
            serving_size: 100.0,
            serving_unit: "g".to_string(),
            data_type: DataType::SrLegacy,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["calories"], 52.0);
        assert_eq!(json["data_type"], "SR Legacy");
        assert_eq!(json["source_id"], "1");

        let back: FoodRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
