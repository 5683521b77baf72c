//! Open Food Facts product lookups
//!
//! Product nutriments are reported per 100 g, so every barcode record has a
//! 100 g serving.

use serde::Deserialize;

use super::{SourceError, SourceResult};
use crate::models::{DataType, FoodRecord, Nutrition, SourceId};

const SERVING_SIZE: f64 = 100.0;
const SERVING_UNIT: &str = "g";
const STATUS_FOUND: i64 = 1;

#[derive(Debug, Deserialize)]
struct ProductResponse {
    #[serde(default)]
    status: i64,
    product: Option<Product>,
}

#[derive(Debug, Deserialize)]
struct Product {
    product_name: Option<String>,
    brands: Option<String>,
    #[serde(default)]
    nutriments: Nutriments,
}

#[derive(Debug, Default, Deserialize)]
struct Nutriments {
    #[serde(rename = "energy-kcal_100g")]
    energy_kcal: Option<f64>,
    #[serde(rename = "proteins_100g")]
    proteins: Option<f64>,
    #[serde(rename = "carbohydrates_100g")]
    carbohydrates: Option<f64>,
    #[serde(rename = "fat_100g")]
    fat: Option<f64>,
    #[serde(rename = "fiber_100g")]
    fiber: Option<f64>,
}

fn or_zero(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Decode a product lookup for `code`
///
/// Returns `ProductNotFound` when the provider reports no product. Brands are a
/// comma-separated list; the first one is kept.
pub fn parse_product(code: &str, json: &str) -> SourceResult<FoodRecord> {
    let code = code.trim();
    let response: ProductResponse = serde_json::from_str(json)?;

    let product = match response.product {
        Some(product) if response.status == STATUS_FOUND => product,
        _ => return Err(SourceError::ProductNotFound(code.to_string())),
    };

    let name = product
        .product_name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| SourceError::MissingName(code.to_string()))?
        .to_string();

    let brand_name = product
        .brands
        .as_deref()
        .and_then(|b| b.split(',').next())
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .map(str::to_string);

    let n = &product.nutriments;
    Ok(FoodRecord {
        source_id: SourceId::barcode(code),
        name,
        brand_name,
        nutrition: Nutrition {
            calories: or_zero(n.energy_kcal),
            protein: or_zero(n.proteins),
            carbs: or_zero(n.carbohydrates),
            fat: or_zero(n.fat),
            fiber: or_zero(n.fiber),
        },
        serving_size: SERVING_SIZE,
        serving_unit: SERVING_UNIT.to_string(),
        data_type: DataType::Barcode,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_product() {
        let json = r#"{
            "code": "3017620422003",
            "status": 1,
            "product": {
                "product_name": "Nutella",
                "brands": "Ferrero, Nutella",
                "nutriments": {
                    "energy-kcal_100g": 539,
                    "proteins_100g": 6.3,
                    "carbohydrates_100g": 57.5,
                    "fat_100g": 30.9,
                    "sugars_100g": 56.3
                }
            }
        }"#;
        let record = parse_product(" 3017620422003 ", json).unwrap();
        assert_eq!(record.source_id.as_str(), "barcode-3017620422003");
        assert_eq!(record.name, "Nutella");
        assert_eq!(record.brand(), Some("Ferrero"));
        assert_eq!(record.nutrition.calories, 539.0);
        assert_eq!(record.nutrition.fiber, 0.0);
        assert_eq!(record.serving_size, 100.0);
        assert_eq!(record.data_type, DataType::Barcode);
    }

    #[test]
    fn test_product_not_found() {
        let json = r#"{"code": "000", "status": 0, "status_verbose": "product not found"}"#;
        match parse_product("000", json) {
            Err(SourceError::ProductNotFound(code)) => assert_eq!(code, "000"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_product_without_name() {
        let json = r#"{"status": 1, "product": {"product_name": "", "nutriments": {}}}"#;
        assert!(matches!(parse_product("42", json), Err(SourceError::MissingName(_))));
    }
}
