//! FoodData Central search results

use serde::Deserialize;

use super::SourceResult;
use crate::models::{DataType, FoodRecord, Nutrition, SourceId};
use crate::nutrition::normalize_or_default;

const ENERGY: &str = "Energy";
const PROTEIN: &str = "Protein";
const CARBS: &str = "Carbohydrate, by difference";
const FAT: &str = "Total lipid (fat)";
const FIBER: &str = "Fiber, total dietary";

/// Serving size assumed when the item reports none (nutrients are per 100 g)
const DEFAULT_SERVING_SIZE: f64 = 100.0;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    #[serde(default)]
    foods: Vec<SearchFood>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchFood {
    fdc_id: i64,
    #[serde(default)]
    description: String,
    brand_name: Option<String>,
    brand_owner: Option<String>,
    #[serde(default)]
    food_nutrients: Vec<FoodNutrient>,
    serving_size: Option<f64>,
    serving_size_unit: Option<String>,
    data_type: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FoodNutrient {
    #[serde(default)]
    nutrient_name: String,
    value: Option<f64>,
}

impl SearchFood {
    fn nutrient(&self, name: &str) -> f64 {
        self.food_nutrients
            .iter()
            .find(|n| n.nutrient_name == name)
            .and_then(|n| n.value)
            .filter(|v| v.is_finite())
            .unwrap_or(0.0)
    }

    fn into_record(self) -> FoodRecord {
        let nutrition = Nutrition {
            calories: self.nutrient(ENERGY),
            protein: self.nutrient(PROTEIN),
            carbs: self.nutrient(CARBS),
            fat: self.nutrient(FAT),
            fiber: self.nutrient(FIBER),
        };

        let brand_name = [self.brand_name, self.brand_owner]
            .into_iter()
            .flatten()
            .find(|b| !b.trim().is_empty());

        let serving_size = self
            .serving_size
            .filter(|s| s.is_finite() && *s > 0.0)
            .unwrap_or(DEFAULT_SERVING_SIZE);

        FoodRecord {
            source_id: SourceId::fdc(self.fdc_id),
            name: self.description.trim().to_string(),
            brand_name,
            nutrition,
            serving_size,
            serving_unit: normalize_or_default(self.serving_size_unit.as_deref()),
            data_type: self
                .data_type
                .map(DataType::from)
                .unwrap_or_else(|| DataType::Unknown(String::new())),
        }
    }
}

/// Decode a `/foods/search` response into food records
///
/// Nutrients missing from an item read as zero. Items without a description
/// are skipped.
pub fn parse_search_response(json: &str) -> SourceResult<Vec<FoodRecord>> {
    let response: SearchResponse = serde_json::from_str(json)?;

    let records = response
        .foods
        .into_iter()
        .filter_map(|food| {
            if food.description.trim().is_empty() {
                tracing::debug!(fdc_id = food.fdc_id, "Skipping search item without description");
                None
            } else {
                Some(food.into_record())
            }
        })
        .collect();

    Ok(records)
}
