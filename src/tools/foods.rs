//! Custom and recent food MCP tools

use chrono::Utc;
use serde::Serialize;

use crate::db::Database;
use crate::models::{CustomFood, DataType, FoodRecord, Nutrition, RecentFood, SourceId};
use crate::nutrition::{normalize_or_default, validate_record, Validation};

/// Data for add_custom_food
#[derive(Debug, Clone)]
pub struct CustomFoodInput {
    /// Existing custom id to update; a new id is minted when absent
    pub id: Option<String>,
    pub name: String,
    pub brand_name: Option<String>,
    pub serving_size: f64,
    pub serving_unit: Option<String>,
    pub nutrition: Nutrition,
}

/// Response for add_custom_food
#[derive(Debug, Serialize)]
pub struct AddCustomFoodResponse {
    pub food: CustomFood,
    /// Plausibility of the entered values; custom foods are saved either way
    pub validation: Validation,
}

pub fn add_custom_food(db: &Database, input: CustomFoodInput) -> Result<AddCustomFoodResponse, String> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err("Food name cannot be empty".to_string());
    }
    if !(input.serving_size.is_finite() && input.serving_size > 0.0) {
        return Err("serving_size must be greater than 0".to_string());
    }
    if let Some(field) = input.nutrition.invalid_field() {
        return Err(format!("{} cannot be negative", field));
    }

    let source_id = match input.id {
        Some(id) => {
            let id = SourceId::from(id.trim().to_string());
            if !id.is_custom() {
                return Err(format!("'{}' is not a custom food id", id));
            }
            id
        }
        None => SourceId::custom(Utc::now().timestamp_millis()),
    };

    let record = FoodRecord {
        source_id,
        name: name.to_string(),
        brand_name: input
            .brand_name
            .map(|b| b.trim().to_string())
            .filter(|b| !b.is_empty()),
        nutrition: input.nutrition,
        serving_size: input.serving_size,
        serving_unit: normalize_or_default(input.serving_unit.as_deref()),
        data_type: DataType::Custom,
    };
    let validation = validate_record(&record);

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let food = CustomFood::upsert(&conn, &record)
        .map_err(|e| format!("Failed to save custom food: {}", e))?;

    Ok(AddCustomFoodResponse { food, validation })
}

/// Response for search_custom_foods / list_recent_foods
#[derive(Debug, Serialize)]
pub struct FoodListResponse<T> {
    pub items: Vec<T>,
    pub total: usize,
}

impl<T> FoodListResponse<T> {
    fn new(items: Vec<T>) -> Self {
        let total = items.len();
        Self { items, total }
    }
}

pub fn search_custom_foods(db: &Database, query: &str) -> Result<FoodListResponse<CustomFood>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let foods = CustomFood::search(&conn, query)
        .map_err(|e| format!("Search failed: {}", e))?;

    Ok(FoodListResponse::new(foods))
}

/// Response for delete_custom_food
#[derive(Debug, Serialize)]
pub struct DeleteCustomFoodResponse {
    pub success: bool,
    pub deleted_id: String,
}

pub fn delete_custom_food(db: &Database, id: &str) -> Result<DeleteCustomFoodResponse, String> {
    let id = id.trim();
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let deleted = CustomFood::delete(&conn, id)
        .map_err(|e| format!("Failed to delete custom food: {}", e))?;
    if !deleted {
        return Err(format!("Custom food '{}' not found", id));
    }

    Ok(DeleteCustomFoodResponse {
        success: true,
        deleted_id: id.to_string(),
    })
}

pub fn list_recent_foods(db: &Database) -> Result<FoodListResponse<RecentFood>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let foods = RecentFood::list(&conn)
        .map_err(|e| format!("Failed to list recent foods: {}", e))?;

    Ok(FoodListResponse::new(foods))
}

/// Response for clear_recent_foods
#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub success: bool,
}

pub fn clear_recent_foods(db: &Database) -> Result<ClearResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    RecentFood::clear(&conn).map_err(|e| format!("Failed to clear recent foods: {}", e))?;
    Ok(ClearResponse { success: true })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_database;

    fn chili(id: Option<&str>) -> CustomFoodInput {
        CustomFoodInput {
            id: id.map(str::to_string),
            name: "  Grandma's chili ".to_string(),
            brand_name: Some(" ".to_string()),
            serving_size: 1.0,
            serving_unit: Some("Cups".to_string()),
            nutrition: Nutrition::new(320.0, 24.0, 28.0, 12.0, 8.0),
        }
    }

    #[test]
    fn test_add_and_update_custom_food() {
        let db = test_database();
        let added = add_custom_food(&db, chili(None)).unwrap();
        assert!(added.food.food.source_id.is_custom());
        assert_eq!(added.food.food.name, "Grandma's chili");
        assert_eq!(added.food.food.serving_unit, "cup");
        assert!(added.food.food.brand_name.is_none());
        assert!(added.validation.valid);

        let id = added.food.food.source_id.to_string();
        let mut edit = chili(Some(&id));
        edit.name = "Beef chili".to_string();
        add_custom_food(&db, edit).unwrap();

        let all = search_custom_foods(&db, "").unwrap();
        assert_eq!(all.total, 1);
        assert_eq!(all.items[0].food.name, "Beef chili");
    }

    #[test]
    fn test_custom_food_input_checks() {
        let db = test_database();
        let mut bad = chili(None);
        bad.nutrition.fat = -1.0;
        assert!(add_custom_food(&db, bad).is_err());
        assert!(add_custom_food(&db, chili(Some("171077"))).is_err());
    }

    #[test]
    fn test_implausible_custom_food_still_saved() {
        let db = test_database();
        let mut odd = chili(None);
        odd.nutrition = Nutrition::new(900.0, 1.0, 1.0, 1.0, 0.0);
        let added = add_custom_food(&db, odd).unwrap();
        assert!(!added.validation.valid);
        assert_eq!(search_custom_foods(&db, "chili").unwrap().total, 1);
    }

    #[test]
    fn test_delete_custom_food() {
        let db = test_database();
        let added = add_custom_food(&db, chili(None)).unwrap();
        let id = added.food.food.source_id.to_string();
        assert!(delete_custom_food(&db, &id).unwrap().success);
        assert!(delete_custom_food(&db, &id).is_err());
    }

    #[test]
    fn test_recent_foods_empty() {
        let db = test_database();
        assert_eq!(list_recent_foods(&db).unwrap().total, 0);
        assert!(clear_recent_foods(&db).unwrap().success);
    }
}
