//! Macrolog MCP Server Implementation
//!
//! Implements the MCP server with all Macrolog tools.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::db::Database;
use crate::models::{DataType, FoodRecord, Nutrition, SourceId};
use crate::nutrition::{normalize_or_default, ActivityLevel, GoalPreset, Sex};
use crate::tools::foods::{self, CustomFoodInput};
use crate::tools::goals::{self, BodyMetrics, GoalsUpdate};
use crate::tools::log::{self, Portion};
use crate::tools::search;
use crate::tools::status::StatusTracker;
use crate::tools::units;

/// Macrolog MCP Service
#[derive(Clone)]
pub struct MacrologService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    tool_router: ToolRouter<MacrologService>,
}

impl MacrologService {
    pub fn new(database_path: PathBuf, database: Database) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(database_path))),
            database,
            tool_router: Self::tool_router(),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Search Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchFoodsParams {
    /// Raw JSON body of a FoodData Central /foods/search response
    pub payload: String,
    pub query: String,
    #[serde(default = "default_search_limit")]
    pub limit: usize,
}

fn default_search_limit() -> usize { 25 }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LookupBarcodeParams {
    pub barcode: String,
    /// Raw JSON body of an Open Food Facts product lookup
    pub payload: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct NutritionParams {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    #[serde(default)]
    pub fiber: f64,
}

impl From<NutritionParams> for Nutrition {
    fn from(p: NutritionParams) -> Self {
        Nutrition::new(p.calories, p.protein, p.carbs, p.fat, p.fiber)
    }
}

// ============================================================================
// Unit Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ConvertUnitParams {
    pub value: f64,
    pub from_unit: String,
    pub to_unit: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CompatibleUnitsParams {
    pub unit: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PortionPresetsParams {
    pub serving_size: f64,
    pub serving_unit: String,
}

// ============================================================================
// Log Parameter Structs
// ============================================================================

/// A food as returned by search_foods, lookup_barcode or the custom food tools
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct FoodParams {
    pub source_id: String,
    pub name: String,
    pub brand_name: Option<String>,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    #[serde(default)]
    pub fiber: f64,
    pub serving_size: f64,
    pub serving_unit: Option<String>,
    pub data_type: Option<String>,
}

impl From<FoodParams> for FoodRecord {
    fn from(p: FoodParams) -> Self {
        Self {
            source_id: SourceId::from(p.source_id),
            name: p.name,
            brand_name: p.brand_name,
            nutrition: Nutrition::new(p.calories, p.protein, p.carbs, p.fat, p.fiber),
            serving_size: p.serving_size,
            serving_unit: normalize_or_default(p.serving_unit.as_deref()),
            data_type: p
                .data_type
                .map(DataType::from)
                .unwrap_or_else(|| DataType::Unknown(String::new())),
        }
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogFoodParams {
    pub food: FoodParams,
    /// ISO date: "2026-01-09"
    pub date: String,
    /// breakfast, lunch, dinner or snack
    pub meal: String,
    /// Multiples of the food's serving
    pub servings: Option<f64>,
    /// Amount eaten in `unit`; used when servings is not given
    pub amount: Option<f64>,
    pub unit: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DateParams {
    pub date: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteEntryParams {
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CopyDayParams {
    /// Defaults to the day before to_date
    pub from_date: Option<String>,
    pub to_date: String,
    /// Only copy these entries of the source day
    pub entry_ids: Option<Vec<i64>>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetSummaryParams {
    /// weekly or monthly
    pub period: String,
    /// Last day of the period
    pub end_date: String,
}

// ============================================================================
// Goal Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetGoalsParams {
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
    pub fiber: Option<f64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CalculateGoalsParams {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age: f64,
    pub sex: Sex,
    #[serde(default)]
    pub activity_level: ActivityLevel,
    #[serde(default)]
    pub goal: GoalPreset,
    #[serde(default)]
    pub save: bool,
}

// ============================================================================
// Custom Food Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddCustomFoodParams {
    /// Existing custom food id to update
    pub id: Option<String>,
    pub name: String,
    pub brand_name: Option<String>,
    pub serving_size: f64,
    pub serving_unit: Option<String>,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    #[serde(default)]
    pub fiber: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchCustomFoodsParams {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteCustomFoodParams {
    pub id: String,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl MacrologService {
    // --- Status ---

    #[tool(description = "Get the current status of the Macrolog service including build info, database status, and process information")]
    async fn macrolog_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        to_json(&tracker.get_status())
    }

    #[tool(description = "Get step-by-step instructions for searching and logging foods. Call this when starting a food logging session.")]
    fn logging_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::LOGGING_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(LOGGING_INSTRUCTIONS)]))
    }

    // --- Search ---

    #[tool(description = "Normalize, validate and rank a FoodData Central search response. Implausible records are dropped; results carry a 0-100 confidence.")]
    fn search_foods(&self, Parameters(p): Parameters<SearchFoodsParams>) -> Result<CallToolResult, McpError> {
        let result = search::search_foods(&p.payload, &p.query, p.limit).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Read an Open Food Facts product lookup for a scanned barcode")]
    fn lookup_barcode(&self, Parameters(p): Parameters<LookupBarcodeParams>) -> Result<CallToolResult, McpError> {
        let result = search::lookup_barcode(&p.barcode, &p.payload).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Check whether per-100g nutrition values are plausible (calories consistent with macros)")]
    fn validate_food(&self, Parameters(p): Parameters<NutritionParams>) -> Result<CallToolResult, McpError> {
        to_json(&search::validate_food(&p.into()))
    }

    // --- Units ---

    #[tool(description = "Convert a quantity between two weight units or two volume units")]
    fn convert_unit(&self, Parameters(p): Parameters<ConvertUnitParams>) -> Result<CallToolResult, McpError> {
        let result = units::convert_unit(p.value, &p.from_unit, &p.to_unit).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "List the units a quantity in the given unit can be shown in, with stepper increments")]
    fn compatible_units(&self, Parameters(p): Parameters<CompatibleUnitsParams>) -> Result<CallToolResult, McpError> {
        to_json(&units::list_compatible_units(&p.unit))
    }

    #[tool(description = "Get quick portion choices for a food's serving size and unit")]
    fn portion_presets(&self, Parameters(p): Parameters<PortionPresetsParams>) -> Result<CallToolResult, McpError> {
        let result = units::portion_presets(p.serving_size, &p.serving_unit).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    // --- Log ---

    #[tool(description = "Log a food on a date and meal, by servings or by amount and unit. Amounts that cannot be converted to the food's serving unit are refused.")]
    fn log_food(&self, Parameters(p): Parameters<LogFoodParams>) -> Result<CallToolResult, McpError> {
        let portion = match (p.servings, p.amount) {
            (Some(servings), _) => Portion::Servings(servings),
            (None, Some(value)) => Portion::Amount {
                value,
                unit: p
                    .unit
                    .unwrap_or_else(|| normalize_or_default(p.food.serving_unit.as_deref())),
            },
            (None, None) => {
                return Err(McpError::invalid_params("Provide either servings or amount", None));
            }
        };
        let result = log::log_food(&self.database, p.food.into(), &p.date, &p.meal, portion)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Get everything logged on a date grouped by meal, with totals and progress against goals")]
    fn get_day(&self, Parameters(p): Parameters<DateParams>) -> Result<CallToolResult, McpError> {
        let result = log::get_day(&self.database, &p.date).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Delete a logged entry")]
    fn delete_entry(&self, Parameters(p): Parameters<DeleteEntryParams>) -> Result<CallToolResult, McpError> {
        let result = log::delete_entry(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Copy the foods logged on one day (default: the previous day) to another day")]
    fn copy_day(&self, Parameters(p): Parameters<CopyDayParams>) -> Result<CallToolResult, McpError> {
        let result = log::copy_day(&self.database, p.from_date.as_deref(), &p.to_date, p.entry_ids.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Weekly or monthly summary: averages, days on track, highest and lowest days, current streak")]
    fn get_summary(&self, Parameters(p): Parameters<GetSummaryParams>) -> Result<CallToolResult, McpError> {
        let result = log::get_summary(&self.database, &p.period, &p.end_date).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    // --- Goals ---

    #[tool(description = "Get the daily calorie and macro goals")]
    fn get_goals(&self) -> Result<CallToolResult, McpError> {
        let result = goals::get_goals(&self.database).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Update daily goals; fields left out keep their current value")]
    fn set_goals(&self, Parameters(p): Parameters<SetGoalsParams>) -> Result<CallToolResult, McpError> {
        let update = GoalsUpdate {
            calories: p.calories,
            protein: p.protein,
            carbs: p.carbs,
            fat: p.fat,
            fiber: p.fiber,
        };
        let result = goals::set_goals(&self.database, update).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Calculate goals from body metrics (Mifflin-St Jeor BMR, activity level, goal preset). Set save=true to store them.")]
    fn calculate_goals(&self, Parameters(p): Parameters<CalculateGoalsParams>) -> Result<CallToolResult, McpError> {
        let metrics = BodyMetrics {
            weight_kg: p.weight_kg,
            height_cm: p.height_cm,
            age: p.age,
            sex: p.sex,
        };
        let result = goals::calculate_goals(&self.database, metrics, p.activity_level, p.goal, p.save)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    // --- Foods ---

    #[tool(description = "Create a custom food, or update one by passing its custom- id")]
    fn add_custom_food(&self, Parameters(p): Parameters<AddCustomFoodParams>) -> Result<CallToolResult, McpError> {
        let input = CustomFoodInput {
            id: p.id,
            name: p.name,
            brand_name: p.brand_name,
            serving_size: p.serving_size,
            serving_unit: p.serving_unit,
            nutrition: Nutrition::new(p.calories, p.protein, p.carbs, p.fat, p.fiber),
        };
        let result = foods::add_custom_food(&self.database, input).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Search custom foods by name; an empty query lists all")]
    fn search_custom_foods(&self, Parameters(p): Parameters<SearchCustomFoodsParams>) -> Result<CallToolResult, McpError> {
        let result = foods::search_custom_foods(&self.database, &p.query).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Delete a custom food")]
    fn delete_custom_food(&self, Parameters(p): Parameters<DeleteCustomFoodParams>) -> Result<CallToolResult, McpError> {
        let result = foods::delete_custom_food(&self.database, &p.id).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "List the last ten distinct foods logged, most recent first")]
    fn list_recent_foods(&self) -> Result<CallToolResult, McpError> {
        let result = foods::list_recent_foods(&self.database).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Clear the recent foods list")]
    fn clear_recent_foods(&self) -> Result<CallToolResult, McpError> {
        let result = foods::clear_recent_foods(&self.database).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for MacrologService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "macrolog".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Macrolog".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Macrolog - food search normalization, nutrition validation and logging. \
                 IMPORTANT: Call logging_instructions before a food logging session. \
                 Search: search_foods (FoodData Central JSON), lookup_barcode (Open Food Facts JSON), validate_food. \
                 Units: convert_unit, compatible_units, portion_presets. \
                 Log: log_food, get_day, delete_entry, copy_day, get_summary. \
                 Goals: get_goals, set_goals, calculate_goals. \
                 Foods: add_custom_food, search_custom_foods, delete_custom_food, list_recent_foods, clear_recent_foods."
                    .into(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_food_params_normalize_unit() {
        let params: FoodParams = serde_json::from_value(serde_json::json!({
            "source_id": "171077",
            "name": "Chicken breast",
            "calories": 120.0,
            "protein": 22.5,
            "carbs": 0.0,
            "fat": 2.6,
            "serving_size": 100.0,
            "serving_unit": "GRM",
            "data_type": "SR Legacy"
        }))
        .unwrap();
        let record = FoodRecord::from(params);
        assert_eq!(record.serving_unit, "g");
        assert_eq!(record.data_type, DataType::SrLegacy);
        assert_eq!(record.nutrition.fiber, 0.0);
    }

    #[test]
    fn test_calculate_goals_params_defaults() {
        let params: CalculateGoalsParams = serde_json::from_value(serde_json::json!({
            "weight_kg": 70.0,
            "height_cm": 175.0,
            "age": 30.0,
            "sex": "female"
        }))
        .unwrap();
        assert_eq!(params.activity_level, ActivityLevel::Sedentary);
        assert_eq!(params.goal, GoalPreset::Balanced);
        assert!(!params.save);
    }
}
