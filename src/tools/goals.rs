//! Goal MCP tools

use serde::Serialize;

use crate::db::Database;
use crate::models::Goals;
use crate::nutrition::{calculate_goals as calculate, ActivityLevel, GoalCalculation, GoalPreset, Sex};

pub fn get_goals(db: &Database) -> Result<Goals, String> {
    db.with_conn(Goals::get)
        .map_err(|e| format!("Failed to load goals: {}", e))
}

/// Partial goal update; missing fields keep their current value
#[derive(Debug, Clone, Default)]
pub struct GoalsUpdate {
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
    pub fiber: Option<f64>,
}

pub fn set_goals(db: &Database, update: GoalsUpdate) -> Result<Goals, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let current = Goals::get(&conn).map_err(|e| format!("Failed to load goals: {}", e))?;
    let goals = Goals {
        calories: update.calories.unwrap_or(current.calories),
        protein: update.protein.unwrap_or(current.protein),
        carbs: update.carbs.unwrap_or(current.carbs),
        fat: update.fat.unwrap_or(current.fat),
        fiber: update.fiber.unwrap_or(current.fiber),
    };

    Goals::set(&conn, &goals).map_err(|e| format!("Failed to save goals: {}", e))
}

/// Body metrics for calculate_goals
#[derive(Debug, Clone)]
pub struct BodyMetrics {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age: f64,
    pub sex: Sex,
}

/// Response for calculate_goals
#[derive(Debug, Serialize)]
pub struct CalculateGoalsResponse {
    #[serde(flatten)]
    pub calculation: GoalCalculation,
    pub saved: bool,
}

/// Compute goals from body metrics, optionally storing them
pub fn calculate_goals(
    db: &Database,
    metrics: BodyMetrics,
    activity: ActivityLevel,
    goal: GoalPreset,
    save: bool,
) -> Result<CalculateGoalsResponse, String> {
    for (label, value) in [
        ("weight_kg", metrics.weight_kg),
        ("height_cm", metrics.height_cm),
        ("age", metrics.age),
    ] {
        if !(value.is_finite() && value > 0.0) {
            return Err(format!("{} must be greater than 0", label));
        }
    }

    let calculation = calculate(
        metrics.weight_kg,
        metrics.height_cm,
        metrics.age,
        metrics.sex,
        activity,
        goal,
    );

    if calculation.goals.calories <= 0.0 {
        return Err(format!(
            "Calculated calorie target {} is not usable",
            calculation.goals.calories
        ));
    }

    if save {
        db.with_conn(|conn| Goals::set(conn, &calculation.goals))
            .map_err(|e| format!("Failed to save goals: {}", e))?;
    }

    Ok(CalculateGoalsResponse { calculation, saved: save })
}
