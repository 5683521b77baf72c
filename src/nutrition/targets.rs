//! Goal calculators
//!
//! Mifflin-St Jeor BMR, activity-scaled TDEE and preset macro splits.

use rmcp::schemars;
use serde::{Deserialize, Serialize};

use crate::models::Goals;

const CALORIES_PER_GRAM_PROTEIN: f64 = 4.0;
const CALORIES_PER_GRAM_CARBS: f64 = 4.0;
const CALORIES_PER_GRAM_FAT: f64 = 9.0;
const RECOMMENDED_FIBER: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum ActivityLevel {
    #[default]
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

impl ActivityLevel {
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum GoalPreset {
    WeightLoss,
    MuscleGain,
    Maintenance,
    #[default]
    Balanced,
}

impl GoalPreset {
    /// Daily calorie adjustment from TDEE
    pub fn calorie_adjustment(&self) -> f64 {
        match self {
            GoalPreset::WeightLoss => -500.0,
            GoalPreset::MuscleGain => 300.0,
            GoalPreset::Maintenance | GoalPreset::Balanced => 0.0,
        }
    }

    /// Share of calories from (protein, carbs, fat)
    pub fn macro_ratios(&self) -> (f64, f64, f64) {
        match self {
            GoalPreset::WeightLoss => (0.25, 0.45, 0.30),
            GoalPreset::MuscleGain => (0.25, 0.50, 0.25),
            GoalPreset::Maintenance | GoalPreset::Balanced => (0.20, 0.50, 0.30),
        }
    }
}

/// Basal metabolic rate in kcal/day, rounded
pub fn bmr(weight_kg: f64, height_cm: f64, age: f64, sex: Sex) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * age;
    let modifier = match sex {
        Sex::Male => 5.0,
        Sex::Female => -161.0,
    };
    (base + modifier).round()
}

/// Total daily energy expenditure, rounded
pub fn tdee(bmr: f64, activity: ActivityLevel) -> f64 {
    (bmr * activity.multiplier()).round()
}

pub fn calorie_target(tdee: f64, goal: GoalPreset) -> f64 {
    tdee + goal.calorie_adjustment()
}

/// Full goals for a calorie target, macros in whole grams
pub fn macro_targets(calories: f64, goal: GoalPreset) -> Goals {
    let (protein, carbs, fat) = goal.macro_ratios();
    Goals {
        calories,
        protein: (calories * protein / CALORIES_PER_GRAM_PROTEIN).round(),
        carbs: (calories * carbs / CALORIES_PER_GRAM_CARBS).round(),
        fat: (calories * fat / CALORIES_PER_GRAM_FAT).round(),
        fiber: RECOMMENDED_FIBER,
    }
}

/// Intermediate values shown alongside calculated goals
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GoalCalculation {
    pub bmr: f64,
    pub tdee: f64,
    pub goals: Goals,
}

pub fn calculate_goals(
    weight_kg: f64,
    height_cm: f64,
    age: f64,
    sex: Sex,
    activity: ActivityLevel,
    goal: GoalPreset,
) -> GoalCalculation {
    let bmr = bmr(weight_kg, height_cm, age, sex);
    let tdee = tdee(bmr, activity);
    GoalCalculation {
        bmr,
        tdee,
        goals: macro_targets(calorie_target(tdee, goal), goal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bmr() {
        // 700 + 1093.75 - 150 + 5
        assert_eq!(bmr(70.0, 175.0, 30.0, Sex::Male), 1649.0);
        assert_eq!(bmr(60.0, 165.0, 40.0, Sex::Female), 1270.0);
    }

    #[test]
    fn test_tdee_and_target() {
        assert_eq!(tdee(1649.0, ActivityLevel::Moderate), 2556.0);
        assert_eq!(tdee(1000.0, ActivityLevel::default()), 1200.0);
        assert_eq!(calorie_target(2556.0, GoalPreset::WeightLoss), 2056.0);
        assert_eq!(calorie_target(2556.0, GoalPreset::MuscleGain), 2856.0);
        assert_eq!(calorie_target(2556.0, GoalPreset::Balanced), 2556.0);
    }

    #[test]
    fn test_macro_targets() {
        let goals = macro_targets(2000.0, GoalPreset::WeightLoss);
        assert_eq!(goals.protein, 125.0);
        assert_eq!(goals.carbs, 225.0);
        assert_eq!(goals.fat, 67.0);
        assert_eq!(goals.fiber, 30.0);

        let goals = macro_targets(2000.0, GoalPreset::Maintenance);
        assert_eq!((goals.protein, goals.carbs, goals.fat), (100.0, 250.0, 67.0));
    }

    #[test]
    fn test_preset_names() {
        let preset: GoalPreset = serde_json::from_str("\"weightLoss\"").unwrap();
        assert_eq!(preset, GoalPreset::WeightLoss);
        let level: ActivityLevel = serde_json::from_str("\"veryActive\"").unwrap();
        assert_eq!(level, ActivityLevel::VeryActive);
    }

    #[test]
    fn test_calculate_goals() {
        let calc = calculate_goals(
            70.0,
            175.0,
            30.0,
            Sex::Male,
            ActivityLevel::Moderate,
            GoalPreset::MuscleGain,
        );
        assert_eq!(calc.bmr, 1649.0);
        assert_eq!(calc.goals.calories, 2856.0);
    }
}
