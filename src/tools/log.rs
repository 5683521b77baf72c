//! Food log MCP tools
//!
//! Logging foods against a day, reading a day back, copying days and
//! weekly/monthly summaries.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::db::Database;
use crate::models::{
    parse_date, FoodRecord, Goals, LoggedEntry, LoggedEntryCreate, MealCategory, Nutrition,
    RecentFood,
};
use crate::nutrition::{
    daily_totals, month_of, period_summary, progress, servings_for_amount, week_ending,
    PeriodSummary, Progress, Servings,
};

/// How much of a food was eaten
#[derive(Debug, Clone, PartialEq)]
pub enum Portion {
    Servings(f64),
    Amount { value: f64, unit: String },
}

/// Summary of a logged entry with the nutrition actually eaten
#[derive(Debug, Serialize)]
pub struct EntrySummary {
    pub id: i64,
    pub source_id: String,
    pub name: String,
    pub brand_name: Option<String>,
    pub meal: MealCategory,
    pub servings: f64,
    pub serving_size: f64,
    pub serving_unit: String,
    /// Eaten amounts, display-rounded
    pub nutrition: Nutrition,
}

impl From<&LoggedEntry> for EntrySummary {
    fn from(entry: &LoggedEntry) -> Self {
        Self {
            id: entry.id,
            source_id: entry.food.source_id.to_string(),
            name: entry.food.name.clone(),
            brand_name: entry.food.brand_name.clone(),
            meal: entry.meal,
            servings: entry.quantity.get(),
            serving_size: entry.food.serving_size,
            serving_unit: entry.food.serving_unit.clone(),
            nutrition: entry.nutrition().rounded(),
        }
    }
}

/// Response for log_food
#[derive(Debug, Serialize)]
pub struct LogFoodResponse {
    pub entry: EntrySummary,
    pub date: NaiveDate,
    pub day_totals: Nutrition,
}

pub(crate) fn parse_date_param(date: &str) -> Result<NaiveDate, String> {
    parse_date(date).ok_or_else(|| format!("Invalid date '{}': expected YYYY-MM-DD", date))
}

fn parse_meal(meal: &str) -> Result<MealCategory, String> {
    MealCategory::from_str(meal).ok_or_else(|| {
        format!(
            "Invalid meal '{}': expected breakfast, lunch, dinner or snack",
            meal
        )
    })
}

/// Log a food on a day
///
/// An amount in some unit is converted to servings of the food first; when no
/// conversion exists the entry is refused rather than guessed.
pub fn log_food(
    db: &Database,
    food: FoodRecord,
    date: &str,
    meal: &str,
    portion: Portion,
) -> Result<LogFoodResponse, String> {
    let date = parse_date_param(date)?;
    let meal = parse_meal(meal)?;

    if food.name.trim().is_empty() {
        return Err("Food name cannot be empty".to_string());
    }
    if !(food.serving_size.is_finite() && food.serving_size > 0.0) {
        return Err("serving_size must be greater than 0".to_string());
    }
    if let Some(field) = food.nutrition.invalid_field() {
        return Err(format!("{} cannot be negative", field));
    }

    let quantity = match portion {
        Portion::Servings(servings) => Servings::new(servings)
            .ok_or_else(|| "servings must be greater than 0".to_string())?,
        Portion::Amount { value, unit } => {
            if !(value.is_finite() && value > 0.0) {
                return Err("amount must be greater than 0".to_string());
            }
            servings_for_amount(value, &unit, food.serving_size, &food.serving_unit).ok_or_else(
                || {
                    format!(
                        "Cannot log {} {}: no conversion to the food's serving unit '{}'",
                        value, unit, food.serving_unit
                    )
                },
            )?
        }
    };

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let entry = LoggedEntry::create(
        &conn,
        &LoggedEntryCreate {
            food,
            quantity,
            date,
            meal,
        },
    )
    .map_err(|e| format!("Failed to log food: {}", e))?;

    // Entry is saved at this point; recents are best effort
    if let Err(e) = RecentFood::push(&conn, &entry.food) {
        tracing::warn!(source_id = %entry.food.source_id, "Could not update recent foods: {}", e);
    }

    let entries = LoggedEntry::list_for_date(&conn, date)
        .map_err(|e| format!("Failed to load day: {}", e))?;

    Ok(LogFoodResponse {
        entry: EntrySummary::from(&entry),
        date,
        day_totals: daily_totals(&entries, date).rounded(),
    })
}

/// Entries of one meal slot
#[derive(Debug, Serialize)]
pub struct MealGroup {
    pub meal: MealCategory,
    pub entries: Vec<EntrySummary>,
    pub totals: Nutrition,
}

/// Response for get_day
#[derive(Debug, Serialize)]
pub struct DayResponse {
    pub date: NaiveDate,
    pub meals: Vec<MealGroup>,
    pub totals: Nutrition,
    pub goals: Goals,
    pub progress: Progress,
}

pub fn get_day(db: &Database, date: &str) -> Result<DayResponse, String> {
    let date = parse_date_param(date)?;
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let entries = LoggedEntry::list_for_date(&conn, date)
        .map_err(|e| format!("Failed to load day: {}", e))?;
    let goals = Goals::get(&conn).map_err(|e| format!("Failed to load goals: {}", e))?;

    let meals = MealCategory::ALL
        .iter()
        .map(|meal| {
            let in_meal: Vec<&LoggedEntry> = entries.iter().filter(|e| e.meal == *meal).collect();
            let totals: Nutrition = in_meal.iter().map(|e| e.nutrition()).sum();
            MealGroup {
                meal: *meal,
                entries: in_meal.into_iter().map(EntrySummary::from).collect(),
                totals: totals.rounded(),
            }
        })
        .collect();

    let totals = daily_totals(&entries, date);

    Ok(DayResponse {
        date,
        meals,
        totals: totals.rounded(),
        progress: progress(&totals, &goals),
        goals,
    })
}

/// Response for delete_entry
#[derive(Debug, Serialize)]
pub struct DeleteEntryResponse {
    pub success: bool,
    pub deleted_id: i64,
}

pub fn delete_entry(db: &Database, id: i64) -> Result<DeleteEntryResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let deleted = LoggedEntry::delete(&conn, id)
        .map_err(|e| format!("Failed to delete entry: {}", e))?;
    if !deleted {
        return Err(format!("Entry {} not found", id));
    }

    Ok(DeleteEntryResponse {
        success: true,
        deleted_id: id,
    })
}

/// Response for copy_day
#[derive(Debug, Serialize)]
pub struct CopyDayResponse {
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub copied: Vec<EntrySummary>,
}

/// Copy a day's entries to another day; the source defaults to the day before
pub fn copy_day(
    db: &Database,
    from_date: Option<&str>,
    to_date: &str,
    entry_ids: Option<&[i64]>,
) -> Result<CopyDayResponse, String> {
    let to = parse_date_param(to_date)?;
    let from = match from_date {
        Some(d) => parse_date_param(d)?,
        None => to - Duration::days(1),
    };
    if from == to {
        return Err("Source and target dates are the same".to_string());
    }

    let mut conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let copied = LoggedEntry::copy_to_date(&mut conn, from, to, entry_ids)
        .map_err(|e| format!("Failed to copy entries: {}", e))?;

    if copied.is_empty() {
        return Err(format!("No foods logged on {} to copy", from));
    }

    Ok(CopyDayResponse {
        from_date: from,
        to_date: to,
        copied: copied.iter().map(EntrySummary::from).collect(),
    })
}

/// Summary period for get_summary
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Period {
    Weekly,
    Monthly,
}

impl Period {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "weekly" | "week" => Some(Period::Weekly),
            "monthly" | "month" => Some(Period::Monthly),
            _ => None,
        }
    }
}

/// Response for get_summary
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub period: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: NaiveDate,
    pub goals: Goals,
    #[serde(flatten)]
    pub summary: PeriodSummary,
}

/// Summarize the week ending on `end_date` or its month up to that day
pub fn get_summary(db: &Database, period: &str, end_date: &str) -> Result<SummaryResponse, String> {
    let kind = Period::from_str(period)
        .ok_or_else(|| format!("Invalid period '{}': expected weekly or monthly", period))?;
    let end = parse_date_param(end_date)?;

    let dates = match kind {
        Period::Weekly => week_ending(end),
        Period::Monthly => month_of(end),
    };
    let start = dates.first().copied();

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let entries = LoggedEntry::list_between(&conn, start.unwrap_or(end), end)
        .map_err(|e| format!("Failed to load entries: {}", e))?;
    let goals = Goals::get(&conn).map_err(|e| format!("Failed to load goals: {}", e))?;

    let mut summary = period_summary(&entries, &goals, &dates);
    for day in &mut summary.days {
        day.totals = day.totals.rounded();
    }

    Ok(SummaryResponse {
        period: period.trim().to_lowercase(),
        start_date: start,
        end_date: end,
        goals,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_database;
    use crate::models::{DataType, SourceId};

    fn milk() -> FoodRecord {
        FoodRecord {
            source_id: SourceId::fdc(746782),
            name: "Milk, whole".to_string(),
            brand_name: None,
            nutrition: Nutrition::new(150.0, 8.0, 12.0, 8.0, 0.0),
            serving_size: 1.0,
            serving_unit: "cup".to_string(),
            data_type: DataType::Foundation,
        }
    }

    #[test]
    fn test_log_food_by_amount() {
        let db = test_database();
        let response = log_food(
            &db,
            milk(),
            "2026-01-09",
            "Breakfast",
            Portion::Amount { value: 120.0, unit: "ml".to_string() },
        )
        .unwrap();

        assert_eq!(response.entry.servings, 0.5);
        assert_eq!(response.entry.nutrition.calories, 75.0);
        assert_eq!(response.day_totals.protein, 4.0);

        let recent = db.with_conn(RecentFood::list).unwrap();
        assert_eq!(recent.len(), 1);
    }

    #[test]
    fn test_log_food_refuses_cross_dimension() {
        let db = test_database();
        let err = log_food(
            &db,
            milk(),
            "2026-01-09",
            "lunch",
            Portion::Amount { value: 100.0, unit: "g".to_string() },
        )
        .unwrap_err();
        assert!(err.contains("no conversion"));
        assert!(get_day(&db, "2026-01-09").unwrap().meals.iter().all(|m| m.entries.is_empty()));
    }

    #[test]
    fn test_log_food_validates_inputs() {
        let db = test_database();
        assert!(log_food(&db, milk(), "01/09/2026", "lunch", Portion::Servings(1.0)).is_err());
        assert!(log_food(&db, milk(), "2026-01-09", "brunch", Portion::Servings(1.0)).is_err());
        assert!(log_food(&db, milk(), "2026-01-09", "lunch", Portion::Servings(0.0)).is_err());
    }

    #[test]
    fn test_log_food_rejects_negative_nutrients() {
        let db = test_database();
        let mut food = milk();
        food.nutrition = Nutrition::new(-500.0, -10.0, 0.0, 0.0, 0.0);
        let err = log_food(&db, food, "2026-01-09", "lunch", Portion::Servings(1.0)).unwrap_err();
        assert!(err.contains("calories"));
        assert_eq!(get_day(&db, "2026-01-09").unwrap().totals.calories, 0.0);
    }

    #[test]
    fn test_recent_foods_failure_keeps_entry() {
        let db = test_database();
        db.with_conn(|conn| Ok(conn.execute_batch("DROP TABLE recent_foods")?))
            .unwrap();

        let response = log_food(&db, milk(), "2026-01-09", "lunch", Portion::Servings(1.0)).unwrap();
        assert_eq!(response.day_totals.calories, 150.0);

        let day = get_day(&db, "2026-01-09").unwrap();
        assert_eq!(day.meals[1].entries.len(), 1);
        assert_eq!(day.meals[1].entries[0].id, response.entry.id);
    }

    #[test]
    fn test_get_day_groups_by_meal() {
        let db = test_database();
        log_food(&db, milk(), "2026-01-09", "breakfast", Portion::Servings(1.0)).unwrap();
        log_food(&db, milk(), "2026-01-09", "dinner", Portion::Servings(2.0)).unwrap();

        let day = get_day(&db, "2026-01-09").unwrap();
        assert_eq!(day.meals.len(), 4);
        assert_eq!(day.meals[0].entries.len(), 1);
        assert_eq!(day.meals[2].totals.calories, 300.0);
        assert_eq!(day.totals.calories, 450.0);
        assert!((day.progress.calories - 22.5).abs() < 1e-9);
    }

    #[test]
    fn test_delete_and_copy() {
        let db = test_database();
        let logged = log_food(&db, milk(), "2026-01-09", "snack", Portion::Servings(1.0)).unwrap();
        log_food(&db, milk(), "2026-01-09", "lunch", Portion::Servings(1.0)).unwrap();

        let copy = copy_day(&db, None, "2026-01-10", None).unwrap();
        assert_eq!(copy.from_date, parse_date("2026-01-09").unwrap());
        assert_eq!(copy.copied.len(), 2);

        assert!(copy_day(&db, Some("2026-01-05"), "2026-01-10", None).is_err());
        assert!(copy_day(&db, Some("2026-01-10"), "2026-01-10", None).is_err());

        assert!(delete_entry(&db, logged.entry.id).unwrap().success);
        assert!(delete_entry(&db, logged.entry.id).is_err());
    }

    #[test]
    fn test_get_summary() {
        let db = test_database();
        // 13.33 cups of milk: 2000 kcal, on track with the default goal
        log_food(&db, milk(), "2026-01-08", "lunch", Portion::Servings(2000.0 / 150.0)).unwrap();
        log_food(&db, milk(), "2026-01-09", "lunch", Portion::Servings(2.0)).unwrap();

        let weekly = get_summary(&db, "weekly", "2026-01-09").unwrap();
        assert_eq!(weekly.summary.days.len(), 7);
        assert_eq!(weekly.summary.days_with_data, 2);
        assert_eq!(weekly.summary.days_on_track, 1);
        assert_eq!(weekly.summary.streak, 0);

        let monthly = get_summary(&db, "Monthly", "2026-01-09").unwrap();
        assert_eq!(monthly.summary.days.len(), 9);
        assert_eq!(monthly.start_date, parse_date("2026-01-01"));

        assert!(get_summary(&db, "yearly", "2026-01-09").is_err());
    }
}
