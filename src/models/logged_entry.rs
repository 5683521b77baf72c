//! Logged entry model
//!
//! A food eaten on a given day, stored with a snapshot of the food record so
//! later edits to custom foods never rewrite history.

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use super::{FoodRecord, Nutrition};
use crate::db::{DbError, DbResult};
use crate::nutrition::Servings;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Meal slot an entry is filed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealCategory {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealCategory {
    pub const ALL: [MealCategory; 4] = [
        MealCategory::Breakfast,
        MealCategory::Lunch,
        MealCategory::Dinner,
        MealCategory::Snack,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealCategory::Breakfast => "breakfast",
            MealCategory::Lunch => "lunch",
            MealCategory::Dinner => "dinner",
            MealCategory::Snack => "snack",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "breakfast" => Some(MealCategory::Breakfast),
            "lunch" => Some(MealCategory::Lunch),
            "dinner" => Some(MealCategory::Dinner),
            "snack" | "snacks" => Some(MealCategory::Snack),
            _ => None,
        }
    }
}

/// A food logged on a day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggedEntry {
    pub id: i64,
    #[serde(flatten)]
    pub food: FoodRecord,
    /// Number of the food's servings eaten
    pub quantity: Servings,
    pub date: NaiveDate,
    pub meal: MealCategory,
    pub created_at: String,
}

/// Data for logging a food
#[derive(Debug, Clone)]
pub struct LoggedEntryCreate {
    pub food: FoodRecord,
    pub quantity: Servings,
    pub date: NaiveDate,
    pub meal: MealCategory,
}

fn conversion_failure(idx: usize, ty: Type, msg: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, ty, msg.into())
}

pub(crate) fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

impl LoggedEntry {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let date_idx = row.as_ref().column_index("date")?;
        let date_str: String = row.get(date_idx)?;
        let date = parse_date(&date_str).ok_or_else(|| {
            conversion_failure(date_idx, Type::Text, format!("invalid date '{}'", date_str))
        })?;

        let meal_idx = row.as_ref().column_index("meal")?;
        let meal_str: String = row.get(meal_idx)?;
        let meal = MealCategory::from_str(&meal_str).ok_or_else(|| {
            conversion_failure(meal_idx, Type::Text, format!("invalid meal '{}'", meal_str))
        })?;

        let quantity_idx = row.as_ref().column_index("quantity")?;
        let quantity_raw: f64 = row.get(quantity_idx)?;
        let quantity = Servings::new(quantity_raw).ok_or_else(|| {
            conversion_failure(quantity_idx, Type::Real, format!("invalid quantity {}", quantity_raw))
        })?;

        Ok(Self {
            id: row.get("id")?,
            food: FoodRecord::from_row(row)?,
            quantity,
            date,
            meal,
            created_at: row.get("created_at")?,
        })
    }

    /// Nutrition actually eaten: per-serving values times quantity
    pub fn nutrition(&self) -> Nutrition {
        self.food.nutrition.scale(self.quantity.get())
    }

    /// Log a new entry
    pub fn create(conn: &Connection, data: &LoggedEntryCreate) -> DbResult<Self> {
        if !(data.food.serving_size.is_finite() && data.food.serving_size > 0.0) {
            return Err(DbError::InvalidData(format!(
                "serving size must be positive, got {}",
                data.food.serving_size
            )));
        }
        if let Some(field) = data.food.nutrition.invalid_field() {
            return Err(DbError::InvalidData(format!("{} must be a non-negative number", field)));
        }

        let food = &data.food;
        let n = &food.nutrition;
        conn.execute(
            r#"
            INSERT INTO logged_entries (
                source_id, name, brand_name, data_type, serving_size, serving_unit,
                calories, protein, carbs, fat, fiber,
                quantity, date, meal
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            "#,
            params![
                food.source_id.as_str(),
                food.name,
                food.brand_name,
                food.data_type.as_str(),
                food.serving_size,
                food.serving_unit,
                n.calories,
                n.protein,
                n.carbs,
                n.fat,
                n.fiber,
                data.quantity.get(),
                data.date.format(DATE_FORMAT).to_string(),
                data.meal.as_str(),
            ],
        )?;

        let id = conn.last_insert_rowid();
        tracing::info!(id, food = %food.name, date = %data.date, "Logged entry");

        Self::get_by_id(conn, id)?
            .ok_or_else(|| DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Get an entry by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM logged_entries WHERE id = ?1")?;

        match stmt.query_row([id], Self::from_row) {
            Ok(entry) => Ok(Some(entry)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All entries for one day, in logging order
    pub fn list_for_date(conn: &Connection, date: NaiveDate) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM logged_entries WHERE date = ?1 ORDER BY id")?;

        let entries = stmt
            .query_map([date.format(DATE_FORMAT).to_string()], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// All entries from `start` through `end` inclusive
    pub fn list_between(conn: &Connection, start: NaiveDate, end: NaiveDate) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM logged_entries WHERE date >= ?1 AND date <= ?2 ORDER BY date, id",
        )?;

        let entries = stmt
            .query_map(
                params![
                    start.format(DATE_FORMAT).to_string(),
                    end.format(DATE_FORMAT).to_string()
                ],
                Self::from_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// Delete an entry, returning whether it existed
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM logged_entries WHERE id = ?1", [id])?;
        if rows > 0 {
            tracing::info!(id, "Deleted logged entry");
        }
        Ok(rows > 0)
    }

    /// Copy entries from one day onto another
    ///
    /// With `ids` set only those entries of the source day are copied. Meal and
    /// quantity carry over; each copy is a new entry.
    pub fn copy_to_date(
        conn: &mut Connection,
        from: NaiveDate,
        to: NaiveDate,
        ids: Option<&[i64]>,
    ) -> DbResult<Vec<Self>> {
        let tx = conn.transaction()?;

        let source = Self::list_for_date(&tx, from)?;
        let mut copied = Vec::new();
        for entry in source {
            if let Some(ids) = ids {
                if !ids.contains(&entry.id) {
                    continue;
                }
            }
            let data = LoggedEntryCreate {
                food: entry.food,
                quantity: entry.quantity,
                date: to,
                meal: entry.meal,
            };
            copied.push(Self::create(&tx, &data)?);
        }

        tx.commit()?;
        tracing::info!(from = %from, to = %to, count = copied.len(), "Copied entries");

        Ok(copied)
    }

    /// When the entry was logged
    pub fn created_at(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.created_at, TIMESTAMP_FORMAT).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_database;
    use crate::models::{DataType, SourceId};

    fn oats() -> FoodRecord {
        FoodRecord {
            source_id: SourceId::fdc(173904),
            name: "Oats".to_string(),
            brand_name: None,
            nutrition: Nutrition::new(150.0, 5.0, 27.0, 3.0, 4.0),
            serving_size: 40.0,
            serving_unit: "g".to_string(),
            data_type: DataType::SrLegacy,
        }
    }

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    fn log(conn: &Connection, day: &str, meal: MealCategory, quantity: f64) -> LoggedEntry {
        LoggedEntry::create(
            conn,
            &LoggedEntryCreate {
                food: oats(),
                quantity: Servings::new(quantity).unwrap(),
                date: date(day),
                meal,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_meal_category_parsing() {
        assert_eq!(MealCategory::from_str(" Lunch "), Some(MealCategory::Lunch));
        assert_eq!(MealCategory::from_str("snacks"), Some(MealCategory::Snack));
        assert_eq!(MealCategory::from_str("brunch"), None);
    }

    #[test]
    fn test_create_and_read_back() {
        let db = test_database();
        db.with_conn(|conn| {
            let entry = log(conn, "2026-01-09", MealCategory::Breakfast, 1.5);
            assert_eq!(entry.food, oats());
            assert_eq!(entry.meal, MealCategory::Breakfast);
            assert_eq!(entry.date, date("2026-01-09"));
            assert!(entry.created_at().is_some());

            let n = entry.nutrition();
            assert!((n.calories - 225.0).abs() < 1e-9);
            assert!((n.carbs - 40.5).abs() < 1e-9);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_rejects_non_positive_serving_size() {
        let db = test_database();
        db.with_conn(|conn| {
            let mut food = oats();
            food.serving_size = 0.0;
            let result = LoggedEntry::create(
                conn,
                &LoggedEntryCreate {
                    food,
                    quantity: Servings::one(),
                    date: date("2026-01-09"),
                    meal: MealCategory::Snack,
                },
            );
            assert!(matches!(result, Err(DbError::InvalidData(_))));
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_rejects_negative_nutrients() {
        let db = test_database();
        db.with_conn(|conn| {
            let mut food = oats();
            food.nutrition = Nutrition::new(-500.0, -10.0, 0.0, 0.0, 0.0);
            let result = LoggedEntry::create(
                conn,
                &LoggedEntryCreate {
                    food,
                    quantity: Servings::one(),
                    date: date("2026-01-09"),
                    meal: MealCategory::Lunch,
                },
            );
            assert!(matches!(result, Err(DbError::InvalidData(_))));
            assert!(LoggedEntry::list_for_date(conn, date("2026-01-09"))?.is_empty());
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_list_and_delete() {
        let db = test_database();
        db.with_conn(|conn| {
            let first = log(conn, "2026-01-09", MealCategory::Breakfast, 1.0);
            log(conn, "2026-01-09", MealCategory::Dinner, 2.0);
            log(conn, "2026-01-10", MealCategory::Lunch, 1.0);
            log(conn, "2026-01-12", MealCategory::Lunch, 1.0);

            assert_eq!(LoggedEntry::list_for_date(conn, date("2026-01-09"))?.len(), 2);
            let range = LoggedEntry::list_between(conn, date("2026-01-09"), date("2026-01-10"))?;
            assert_eq!(range.len(), 3);

            assert!(LoggedEntry::delete(conn, first.id)?);
            assert!(!LoggedEntry::delete(conn, first.id)?);
            assert_eq!(LoggedEntry::list_for_date(conn, date("2026-01-09"))?.len(), 1);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_copy_to_date() {
        let db = test_database();
        db.with_conn_mut(|conn| {
            let keep = log(conn, "2026-01-09", MealCategory::Breakfast, 1.0);
            log(conn, "2026-01-09", MealCategory::Dinner, 2.0);

            let all = LoggedEntry::copy_to_date(conn, date("2026-01-09"), date("2026-01-10"), None)?;
            assert_eq!(all.len(), 2);
            assert_eq!(all[1].meal, MealCategory::Dinner);
            assert_eq!(all[1].quantity.get(), 2.0);

            let some = LoggedEntry::copy_to_date(
                conn,
                date("2026-01-09"),
                date("2026-01-11"),
                Some(&[keep.id]),
            )?;
            assert_eq!(some.len(), 1);
            assert_eq!(some[0].meal, MealCategory::Breakfast);

            // Source day untouched
            assert_eq!(LoggedEntry::list_for_date(conn, date("2026-01-09"))?.len(), 2);
            Ok(())
        })
        .unwrap();
    }
}
