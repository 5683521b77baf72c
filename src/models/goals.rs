//! Daily nutrition goals
//!
//! A single row of targets; reads fall back to the defaults until the first set.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};

/// Daily targets for calories and macros (grams)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Goals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub fiber: f64,
}

impl Default for Goals {
    fn default() -> Self {
        Self {
            calories: 2000.0,
            protein: 150.0,
            carbs: 200.0,
            fat: 65.0,
            fiber: 30.0,
        }
    }
}

impl Goals {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            calories: row.get("calories")?,
            protein: row.get("protein")?,
            carbs: row.get("carbs")?,
            fat: row.get("fat")?,
            fiber: row.get("fiber")?,
        })
    }

    /// Current goals, or the defaults when none were ever set
    pub fn get(conn: &Connection) -> DbResult<Self> {
        let mut stmt = conn.prepare("SELECT * FROM goals WHERE id = 1")?;

        match stmt.query_row([], Self::from_row) {
            Ok(goals) => Ok(goals),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Replace the stored goals
    pub fn set(conn: &Connection, goals: &Goals) -> DbResult<Self> {
        let values = [goals.calories, goals.protein, goals.carbs, goals.fat, goals.fiber];
        if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(DbError::InvalidData(
                "goals must be non-negative numbers".to_string(),
            ));
        }

        conn.execute(
            r#"
            INSERT INTO goals (id, calories, protein, carbs, fat, fiber, updated_at)
            VALUES (1, ?1, ?2, ?3, ?4, ?5, datetime('now'))
            ON CONFLICT(id) DO UPDATE SET
                calories = excluded.calories,
                protein = excluded.protein,
                carbs = excluded.carbs,
                fat = excluded.fat,
                fiber = excluded.fiber,
                updated_at = excluded.updated_at
            "#,
            params![goals.calories, goals.protein, goals.carbs, goals.fat, goals.fiber],
        )?;
        tracing::info!(calories = goals.calories, "Updated goals");

        Self::get(conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_database;

    #[test]
    fn test_defaults_until_set() {
        let db = test_database();
        db.with_conn(|conn| {
            assert_eq!(Goals::get(conn)?, Goals::default());

            let custom = Goals {
                calories: 1800.0,
                protein: 140.0,
                carbs: 180.0,
                fat: 60.0,
                fiber: 28.0,
            };
            assert_eq!(Goals::set(conn, &custom)?, custom);

            let again = Goals { calories: 2200.0, ..custom };
            Goals::set(conn, &again)?;
            assert_eq!(Goals::get(conn)?.calories, 2200.0);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_rejects_negative_goal() {
        let db = test_database();
        db.with_conn(|conn| {
            let bad = Goals { fat: -1.0, ..Goals::default() };
            assert!(matches!(Goals::set(conn, &bad), Err(DbError::InvalidData(_))));
            Ok(())
        })
        .unwrap();
    }
}
