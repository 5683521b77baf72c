//! Recently logged foods
//!
//! A short most-recent-first list for quick re-logging.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use super::FoodRecord;
use crate::db::DbResult;

pub const MAX_RECENT_FOODS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentFood {
    #[serde(flatten)]
    pub food: FoodRecord,
    pub last_added: String,
}

impl RecentFood {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            food: FoodRecord::from_row(row)?,
            last_added: row.get("last_added")?,
        })
    }

    /// Put a food at the front of the list
    ///
    /// A food already present (same source id) moves to the front instead of
    /// appearing twice. The list is trimmed to the newest ten.
    pub fn push(conn: &Connection, food: &FoodRecord) -> DbResult<()> {
        let n = &food.nutrition;
        conn.execute(
            r#"
            INSERT OR REPLACE INTO recent_foods (
                source_id, seq, name, brand_name, data_type, serving_size, serving_unit,
                calories, protein, carbs, fat, fiber, last_added
            )
            VALUES (
                ?1, (SELECT COALESCE(MAX(seq), 0) + 1 FROM recent_foods),
                ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, datetime('now')
            )
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
            ],
        )?;

        conn.execute(
            r#"
            DELETE FROM recent_foods WHERE source_id NOT IN (
                SELECT source_id FROM recent_foods ORDER BY seq DESC LIMIT ?1
            )
            "#,
            [MAX_RECENT_FOODS as i64],
        )?;

        Ok(())
    }

    /// Most recent first
    pub fn list(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM recent_foods ORDER BY seq DESC")?;

        let foods = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(foods)
    }

    pub fn clear(conn: &Connection) -> DbResult<()> {
        conn.execute("DELETE FROM recent_foods", [])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_database;
    use crate::models::{DataType, Nutrition, SourceId};

    fn food(id: i64) -> FoodRecord {
        FoodRecord {
            source_id: SourceId::fdc(id),
            name: format!("Food {}", id),
            brand_name: None,
            nutrition: Nutrition::new(100.0, 5.0, 10.0, 4.0, 1.0),
            serving_size: 100.0,
            serving_unit: "g".to_string(),
            data_type: DataType::Foundation,
        }
    }

    fn ids(foods: &[RecentFood]) -> Vec<String> {
        foods.iter().map(|f| f.food.source_id.to_string()).collect()
    }

    #[test]
    fn test_newest_first_and_dedupe() {
        let db = test_database();
        db.with_conn(|conn| {
            RecentFood::push(conn, &food(1))?;
            RecentFood::push(conn, &food(2))?;
            RecentFood::push(conn, &food(1))?;

            let recent = RecentFood::list(conn)?;
            assert_eq!(ids(&recent), vec!["1", "2"]);
            assert_eq!(recent[0].food, food(1));
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_capped_at_ten() {
        let db = test_database();
        db.with_conn(|conn| {
            for id in 1..=12 {
                RecentFood::push(conn, &food(id))?;
            }
            let recent = RecentFood::list(conn)?;
            assert_eq!(recent.len(), MAX_RECENT_FOODS);
            assert_eq!(ids(&recent)[0], "12");
            assert_eq!(ids(&recent)[9], "3");

            RecentFood::clear(conn)?;
            assert!(RecentFood::list(conn)?.is_empty());
            Ok(())
        })
        .unwrap();
    }
}
