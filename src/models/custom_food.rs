//! Custom food model
//!
//! User-entered foods. Ids carry the `custom-` prefix; new foods go to the front
//! of the list and an update keeps the food where it was.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use super::{DataType, FoodRecord};
use crate::db::{DbError, DbResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomFood {
    #[serde(flatten)]
    pub food: FoodRecord,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl CustomFood {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            food: FoodRecord::from_row(row)?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Insert a new custom food or update one with the same id
    pub fn upsert(conn: &Connection, food: &FoodRecord) -> DbResult<Self> {
        if !food.source_id.is_custom() {
            return Err(DbError::InvalidData(format!(
                "custom food id must start with 'custom-', got '{}'",
                food.source_id
            )));
        }
        if food.name.trim().is_empty() {
            return Err(DbError::InvalidData("custom food needs a name".to_string()));
        }

        let n = &food.nutrition;
        let updated = conn.execute(
            r#"
            UPDATE custom_foods SET
                name = ?2, brand_name = ?3, serving_size = ?4, serving_unit = ?5,
                calories = ?6, protein = ?7, carbs = ?8, fat = ?9, fiber = ?10,
                updated_at = datetime('now')
            WHERE source_id = ?1
            "#,
            params![
                food.source_id.as_str(),
                food.name,
                food.brand_name,
                food.serving_size,
                food.serving_unit,
                n.calories,
                n.protein,
                n.carbs,
                n.fat,
                n.fiber,
            ],
        )?;

        if updated == 0 {
            conn.execute(
                r#"
                INSERT INTO custom_foods (
                    source_id, seq, name, brand_name, data_type, serving_size, serving_unit,
                    calories, protein, carbs, fat, fiber
                )
                VALUES (
                    ?1, (SELECT COALESCE(MAX(seq), 0) + 1 FROM custom_foods),
                    ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11
                )
                "#,
                params![
                    food.source_id.as_str(),
                    food.name,
                    food.brand_name,
                    DataType::Custom.as_str(),
                    food.serving_size,
                    food.serving_unit,
                    n.calories,
                    n.protein,
                    n.carbs,
                    n.fat,
                    n.fiber,
                ],
            )?;
            tracing::info!(id = %food.source_id, name = %food.name, "Added custom food");
        } else {
            tracing::info!(id = %food.source_id, name = %food.name, "Updated custom food");
        }

        Self::get_by_id(conn, food.source_id.as_str())?
            .ok_or_else(|| DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    pub fn get_by_id(conn: &Connection, source_id: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM custom_foods WHERE source_id = ?1")?;

        match stmt.query_row([source_id], Self::from_row) {
            Ok(food) => Ok(Some(food)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All custom foods, newest first
    pub fn list(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM custom_foods ORDER BY seq DESC")?;

        let foods = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(foods)
    }

    /// Case-insensitive substring search on the name; a blank query lists all
    pub fn search(conn: &Connection, query: &str) -> DbResult<Vec<Self>> {
        let query = query.trim().to_lowercase();
        let foods = Self::list(conn)?;

        if query.is_empty() {
            return Ok(foods);
        }

        Ok(foods
            .into_iter()
            .filter(|f| f.food.name.to_lowercase().contains(&query))
            .collect())
    }

    pub fn delete(conn: &Connection, source_id: &str) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM custom_foods WHERE source_id = ?1", [source_id])?;
        if rows > 0 {
            tracing::info!(id = source_id, "Deleted custom food");
        }
        Ok(rows > 0)
    }

    pub fn clear(conn: &Connection) -> DbResult<()> {
        conn.execute("DELETE FROM custom_foods", [])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_database;
    use crate::models::{Nutrition, SourceId};

    fn custom(millis: i64, name: &str) -> FoodRecord {
        FoodRecord {
            source_id: SourceId::custom(millis),
            name: name.to_string(),
            brand_name: None,
            nutrition: Nutrition::new(250.0, 20.0, 10.0, 14.0, 2.0),
            serving_size: 1.0,
            serving_unit: "cup".to_string(),
            data_type: DataType::Custom,
        }
    }

    fn names(foods: &[CustomFood]) -> Vec<&str> {
        foods.iter().map(|f| f.food.name.as_str()).collect()
    }

    #[test]
    fn test_new_foods_first_updates_keep_position() {
        let db = test_database();
        db.with_conn(|conn| {
            CustomFood::upsert(conn, &custom(1, "Grandma's chili"))?;
            CustomFood::upsert(conn, &custom(2, "Protein shake"))?;
            assert_eq!(names(&CustomFood::list(conn)?), vec!["Protein shake", "Grandma's chili"]);

            let edited = CustomFood::upsert(conn, &custom(1, "Grandma's beef chili"))?;
            assert!(edited.updated_at.is_some());
            assert_eq!(
                names(&CustomFood::list(conn)?),
                vec!["Protein shake", "Grandma's beef chili"]
            );
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_search() {
        let db = test_database();
        db.with_conn(|conn| {
            CustomFood::upsert(conn, &custom(1, "Grandma's Chili"))?;
            CustomFood::upsert(conn, &custom(2, "Protein shake"))?;

            assert_eq!(names(&CustomFood::search(conn, "  CHILI ")?), vec!["Grandma's Chili"]);
            assert_eq!(CustomFood::search(conn, "")?.len(), 2);
            assert!(CustomFood::search(conn, "pizza")?.is_empty());
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_rejects_non_custom_id() {
        let db = test_database();
        db.with_conn(|conn| {
            let mut food = custom(1, "Chili");
            food.source_id = SourceId::fdc(42);
            assert!(matches!(CustomFood::upsert(conn, &food), Err(DbError::InvalidData(_))));
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_delete_and_clear() {
        let db = test_database();
        db.with_conn(|conn| {
            let chili = CustomFood::upsert(conn, &custom(1, "Chili"))?;
            CustomFood::upsert(conn, &custom(2, "Shake"))?;

            assert!(CustomFood::delete(conn, chili.food.source_id.as_str())?);
            assert!(!CustomFood::delete(conn, chili.food.source_id.as_str())?);
            assert_eq!(CustomFood::list(conn)?.len(), 1);

            CustomFood::clear(conn)?;
            assert!(CustomFood::list(conn)?.is_empty());
            Ok(())
        })
        .unwrap();
    }
}
