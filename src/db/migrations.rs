//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
        tracing::info!("Applied schema migration v1");
    }

    Ok(())
}

/// Migration v1: Initial schema
///
/// Food columns are denormalized into every table: a logged entry keeps the
/// food exactly as it was when logged, whatever happens to the source later.
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- LOGGED ENTRIES
        -- What was eaten, in servings of the food
        -- ============================================
        CREATE TABLE logged_entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            source_id TEXT NOT NULL,
            name TEXT NOT NULL,
            brand_name TEXT,
            data_type TEXT NOT NULL,
            serving_size REAL NOT NULL CHECK(serving_size > 0),
            serving_unit TEXT NOT NULL,

            -- Nutrition per serving
            calories REAL NOT NULL DEFAULT 0,
            protein REAL NOT NULL DEFAULT 0,
            carbs REAL NOT NULL DEFAULT 0,
            fat REAL NOT NULL DEFAULT 0,
            fiber REAL NOT NULL DEFAULT 0,

            quantity REAL NOT NULL CHECK(quantity > 0),   -- number of servings
            date TEXT NOT NULL,                           -- ISO date: "2026-01-09"
            meal TEXT NOT NULL CHECK(meal IN ('breakfast', 'lunch', 'dinner', 'snack')),
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_logged_entries_date ON logged_entries(date);

        -- ============================================
        -- GOALS
        -- Single row of daily targets
        -- ============================================
        CREATE TABLE goals (
            id INTEGER PRIMARY KEY CHECK(id = 1),
            calories REAL NOT NULL,
            protein REAL NOT NULL,
            carbs REAL NOT NULL,
            fat REAL NOT NULL,
            fiber REAL NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- ============================================
        -- RECENT FOODS
        -- Most recently logged foods, newest = highest seq
        -- ============================================
        CREATE TABLE recent_foods (
            source_id TEXT PRIMARY KEY,
            seq INTEGER NOT NULL,
            name TEXT NOT NULL,
            brand_name TEXT,
            data_type TEXT NOT NULL,
            serving_size REAL NOT NULL,
            serving_unit TEXT NOT NULL,
            calories REAL NOT NULL DEFAULT 0,
            protein REAL NOT NULL DEFAULT 0,
            carbs REAL NOT NULL DEFAULT 0,
            fat REAL NOT NULL DEFAULT 0,
            fiber REAL NOT NULL DEFAULT 0,
            last_added TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- ============================================
        -- CUSTOM FOODS
        -- User-entered foods, newest = highest seq
        -- ============================================
        CREATE TABLE custom_foods (
            source_id TEXT PRIMARY KEY CHECK(source_id LIKE 'custom-%'),
            seq INTEGER NOT NULL,
            name TEXT NOT NULL,
            brand_name TEXT,
            data_type TEXT NOT NULL,
            serving_size REAL NOT NULL,
            serving_unit TEXT NOT NULL,
            calories REAL NOT NULL DEFAULT 0,
            protein REAL NOT NULL DEFAULT 0,
            carbs REAL NOT NULL DEFAULT 0,
            fat REAL NOT NULL DEFAULT 0,
            fiber REAL NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT
        );
        "#,
    )?;

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

/// Check if the database needs migration
pub fn needs_migration(conn: &Connection) -> DbResult<bool> {
    let current = get_schema_version(conn)?;
    Ok(current < SCHEMA_VERSION)
}
