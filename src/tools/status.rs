//! Macrolog Status Tool
//!
//! Provides runtime status information about the Macrolog service.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;

/// Food logging instructions for AI assistants
pub const LOGGING_INSTRUCTIONS: &str = r#"
# Macrolog Food Logging Instructions

Macrolog normalizes food search results, checks them for plausibility and keeps
a daily food log against nutrition goals.

## Finding a food

1. Fetch `/foods/search?query=...&pageSize=25` from USDA FoodData Central.
2. Pass the raw JSON body and the user's query to `search_foods`.
3. Results come back validated and ranked. Records whose calories contradict
   their macros are dropped (`filtered_out` tells you how many).
4. Each result has a `confidence` from 0 to 100. Prefer high-confidence
   Foundation or SR Legacy entries for generic foods.

For a scanned product, fetch
`https://world.openfoodfacts.org/api/v0/product/<barcode>.json` and pass the
body to `lookup_barcode`. Barcode foods always have a 100 g serving.

If nothing fits, create the food with `add_custom_food`. Custom foods are saved
even when the values look implausible; the response says why they look off.

## Logging

`log_food` takes the food record exactly as returned by search, a date
(YYYY-MM-DD), a meal (breakfast, lunch, dinner, snack) and EITHER:

- `servings`: multiples of the food's own serving, or
- `amount` + `unit`: e.g. 150 g, 2 tbsp, 1 cup.

Amounts are converted into the food's serving unit. Weight and volume never
convert into each other: logging "100 g" of a food measured in cups is refused.
Use `compatible_units` to see which units a food accepts and
`portion_presets` for common portions.

## Reviewing

- `get_day`: entries by meal, totals and progress against goals
- `get_summary`: weekly (7 days ending on a date) or monthly (month to date)
  averages, days on track (90-110% of the calorie goal) and the current streak
- `copy_day`: repeat yesterday's (or any day's) foods on another day
- `list_recent_foods`: the last ten distinct foods logged

## Goals

`get_goals` / `set_goals` read and change the daily targets. `calculate_goals`
derives them from weight, height, age, sex, activity level and a goal preset
(weightLoss, muscleGain, maintenance, balanced); pass `save: true` to store them.
"#;

/// Status information returned by macrolog_status
#[derive(Debug, Serialize)]
pub struct MacrologStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Database information
    pub database_path: String,
    pub database_size_bytes: Option<u64>,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
}

impl StatusTracker {
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
        }
    }

    /// Get the current status
    pub fn get_status(&self) -> MacrologStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        MacrologStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
