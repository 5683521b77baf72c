//! Data models
//!
//! Rust structs representing foods, logged entries and stored state.

mod custom_food;
mod food_record;
mod goals;
mod logged_entry;
mod nutrition;
mod recent_food;

pub use custom_food::CustomFood;
pub use food_record::{DataType, FoodRecord, SourceId, BARCODE_PREFIX, CUSTOM_PREFIX};
pub use goals::Goals;
pub use logged_entry::{LoggedEntry, LoggedEntryCreate, MealCategory, DATE_FORMAT};
pub(crate) use logged_entry::parse_date;
pub use nutrition::Nutrition;
pub use recent_food::{RecentFood, MAX_RECENT_FOODS};
