//! Nutrition pipeline
//!
//! Unit normalization and conversion, plausibility validation, search ranking,
//! portion presets, totals and goal calculators.

pub mod converter;
pub mod presets;
pub mod ranking;
pub mod targets;
pub mod totals;
pub mod units;
pub mod validator;

pub use converter::{
    compatible_units, convert, format_conversion_factor, servings_for_amount, to_base_amount,
    Amount, Servings,
};
pub use presets::{portion_presets, presets_for_serving, step_size, PortionPreset};
pub use ranking::{rank, relevance_score, QueryTerms};
pub use targets::{
    bmr, calculate_goals, calorie_target, macro_targets, tdee, ActivityLevel, GoalCalculation,
    GoalPreset, Sex,
};
pub use totals::{
    daily_totals, month_of, period_summary, progress, week_ending, DaySummary, PeriodSummary,
    Progress,
};
pub use units::{
    categorize_unit, grams_per_unit, is_volume_unit, is_weight_unit, ml_per_unit, normalize,
    normalize_or_default, Dimension, Unit,
};
pub use validator::{confidence, filter_valid, validate, validate_record, Implausibility, Validation};
