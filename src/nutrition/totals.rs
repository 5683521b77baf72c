//! Daily totals, goal progress and period summaries

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::models::{Goals, LoggedEntry, Nutrition};

/// On-track window around the calorie goal
const ON_TRACK_LOW: f64 = 0.9;
const ON_TRACK_HIGH: f64 = 1.1;

/// Sum of everything logged on `date`
pub fn daily_totals(entries: &[LoggedEntry], date: NaiveDate) -> Nutrition {
    entries
        .iter()
        .filter(|e| e.date == date)
        .map(LoggedEntry::nutrition)
        .sum()
}

/// Percent of each goal reached; a zero goal reports 0
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Progress {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub fiber: f64,
}

pub fn progress(totals: &Nutrition, goals: &Goals) -> Progress {
    let pct = |value: f64, goal: f64| if goal > 0.0 { value / goal * 100.0 } else { 0.0 };
    Progress {
        calories: pct(totals.calories, goals.calories),
        protein: pct(totals.protein, goals.protein),
        carbs: pct(totals.carbs, goals.carbs),
        fat: pct(totals.fat, goals.fat),
        fiber: pct(totals.fiber, goals.fiber),
    }
}

/// One day of a period summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub totals: Nutrition,
    pub has_data: bool,
    pub on_track: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodSummary {
    pub days: Vec<DaySummary>,
    pub days_with_data: usize,
    /// Per-day averages over days with data, rounded to whole numbers
    pub average: Nutrition,
    pub total_calories: f64,
    pub days_on_track: usize,
    pub highest_day: Option<DaySummary>,
    pub lowest_day: Option<DaySummary>,
    pub streak: usize,
}

fn summarize_day(entries: &[LoggedEntry], goals: &Goals, date: NaiveDate) -> DaySummary {
    let totals = daily_totals(entries, date);
    let has_data = totals.calories > 0.0;
    let on_track = has_data
        && totals.calories >= goals.calories * ON_TRACK_LOW
        && totals.calories <= goals.calories * ON_TRACK_HIGH;
    DaySummary { date, totals, has_data, on_track }
}

/// Summarize `dates` (oldest first)
///
/// A day counts as having data when it has calories. The streak counts back
/// from the last date: days without data are skipped, a logged day off track
/// ends it.
pub fn period_summary(entries: &[LoggedEntry], goals: &Goals, dates: &[NaiveDate]) -> PeriodSummary {
    let days: Vec<DaySummary> = dates
        .iter()
        .map(|date| summarize_day(entries, goals, *date))
        .collect();

    let with_data: Vec<&DaySummary> = days.iter().filter(|d| d.has_data).collect();
    let count = with_data.len();

    if count == 0 {
        return PeriodSummary {
            days,
            days_with_data: 0,
            average: Nutrition::zero(),
            total_calories: 0.0,
            days_on_track: 0,
            highest_day: None,
            lowest_day: None,
            streak: 0,
        };
    }

    let sum: Nutrition = with_data.iter().map(|d| d.totals).sum();
    let n = count as f64;
    let average = Nutrition {
        calories: (sum.calories / n).round(),
        protein: (sum.protein / n).round(),
        carbs: (sum.carbs / n).round(),
        fat: (sum.fat / n).round(),
        fiber: (sum.fiber / n).round(),
    };

    // First day wins ties
    let mut highest = with_data[0];
    let mut lowest = with_data[0];
    for &day in &with_data {
        if day.totals.calories > highest.totals.calories {
            highest = day;
        }
        if day.totals.calories < lowest.totals.calories {
            lowest = day;
        }
    }

    let mut streak = 0;
    for day in days.iter().rev() {
        if day.on_track {
            streak += 1;
        } else if day.has_data {
            break;
        }
    }

    PeriodSummary {
        days_with_data: count,
        average,
        total_calories: sum.calories.round(),
        days_on_track: with_data.iter().filter(|d| d.on_track).count(),
        highest_day: Some(highest.clone()),
        lowest_day: Some(lowest.clone()),
        streak,
        days,
    }
}

/// The seven days ending on `end`, oldest first
pub fn week_ending(end: NaiveDate) -> Vec<NaiveDate> {
    (0..7).rev().map(|i| end - Duration::days(i)).collect()
}

/// The month of `date` from its first day through `date` itself
pub fn month_of(date: NaiveDate) -> Vec<NaiveDate> {
    let first = date.with_day(1).unwrap_or(date);
    first
        .iter_days()
        .take_while(|d| *d <= date)
        .collect()
}
