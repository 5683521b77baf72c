//! Shared nutrition data structure
//!
//! Used by food records, logged entries and daily totals.

use serde::{Deserialize, Serialize};

/// Nutritional information for one serving (or a sum of servings)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    pub calories: f64,
    pub protein: f64, // grams
    pub carbs: f64,   // grams
    pub fat: f64,     // grams
    #[serde(default)]
    pub fiber: f64, // grams
}

impl Nutrition {
    pub fn new(calories: f64, protein: f64, carbs: f64, fat: f64, fiber: f64) -> Self {
        Self { calories, protein, carbs, fat, fiber }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Scale nutrition values by a multiplier
    pub fn scale(&self, multiplier: f64) -> Self {
        Self {
            calories: self.calories * multiplier,
            protein: self.protein * multiplier,
            carbs: self.carbs * multiplier,
            fat: self.fat * multiplier,
            fiber: self.fiber * multiplier,
        }
    }

    /// Add another nutrition to this one
    pub fn add(&self, other: &Nutrition) -> Self {
        Self {
            calories: self.calories + other.calories,
            protein: self.protein + other.protein,
            carbs: self.carbs + other.carbs,
            fat: self.fat + other.fat,
            fiber: self.fiber + other.fiber,
        }
    }

    /// Display rounding: whole calories, macros to one decimal
    ///
    /// Only for presentation; stored values keep full precision.
    pub fn rounded(&self) -> Self {
        let one_decimal = |v: f64| (v * 10.0).round() / 10.0;
        Self {
            calories: self.calories.round(),
            protein: one_decimal(self.protein),
            carbs: one_decimal(self.carbs),
            fat: one_decimal(self.fat),
            fiber: one_decimal(self.fiber),
        }
    }

    /// First field that is negative or not a finite number
    pub fn invalid_field(&self) -> Option<&'static str> {
        [
            ("calories", self.calories),
            ("protein", self.protein),
            ("carbs", self.carbs),
            ("fat", self.fat),
            ("fiber", self.fiber),
        ]
        .into_iter()
        .find(|(_, value)| !(value.is_finite() && *value >= 0.0))
        .map(|(field, _)| field)
    }

    /// True when no calorie or macro data was reported at all
    pub fn is_empty(&self) -> bool {
        self.calories == 0.0 && self.protein == 0.0 && self.carbs == 0.0 && self.fat == 0.0
    }
}

impl std::ops::Add for Nutrition {
    type Output = Nutrition;

    fn add(self, other: Nutrition) -> Nutrition {
        Nutrition::add(&self, &other)
    }
}

impl std::ops::Mul<f64> for Nutrition {
    type Output = Nutrition;

    fn mul(self, multiplier: f64) -> Nutrition {
        self.scale(multiplier)
    }
}

impl std::iter::Sum for Nutrition {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Nutrition::zero(), |acc, n| acc + n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_and_sum() {
        let apple = Nutrition::new(52.0, 0.3, 14.0, 0.2, 2.4);
        let total: Nutrition = vec![apple, apple * 0.5].into_iter().sum();
        assert!((total.calories - 78.0).abs() < 1e-9);
        assert!((total.fiber - 3.6).abs() < 1e-9);
    }

    #[test]
    fn test_rounded() {
        let n = Nutrition::new(156.4, 12.345, 0.04, 9.96, 1.25).rounded();
        assert_eq!(n.calories, 156.0);
        assert_eq!(n.protein, 12.3);
        assert_eq!(n.carbs, 0.0);
        assert_eq!(n.fat, 10.0);
    }

    #[test]
    fn test_invalid_field() {
        assert_eq!(Nutrition::new(52.0, 0.3, 14.0, 0.2, 2.4).invalid_field(), None);
        assert_eq!(Nutrition::new(-500.0, -10.0, 0.0, 0.0, 0.0).invalid_field(), Some("calories"));
        assert_eq!(Nutrition::new(10.0, 1.0, 1.0, 1.0, f64::NAN).invalid_field(), Some("fiber"));
    }

    #[test]
    fn test_is_empty_ignores_fiber() {
        assert!(Nutrition::new(0.0, 0.0, 0.0, 0.0, 3.0).is_empty());
        assert!(!Nutrition::new(1.0, 0.0, 0.0, 0.0, 0.0).is_empty());
    }
}
