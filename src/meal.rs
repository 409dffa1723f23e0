//! Core data structures for the mealcheck application.
//!
//! This module contains the Meal record, the fixed seed collection, and the
//! time-derived id generator used for newly added meals.
use chrono::Utc;
use log::warn;
use serde::{Deserialize, Serialize};

/// Represents a single meal on today's checklist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meal {
    /// Unique identifier within the collection
    pub id: i64,
    /// What was eaten
    pub title: String,
    /// Caloric value
    pub kcal: u32,
    /// Hour slot label, e.g. "7 AM"
    pub time: String,
    /// Macro summary, e.g. "P 17g . C 46g . F 7g"
    pub details: String,
    /// Whether the meal has been consumed today
    pub checked: bool,
}

impl Meal {
    /// Creates an unchecked meal
    pub fn new(
        id: i64,
        title: impl Into<String>,
        kcal: u32,
        time: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Meal {
            id,
            title: title.into(),
            kcal,
            time: time.into(),
            details: details.into(),
            checked: false,
        }
    }
}

/// Formats the macro summary shown under a meal.
pub fn format_details(protein: &str, carbs: &str, fat: &str) -> String {
    format!("P {}g . C {}g . F {}g", protein, carbs, fat)
}

/// The four meals a fresh checklist starts with.
pub fn seed_meals() -> Vec<Meal> {
    vec![
        Meal::new(1, "Leamon water", 0, "6 AM", "P 0 . C 0 . F 0"),
        Meal::new(
            2,
            "2 boiled eggs + 2 medium bananas + 5 almonds",
            310,
            "7 AM",
            "P 17g . C 46g . F 7g",
        ),
        Meal::new(
            3,
            "1 cup cooked white rice (130g) + 1 cup dal (200g) + 1 medium boiled potato",
            430,
            "2 PM",
            "P 28g . C 75g . F 1.5g",
        ),
        Meal::new(
            4,
            "1 cup cooked white rice (130g) + 1 cup dal (200g) + 2 boiled eggs",
            460,
            "2 PM",
            "P 28g . C 75g . F 1.5g",
        ),
    ]
}

/// Issues meal ids from the wall clock in Unix milliseconds.
///
/// Two ids requested within the same millisecond would collide, so every id
/// is at least one greater than the previous one. Once the previous id is
/// `i64::MAX` there is no greater id left, and the clock falls back to the
/// current time.
#[derive(Debug, Clone, Default)]
pub struct IdClock {
    last: i64,
}

impl IdClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// A generator whose ids are all greater than `floor`
    pub fn after(floor: i64) -> Self {
        Self { last: floor }
    }

    pub fn next_id(&mut self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let id = match self.last.checked_add(1) {
            Some(next) => now.max(next),
            None => {
                warn!("Meal id space exhausted after {}, restarting from the clock", self.last);
                now
            }
        };
        self.last = id;
        id
    }
}
