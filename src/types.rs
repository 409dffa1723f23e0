//! Shared types for the mealcheck application.
//!
//! This module contains the crate-wide Result alias, the fixed calorie target,
//! the enumerated meal time slots, and the CLI subcommands.
use clap::Subcommand;

use crate::MealError;

/// A specialized Result type for mealcheck operations.
pub type Result<T> = std::result::Result<T, MealError>;

/// The daily calorie goal consumed totals are compared against.
pub const TARGET_KCAL: u32 = 1200;

/// Key the meal collection is stored under in the persistence collaborator.
pub const MEALS_KEY: &str = "meals";

/// Slot preselected in a fresh quick-add draft.
pub const DEFAULT_MEAL_TIME: &str = "7 AM";

/// The 24 hour-labelled time slots, in display order.
pub const TIME_SLOTS: [&str; 24] = [
    "12 AM", "1 AM", "2 AM", "3 AM", "4 AM", "5 AM", "6 AM", "7 AM", "8 AM", "9 AM", "10 AM",
    "11 AM", "12 PM", "1 PM", "2 PM", "3 PM", "4 PM", "5 PM", "6 PM", "7 PM", "8 PM", "9 PM",
    "10 PM", "11 PM",
];

/// Returns true if `label` is one of [`TIME_SLOTS`].
pub fn is_time_slot(label: &str) -> bool {
    TIME_SLOTS.contains(&label)
}

/// Available subcommands for the mealcheck application
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show today's meals and the calorie totals
    List {
        /// Format output as JSON
        #[clap(short, long)]
        json: bool,
    },

    /// Quick-add a new meal
    Add {
        /// What was eaten
        title: String,

        /// Calories
        #[clap(short, long)]
        kcal: String,

        /// Protein in grams
        #[clap(short, long)]
        protein: Option<String>,

        /// Carbohydrates in grams
        #[clap(short, long)]
        carbs: Option<String>,

        /// Fat in grams
        #[clap(short, long)]
        fat: Option<String>,

        /// Meal time slot, e.g. "7 AM"
        #[clap(short, long)]
        time: Option<String>,
    },

    /// Mark a meal consumed, or un-mark it
    Toggle {
        /// ID of the meal to toggle
        id: i64,
    },

    /// Delete a meal by ID
    Delete {
        /// ID of the meal to delete
        id: i64,

        /// Skip confirmation prompt
        #[clap(short, long)]
        force: bool,
    },

    /// List the available meal time slots
    Slots,

    /// Show a live greeting and clock
    Clock {
        /// Stop after this many ticks instead of waiting for Ctrl-C
        #[clap(short = 'n', long)]
        ticks: Option<u32>,
    },

    /// Show the effective configuration
    Config,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_slots_run_midnight_to_eleven_pm() {
        assert_eq!(TIME_SLOTS.len(), 24);
        assert_eq!(TIME_SLOTS[0], "12 AM");
        assert_eq!(TIME_SLOTS[12], "12 PM");
        assert_eq!(TIME_SLOTS[23], "11 PM");
    }

    #[test]
    fn default_meal_time_is_a_slot() {
        assert!(is_time_slot(DEFAULT_MEAL_TIME));
        assert!(!is_time_slot("7AM"));
        assert!(!is_time_slot("13 PM"));
    }
}
