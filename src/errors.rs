//! Error types for the mealcheck application.
//!
//! This module defines custom error types that categorize the failures that
//! can occur while loading, mutating, and persisting the meal checklist.

use std::{io, path::PathBuf};

use thiserror::Error;

/// The main error type for the mealcheck application.
#[derive(Error, Debug)]
pub enum MealError {
    /// Errors related to file I/O operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Errors related to serialization/deserialization operations.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The persisted meal collection could not be parsed.
    #[error("Persisted meals are unreadable: {message}")]
    CorruptState { message: String },

    /// Directory creation or access failed.
    #[error("Failed to create or access directory: {path}")]
    DirectoryError { path: PathBuf },

    /// Errors related to configuration.
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// The quick-add form declined to produce a meal.
    #[error("Quick add rejected: {0}")]
    Rejected(#[from] SubmitRejection),

    /// Errors from the clock ticker task.
    #[error("Clock error: {message}")]
    ClockError { message: String },

    /// Generic application error with a custom message.
    #[error("{message}")]
    ApplicationError { message: String },
}

/// Why a quick-add submission produced no meal.
///
/// These are recoverable: the draft is left untouched for correction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitRejection {
    #[error("a title is required")]
    EmptyTitle,

    #[error("calories must be a non-negative number, got {text:?}")]
    UnusableKcal { text: String },

    #[error("unknown meal time {slot:?}")]
    UnknownTimeSlot { slot: String },
}
