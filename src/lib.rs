//! Daily meal checklist library
//!
//! This library tracks today's meals, lets them be marked as eaten,
//! quick-adds new ones from free-text input, and derives the running calorie
//! total against a fixed daily target. The collection is written through to a
//! pluggable key-value store on every change.

mod cli;
mod clock;
mod config;
mod errors;
mod form;
mod meal;
mod meal_store;
mod storage;
mod types;

// Re-export key components
pub use cli::*;
pub use clock::*;
pub use config::*;
pub use errors::*;
pub use form::*;
pub use meal::*;
pub use meal_store::*;
pub use storage::*;
pub use types::*;
