//! Quick-add form: a free-text draft turned into a [`Meal`] on submit.
//!
//! Numeric fields stay raw text while the user types so a half-entered value
//! is never replaced by a default. Parsing happens only in [`QuickAddForm::submit`].
use log::{debug, info};

use crate::{format_details, is_time_slot, IdClock, Meal, SubmitRejection, DEFAULT_MEAL_TIME};

/// The editable fields of a [`QuickAddDraft`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Title,
    Kcal,
    Protein,
    Carbs,
    Fat,
    MealTime,
}

/// Unvalidated form contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickAddDraft {
    pub title: String,
    pub kcal: String,
    pub protein: String,
    pub carbs: String,
    pub fat: String,
    pub meal_time: String,
}

impl Default for QuickAddDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            kcal: String::new(),
            protein: String::new(),
            carbs: String::new(),
            fat: String::new(),
            meal_time: DEFAULT_MEAL_TIME.to_string(),
        }
    }
}

/// Holds the draft and issues ids for the meals it produces.
#[derive(Debug, Clone, Default)]
pub struct QuickAddForm {
    draft: QuickAddDraft,
    ids: IdClock,
}

impl QuickAddForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// A form whose meal ids are all greater than `floor`, typically the
    /// largest id already in the store.
    pub fn with_id_floor(floor: i64) -> Self {
        Self {
            draft: QuickAddDraft::default(),
            ids: IdClock::after(floor),
        }
    }

    pub fn draft(&self) -> &QuickAddDraft {
        &self.draft
    }

    /// Replaces one field. Nothing is validated here.
    pub fn update_field(&mut self, field: DraftField, value: impl Into<String>) -> &QuickAddDraft {
        let value = value.into();
        let slot = match field {
            DraftField::Title => &mut self.draft.title,
            DraftField::Kcal => &mut self.draft.kcal,
            DraftField::Protein => &mut self.draft.protein,
            DraftField::Carbs => &mut self.draft.carbs,
            DraftField::Fat => &mut self.draft.fat,
            DraftField::MealTime => &mut self.draft.meal_time,
        };
        *slot = value;
        &self.draft
    }

    /// Converts the draft into a new unchecked meal and clears the form.
    ///
    /// On rejection the draft is left exactly as it was.
    pub fn submit(&mut self) -> Result<Meal, SubmitRejection> {
        if self.draft.title.trim().is_empty() {
            return Err(SubmitRejection::EmptyTitle);
        }

        let kcal = parse_kcal(&self.draft.kcal).ok_or_else(|| SubmitRejection::UnusableKcal {
            text: self.draft.kcal.clone(),
        })?;

        if !is_time_slot(&self.draft.meal_time) {
            return Err(SubmitRejection::UnknownTimeSlot {
                slot: self.draft.meal_time.clone(),
            });
        }

        let details = format_details(
            &grams(&self.draft.protein),
            &grams(&self.draft.carbs),
            &grams(&self.draft.fat),
        );

        let meal = Meal::new(
            self.ids.next_id(),
            self.draft.title.clone(),
            kcal,
            self.draft.meal_time.clone(),
            details,
        );

        info!("Quick-added meal {} ({} kcal)", meal.id, meal.kcal);
        self.draft = QuickAddDraft::default();
        Ok(meal)
    }
}

/// Non-negative number, fractional part dropped. Blank or anything else is unusable.
fn parse_kcal(text: &str) -> Option<u32> {
    let value: f64 = text.trim().parse().ok()?;
    if !value.is_finite() || value < 0.0 || value > f64::from(u32::MAX) {
        return None;
    }
    Some(value.trunc() as u32)
}

/// Macro grams for the details line; blank or unparseable counts as 0.
fn grams(text: &str) -> String {
    let text = text.trim();
    if text.is_empty() {
        return "0".to_string();
    }

    match text.parse::<f64>() {
        // abs() folds "-0" into 0
        Ok(value) if value.is_finite() && value >= 0.0 => value.abs().to_string(),
        _ => {
            debug!("Ignoring unusable macro value {:?}", text);
            "0".to_string()
        }
    }
}
