//! Owns today's meal checklist and keeps it written through to a
//! [`KeyValueStore`].
//!
//! Totals are never stored; they are recomputed from the meals on every call.
use log::{debug, info, warn};

use crate::{seed_meals, KeyValueStore, Meal, MealError, Result, MEALS_KEY};

/// What to do when the persisted collection cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnCorrupt {
    /// Surface [`MealError::CorruptState`] to the caller
    #[default]
    Fail,
    /// Log a warning and start again from the seed meals
    Reseed,
}

/// Parses a persisted collection, or returns the seed meals when there is none.
///
/// The parsed collection is adopted as-is; no migration or sanitizing.
pub fn initialize_meals(persisted: Option<&str>) -> Result<Vec<Meal>> {
    match persisted {
        Some(raw) => serde_json::from_str(raw).map_err(|e| MealError::CorruptState {
            message: e.to_string(),
        }),
        None => Ok(seed_meals()),
    }
}

/// Encodes a collection the way [`initialize_meals`] reads it back.
pub fn serialize_meals(meals: &[Meal]) -> Result<String> {
    Ok(serde_json::to_string(meals)?)
}

/// The ordered meal collection plus its persistence collaborator.
pub struct MealStore<S: KeyValueStore> {
    backend: S,
    meals: Vec<Meal>,
}

impl<S: KeyValueStore> MealStore<S> {
    /// Loads the collection stored under [`MEALS_KEY`] (or the seed meals on
    /// first run) and writes it back once.
    pub fn open(backend: S, on_corrupt: OnCorrupt) -> Result<Self> {
        let persisted = backend.get(MEALS_KEY)?;
        if persisted.is_none() {
            info!("No saved meals found, starting from the default checklist");
        }

        let meals = match initialize_meals(persisted.as_deref()) {
            Ok(meals) => meals,
            Err(MealError::CorruptState { message }) if on_corrupt == OnCorrupt::Reseed => {
                warn!("Discarding unreadable saved meals ({}), reseeding", message);
                seed_meals()
            }
            Err(e) => return Err(e),
        };

        let mut store = Self { backend, meals };
        store.persist()?;
        info!("Meal store ready with {} meals", store.meals.len());
        Ok(store)
    }

    /// Read-only view of the meals in display order
    pub fn meals(&self) -> &[Meal] {
        &self.meals
    }

    pub fn get(&self, id: i64) -> Option<&Meal> {
        self.meals.iter().find(|meal| meal.id == id)
    }

    pub fn len(&self) -> usize {
        self.meals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meals.is_empty()
    }

    /// Largest id in the collection, 0 when empty
    pub fn max_id(&self) -> i64 {
        self.meals.iter().map(|meal| meal.id).max().unwrap_or(0)
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Appends `meal`; the caller is responsible for a fresh id.
    pub fn add(&mut self, meal: Meal) -> Result<&[Meal]> {
        if self.get(meal.id).is_some() {
            warn!("Adding meal with an id already in use: {}", meal.id);
        }

        debug!("Adding meal {} ({} kcal)", meal.id, meal.kcal);
        self.meals.push(meal);
        self.persist()?;
        Ok(&self.meals)
    }

    /// Flips `checked` on the meal with `id`. Unknown ids change nothing.
    pub fn toggle(&mut self, id: i64) -> Result<&[Meal]> {
        match self.meals.iter_mut().find(|meal| meal.id == id) {
            Some(meal) => {
                meal.checked = !meal.checked;
                debug!("Meal {} checked = {}", id, meal.checked);
                self.persist()?;
            }
            None => debug!("Toggle ignored, no meal with id {}", id),
        }
        Ok(&self.meals)
    }

    /// Removes the meal with `id`. Unknown ids change nothing.
    ///
    /// No confirmation happens here; callers gate this behind their own prompt.
    pub fn delete(&mut self, id: i64) -> Result<&[Meal]> {
        let before = self.meals.len();
        self.meals.retain(|meal| meal.id != id);

        if self.meals.len() == before {
            debug!("Delete ignored, no meal with id {}", id);
        } else {
            debug!("Deleted meal {}", id);
            self.persist()?;
        }
        Ok(&self.meals)
    }

    /// Sum of `kcal` over the checked meals
    pub fn total_consumed_kcal(&self) -> u64 {
        self.meals
            .iter()
            .filter(|meal| meal.checked)
            .map(|meal| u64::from(meal.kcal))
            .sum()
    }

    /// `target - total_consumed_kcal()`; negative once the target is exceeded
    pub fn remaining_kcal(&self, target: u32) -> i64 {
        i64::from(target) - self.total_consumed_kcal() as i64
    }

    /// Writes the whole collection under [`MEALS_KEY`].
    pub fn persist(&mut self) -> Result<()> {
        let encoded = serialize_meals(&self.meals)?;
        self.backend.set(MEALS_KEY, encoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryStore, TARGET_KCAL};
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    fn seeded() -> MealStore<MemoryStore> {
        MealStore::open(MemoryStore::new(), OnCorrupt::Fail).unwrap()
    }

    fn extra(id: i64, kcal: u32) -> Meal {
        Meal::new(id, "Tea", kcal, "6 AM", "P 0g . C 0g . F 0g")
    }

    #[test]
    fn first_run_seeds_and_persists() {
        let store = seeded();
        assert_eq!(store.meals(), seed_meals().as_slice());
        assert_eq!(store.backend().writes(), 1);

        let saved = store.backend().get(MEALS_KEY).unwrap().unwrap();
        assert_eq!(initialize_meals(Some(&saved)).unwrap(), seed_meals());
    }

    #[test]
    fn persisted_collection_is_adopted_verbatim() {
        let mut meals = vec![extra(42, 80)];
        meals[0].checked = true;
        let backend = MemoryStore::with_value(MEALS_KEY, serialize_meals(&meals).unwrap());

        let store = MealStore::open(backend, OnCorrupt::Fail).unwrap();
        assert_eq!(store.meals(), meals.as_slice());
        assert_eq!(store.total_consumed_kcal(), 80);
    }

    #[test]
    fn empty_persisted_collection_is_not_reseeded() {
        let backend = MemoryStore::with_value(MEALS_KEY, "[]");
        let store = MealStore::open(backend, OnCorrupt::Fail).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.max_id(), 0);
    }

    #[test]
    fn corrupt_state_fails_by_default() {
        let backend = MemoryStore::with_value(MEALS_KEY, "{not json");
        let result = MealStore::open(backend, OnCorrupt::Fail);
        assert!(matches!(result, Err(MealError::CorruptState { .. })));
    }

    #[test]
    fn corrupt_state_can_reseed() {
        let backend = MemoryStore::with_value(MEALS_KEY, r#"[{"id":1,"kcal":null}]"#);
        let store = MealStore::open(backend, OnCorrupt::Reseed).unwrap();
        assert_eq!(store.meals(), seed_meals().as_slice());

        let saved = store.backend().get(MEALS_KEY).unwrap().unwrap();
        assert_eq!(initialize_meals(Some(&saved)).unwrap(), seed_meals());
    }

    #[test]
    fn seed_scenario() {
        let mut store = seeded();
        assert_eq!(store.total_consumed_kcal(), 0);
        assert_eq!(store.remaining_kcal(TARGET_KCAL), 1200);

        store.toggle(2).unwrap();
        assert_eq!(store.total_consumed_kcal(), 310);
        assert_eq!(store.remaining_kcal(TARGET_KCAL), 890);

        let meals = store.delete(3).unwrap();
        assert_eq!(meals.len(), 3);
        assert!(meals.iter().all(|m| m.id != 3));
        assert_eq!(store.total_consumed_kcal(), 310);
    }

    #[test]
    fn toggle_moves_total_by_exactly_kcal() {
        let mut store = seeded();
        for meal in seed_meals() {
            let before = store.total_consumed_kcal();
            store.toggle(meal.id).unwrap();
            assert_eq!(store.total_consumed_kcal(), before + u64::from(meal.kcal));
        }
        for meal in seed_meals() {
            let before = store.total_consumed_kcal();
            store.toggle(meal.id).unwrap();
            assert_eq!(store.total_consumed_kcal(), before - u64::from(meal.kcal));
        }
        assert_eq!(store.total_consumed_kcal(), 0);
    }

    #[test]
    fn total_matches_checked_sum() {
        let mut store = seeded();
        store.add(extra(10, 95)).unwrap();
        store.toggle(10).unwrap();
        store.toggle(4).unwrap();

        let expected: u64 = store
            .meals()
            .iter()
            .filter(|m| m.checked)
            .map(|m| u64::from(m.kcal))
            .sum();
        assert_eq!(store.total_consumed_kcal(), expected);
        assert_eq!(expected, 555);
    }

    #[test]
    fn remaining_sign_tracks_target() {
        let mut store = seeded();
        store.toggle(3).unwrap();
        store.toggle(4).unwrap();
        assert_eq!(store.total_consumed_kcal(), 890);
        assert!(store.remaining_kcal(TARGET_KCAL) > 0);

        store.add(extra(5, 310)).unwrap();
        store.toggle(5).unwrap();
        assert_eq!(store.remaining_kcal(TARGET_KCAL), 0);

        store.toggle(2).unwrap();
        assert_eq!(store.remaining_kcal(TARGET_KCAL), -310);
    }

    #[test]
    fn add_appends_at_end_and_persists() {
        let mut store = seeded();
        let meals = store.add(extra(99, 50)).unwrap();
        assert_eq!(meals.len(), 5);
        assert_eq!(meals.last().map(|m| m.id), Some(99));
        assert_eq!(store.backend().writes(), 2);
        assert_eq!(store.max_id(), 99);
    }

    #[test]
    fn unknown_ids_are_no_ops_without_writes() {
        let mut store = seeded();
        let before = store.meals().to_vec();

        assert_eq!(store.toggle(12345).unwrap(), before.as_slice());
        assert_eq!(store.delete(12345).unwrap(), before.as_slice());
        assert_eq!(store.backend().writes(), 1);
    }

    #[test]
    fn every_mutation_is_written_through() {
        let mut store = seeded();
        store.toggle(1).unwrap();
        store.delete(1).unwrap();

        let saved = store.backend().get(MEALS_KEY).unwrap().unwrap();
        let reloaded = initialize_meals(Some(&saved)).unwrap();
        assert_eq!(reloaded, store.meals().to_vec());
        assert_eq!(store.backend().writes(), 3);
    }

    #[test]
    fn ids_stay_unique_across_adds() {
        let mut store = seeded();
        let mut ids = crate::IdClock::after(store.max_id());
        for n in 0..200 {
            store.add(extra(ids.next_id(), n)).unwrap();
        }
        let unique: HashSet<i64> = store.meals().iter().map(|m| m.id).collect();
        assert_eq!(unique.len(), store.len());
    }

    #[test]
    fn round_trip_preserves_fields_and_order() {
        let mut meals = seed_meals();
        meals[2].checked = true;
        meals.push(Meal::new(
            1_760_000_000_000,
            "Oats \"overnight\" ✓",
            0,
            "11 PM",
            "P 1.5g . C 0g . F 0g",
        ));

        let encoded = serialize_meals(&meals).unwrap();
        assert_eq!(initialize_meals(Some(&encoded)).unwrap(), meals);
    }
}
