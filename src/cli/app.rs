//! CLI module for the mealcheck application
//!
//! This module renders the checklist to the terminal and routes commands to
//! the meal store and the quick-add form.
use std::io::{stdin, stdout, Write};

use log::{debug, info};

use crate::{
    clock_lines, ClockTicker, Commands, Config, DraftField, KeyValueStore, Meal, MealError,
    MealStore, QuickAddForm, Result, TARGET_KCAL, TIME_SLOTS,
};

/// CLI Application handler - processes CLI commands and interfaces with MealStore
pub struct App<S: KeyValueStore> {
    /// The meal checklist and its persistence
    store: MealStore<S>,

    /// Quick-add draft state
    form: QuickAddForm,

    /// Application configuration
    config: Config,

    /// Whether to display verbose output
    verbose: bool,
}

impl<S: KeyValueStore> App<S> {
    /// Create a new CLI application around an opened store
    pub fn new(store: MealStore<S>, config: Config, verbose: bool) -> Self {
        let form = QuickAddForm::with_id_floor(store.max_id());
        Self {
            store,
            form,
            config,
            verbose,
        }
    }

    pub fn store(&self) -> &MealStore<S> {
        &self.store
    }

    /// Run the CLI application with the given command
    pub async fn run(&mut self, command: Commands) -> Result<()> {
        match command {
            Commands::List { json } => self.list_meals(json)?,

            Commands::Add {
                title,
                kcal,
                protein,
                carbs,
                fat,
                time,
            } => self.quick_add(title, kcal, protein, carbs, fat, time)?,

            Commands::Toggle { id } => self.handle_toggle(id)?,

            Commands::Delete { id, force } => self.handle_delete(id, force)?,

            Commands::Slots => {
                for slot in TIME_SLOTS {
                    println!("{}", slot);
                }
            }

            Commands::Clock { ticks } => self.run_clock(ticks).await?,

            Commands::Config => println!("{}", serde_json::to_string_pretty(&self.config)?),
        }

        Ok(())
    }

    fn list_meals(&self, json: bool) -> Result<()> {
        let total = self.store.total_consumed_kcal();
        let remaining = self.store.remaining_kcal(TARGET_KCAL);

        if json {
            let summary = serde_json::json!({
                "target": TARGET_KCAL,
                "meals": self.store.meals(),
                "total": total,
                "remaining": remaining,
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
            return Ok(());
        }

        println!("{}", console::style(format!("Target = {} Kcal", TARGET_KCAL)).bold());

        let term_width = terminal_size::terminal_size()
            .map(|(w, _)| w.0 as usize)
            .unwrap_or(80);

        for (i, meal) in self.store.meals().iter().enumerate() {
            if i > 0 {
                println!("{}", "-".repeat(term_width.min(50)));
            } else {
                println!();
            }
            println!("{}", render_meal(meal));
        }

        if self.store.is_empty() {
            println!("\nNo meals on the checklist.");
        }

        println!();
        println!(
            "{}",
            console::style(format!("Total = {} Kcal", total)).green().bold()
        );
        let status = status_line(total, TARGET_KCAL);
        if remaining > 0 {
            println!("{}", console::style(status).red().bold());
        } else {
            println!("{}", console::style(status).green().bold());
        }

        Ok(())
    }

    fn quick_add(
        &mut self,
        title: String,
        kcal: String,
        protein: Option<String>,
        carbs: Option<String>,
        fat: Option<String>,
        time: Option<String>,
    ) -> Result<()> {
        self.form.update_field(DraftField::Title, title);
        self.form.update_field(DraftField::Kcal, kcal);
        let optional = [
            (DraftField::Protein, protein),
            (DraftField::Carbs, carbs),
            (DraftField::Fat, fat),
            (DraftField::MealTime, time),
        ];
        for (field, value) in optional {
            if let Some(value) = value {
                self.form.update_field(field, value);
            }
        }

        let meal = self.form.submit()?;
        let id = meal.id;
        self.store.add(meal)?;

        println!("Meal added with ID: {}", id);
        if self.verbose {
            println!("Total = {} Kcal", self.store.total_consumed_kcal());
        }
        Ok(())
    }

    fn handle_toggle(&mut self, id: i64) -> Result<()> {
        self.store.toggle(id)?;

        match self.store.get(id) {
            Some(meal) if meal.checked => println!("'{}' marked as eaten.", meal.title),
            Some(meal) => println!("'{}' marked as not eaten.", meal.title),
            None => println!("No meal with ID {}; nothing changed.", id),
        }
        println!("{}", status_line(self.store.total_consumed_kcal(), TARGET_KCAL));
        Ok(())
    }

    fn handle_delete(&mut self, id: i64, force: bool) -> Result<()> {
        // Fetch the meal first so the prompt can show what is being removed
        let meal = match self.store.get(id) {
            Some(meal) => meal.clone(),
            None => {
                println!("No meal with ID {}; nothing changed.", id);
                return Ok(());
            }
        };

        if self.config.confirm_delete && !force {
            println!("You are about to delete the following meal:");
            println!("{}", render_meal(&meal));

            print!("\nAre you sure you want to delete \"{}\"? [y/N]: ", meal.title);
            stdout().flush().map_err(MealError::Io)?;

            let mut input = String::new();
            stdin().read_line(&mut input).map_err(MealError::Io)?;

            if !is_confirmation(&input) {
                println!("Deletion cancelled.");
                return Ok(());
            }
        }

        self.store.delete(id)?;
        println!("Meal '{}' ({}) has been deleted.", meal.title, meal.id);
        Ok(())
    }

    async fn run_clock(&self, ticks: Option<u32>) -> Result<()> {
        let mut ticker = ClockTicker::new(self.config.tick_interval());
        let mut now_rx = ticker.subscribe();
        ticker.start()?;
        info!("Clock running, press Ctrl-C to stop");

        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        let mut seen = 0u32;
        loop {
            tokio::select! {
                changed = now_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let now = *now_rx.borrow_and_update();
                    let (greeting, date, time) = clock_lines(&now);
                    println!("{} | {} | {}", greeting, date, time);

                    seen += 1;
                    if ticks.is_some_and(|limit| seen >= limit) {
                        break;
                    }
                }
                _ = &mut ctrl_c => {
                    debug!("Ctrl-C received");
                    break;
                }
            }
        }

        ticker.stop().await
    }
}

/// Two-line text block for one meal
pub fn render_meal(meal: &Meal) -> String {
    let marker = if meal.checked { "[x]" } else { "[ ]" };
    let done = if meal.checked { "  Done" } else { "" };
    format!(
        "{} #{} {}\n    {} Kcal{}\n    {} | {}",
        marker, meal.id, meal.title, meal.kcal, done, meal.time, meal.details
    )
}

/// "Need ..." while under target, "Target Reached!" once met
pub fn status_line(total: u64, target: u32) -> String {
    let remaining = i64::from(target) - total as i64;
    if remaining > 0 {
        format!("Need = {} - {} = {} Kcal more!", target, total, remaining)
    } else {
        "Target Reached!".to_string()
    }
}

fn is_confirmation(input: &str) -> bool {
    let input = input.trim().to_lowercase();
    input == "y" || input == "yes"
}
