// src/clock.rs - Display clock ticker
use chrono::{DateTime, Local, Timelike};
use log::{debug, error, info};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Duration, MissedTickBehavior};

use crate::{MealError, Result};

#[derive(Debug, Clone)]
pub enum ClockCommand {
    /// Publish the current time immediately
    TickNow,
    /// Stop the ticker
    Stop,
}

/// Publishes the wall-clock time on a fixed interval for display.
///
/// The ticker shares nothing with the meal store. Dropping it aborts the
/// background task, so a forgotten `stop` never leaves a timer running.
pub struct ClockTicker {
    /// Time between ticks
    interval: Duration,

    /// Channel to send commands to the ticker task
    command_tx: Option<mpsc::Sender<ClockCommand>>,

    /// Handle to the ticker task
    task: Option<JoinHandle<()>>,

    /// Latest published time
    now_tx: watch::Sender<DateTime<Local>>,
}

impl ClockTicker {
    pub fn new(interval: Duration) -> Self {
        let (now_tx, _) = watch::channel(Local::now());
        Self {
            interval,
            command_tx: None,
            task: None,
            now_tx,
        }
    }

    /// Receiver that sees every published time; the latest value is kept.
    pub fn subscribe(&self) -> watch::Receiver<DateTime<Local>> {
        self.now_tx.subscribe()
    }

    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }

    /// Start ticking. Must be called from within a tokio runtime.
    pub fn start(&mut self) -> Result<()> {
        if self.task.is_some() {
            debug!("Clock ticker already running");
            return Ok(());
        }
        if self.interval.is_zero() {
            return Err(MealError::ClockError {
                message: "tick interval must be greater than zero".to_string(),
            });
        }

        info!("Starting clock ticker every {:?}", self.interval);
        let (command_tx, mut command_rx) = mpsc::channel(10);
        let now_tx = self.now_tx.clone();
        let period = self.interval;

        let task = tokio::spawn(async move {
            let mut interval = time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        now_tx.send_replace(Local::now());
                    }
                    cmd = command_rx.recv() => match cmd {
                        Some(ClockCommand::TickNow) => {
                            now_tx.send_replace(Local::now());
                        }
                        Some(ClockCommand::Stop) | None => {
                            debug!("Clock ticker stopping...");
                            break;
                        }
                    }
                }
            }
        });

        self.command_tx = Some(command_tx);
        self.task = Some(task);
        Ok(())
    }

    /// Publish the current time without waiting for the next tick
    pub async fn tick_now(&self) -> Result<()> {
        let Some(command_tx) = &self.command_tx else {
            return Err(MealError::ClockError {
                message: "Clock ticker is not running".to_string(),
            });
        };

        command_tx
            .send(ClockCommand::TickNow)
            .await
            .map_err(|e| MealError::ClockError {
                message: format!("Failed to send tick command: {}", e),
            })
    }

    /// Stop the ticker if it's running and wait for its task to finish
    pub async fn stop(&mut self) -> Result<()> {
        let Some(task) = self.task.take() else {
            debug!("Clock ticker is not running");
            return Ok(());
        };

        if let Some(command_tx) = self.command_tx.take() {
            if let Err(e) = command_tx.send(ClockCommand::Stop).await {
                error!("Failed to send stop command to clock ticker: {}", e);
            }
        }

        if let Err(e) = task.await {
            let message = format!("Failed to stop clock ticker: {}", e);
            error!("{}", message);
            return Err(MealError::ClockError { message });
        }

        info!("Clock ticker stopped");
        Ok(())
    }
}

impl Drop for ClockTicker {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            debug!("Clock ticker dropped while running, aborting task");
            task.abort();
        }
    }
}

/// Greeting for the hour of day (0-23).
pub fn greeting(hour: u32) -> &'static str {
    if hour < 12 {
        "Good morning!"
    } else if hour < 18 {
        "Good afternoon!"
    } else {
        "Good evening!"
    }
}

/// Greeting, date, and time lines for a clock header.
pub fn clock_lines(now: &DateTime<Local>) -> (String, String, String) {
    (
        greeting(now.hour()).to_string(),
        now.format("%-d %B %Y").to_string(),
        now.format("%I:%M:%S %p").to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn greeting_by_hour() {
        assert_eq!(greeting(0), "Good morning!");
        assert_eq!(greeting(11), "Good morning!");
        assert_eq!(greeting(12), "Good afternoon!");
        assert_eq!(greeting(17), "Good afternoon!");
        assert_eq!(greeting(18), "Good evening!");
        assert_eq!(greeting(23), "Good evening!");
    }

    #[test]
    fn clock_lines_format() {
        let now = Local.with_ymd_and_hms(2026, 10, 19, 20, 5, 9).unwrap();
        let (greet, date, time) = clock_lines(&now);
        assert_eq!(greet, "Good evening!");
        assert_eq!(date, "19 October 2026");
        assert_eq!(time, "08:05:09 PM");
    }

    #[tokio::test]
    async fn ticks_until_stopped() {
        let mut ticker = ClockTicker::new(Duration::from_millis(10));
        let mut rx = ticker.subscribe();
        ticker.start().unwrap();
        assert!(ticker.is_running());

        for _ in 0..3 {
            time::timeout(Duration::from_secs(2), rx.changed())
                .await
                .expect("tick within timeout")
                .unwrap();
        }

        ticker.stop().await.unwrap();
        assert!(!ticker.is_running());

        rx.borrow_and_update();
        time::sleep(Duration::from_millis(50)).await;
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn tick_now_publishes() {
        let mut ticker = ClockTicker::new(Duration::from_secs(3600));
        let mut rx = ticker.subscribe();
        ticker.start().unwrap();

        // the first interval tick fires immediately
        time::timeout(Duration::from_secs(2), rx.changed())
            .await
            .unwrap()
            .unwrap();

        ticker.tick_now().await.unwrap();
        time::timeout(Duration::from_secs(2), rx.changed())
            .await
            .expect("manual tick")
            .unwrap();

        ticker.stop().await.unwrap();
    }

    #[tokio::test]
    async fn stop_when_idle_is_ok() {
        let mut ticker = ClockTicker::new(Duration::from_millis(10));
        ticker.stop().await.unwrap();
        assert!(ticker.tick_now().await.is_err());
    }

    #[tokio::test]
    async fn zero_interval_is_rejected() {
        let mut ticker = ClockTicker::new(Duration::ZERO);
        assert!(matches!(ticker.start(), Err(MealError::ClockError { .. })));
    }

    #[tokio::test]
    async fn drop_aborts_the_task() {
        let mut ticker = ClockTicker::new(Duration::from_millis(5));
        let mut rx = ticker.subscribe();
        ticker.start().unwrap();
        rx.changed().await.unwrap();

        drop(ticker);
        // once the task is gone the last sender is dropped
        let closed = time::timeout(Duration::from_secs(2), async {
            while rx.changed().await.is_ok() {}
        })
        .await;
        assert!(closed.is_ok());
    }
}
