//! Start/stop tick source for the game loop.

use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};

/// Fixed-period ticker that can be started and stopped
///
/// While stopped, [`Ticker::tick`] never completes, so it can sit in a
/// `tokio::select!` branch unconditionally.
pub struct Ticker {
    period: Duration,
    interval: Option<Interval>,
}

impl Ticker {
    /// Create a stopped ticker
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            interval: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Start firing; the first tick comes one period from now
    pub fn start(&mut self) {
        if self.interval.is_some() {
            return;
        }

        let mut interval = interval_at(Instant::now() + self.period, self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.interval = Some(interval);
    }

    pub fn stop(&mut self) {
        self.interval = None;
    }

    pub fn is_running(&self) -> bool {
        self.interval.is_some()
    }

    /// Wait for the next tick
    pub async fn tick(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }
}
