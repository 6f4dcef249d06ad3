use std::time::{Duration, Instant};

/// Play clock shown in the header
pub struct GameMetrics {
    started_at: Option<Instant>,
    pub elapsed_time: Duration,
    finished: bool,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            started_at: None,
            elapsed_time: Duration::ZERO,
            finished: false,
        }
    }

    /// Refresh the clock; frozen before the start and after the end
    pub fn update(&mut self) {
        if let (Some(started_at), false) = (self.started_at, self.finished) {
            self.elapsed_time = started_at.elapsed();
        }
    }

    pub fn on_game_start(&mut self) {
        self.started_at = Some(Instant::now());
        self.elapsed_time = Duration::ZERO;
        self.finished = false;
    }

    pub fn on_game_end(&mut self) {
        self.update();
        self.finished = true;
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
