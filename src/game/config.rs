use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid in cells
    pub grid_width: usize,
    /// Height of the game grid in cells
    pub grid_height: usize,
    /// Edge length of one cell in surface pixels
    pub tile_size: u32,
    /// Time between two snake moves
    pub tick_interval_ms: u64,
    /// Seed for fruit placement; `None` draws one from the OS
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 20,
            grid_height: 20,
            tile_size: 20,
            tick_interval_ms: 100,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    /// Same configuration with a fixed fruit seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Number of cells on the board
    pub fn cell_count(&self) -> usize {
        self.grid_width.saturating_mul(self.grid_height)
    }

    /// Reject configurations the game cannot be played on
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.grid_width >= 1 && self.grid_height >= 1,
            "grid must be at least 1x1, got {}x{}",
            self.grid_width,
            self.grid_height
        );
        ensure!(
            i32::try_from(self.grid_width).is_ok() && i32::try_from(self.grid_height).is_ok(),
            "grid {}x{} does not fit in 32-bit coordinates",
            self.grid_width,
            self.grid_height
        );
        ensure!(
            self.cell_count() >= 2,
            "grid needs room for the snake and a fruit, got {}x{}",
            self.grid_width,
            self.grid_height
        );
        ensure!(self.tile_size >= 1, "tile size must be at least 1 pixel");
        ensure!(
            self.tick_interval_ms >= 1,
            "tick interval must be at least 1 ms"
        );
        Ok(())
    }

    /// Parse and validate a JSON configuration; missing fields take defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: GameConfig =
            serde_json::from_str(json).context("Failed to parse game configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json_str(&json)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }
}
