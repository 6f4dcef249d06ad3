use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tile_snake::game::GameConfig;
use tile_snake::modes::HumanMode;

#[derive(Parser)]
#[command(name = "tile_snake")]
#[command(version, about = "Steer the snake with the arrow keys, eat fruit, avoid walls")]
struct Cli {
    /// JSON file with game settings; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid width
    #[arg(long)]
    width: Option<usize>,

    /// Grid height
    #[arg(long)]
    height: Option<usize>,

    /// Pixel size of one tile
    #[arg(long)]
    tile_size: Option<u32>,

    /// Milliseconds between snake moves
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Seed for fruit placement
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file (filter with RUST_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    /// Defaults, then the config file, then flags
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::default(),
        };

        if let Some(width) = self.width {
            config.grid_width = width;
        }
        if let Some(height) = self.height {
            config.grid_height = height;
        }
        if let Some(tile_size) = self.tile_size {
            config.tile_size = tile_size;
        }
        if let Some(tick_ms) = self.tick_ms {
            config.tick_interval_ms = tick_ms;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tile_snake::logging::init(cli.log_file.as_deref())?;

    let config = cli.game_config()?;
    tracing::info!(?config, "starting");

    let mut human_mode = HumanMode::new(config)?;
    human_mode.run().await?;

    Ok(())
}
