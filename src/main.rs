use anyhow::{Context, Result};
use clap::Parser;
use grid_snake::game::{GameConfig, GameEngine};
use grid_snake::logging;
use grid_snake::modes::HumanMode;
use grid_snake::render::{Renderer, renderer::DEFAULT_CELL_WIDTH};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "grid_snake")]
#[command(version, about = "Classic Snake in the terminal")]
struct Cli {
    /// Seed for food placement, for reproducible games
    #[arg(long)]
    seed: Option<u64>,

    /// Terminal columns drawn per grid cell
    #[arg(long, default_value_t = DEFAULT_CELL_WIDTH, value_parser = clap::value_parser!(u16).range(1..=4))]
    cell_width: u16,

    /// Append logs to this file (the screen is used by the game)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Increase log detail (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.log_file.as_deref(), cli.verbose)?;

    let config = GameConfig::default();
    info!(
        config = %serde_json::to_string(&config).context("Failed to serialize config")?,
        seed = ?cli.seed,
        "starting"
    );

    let engine = match cli.seed {
        Some(seed) => GameEngine::with_seed(config, seed),
        None => GameEngine::new(config),
    }
    .context("Invalid game configuration")?;

    let mut human_mode = HumanMode::new(engine, Renderer::new(cli.cell_width));
    human_mode.run().await?;

    Ok(())
}
