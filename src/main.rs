mod abilities;
mod config;
mod constants;
mod entities;
mod game;
mod input;
mod rendering;
mod simulation;
mod terminal_io;
mod types;

use std::io;

use anyhow::Context;
use clap::Parser;
use crossterm::terminal::size;
use log::{error, info};

use crate::config::{Cli, GameConfig};
use crate::game::{Game, RoundOutcome};
use crate::rendering::{OutputTarget, ScreenBuffer};
use crate::terminal_io::SimulatedInput;

fn main() -> anyhow::Result<()> {
    let config: GameConfig = Cli::parse().into();
    simple_logging::log_to_file(&config.log_file, config.log_level)
        .with_context(|| format!("Failed to open log file {}", config.log_file.display()))?;
    info!("Starting kokaton-musou.");

    let mut game = if config.debug_mode {
        info!("Debug mode enabled, resolution {}x{}", config.debug_width, config.debug_height);
        Game::new(
            config.debug_width,
            config.debug_height,
            OutputTarget::ScreenBuffer(ScreenBuffer::new(config.debug_width, config.debug_height)),
            Some(SimulatedInput::demo()),
            config.max_frames,
            config.seed,
        )
    } else {
        let (width, height) = size()
            .map_err(|e| { error!("Failed to get terminal size: {}", e); e })
            .context("Failed to query terminal size")?;
        info!("Terminal size: {}x{}", width, height);
        Game::new(width, height, OutputTarget::Stdout(io::stdout()), None, config.max_frames, config.seed)
    };

    let outcome = game.enter_terminal().and_then(|_| game.run());
    // Restore the terminal before reporting anything, even when the round failed.
    let restored = game.leave_terminal();
    let outcome = outcome.context("Game loop failed")?;
    restored.context("Failed to restore terminal")?;

    match outcome {
        RoundOutcome::Quit { score } => info!("Player quit with score {}", score),
        RoundOutcome::Defeated { score } => info!("Game over. Final score {}", score),
        RoundOutcome::FrameLimit { score } => info!("Frame limit reached. Final score {}", score),
    }
    Ok(())
}
