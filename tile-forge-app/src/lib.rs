//! Tile Forge Application Library
//!
//! Configuration, logging, and output handling for the `tile-forge` command
//! line tool.

pub mod config;
pub mod error;
pub mod execution;
pub mod logging;
pub mod output;
pub mod visualization;

use clap::Parser;

pub use config::AppConfig;
pub use error::AppError;

/// Parses the command line and runs one generation.
pub fn main() -> anyhow::Result<()> {
    let config = AppConfig::parse();
    logging::init_logger(&config);

    log::info!("Tile Forge App Starting");
    log::debug!("Loaded Config: {:?}", config);

    execution::run(&config)?;

    log::info!("Tile Forge App Finished.");
    Ok(())
}
