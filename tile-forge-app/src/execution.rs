//! Handles one generation run from configuration to saved map.

use crate::{
    config::{AppConfig, GenerationSettings, PreviewMode},
    error::AppError,
    output,
    visualization::{TerminalVisualizer, Visualizer},
};
use log::info;
use std::time::Instant;
use tile_core::{Role, TileCatalog, TileGrid};
use tile_rules::loader::load_from_file;

/// Loads the catalog, generates the map, saves it, and shows the preview if
/// one was requested.
pub fn run(config: &AppConfig) -> Result<TileGrid, AppError> {
    info!("Loading catalog from: {:?}", config.catalog);
    let catalog = load_from_file(&config.catalog)?;
    info!("Catalog loaded: {} tiles", catalog.len());

    let settings = GenerationSettings::load(config.config.as_deref())?.overlay(config);
    log::debug!("Generation settings: {:?}", settings);

    let grid = generate(config, &catalog, &settings)?;

    output::save_grid_to_file(&grid, &config.output_path)?;

    if config.preview == PreviewMode::Terminal {
        TerminalVisualizer::new().display_state(&grid)?;
    }
    Ok(grid)
}

fn generate(
    config: &AppConfig,
    catalog: &TileCatalog,
    settings: &GenerationSettings,
) -> Result<TileGrid, AppError> {
    info!(
        "Generating {}x{} map with '{}'",
        config.width, config.height, config.strategy
    );
    let start = Instant::now();
    let grid = tile_core::generate(
        &config.strategy,
        config.width,
        config.height,
        &settings.to_params(),
        catalog,
    )?;
    info!(
        "Generation finished in {:?}: {} floor, {} wall cells",
        start.elapsed(),
        grid.count_role(&Role::Floor),
        grid.count_role(&Role::Wall)
    );
    Ok(grid)
}
