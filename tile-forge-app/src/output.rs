use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use tile_core::TileGrid;

/// On-disk shape of a map saved as JSON.
#[derive(Serialize, Debug)]
pub struct MapDocument {
    pub width: usize,
    pub height: usize,
    /// Tile indices row by row, `-1` for unassigned cells.
    pub tiles: Vec<Vec<i64>>,
    pub roles: Vec<Vec<String>>,
}

impl From<&TileGrid> for MapDocument {
    fn from(grid: &TileGrid) -> Self {
        Self {
            width: grid.width(),
            height: grid.height(),
            tiles: grid.tile_rows(),
            roles: grid.role_rows(),
        }
    }
}

/// Saves the generated map, choosing the format from the file extension.
///
/// `.json` writes a [`MapDocument`]. Any other extension writes
/// space-separated tile indices, one line per row.
pub fn save_grid_to_file(grid: &TileGrid, output_path: &Path) -> Result<()> {
    log::info!("Attempting to save grid to {:?}...", output_path);

    let file = File::create(output_path)
        .with_context(|| format!("Failed to create output file: {:?}", output_path))?;
    let mut writer = io::BufWriter::new(file);

    let is_json = output_path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        serde_json::to_writer_pretty(&mut writer, &MapDocument::from(grid))
            .context("Failed to serialize map as JSON")?;
        writeln!(writer)?;
    } else {
        for (y, row) in grid.tile_rows().iter().enumerate() {
            let line = row
                .iter()
                .map(i64::to_string)
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(writer, "{}", line)
                .with_context(|| format!("Failed to write line for row {}", y))?;
        }
    }

    writer
        .flush()
        .context("Failed to flush writer for output file")?;
    log::info!("Successfully saved grid to {:?}", output_path);

    Ok(())
}
