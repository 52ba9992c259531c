use colored::Colorize;
use std::collections::BTreeMap;
use std::io::{self, Write};
use tile_core::{Role, TileGrid};

use crate::error::AppError;

/// Trait for types that can present a generated [`TileGrid`] to the user.
pub trait Visualizer {
    /// Displays the grid.
    fn display_state(&mut self, grid: &TileGrid) -> Result<(), AppError>;
}

/// Renders the grid in the terminal as coloured blocks, one per cell, using
/// each cell's role colour, followed by a legend.
pub struct TerminalVisualizer<W: Write = io::Stdout> {
    writer: W,
}

impl TerminalVisualizer {
    pub fn new() -> Self {
        Self {
            writer: io::stdout(),
        }
    }
}

impl Default for TerminalVisualizer {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> TerminalVisualizer<W> {
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    /// One line per grid row, two character cells per tile.
    pub fn render(grid: &TileGrid) -> String {
        let mut out = String::new();
        for row in grid.rows() {
            for cell in row {
                let (r, g, b) = cell.role().color();
                out.push_str(&"  ".on_truecolor(r, g, b).to_string());
            }
            out.push('\n');
        }
        out
    }

    /// Roles present in the grid with their cell counts, by name.
    pub fn legend(grid: &TileGrid) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for cell in grid.cells() {
            *counts.entry(cell.role().to_string()).or_insert(0) += 1;
        }
        counts
    }
}

impl<W: Write> Visualizer for TerminalVisualizer<W> {
    fn display_state(&mut self, grid: &TileGrid) -> Result<(), AppError> {
        let write_err = |e: io::Error| AppError::Visualization(e.to_string());

        write!(self.writer, "{}", Self::render(grid)).map_err(write_err)?;
        for (name, count) in Self::legend(grid) {
            let (r, g, b) = Role::from(name.as_str()).color();
            writeln!(self.writer, "{} {name}: {count}", "  ".on_truecolor(r, g, b))
                .map_err(write_err)?;
        }
        self.writer.flush().map_err(write_err)
    }
}
