use clap::{Parser, ValueEnum};
use figment::providers::{Env, Format, Toml};
use figment::Figment;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tile_core::GenerationParams;

use crate::error::AppError;

/// Prefix for environment variables read into [`GenerationSettings`].
pub const ENV_PREFIX: &str = "TILE_FORGE_";

/// How the finished map is shown, besides being saved.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PreviewMode {
    #[default]
    None,
    /// Coloured blocks in the terminal, one per cell.
    Terminal,
}

/// Log level applied to every module unless `RUST_LOG` says otherwise.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GlobalLogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

/// Configuration for the Tile Forge application.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct AppConfig {
    /// Path to the RON or JSON tile catalog.
    #[arg(short, long, value_name = "FILE")]
    pub catalog: PathBuf,

    /// Strategy or preset name (bsp, dungeon, sewer, office, cellular, caves,
    /// grid, city, urban, wfc).
    #[arg(short, long, default_value = "sewer")]
    pub strategy: String,

    /// Width of the output grid.
    #[arg(long, default_value_t = 30)]
    pub width: usize,

    /// Height of the output grid.
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Optional seed for the random number generator.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Path to save the generated map. `.json` writes tiles and roles,
    /// anything else writes plain tile indices.
    #[arg(short, long, value_name = "FILE", default_value = "map.json")]
    pub output_path: PathBuf,

    #[arg(long)]
    pub min_room_size: Option<usize>,

    #[arg(long)]
    pub max_room_size: Option<usize>,

    #[arg(long)]
    pub corridor_width: Option<usize>,

    /// Initial wall probability for cave carving.
    #[arg(long)]
    pub fill_chance: Option<f64>,

    /// Smoothing passes for cave carving.
    #[arg(long)]
    pub iterations: Option<usize>,

    #[arg(long)]
    pub block_size: Option<usize>,

    #[arg(long)]
    pub street_width: Option<usize>,

    /// Choose the preview mode.
    #[arg(long, value_enum, default_value_t = PreviewMode::None)]
    pub preview: PreviewMode,

    /// Global log level.
    #[arg(long, value_enum, default_value_t = GlobalLogLevel::Info)]
    pub log_level: GlobalLogLevel,

    /// Optional TOML file with generation parameters.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Generation parameters gathered from a settings file and the environment.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct GenerationSettings {
    pub min_room_size: Option<usize>,
    pub max_room_size: Option<usize>,
    pub corridor_width: Option<usize>,
    pub fill_chance: Option<f64>,
    pub iterations: Option<usize>,
    pub block_size: Option<usize>,
    pub street_width: Option<usize>,
    pub seed: Option<u64>,
}

impl GenerationSettings {
    /// Merges the optional TOML file and then `TILE_FORGE_*` variables; later
    /// sources win.
    pub fn load(config_file: Option<&Path>) -> Result<Self, AppError> {
        let mut figment = Figment::new();
        if let Some(path) = config_file {
            if !path.is_file() {
                return Err(AppError::Config(format!(
                    "Settings file not found: {}",
                    path.display()
                )));
            }
            figment = figment.merge(Toml::file(path));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
            .map_err(|e| AppError::Config(e.to_string()))
    }

    /// Applies every value given on the command line on top of these
    /// settings.
    pub fn overlay(self, config: &AppConfig) -> Self {
        Self {
            min_room_size: config.min_room_size.or(self.min_room_size),
            max_room_size: config.max_room_size.or(self.max_room_size),
            corridor_width: config.corridor_width.or(self.corridor_width),
            fill_chance: config.fill_chance.or(self.fill_chance),
            iterations: config.iterations.or(self.iterations),
            block_size: config.block_size.or(self.block_size),
            street_width: config.street_width.or(self.street_width),
            seed: config.seed.or(self.seed),
        }
    }

    pub fn to_params(&self) -> GenerationParams {
        GenerationParams {
            min_room_size: self.min_room_size,
            max_room_size: self.max_room_size,
            corridor_width: self.corridor_width,
            fill_chance: self.fill_chance,
            iterations: self.iterations,
            block_size: self.block_size,
            street_width: self.street_width,
            seed: self.seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_basic_args() {
        let args = vec![
            "tile-forge",
            "--catalog",
            "tiles.ron",
            "--width",
            "40",
            "--output-path",
            "out.txt",
        ];
        let config = AppConfig::try_parse_from(args).unwrap();
        assert_eq!(config.catalog, PathBuf::from("tiles.ron"));
        assert_eq!(config.strategy, "sewer"); // Default
        assert_eq!(config.width, 40);
        assert_eq!(config.height, 20); // Default
        assert_eq!(config.output_path, PathBuf::from("out.txt"));
        assert_eq!(config.seed, None);
        assert_eq!(config.preview, PreviewMode::None);
        assert_eq!(config.log_level, GlobalLogLevel::Info);
    }

    #[test]
    fn test_catalog_is_required() {
        assert!(AppConfig::try_parse_from(["tile-forge", "--width", "5"]).is_err());
    }

    #[test]
    fn test_preview_mode() {
        let args = ["tile-forge", "-c", "t.ron", "--preview", "terminal"];
        let config = AppConfig::try_parse_from(args).unwrap();
        assert_eq!(config.preview, PreviewMode::Terminal);

        let args_err = ["tile-forge", "-c", "t.ron", "--preview", "window"];
        assert!(AppConfig::try_parse_from(args_err).is_err());
    }

    #[test]
    fn test_cli_overrides_settings() {
        let args = [
            "tile-forge",
            "-c",
            "t.ron",
            "--min-room-size",
            "3",
            "--seed",
            "9",
        ];
        let config = AppConfig::try_parse_from(args).unwrap();
        let settings = GenerationSettings {
            min_room_size: Some(6),
            max_room_size: Some(7),
            seed: Some(1),
            ..GenerationSettings::default()
        }
        .overlay(&config);
        assert_eq!(settings.min_room_size, Some(3));
        assert_eq!(settings.max_room_size, Some(7));
        assert_eq!(settings.seed, Some(9));
        assert_eq!(settings.to_params().seed, Some(9));
    }

    #[test]
    fn test_settings_from_file_and_env() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "forge.toml",
                r#"
                    fill_chance = 0.3
                    iterations = 2
                    block_size = 6
                "#,
            )?;
            jail.set_env("TILE_FORGE_ITERATIONS", "7");

            let settings = GenerationSettings::load(Some(Path::new("forge.toml")))
                .map_err(|e| e.to_string())?;
            assert_eq!(settings.fill_chance, Some(0.3));
            assert_eq!(settings.iterations, Some(7));
            assert_eq!(settings.block_size, Some(6));
            assert_eq!(settings.seed, None);
            Ok(())
        });
    }

    #[test]
    fn test_missing_settings_file_is_config_error() {
        let result = GenerationSettings::load(Some(Path::new("does/not/exist.toml")));
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
