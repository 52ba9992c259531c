use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tile_rules::TileCatalog;

use crate::generators::{
    AutomatonCarver, BlockLayout, BspParams, CaveParams, CityParams, MapGenerator, RoomPartitioner,
};
use crate::grid::TileGrid;
use crate::runner::ConstraintSolver;
use crate::{validate_dimensions, GenerationError};

/// One of the four generation algorithms with its parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Strategy {
    Rooms(BspParams),
    Caves(CaveParams),
    City(CityParams),
    Wfc,
}

impl Strategy {
    /// Replaces every parameter that `params` sets; the rest keep their
    /// current values. Overrides for other strategies are ignored.
    pub fn with_overrides(self, params: &GenerationParams) -> Self {
        match self {
            Self::Rooms(p) => Self::Rooms(BspParams {
                min_room_size: params.min_room_size.unwrap_or(p.min_room_size),
                max_room_size: params.max_room_size.unwrap_or(p.max_room_size),
                corridor_width: params.corridor_width.unwrap_or(p.corridor_width),
            }),
            Self::Caves(p) => Self::Caves(CaveParams {
                fill_chance: params.fill_chance.unwrap_or(p.fill_chance),
                iterations: params.iterations.unwrap_or(p.iterations),
            }),
            Self::City(p) => Self::City(CityParams {
                block_size: params.block_size.unwrap_or(p.block_size),
                street_width: params.street_width.unwrap_or(p.street_width),
            }),
            Self::Wfc => Self::Wfc,
        }
    }

    pub fn validate(&self) -> Result<(), GenerationError> {
        match self {
            Self::Rooms(p) => p.validate(),
            Self::Caves(p) => p.validate(),
            Self::City(p) => p.validate(),
            Self::Wfc => Ok(()),
        }
    }

    pub fn generator(&self) -> Box<dyn MapGenerator> {
        match *self {
            Self::Rooms(p) => Box::new(RoomPartitioner::new(p)),
            Self::Caves(p) => Box::new(AutomatonCarver::new(p)),
            Self::City(p) => Box::new(BlockLayout::new(p)),
            Self::Wfc => Box::new(ConstraintSolver::new()),
        }
    }

    /// Whether the strategy can still produce a grid from an empty catalog.
    pub fn tolerates_empty_catalog(&self) -> bool {
        !matches!(self, Self::Wfc)
    }
}

/// A named strategy with its default parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preset {
    pub name: &'static str,
    pub strategy: Strategy,
}

/// Every name [`generate`] accepts, matched case-insensitively.
pub const PRESETS: &[Preset] = &[
    Preset {
        name: "bsp",
        strategy: Strategy::Rooms(BspParams {
            min_room_size: 5,
            max_room_size: 10,
            corridor_width: 2,
        }),
    },
    Preset {
        name: "dungeon",
        strategy: Strategy::Rooms(BspParams {
            min_room_size: 5,
            max_room_size: 10,
            corridor_width: 2,
        }),
    },
    Preset {
        name: "sewer",
        strategy: Strategy::Rooms(BspParams {
            min_room_size: 4,
            max_room_size: 8,
            corridor_width: 2,
        }),
    },
    Preset {
        name: "office",
        strategy: Strategy::Rooms(BspParams {
            min_room_size: 6,
            max_room_size: 12,
            corridor_width: 2,
        }),
    },
    Preset {
        name: "cellular",
        strategy: Strategy::Caves(CaveParams {
            fill_chance: 0.45,
            iterations: 5,
        }),
    },
    Preset {
        name: "caves",
        strategy: Strategy::Caves(CaveParams {
            fill_chance: 0.48,
            iterations: 6,
        }),
    },
    Preset {
        name: "grid",
        strategy: Strategy::City(CityParams {
            block_size: 8,
            street_width: 2,
        }),
    },
    Preset {
        name: "city",
        strategy: Strategy::City(CityParams {
            block_size: 8,
            street_width: 2,
        }),
    },
    Preset {
        name: "urban",
        strategy: Strategy::City(CityParams {
            block_size: 10,
            street_width: 3,
        }),
    },
    Preset {
        name: "wfc",
        strategy: Strategy::Wfc,
    },
];

/// Looks up a strategy or preset by name, ignoring ASCII case.
pub fn preset(name: &str) -> Option<&'static Preset> {
    let name = name.trim();
    PRESETS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}

/// Optional per-call overrides on top of a preset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationParams {
    pub min_room_size: Option<usize>,
    pub max_room_size: Option<usize>,
    pub corridor_width: Option<usize>,
    pub fill_chance: Option<f64>,
    pub iterations: Option<usize>,
    pub block_size: Option<usize>,
    pub street_width: Option<usize>,
    /// Fixed RNG seed. Without one a fresh seed is drawn per call.
    pub seed: Option<u64>,
}

/// Generates a grid with the named strategy or preset.
///
/// Inputs are checked in order: dimensions, strategy name, parameters, then
/// the catalog. Only `wfc` rejects an empty catalog; the other strategies
/// paint tile 0 with the role they intended.
///
/// # Errors
///
/// Returns [`GenerationError`] for any rejected input. Once generation
/// starts it always completes.
pub fn generate(
    name: &str,
    width: usize,
    height: usize,
    params: &GenerationParams,
    catalog: &TileCatalog,
) -> Result<TileGrid, GenerationError> {
    validate_dimensions(width, height)?;
    let preset = preset(name).ok_or_else(|| GenerationError::UnknownStrategy(name.to_owned()))?;
    let strategy = preset.strategy.with_overrides(params);
    strategy.validate()?;

    if catalog.is_empty() {
        if !strategy.tolerates_empty_catalog() {
            return Err(GenerationError::EmptyCatalog);
        }
        warn!("Catalog is empty, '{}' will paint tile 0 only", preset.name);
    }

    let seed = params.seed.unwrap_or_else(rand::random);
    debug!(
        "Generating {width}x{height} with preset '{}' ({strategy:?}), seed {seed}",
        preset.name
    );
    let mut rng = StdRng::seed_from_u64(seed);
    generate_with(&strategy, width, height, catalog, &mut rng)
}

/// Runs an already resolved strategy with a caller-supplied RNG.
pub fn generate_with(
    strategy: &Strategy,
    width: usize,
    height: usize,
    catalog: &TileCatalog,
    rng: &mut dyn RngCore,
) -> Result<TileGrid, GenerationError> {
    strategy.generator().generate(width, height, catalog, rng)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_lookup_ignores_case() {
        assert_eq!(preset("Sewer").map(|p| p.name), Some("sewer"));
        assert_eq!(preset("URBAN").map(|p| p.name), Some("urban"));
        assert!(preset("bogus").is_none());
    }

    #[test]
    fn test_overrides_only_touch_their_strategy() {
        let params = GenerationParams {
            min_room_size: Some(3),
            block_size: Some(12),
            ..GenerationParams::default()
        };
        let rooms = preset("sewer").unwrap().strategy.with_overrides(&params);
        assert_eq!(
            rooms,
            Strategy::Rooms(BspParams {
                min_room_size: 3,
                max_room_size: 8,
                corridor_width: 2,
            })
        );
        let city = preset("urban").unwrap().strategy.with_overrides(&params);
        assert_eq!(
            city,
            Strategy::City(CityParams {
                block_size: 12,
                street_width: 3,
            })
        );
    }

    #[test]
    fn test_dimensions_checked_before_name() {
        let catalog = TileCatalog::from_roles(["floor", "wall"]);
        let result = generate("bogus", 0, 5, &GenerationParams::default(), &catalog);
        assert!(matches!(result, Err(GenerationError::InvalidDimensions { .. })));
    }

    #[test]
    fn test_unknown_name_reported_verbatim() {
        let catalog = TileCatalog::from_roles(["floor", "wall"]);
        let result = generate("Bogus", 5, 5, &GenerationParams::default(), &catalog);
        assert_eq!(result, Err(GenerationError::UnknownStrategy("Bogus".into())));
    }

    #[test]
    fn test_invalid_override_rejected() {
        let catalog = TileCatalog::from_roles(["floor", "wall"]);
        let params = GenerationParams {
            fill_chance: Some(2.0),
            ..GenerationParams::default()
        };
        let result = generate("caves", 10, 10, &params, &catalog);
        assert!(matches!(result, Err(GenerationError::InvalidParameter(_))));
    }

    #[test]
    fn test_empty_catalog_only_fails_wfc() {
        let empty = TileCatalog::default();
        let params = GenerationParams {
            seed: Some(4),
            ..GenerationParams::default()
        };
        assert_eq!(
            generate("wfc", 4, 4, &params, &empty),
            Err(GenerationError::EmptyCatalog)
        );
        for name in ["bsp", "cellular", "city"] {
            let grid = generate(name, 12, 12, &params, &empty).unwrap();
            assert!(grid.is_fully_assigned());
            assert!(grid.tile_rows().iter().flatten().all(|&t| t == 0));
        }
    }

    #[test]
    fn test_seed_makes_output_reproducible() {
        let catalog = TileCatalog::from_roles(["floor", "floor", "wall", "wall"]);
        let params = GenerationParams {
            seed: Some(99),
            ..GenerationParams::default()
        };
        for name in ["dungeon", "caves", "urban", "wfc"] {
            let a = generate(name, 24, 18, &params, &catalog).unwrap();
            let b = generate(name, 24, 18, &params, &catalog).unwrap();
            assert_eq!(a, b, "{name}");
        }
    }
}
