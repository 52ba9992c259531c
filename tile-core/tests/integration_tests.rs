use std::collections::VecDeque;

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tile_core::{
    generate, AdjacencyRules, AutomatonCarver, BspParams, CaveParams, ConstraintSolver,
    Direction, GenerationError, GenerationParams, Role, RoomPartitioner, TileCatalog, TileGrid,
    TileId,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn dungeon_catalog() -> TileCatalog {
    TileCatalog::from_roles(["floor", "wall", "floor", "water", "wall", "lava"])
}

fn seeded(seed: u64) -> GenerationParams {
    GenerationParams {
        seed: Some(seed),
        ..GenerationParams::default()
    }
}

fn assert_roles_match_catalog(grid: &TileGrid, catalog: &TileCatalog) {
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let cell = grid.get(x, y).unwrap();
            let tile = cell.tile().expect("every cell is assigned");
            assert_eq!(
                Some(cell.role()),
                catalog.role(tile),
                "cell ({x},{y}) holds tile {}",
                tile.0
            );
        }
    }
}

/// Number of ordered neighbour pairs that break the catalog's rules.
fn rule_violations(grid: &TileGrid, catalog: &TileCatalog) -> usize {
    let rules = AdjacencyRules::from_catalog(catalog);
    let (width, height) = (grid.width(), grid.height());
    let mut violations = 0;
    for y in 0..height {
        for x in 0..width {
            let tile = grid.get(x, y).unwrap().tile().unwrap();
            for direction in Direction::ALL {
                if let Some((nx, ny)) = direction.step(x, y, width, height) {
                    let neighbour = grid.get(nx, ny).unwrap().tile().unwrap();
                    if !rules.check(tile, neighbour, direction) {
                        violations += 1;
                    }
                }
            }
        }
    }
    violations
}

/// 4-connected flood fill over floor cells.
fn reachable_floor(grid: &TileGrid, start: (usize, usize)) -> Vec<bool> {
    let (width, height) = (grid.width(), grid.height());
    let mut seen = vec![false; width * height];
    let mut queue = VecDeque::from([start]);
    seen[start.1 * width + start.0] = true;
    while let Some((x, y)) = queue.pop_front() {
        for direction in [Direction::N, Direction::E, Direction::S, Direction::W] {
            let Some((nx, ny)) = direction.step(x, y, width, height) else {
                continue;
            };
            let idx = ny * width + nx;
            if !seen[idx] && grid.get(nx, ny).unwrap().role() == &Role::Floor {
                seen[idx] = true;
                queue.push_back((nx, ny));
            }
        }
    }
    seen
}

proptest! {
    #[test]
    fn prop_every_role_comes_from_catalog(
        width in 1usize..40,
        height in 1usize..40,
        seed in any::<u64>(),
        name in prop::sample::select(vec!["bsp", "sewer", "office", "caves", "cellular", "city", "urban", "wfc"]),
    ) {
        let catalog = dungeon_catalog();
        let grid = generate(name, width, height, &seeded(seed), &catalog).unwrap();
        prop_assert_eq!(grid.width(), width);
        prop_assert_eq!(grid.height(), height);
        assert_roles_match_catalog(&grid, &catalog);
    }

    #[test]
    fn prop_cave_border_is_wall(
        iterations in 0usize..8,
        fill_chance in 0.0f64..=1.0,
        seed in any::<u64>(),
    ) {
        let catalog = dungeon_catalog();
        let carver = AutomatonCarver::new(CaveParams { fill_chance, iterations });
        let mut rng = StdRng::seed_from_u64(seed);
        let grid = carver.carve(30, 20, &catalog, &mut rng).unwrap();
        for x in 0..30 {
            prop_assert_eq!(grid.get(x, 0).unwrap().role(), &Role::Wall);
            prop_assert_eq!(grid.get(x, 19).unwrap().role(), &Role::Wall);
        }
        for y in 0..20 {
            prop_assert_eq!(grid.get(0, y).unwrap().role(), &Role::Wall);
            prop_assert_eq!(grid.get(29, y).unwrap().role(), &Role::Wall);
        }
    }
}

#[test]
fn test_bsp_rooms_are_connected() {
    init_logging();
    let catalog = dungeon_catalog();
    let partitioner = RoomPartitioner::new(BspParams::default());
    for seed in 0..30 {
        let mut rng = StdRng::seed_from_u64(seed);
        let (grid, rooms) = partitioner
            .partition_with_rooms(60, 40, &catalog, &mut rng)
            .unwrap();
        assert!(!rooms.is_empty(), "seed {seed}");

        let seen = reachable_floor(&grid, rooms[0].center());
        for room in &rooms {
            let (cx, cy) = room.center();
            assert!(seen[cy * 60 + cx], "room {room:?} unreachable, seed {seed}");
        }
    }
}

#[test]
fn test_wfc_self_only_tile_fills_grid() {
    let mut catalog = TileCatalog::from_roles(["floor"]);
    for direction in Direction::ALL {
        catalog.allow(TileId(0), direction, TileId(0)).unwrap();
    }
    for (width, height) in [(1, 1), (7, 3), (12, 12)] {
        let grid = ConstraintSolver::new()
            .collapse_seeded(width, height, &catalog, 11)
            .unwrap();
        assert!(grid.tile_rows().iter().flatten().all(|&t| t == 0));
        assert_eq!(grid.count_role(&Role::Floor), width * height);
    }
}

#[test]
fn test_wfc_is_deterministic_for_a_seed() {
    let mut catalog = dungeon_catalog();
    catalog.auto_relations();
    let solver = ConstraintSolver::new();
    let first = solver.collapse_seeded(16, 12, &catalog, 2024).unwrap();
    for _ in 0..3 {
        assert_eq!(solver.collapse_seeded(16, 12, &catalog, 2024).unwrap(), first);
    }
}

#[test]
fn test_wfc_respects_satisfiable_rules() {
    // Same-role tiles only: every collapse leaves neighbours a same-role
    // candidate, so no contradiction can arise and the rules hold everywhere.
    let mut catalog = TileCatalog::from_roles(["floor", "floor", "wall"]);
    catalog.auto_relations();
    init_logging();
    for seed in 0..5 {
        let grid = ConstraintSolver::new()
            .collapse_seeded(10, 10, &catalog, seed)
            .unwrap();
        let first = grid.get(0, 0).unwrap().role().clone();
        assert_eq!(grid.count_role(&first), 100);
        assert_eq!(rule_violations(&grid, &catalog), 0, "seed {seed}");
    }
}

#[test]
fn test_sewer_has_floor_and_wall() {
    let catalog = TileCatalog::from_roles(["floor", "wall"]);
    for seed in 0..500 {
        let grid = generate("sewer", 20, 15, &seeded(seed), &catalog).unwrap();
        assert_eq!(grid.width(), 20);
        assert_eq!(grid.height(), 15);
        assert!(grid.count_role(&Role::Floor) > 0, "seed {seed}");
        assert!(grid.count_role(&Role::Wall) > 0, "seed {seed}");
    }
}

#[test]
fn test_unknown_strategy() {
    let catalog = dungeon_catalog();
    let result = generate("bogus", 10, 10, &GenerationParams::default(), &catalog);
    assert_eq!(result, Err(GenerationError::UnknownStrategy("bogus".to_owned())));
}

#[test]
fn test_wfc_empty_catalog() {
    let result = generate(
        "wfc",
        5,
        5,
        &GenerationParams::default(),
        &TileCatalog::default(),
    );
    assert_eq!(result, Err(GenerationError::EmptyCatalog));
}

#[test]
fn test_zero_dimensions_rejected_for_every_preset() {
    let catalog = dungeon_catalog();
    for preset in tile_core::PRESETS {
        let result = generate(preset.name, 10, 0, &GenerationParams::default(), &catalog);
        assert!(
            matches!(result, Err(GenerationError::InvalidDimensions { .. })),
            "{}",
            preset.name
        );
    }
}

#[test]
fn test_unrecognized_roles_pass_through() {
    let catalog = TileCatalog::from_roles(["lava"]);
    let grid = generate("wfc", 3, 3, &seeded(1), &catalog).unwrap();
    assert!(grid
        .role_rows()
        .iter()
        .flatten()
        .all(|role| role == "lava"));
}
