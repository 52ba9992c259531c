use std::fs;
use tempfile::tempdir;
use tile_rules::loader::load_from_file;
use tile_rules::{Direction, LoadError, Role, TileId};

// Helper function to create the full path to test data
fn test_data_path(filename: &str) -> std::path::PathBuf {
    let mut path = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("rules_data");
    path.push(filename);
    path
}

#[test]
fn test_load_valid_simple() {
    let catalog = load_from_file(&test_data_path("valid_simple.ron")).unwrap();

    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.role(TileId(0)), Some(&Role::Floor));
    assert_eq!(catalog.role(TileId(1)), Some(&Role::Wall));

    // A towards E: explicit allowed set {A, B}.
    let east = catalog.effective_allowed(TileId(0), Direction::E);
    assert_eq!(east.count_ones(), 2);
    // B towards W: nothing allowed explicitly, A forbidden => only B.
    let west = catalog.effective_allowed(TileId(1), Direction::W);
    assert!(!west[0]);
    assert!(west[1]);
    // Undeclared directions stay open.
    assert_eq!(catalog.effective_allowed(TileId(0), Direction::N).count_ones(), 2);
}

#[test]
fn test_load_invalid_dup_name() {
    match load_from_file(&test_data_path("invalid_dup_name.ron")) {
        Err(LoadError::InvalidData(msg)) => assert!(msg.contains("Duplicate tile name: A")),
        other => panic!("Expected InvalidData error for duplicate name, got {other:?}"),
    }
}

#[test]
fn test_load_invalid_unknown_tile() {
    match load_from_file(&test_data_path("invalid_unknown_tile.ron")) {
        Err(LoadError::InvalidData(msg)) => assert!(msg.contains("Unknown tile: Z")),
        other => panic!("Expected InvalidData error for unknown tile, got {other:?}"),
    }
}

#[test]
fn test_load_rejects_tile_in_both_sets() {
    let result = load_from_file(&test_data_path("invalid_both_sets.ron"));
    assert!(matches!(result, Err(LoadError::InvalidData(_))));
}

#[test]
fn test_load_json_auto_relations() {
    let catalog = load_from_file(&test_data_path("auto_roles.json")).unwrap();
    let rule = catalog.rule(TileId(0), Direction::SW).unwrap();
    assert!(rule.allowed().contains(&TileId(1)));
    assert!(!rule.allowed().contains(&TileId(2)));
}

#[test]
fn test_load_missing_file_is_io_error() {
    let result = load_from_file(&test_data_path("does_not_exist.ron"));
    assert!(matches!(result, Err(LoadError::Io(_))));
}

#[test]
fn test_load_unsupported_extension() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("catalog.yaml");
    fs::write(&path, "tiles: []").unwrap();
    assert!(matches!(
        load_from_file(&path),
        Err(LoadError::UnsupportedFormat(_))
    ));
}

#[test]
fn test_load_empty_catalog_is_allowed() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.ron");
    fs::write(&path, "(tiles: [])").unwrap();
    let catalog = load_from_file(&path).unwrap();
    assert!(catalog.is_empty());
}
