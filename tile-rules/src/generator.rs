use crate::types::{TileCatalog, TileId};
use log::debug;

/// Derives adjacency pairs from tile roles.
///
/// Every pair of tiles that share a role (a tile with itself included) is
/// emitted as `(source, target)`; the caller allows `target` next to `source`
/// in all eight directions. Tiles with a unique role only pair with
/// themselves.
///
/// The result is ordered by source, then target, matching catalog order.
pub fn generate_role_relations(catalog: &TileCatalog) -> Vec<(TileId, TileId)> {
    let tiles = catalog.tiles();
    let mut pairs = Vec::new();
    for (i, source) in tiles.iter().enumerate() {
        for (j, target) in tiles.iter().enumerate() {
            if source.role == target.role {
                pairs.push((TileId(i), TileId(j)));
            }
        }
    }
    debug!(
        "Generated {} role-derived relation pairs for {} tiles",
        pairs.len(),
        tiles.len()
    );
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairs_only_share_roles() {
        let catalog = TileCatalog::from_roles(["floor", "wall", "floor", "lava"]);
        let pairs = generate_role_relations(&catalog);
        assert_eq!(
            pairs,
            vec![
                (TileId(0), TileId(0)),
                (TileId(0), TileId(2)),
                (TileId(1), TileId(1)),
                (TileId(2), TileId(0)),
                (TileId(2), TileId(2)),
                (TileId(3), TileId(3)),
            ]
        );
    }

    #[test]
    fn test_empty_catalog_has_no_pairs() {
        assert!(generate_role_relations(&TileCatalog::default()).is_empty());
    }
}
