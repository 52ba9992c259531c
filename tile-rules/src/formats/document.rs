//! Serde mirror of a catalog document, shared by every text format.

use crate::types::{Direction, TileCatalog, TileId};
use crate::LoadError;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Default, Deserialize)]
struct RelationEntry {
    #[serde(default)]
    allowed: Vec<String>,
    #[serde(default)]
    forbidden: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct TileEntry {
    /// Name used to reference this tile from relation lists.
    name: String,
    #[serde(default = "default_role")]
    role: String,
    /// Keyed by direction short name (`"N"`, `"NE"`, ...).
    #[serde(default)]
    relations: BTreeMap<String, RelationEntry>,
}

fn default_role() -> String {
    "empty".to_owned()
}

/// Top-level structure of a catalog file.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogDocument {
    tiles: Vec<TileEntry>,
    /// Derive same-role relations before applying the explicit ones.
    #[serde(default)]
    auto_relations: bool,
}

impl CatalogDocument {
    /// Validates names and relation references and builds the catalog.
    pub fn into_catalog(self) -> Result<TileCatalog, LoadError> {
        let mut name_to_id = HashMap::new();
        for (index, tile) in self.tiles.iter().enumerate() {
            if name_to_id.insert(tile.name.as_str(), TileId(index)).is_some() {
                return Err(LoadError::InvalidData(format!(
                    "Duplicate tile name: {}",
                    tile.name
                )));
            }
        }

        let mut catalog = TileCatalog::from_roles(self.tiles.iter().map(|t| t.role.as_str()));
        if self.auto_relations {
            catalog.auto_relations();
        }

        let lookup = |name: &str| {
            name_to_id
                .get(name)
                .copied()
                .ok_or_else(|| LoadError::InvalidData(format!("Unknown tile: {name}")))
        };

        for (index, tile) in self.tiles.iter().enumerate() {
            let source = TileId(index);
            for (direction_name, entry) in &tile.relations {
                let direction: Direction = direction_name
                    .parse()
                    .map_err(|e| LoadError::InvalidData(format!("{e} (tile {})", tile.name)))?;
                if let Some(both) = entry.allowed.iter().find(|n| entry.forbidden.contains(n)) {
                    return Err(LoadError::InvalidData(format!(
                        "Tile {} lists {both} as both allowed and forbidden towards {direction}",
                        tile.name
                    )));
                }
                for name in &entry.allowed {
                    catalog
                        .allow(source, direction, lookup(name)?)
                        .map_err(|e| LoadError::InvalidData(e.to_string()))?;
                }
                for name in &entry.forbidden {
                    catalog
                        .forbid(source, direction, lookup(name)?)
                        .map_err(|e| LoadError::InvalidData(e.to_string()))?;
                }
            }
        }

        log::debug!(
            "Built catalog with {} tiles (auto relations: {})",
            catalog.len(),
            self.auto_relations
        );
        Ok(catalog)
    }
}
