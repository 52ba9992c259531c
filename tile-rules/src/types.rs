use bitvec::prelude::*;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::generator::generate_role_relations;

/// Represents a unique identifier for a tile.
///
/// Used as an index into the catalog's tile list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TileId(pub usize);

/// Errors that can occur while editing a [`TileCatalog`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// A tile index outside the catalog was referenced.
    #[error("Tile index {tile} is out of range for a catalog of {len} tiles")]
    TileOutOfRange { tile: usize, len: usize },
    /// A direction name that is not one of the eight compass points.
    #[error("Unknown direction: {0}")]
    UnknownDirection(String),
}

/// Semantic category of a tile.
///
/// The eight known roles drive generation; any other string is carried
/// through untouched as [`Role::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "String", into = "String"))]
pub enum Role {
    #[default]
    Empty,
    Floor,
    Wall,
    Decoration,
    Water,
    Door,
    Spawn,
    Exit,
    Other(String),
}

impl Role {
    /// Every recognized role, in declaration order.
    pub const KNOWN: [Role; 8] = [
        Role::Empty,
        Role::Floor,
        Role::Wall,
        Role::Decoration,
        Role::Water,
        Role::Door,
        Role::Spawn,
        Role::Exit,
    ];

    /// Lowercase name as written in catalog files.
    pub fn as_str(&self) -> &str {
        match self {
            Role::Empty => "empty",
            Role::Floor => "floor",
            Role::Wall => "wall",
            Role::Decoration => "decoration",
            Role::Water => "water",
            Role::Door => "door",
            Role::Spawn => "spawn",
            Role::Exit => "exit",
            Role::Other(name) => name,
        }
    }

    /// Display colour for previews. Unrecognized roles share a generic grey.
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            Role::Empty => (51, 51, 51),
            Role::Floor => (139, 115, 85),
            Role::Wall => (74, 74, 74),
            Role::Decoration => (107, 142, 35),
            Role::Water => (70, 130, 180),
            Role::Door => (205, 133, 63),
            Role::Spawn => (50, 205, 50),
            Role::Exit => (255, 69, 0),
            Role::Other(_) => (128, 128, 128),
        }
    }

    /// `false` for roles outside the fixed vocabulary.
    pub fn is_known(&self) -> bool {
        !matches!(self, Role::Other(_))
    }
}

impl From<&str> for Role {
    fn from(name: &str) -> Self {
        match name {
            "empty" => Role::Empty,
            "floor" => Role::Floor,
            "wall" => Role::Wall,
            "decoration" => Role::Decoration,
            "water" => Role::Water,
            "door" => Role::Door,
            "spawn" => Role::Spawn,
            "exit" => Role::Exit,
            other => Role::Other(other.to_owned()),
        }
    }
}

impl From<String> for Role {
    fn from(name: String) -> Self {
        Role::from(name.as_str())
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Other(name) => name,
            known => known.as_str().to_owned(),
        }
    }
}

impl FromStr for Role {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Role::from(s))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The eight compass directions used for adjacency.
///
/// Offsets follow screen coordinates: `y` grows downward, so north is `(0, -1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::N,
        Direction::NE,
        Direction::E,
        Direction::SE,
        Direction::S,
        Direction::SW,
        Direction::W,
        Direction::NW,
    ];

    /// Position of this direction in [`Direction::ALL`].
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// `(dx, dy)` step towards the neighbour in this direction.
    pub fn offset(self) -> (isize, isize) {
        match self {
            Direction::N => (0, -1),
            Direction::NE => (1, -1),
            Direction::E => (1, 0),
            Direction::SE => (1, 1),
            Direction::S => (0, 1),
            Direction::SW => (-1, 1),
            Direction::W => (-1, 0),
            Direction::NW => (-1, -1),
        }
    }

    /// The direction pointing back at the source.
    pub fn opposite(self) -> Self {
        match self {
            Direction::N => Direction::S,
            Direction::NE => Direction::SW,
            Direction::E => Direction::W,
            Direction::SE => Direction::NW,
            Direction::S => Direction::N,
            Direction::SW => Direction::NE,
            Direction::W => Direction::E,
            Direction::NW => Direction::SE,
        }
    }

    /// Compass abbreviation, e.g. `NE`.
    pub fn name(self) -> &'static str {
        match self {
            Direction::N => "N",
            Direction::NE => "NE",
            Direction::E => "E",
            Direction::SE => "SE",
            Direction::S => "S",
            Direction::SW => "SW",
            Direction::W => "W",
            Direction::NW => "NW",
        }
    }

    /// Neighbour coordinates of `(x, y)` in this direction, if inside a
    /// `width` x `height` area.
    pub fn step(self, x: usize, y: usize, width: usize, height: usize) -> Option<(usize, usize)> {
        let (dx, dy) = self.offset();
        let nx = x.checked_add_signed(dx)?;
        let ny = y.checked_add_signed(dy)?;
        (nx < width && ny < height).then_some((nx, ny))
    }
}

impl FromStr for Direction {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Direction::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| CatalogError::UnknownDirection(s.to_owned()))
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which of the two relation sets an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationKind {
    Allowed,
    Forbidden,
}

/// Adjacency constraints of one tile towards one direction.
///
/// A tile index is never in both sets: inserting into one evicts it from the
/// other.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectionalRule {
    allowed: BTreeSet<TileId>,
    forbidden: BTreeSet<TileId>,
}

impl DirectionalRule {
    /// Explicitly allowed neighbours.
    pub fn allowed(&self) -> &BTreeSet<TileId> {
        &self.allowed
    }

    /// Explicitly forbidden neighbours.
    pub fn forbidden(&self) -> &BTreeSet<TileId> {
        &self.forbidden
    }

    /// `true` when neither set constrains this direction.
    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty() && self.forbidden.is_empty()
    }

    /// Adds `tile` to the allowed set, dropping it from the forbidden one.
    pub fn allow(&mut self, tile: TileId) {
        self.forbidden.remove(&tile);
        self.allowed.insert(tile);
    }

    /// Adds `tile` to the forbidden set, dropping it from the allowed one.
    pub fn forbid(&mut self, tile: TileId) {
        self.allowed.remove(&tile);
        self.forbidden.insert(tile);
    }

    /// Removes `tile` from the `kind` set if present, otherwise inserts it
    /// (evicting it from the other set). Returns whether it is now present.
    pub fn toggle(&mut self, kind: RelationKind, tile: TileId) -> bool {
        let set = match kind {
            RelationKind::Allowed => &mut self.allowed,
            RelationKind::Forbidden => &mut self.forbidden,
        };
        if set.remove(&tile) {
            return false;
        }
        match kind {
            RelationKind::Allowed => self.allow(tile),
            RelationKind::Forbidden => self.forbid(tile),
        }
        true
    }

    /// Empties both sets.
    pub fn clear(&mut self) {
        self.allowed.clear();
        self.forbidden.clear();
    }

    /// Tiles permitted next to the owner in this direction, out of a universe
    /// of `num_tiles`.
    ///
    /// A non-empty allowed set is taken as-is (minus anything forbidden). An
    /// empty allowed set means no positive constraint was declared, so every
    /// tile not explicitly forbidden is permitted.
    pub fn effective_allowed(&self, num_tiles: usize) -> BitVec {
        let mut permitted = if self.allowed.is_empty() {
            bitvec![1; num_tiles]
        } else {
            let mut only = bitvec![0; num_tiles];
            for tile in self.allowed.iter().filter(|t| t.0 < num_tiles) {
                only.set(tile.0, true);
            }
            only
        };
        for tile in self.forbidden.iter().filter(|t| t.0 < num_tiles) {
            permitted.set(tile.0, false);
        }
        permitted
    }
}

/// One catalog entry: a role plus a rule per direction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TileRecord {
    /// Role copied into every cell that receives this tile.
    pub role: Role,
    rules: [DirectionalRule; 8],
}

impl TileRecord {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            rules: Default::default(),
        }
    }

    /// Rule for neighbours in `direction`.
    pub fn rule(&self, direction: Direction) -> &DirectionalRule {
        &self.rules[direction.index()]
    }

    pub fn rule_mut(&mut self, direction: Direction) -> &mut DirectionalRule {
        &mut self.rules[direction.index()]
    }

    /// Resets every direction to unconstrained.
    pub fn clear_relations(&mut self) {
        self.rules.iter_mut().for_each(DirectionalRule::clear);
    }
}

/// Ordered set of tiles with roles and directional adjacency constraints.
///
/// The engine only ever reads a catalog; every edit goes through the methods
/// below so the allowed/forbidden exclusivity holds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TileCatalog {
    tiles: Vec<TileRecord>,
}

impl TileCatalog {
    /// Creates `count` tiles with role `empty` and no relations.
    pub fn new(count: usize) -> Self {
        Self {
            tiles: vec![TileRecord::default(); count],
        }
    }

    pub fn from_roles<I, R>(roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Role>,
    {
        Self {
            tiles: roles
                .into_iter()
                .map(|r| TileRecord::new(r.into()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tiles(&self) -> &[TileRecord] {
        &self.tiles
    }

    pub fn tile(&self, id: TileId) -> Option<&TileRecord> {
        self.tiles.get(id.0)
    }

    pub fn role(&self, id: TileId) -> Option<&Role> {
        self.tile(id).map(|t| &t.role)
    }

    /// Appends a tile and returns its id.
    pub fn push(&mut self, role: impl Into<Role>) -> TileId {
        self.tiles.push(TileRecord::new(role.into()));
        TileId(self.tiles.len() - 1)
    }

    /// Indices of all tiles carrying `role`, in catalog order.
    pub fn tiles_with_role(&self, role: &Role) -> Vec<TileId> {
        self.tiles
            .iter()
            .enumerate()
            .filter(|(_, t)| &t.role == role)
            .map(|(i, _)| TileId(i))
            .collect()
    }

    fn check(&self, id: TileId) -> Result<(), CatalogError> {
        if id.0 < self.tiles.len() {
            Ok(())
        } else {
            Err(CatalogError::TileOutOfRange {
                tile: id.0,
                len: self.tiles.len(),
            })
        }
    }

    fn record_mut(&mut self, id: TileId) -> Result<&mut TileRecord, CatalogError> {
        self.check(id)?;
        Ok(&mut self.tiles[id.0])
    }

    /// Replaces the role of one tile.
    pub fn set_role(&mut self, id: TileId, role: impl Into<Role>) -> Result<(), CatalogError> {
        self.record_mut(id)?.role = role.into();
        Ok(())
    }

    /// Assigns `role` to every listed tile, skipping indices outside the
    /// catalog. Returns how many tiles were updated.
    pub fn set_roles(&mut self, ids: &[TileId], role: &Role) -> usize {
        let mut applied = 0;
        for id in ids {
            if let Some(record) = self.tiles.get_mut(id.0) {
                record.role = role.clone();
                applied += 1;
            }
        }
        applied
    }

    /// Rule of `id` towards `direction`, `None` past the end of the catalog.
    pub fn rule(&self, id: TileId, direction: Direction) -> Option<&DirectionalRule> {
        self.tile(id).map(|t| t.rule(direction))
    }

    /// Lets `target` sit next to `source` in `direction`.
    pub fn allow(
        &mut self,
        source: TileId,
        direction: Direction,
        target: TileId,
    ) -> Result<(), CatalogError> {
        self.check(target)?;
        self.record_mut(source)?.rule_mut(direction).allow(target);
        Ok(())
    }

    /// Keeps `target` away from `source` in `direction`.
    pub fn forbid(
        &mut self,
        source: TileId,
        direction: Direction,
        target: TileId,
    ) -> Result<(), CatalogError> {
        self.check(target)?;
        self.record_mut(source)?.rule_mut(direction).forbid(target);
        Ok(())
    }

    /// Toggles `target` in one relation set of `source` towards `direction`.
    /// Returns whether `target` is in the set afterwards.
    pub fn toggle(
        &mut self,
        source: TileId,
        direction: Direction,
        target: TileId,
        kind: RelationKind,
    ) -> Result<bool, CatalogError> {
        self.check(target)?;
        Ok(self
            .record_mut(source)?
            .rule_mut(direction)
            .toggle(kind, target))
    }

    /// Applies [`TileCatalog::toggle`] independently in all eight directions.
    pub fn toggle_all_directions(
        &mut self,
        source: TileId,
        target: TileId,
        kind: RelationKind,
    ) -> Result<(), CatalogError> {
        self.check(target)?;
        let record = self.record_mut(source)?;
        for direction in Direction::ALL {
            record.rule_mut(direction).toggle(kind, target);
        }
        Ok(())
    }

    /// Drops every adjacency rule while keeping the tiles.
    pub fn clear_relations(&mut self) {
        self.tiles.iter_mut().for_each(TileRecord::clear_relations);
    }

    /// Replaces all relations with role-derived ones: tiles sharing a role may
    /// neighbour each other in every direction.
    pub fn auto_relations(&mut self) {
        let pairs = generate_role_relations(self);
        self.clear_relations();
        for (source, target) in pairs {
            let record = &mut self.tiles[source.0];
            for direction in Direction::ALL {
                record.rule_mut(direction).allow(target);
            }
        }
    }

    /// Union of allowed and forbidden sets across every direction.
    pub fn flattened_relations(&self, id: TileId) -> Option<(BTreeSet<TileId>, BTreeSet<TileId>)> {
        let record = self.tile(id)?;
        let mut allowed = BTreeSet::new();
        let mut forbidden = BTreeSet::new();
        for direction in Direction::ALL {
            let rule = record.rule(direction);
            allowed.extend(rule.allowed().iter().copied());
            forbidden.extend(rule.forbidden().iter().copied());
        }
        Some((allowed, forbidden))
    }

    /// Effective allowed set of `id` towards `direction`; see
    /// [`DirectionalRule::effective_allowed`]. An unknown id permits nothing.
    pub fn effective_allowed(&self, id: TileId, direction: Direction) -> BitVec {
        match self.rule(id, direction) {
            Some(rule) => rule.effective_allowed(self.len()),
            None => bitvec![0; self.len()],
        }
    }
}
