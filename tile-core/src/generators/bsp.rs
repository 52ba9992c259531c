use log::debug;
use rand::{Rng, RngCore};
use tile_rules::TileCatalog;

use crate::generators::MapGenerator;
use crate::grid::TileGrid;
use crate::palette::RolePalette;
use crate::{validate_dimensions, GenerationError};

/// Splitting stops below this depth.
const MAX_SPLIT_DEPTH: usize = 4;

/// Parameters for the room partitioner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BspParams {
    pub min_room_size: usize,
    pub max_room_size: usize,
    pub corridor_width: usize,
}

impl Default for BspParams {
    fn default() -> Self {
        Self {
            min_room_size: 5,
            max_room_size: 10,
            corridor_width: 2,
        }
    }
}

impl BspParams {
    /// Rejects sizes that cannot produce a room or a corridor.
    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.min_room_size == 0 {
            return Err(GenerationError::InvalidParameter(
                "min_room_size must be at least 1".to_owned(),
            ));
        }
        // Splitting compares leaf sides against twice the minimum.
        if self.min_room_size.checked_mul(2).is_none() {
            return Err(GenerationError::InvalidParameter(format!(
                "min_room_size {} is too large",
                self.min_room_size
            )));
        }
        if self.max_room_size < self.min_room_size {
            return Err(GenerationError::InvalidParameter(format!(
                "max_room_size ({}) is smaller than min_room_size ({})",
                self.max_room_size, self.min_room_size
            )));
        }
        if self.corridor_width == 0 {
            return Err(GenerationError::InvalidParameter(
                "corridor_width must be at least 1".to_owned(),
            ));
        }
        Ok(())
    }
}

/// A carved rectangular room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Room {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Room {
    pub fn center(&self) -> (usize, usize) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        (self.x..self.x + self.width).contains(&x) && (self.y..self.y + self.height).contains(&y)
    }
}

/// Binary space partitioning dungeon generator.
///
/// The map is split recursively, one room is carved per leaf, and rooms are
/// chained in creation order by L-shaped corridors.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoomPartitioner {
    params: BspParams,
}

impl RoomPartitioner {
    pub fn new(params: BspParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &BspParams {
        &self.params
    }

    pub fn partition<R: Rng + ?Sized>(
        &self,
        width: usize,
        height: usize,
        catalog: &TileCatalog,
        rng: &mut R,
    ) -> Result<TileGrid, GenerationError> {
        self.partition_with_rooms(width, height, catalog, rng)
            .map(|(grid, _)| grid)
    }

    /// Like [`RoomPartitioner::partition`], also returning the rooms in
    /// creation order.
    pub fn partition_with_rooms<R: Rng + ?Sized>(
        &self,
        width: usize,
        height: usize,
        catalog: &TileCatalog,
        rng: &mut R,
    ) -> Result<(TileGrid, Vec<Room>), GenerationError> {
        validate_dimensions(width, height)?;
        self.params.validate()?;

        let floor = RolePalette::floor(catalog);
        let wall = RolePalette::wall(catalog);

        let mut grid = TileGrid::new(width, height);
        for y in 0..height {
            for x in 0..width {
                wall.paint(&mut grid, x, y, catalog, rng);
            }
        }

        let rooms = self.layout(width, height, rng);

        for room in &rooms {
            for y in room.y..(room.y + room.height).min(height) {
                for x in room.x..(room.x + room.width).min(width) {
                    floor.paint(&mut grid, x, y, catalog, rng);
                }
            }
        }

        for pair in rooms.windows(2) {
            self.carve_corridor(&mut grid, pair[0], pair[1], &floor, catalog, rng);
        }

        debug!(
            "BSP {width}x{height}: {} rooms with {:?}",
            rooms.len(),
            self.params
        );
        Ok((grid, rooms))
    }

    /// Splits the area and returns one room per leaf that can hold one.
    ///
    /// If every leaf came out too thin for a room, a single room is placed
    /// in the whole area instead, when the area itself can hold one.
    pub fn layout<R: Rng + ?Sized>(&self, width: usize, height: usize, rng: &mut R) -> Vec<Room> {
        let mut rooms = Vec::new();
        self.split(0, 0, width, height, 0, rng, &mut rooms);
        if rooms.is_empty() {
            rooms.extend(self.place_room(0, 0, width, height, rng));
        }
        rooms
    }

    #[allow(clippy::too_many_arguments)]
    fn split<R: Rng + ?Sized>(
        &self,
        x: usize,
        y: usize,
        w: usize,
        h: usize,
        depth: usize,
        rng: &mut R,
        rooms: &mut Vec<Room>,
    ) {
        let min = self.params.min_room_size;
        let is_leaf = depth > MAX_SPLIT_DEPTH || w < min * 2 || h < min * 2;

        if !is_leaf {
            let cut_width_first = rng.gen_bool(0.5);
            let can_cut_width = w > min * 2;
            let can_cut_height = h > min * 2;
            // Try the preferred axis, then the other one; a node that fits
            // neither becomes a leaf.
            if can_cut_width && (cut_width_first || !can_cut_height) {
                let s = rng.gen_range(w / 3..=2 * w / 3);
                self.split(x, y, s, h, depth + 1, rng, rooms);
                self.split(x + s, y, w - s, h, depth + 1, rng, rooms);
                return;
            }
            if can_cut_height {
                let s = rng.gen_range(h / 3..=2 * h / 3);
                self.split(x, y, w, s, depth + 1, rng, rooms);
                self.split(x, y + s, w, h - s, depth + 1, rng, rooms);
                return;
            }
        }

        if let Some(room) = self.place_room(x, y, w, h, rng) {
            rooms.push(room);
        }
    }

    /// Picks a room inside the leaf, keeping one cell of margin on every side.
    fn place_room<R: Rng + ?Sized>(
        &self,
        x: usize,
        y: usize,
        w: usize,
        h: usize,
        rng: &mut R,
    ) -> Option<Room> {
        let min = self.params.min_room_size;
        let max_w = self.params.max_room_size.min(w.saturating_sub(2));
        let max_h = self.params.max_room_size.min(h.saturating_sub(2));
        if max_w < min || max_h < min {
            return None;
        }
        let room_w = rng.gen_range(min..=max_w);
        let room_h = rng.gen_range(min..=max_h);
        // Offsets are in [1, dim - size - 1], inclusive on both ends.
        let room_x = x + rng.gen_range(1..=(w - room_w - 1).max(1));
        let room_y = y + rng.gen_range(1..=(h - room_h - 1).max(1));
        Some(Room {
            x: room_x,
            y: room_y,
            width: room_w,
            height: room_h,
        })
    }

    /// Horizontal run along `a`'s centre row to `b`'s centre column, then a
    /// vertical run along that column to `b`'s centre row.
    fn carve_corridor<R: Rng + ?Sized>(
        &self,
        grid: &mut TileGrid,
        a: Room,
        b: Room,
        floor: &RolePalette,
        catalog: &TileCatalog,
        rng: &mut R,
    ) {
        let (cx1, cy1) = a.center();
        let (cx2, cy2) = b.center();
        let (width, height) = (grid.width(), grid.height());

        // Offsets past the map edge would be clipped anyway.
        let thickness = self.params.corridor_width.min(width.max(height));
        for x in cx1.min(cx2)..=cx1.max(cx2) {
            for offset in 0..thickness {
                let y = cy1 + offset;
                if x < width && y < height {
                    floor.paint(grid, x, y, catalog, rng);
                }
            }
        }
        for y in cy1.min(cy2)..=cy1.max(cy2) {
            for offset in 0..thickness {
                let x = cx2 + offset;
                if x < width && y < height {
                    floor.paint(grid, x, y, catalog, rng);
                }
            }
        }
    }
}

impl MapGenerator for RoomPartitioner {
    fn name(&self) -> &'static str {
        "bsp"
    }

    fn generate(
        &self,
        width: usize,
        height: usize,
        catalog: &TileCatalog,
        rng: &mut dyn RngCore,
    ) -> Result<TileGrid, GenerationError> {
        self.partition(width, height, catalog, rng)
    }
}
