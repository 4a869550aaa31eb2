use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::entity::{Direction, EntityId};

/// Edge length of one tile in sub-tile position units.
pub const TILE_SIZE: i32 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    Wall,
    Open,
    Pellet,
    Consumed,
}

impl TileKind {
    pub fn is_wall(self) -> bool {
        self == Self::Wall
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: i32,
    pub y: i32,
}

impl TileCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    pub fn manhattan(self, other: TileCoord) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

/// One grid cell: static kind plus per-tick bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    pub(crate) kind: TileKind,
    pub(crate) occupied: bool,
    pub(crate) claimant: Option<EntityId>,
    pub(crate) distance_value: u32,
    pub(crate) aggregate_score: i64,
}

impl Tile {
    fn new(kind: TileKind) -> Self {
        Self {
            kind,
            occupied: false,
            claimant: None,
            distance_value: 0,
            aggregate_score: 0,
        }
    }

    pub fn kind(&self) -> TileKind {
        self.kind
    }

    pub fn is_occupied(&self) -> bool {
        self.occupied
    }

    pub fn claimant(&self) -> Option<EntityId> {
        self.claimant
    }

    /// Distance written by the last flood-fill pass, if any pass reached this tile.
    pub fn distance_value(&self) -> Option<u32> {
        self.claimant.map(|_| self.distance_value)
    }

    pub fn aggregate_score(&self) -> i64 {
        self.aggregate_score
    }

    fn clear_field(&mut self) {
        self.claimant = None;
        self.distance_value = 0;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("grid dimensions must be non-zero, got {width}x{height}")]
    EmptyDimensions { width: u32, height: u32 },
    #[error("tile count mismatch: expected {expected}, got {actual}")]
    TileCountMismatch { expected: usize, actual: usize },
}

/// Row-major tile storage for one level. Anything outside the grid reads as a wall.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
}

impl Grid {
    pub fn new(width: u32, height: u32, kinds: Vec<TileKind>) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::EmptyDimensions { width, height });
        }
        let expected = width as usize * height as usize;
        let actual = kinds.len();
        if expected != actual {
            return Err(GridError::TileCountMismatch { expected, actual });
        }
        Ok(Self {
            width,
            height,
            tiles: kinds.into_iter().map(Tile::new).collect(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn contains(&self, coord: TileCoord) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && (coord.x as u32) < self.width
            && (coord.y as u32) < self.height
    }

    pub fn index_of(&self, coord: TileCoord) -> Option<usize> {
        if !self.contains(coord) {
            return None;
        }
        Some(coord.y as usize * self.width as usize + coord.x as usize)
    }

    pub fn coord_of(&self, index: usize) -> TileCoord {
        let width = self.width as usize;
        TileCoord::new((index % width) as i32, (index / width) as i32)
    }

    pub fn tile(&self, coord: TileCoord) -> Option<&Tile> {
        self.index_of(coord).and_then(|index| self.tiles.get(index))
    }

    pub(crate) fn tile_mut(&mut self, coord: TileCoord) -> Option<&mut Tile> {
        let index = self.index_of(coord)?;
        self.tiles.get_mut(index)
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub(crate) fn tiles_mut(&mut self) -> &mut [Tile] {
        &mut self.tiles
    }

    pub fn kind_at(&self, coord: TileCoord) -> TileKind {
        self.tile(coord).map_or(TileKind::Wall, Tile::kind)
    }

    pub fn is_wall(&self, coord: TileCoord) -> bool {
        self.kind_at(coord).is_wall()
    }

    pub fn is_occupied(&self, coord: TileCoord) -> bool {
        self.tile(coord).is_some_and(Tile::is_occupied)
    }

    /// Open (non-wall) neighbors of `coord`, in direction priority order.
    pub fn open_directions(&self, coord: TileCoord) -> impl Iterator<Item = Direction> + '_ {
        Direction::PRIORITY
            .into_iter()
            .filter(move |direction| !self.is_wall(coord.step(*direction)))
    }

    pub fn pellet_count(&self) -> u32 {
        self.tiles
            .iter()
            .filter(|tile| tile.kind == TileKind::Pellet)
            .count() as u32
    }

    /// Returns false when `coord` lies outside the grid.
    pub(crate) fn set_occupied(&mut self, coord: TileCoord, occupied: bool) -> bool {
        match self.tile_mut(coord) {
            Some(tile) => {
                tile.occupied = occupied;
                true
            }
            None => false,
        }
    }

    pub(crate) fn clear_occupancy(&mut self) {
        for tile in &mut self.tiles {
            tile.occupied = false;
        }
    }

    /// Clears claimant and distance bookkeeping on every tile.
    pub fn reset_field(&mut self) {
        for tile in &mut self.tiles {
            tile.clear_field();
        }
    }
}
