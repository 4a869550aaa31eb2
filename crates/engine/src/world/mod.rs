mod entity;
mod grid;

pub use entity::{Direction, Entity, EntityId, EntityKind, Position};
pub use grid::{Grid, GridError, Tile, TileCoord, TileKind, TILE_SIZE};
