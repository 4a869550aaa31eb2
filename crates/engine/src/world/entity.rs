use serde::{Deserialize, Serialize};

use super::grid::{TileCoord, TILE_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Hunter,
    Prey,
}

impl EntityKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Player => "player",
            Self::Hunter => "hunter",
            Self::Prey => "prey",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    None,
    Up,
    Left,
    Right,
    Down,
}

impl Direction {
    /// Tie-break order shared by every direction decision.
    pub const PRIORITY: [Direction; 4] = [
        Direction::Up,
        Direction::Left,
        Direction::Right,
        Direction::Down,
    ];

    pub fn reverse(self) -> Self {
        match self {
            Self::None => Self::None,
            Self::Up => Self::Down,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::Down => Self::Up,
        }
    }

    pub fn offset(self) -> (i32, i32) {
        match self {
            Self::None => (0, 0),
            Self::Up => (0, -1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
            Self::Down => (0, 1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub usize);

/// Position in sub-tile units; `(0, 0)` is the top-left corner of tile `(0, 0)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn of_tile(tile: TileCoord) -> Self {
        Self {
            x: tile.x * TILE_SIZE,
            y: tile.y * TILE_SIZE,
        }
    }

    pub fn is_aligned(self) -> bool {
        self.x.rem_euclid(TILE_SIZE) == 0 && self.y.rem_euclid(TILE_SIZE) == 0
    }

    pub fn floor_tile(self) -> TileCoord {
        TileCoord {
            x: self.x.div_euclid(TILE_SIZE),
            y: self.y.div_euclid(TILE_SIZE),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub kind: EntityKind,
    pub position: Position,
    pub origin: Position,
    pub direction: Direction,
}

impl Entity {
    pub fn spawn(kind: EntityKind, tile: TileCoord) -> Self {
        let position = Position::of_tile(tile);
        Self {
            kind,
            position,
            origin: position,
            direction: Direction::None,
        }
    }

    pub fn is_aligned(&self) -> bool {
        self.position.is_aligned()
    }

    /// Tile containing the entity's top-left corner. Used as flood-fill seed.
    pub fn tile(&self) -> TileCoord {
        self.position.floor_tile()
    }

    /// Tile whose occupancy the entity still holds while between two tiles.
    ///
    /// Occupancy moves only on arrival, so an entity heading Left or Up with a
    /// non-zero sub-tile offset still holds the tile it came from, which is the
    /// floor tile plus one along the movement axis.
    pub fn held_tile(&self) -> TileCoord {
        let mut tile = self.position.floor_tile();
        if self.direction == Direction::Left && self.position.x.rem_euclid(TILE_SIZE) != 0 {
            tile.x += 1;
        }
        if self.direction == Direction::Up && self.position.y.rem_euclid(TILE_SIZE) != 0 {
            tile.y += 1;
        }
        tile
    }

    pub(crate) fn reset_to_origin(&mut self) {
        self.position = self.origin;
        self.direction = Direction::None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reverse_is_an_involution() {
        for direction in Direction::PRIORITY {
            assert_eq!(direction.reverse().reverse(), direction);
            assert_ne!(direction.reverse(), direction);
        }
        assert_eq!(Direction::None.reverse(), Direction::None);
    }

    #[test]
    fn held_tile_rounds_toward_the_tile_being_left() {
        let mut entity = Entity::spawn(EntityKind::Hunter, TileCoord::new(3, 2));
        entity.direction = Direction::Left;
        entity.position.x -= 5;
        assert_eq!(entity.tile(), TileCoord::new(2, 2));
        assert_eq!(entity.held_tile(), TileCoord::new(3, 2));

        entity.position = Position::of_tile(TileCoord::new(3, 2));
        entity.direction = Direction::Right;
        entity.position.x += 5;
        assert_eq!(entity.held_tile(), TileCoord::new(3, 2));

        entity.position = Position::of_tile(TileCoord::new(3, 2));
        entity.direction = Direction::Up;
        entity.position.y -= 1;
        assert_eq!(entity.held_tile(), TileCoord::new(3, 2));
    }

    #[test]
    fn reset_restores_origin_and_clears_direction() {
        let mut entity = Entity::spawn(EntityKind::Player, TileCoord::new(1, 1));
        entity.position = Position { x: 40, y: 16 };
        entity.direction = Direction::Right;
        entity.reset_to_origin();
        assert_eq!(entity.position, Position { x: 16, y: 16 });
        assert_eq!(entity.direction, Direction::None);
        assert!(entity.is_aligned());
    }
}
