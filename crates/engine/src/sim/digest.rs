use sha2::{Digest, Sha256};

use crate::world::{Direction, EntityKind, TileKind};

use super::level::{LevelState, LevelStatus};

/// SHA-256 over the observable level state: dimensions, tile kinds and
/// occupancy, every entity, and the counters. Field bookkeeping is excluded.
pub fn level_digest(level: &LevelState) -> String {
    let mut hasher = Sha256::new();
    let grid = level.grid();
    hasher.update(grid.width().to_le_bytes());
    hasher.update(grid.height().to_le_bytes());
    for tile in grid.tiles() {
        hasher.update([tile_kind_tag(tile.kind()), u8::from(tile.is_occupied())]);
    }

    hasher.update((level.entities().len() as u64).to_le_bytes());
    for entity in level.entities() {
        hasher.update([entity_kind_tag(entity.kind), direction_tag(entity.direction)]);
        for value in [
            entity.position.x,
            entity.position.y,
            entity.origin.x,
            entity.origin.y,
        ] {
            hasher.update(value.to_le_bytes());
        }
    }

    hasher.update(level.remaining_pellets().to_le_bytes());
    hasher.update(level.losses().to_le_bytes());
    hasher.update([status_tag(level.status())]);
    to_hex_lower(&hasher.finalize())
}

fn tile_kind_tag(kind: TileKind) -> u8 {
    match kind {
        TileKind::Wall => 0,
        TileKind::Open => 1,
        TileKind::Pellet => 2,
        TileKind::Consumed => 3,
    }
}

fn entity_kind_tag(kind: EntityKind) -> u8 {
    match kind {
        EntityKind::Player => 0,
        EntityKind::Hunter => 1,
        EntityKind::Prey => 2,
    }
}

fn direction_tag(direction: Direction) -> u8 {
    match direction {
        Direction::None => 0,
        Direction::Up => 1,
        Direction::Left => 2,
        Direction::Right => 3,
        Direction::Down => 4,
    }
}

fn status_tag(status: LevelStatus) -> u8 {
    match status {
        LevelStatus::Playing => 0,
        LevelStatus::Complete => 1,
        LevelStatus::GameOver => 2,
    }
}

fn to_hex_lower(bytes: &[u8]) -> String {
    let mut output = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        use std::fmt::Write as _;
        let _ = write!(&mut output, "{byte:02x}");
    }
    output
}
