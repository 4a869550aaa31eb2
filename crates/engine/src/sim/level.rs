use thiserror::Error;
use tracing::debug;

use crate::content::LevelBlueprint;
use crate::world::{Entity, EntityId, EntityKind, Grid, TileCoord};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LevelStatus {
    #[default]
    Playing,
    Complete,
    GameOver,
}

impl LevelStatus {
    pub fn is_finished(self) -> bool {
        self != Self::Playing
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LevelBuildError {
    #[error("spawn {index} ({kind}) at ({x}, {y}) is outside the grid")]
    SpawnOutOfRange {
        index: usize,
        kind: &'static str,
        x: i32,
        y: i32,
    },
    #[error("spawn {index} ({kind}) at ({x}, {y}) is on a wall")]
    SpawnOnWall {
        index: usize,
        kind: &'static str,
        x: i32,
        y: i32,
    },
    #[error("blueprint declares {declared} pellets but the grid holds {actual}")]
    PelletCountMismatch { declared: u32, actual: u32 },
}

/// Everything that lives for one level: grid, entities and counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelState {
    grid: Grid,
    entities: Vec<Entity>,
    remaining_pellets: u32,
    losses: u32,
    status: LevelStatus,
}

impl LevelState {
    /// Builds a fresh level with zeroed counters. Every spawn tile starts occupied.
    pub fn from_blueprint(blueprint: LevelBlueprint) -> Result<Self, LevelBuildError> {
        let LevelBlueprint {
            grid,
            spawns,
            pellet_count,
        } = blueprint;

        for (index, spawn) in spawns.iter().enumerate() {
            let TileCoord { x, y } = spawn.tile;
            let kind = spawn.kind.label();
            if !grid.contains(spawn.tile) {
                return Err(LevelBuildError::SpawnOutOfRange { index, kind, x, y });
            }
            if grid.is_wall(spawn.tile) {
                return Err(LevelBuildError::SpawnOnWall { index, kind, x, y });
            }
        }
        let actual = grid.pellet_count();
        if actual != pellet_count {
            return Err(LevelBuildError::PelletCountMismatch {
                declared: pellet_count,
                actual,
            });
        }

        let entities = spawns
            .iter()
            .map(|spawn| Entity::spawn(spawn.kind, spawn.tile))
            .collect();
        let mut level = Self {
            grid,
            entities,
            remaining_pellets: pellet_count,
            losses: 0,
            status: LevelStatus::Playing,
        };
        level.rebuild_occupancy();
        Ok(level)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id.0)
    }

    pub fn remaining_pellets(&self) -> u32 {
        self.remaining_pellets
    }

    pub fn losses(&self) -> u32 {
        self.losses
    }

    pub fn status(&self) -> LevelStatus {
        self.status
    }

    /// First entity of `kind` in spawn order.
    pub fn find_kind(&self, kind: EntityKind) -> Option<EntityId> {
        self.entities
            .iter()
            .position(|entity| entity.kind == kind)
            .map(EntityId)
    }

    /// Sends every entity back to its origin with no direction and rebuilds occupancy.
    pub fn reset_positions(&mut self) {
        for entity in &mut self.entities {
            entity.reset_to_origin();
        }
        self.rebuild_occupancy();
        debug!(entity_count = self.entities.len(), "positions_reset");
    }

    /// Occupancy becomes exactly the set of tiles the entities currently hold.
    pub fn rebuild_occupancy(&mut self) {
        self.grid.clear_occupancy();
        for entity in &self.entities {
            self.grid.set_occupied(entity.held_tile(), true);
        }
    }

    pub(crate) fn carry_losses(&mut self, losses: u32) {
        self.losses = losses;
    }

    pub(crate) fn split_mut(&mut self) -> (&mut Grid, &[Entity]) {
        (&mut self.grid, &self.entities)
    }

    pub(crate) fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub(crate) fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id.0)
    }

    /// Returns the pellets left after the pickup.
    pub(crate) fn consume_pellet(&mut self) -> u32 {
        self.remaining_pellets = self.remaining_pellets.saturating_sub(1);
        self.remaining_pellets
    }

    /// Returns the new loss tally.
    pub(crate) fn record_loss(&mut self) -> u32 {
        self.losses += 1;
        self.losses
    }

    pub(crate) fn set_status(&mut self, status: LevelStatus) {
        self.status = status;
    }
}
