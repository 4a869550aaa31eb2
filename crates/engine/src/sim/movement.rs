use tracing::{trace, warn};

use crate::nav::{choose_direction, DistanceField};
use crate::world::{Direction, EntityId, Position, TileCoord, TILE_SIZE};

use super::input::InputSnapshot;
use super::interaction::{resolve_arrival, ArrivalEffect, TickEvent};
use super::level::LevelState;

/// Distance bookkeeping for one entity over one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovementSummary {
    pub entity: EntityId,
    /// `speed * elapsed` for this tick.
    pub requested: u32,
    pub travelled: u32,
    pub crossings: u32,
    /// Set when movement stopped because a tile lay outside the grid.
    pub aborted: bool,
}

impl MovementSummary {
    fn new(entity: EntityId, requested: u32) -> Self {
        Self {
            entity,
            requested,
            travelled: 0,
            crossings: 0,
            aborted: false,
        }
    }
}

/// The next tile boundary reached from a position along a direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundaryStep {
    pub distance: u32,
    pub snapped: Position,
    pub leaving: TileCoord,
    pub entering: TileCoord,
}

/// Where an entity at `position` heading `direction` next crosses into a new
/// tile. `None` for [`Direction::None`].
pub fn next_boundary(position: Position, direction: Direction) -> Option<BoundaryStep> {
    let Position { x, y } = position;
    let (axis, snapped_axis, leaving_axis, entering_axis) = match direction {
        Direction::None => return None,
        Direction::Up => {
            let boundary = (y - 1).div_euclid(TILE_SIZE) * TILE_SIZE;
            let entering = boundary / TILE_SIZE;
            (y, boundary, entering + 1, entering)
        }
        Direction::Left => {
            let boundary = (x - 1).div_euclid(TILE_SIZE) * TILE_SIZE;
            let entering = boundary / TILE_SIZE;
            (x, boundary, entering + 1, entering)
        }
        Direction::Down => {
            let leaving = y.div_euclid(TILE_SIZE);
            (y, (leaving + 1) * TILE_SIZE, leaving, leaving + 1)
        }
        Direction::Right => {
            let leaving = x.div_euclid(TILE_SIZE);
            (x, (leaving + 1) * TILE_SIZE, leaving, leaving + 1)
        }
    };

    let floor = position.floor_tile();
    let (snapped, leaving, entering) = match direction {
        Direction::Up | Direction::Down => (
            Position { x, y: snapped_axis },
            TileCoord::new(floor.x, leaving_axis),
            TileCoord::new(floor.x, entering_axis),
        ),
        _ => (
            Position { x: snapped_axis, y },
            TileCoord::new(leaving_axis, floor.y),
            TileCoord::new(entering_axis, floor.y),
        ),
    };
    Some(BoundaryStep {
        distance: axis.abs_diff(snapped_axis),
        snapped,
        leaving,
        entering,
    })
}

/// Moves one entity up to `advance` units, crossing as many tile boundaries as
/// the distance allows and resolving each arrival.
pub(crate) fn advance_entity(
    level: &mut LevelState,
    field: &mut DistanceField,
    id: EntityId,
    advance: u32,
    input: &InputSnapshot,
    life_limit: u32,
    events: &mut Vec<TickEvent>,
) -> (MovementSummary, ArrivalEffect) {
    let mut summary = MovementSummary::new(id, advance);
    let mut remaining = advance;

    while remaining > 0 {
        let Some(entity) = level.entity(id).copied() else {
            break;
        };
        let current = entity.tile();
        if !level.grid().contains(current) {
            warn!(entity = id.0, x = current.x, y = current.y, "movement_out_of_range");
            summary.aborted = true;
            break;
        }

        let mut direction = entity.direction;
        if entity.is_aligned() {
            let (grid, entities) = level.split_mut();
            direction = choose_direction(field, grid, entities, id, input);
            if let Some(entity) = level.entity_mut(id) {
                entity.direction = direction;
            }
        }
        let Some(step) = next_boundary(entity.position, direction) else {
            break;
        };
        if !level.grid().contains(step.entering) {
            warn!(
                entity = id.0,
                x = step.entering.x,
                y = step.entering.y,
                ?direction,
                "movement_out_of_range"
            );
            summary.aborted = true;
            break;
        }

        if remaining < step.distance {
            let (dx, dy) = direction.offset();
            if let Some(entity) = level.entity_mut(id) {
                entity.position.x += dx * remaining as i32;
                entity.position.y += dy * remaining as i32;
            }
            summary.travelled += remaining;
            break;
        }

        remaining -= step.distance;
        summary.travelled += step.distance;
        summary.crossings += 1;
        if let Some(entity) = level.entity_mut(id) {
            entity.position = step.snapped;
        }
        level.grid_mut().set_occupied(step.leaving, false);
        trace!(
            entity = id.0,
            from_x = step.leaving.x,
            from_y = step.leaving.y,
            to_x = step.entering.x,
            to_y = step.entering.y,
            remaining,
            "tile_crossed"
        );
        if resolve_arrival(level, id, step.entering, life_limit, events) == ArrivalEffect::Halt {
            return (summary, ArrivalEffect::Halt);
        }
    }

    (summary, ArrivalEffect::Continue)
}
