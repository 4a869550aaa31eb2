use tracing::{debug, info};

use crate::world::{EntityId, EntityKind, TileCoord, TileKind};

use super::level::{LevelState, LevelStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WinCause {
    PreyCaught,
    PelletsCleared,
}

/// Something a tick did that the caller may want to react to, in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickEvent {
    PelletConsumed { tile: TileCoord, remaining: u32 },
    Loss { losses: u32 },
    Win { cause: WinCause },
    GameOver { losses: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encounter {
    Loss,
    Win,
}

/// What happens when an entity of kind `arriving` enters a tile held by `resident`.
pub fn encounter(arriving: EntityKind, resident: EntityKind) -> Option<Encounter> {
    match (arriving, resident) {
        (EntityKind::Hunter, EntityKind::Player) => Some(Encounter::Loss),
        (EntityKind::Player, EntityKind::Hunter) => Some(Encounter::Loss),
        (EntityKind::Player, EntityKind::Prey) => Some(Encounter::Win),
        (EntityKind::Prey, EntityKind::Player) => Some(Encounter::Win),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ArrivalEffect {
    Continue,
    /// An outcome fired; no entity moves any further this tick.
    Halt,
}

/// Applies pellet pickup, collision and occupancy for `id` entering `tile`.
///
/// Eating the last pellet wins the level before any collision is checked, so
/// a hunter holding that tile does not also cost a life.
pub(crate) fn resolve_arrival(
    level: &mut LevelState,
    id: EntityId,
    tile: TileCoord,
    life_limit: u32,
    events: &mut Vec<TickEvent>,
) -> ArrivalEffect {
    let Some(kind) = level.entity(id).map(|entity| entity.kind) else {
        return ArrivalEffect::Continue;
    };

    if kind == EntityKind::Player && level.grid().kind_at(tile) == TileKind::Pellet {
        if let Some(entered) = level.grid_mut().tile_mut(tile) {
            entered.kind = TileKind::Consumed;
        }
        let remaining = level.consume_pellet();
        debug!(x = tile.x, y = tile.y, remaining, "pellet_consumed");
        events.push(TickEvent::PelletConsumed { tile, remaining });
        if remaining == 0 {
            level.grid_mut().set_occupied(tile, true);
            return finish_with_win(level, WinCause::PelletsCleared, events);
        }
    }

    let found = if level.grid().is_occupied(tile) {
        find_encounter(level, id, kind, tile)
    } else {
        None
    };
    level.grid_mut().set_occupied(tile, true);

    match found {
        None => ArrivalEffect::Continue,
        Some((resident, Encounter::Win)) => {
            debug!(entity = id.0, resident = resident.0, "prey_caught");
            finish_with_win(level, WinCause::PreyCaught, events)
        }
        Some((resident, Encounter::Loss)) => {
            let losses = level.record_loss();
            info!(
                entity = id.0,
                resident = resident.0,
                x = tile.x,
                y = tile.y,
                losses,
                life_limit,
                "player_lost"
            );
            events.push(TickEvent::Loss { losses });
            if losses >= life_limit {
                level.set_status(LevelStatus::GameOver);
                info!(losses, "game_over");
                events.push(TickEvent::GameOver { losses });
            } else {
                level.reset_positions();
            }
            ArrivalEffect::Halt
        }
    }
}

/// First entity in spawn order, other than `arriving`, that holds `tile` and
/// forms an encounter with it.
fn find_encounter(
    level: &LevelState,
    arriving: EntityId,
    kind: EntityKind,
    tile: TileCoord,
) -> Option<(EntityId, Encounter)> {
    level
        .entities()
        .iter()
        .enumerate()
        .filter(|(index, other)| *index != arriving.0 && other.held_tile() == tile)
        .find_map(|(index, other)| {
            encounter(kind, other.kind).map(|found| (EntityId(index), found))
        })
}

pub(crate) fn finish_with_win(
    level: &mut LevelState,
    cause: WinCause,
    events: &mut Vec<TickEvent>,
) -> ArrivalEffect {
    level.set_status(LevelStatus::Complete);
    info!(?cause, "level_won");
    events.push(TickEvent::Win { cause });
    ArrivalEffect::Halt
}
