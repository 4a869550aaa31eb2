use tracing::trace;

use crate::sim::InputSnapshot;
use crate::world::{Direction, Entity, EntityId, EntityKind, Grid, TileCoord};

use super::field::DistanceField;
use super::valuation::score;

/// Summed valuation for each neighbor, in [`Direction::PRIORITY`] order.
/// `None` marks a wall.
pub type NeighborScores = [Option<i64>; 4];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreGoal {
    Maximize,
    Minimize,
}

impl ScoreGoal {
    pub fn for_kind(kind: EntityKind) -> Option<Self> {
        match kind {
            EntityKind::Hunter => Some(Self::Maximize),
            EntityKind::Prey => Some(Self::Minimize),
            EntityKind::Player => None,
        }
    }
}

/// Direction for a tile-aligned entity. Player input for the player, corridor
/// continuation or junction scoring for everyone else.
pub(crate) fn choose_direction(
    field: &mut DistanceField,
    grid: &mut Grid,
    entities: &[Entity],
    id: EntityId,
    input: &InputSnapshot,
) -> Direction {
    let Some(entity) = entities.get(id.0) else {
        return Direction::None;
    };
    let tile = entity.tile();
    let direction = match ScoreGoal::for_kind(entity.kind) {
        None => resolve_player_direction(grid, tile, entity.direction, input),
        Some(goal) => match corridor_direction(grid, tile, entity.direction) {
            Some(direction) => direction,
            None => {
                let scores = junction_scores(field, grid, entities, id);
                select_scored_direction(scores, goal)
            }
        },
    };
    trace!(
        entity = id.0,
        kind = entity.kind.label(),
        x = tile.x,
        y = tile.y,
        ?direction,
        "direction_chosen"
    );
    direction
}

/// Resolves held movement keys against the walls around `tile`.
///
/// With several keys held while already moving, a key that would reverse the
/// previous direction is skipped so a held diagonal keeps its heading.
pub fn resolve_player_direction(
    grid: &Grid,
    tile: TileCoord,
    previous: Direction,
    input: &InputSnapshot,
) -> Direction {
    let is_open = |direction: Direction| !grid.is_wall(tile.step(direction));
    let mut held = input.held_directions();
    let chosen = if previous != Direction::None && input.held_count() > 1 {
        held.find(|direction| *direction != previous.reverse() && is_open(*direction))
    } else {
        held.find(|direction| is_open(*direction))
    };
    chosen.unwrap_or(Direction::None)
}

/// Some(direction) when `tile` has exactly two exits: the exit that does not
/// reverse `current`.
pub fn corridor_direction(grid: &Grid, tile: TileCoord, current: Direction) -> Option<Direction> {
    if grid.open_directions(tile).count() != 2 {
        return None;
    }
    grid.open_directions(tile)
        .find(|direction| *direction != current.reverse())
}

/// Floods from every other entity and sums each one's valuation at the four
/// neighbors of the deciding entity.
///
/// A neighbor only collects a contribution from an entity whose own pass
/// claimed it; tiles cut off by walls or the occupancy rule add nothing.
pub fn junction_scores(
    field: &mut DistanceField,
    grid: &mut Grid,
    entities: &[Entity],
    deciding: EntityId,
) -> NeighborScores {
    let Some(origin) = entities.get(deciding.0).map(Entity::tile) else {
        return [None; 4];
    };
    grid.reset_field();
    let mut totals = [0i64; 4];
    for (index, other) in entities.iter().enumerate() {
        if index == deciding.0 {
            continue;
        }
        let other_id = EntityId(index);
        field.propagate(grid, other_id, other.tile());
        for (slot, direction) in Direction::PRIORITY.iter().enumerate() {
            let Some(tile) = grid.tile(origin.step(*direction)) else {
                continue;
            };
            if tile.claimant() != Some(other_id) {
                continue;
            }
            if let Some(distance) = tile.distance_value() {
                totals[slot] += score(other.kind, distance);
            }
        }
    }

    let mut scores = [None; 4];
    for (slot, direction) in Direction::PRIORITY.iter().enumerate() {
        if !grid.is_wall(origin.step(*direction)) {
            scores[slot] = Some(totals[slot]);
        }
    }
    scores
}

/// Best-scoring open neighbor; earlier directions in priority order win ties.
pub fn select_scored_direction(scores: NeighborScores, goal: ScoreGoal) -> Direction {
    let mut best: Option<(Direction, i64)> = None;
    for (direction, candidate) in Direction::PRIORITY.into_iter().zip(scores) {
        let Some(candidate) = candidate else {
            continue;
        };
        let better = match best {
            None => true,
            Some((_, current)) => match goal {
                ScoreGoal::Maximize => candidate > current,
                ScoreGoal::Minimize => candidate < current,
            },
        };
        if better {
            best = Some((direction, candidate));
        }
    }
    best.map_or(Direction::None, |(direction, _)| direction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::InputAction;
    use crate::world::TileKind;

    fn grid_from_rows(rows: &[&str]) -> Grid {
        let height = rows.len() as u32;
        let width = rows[0].len() as u32;
        let kinds = rows
            .iter()
            .flat_map(|row| row.chars())
            .map(|ch| if ch == '#' { TileKind::Wall } else { TileKind::Open })
            .collect();
        Grid::new(width, height, kinds).expect("grid")
    }

    fn keys(actions: &[InputAction]) -> InputSnapshot {
        let mut snapshot = InputSnapshot::empty();
        for action in actions {
            snapshot = snapshot.with_action_down(*action, true);
        }
        snapshot
    }

    const CROSS: [&str; 5] = ["#####", "##.##", "#...#", "##.##", "#####"];

    #[test]
    fn single_key_picks_open_neighbor_or_halts() {
        let grid = grid_from_rows(&CROSS);
        let center = TileCoord::new(2, 2);
        let input = keys(&[InputAction::MoveLeft]);
        assert_eq!(
            resolve_player_direction(&grid, center, Direction::None, &input),
            Direction::Left
        );
        let corner = TileCoord::new(2, 1);
        assert_eq!(
            resolve_player_direction(&grid, corner, Direction::Up, &input),
            Direction::None
        );
        assert_eq!(
            resolve_player_direction(&grid, center, Direction::Up, &InputSnapshot::empty()),
            Direction::None
        );
    }

    #[test]
    fn held_pair_skips_reversing_key_when_moving() {
        let grid = grid_from_rows(&CROSS);
        let center = TileCoord::new(2, 2);
        let input = keys(&[InputAction::MoveUp, InputAction::MoveRight]);
        assert_eq!(
            resolve_player_direction(&grid, center, Direction::Down, &input),
            Direction::Right
        );
        assert_eq!(
            resolve_player_direction(&grid, center, Direction::Right, &input),
            Direction::Up
        );
        // Without a previous heading the plain priority order applies.
        assert_eq!(
            resolve_player_direction(&grid, center, Direction::None, &input),
            Direction::Up
        );
    }

    #[test]
    fn held_pair_with_only_reversal_open_halts() {
        let grid = grid_from_rows(&["#####", "#...#", "#####"]);
        let tile = TileCoord::new(3, 1);
        let input = keys(&[InputAction::MoveUp, InputAction::MoveLeft]);
        assert_eq!(
            resolve_player_direction(&grid, tile, Direction::Right, &input),
            Direction::None
        );
    }

    #[test]
    fn corridor_keeps_heading_and_turns_corners() {
        let grid = grid_from_rows(&["#####", "#...#", "#.#.#", "#...#", "#####"]);
        assert_eq!(
            corridor_direction(&grid, TileCoord::new(2, 1), Direction::Right),
            Some(Direction::Right)
        );
        assert_eq!(
            corridor_direction(&grid, TileCoord::new(2, 1), Direction::Left),
            Some(Direction::Left)
        );
        assert_eq!(
            corridor_direction(&grid, TileCoord::new(3, 1), Direction::Right),
            Some(Direction::Down)
        );
        assert_eq!(
            corridor_direction(&grid, TileCoord::new(1, 1), Direction::None),
            Some(Direction::Right)
        );
    }

    #[test]
    fn corridor_never_reverses_on_two_exit_tiles() {
        let grid = grid_from_rows(&["#######", "#.....#", "#.###.#", "#.....#", "#######"]);
        for index in 0..grid.tiles().len() {
            let tile = grid.coord_of(index);
            if grid.is_wall(tile) || grid.open_directions(tile).count() != 2 {
                continue;
            }
            for heading in grid.open_directions(tile).collect::<Vec<_>>() {
                let arriving = heading.reverse();
                let chosen = corridor_direction(&grid, tile, arriving).expect("corridor tile");
                assert_ne!(chosen, arriving.reverse(), "reversed at {tile:?}");
            }
        }
        assert_eq!(
            corridor_direction(&grid, TileCoord::new(1, 2), Direction::Down),
            Some(Direction::Down)
        );
        assert_eq!(
            corridor_direction(&grid, TileCoord::new(1, 1), Direction::Up),
            Some(Direction::Right)
        );
    }

    #[test]
    fn hunter_moves_toward_player_at_junction() {
        let mut grid = grid_from_rows(&["#######", "#.....#", "#.....#", "#.....#", "#######"]);
        let entities = vec![
            Entity::spawn(EntityKind::Hunter, TileCoord::new(3, 2)),
            Entity::spawn(EntityKind::Player, TileCoord::new(5, 2)),
        ];
        let mut field = DistanceField::new();
        let scores = junction_scores(&mut field, &mut grid, &entities, EntityId(0));
        assert_eq!(select_scored_direction(scores, ScoreGoal::Maximize), Direction::Right);
        let direction = choose_direction(
            &mut field,
            &mut grid,
            &entities,
            EntityId(0),
            &InputSnapshot::empty(),
        );
        assert_eq!(direction, Direction::Right);
    }

    #[test]
    fn prey_moves_away_from_player_at_junction() {
        let mut grid = grid_from_rows(&["#######", "#..#..#", "#.....#", "#.....#", "#######"]);
        let entities = vec![
            Entity::spawn(EntityKind::Player, TileCoord::new(1, 2)),
            Entity::spawn(EntityKind::Prey, TileCoord::new(3, 2)),
        ];
        let mut field = DistanceField::new();
        let scores = junction_scores(&mut field, &mut grid, &entities, EntityId(1));
        assert_eq!(select_scored_direction(scores, ScoreGoal::Minimize), Direction::Right);
    }

    #[test]
    fn walls_are_never_selected() {
        let scores = [None, Some(-5), None, Some(-10)];
        assert_eq!(select_scored_direction(scores, ScoreGoal::Maximize), Direction::Left);
        assert_eq!(select_scored_direction(scores, ScoreGoal::Minimize), Direction::Down);
        assert_eq!(select_scored_direction([None; 4], ScoreGoal::Maximize), Direction::None);
    }

    #[test]
    fn ties_resolve_in_priority_order() {
        let scores = [Some(3), Some(7), Some(7), Some(3)];
        assert_eq!(select_scored_direction(scores, ScoreGoal::Maximize), Direction::Left);
        assert_eq!(select_scored_direction(scores, ScoreGoal::Minimize), Direction::Up);
    }

    #[test]
    fn lone_hunter_at_junction_defaults_to_first_open_exit() {
        let mut grid = grid_from_rows(&["#####", "#...#", "#...#", "#...#", "#####"]);
        let hunter = Entity::spawn(EntityKind::Hunter, TileCoord::new(2, 2));
        let mut field = DistanceField::new();
        let direction = choose_direction(
            &mut field,
            &mut grid,
            &[hunter],
            EntityId(0),
            &InputSnapshot::empty(),
        );
        assert_eq!(direction, Direction::Up);
    }
}
