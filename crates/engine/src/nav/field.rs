use tracing::{trace, warn};

use crate::world::{Direction, Entity, EntityId, Grid, Tile, TileCoord};

use super::valuation::score;

/// Tiles this close to a seed are not claimed while occupied, unless written
/// directly by the seed itself.
const OCCUPIED_CLAIM_THRESHOLD: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingWrite {
    coord: TileCoord,
    value: u32,
    from_seed: bool,
}

/// Depth-first "distance since last claimed" flood fill over a [`Grid`].
///
/// Traversal is an explicit LIFO worklist whose pop order matches a recursive
/// walk visiting Up, Left, Right, Down in turn, so the surviving values are the
/// ones the recursive formulation would leave. Values are not guaranteed to be
/// minimal next to occupied tiles.
#[derive(Debug, Clone, Default)]
pub struct DistanceField {
    worklist: Vec<PendingWrite>,
}

impl DistanceField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds `seed` with distance 0 for `entity` and floods outward.
    pub fn propagate(&mut self, grid: &mut Grid, entity: EntityId, seed: TileCoord) {
        let Some(tile) = grid.tile_mut(seed) else {
            warn!(entity = entity.0, x = seed.x, y = seed.y, "field_seed_out_of_range");
            return;
        };
        if tile.kind().is_wall() {
            warn!(entity = entity.0, x = seed.x, y = seed.y, "field_seed_on_wall");
            return;
        }
        tile.claimant = Some(entity);
        tile.distance_value = 0;

        self.worklist.clear();
        self.push_neighbors(seed, 1, true);
        let mut accepted = 0usize;
        while let Some(write) = self.worklist.pop() {
            let Some(tile) = grid.tile_mut(write.coord) else {
                continue;
            };
            if !accepts_write(tile, entity, write.value, write.from_seed) {
                continue;
            }
            tile.claimant = Some(entity);
            tile.distance_value = write.value;
            accepted += 1;
            self.push_neighbors(write.coord, write.value + 1, false);
        }
        trace!(entity = entity.0, accepted, "field_propagated");
    }

    /// Resets the field, floods from every entity in spawn order and rebuilds
    /// the per-tile aggregate score used by the debug overlay.
    pub fn propagate_all(&mut self, grid: &mut Grid, entities: &[Entity]) {
        grid.reset_field();
        for tile in grid.tiles_mut() {
            tile.aggregate_score = 0;
        }
        for (index, entity) in entities.iter().enumerate() {
            self.propagate(grid, EntityId(index), entity.tile());
            for tile in grid.tiles_mut() {
                let Some(claimant) = tile.claimant else {
                    continue;
                };
                if let Some(owner) = entities.get(claimant.0) {
                    tile.aggregate_score += score(owner.kind, tile.distance_value);
                }
            }
        }
    }

    fn push_neighbors(&mut self, from: TileCoord, value: u32, from_seed: bool) {
        for direction in Direction::PRIORITY.iter().rev() {
            self.worklist.push(PendingWrite {
                coord: from.step(*direction),
                value,
                from_seed,
            });
        }
    }
}

fn accepts_write(tile: &Tile, entity: EntityId, value: u32, from_seed: bool) -> bool {
    if tile.kind().is_wall() {
        return false;
    }
    let improves = tile.claimant != Some(entity) || value < tile.distance_value;
    let claimable = !tile.occupied || value > OCCUPIED_CLAIM_THRESHOLD || from_seed;
    improves && claimable
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{EntityKind, TileKind};

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

    fn distance(grid: &Grid, x: i32, y: i32) -> Option<u32> {
        grid.tile(TileCoord::new(x, y)).and_then(Tile::distance_value)
    }

    fn recursive_fill(
        grid: &mut Grid,
        entity: EntityId,
        coord: TileCoord,
        value: u32,
        from_seed: bool,
    ) {
        let Some(tile) = grid.tile_mut(coord) else {
            return;
        };
        if tile.kind().is_wall() {
            return;
        }
        if tile.claimant == Some(entity) && value >= tile.distance_value {
            return;
        }
        if tile.occupied && value <= 2 && !from_seed {
            return;
        }
        tile.claimant = Some(entity);
        tile.distance_value = value;
        for direction in Direction::PRIORITY {
            recursive_fill(grid, entity, coord.step(direction), value + 1, false);
        }
    }

    fn recursive_propagate(grid: &mut Grid, entity: EntityId, seed: TileCoord) {
        let tile = grid.tile_mut(seed).expect("seed tile");
        tile.claimant = Some(entity);
        tile.distance_value = 0;
        for direction in Direction::PRIORITY {
            recursive_fill(grid, entity, seed.step(direction), 1, true);
        }
    }

    fn snapshot(grid: &Grid) -> Vec<(Option<EntityId>, Option<u32>)> {
        grid.tiles()
            .iter()
            .map(|tile| (tile.claimant(), tile.distance_value()))
            .collect()
    }

    #[test]
    fn worklist_leaves_the_same_field_as_a_recursive_walk() {
        let rows = [
            "#########",
            "#.......#",
            "#.#.#.#.#",
            "#.......#",
            "#.#.#.#.#",
            "#.......#",
            "#########",
        ];
        let seeds = [
            TileCoord::new(1, 1),
            TileCoord::new(5, 3),
            TileCoord::new(7, 5),
        ];
        let occupied_sets: [&[TileCoord]; 3] = [
            &[],
            &[
                TileCoord::new(2, 1),
                TileCoord::new(1, 3),
                TileCoord::new(5, 1),
                TileCoord::new(6, 3),
            ],
            &[
                TileCoord::new(1, 2),
                TileCoord::new(3, 1),
                TileCoord::new(4, 3),
                TileCoord::new(5, 4),
                TileCoord::new(7, 4),
                TileCoord::new(6, 5),
            ],
        ];

        for occupied in occupied_sets {
            let mut expected = grid_from_rows(&rows);
            for coord in occupied {
                expected.set_occupied(*coord, true);
            }
            let mut actual = expected.clone();
            let mut field = DistanceField::new();

            for (index, seed) in seeds.iter().enumerate() {
                recursive_propagate(&mut expected, EntityId(index), *seed);
                field.propagate(&mut actual, EntityId(index), *seed);
                assert_eq!(
                    snapshot(&actual),
                    snapshot(&expected),
                    "seed {index} with occupied {occupied:?}"
                );
            }
        }
    }

    #[test]
    fn flood_never_claims_wall_tiles() {
        let mut grid = grid_from_rows(&[
            "#######",
            "#..#..#",
            "#.##..#",
            "#.....#",
            "#######",
        ]);
        let mut field = DistanceField::new();
        field.propagate(&mut grid, EntityId(0), TileCoord::new(1, 1));
        for (index, tile) in grid.tiles().iter().enumerate() {
            if tile.kind().is_wall() {
                assert_eq!(tile.claimant(), None, "wall {:?} claimed", grid.coord_of(index));
                assert_eq!(tile.distance_value(), None);
            } else {
                assert_eq!(tile.claimant(), Some(EntityId(0)));
            }
        }
    }

    #[test]
    fn relaxation_settles_on_hop_distance_without_occupancy() {
        let mut grid = grid_from_rows(&["#####", "#...#", "#...#", "#...#", "#####"]);
        let mut field = DistanceField::new();
        field.propagate(&mut grid, EntityId(0), TileCoord::new(1, 1));
        assert_eq!(distance(&grid, 1, 1), Some(0));
        assert_eq!(distance(&grid, 2, 1), Some(1));
        assert_eq!(distance(&grid, 3, 3), Some(4));
        assert_eq!(distance(&grid, 1, 3), Some(2));
    }

    #[test]
    fn occupied_tile_near_seed_is_skipped_unless_adjacent() {
        let mut grid = grid_from_rows(&["######", "#....#", "######"]);
        grid.set_occupied(TileCoord::new(2, 1), true);
        grid.set_occupied(TileCoord::new(3, 1), true);
        let mut field = DistanceField::new();
        field.propagate(&mut grid, EntityId(0), TileCoord::new(1, 1));
        assert_eq!(distance(&grid, 2, 1), Some(1));
        assert_eq!(distance(&grid, 3, 1), None);
        assert_eq!(distance(&grid, 4, 1), None);
    }

    #[test]
    fn later_entity_overwrites_other_claimants() {
        let mut grid = grid_from_rows(&["#####", "#...#", "#####"]);
        let mut field = DistanceField::new();
        field.propagate(&mut grid, EntityId(0), TileCoord::new(1, 1));
        field.propagate(&mut grid, EntityId(1), TileCoord::new(3, 1));
        let tile = grid.tile(TileCoord::new(1, 1)).expect("tile");
        assert_eq!(tile.claimant(), Some(EntityId(1)));
        assert_eq!(tile.distance_value(), Some(2));
    }

    #[test]
    fn propagate_all_accumulates_scores_over_passes() {
        let mut grid = grid_from_rows(&["#####", "#...#", "#####"]);
        let entities = vec![
            Entity::spawn(EntityKind::Player, TileCoord::new(1, 1)),
            Entity::spawn(EntityKind::Prey, TileCoord::new(3, 1)),
        ];
        let mut field = DistanceField::new();
        field.propagate_all(&mut grid, &entities);
        let middle = grid.tile(TileCoord::new(2, 1)).expect("tile");
        // Player pass scores 15M/1, prey pass re-claims the tile and scores 0.
        assert_eq!(middle.aggregate_score(), 15_000_000);
        assert_eq!(middle.claimant(), Some(EntityId(1)));

        field.propagate_all(&mut grid, &entities);
        let middle = grid.tile(TileCoord::new(2, 1)).expect("tile");
        assert_eq!(middle.aggregate_score(), 15_000_000);
    }
}
