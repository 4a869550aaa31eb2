use chase_engine::{EntityKind, LevelState, TileCoord, TileKind};

/// One character per tile: walls, pellets and entities drawn over the floor.
/// Entities are drawn in spawn order, so a later spawn hides an earlier one
/// sharing its tile.
pub(crate) fn render_board(level: &LevelState) -> String {
    let grid = level.grid();
    let mut cells = grid
        .tiles()
        .iter()
        .map(|tile| match tile.kind() {
            TileKind::Wall => '#',
            TileKind::Pellet => 'o',
            TileKind::Open | TileKind::Consumed => '.',
        })
        .collect::<Vec<_>>();
    for entity in level.entities() {
        if let Some(index) = grid.index_of(entity.tile()) {
            cells[index] = entity_glyph(entity.kind);
        }
    }
    rows_to_text(&cells, grid.width() as usize)
}

/// Aggregate scores bucketed into digits `0`..=`9` across non-wall tiles.
/// Run [`chase_engine::Simulation::refresh_debug_field`] first.
pub(crate) fn render_heat(level: &LevelState) -> String {
    let grid = level.grid();
    let scores = grid
        .tiles()
        .iter()
        .filter(|tile| !tile.kind().is_wall())
        .map(|tile| tile.aggregate_score());
    let (min, max) = scores.fold((i64::MAX, i64::MIN), |(min, max), score| {
        (min.min(score), max.max(score))
    });
    let span = max.saturating_sub(min);

    let cells = grid
        .tiles()
        .iter()
        .map(|tile| {
            if tile.kind().is_wall() {
                return '#';
            }
            if span <= 0 {
                return '0';
            }
            let bucket = (tile.aggregate_score() - min) * 9 / span;
            char::from_digit(bucket as u32, 10).unwrap_or('9')
        })
        .collect::<Vec<_>>();
    rows_to_text(&cells, grid.width() as usize)
}

fn entity_glyph(kind: EntityKind) -> char {
    match kind {
        EntityKind::Player => 'P',
        EntityKind::Hunter => 'E',
        EntityKind::Prey => '*',
    }
}

fn rows_to_text(cells: &[char], width: usize) -> String {
    let mut text = String::with_capacity(cells.len() + cells.len() / width.max(1));
    for row in cells.chunks(width.max(1)) {
        text.extend(row);
        text.push('\n');
    }
    text
}

/// Tile of the first entity of `kind`, for log fields.
pub(crate) fn first_tile_of(level: &LevelState, kind: EntityKind) -> Option<TileCoord> {
    level
        .find_kind(kind)
        .and_then(|id| level.entity(id))
        .map(|entity| entity.tile())
}
