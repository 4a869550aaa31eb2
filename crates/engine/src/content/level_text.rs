use std::fs;
use std::path::Path;

use tracing::debug;

use crate::world::{EntityKind, Grid, TileCoord, TileKind};

use super::types::{LevelBlueprint, LevelLoadError, Spawn};

const WALL_CHAR: char = '#';
const PLAYER_CHAR: char = 'P';
const HUNTER_CHAR: char = 'E';
const PREY_CHAR: char = '*';
const PELLET_CHAR: char = 'o';

/// Parses the `<width>x<height>` header followed by `height` rows of exactly
/// `width` tile characters. Nothing is built unless the whole text is valid.
pub fn parse_level(text: &str) -> Result<LevelBlueprint, LevelLoadError> {
    let mut lines = text.lines();
    let header = lines.next().ok_or(LevelLoadError::MissingHeader)?;
    let (width, height) = parse_header(header)?;

    let rows = lines.collect::<Vec<_>>();
    if rows.len() != height as usize {
        return Err(LevelLoadError::RowCountMismatch {
            expected: height as usize,
            actual: rows.len(),
        });
    }

    let mut kinds = Vec::with_capacity(rows.iter().map(|row| row.len()).sum());
    let mut spawns = Vec::new();
    for (y, row) in rows.iter().enumerate() {
        let actual = row.chars().count();
        if actual != width as usize {
            return Err(LevelLoadError::RowLengthMismatch {
                row: y,
                expected: width as usize,
                actual,
            });
        }
        for (x, ch) in row.chars().enumerate() {
            let tile = TileCoord::new(x as i32, y as i32);
            let (kind, spawn) = classify(ch);
            kinds.push(kind);
            if let Some(kind) = spawn {
                spawns.push(Spawn { kind, tile });
            }
        }
    }

    let grid = Grid::new(width, height, kinds)?;
    let pellet_count = grid.pellet_count();
    debug!(
        width,
        height,
        spawn_count = spawns.len(),
        pellet_count,
        "level_parsed"
    );
    Ok(LevelBlueprint {
        grid,
        spawns,
        pellet_count,
    })
}

pub fn load_level_file(path: &Path) -> Result<LevelBlueprint, LevelLoadError> {
    let text = fs::read_to_string(path).map_err(|source| LevelLoadError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    parse_level(&text)
}

fn parse_header(header: &str) -> Result<(u32, u32), LevelLoadError> {
    let malformed = || LevelLoadError::MalformedHeader {
        header: header.to_string(),
    };
    let (raw_width, raw_height) = header.trim().split_once('x').ok_or_else(malformed)?;
    let width = raw_width.trim().parse::<u32>().map_err(|_| malformed())?;
    let height = raw_height.trim().parse::<u32>().map_err(|_| malformed())?;
    if width == 0 || height == 0 {
        return Err(LevelLoadError::ZeroDimension { width, height });
    }
    Ok((width, height))
}

fn classify(ch: char) -> (TileKind, Option<EntityKind>) {
    match ch {
        WALL_CHAR => (TileKind::Wall, None),
        PLAYER_CHAR => (TileKind::Open, Some(EntityKind::Player)),
        HUNTER_CHAR => (TileKind::Pellet, Some(EntityKind::Hunter)),
        PREY_CHAR => (TileKind::Pellet, Some(EntityKind::Prey)),
        PELLET_CHAR => (TileKind::Pellet, None),
        _ => (TileKind::Open, None),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn parses_tiles_spawns_and_pellets_in_scan_order() {
        let level = parse_level("5x3\n#####\n#PoE#\n#*. #\n").expect("level");
        assert_eq!(level.grid.width(), 5);
        assert_eq!(level.grid.height(), 3);
        assert_eq!(level.pellet_count, 3);
        assert_eq!(
            level.spawns,
            vec![
                Spawn {
                    kind: EntityKind::Player,
                    tile: TileCoord::new(1, 1)
                },
                Spawn {
                    kind: EntityKind::Hunter,
                    tile: TileCoord::new(3, 1)
                },
                Spawn {
                    kind: EntityKind::Prey,
                    tile: TileCoord::new(1, 2)
                },
            ]
        );
        assert_eq!(level.grid.kind_at(TileCoord::new(1, 1)), TileKind::Open);
        assert_eq!(level.grid.kind_at(TileCoord::new(3, 1)), TileKind::Pellet);
        assert_eq!(level.grid.kind_at(TileCoord::new(3, 2)), TileKind::Open);
        assert_eq!(level.grid.kind_at(TileCoord::new(0, 2)), TileKind::Wall);
    }

    #[test]
    fn accepts_missing_trailing_newline_and_crlf() {
        let unix = parse_level("3x2\n###\n#P#").expect("unix");
        let windows = parse_level("3x2\r\n###\r\n#P#\r\n").expect("windows");
        assert_eq!(unix, windows);
    }

    #[test]
    fn rejects_malformed_header() {
        for header in ["", "5", "5x", "x3", "fivexthree", "5x3x2"] {
            let text = format!("{header}\n#####\n");
            let err = parse_level(&text).expect_err("header should fail");
            assert!(
                matches!(err, LevelLoadError::MalformedHeader { .. }),
                "unexpected error for '{header}': {err}"
            );
        }
        assert!(matches!(
            parse_level(""),
            Err(LevelLoadError::MissingHeader)
        ));
    }

    #[test]
    fn rejects_zero_dimension() {
        let err = parse_level("0x2\n\n\n").expect_err("zero width");
        assert!(matches!(
            err,
            LevelLoadError::ZeroDimension {
                width: 0,
                height: 2
            }
        ));
    }

    #[test]
    fn rejects_row_length_mismatch() {
        let err = parse_level("4x2\n####\n#P#\n").expect_err("short row");
        assert!(matches!(
            err,
            LevelLoadError::RowLengthMismatch {
                row: 1,
                expected: 4,
                actual: 3
            }
        ));
    }

    #[test]
    fn oversized_header_is_a_row_length_error() {
        let err = parse_level("4294967295x3\n#\n#\n#\n").expect_err("rows too short");
        assert!(matches!(
            err,
            LevelLoadError::RowLengthMismatch {
                row: 0,
                expected: 4_294_967_295,
                actual: 1
            }
        ));
    }

    #[test]
    fn rejects_row_count_mismatch() {
        let err = parse_level("3x3\n###\n#P#\n").expect_err("missing row");
        assert!(matches!(
            err,
            LevelLoadError::RowCountMismatch {
                expected: 3,
                actual: 2
            }
        ));
    }

    #[test]
    fn load_level_file_reports_path_on_missing_file() {
        let temp = TempDir::new().expect("tempdir");
        let missing = temp.path().join("level9");
        let err = load_level_file(&missing).expect_err("missing file");
        match err {
            LevelLoadError::ReadFile { path, .. } => assert_eq!(path, missing),
            other => panic!("unexpected error: {other}"),
        }

        let present = temp.path().join("level0");
        fs::write(&present, "3x1\n#P#\n").expect("write level");
        let level = load_level_file(&present).expect("load");
        assert_eq!(level.spawns.len(), 1);
    }
}
