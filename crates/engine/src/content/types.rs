use std::path::PathBuf;

use thiserror::Error;

use crate::world::{EntityKind, Grid, GridError, TileCoord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spawn {
    pub kind: EntityKind,
    pub tile: TileCoord,
}

/// Parsed level ready to initialize a simulation: static grid, spawns in
/// row-major scan order and the number of pellets on the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelBlueprint {
    pub grid: Grid,
    pub spawns: Vec<Spawn>,
    pub pellet_count: u32,
}

#[derive(Debug, Error)]
pub enum LevelLoadError {
    #[error("failed to read level file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("levels directory does not exist: {path}")]
    LevelsDirMissing { path: PathBuf },
    #[error("level text is empty; expected a <width>x<height> header")]
    MissingHeader,
    #[error("malformed level header '{header}'; expected <width>x<height>")]
    MalformedHeader { header: String },
    #[error("level dimensions must be non-zero, got {width}x{height}")]
    ZeroDimension { width: u32, height: u32 },
    #[error("row {row} has {actual} tiles, expected {expected}")]
    RowLengthMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("level has {actual} rows, expected {expected}")]
    RowCountMismatch { expected: usize, actual: usize },
    #[error("invalid level grid: {0}")]
    Grid(#[from] GridError),
}
