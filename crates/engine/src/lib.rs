pub mod content;
pub mod nav;
pub mod sim;
pub mod world;

pub use content::{
    discover_levels, level_path, load_level_file, parse_level, LevelBlueprint, LevelLoadError,
    Spawn,
};
pub use nav::{score, DistanceField};
pub use sim::{
    ConfigError, EngineConfig, EngineError, InputAction, InputSnapshot, LevelBuildError,
    LevelState, LevelStatus, MovementSummary, Simulation, TickEvent, TickReport, WinCause,
};
pub use world::{
    Direction, Entity, EntityId, EntityKind, Grid, Position, Tile, TileCoord, TileKind, TILE_SIZE,
};
