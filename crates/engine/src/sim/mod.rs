mod config;
mod digest;
mod input;
mod interaction;
mod level;
mod movement;
mod simulation;

pub use config::{ConfigError, EngineConfig, MAX_SPEED};
pub use digest::level_digest;
pub use input::{InputAction, InputSnapshot};
pub use interaction::{encounter, Encounter, TickEvent, WinCause};
pub use level::{LevelBuildError, LevelState, LevelStatus};
pub use movement::{next_boundary, BoundaryStep, MovementSummary};
pub use simulation::{EngineError, Simulation, TickReport};
