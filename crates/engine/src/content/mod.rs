mod discovery;
mod level_text;
mod types;

pub use discovery::{discover_levels, level_path};
pub use level_text::{load_level_file, parse_level};
pub use types::{LevelBlueprint, LevelLoadError, Spawn};
