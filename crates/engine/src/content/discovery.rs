use std::path::{Path, PathBuf};

use super::types::LevelLoadError;

const LEVEL_FILE_PREFIX: &str = "level";

/// Path of the level with the given zero-based index: `<dir>/level<index>`.
pub fn level_path(levels_dir: &Path, index: u32) -> PathBuf {
    levels_dir.join(format!("{LEVEL_FILE_PREFIX}{index}"))
}

/// Level files present in `levels_dir`, from `level0` upward until the first
/// missing index. A gap ends the campaign even if later files exist.
pub fn discover_levels(levels_dir: &Path) -> Result<Vec<PathBuf>, LevelLoadError> {
    ensure_dir_exists(levels_dir)?;
    let mut levels = Vec::new();
    let mut index = 0u32;
    loop {
        let path = level_path(levels_dir, index);
        if !path.is_file() {
            break;
        }
        levels.push(path);
        index += 1;
    }
    Ok(levels)
}

fn ensure_dir_exists(path: &Path) -> Result<(), LevelLoadError> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(LevelLoadError::LevelsDirMissing {
            path: path.to_path_buf(),
        })
    }
}
