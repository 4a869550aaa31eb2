use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::world::EntityKind;

/// Largest per-tick speed accepted by [`EngineConfig::validate`].
pub const MAX_SPEED: u32 = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub player_speed: u32,
    pub hunter_speed: u32,
    pub prey_speed: u32,
    pub life_limit: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            player_speed: 2,
            hunter_speed: 1,
            prey_speed: 1,
            life_limit: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("life_limit must be at least 1")]
    ZeroLifeLimit,
    #[error("{field} is {value}, maximum is {max}")]
    SpeedTooHigh {
        field: &'static str,
        value: u32,
        max: u32,
    },
}

impl EngineConfig {
    /// Sub-tile units moved per elapsed unit.
    pub fn speed(&self, kind: EntityKind) -> u32 {
        match kind {
            EntityKind::Player => self.player_speed,
            EntityKind::Hunter => self.hunter_speed,
            EntityKind::Prey => self.prey_speed,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.life_limit == 0 {
            return Err(ConfigError::ZeroLifeLimit);
        }
        for (field, value) in [
            ("player_speed", self.player_speed),
            ("hunter_speed", self.hunter_speed),
            ("prey_speed", self.prey_speed),
        ] {
            if value > MAX_SPEED {
                return Err(ConfigError::SpeedTooHigh {
                    field,
                    value,
                    max: MAX_SPEED,
                });
            }
        }
        Ok(())
    }
}
