use thiserror::Error;
use tracing::{debug, info, warn};

use crate::content::LevelBlueprint;
use crate::nav::DistanceField;
use crate::world::EntityId;

use super::config::{ConfigError, EngineConfig};
use super::digest::level_digest;
use super::input::InputSnapshot;
use super::interaction::{finish_with_win, ArrivalEffect, TickEvent, WinCause};
use super::level::{LevelBuildError, LevelState};
use super::movement::{advance_entity, MovementSummary};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no level is loaded")]
    NotInitialized,
    #[error("simulation invariant violated: {detail}")]
    InvariantViolation { detail: String },
    #[error(transparent)]
    Level(#[from] LevelBuildError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// 1-based tick number within the current level.
    pub tick: u64,
    pub events: Vec<TickEvent>,
    pub movements: Vec<MovementSummary>,
}

impl TickReport {
    fn empty(tick: u64) -> Self {
        Self {
            tick,
            ..Self::default()
        }
    }
}

/// Owns the level state and drives it one externally timed tick at a time.
#[derive(Debug)]
pub struct Simulation {
    config: EngineConfig,
    level: Option<LevelState>,
    field: DistanceField,
    tick_count: u64,
}

impl Simulation {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self {
            config,
            level: None,
            field: DistanceField::new(),
            tick_count: 0,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Replaces any loaded level with a fresh one; every counter starts at zero.
    pub fn initialize(&mut self, blueprint: LevelBlueprint) -> Result<(), EngineError> {
        let level = LevelState::from_blueprint(blueprint)?;
        self.install(level);
        Ok(())
    }

    /// Like [`Simulation::initialize`] but carries the loss tally over from
    /// the current level.
    pub fn advance_level(&mut self, blueprint: LevelBlueprint) -> Result<(), EngineError> {
        let losses = self.level.as_ref().map_or(0, LevelState::losses);
        let mut level = LevelState::from_blueprint(blueprint)?;
        level.carry_losses(losses);
        self.install(level);
        Ok(())
    }

    pub fn teardown(&mut self) {
        if self.level.take().is_some() {
            info!(ticks = self.tick_count, "level_torn_down");
        }
        self.tick_count = 0;
    }

    pub fn level(&self) -> Option<&LevelState> {
        self.level.as_ref()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Advances every entity in spawn order by `speed * elapsed` sub-tile units.
    ///
    /// Every entity's advance is checked before anything moves, so a failed
    /// tick leaves no partial effects. Ticks on a finished level do nothing.
    pub fn tick(
        &mut self,
        elapsed: u32,
        input: &InputSnapshot,
    ) -> Result<TickReport, EngineError> {
        let level = self.level.as_mut().ok_or(EngineError::NotInitialized)?;
        let tick = self.tick_count + 1;
        if level.status().is_finished() {
            self.tick_count = tick;
            return Ok(TickReport::empty(tick));
        }

        let advances = match planned_advances(level, &self.config, elapsed) {
            Ok(advances) => advances,
            Err(error) => {
                warn!(tick, error = %error, "tick_rejected");
                return Err(error);
            }
        };
        let report = step_level(level, &mut self.field, &self.config, tick, &advances, input);
        self.tick_count = tick;
        if !report.events.is_empty() {
            debug!(tick, events = ?report.events, "tick_events");
        }
        Ok(report)
    }

    /// Floods from every entity and rebuilds the per-tile aggregate scores.
    pub fn refresh_debug_field(&mut self) -> Result<(), EngineError> {
        let level = self.level.as_mut().ok_or(EngineError::NotInitialized)?;
        let (grid, entities) = level.split_mut();
        self.field.propagate_all(grid, entities);
        Ok(())
    }

    pub fn state_digest(&self) -> Result<String, EngineError> {
        self.level
            .as_ref()
            .map(level_digest)
            .ok_or(EngineError::NotInitialized)
    }

    fn install(&mut self, level: LevelState) {
        info!(
            width = level.grid().width(),
            height = level.grid().height(),
            entity_count = level.entities().len(),
            pellets = level.remaining_pellets(),
            losses = level.losses(),
            "level_initialized"
        );
        self.level = Some(level);
        self.tick_count = 0;
    }
}

/// `speed * elapsed` for every entity in spawn order.
fn planned_advances(
    level: &LevelState,
    config: &EngineConfig,
    elapsed: u32,
) -> Result<Vec<u32>, EngineError> {
    level
        .entities()
        .iter()
        .map(|entity| {
            let speed = config.speed(entity.kind);
            speed
                .checked_mul(elapsed)
                .ok_or_else(|| EngineError::InvariantViolation {
                    detail: format!(
                        "{} advance overflows: speed {speed} * elapsed {elapsed}",
                        entity.kind.label()
                    ),
                })
        })
        .collect()
}

fn step_level(
    level: &mut LevelState,
    field: &mut DistanceField,
    config: &EngineConfig,
    tick: u64,
    advances: &[u32],
    input: &InputSnapshot,
) -> TickReport {
    let mut report = TickReport::empty(tick);
    if level.remaining_pellets() == 0 {
        finish_with_win(level, WinCause::PelletsCleared, &mut report.events);
        return report;
    }

    for (index, advance) in advances.iter().copied().enumerate() {
        if advance == 0 {
            continue;
        }
        let (summary, effect) = advance_entity(
            level,
            field,
            EntityId(index),
            advance,
            input,
            config.life_limit,
            &mut report.events,
        );
        report.movements.push(summary);
        if effect == ArrivalEffect::Halt {
            break;
        }
    }
    report
}
