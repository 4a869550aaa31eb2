use chase_engine::{
    discover_levels, load_level_file, EngineError, EntityKind, LevelLoadError, LevelStatus,
    Simulation, TickEvent, TickReport,
};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::board::{first_tile_of, render_board, render_heat};
use super::bootstrap::AppWiring;
use super::script::ScriptCursor;

#[derive(Debug, Error)]
pub(crate) enum CampaignError {
    #[error(transparent)]
    Level(#[from] LevelLoadError),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CampaignEnd {
    /// Every discovered level was won.
    Cleared,
    GameOver,
    TickLimit,
    NoLevels,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CampaignSummary {
    pub(crate) end: CampaignEnd,
    pub(crate) levels_completed: u32,
    pub(crate) ticks: u64,
    pub(crate) losses: u32,
    pub(crate) final_digest: Option<String>,
}

/// Plays `level0`, `level1`, ... in order on a fixed tick until the levels run
/// out, the game is over, or the tick cap is hit.
pub(crate) fn run_campaign(app: &AppWiring) -> Result<CampaignSummary, CampaignError> {
    let levels = discover_levels(&app.levels_dir)?;
    let mut summary = CampaignSummary {
        end: CampaignEnd::NoLevels,
        levels_completed: 0,
        ticks: 0,
        losses: 0,
        final_digest: None,
    };
    if levels.is_empty() {
        warn!(levels_dir = %app.levels_dir.display(), "no_levels_found");
        return Ok(summary);
    }
    info!(level_count = levels.len(), "campaign_started");

    let mut sim = Simulation::new(app.config)?;
    let mut cursor = ScriptCursor::new(&app.script);
    let mut script_done_logged = false;

    for (index, path) in levels.iter().enumerate() {
        let blueprint = load_level_file(path)?;
        if index == 0 {
            sim.initialize(blueprint)?;
        } else {
            sim.advance_level(blueprint)?;
        }
        info!(level = index, path = %path.display(), "level_started");
        if app.visualize {
            dump_board(&mut sim, index)?;
        }

        let status = loop {
            if summary.ticks >= app.max_ticks {
                summary.end = CampaignEnd::TickLimit;
                finish_level(&sim, index, &mut summary)?;
                info!(ticks = summary.ticks, "tick_limit_reached");
                return Ok(summary);
            }
            if !script_done_logged && cursor.is_exhausted() {
                script_done_logged = true;
                debug!(tick = summary.ticks, "script_exhausted");
            }

            let (elapsed, input) = cursor.next_frame();
            let report = sim.tick(elapsed, &input)?;
            summary.ticks += 1;
            log_events(index, &report);
            if app.visualize && !report.events.is_empty() {
                dump_board(&mut sim, index)?;
            }

            let status = sim
                .level()
                .map(|level| level.status())
                .ok_or(EngineError::NotInitialized)?;
            if status.is_finished() {
                break status;
            }
        };

        finish_level(&sim, index, &mut summary)?;
        if status == LevelStatus::GameOver {
            summary.end = CampaignEnd::GameOver;
            return Ok(summary);
        }
        summary.levels_completed += 1;
    }

    summary.end = CampaignEnd::Cleared;
    Ok(summary)
}

fn finish_level(
    sim: &Simulation,
    index: usize,
    summary: &mut CampaignSummary,
) -> Result<(), CampaignError> {
    let level = sim.level().ok_or(EngineError::NotInitialized)?;
    let digest = sim.state_digest()?;
    summary.losses = level.losses();
    info!(
        level = index,
        status = ?level.status(),
        ticks = sim.tick_count(),
        remaining_pellets = level.remaining_pellets(),
        losses = level.losses(),
        digest = %digest,
        "level_finished"
    );
    summary.final_digest = Some(digest);
    Ok(())
}

fn log_events(level_index: usize, report: &TickReport) {
    for event in &report.events {
        match event {
            TickEvent::PelletConsumed { tile, remaining } => debug!(
                level = level_index,
                tick = report.tick,
                x = tile.x,
                y = tile.y,
                remaining,
                "pellet_eaten"
            ),
            TickEvent::Loss { losses } => {
                info!(level = level_index, tick = report.tick, losses, "life_lost")
            }
            TickEvent::Win { cause } => {
                info!(level = level_index, tick = report.tick, ?cause, "level_cleared")
            }
            TickEvent::GameOver { losses } => {
                info!(level = level_index, tick = report.tick, losses, "campaign_lost")
            }
        }
    }
}

fn dump_board(sim: &mut Simulation, index: usize) -> Result<(), CampaignError> {
    sim.refresh_debug_field()?;
    let level = sim.level().ok_or(EngineError::NotInitialized)?;
    let player = first_tile_of(level, EntityKind::Player);
    debug!(
        level = index,
        tick = sim.tick_count(),
        player = ?player,
        "board\n{}\nheat\n{}",
        render_board(level),
        render_heat(level)
    );
    Ok(())
}
