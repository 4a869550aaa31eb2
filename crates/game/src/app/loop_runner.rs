use std::process::ExitCode;

use tracing::{error, info};

use super::bootstrap::AppWiring;
use super::campaign::run_campaign;

pub(crate) fn run(app: AppWiring) -> ExitCode {
    match run_campaign(&app) {
        Ok(summary) => {
            info!(
                end = ?summary.end,
                levels_completed = summary.levels_completed,
                ticks = summary.ticks,
                losses = summary.losses,
                digest = summary.final_digest.as_deref().unwrap_or("-"),
                "campaign_finished"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "campaign_failed");
            ExitCode::FAILURE
        }
    }
}
