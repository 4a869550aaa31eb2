mod app;

use std::process::ExitCode;

use tracing::error;

fn main() -> ExitCode {
    match app::build_app() {
        Ok(app::Launch::Run(wiring)) => app::run(wiring),
        Ok(app::Launch::ShowUsage) => {
            println!("{}", app::usage_text());
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "startup_failed");
            ExitCode::FAILURE
        }
    }
}
