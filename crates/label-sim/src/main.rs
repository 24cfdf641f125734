//! Label Sim - headless runner for the tile-labels pipeline
//!
//! Loads a JSON scene, runs the label update for a number of frames and
//! prints the final label states, optionally with a hit-test result.

mod error;
mod logging;
mod run;
mod scene;
mod settings;

use settings::Settings;
use std::process::ExitCode;

fn main() -> ExitCode {
    let settings = Settings::from_cli();
    let _profiling = logging::setup_logging_and_profiling();

    match run::run(&settings).and_then(|report| run::print(&report, settings.json)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
