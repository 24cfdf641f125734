//! Logging and optional Chrome trace output for the simulator
//!
//! Without the `profiling` feature this only installs a `fmt` layer. With it,
//! a `tracing-chrome` layer records every span into a `trace-*.json` file that
//! is flushed when the returned guard is dropped.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

fn env_filter() -> EnvFilter {
    let default = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Keeps the trace file open until the end of the run
pub struct ProfilingGuard {
    #[cfg(feature = "profiling")]
    _flush: tracing_chrome::FlushGuard,
}

#[cfg(feature = "profiling")]
pub fn setup_logging_and_profiling() -> ProfilingGuard {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(env_filter());
    let (chrome_layer, guard) = tracing_chrome::ChromeLayerBuilder::new().build();

    tracing_subscriber::registry()
        .with(chrome_layer)
        .with(fmt_layer)
        .init();

    tracing::info!("Tracing initialized with chrome profiling layer");
    ProfilingGuard { _flush: guard }
}

#[cfg(not(feature = "profiling"))]
pub fn setup_logging_and_profiling() -> ProfilingGuard {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(env_filter());
    tracing_subscriber::registry().with(fmt_layer).init();

    tracing::debug!("Logging initialized (profiling disabled in this build)");
    ProfilingGuard {}
}
