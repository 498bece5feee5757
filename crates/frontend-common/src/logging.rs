//! Browser console logging

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tracing_web::MakeWebConsoleWriter;

/// Route `tracing` events at or above `level` to the browser console.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed
pub fn init_logging(level: LevelFilter) -> Result<(), tracing_subscriber::util::TryInitError> {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .without_time()
        .with_writer(MakeWebConsoleWriter::new());

    tracing_subscriber::registry()
        .with(level)
        .with(fmt_layer)
        .try_init()
}
