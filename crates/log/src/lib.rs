//! `apikit-log` — process-wide logging setup.
//!
//! Two entry points: [`init`] for env-filtered colored console output, and
//! [`init_rolling`] for daily-rotated JSON log files. Emission everywhere
//! else goes through the `tracing` macros with structured fields.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Initialize console logging for the process.
///
/// Filtered via `RUST_LOG` (default `info`), ANSI level colors. Safe to call
/// multiple times; subsequent calls become no-ops.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(true)
        .with_target(false)
        .try_init();
}

/// Initialize daily-rotated JSON file logging under `dir`.
///
/// Creates the directory if missing. Records are written through a
/// non-blocking worker; the returned guard flushes buffered records on drop,
/// so hold it for the life of the process. Safe to call multiple times; the
/// first subscriber wins.
pub fn init_rolling(dir: impl AsRef<Path>) -> std::io::Result<WorkerGuard> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;

    let file_appender = tracing_appender::rolling::daily(dir, "apikit.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_writer(writer)
        .with_ansi(false)
        .try_init();

    Ok(guard)
}
