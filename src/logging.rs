use std::path::PathBuf;

use directories::ProjectDirs;
use fs_err as fs;
use rolling_file::{BasicRollingFileAppender, RollingConditionBasic};
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{self, time::ChronoLocal},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

use crate::{errors::AppResult, is_portable};

const LOG_FILE_NAME: &str = "audioctl.log";
const LOG_FILES_KEPT: usize = 7;

/// `logs/` next to the working directory when portable, otherwise the per-user data dir.
pub fn log_directory() -> PathBuf {
    if is_portable() {
        return PathBuf::from("logs");
    }
    ProjectDirs::from("", "", env!("CARGO_PKG_NAME"))
        .map(|dirs| dirs.data_local_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

/// Sets up a daily rolling log file at `level` (or `RUST_LOG` if set)
/// plus warnings and errors on stderr.
///
/// Keep the returned guard alive until exit, dropping it flushes the file.
pub fn initialize_logging(level: LevelFilter) -> AppResult<WorkerGuard> {
    let log_dir = log_directory();
    fs::create_dir_all(&log_dir)?;

    let appender = BasicRollingFileAppender::new(
        log_dir.join(LOG_FILE_NAME),
        RollingConditionBasic::new().daily(),
        LOG_FILES_KEPT,
    )?;
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    let file_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_timer(ChronoLocal::rfc_3339())
        .with_filter(file_filter);

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .with_filter(LevelFilter::WARN);

    if let Err(e) = tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
    {
        eprintln!("Logging was already initialized: {e}");
    }

    Ok(guard)
}
