use std::cmp::Ordering;
use std::fs;
use std::path::Path;
use tracing_appender::rolling;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const LOG_FILE_NAME: &str = "client.log";
const MAX_LOG_FILES: usize = 14; // keep roughly two weeks of daily logs

/// Setup file-based logging to ~/.lantern/client.log
///
/// # Errors
/// Returns an error if the log directory cannot be created or logging fails to initialize.
pub fn setup_logging() -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = dirs_next::home_dir()
        .ok_or("Cannot find home directory")?
        .join(".lantern");

    setup_logging_in(&log_dir)
}

/// Setup daily-rotated file logging inside `log_dir`.
///
/// # Errors
/// Returns an error if the directory cannot be created or a global
/// subscriber is already installed.
pub fn setup_logging_in(log_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    fs::create_dir_all(log_dir)?;

    // Prune before tracing is up; failures go to stderr.
    cleanup_old_logs(log_dir, MAX_LOG_FILES);

    let file_appender = rolling::daily(log_dir, LOG_FILE_NAME);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(file_appender).with_ansi(false))
        .with(EnvFilter::from_default_env().add_directive("lantern_core=debug".parse()?))
        .try_init()?;

    tracing::info!(
        "Logging initialized to {:?}/{} (daily rotation)",
        log_dir,
        LOG_FILE_NAME
    );

    Ok(())
}

fn cleanup_old_logs(log_dir: &Path, max_files: usize) {
    let Ok(entries) = fs::read_dir(log_dir) else {
        eprintln!("log retention: failed to read log dir {}", log_dir.display());
        return;
    };

    let mut logs: Vec<_> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_ok_and(|ft| ft.is_file()))
        .filter(|entry| entry.file_name().to_string_lossy().contains(LOG_FILE_NAME))
        .map(|entry| {
            let modified = entry.metadata().ok().and_then(|m| m.modified().ok());
            (entry.path(), modified)
        })
        .collect();

    logs.sort_by(|a, b| match (a.1, b.1) {
        (Some(a_time), Some(b_time)) => b_time.cmp(&a_time),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    for (path, _) in logs.into_iter().skip(max_files) {
        if let Err(err) = fs::remove_file(&path) {
            eprintln!("log retention: failed to remove {}: {err:?}", path.display());
        }
    }
}
