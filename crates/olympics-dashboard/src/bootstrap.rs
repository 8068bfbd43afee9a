use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use olympics_core::DashboardError;
use tracing::warn;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a CLI log level (`DEBUG`, `INFO`, `WARNING`, `ERROR`) to an
/// [`EnvFilter`] directive. Unknown strings are passed through as-is.
fn filter_directive(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" => "warn".to_string(),
        "ERROR" => "error".to_string(),
        _ => log_level.to_lowercase(),
    }
}

/// Initialise the global `tracing` subscriber.
///
/// Events go to stderr so stdout stays clean for page output. When
/// `log_file` is given, events are also appended to that file without ANSI
/// colours.
pub fn setup_logging(log_level: &str, log_file: Option<&PathBuf>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(filter_directive(log_level)).unwrap_or_else(|_| EnvFilter::new("warn"));

    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let file_layer = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()?;

    Ok(())
}

// ── Data-dir discovery ─────────────────────────────────────────────────────────

/// Directory name under `$HOME` used when `./data` does not exist.
const HOME_DATA_DIR: &str = ".olympics-dashboard";

/// Candidate data directories, in lookup order:
/// 1. `<cwd>/data`
/// 2. `~/.olympics-dashboard/data`
fn data_dir_candidates(cwd: &Path, home: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = vec![cwd.join("data")];
    if let Some(home) = home {
        candidates.push(home.join(HOME_DATA_DIR).join("data"));
    }
    candidates
}

/// Pick the directory the CSV files are read from.
///
/// An explicit `--data-dir` must exist. Without one, the first existing
/// candidate wins; when none exists `./data` is returned and every page
/// renders empty.
pub fn discover_data_dir(explicit: Option<&Path>) -> Result<PathBuf, DashboardError> {
    if let Some(dir) = explicit {
        if !dir.is_dir() {
            return Err(DashboardError::DataDirNotFound(dir.to_path_buf()));
        }
        return Ok(dir.to_path_buf());
    }

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let home = dirs::home_dir();
    let candidates = data_dir_candidates(&cwd, home.as_deref());
    match candidates.iter().find(|p| p.is_dir()) {
        Some(dir) => Ok(dir.clone()),
        None => {
            warn!(searched = ?candidates, "no data directory found; pages will be empty");
            Ok(cwd.join("data"))
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
