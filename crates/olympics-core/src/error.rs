use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the Olympics dashboard crates.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A CSV document could not be parsed.
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A JSON document could not be serialised or parsed.
    #[error("Failed to process JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A medal type string is not Gold, Silver or Bronze.
    #[error("Unknown medal type: {0}")]
    UnknownMedalType(String),

    /// A page identifier is not one of the known dashboard pages.
    #[error("Unknown page: {0}")]
    UnknownPage(String),

    /// The expected data directory does not exist.
    #[error("Data directory not found: {0}")]
    DataDirNotFound(PathBuf),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the dashboard crates.
pub type Result<T> = std::result::Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = DashboardError::FileRead {
            path: PathBuf::from("/data/medals_total.csv"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read file"));
        assert!(msg.contains("/data/medals_total.csv"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_unknown_medal_type() {
        let err = DashboardError::UnknownMedalType("Platinum".to_string());
        assert_eq!(err.to_string(), "Unknown medal type: Platinum");
    }

    #[test]
    fn test_error_display_unknown_page() {
        let err = DashboardError::UnknownPage("settings".to_string());
        assert_eq!(err.to_string(), "Unknown page: settings");
    }

    #[test]
    fn test_error_display_data_dir_not_found() {
        let err = DashboardError::DataDirNotFound(PathBuf::from("/missing/data"));
        assert_eq!(err.to_string(), "Data directory not found: /missing/data");
    }

    #[test]
    fn test_error_display_config() {
        let err = DashboardError::Config("top-n must be positive".to_string());
        assert_eq!(err.to_string(), "Configuration error: top-n must be positive");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: DashboardError = io_err.into();
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid}").unwrap_err();
        let err: DashboardError = json_err.into();
        assert!(err.to_string().contains("Failed to process JSON"));
    }
}
