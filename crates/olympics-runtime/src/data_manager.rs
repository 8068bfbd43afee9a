//! Snapshot cache over a pluggable table source.
//!
//! [`DataStore`] hands out immutable [`OlympicData`] snapshots. Raw tables
//! are cached per [`SourceKey`] (path plus modification time), so a file
//! edited on disk is re-read on the next call while untouched files are
//! not. The normalised snapshot is rebuilt only when some key changed.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::SystemTime;

use olympics_core::error::{DashboardError, Result};
use olympics_core::table::Table;
use olympics_data::reader::{locate_file, read_csv_table};
use tracing::{debug, warn};

use crate::snapshot::{Dataset, OlympicData, RawTables};

// ── Source abstraction ────────────────────────────────────────────────────────

/// Identity of one version of a source file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceKey {
    pub path: PathBuf,
    pub modified: Option<SystemTime>,
}

/// Where raw dataset tables come from.
pub trait TableSource: Send + Sync {
    /// Current key for `dataset`, or `None` when it is not available.
    fn fingerprint(&self, dataset: Dataset) -> Option<SourceKey>;

    /// Read the raw table for `dataset`.
    fn read(&self, dataset: Dataset) -> Result<Table>;
}

/// CSV files in one data directory, matched by [`Dataset::file_name`].
#[derive(Debug, Clone)]
pub struct CsvDirectorySource {
    data_dir: PathBuf,
}

impl CsvDirectorySource {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

impl TableSource for CsvDirectorySource {
    fn fingerprint(&self, dataset: Dataset) -> Option<SourceKey> {
        let path = locate_file(&self.data_dir, dataset.file_name())?;
        let modified = std::fs::metadata(&path).and_then(|m| m.modified()).ok();
        Some(SourceKey { path, modified })
    }

    fn read(&self, dataset: Dataset) -> Result<Table> {
        let path = locate_file(&self.data_dir, dataset.file_name()).ok_or_else(|| DashboardError::FileRead {
            path: self.data_dir.join(dataset.file_name()),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        })?;
        read_csv_table(&path)
    }
}

// ── DataStore ─────────────────────────────────────────────────────────────────

#[derive(Default)]
struct CacheState {
    raw: HashMap<Dataset, (SourceKey, Table)>,
    snapshot: Option<(Vec<Option<SourceKey>>, Arc<OlympicData>)>,
    reads: usize,
}

/// Thread-safe, shareable snapshot cache.
///
/// # Example
/// ```no_run
/// use olympics_runtime::data_manager::{CsvDirectorySource, DataStore};
///
/// let store = DataStore::new(CsvDirectorySource::new("data"));
/// let data = store.snapshot();
/// println!("{} countries", data.medal_totals.len());
/// ```
pub struct DataStore<S> {
    source: S,
    state: Mutex<CacheState>,
}

impl<S: TableSource> DataStore<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: Mutex::new(CacheState::default()),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Current snapshot. Missing or unreadable files degrade to empty
    /// tables; this never fails.
    pub fn snapshot(&self) -> Arc<OlympicData> {
        let keys: Vec<Option<SourceKey>> = Dataset::ALL.iter().map(|d| self.source.fingerprint(*d)).collect();
        let mut state = self.lock();

        if let Some((cached_keys, data)) = &state.snapshot {
            if *cached_keys == keys {
                debug!("returning cached snapshot");
                return Arc::clone(data);
            }
        }

        let mut raw = RawTables::default();
        for (dataset, key) in Dataset::ALL.iter().copied().zip(&keys) {
            let Some(key) = key else {
                debug!(dataset = %dataset, "dataset not available");
                state.raw.remove(&dataset);
                continue;
            };
            if let Some((cached_key, table)) = state.raw.get(&dataset) {
                if cached_key == key {
                    raw.insert(dataset, table.clone());
                    continue;
                }
            }
            state.reads += 1;
            match self.source.read(dataset) {
                Ok(table) => {
                    state.raw.insert(dataset, (key.clone(), table.clone()));
                    raw.insert(dataset, table);
                }
                Err(e) => {
                    warn!(dataset = %dataset, error = %e, "could not read dataset; using an empty table");
                    state.raw.remove(&dataset);
                }
            }
        }

        let data = Arc::new(OlympicData::build(&raw));
        state.snapshot = Some((keys, Arc::clone(&data)));
        data
    }

    /// Drop every cached table and snapshot.
    pub fn clear(&self) {
        let mut state = self.lock();
        state.raw.clear();
        state.snapshot = None;
        debug!("data cache cleared");
    }

    /// Number of source reads performed so far.
    pub fn reads(&self) -> usize {
        self.lock().reads
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        // Cached values are immutable once stored, so a poisoned lock still
        // holds consistent data.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    fn set_mtime(dir: &Path, name: &str, secs_after_epoch: u64) {
        let file = fs::OpenOptions::new().write(true).open(dir.join(name)).unwrap();
        file.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(secs_after_epoch))
            .unwrap();
    }

    fn store_with_medals() -> (DataStore<CsvDirectorySource>, TempDir) {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "medals_total.csv", "noc,Gold,Silver,Bronze\nUSA,10,5,3\nCHN,8,10,6\n");
        write(dir.path(), "nocs.csv", "code,country\nUSA,United States\nCHN,China\n");
        (DataStore::new(CsvDirectorySource::new(dir.path())), dir)
    }

    #[test]
    fn test_snapshot_is_cached_until_files_change() {
        let (store, _dir) = store_with_medals();
        let first = store.snapshot();
        assert_eq!(first.medal_totals.len(), 2);
        assert_eq!(store.reads(), 2);

        let second = store.snapshot();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(store.reads(), 2);
    }

    #[test]
    fn test_changed_mtime_rereads_only_that_file() {
        let (store, dir) = store_with_medals();
        set_mtime(dir.path(), "medals_total.csv", 1_000);
        let first = store.snapshot();

        write(dir.path(), "medals_total.csv", "noc,Gold,Silver,Bronze\nUSA,11,5,3\n");
        set_mtime(dir.path(), "medals_total.csv", 2_000);
        let second = store.snapshot();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(second.medal_totals.len(), 1);
        assert_eq!(second.medal_totals[0].total(), 19);
        assert_eq!(store.reads(), 3);
    }

    #[test]
    fn test_clear_forces_reread() {
        let (store, _dir) = store_with_medals();
        store.snapshot();
        store.clear();
        store.snapshot();
        assert_eq!(store.reads(), 4);
    }

    #[test]
    fn test_missing_directory_yields_empty_snapshot() {
        let store = DataStore::new(CsvDirectorySource::new("/nonexistent/olympics/data"));
        let data = store.snapshot();
        assert!(data.is_empty());
        assert_eq!(store.reads(), 0);
    }

    #[test]
    fn test_case_insensitive_file_names() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "Medals_Total.CSV", "noc,gold,silver,bronze\nFRA,16,26,22\n");
        let store = DataStore::new(CsvDirectorySource::new(dir.path()));
        assert_eq!(store.snapshot().medal_totals[0].total(), 64);
    }

    struct FailingSource;

    impl TableSource for FailingSource {
        fn fingerprint(&self, dataset: Dataset) -> Option<SourceKey> {
            Some(SourceKey {
                path: PathBuf::from(dataset.file_name()),
                modified: None,
            })
        }

        fn read(&self, dataset: Dataset) -> Result<Table> {
            Err(DashboardError::Config(format!("{dataset} unavailable")))
        }
    }

    #[test]
    fn test_read_errors_degrade_to_empty_tables() {
        let store = DataStore::new(FailingSource);
        let data = store.snapshot();
        assert!(data.is_empty());
        assert_eq!(store.reads(), Dataset::ALL.len());
    }

    #[test]
    fn test_store_is_shareable_across_threads() {
        let (store, _dir) = store_with_medals();
        let store = Arc::new(store);
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || store.snapshot().medal_totals.len())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), 2);
        }
    }
}
