//! CSV discovery and loading.
//!
//! Reads the flat CSV files under the data directory into [`Table`]s.
//! Fields are kept as text; numeric interpretation happens during
//! normalisation.

use std::path::{Path, PathBuf};

use olympics_core::error::{DashboardError, Result};
use olympics_core::table::{Cell, Table};
use tracing::{debug, warn};

// ── Public API ────────────────────────────────────────────────────────────────

/// Find all `.csv` files under `data_dir`, shallowest first, then by path.
pub fn find_csv_files(data_dir: &Path) -> Vec<PathBuf> {
    if !data_dir.exists() {
        warn!("Data directory does not exist: {}", data_dir.display());
        return Vec::new();
    }

    let mut files: Vec<(usize, PathBuf)> = walkdir::WalkDir::new(data_dir)
        .follow_links(true)
        .max_depth(3)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .map(|ext| ext.eq_ignore_ascii_case("csv"))
                    .unwrap_or(false)
        })
        .map(|entry| (entry.depth(), entry.into_path()))
        .collect();

    files.sort();
    files.into_iter().map(|(_, path)| path).collect()
}

/// Locate `file_name` under `data_dir`, comparing names case-insensitively.
///
/// An exact path hit is preferred; otherwise the shallowest match from
/// [`find_csv_files`] wins.
pub fn locate_file(data_dir: &Path, file_name: &str) -> Option<PathBuf> {
    let direct = data_dir.join(file_name);
    if direct.is_file() {
        return Some(direct);
    }
    find_csv_files(data_dir).into_iter().find(|p| {
        p.file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.eq_ignore_ascii_case(file_name))
            .unwrap_or(false)
    })
}

/// Read a CSV file into a [`Table`].
///
/// Header names are trimmed. Ragged rows are padded / truncated to the
/// header width. Invalid UTF-8 is replaced rather than rejected. Records
/// the CSV parser cannot decode at all are skipped and counted.
pub fn read_csv_table(path: &Path) -> Result<Table> {
    let file = std::fs::File::open(path).map_err(|source| DashboardError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(std::io::BufReader::new(file));

    let headers: Vec<String> = reader
        .byte_headers()?
        .iter()
        .map(|h| String::from_utf8_lossy(h).trim().trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut table = Table::new(headers);
    let mut skipped = 0u64;

    for record in reader.byte_records() {
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                debug!("Skipping undecodable record in {}: {}", path.display(), e);
                skipped += 1;
                continue;
            }
        };
        if record.iter().all(|field| field.iter().all(u8::is_ascii_whitespace)) {
            continue;
        }
        let row = record
            .iter()
            .map(|field| Cell::parse(&String::from_utf8_lossy(field)))
            .collect();
        table.push_row(row);
    }

    debug!(
        "File {}: {} columns, {} rows, {} skipped",
        path.display(),
        table.columns().len(),
        table.len(),
        skipped,
    );

    Ok(table)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
