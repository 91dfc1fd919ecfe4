pub mod csv_student_repository;
pub mod csv_subject_repository;

use std::collections::HashSet;
use std::path::Path;

use super::domain::roster_error::RosterError;

/// Drops rows whose key repeats an earlier row, keeping the first.
fn dedup_by_key<T>(rows: Vec<T>, key: impl Fn(&T) -> &str, path: &Path) -> Vec<T> {
    let mut seen = HashSet::new();
    let mut kept = Vec::with_capacity(rows.len());
    for row in rows {
        if seen.insert(key(&row).to_string()) {
            kept.push(row);
        } else {
            log::warn!(
                "Ignoring duplicate key {:?} in {}",
                key(&row),
                path.display()
            );
        }
    }
    kept
}

/// Re-validates rows read from disk, dropping any a hand edit made invalid.
fn keep_valid<T>(
    rows: Vec<T>,
    validate: impl Fn(&T) -> Result<T, RosterError>,
    path: &Path,
) -> Vec<T> {
    rows.iter()
        .filter_map(|row| match validate(row) {
            Ok(valid) => Some(valid),
            Err(e) => {
                log::warn!("Ignoring invalid row in {}: {e}", path.display());
                None
            }
        })
        .collect()
}

fn storage_error(path: &Path) -> impl FnOnce(csv::Error) -> RosterError + '_ {
    move |source| RosterError::Storage {
        path: path.to_path_buf(),
        source,
    }
}
