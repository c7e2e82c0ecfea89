use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::record::CourtRecord;

/// Write `records` as CSV to `path`, header first, in the order given.
/// Nothing is written (and no file is created) when `records` is empty.
pub fn write_records(records: &[CourtRecord], path: &Path) -> Result<()> {
    if records.is_empty() {
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }

    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    for record in records {
        wtr.serialize(record)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    wtr.flush()
        .with_context(|| format!("Failed to flush {}", path.display()))?;
    Ok(())
}

fn ensure_directory(dir: &Path) -> Result<()> {
    if dir.exists() && !dir.is_dir() {
        bail!("Path exists but is not a directory: {}", dir.display());
    }
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))
}
