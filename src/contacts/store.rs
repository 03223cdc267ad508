use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tempfile::NamedTempFile;

use super::record::ContactRecord;

pub fn load_contacts(path: &Path) -> Vec<ContactRecord> {
    match try_load_contacts(path) {
        Ok(records) => {
            tracing::info!(path = %path.display(), count = records.len(), "loaded contacts");
            records
        }
        Err(error) => {
            tracing::warn!(path = %path.display(), "starting with no contacts: {error:#}");
            Vec::new()
        }
    }
}

fn try_load_contacts(path: &Path) -> Result<Vec<ContactRecord>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read contact file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("contact file {} is not a record array", path.display()))
}

/// Writes the whole array to a temporary file beside `path`, then renames it
/// over the old file. Readers never see a half-written array.
pub fn save_contacts(path: &Path, records: &[ContactRecord]) -> Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create data directory {}", dir.display()))?;

    let mut staged = NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to stage contact file in {}", dir.display()))?;
    let mut writer = BufWriter::new(&mut staged);
    serde_json::to_writer_pretty(&mut writer, records).context("failed to encode contacts")?;
    writer.flush().context("failed to write staged contact file")?;
    drop(writer);
    staged
        .as_file()
        .sync_all()
        .context("failed to flush staged contact file")?;
    staged
        .persist(path)
        .with_context(|| format!("failed to replace contact file {}", path.display()))?;
    Ok(())
}
