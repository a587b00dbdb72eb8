use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::model::{format_cell, CombinedTable};

// ---------------------------------------------------------------------------
// CSV writer
// ---------------------------------------------------------------------------

/// Write the table as comma-separated text: one header row, no index column.
pub fn write_csv<W: Write>(table: &CombinedTable, out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer
        .write_record(table.column_names())
        .context("writing CSV header")?;

    let mut record = Vec::with_capacity(table.column_count());
    for (row_no, (cells, target)) in table.rows().enumerate() {
        record.clear();
        record.extend(cells.iter().copied().map(format_cell));
        record.push(target.to_string());
        writer
            .write_record(&record)
            .with_context(|| format!("writing CSV row {row_no}"))?;
    }

    writer.flush().context("flushing CSV output")?;
    Ok(())
}

/// Write the table to `path`, replacing any existing file.
pub fn save_csv(table: &CombinedTable, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_csv(table, std::io::BufWriter::new(file))
        .with_context(|| format!("writing {}", path.display()))
}

/// Save the table if there is one. Returns the resolved path written to, or
/// `None` when there was nothing to save. The parent directory must exist.
pub fn persist_if_present(table: Option<&CombinedTable>, path: &Path) -> Result<Option<PathBuf>> {
    let Some(table) = table else {
        log::debug!("no table to persist; skipping {}", path.display());
        return Ok(None);
    };

    save_csv(table, path)?;
    let resolved = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    log::info!("Local backup saved to: {}", resolved.display());
    Ok(Some(resolved))
}
