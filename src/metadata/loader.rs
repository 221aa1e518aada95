//! TSV loading and saving for metadata tables.

use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};
use log::info;

use crate::error::Result;
use crate::metadata::table::MetadataTable;

/// Load a tab-separated metadata file.
///
/// The first column holds sample ids. Rows whose id cell starts with `#`
/// (embedded comment or type-annotation rows) are skipped. Ragged rows are
/// rejected.
pub fn load_metadata(path: &Path) -> Result<MetadataTable> {
    let mut reader = ReaderBuilder::new().delimiter(b'\t').from_path(path)?;
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|header| header.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: Vec<String> = record.iter().map(|cell| cell.trim().to_string()).collect();
        if row.first().is_some_and(|id| id.starts_with('#')) {
            continue;
        }
        rows.push(row);
    }

    let table = MetadataTable::new(headers, rows)?;
    info!(
        "Loaded {} samples with {} covariate columns from {}",
        table.len(),
        table.columns().len(),
        path.display()
    );
    Ok(table)
}

/// Write a metadata table as TSV, including any appended columns.
pub fn save_metadata(path: &Path, table: &MetadataTable) -> Result<()> {
    let mut writer = WriterBuilder::new().delimiter(b'\t').from_path(path)?;

    let mut header = Vec::with_capacity(table.columns().len() + 1);
    header.push(table.id_header());
    header.extend(table.columns().iter().map(String::as_str));
    writer.write_record(&header)?;

    for row in 0..table.len() {
        let mut record = Vec::with_capacity(header.len());
        record.push(table.row_id(row));
        for column in 0..table.columns().len() {
            record.push(table.cell(row, column));
        }
        writer.write_record(&record)?;
    }

    writer.flush()?;
    info!("Wrote {} samples to {}", table.len(), path.display());
    Ok(())
}
