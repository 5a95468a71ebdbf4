use crate::error::Result;
use crate::models::{CatalogTable, DownloadResult};
use crate::utils::constants::DEFAULT_BUFFER_SIZE;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub struct CatalogWriter {
    delimiter: u8,
}

impl CatalogWriter {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Write the table with its column names as the header row.
    /// Cells are written as they appeared in the search response.
    pub fn write_catalog(&self, table: &CatalogTable, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        self.write_to(table, BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, file))
    }

    pub fn write_to<W: Write>(&self, table: &CatalogTable, writer: W) -> Result<()> {
        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(writer);

        csv_writer.write_record(table.column_names())?;
        for row in table.rows() {
            let record: Vec<&str> = table
                .columns()
                .iter()
                .map(|c| row.raw(&c.name).unwrap_or_default())
                .collect();
            csv_writer.write_record(record)?;
        }
        csv_writer.flush()?;

        Ok(())
    }
}

impl Default for CatalogWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Write batch results as pretty-printed JSON
pub fn write_summary_json(results: &[DownloadResult], path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, results)?;
    writer.flush()?;
    Ok(())
}
