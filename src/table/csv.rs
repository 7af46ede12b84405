// src/table/csv.rs

use anyhow::{Context, Result};
use arrow::{csv::WriterBuilder, record_batch::RecordBatch};

/// Serialise a table to CSV: comma separated, header row first, no index
/// column, nulls written as empty fields.
pub fn write_csv(batch: &RecordBatch) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    {
        let mut writer = WriterBuilder::new()
            .with_header(true)
            .with_delimiter(b',')
            .build(&mut buf);
        writer.write(batch).context("writing CSV rows")?;
    }
    Ok(buf)
}
