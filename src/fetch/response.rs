// src/fetch/response.rs

use anyhow::{bail, Context, Result};
use arrow::record_batch::RecordBatch;

use crate::table;

/// Column appended to every fetched table, holding the year of the call.
pub const YEAR_COLUMN: &str = "year";

/// Decoded Census API body: a JSON array of arrays. Row 0 is the header,
/// every other row is one geography. Cells are strings, or null where the
/// API has no value.
pub type ApiRows = Vec<Vec<Option<String>>>;

/// Reshape one year's rows into a table tagged with `year`.
pub fn tabulate_year(mut rows: ApiRows, year: &str) -> Result<RecordBatch> {
    if rows.is_empty() {
        bail!("Census response for {} has no header row", year);
    }
    let headers = rows
        .remove(0)
        .into_iter()
        .enumerate()
        .map(|(i, h)| h.with_context(|| format!("header cell {} is null", i)))
        .collect::<Result<Vec<_>>>()?;

    let raw = table::from_rows(&headers, &rows)
        .with_context(|| format!("reshaping Census response for {}", year))?;
    table::with_constant_column(&raw, YEAR_COLUMN, year)
}
