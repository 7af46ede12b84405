// src/table/mod.rs

use anyhow::{bail, Context, Result};
use arrow::{
    array::{ArrayRef, StringArray},
    compute::concat_batches,
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
    util::pretty::pretty_format_batches,
};
use std::{collections::HashMap, sync::Arc};

pub mod csv;

pub use self::csv::write_csv;

/// Build an all-string table from a header and row cells.
///
/// Every row must have exactly as many cells as there are headers.
/// `None` cells become nulls.
pub fn from_rows(headers: &[String], rows: &[Vec<Option<String>>]) -> Result<RecordBatch> {
    if headers.is_empty() {
        bail!("table has no columns");
    }
    for (i, row) in rows.iter().enumerate() {
        if row.len() != headers.len() {
            bail!(
                "row {} has {} cells, header has {}",
                i,
                row.len(),
                headers.len()
            );
        }
    }

    let schema = Schema::new(
        headers
            .iter()
            .map(|h| Field::new(h, DataType::Utf8, true))
            .collect::<Vec<_>>(),
    );
    let columns = (0..headers.len())
        .map(|c| {
            let values: StringArray = rows.iter().map(|row| row[c].as_deref()).collect();
            Arc::new(values) as ArrayRef
        })
        .collect::<Vec<_>>();

    RecordBatch::try_new(Arc::new(schema), columns).context("building string table")
}

/// Set `name` to `value` on every row, replacing an existing column of that
/// name in place or appending a new one at the end.
pub fn with_constant_column(batch: &RecordBatch, name: &str, value: &str) -> Result<RecordBatch> {
    let constant = Arc::new(StringArray::from(vec![value; batch.num_rows()])) as ArrayRef;
    let field = Arc::new(Field::new(name, DataType::Utf8, true));

    let mut fields = batch.schema().fields().to_vec();
    let mut columns = batch.columns().to_vec();
    match fields.iter().position(|f| f.name() == name) {
        Some(idx) => {
            fields[idx] = field;
            columns[idx] = constant;
        }
        None => {
            fields.push(field);
            columns.push(constant);
        }
    }

    RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)
        .with_context(|| format!("adding column {}", name))
}

/// Row-wise union of tables that share one header, in the given order.
pub fn concat(batches: &[RecordBatch]) -> Result<RecordBatch> {
    let first = match batches.first() {
        Some(b) => b,
        None => bail!("nothing to concatenate"),
    };
    let schema = first.schema();
    for (i, b) in batches.iter().enumerate().skip(1) {
        if b.schema() != schema {
            bail!(
                "table {} has columns {:?}, expected {:?}",
                i,
                column_names(b),
                column_names(first)
            );
        }
    }
    concat_batches(&schema, batches).context("concatenating tables")
}

/// Relabel columns by their original name. Unmatched columns pass through,
/// and all renames apply at once so `a → b` next to `b → c` never chains.
pub fn rename_columns(batch: &RecordBatch, renames: &[(&str, &str)]) -> Result<RecordBatch> {
    let lookup: HashMap<&str, &str> = renames.iter().copied().collect();
    let fields = batch
        .schema()
        .fields()
        .iter()
        .map(|f| match lookup.get(f.name().as_str()) {
            Some(new_name) => Arc::new(f.as_ref().clone().with_name(*new_name)),
            None => f.clone(),
        })
        .collect::<Vec<_>>();

    RecordBatch::try_new(Arc::new(Schema::new(fields)), batch.columns().to_vec())
        .context("renaming columns")
}

pub fn column_names(batch: &RecordBatch) -> Vec<String> {
    batch
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().to_string())
        .collect()
}

/// Pretty-printed view of the first `max_rows` rows, for logs.
pub fn preview(batch: &RecordBatch, max_rows: usize) -> Result<String> {
    let head = batch.slice(0, batch.num_rows().min(max_rows));
    Ok(pretty_format_batches(&[head])?.to_string())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use arrow::array::AsArray;

    pub(crate) fn strings(batch: &RecordBatch, name: &str) -> Vec<Option<String>> {
        let idx = batch.schema().index_of(name).unwrap();
        batch
            .column(idx)
            .as_string::<i32>()
            .iter()
            .map(|v| v.map(str::to_string))
            .collect()
    }

    fn cells(row: &[&str]) -> Vec<Option<String>> {
        row.iter().map(|c| Some(c.to_string())).collect()
    }

    fn income_table() -> RecordBatch {
        let headers = vec!["DP03_0062E".to_string(), "state".to_string()];
        let rows = vec![cells(&["61372", "01"]), cells(&["76715", "02"]), cells(&["56581", "04"])];
        from_rows(&headers, &rows).unwrap()
    }

    #[test]
    fn test_from_rows_keeps_nulls_and_order() {
        let headers = vec!["NAME".to_string(), "state".to_string()];
        let rows = vec![
            vec![Some("Alabama".to_string()), Some("01".to_string())],
            vec![None, Some("02".to_string())],
        ];
        let t = from_rows(&headers, &rows).unwrap();
        assert_eq!(t.num_rows(), 2);
        assert_eq!(column_names(&t), vec!["NAME", "state"]);
        assert_eq!(
            strings(&t, "NAME"),
            vec![Some("Alabama".to_string()), None]
        );
    }

    #[test]
    fn test_from_rows_rejects_ragged_row() {
        let headers = vec!["NAME".to_string(), "state".to_string()];
        let rows = vec![cells(&["Alabama", "01"]), cells(&["Alaska"])];
        let err = from_rows(&headers, &rows).unwrap_err();
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn test_constant_column_appends_or_replaces() {
        let t = with_constant_column(&income_table(), "year", "2017").unwrap();
        assert_eq!(column_names(&t), vec!["DP03_0062E", "state", "year"]);
        assert!(strings(&t, "year").iter().all(|y| y.as_deref() == Some("2017")));

        let t = with_constant_column(&t, "year", "2018").unwrap();
        assert_eq!(t.num_columns(), 3);
        assert!(strings(&t, "year").iter().all(|y| y.as_deref() == Some("2018")));
    }

    #[test]
    fn test_concat_sums_rows_in_order() {
        let a = with_constant_column(&income_table(), "year", "2017").unwrap();
        let b = with_constant_column(&income_table().slice(0, 2), "year", "2018").unwrap();
        let all = concat(&[a, b]).unwrap();
        assert_eq!(all.num_rows(), 5);
        let years = strings(&all, "year");
        assert_eq!(years[..3], vec![Some("2017".to_string()); 3][..]);
        assert_eq!(years[3..], vec![Some("2018".to_string()); 2][..]);
    }

    #[test]
    fn test_concat_rejects_mismatched_headers() {
        let a = income_table();
        let b = rename_columns(&a, &[("state", "region")]).unwrap();
        assert!(concat(&[a, b]).is_err());
        assert!(concat(&[]).is_err());
    }

    #[test]
    fn test_rename_single_entry_changes_one_label() {
        let t = income_table();
        let renamed = rename_columns(&t, &[("DP03_0062E", "median_household_income")]).unwrap();
        assert_eq!(column_names(&renamed), vec!["median_household_income", "state"]);
        assert_eq!(renamed.num_rows(), t.num_rows());
        assert_eq!(strings(&renamed, "median_household_income"), strings(&t, "DP03_0062E"));
        assert_eq!(strings(&renamed, "state"), strings(&t, "state"));
    }

    #[test]
    fn test_rename_is_simultaneous() {
        let headers = vec!["NAME".to_string(), "state".to_string()];
        let t = from_rows(&headers, &[cells(&["Alabama", "01"])]).unwrap();
        let renamed = rename_columns(&t, &[("NAME", "state"), ("state", "state_id")]).unwrap();
        assert_eq!(column_names(&renamed), vec!["state", "state_id"]);
        assert_eq!(strings(&renamed, "state"), vec![Some("Alabama".to_string())]);
        assert_eq!(strings(&renamed, "state_id"), vec![Some("01".to_string())]);
    }

    #[test]
    fn test_rename_ignores_unknown_names() {
        let t = income_table();
        let renamed = rename_columns(&t, &[("NAME", "state")]).unwrap();
        assert_eq!(renamed, t);
    }

    #[test]
    fn test_preview_is_bounded() {
        let p = preview(&income_table(), 2).unwrap();
        assert!(p.contains("61372"));
        assert!(p.contains("76715"));
        assert!(!p.contains("56581"));
    }
}
