// src/pipeline.rs

use anyhow::{Context, Result};
use arrow::record_batch::RecordBatch;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, instrument, Level};

use crate::{
    fetch::{CensusClient, IndicatorQuery},
    table,
    upload::{self, ObjectSink, WrittenObject},
};

/// Destination bucket for every dataset.
pub const BUCKET: &str = "brandonltran-census-acs5-datasets";

/// ACS 5-year vintages pulled on each run.
pub const YEARS: &[&str] = &["2017", "2018"];

/// One indicator: what to ask the API for, how to label it, where to put it.
#[derive(Debug, Clone, Copy)]
pub struct Dataset {
    pub name: &'static str,
    pub columns: &'static str,
    pub renames: &'static [(&'static str, &'static str)],
    pub key: &'static str,
}

pub static DATASETS: &[Dataset] = &[
    Dataset {
        name: "states",
        columns: "NAME",
        renames: &[("NAME", "state"), ("state", "state_id")],
        key: "states/census_acs5_states.csv",
    },
    Dataset {
        name: "median_household_incomes",
        columns: "DP03_0062E",
        renames: &[
            ("DP03_0062E", "median_household_income"),
            ("state", "state_id"),
        ],
        key: "median-household-incomes/census_acs5_median_household_incomes.csv",
    },
    Dataset {
        name: "graduation_rates",
        columns: "DP02_0067PE",
        renames: &[("DP02_0067PE", "graduation_rate"), ("state", "state_id")],
        key: "graduation-rates/census_acs5_graduation_rates.csv",
    },
];

const PREVIEW_ROWS: usize = 5;

/// Returned to the caller once every object is written.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub bucket: String,
    pub years: Vec<String>,
    pub datasets: Vec<DatasetSummary>,
    pub finished_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub dataset: String,
    #[serde(flatten)]
    pub object: WrittenObject,
}

/// Fetch and relabel one dataset.
pub async fn extract(
    census: &CensusClient,
    dataset: &Dataset,
    years: &[&str],
) -> Result<RecordBatch> {
    let raw = census
        .fetch(&IndicatorQuery {
            columns: dataset.columns,
            years,
        })
        .await?;
    let renamed = table::rename_columns(&raw, dataset.renames)?;
    info!(
        dataset = dataset.name,
        rows = renamed.num_rows(),
        columns = ?table::column_names(&renamed),
        "extracted"
    );
    if tracing::enabled!(Level::DEBUG) {
        let preview = table::preview(&renamed, PREVIEW_ROWS)?;
        debug!(dataset = dataset.name, "\n{}", preview);
    }
    Ok(renamed)
}

/// Full run: every dataset is fetched before anything is uploaded, then each
/// table goes to its own key. The first failure aborts; objects already
/// written stay written.
#[instrument(level = "info", skip(census, sink, datasets))]
pub async fn run<S: ObjectSink + ?Sized>(
    census: &CensusClient,
    sink: &S,
    bucket: &str,
    datasets: &[Dataset],
    years: &[&str],
) -> Result<RunSummary> {
    let mut tables = Vec::with_capacity(datasets.len());
    for dataset in datasets {
        let t = extract(census, dataset, years)
            .await
            .with_context(|| format!("extracting {}", dataset.name))?;
        tables.push((dataset, t));
    }

    let mut written = Vec::with_capacity(tables.len());
    for (dataset, t) in &tables {
        let object = upload::upload_csv(sink, t, bucket, dataset.key)
            .await
            .with_context(|| format!("loading {}", dataset.name))?;
        written.push(DatasetSummary {
            dataset: dataset.name.to_string(),
            object,
        });
    }

    Ok(RunSummary {
        bucket: bucket.to_string(),
        years: years.iter().map(|y| y.to_string()).collect(),
        datasets: written,
        finished_at: Utc::now(),
    })
}

/// The fixed production run: all datasets, all years, the one bucket.
pub async fn run_default<S: ObjectSink + ?Sized>(
    census: &CensusClient,
    sink: &S,
) -> Result<RunSummary> {
    run(census, sink, BUCKET, DATASETS, YEARS).await
}
