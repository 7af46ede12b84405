// src/fetch/mod.rs

use anyhow::{bail, Context, Result};
use arrow::record_batch::RecordBatch;
use reqwest::Client;
use tracing::{debug, info, instrument};
use url::Url;

use crate::table;

pub mod response;

pub use response::{ApiRows, YEAR_COLUMN};

/// Root of the Census Bureau data API.
pub const CENSUS_BASE_URL: &str = "https://api.census.gov/data/";
/// ACS 5-year data profile tables.
pub const ACS5_PROFILE: &str = "acs/acs5/profile";
/// Every state, no county breakdown.
const ALL_STATES: &str = "state:*";

/// One indicator pulled across several years.
#[derive(Debug, Clone, Copy)]
pub struct IndicatorQuery<'a> {
    /// Comma separated API variable codes, e.g. `NAME` or `DP03_0062E`.
    pub columns: &'a str,
    pub years: &'a [&'a str],
}

/// Thin client over the ACS 5-year profile endpoint.
pub struct CensusClient {
    http: Client,
    base: Url,
    api_key: String,
}

impl CensusClient {
    pub fn new(http: Client, api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(http, CENSUS_BASE_URL, api_key)
    }

    /// Point the client at another API root (a local server in tests).
    pub fn with_base_url(http: Client, base: &str, api_key: impl Into<String>) -> Result<Self> {
        let mut base = Url::parse(base).with_context(|| format!("parsing base URL {}", base))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            http,
            base,
            api_key: api_key.into(),
        })
    }

    /// `{base}/{year}/{dataset}?get={columns}&for=state:*&key={key}`
    pub fn year_url(&self, columns: &str, year: &str) -> Result<Url> {
        let mut url = self
            .base
            .join(&format!("{}/{}", year, ACS5_PROFILE))
            .with_context(|| format!("building URL for {}", year))?;
        url.query_pairs_mut()
            .append_pair("get", columns)
            .append_pair("for", ALL_STATES)
            .append_pair("key", &self.api_key);
        Ok(url)
    }

    /// Fetch `query.columns` for every year, one call per year in order, and
    /// stack the results. Any failed call fails the whole query.
    #[instrument(level = "info", skip(self), fields(columns = query.columns))]
    pub async fn fetch(&self, query: &IndicatorQuery<'_>) -> Result<RecordBatch> {
        if query.years.is_empty() {
            bail!("no years requested for {}", query.columns);
        }

        let mut per_year = Vec::with_capacity(query.years.len());
        for &year in query.years {
            let t = self
                .fetch_year(query.columns, year)
                .await
                .with_context(|| format!("fetching {} for {}", query.columns, year))?;
            per_year.push(t);
        }

        let all = table::concat(&per_year)
            .with_context(|| format!("combining years for {}", query.columns))?;
        info!(rows = all.num_rows(), years = query.years.len(), "combined");
        Ok(all)
    }

    async fn fetch_year(&self, columns: &str, year: &str) -> Result<RecordBatch> {
        let url = self.year_url(columns, year)?;
        let shown = redact_key(&url);
        debug!(url = %shown, "GET");

        // reqwest errors carry the full URL, key included
        let rows = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| e.without_url())
            .with_context(|| format!("GET {} failed", shown))?
            .error_for_status()
            .map_err(|e| e.without_url())
            .with_context(|| format!("Non-success status {}", shown))?
            .json::<ApiRows>()
            .await
            .map_err(|e| e.without_url())
            .with_context(|| format!("decoding Census JSON from {}", shown))?;

        let t = response::tabulate_year(rows, year)?;
        info!(year, rows = t.num_rows(), "fetched");
        Ok(t)
    }
}

/// Copy of `url` with the `key` query value masked, safe to log.
pub fn redact_key(url: &Url) -> String {
    let pairs = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "key" { "REDACTED".into() } else { v };
            (k.into_owned(), v.into_owned())
        })
        .collect::<Vec<_>>();
    let mut shown = url.clone();
    shown.query_pairs_mut().clear().extend_pairs(pairs);
    shown.to_string()
}
