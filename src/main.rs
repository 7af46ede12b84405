use anyhow::Result;
use census_acs5::{config::Config, fetch::CensusClient, pipeline, telemetry, upload::S3Sink};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, info_span, Instrument};

/// What the trigger sees. `body` is the run summary as JSON.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Response {
    status_code: u16,
    body: String,
}

async fn extract_and_load(sink: &S3Sink, http: &Client) -> Result<Response> {
    // key is read per invocation, not at cold start
    let config = Config::from_env()?;
    let census = CensusClient::new(http.clone(), config.api_key)?;

    let summary = pipeline::run_default(&census, sink).await?;
    info!(
        bucket = %summary.bucket,
        objects = summary.datasets.len(),
        "run complete"
    );

    Ok(Response {
        status_code: 200,
        body: serde_json::to_string(&summary)?,
    })
}

async fn handler(
    event: LambdaEvent<Value>,
    sink: &S3Sink,
    http: &Client,
) -> Result<Response, Error> {
    let (_payload, context) = event.into_parts();
    let span = info_span!("invocation", request_id = %context.request_id);
    Ok(extract_and_load(sink, http).instrument(span).await?)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    telemetry::init();
    info!("Starting census ACS5 extract");

    let sink = S3Sink::from_env().await;
    let http = Client::new();
    run(service_fn(|event| handler(event, &sink, &http))).await
}
