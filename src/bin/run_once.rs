// src/bin/run_once.rs
// Run the extract once from a shell, outside the Lambda runtime.

use anyhow::{Context, Result};
use census_acs5::{
    config::Config,
    fetch::CensusClient,
    pipeline, telemetry,
    upload::{LocalDirSink, ObjectSink, S3Sink},
};
use clap::Parser;
use reqwest::Client;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
struct Args {
    /// Write objects under this directory (as <dir>/<bucket>/<key>) instead of S3
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init();
    let args = Args::parse();

    let config = Config::from_env()?;
    let census = CensusClient::new(Client::new(), config.api_key)?;

    let sink: Box<dyn ObjectSink> = match &args.out_dir {
        Some(dir) => {
            info!(out_dir = %dir.display(), "writing to local directory");
            Box::new(LocalDirSink::new(dir))
        }
        None => Box::new(S3Sink::from_env().await),
    };

    let summary = pipeline::run_default(&census, sink.as_ref())
        .await
        .context("census extract failed")?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
