// src/upload/mod.rs

use anyhow::{Context, Result};
use arrow::record_batch::RecordBatch;
use async_trait::async_trait;
use serde::Serialize;
use tracing::info;

use crate::table;

pub mod local;
pub mod s3;

pub use local::LocalDirSink;
pub use s3::S3Sink;

pub const CSV_CONTENT_TYPE: &str = "text/csv";
pub const CSV_CONTENT_ENCODING: &str = "UTF-8";

/// One object ready to be written.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub bucket: String,
    pub key: String,
    pub body: Vec<u8>,
    pub content_type: &'static str,
    pub content_encoding: &'static str,
}

/// Somewhere objects can be put. Writing an existing key overwrites it.
#[async_trait]
pub trait ObjectSink: Send + Sync {
    async fn put(&self, object: StoredObject) -> Result<()>;
}

/// What a successful upload wrote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrittenObject {
    pub bucket: String,
    pub key: String,
    pub rows: usize,
    pub bytes: usize,
}

/// Serialise `batch` to CSV and put it at `bucket/key`.
pub async fn upload_csv<S: ObjectSink + ?Sized>(
    sink: &S,
    batch: &RecordBatch,
    bucket: &str,
    key: &str,
) -> Result<WrittenObject> {
    let body = table::write_csv(batch).with_context(|| format!("serialising CSV for {}", key))?;
    let written = WrittenObject {
        bucket: bucket.to_string(),
        key: key.to_string(),
        rows: batch.num_rows(),
        bytes: body.len(),
    };

    sink.put(StoredObject {
        bucket: bucket.to_string(),
        key: key.to_string(),
        body,
        content_type: CSV_CONTENT_TYPE,
        content_encoding: CSV_CONTENT_ENCODING,
    })
    .await
    .with_context(|| format!("uploading s3://{}/{}", bucket, key))?;

    info!(bucket, key, rows = written.rows, bytes = written.bytes, "uploaded");
    Ok(written)
}
