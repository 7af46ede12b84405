// src/upload/s3.rs

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use aws_sdk_s3::{error::DisplayErrorContext, primitives::ByteStream, Client};
use tracing::debug;

use super::{ObjectSink, StoredObject};

/// Amazon S3 via `PutObject`.
pub struct S3Sink {
    client: Client,
}

impl S3Sink {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Client built from the ambient AWS environment (region, credentials).
    pub async fn from_env() -> Self {
        let shared_config = aws_config::load_from_env().await;
        Self::new(Client::new(&shared_config))
    }
}

#[async_trait]
impl ObjectSink for S3Sink {
    async fn put(&self, object: StoredObject) -> Result<()> {
        debug!(bucket = %object.bucket, key = %object.key, bytes = object.body.len(), "PutObject");
        self.client
            .put_object()
            .bucket(object.bucket)
            .key(object.key)
            .body(ByteStream::from(object.body))
            .content_type(object.content_type)
            .content_encoding(object.content_encoding)
            .send()
            .await
            .map_err(|e| anyhow!("{}", DisplayErrorContext(e)))?;
        Ok(())
    }
}
