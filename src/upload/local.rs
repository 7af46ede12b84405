// src/upload/local.rs

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

use super::{ObjectSink, StoredObject};

/// Writes objects to `<root>/<bucket>/<key>` on the local disk.
pub struct LocalDirSink {
    root: PathBuf,
}

impl LocalDirSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, bucket: &str, key: &str) -> Result<PathBuf> {
        let rel = Path::new(bucket).join(key);
        if !rel.components().all(|c| matches!(c, Component::Normal(_))) {
            bail!("refusing to write outside {}: {}", self.root.display(), rel.display());
        }
        Ok(self.root.join(rel))
    }
}

#[async_trait]
impl ObjectSink for LocalDirSink {
    async fn put(&self, object: StoredObject) -> Result<()> {
        let dest = self.path_for(&object.bucket, &object.key)?;
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        fs::write(&dest, &object.body)
            .await
            .with_context(|| format!("writing {}", dest.display()))?;
        Ok(())
    }
}
