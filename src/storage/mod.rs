//! Feed output storage.
//!
//! Writes the rendered feed atomically so a crashed run never leaves a
//! truncated file at the published path, and reads the published feed
//! back for inspection.

use std::path::{Path, PathBuf};

use rss::Channel;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};

/// Local filesystem feed storage.
#[derive(Clone)]
pub struct FeedStorage {
    feed_path: PathBuf,
}

impl FeedStorage {
    /// Create a storage handle for the given output path.
    pub fn new(feed_path: impl Into<PathBuf>) -> Self {
        Self {
            feed_path: feed_path.into(),
        }
    }

    /// Path of the published feed file.
    pub fn path(&self) -> &Path {
        &self.feed_path
    }

    /// Write feed XML atomically (write to temp, then rename).
    pub async fn write_feed(&self, xml: &str) -> Result<()> {
        if let Some(parent) = self.feed_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let tmp = self.feed_path.with_extension("xml.tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(xml.as_bytes()).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.feed_path).await?;
        Ok(())
    }

    /// Read the currently published feed back, if one exists.
    pub async fn read_current(&self) -> Result<Option<Channel>> {
        match tokio::fs::read(&self.feed_path).await {
            Ok(bytes) => Ok(Some(Channel::read_from(&bytes[..])?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}
