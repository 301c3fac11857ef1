//! Snapshot file source
//!
//! Reads the serialized store from a configured path. Failure when no path
//! is configured, the file is missing, or the read errors.

use std::path::PathBuf;
use std::time::Instant;

use async_trait::async_trait;
use tracing::debug;

use crate::error::FetchError;

use super::SnapshotSource;

pub struct FileSnapshotSource {
    filename: Option<PathBuf>,
    debug: bool,
}

impl FileSnapshotSource {
    pub fn new(filename: Option<PathBuf>, debug: bool) -> Self {
        Self { filename, debug }
    }
}

#[async_trait]
impl SnapshotSource for FileSnapshotSource {
    async fn fetch_bytes(&self) -> Result<Vec<u8>, FetchError> {
        let Some(filename) = &self.filename else {
            return Err(FetchError::NoFile);
        };

        let started = Instant::now();
        let result = tokio::fs::read(filename).await.map_err(FetchError::Io);

        if self.debug {
            let elapsed_ms = started.elapsed().as_millis() as u64;
            match &result {
                Ok(bytes) => debug!(elapsed_ms, bytes = bytes.len(), path = %filename.display(), "load file done"),
                Err(error) => debug!(elapsed_ms, %error, path = %filename.display(), "load file failed"),
            }
        }

        result
    }
}
