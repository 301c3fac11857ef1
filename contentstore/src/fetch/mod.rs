//! Content sources for the refresh loader
//!
//! Two independent source kinds compete inside `load()`: the remote content
//! service and a local snapshot file. Both sit behind traits so the race
//! can be driven by stub sources in tests.

mod file;
mod http;

pub use file::FileSnapshotSource;
pub use http::{ContentRow, HttpRemoteSource, RowData};

use std::time::Duration;

use async_trait::async_trait;

use crate::error::FetchError;

/// Remote half of a load: rows from the content service
#[async_trait]
pub trait RemoteSource: Send + Sync {
    /// Fetch all content rows. Zero rows is a failure, not an empty success.
    async fn fetch_rows(&self, timeout: Duration) -> Result<Vec<ContentRow>, FetchError>;
}

/// File half of a load: raw serialized snapshot bytes
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn fetch_bytes(&self) -> Result<Vec<u8>, FetchError>;
}

/// Reporting state of one source during a load race
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SourceStatus {
    /// Not yet reported; contributes to neither success nor failure
    #[default]
    New,
    Success,
    Fail,
}
