//! Multi-source refresh loader
//!
//! Races the remote content service and the local snapshot file against a
//! deadline and commits exactly one winner into the template store. The
//! decision point fires once, on whichever of all-enabled-reported or
//! timeout-elapsed comes first; a report arriving after that lands in a
//! dropped channel and can never touch the store.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{Mutex, RwLock, mpsc};
use tracing::{debug, info, warn};

use crate::config::{ContentConfig, Strategy};
use crate::error::{ContentError, FetchError};
use crate::fetch::{ContentRow, FileSnapshotSource, HttpRemoteSource, RemoteSource, SnapshotSource, SourceStatus};
use crate::store::{SnapshotMap, TemplateStore};

/// Shared handle to the template store
pub type SharedStore = Arc<RwLock<TemplateStore>>;

/// Which source won a `load()` race
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Url,
    File,
}

/// What ended the race
#[derive(Debug, Clone, Copy)]
enum Trigger {
    AllReported,
    Timeout,
    /// A fetch task died before reporting
    RaceFailed,
}

/// Report from one fetch task
enum RaceMsg {
    Url(Result<Vec<ContentRow>, FetchError>),
    File(Result<Vec<u8>, FetchError>),
}

/// Per-source bookkeeping during a race
struct SourceSlot<T> {
    status: SourceStatus,
    data: Option<T>,
    error: Option<FetchError>,
}

impl<T> Default for SourceSlot<T> {
    fn default() -> Self {
        Self {
            status: SourceStatus::New,
            data: None,
            error: None,
        }
    }
}

impl<T> SourceSlot<T> {
    fn report(&mut self, result: Result<T, FetchError>) {
        match result {
            Ok(data) => {
                self.status = SourceStatus::Success;
                self.data = Some(data);
            }
            Err(error) => {
                self.status = SourceStatus::Fail;
                self.error = Some(error);
            }
        }
    }
}

/// Orchestrates refreshes of one template store
///
/// All store writes go through here; a refresh mutex serializes `load`, the
/// single-source reloads, and the export path, so a live reload can never
/// interleave with an in-flight load.
pub struct RefreshLoader {
    strategy: Strategy,
    timeout_ms: AtomicU64,
    filename: Option<PathBuf>,
    store: SharedStore,
    remote: Arc<dyn RemoteSource>,
    snapshot: Arc<dyn SnapshotSource>,
    refresh_lock: Mutex<()>,
}

impl RefreshLoader {
    /// Build a loader over the production sources
    pub fn new(config: &ContentConfig, store: SharedStore) -> Result<Self, ContentError> {
        let remote: Arc<dyn RemoteSource> = Arc::new(HttpRemoteSource::new(
            &config.url,
            &config.app_key,
            &config.app_secret,
            config.debug,
        )?);
        let snapshot: Arc<dyn SnapshotSource> =
            Arc::new(FileSnapshotSource::new(config.filename.clone(), config.debug));
        Ok(Self::with_sources(config, store, remote, snapshot))
    }

    /// Build a loader over injected sources
    pub fn with_sources(
        config: &ContentConfig,
        store: SharedStore,
        remote: Arc<dyn RemoteSource>,
        snapshot: Arc<dyn SnapshotSource>,
    ) -> Self {
        Self {
            strategy: config.strategy,
            timeout_ms: AtomicU64::new(config.timeout_ms),
            filename: config.filename.clone(),
            store,
            remote,
            snapshot,
            refresh_lock: Mutex::new(()),
        }
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms.load(Ordering::Relaxed)
    }

    /// Change the load deadline (and remote request timeout)
    pub fn set_timeout(&self, timeout_ms: u64) {
        self.timeout_ms.store(timeout_ms, Ordering::Relaxed);
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    /// Race the enabled sources against the deadline and commit the winner.
    ///
    /// A successful url fetch always beats a successful file fetch,
    /// regardless of finish order. When neither enabled source succeeded,
    /// the error concatenates the reasons of sources that reported failure;
    /// a source still in flight when the deadline fired contributes nothing,
    /// so a timeout error can carry a sparse or even empty reason list.
    pub async fn load(&self) -> Result<LoadOutcome, ContentError> {
        let _guard = self.refresh_lock.lock().await;

        let timeout_ms = self.timeout_ms();
        let timeout = Duration::from_millis(timeout_ms);
        debug!(strategy = %self.strategy, timeout_ms, "load: racing sources");

        let (tx, mut rx) = mpsc::channel::<RaceMsg>(2);
        let mut enabled = 0usize;

        if self.strategy.allows_url() {
            enabled += 1;
            let remote = Arc::clone(&self.remote);
            let tx = tx.clone();
            tokio::spawn(async move {
                let result = remote.fetch_rows(timeout).await;
                let _ = tx.send(RaceMsg::Url(result)).await;
            });
        }
        if self.strategy.allows_file() {
            enabled += 1;
            let snapshot = Arc::clone(&self.snapshot);
            let tx = tx.clone();
            tokio::spawn(async move {
                let result = snapshot.fetch_bytes().await;
                let _ = tx.send(RaceMsg::File(result)).await;
            });
        }
        drop(tx);

        let mut url_slot: SourceSlot<Vec<ContentRow>> = SourceSlot::default();
        let mut file_slot: SourceSlot<Vec<u8>> = SourceSlot::default();
        let mut reported = 0usize;

        let deadline = tokio::time::sleep(timeout);
        tokio::pin!(deadline);

        // Single decision point: the first of timeout or all-reported ends
        // the loop, and the report channel drops with it.
        let trigger = loop {
            tokio::select! {
                _ = &mut deadline => break Trigger::Timeout,
                msg = rx.recv() => match msg {
                    Some(RaceMsg::Url(result)) => {
                        url_slot.report(result);
                        reported += 1;
                        if reported == enabled {
                            break Trigger::AllReported;
                        }
                    }
                    Some(RaceMsg::File(result)) => {
                        file_slot.report(result);
                        reported += 1;
                        if reported == enabled {
                            break Trigger::AllReported;
                        }
                    }
                    // Every sender dropped without reporting: a fetch task died.
                    None => break Trigger::RaceFailed,
                },
            }
        };

        self.decide(trigger, timeout_ms, url_slot, file_slot).await
    }

    async fn decide(
        &self,
        trigger: Trigger,
        timeout_ms: u64,
        url_slot: SourceSlot<Vec<ContentRow>>,
        file_slot: SourceSlot<Vec<u8>>,
    ) -> Result<LoadOutcome, ContentError> {
        if self.strategy.allows_url() && url_slot.status == SourceStatus::Success {
            let rows = url_slot.data.unwrap_or_default();
            self.refresh_url_data(rows).await;
            info!("content loaded from url");
            return Ok(LoadOutcome::Url);
        }

        if self.strategy.allows_file() && file_slot.status == SourceStatus::Success {
            let bytes = file_slot.data.unwrap_or_default();
            self.refresh_file_data(&bytes).await?;
            info!("content loaded from file");
            return Ok(LoadOutcome::File);
        }

        let mut reasons = Vec::new();
        if url_slot.status == SourceStatus::Fail
            && let Some(error) = &url_slot.error
        {
            reasons.push(format!("url: {}", error));
        }
        if file_slot.status == SourceStatus::Fail
            && let Some(error) = &file_slot.error
        {
            reasons.push(format!("file: {}", error));
        }
        let reasons = reasons.join("; ");

        warn!(?trigger, %reasons, "load: no source succeeded");
        Err(match trigger {
            Trigger::Timeout => ContentError::LoadTimeout { timeout_ms, reasons },
            Trigger::AllReported => ContentError::SourcesExhausted { reasons },
            Trigger::RaceFailed => ContentError::RaceFailed { reasons },
        })
    }

    /// Upsert remote rows into the store, one record per (type, locale,
    /// key). Re-merging the same rows leaves the store unchanged.
    pub async fn refresh_url_data(&self, rows: Vec<ContentRow>) {
        let count = rows.len();
        let mut store = self.store.write().await;
        for row in rows {
            let record = row.into_record();
            let (key, app_type, locale) = (record.key.clone(), record.app_type.clone(), record.locale.clone());
            store.set(&key, &app_type, &locale, record);
        }
        store.loaded_at = Some(Utc::now());
        debug!(count, "refresh_url_data: merged rows");
    }

    /// Parse snapshot bytes and replace the store wholesale. A parse
    /// failure leaves the store untouched.
    pub async fn refresh_file_data(&self, bytes: &[u8]) -> Result<(), FetchError> {
        let data: SnapshotMap = serde_json::from_slice(bytes)?;
        let mut store = self.store.write().await;
        store.replace(data);
        store.loaded_at = Some(Utc::now());
        debug!("refresh_file_data: store replaced");
        Ok(())
    }

    /// Remote-only refresh: fetch rows and merge them. Used for the initial
    /// load under the url strategy and by the live-reload trigger.
    pub async fn load_url(&self) -> Result<(), ContentError> {
        let _guard = self.refresh_lock.lock().await;
        let timeout = Duration::from_millis(self.timeout_ms());
        let rows = self.remote.fetch_rows(timeout).await?;
        self.refresh_url_data(rows).await;
        Ok(())
    }

    /// File-only refresh: read the snapshot and replace the store
    pub async fn load_file(&self) -> Result<(), ContentError> {
        let _guard = self.refresh_lock.lock().await;
        let bytes = self.snapshot.fetch_bytes().await?;
        self.refresh_file_data(&bytes).await?;
        Ok(())
    }

    /// Refresh from the remote service, then serialize the whole store to
    /// the configured snapshot file, creating parent directories as needed
    pub async fn export_to_file(&self) -> Result<(), ContentError> {
        let path = self.filename.clone().ok_or(ContentError::Fetch(FetchError::NoFile))?;

        self.load_url().await?;

        let json = {
            let store = self.store.read().await;
            serde_json::to_vec(store.snapshot()).map_err(ContentError::SnapshotEncode)?
        };

        if let Some(dir) = path.parent()
            && !dir.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(dir).await.map_err(ContentError::SnapshotWrite)?;
        }
        tokio::fs::write(&path, json).await.map_err(ContentError::SnapshotWrite)?;
        info!(path = %path.display(), "export_to_file: snapshot written");
        Ok(())
    }
}
