//! Public client facade
//!
//! Ties the template store, refresh loader, and resolver together behind
//! the surface applications consume: construct once with validated config,
//! `load()` to populate, then resolve keys for the configured application
//! type and locale.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::{RwLock, mpsc};

use crate::config::ContentConfig;
use crate::error::ContentError;
use crate::fetch::{RemoteSource, SnapshotSource};
use crate::loader::{LoadOutcome, RefreshLoader, SharedStore};
use crate::reload::ReloadListener;
use crate::resolver::Resolver;
use crate::store::{ParamValue, SnapshotMap, TemplateStore};

/// Localized content client
///
/// Each client owns exactly one template store; nothing is shared through
/// process-wide state. The loader is the store's only writer and the
/// resolver its only reader.
pub struct ContentClient {
    app_type: String,
    locale: String,
    app_key: String,
    store: SharedStore,
    loader: Arc<RefreshLoader>,
    resolver: Resolver,
}

impl ContentClient {
    /// Build a client over the production sources. Fails fast on missing
    /// required config.
    pub fn new(config: ContentConfig) -> Result<Self, ContentError> {
        config.validate()?;
        let store: SharedStore = Arc::new(RwLock::new(TemplateStore::new()));
        let loader = Arc::new(RefreshLoader::new(&config, Arc::clone(&store))?);
        Ok(Self::assemble(config, store, loader))
    }

    /// Build a client over injected sources
    pub fn with_sources(
        config: ContentConfig,
        remote: Arc<dyn RemoteSource>,
        snapshot: Arc<dyn SnapshotSource>,
    ) -> Result<Self, ContentError> {
        config.validate()?;
        let store: SharedStore = Arc::new(RwLock::new(TemplateStore::new()));
        let loader = Arc::new(RefreshLoader::with_sources(&config, Arc::clone(&store), remote, snapshot));
        Ok(Self::assemble(config, store, loader))
    }

    fn assemble(config: ContentConfig, store: SharedStore, loader: Arc<RefreshLoader>) -> Self {
        Self {
            app_type: config.app_type.to_lowercase(),
            locale: config.locale.to_lowercase(),
            app_key: config.app_key,
            resolver: Resolver::new(Arc::clone(&store)),
            store,
            loader,
        }
    }

    /// Race the enabled sources and commit the winner
    pub async fn load(&self) -> Result<LoadOutcome, ContentError> {
        self.loader.load().await
    }

    /// Remote-only refresh (merge)
    pub async fn load_url(&self) -> Result<(), ContentError> {
        self.loader.load_url().await
    }

    /// File-only refresh (wholesale replace)
    pub async fn load_file(&self) -> Result<(), ContentError> {
        self.loader.load_file().await
    }

    /// Resolve and render one key through the fallback chain. Empty when no
    /// chain step has renderable content.
    pub async fn get_content(&self, key: &str, values: &[ParamValue]) -> String {
        self.resolver.content(key, &self.app_type, &self.locale, values).await
    }

    /// Resolve every key with the given prefix through the fallback chain
    pub async fn get_contents_by_prefix(&self, prefix: &str, values: &[ParamValue]) -> HashMap<String, String> {
        self.resolver
            .contents_by_prefix(prefix, &self.app_type, &self.locale, values)
            .await
    }

    /// Suggestions payload for the configured (app type, locale) pair only
    pub async fn get_suggestions(&self, key: &str) -> Result<Vec<Value>, ContentError> {
        self.resolver.suggestions(key, &self.app_type, &self.locale).await
    }

    pub fn set_app_type(&mut self, app_type: &str) {
        self.app_type = app_type.to_lowercase();
    }

    pub fn set_locale(&mut self, locale: &str) {
        self.locale = locale.to_lowercase();
    }

    /// Change the load deadline (and remote request timeout)
    pub fn set_timeout(&self, timeout_ms: u64) {
        self.loader.set_timeout(timeout_ms);
    }

    /// Refresh from the remote service and write the snapshot file
    pub async fn export_to_file(&self) -> Result<(), ContentError> {
        self.loader.export_to_file().await
    }

    /// Clone of the whole three-level map
    pub async fn get_all(&self) -> SnapshotMap {
        self.store.read().await.snapshot().clone()
    }

    /// Spawn the live-reload listener over an external message channel
    pub fn listen(&self, messages: mpsc::Receiver<String>) -> ReloadListener {
        ReloadListener::spawn(Arc::clone(&self.loader), messages)
    }

    /// Name of the live-reload channel this application should subscribe
    pub fn channel(&self) -> &str {
        &self.app_key
    }

    pub fn app_type(&self) -> &str {
        &self.app_type
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// When the last successful refresh committed
    pub async fn last_loaded(&self) -> Option<DateTime<Utc>> {
        self.store.read().await.loaded_at
    }
}
