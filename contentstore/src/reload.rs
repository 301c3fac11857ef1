//! Live-reload trigger
//!
//! Bridges an external notification channel to the loader's remote-only
//! refresh path. The broker side (connection, presence, subscribing the
//! channel named after the application key) stays outside this crate; what
//! arrives here is a stream of plain messages, and only the reload literal
//! acts on the store.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::loader::RefreshLoader;

/// The one channel message that triggers a reload; everything else is
/// ignored
pub const RELOAD_MESSAGE: &str = "crud.content";

/// Outcome of one reload attempt, broadcast to observers
#[derive(Debug, Clone)]
pub enum ReloadEvent {
    Reloaded,
    Failed(String),
}

/// Task draining a notification channel into the refresh loader
///
/// Reloads run through the loader's refresh lock, so they serialize against
/// any concurrent `load()`.
pub struct ReloadListener {
    events: broadcast::Sender<ReloadEvent>,
    handle: JoinHandle<()>,
}

impl ReloadListener {
    /// Spawn a listener over `messages`; it runs until the channel closes
    pub fn spawn(loader: Arc<RefreshLoader>, mut messages: mpsc::Receiver<String>) -> Self {
        let (events, _) = broadcast::channel(16);
        let events_tx = events.clone();

        let handle = tokio::spawn(async move {
            while let Some(message) = messages.recv().await {
                if message != RELOAD_MESSAGE {
                    debug!(%message, "ignoring channel message");
                    continue;
                }
                match loader.load_url().await {
                    Ok(()) => {
                        info!("app content reloaded");
                        let _ = events_tx.send(ReloadEvent::Reloaded);
                    }
                    Err(error) => {
                        warn!(%error, "app content not reloaded");
                        let _ = events_tx.send(ReloadEvent::Failed(error.to_string()));
                    }
                }
            }
            debug!("reload channel closed");
        });

        Self { events, handle }
    }

    /// Subscribe to reload outcomes; events before subscription are lost
    pub fn subscribe(&self) -> broadcast::Receiver<ReloadEvent> {
        self.events.subscribe()
    }

    /// Stop listening; an in-flight reload is abandoned
    pub fn abort(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}
