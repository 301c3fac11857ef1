//! ContentStore - localized content resolution with multi-source refresh
//!
//! Resolves localized, parameterized text content by key, application type,
//! and locale. The backing data refreshes from either of two independent
//! sources (a remote content service or a local snapshot file) raced under
//! a deadline, and an out-of-band channel message can trigger a remote-only
//! reload at any time.
//!
//! # Core Concepts
//!
//! - **One winner per load**: the enabled sources run concurrently and a
//!   single decision point commits exactly one of them (url beats file)
//! - **Atomic commits**: readers see either the whole previous generation
//!   of content or the whole next one, never a torn mix
//! - **Fallback resolution**: lookups walk (type, locale) -> (general,
//!   locale) -> (type, language) -> (general, language) and return the
//!   first renderable result
//! - **Forgiving rendering**: a missing required parameter strips its
//!   placeholder and logs a warning instead of failing the render
//!
//! # Modules
//!
//! - [`store`] - hierarchical template map and rendering
//! - [`fetch`] - remote service and snapshot file sources
//! - [`loader`] - the multi-source refresh race
//! - [`resolver`] - fallback-chain lookups
//! - [`reload`] - live-reload channel listener
//! - [`client`] - the public facade
//! - [`config`] / [`error`] - construction parameters and error taxonomy

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod fetch;
pub mod loader;
pub mod reload;
pub mod resolver;
pub mod store;

pub use client::ContentClient;
pub use config::{ContentConfig, DEFAULT_LOCALE, DEFAULT_TIMEOUT_MS, Strategy, app_types};
pub use error::{ContentError, FetchError};
pub use fetch::{ContentRow, FileSnapshotSource, HttpRemoteSource, RemoteSource, RowData, SnapshotSource, SourceStatus};
pub use loader::{LoadOutcome, RefreshLoader, SharedStore};
pub use reload::{RELOAD_MESSAGE, ReloadEvent, ReloadListener};
pub use resolver::{Resolver, base_lang, fallback_chain};
pub use store::{ParamValue, SnapshotMap, TemplateParam, TemplateRecord, TemplateStore};
