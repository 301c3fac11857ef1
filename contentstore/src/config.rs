//! Content client configuration
//!
//! Construction parameters for the content client: remote service location
//! and credentials, the resolver's default application type and locale, and
//! the refresh loader's source strategy and deadline. Validation happens
//! once, at client construction, and fails fast.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ContentError;

/// Well-known application types.
///
/// The store accepts arbitrary lower-cased type names; these are the ones
/// the content service ships with. `GENERAL` is the shared namespace every
/// other type falls back to.
pub mod app_types {
    pub const GENERAL: &str = "general";
    pub const ALEXA: &str = "alexa";
    pub const GOOGLE: &str = "google";
    pub const CUSTOM: &str = "custom";
}

/// Default load deadline in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 300;

/// Default locale
pub const DEFAULT_LOCALE: &str = "en";

/// Which sources participate in a load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Race the remote service and the snapshot file
    #[default]
    All,
    /// Snapshot file only
    File,
    /// Remote service only
    Url,
}

impl Strategy {
    /// Whether the remote service participates in a load
    pub fn allows_url(&self) -> bool {
        matches!(self, Strategy::All | Strategy::Url)
    }

    /// Whether the snapshot file participates in a load
    pub fn allows_file(&self) -> bool {
        matches!(self, Strategy::All | Strategy::File)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::All => "all",
            Strategy::File => "file",
            Strategy::Url => "url",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Strategy::All),
            "file" => Ok(Strategy::File),
            "url" => Ok(Strategy::Url),
            other => Err(ContentError::InvalidStrategy(other.to_string())),
        }
    }
}

/// Construction parameters for the content client
///
/// `url`, `app_key`, and `app_secret` are required; everything else has a
/// default.
#[derive(Debug, Clone)]
pub struct ContentConfig {
    /// Base URL of the remote content service
    pub url: String,
    /// Application identifier, also the name of the live-reload channel
    pub app_key: String,
    /// Application credential sent with every remote fetch
    pub app_secret: String,
    /// Application type used by the resolver
    pub app_type: String,
    /// Locale used by the resolver
    pub locale: String,
    /// Path of the local snapshot file, if any
    pub filename: Option<PathBuf>,
    /// Load deadline in milliseconds; also the remote request timeout
    pub timeout_ms: u64,
    /// Which sources participate in `load()`
    pub strategy: Strategy,
    /// Emit fetch timing logs
    pub debug: bool,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            app_key: String::new(),
            app_secret: String::new(),
            app_type: app_types::GENERAL.to_string(),
            locale: DEFAULT_LOCALE.to_string(),
            filename: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            strategy: Strategy::All,
            debug: false,
        }
    }
}

impl ContentConfig {
    /// Create a config with the three required parameters and defaults for
    /// the rest
    pub fn new(url: impl Into<String>, app_key: impl Into<String>, app_secret: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            app_key: app_key.into(),
            app_secret: app_secret.into(),
            ..Self::default()
        }
    }

    pub fn with_app_type(mut self, app_type: impl Into<String>) -> Self {
        self.app_type = app_type.into();
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    pub fn with_filename(mut self, filename: impl Into<PathBuf>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Validate before use; fails fast with the first missing parameter
    pub fn validate(&self) -> Result<(), ContentError> {
        if self.url.is_empty() {
            return Err(ContentError::MissingConfig("url"));
        }
        if self.app_key.is_empty() {
            return Err(ContentError::MissingConfig("app_key"));
        }
        if self.app_secret.is_empty() {
            return Err(ContentError::MissingConfig("app_secret"));
        }
        Ok(())
    }
}
