//! CLI argument parsing for contentstore

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "contentstore")]
#[command(author, version, about = "Localized content store client", long_about = None)]
pub struct Cli {
    /// Base URL of the remote content service
    #[arg(long)]
    pub url: String,

    /// Application key (also the live-reload channel name)
    #[arg(long)]
    pub app_key: String,

    /// Application secret
    #[arg(long)]
    pub app_secret: String,

    /// Application type for resolution
    #[arg(long, default_value = "general")]
    pub app_type: String,

    /// Locale for resolution (e.g. en, en-gb)
    #[arg(long, default_value = "en")]
    pub locale: String,

    /// Path of the local snapshot file
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Load deadline in milliseconds
    #[arg(long, default_value = "300")]
    pub timeout_ms: u64,

    /// Source strategy: all, file, or url
    #[arg(long, default_value = "all")]
    pub strategy: String,

    /// Emit fetch timing logs
    #[arg(short, long)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Refresh from the remote service and write the snapshot file
    Export,

    /// Load content and render one key
    Get {
        /// Content key to resolve
        #[arg(required = true)]
        key: String,

        /// Substitution values as name=value pairs
        #[arg(short, long)]
        value: Vec<String>,
    },

    /// Load content and render every key matching a prefix
    Prefix {
        /// Key prefix to match
        #[arg(required = true)]
        prefix: String,

        /// Substitution values as name=value pairs
        #[arg(short, long)]
        value: Vec<String>,
    },
}
