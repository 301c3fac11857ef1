//! contentstore - localized content client
//!
//! CLI entry point for exporting snapshots and resolving content keys.

use clap::Parser;
use colored::*;
use eyre::{Context, Result, eyre};
use tracing_subscriber::EnvFilter;

use contentstore::cli::{Cli, Command};
use contentstore::{ContentClient, ContentConfig, ParamValue};

fn setup_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

/// Parse `name=value` CLI pairs into substitution values
fn parse_values(pairs: &[String]) -> Result<Vec<ParamValue>> {
    pairs
        .iter()
        .map(|pair| {
            pair.split_once('=')
                .map(|(name, data)| ParamValue::new(name, data))
                .ok_or_else(|| eyre!("invalid value '{}', expected name=value", pair))
        })
        .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging();

    let cli = Cli::parse();

    let mut config = ContentConfig::new(cli.url, cli.app_key, cli.app_secret);
    config.app_type = cli.app_type;
    config.locale = cli.locale;
    config.filename = cli.file;
    config.timeout_ms = cli.timeout_ms;
    config.strategy = cli.strategy.parse()?;
    config.debug = cli.debug;

    let client = ContentClient::new(config).context("Failed to build content client")?;

    match cli.command {
        Command::Export => {
            client.export_to_file().await?;
            println!("{} Snapshot exported", "✓".green());
        }
        Command::Get { key, value } => {
            let values = parse_values(&value)?;
            client.load().await?;
            let text = client.get_content(&key, &values).await;
            if text.is_empty() {
                println!("No content for key: {}", key.cyan());
            } else {
                println!("{}", text);
            }
        }
        Command::Prefix { prefix, value } => {
            let values = parse_values(&value)?;
            client.load().await?;
            let contents = client.get_contents_by_prefix(&prefix, &values).await;
            if contents.is_empty() {
                println!("No content for prefix: {}", prefix.cyan());
            } else {
                for (key, text) in contents {
                    println!("{} {}", key.yellow(), text);
                }
            }
        }
    }

    Ok(())
}
