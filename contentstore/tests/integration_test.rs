//! Integration tests for contentstore
//!
//! End-to-end flows over injected sources: load, resolve through the
//! fallback chain, export a snapshot, reload it from disk, and drive the
//! live-reload channel.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;

use contentstore::{
    ContentClient, ContentConfig, ContentRow, FetchError, LoadOutcome, ParamValue, RELOAD_MESSAGE, ReloadEvent,
    RemoteSource, RowData, SnapshotSource, Strategy, TemplateParam,
};

// =============================================================================
// Stub sources
// =============================================================================

struct StaticRemote {
    rows: Vec<ContentRow>,
}

#[async_trait]
impl RemoteSource for StaticRemote {
    async fn fetch_rows(&self, _timeout: Duration) -> Result<Vec<ContentRow>, FetchError> {
        if self.rows.is_empty() {
            return Err(FetchError::NoRows);
        }
        Ok(self.rows.clone())
    }
}

struct NoSnapshot;

#[async_trait]
impl SnapshotSource for NoSnapshot {
    async fn fetch_bytes(&self) -> Result<Vec<u8>, FetchError> {
        Err(FetchError::NoFile)
    }
}

fn greet_row() -> ContentRow {
    ContentRow {
        id: None,
        key: "greet".to_string(),
        app_type: "GENERAL".to_string(),
        lang: "en".to_string(),
        template: "Hi {name}".to_string(),
        data: RowData {
            params: vec![TemplateParam::new("name", true)],
            suggestions: vec![serde_json::json!("Hello"), serde_json::json!("Hey")],
        },
        created: None,
    }
}

fn client_with_rows(config: ContentConfig, rows: Vec<ContentRow>) -> ContentClient {
    ContentClient::with_sources(config, Arc::new(StaticRemote { rows }), Arc::new(NoSnapshot)).unwrap()
}

// =============================================================================
// Load and resolve
// =============================================================================

#[tokio::test]
async fn test_load_then_render_with_values() {
    let config = ContentConfig::new("http://localhost", "key", "secret");
    let client = client_with_rows(config, vec![greet_row()]);

    let outcome = client.load().await.unwrap();
    assert_eq!(outcome, LoadOutcome::Url);

    let text = client.get_content("greet", &[ParamValue::new("name", "Ana")]).await;
    assert_eq!(text, "Hi Ana");

    // required parameter not supplied: placeholder stripped, render continues
    let text = client.get_content("greet", &[]).await;
    assert_eq!(text, "Hi ");

    assert!(client.last_loaded().await.is_some());
}

#[tokio::test]
async fn test_fallback_chain_across_type_and_locale() {
    // content only exists at (general, en); the client asks as (alexa, en-gb)
    let config = ContentConfig::new("http://localhost", "key", "secret")
        .with_app_type("alexa")
        .with_locale("en-gb");
    let client = client_with_rows(config, vec![greet_row()]);
    client.load().await.unwrap();

    let text = client.get_content("greet", &[ParamValue::new("name", "Ana")]).await;
    assert_eq!(text, "Hi Ana");
}

#[tokio::test]
async fn test_suggestions_only_for_configured_pair() {
    let config = ContentConfig::new("http://localhost", "key", "secret");
    let client = client_with_rows(config, vec![greet_row()]);
    client.load().await.unwrap();

    let suggestions = client.get_suggestions("greet").await.unwrap();
    assert_eq!(suggestions.len(), 2);

    // the fallback chain does not run for suggestions
    let mut client = client;
    client.set_app_type("alexa");
    assert!(client.get_suggestions("greet").await.is_err());
}

#[tokio::test]
async fn test_contents_by_prefix() {
    let mut bye = greet_row();
    bye.key = "greet.bye".to_string();
    bye.template = "Bye {name}".to_string();
    let mut hi = greet_row();
    hi.key = "greet.hi".to_string();

    let config = ContentConfig::new("http://localhost", "key", "secret");
    let client = client_with_rows(config, vec![hi, bye]);
    client.load().await.unwrap();

    let contents = client
        .get_contents_by_prefix("greet.", &[ParamValue::new("name", "Ana")])
        .await;
    assert_eq!(contents.len(), 2);
    assert_eq!(contents["greet.hi"], "Hi Ana");
    assert_eq!(contents["greet.bye"], "Bye Ana");
}

// =============================================================================
// Export and file round trip
// =============================================================================

#[tokio::test]
async fn test_export_then_load_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("content").join("snapshot.json");

    // first client exports a url-sourced snapshot
    let config = ContentConfig::new("http://localhost", "key", "secret").with_filename(path.clone());
    let exporter = client_with_rows(config, vec![greet_row()]);
    exporter.export_to_file().await.unwrap();
    assert!(path.exists());

    // second client loads it with the file strategy over the real file source
    let config = ContentConfig::new("http://localhost", "key", "secret")
        .with_filename(path)
        .with_strategy(Strategy::File);
    let reader = ContentClient::new(config).unwrap();

    let outcome = reader.load().await.unwrap();
    assert_eq!(outcome, LoadOutcome::File);

    let text = reader.get_content("greet", &[ParamValue::new("name", "Ana")]).await;
    assert_eq!(text, "Hi Ana");

    let all = reader.get_all().await;
    assert!(all["general"]["en"].contains_key("greet"));
}

#[tokio::test]
async fn test_file_strategy_with_missing_file_fails_loudly() {
    let dir = TempDir::new().unwrap();
    let config = ContentConfig::new("http://localhost", "key", "secret")
        .with_filename(dir.path().join("absent.json"))
        .with_strategy(Strategy::File);
    let client = ContentClient::new(config).unwrap();

    let err = client.load().await.unwrap_err();
    assert!(err.is_load_failure());
    assert!(client.get_all().await.is_empty());
}

// =============================================================================
// Live reload
// =============================================================================

#[tokio::test]
async fn test_reload_channel_populates_store_without_explicit_load() {
    let config = ContentConfig::new("http://localhost", "my-app", "secret");
    let client = client_with_rows(config, vec![greet_row()]);
    assert_eq!(client.channel(), "my-app");

    let (tx, rx) = tokio::sync::mpsc::channel(4);
    let listener = client.listen(rx);
    let mut events = listener.subscribe();

    tx.send("presence.join".to_string()).await.unwrap();
    tx.send(RELOAD_MESSAGE.to_string()).await.unwrap();

    let event = events.recv().await.unwrap();
    assert!(matches!(event, ReloadEvent::Reloaded));

    let text = client.get_content("greet", &[ParamValue::new("name", "Ana")]).await;
    assert_eq!(text, "Hi Ana");

    listener.abort();
}
