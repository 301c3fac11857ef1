//! In-memory hierarchical template store
//!
//! Three-level map from application type to locale to key. The refresh
//! loader is the only writer; resolvers only read. Between two commits the
//! contents are logically immutable, so readers holding the shared lock see
//! either the whole previous generation or the whole next one.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::warn;

use crate::error::ContentError;

use super::record::{ParamValue, SnapshotMap, TemplateRecord};

/// The shared template map plus its refresh stamp
#[derive(Debug, Default, Clone)]
pub struct TemplateStore {
    data: SnapshotMap,
    /// When the last successful refresh committed; not part of the snapshot
    pub loaded_at: Option<DateTime<Utc>>,
}

impl TemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bucket of records for one (app type, locale) pair
    fn bucket(&self, app_type: &str, locale: &str) -> Option<&HashMap<String, TemplateRecord>> {
        self.data.get(app_type).and_then(|locales| locales.get(locale))
    }

    /// Insert or overwrite one record, creating intermediate levels on demand
    pub fn set(&mut self, key: &str, app_type: &str, locale: &str, record: TemplateRecord) {
        self.data
            .entry(app_type.to_string())
            .or_default()
            .entry(locale.to_string())
            .or_default()
            .insert(key.to_string(), record);
    }

    /// Look up one record; absence is not an error
    pub fn get(&self, key: &str, app_type: &str, locale: &str) -> Option<&TemplateRecord> {
        self.bucket(app_type, locale).and_then(|bucket| bucket.get(key))
    }

    /// All keys in the (app type, locale) bucket that start with `prefix`.
    ///
    /// This is an anchored prefix match, not a pattern search: a key matches
    /// exactly when `key.starts_with(prefix)`.
    pub fn keys_by_prefix(&self, prefix: &str, app_type: &str, locale: &str) -> Vec<String> {
        match self.bucket(app_type, locale) {
            Some(bucket) => bucket.keys().filter(|key| key.starts_with(prefix)).cloned().collect(),
            None => Vec::new(),
        }
    }

    /// Render one template with the supplied values.
    ///
    /// Returns an empty string when the key or bucket does not exist, so
    /// callers can continue down their fallback chain. Carriage returns and
    /// line feeds are stripped from the raw text. A required parameter
    /// missing from `values` has its placeholder stripped and is logged as a
    /// warning; rendering continues. Supplied values replace every
    /// occurrence of their placeholder. A placeholder that is neither
    /// required nor supplied stays literal in the output.
    pub fn render(&self, key: &str, app_type: &str, locale: &str, values: &[ParamValue]) -> String {
        let Some(record) = self.get(key, app_type, locale) else {
            return String::new();
        };

        let mut text = record.template.replace('\r', "").replace('\n', "");

        for param in &record.params {
            if param.required && !values.iter().any(|value| value.name == param.name) {
                warn!(param = %param.name, %key, %app_type, %locale, "required template parameter missing");
                text = text.replace(&format!("{{{}}}", param.name), "");
            }
        }

        if values.is_empty() {
            return text;
        }

        for value in values {
            text = text.replace(&format!("{{{}}}", value.name), &value.data);
        }

        text
    }

    /// Render every template whose key starts with `prefix`
    pub fn render_by_prefix(
        &self,
        prefix: &str,
        app_type: &str,
        locale: &str,
        values: &[ParamValue],
    ) -> HashMap<String, String> {
        self.keys_by_prefix(prefix, app_type, locale)
            .into_iter()
            .map(|key| {
                let text = self.render(&key, app_type, locale, values);
                (key, text)
            })
            .collect()
    }

    /// Suggestions payload of one record; the record must exist
    pub fn suggestions(&self, key: &str, app_type: &str, locale: &str) -> Result<&[Value], ContentError> {
        self.get(key, app_type, locale)
            .map(|record| record.suggestions.as_slice())
            .ok_or_else(|| ContentError::NotFound {
                key: key.to_string(),
                app_type: app_type.to_string(),
                locale: locale.to_string(),
            })
    }

    /// Replace the whole map, dropping the previous generation
    pub fn replace(&mut self, data: SnapshotMap) {
        self.data = data;
    }

    /// The whole three-level map, primarily for snapshot export
    pub fn snapshot(&self) -> &SnapshotMap {
        &self.data
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
