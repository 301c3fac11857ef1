//! Hierarchical content resolver
//!
//! Looks a key up through a fixed fallback chain across application type
//! and locale: the configured pair first, then the general namespace, then
//! both again under the base language of a `lang-REGION` locale. The first
//! non-empty result wins.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::config::app_types;
use crate::error::ContentError;
use crate::loader::SharedStore;
use crate::store::ParamValue;

/// Matches `lang-REGION` locales; capture 1 is the language half
fn locale_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(\w+)-(\w+)$").expect("static locale pattern"))
}

/// Lower-cased base language of a `lang-REGION` locale (`en-gb` -> `en`).
///
/// Locales with any other shape, including bare languages (`en`) and
/// multi-segment tags (`zh-hans-cn`), do not split and return None.
pub fn base_lang(locale: &str) -> Option<String> {
    locale_pattern()
        .captures(locale)
        .map(|captures| captures[1].to_lowercase())
}

/// The (app type, locale) pairs to try for one lookup, in priority order.
///
/// The general namespace is skipped when the configured type already is
/// general; the base-language steps are skipped when the locale does not
/// split into language and region.
pub fn fallback_chain(app_type: &str, locale: &str) -> Vec<(String, String)> {
    let mut steps = vec![(app_type.to_string(), locale.to_string())];
    if app_type != app_types::GENERAL {
        steps.push((app_types::GENERAL.to_string(), locale.to_string()));
    }
    match base_lang(locale) {
        Some(lang) => {
            steps.push((app_type.to_string(), lang.clone()));
            if app_type != app_types::GENERAL {
                steps.push((app_types::GENERAL.to_string(), lang));
            }
        }
        None => debug!(%locale, "locale has no region suffix, skipping base-language fallbacks"),
    }
    steps
}

/// Read side of the template store
pub struct Resolver {
    store: SharedStore,
}

impl Resolver {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Render the first chain entry that yields non-empty text.
    ///
    /// The whole chain runs under one read guard, so a concurrent refresh
    /// cannot swap generations between two fallback steps.
    pub async fn content(&self, key: &str, app_type: &str, locale: &str, values: &[ParamValue]) -> String {
        let store = self.store.read().await;
        for (step_type, step_locale) in fallback_chain(app_type, locale) {
            let text = store.render(key, &step_type, &step_locale, values);
            if !text.is_empty() {
                return text;
            }
        }
        String::new()
    }

    /// Rendered contents of the first chain entry with any matching keys
    pub async fn contents_by_prefix(
        &self,
        prefix: &str,
        app_type: &str,
        locale: &str,
        values: &[ParamValue],
    ) -> HashMap<String, String> {
        let store = self.store.read().await;
        for (step_type, step_locale) in fallback_chain(app_type, locale) {
            let contents = store.render_by_prefix(prefix, &step_type, &step_locale, values);
            if !contents.is_empty() {
                return contents;
            }
        }
        HashMap::new()
    }

    /// Suggestions for the configured pair only; no fallback chain runs
    pub async fn suggestions(&self, key: &str, app_type: &str, locale: &str) -> Result<Vec<Value>, ContentError> {
        let store = self.store.read().await;
        store
            .suggestions(key, app_type, locale)
            .map(|suggestions| suggestions.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{TemplateRecord, TemplateStore};
    use std::sync::Arc;
    use tokio::sync::RwLock;

    fn record(key: &str, app_type: &str, locale: &str, template: &str) -> TemplateRecord {
        TemplateRecord {
            id: None,
            key: key.to_string(),
            app_type: app_type.to_string(),
            locale: locale.to_string(),
            template: template.to_string(),
            params: vec![],
            suggestions: vec![],
            created: None,
        }
    }

    fn resolver_with(records: &[(&str, &str, &str, &str)]) -> Resolver {
        let mut store = TemplateStore::new();
        for (key, app_type, locale, template) in records {
            store.set(key, app_type, locale, record(key, app_type, locale, template));
        }
        Resolver::new(Arc::new(RwLock::new(store)))
    }

    #[test]
    fn test_base_lang() {
        assert_eq!(base_lang("en-gb"), Some("en".to_string()));
        assert_eq!(base_lang("EN-GB"), Some("en".to_string()));
        assert_eq!(base_lang("en"), None);
        assert_eq!(base_lang("zh-hans-cn"), None);
        assert_eq!(base_lang(""), None);
    }

    #[test]
    fn test_chain_full() {
        let chain = fallback_chain("alexa", "en-gb");
        assert_eq!(
            chain,
            vec![
                ("alexa".to_string(), "en-gb".to_string()),
                ("general".to_string(), "en-gb".to_string()),
                ("alexa".to_string(), "en".to_string()),
                ("general".to_string(), "en".to_string()),
            ]
        );
    }

    #[test]
    fn test_chain_skips_general_steps_for_general_type() {
        let chain = fallback_chain("general", "en-gb");
        assert_eq!(
            chain,
            vec![
                ("general".to_string(), "en-gb".to_string()),
                ("general".to_string(), "en".to_string()),
            ]
        );
    }

    #[test]
    fn test_chain_stops_after_locale_steps_for_plain_locale() {
        let chain = fallback_chain("alexa", "en");
        assert_eq!(
            chain,
            vec![
                ("alexa".to_string(), "en".to_string()),
                ("general".to_string(), "en".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_configured_pair_wins() {
        let resolver = resolver_with(&[
            ("greet", "alexa", "en-gb", "alexa en-gb"),
            ("greet", "general", "en-gb", "general en-gb"),
            ("greet", "general", "en", "general en"),
        ]);
        assert_eq!(resolver.content("greet", "alexa", "en-gb", &[]).await, "alexa en-gb");
    }

    #[tokio::test]
    async fn test_falls_back_to_general_locale() {
        let resolver = resolver_with(&[("greet", "general", "en-gb", "general en-gb")]);
        assert_eq!(resolver.content("greet", "alexa", "en-gb", &[]).await, "general en-gb");
    }

    #[tokio::test]
    async fn test_falls_back_to_type_base_lang() {
        let resolver = resolver_with(&[("greet", "alexa", "en", "alexa en")]);
        assert_eq!(resolver.content("greet", "alexa", "en-gb", &[]).await, "alexa en");
    }

    #[tokio::test]
    async fn test_falls_back_to_general_base_lang() {
        // content only at the last chain position
        let resolver = resolver_with(&[("greet", "general", "en", "general en")]);
        assert_eq!(resolver.content("greet", "alexa", "en-gb", &[]).await, "general en");
    }

    #[tokio::test]
    async fn test_plain_locale_never_reaches_base_lang_steps() {
        // would be found by a bogus base-language split of "en"
        let resolver = resolver_with(&[("greet", "general", "e", "never")]);
        assert_eq!(resolver.content("greet", "alexa", "en", &[]).await, "");
    }

    #[tokio::test]
    async fn test_missing_everywhere_is_empty() {
        let resolver = resolver_with(&[]);
        assert_eq!(resolver.content("greet", "alexa", "en-gb", &[]).await, "");
    }

    #[tokio::test]
    async fn test_contents_by_prefix_returns_first_nonempty_step() {
        let resolver = resolver_with(&[
            ("greet.hi", "general", "en", "general hi"),
            ("greet.bye", "general", "en", "general bye"),
            ("greet.hi", "alexa", "en-gb", "alexa hi"),
        ]);

        let contents = resolver.contents_by_prefix("greet.", "alexa", "en-gb", &[]).await;
        // the configured pair has matches, so the general bucket is not consulted
        assert_eq!(contents.len(), 1);
        assert_eq!(contents["greet.hi"], "alexa hi");

        let contents = resolver.contents_by_prefix("greet.", "google", "en-gb", &[]).await;
        assert_eq!(contents.len(), 2);
        assert_eq!(contents["greet.bye"], "general bye");
    }

    #[tokio::test]
    async fn test_suggestions_ignore_fallback_chain() {
        let mut store = TemplateStore::new();
        let mut general = record("greet", "general", "en", "Hi");
        general.suggestions = vec![serde_json::json!("Yes")];
        store.set("greet", "general", "en", general);
        let resolver = Resolver::new(Arc::new(RwLock::new(store)));

        // present under (general, en) but the configured pair is (alexa, en)
        let err = resolver.suggestions("greet", "alexa", "en").await.unwrap_err();
        assert!(matches!(err, ContentError::NotFound { .. }));

        let found = resolver.suggestions("greet", "general", "en").await.unwrap();
        assert_eq!(found, vec![serde_json::json!("Yes")]);
    }
}
