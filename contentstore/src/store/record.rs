//! Template record types
//!
//! The record vocabulary mirrors the remote service's rows: camelCase field
//! names, opaque `id`/`created`/`suggestions` payloads passed through
//! unchanged. The snapshot file is exactly the serde_json serialization of
//! a [`SnapshotMap`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Descriptor for one placeholder a template expects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateParam {
    /// Placeholder name as it appears inside `{...}`
    pub name: String,
    /// Required parameters must be supplied at render time; a missing one
    /// is stripped from the output and logged
    #[serde(default)]
    pub required: bool,
}

impl TemplateParam {
    pub fn new(name: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            required,
        }
    }
}

/// A value supplied at render time for one placeholder
#[derive(Debug, Clone, PartialEq)]
pub struct ParamValue {
    pub name: String,
    pub data: String,
}

impl ParamValue {
    pub fn new(name: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }
}

/// One piece of localized content, unique per (app type, locale, key)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateRecord {
    /// Row identifier from the remote service, passed through unchanged
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub key: String,
    /// Lower-cased application type
    pub app_type: String,
    /// Lower-cased locale
    pub locale: String,
    /// Raw template text with zero or more `{name}` placeholders
    #[serde(default)]
    pub template: String,
    /// Placeholders the template expects, in declaration order
    #[serde(default)]
    pub params: Vec<TemplateParam>,
    /// Auxiliary payload returned alongside rendered content, never
    /// interpreted here
    #[serde(default)]
    pub suggestions: Vec<Value>,
    /// Creation timestamp from the remote service, passed through unchanged
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<Value>,
}

/// Serialized shape of the whole store: appType -> locale -> key -> record
pub type SnapshotMap = HashMap<String, HashMap<String, HashMap<String, TemplateRecord>>>;
