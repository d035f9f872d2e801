//! Translation units and the resource sets they are collected into.

use std::{collections::BTreeMap, sync::Mutex};

use serde::{Deserialize, Serialize};

use super::extract::PlaceholderSpan;

pub const MARKDOWN_DATATYPE: &str = "markdown";
pub const FRONT_MATTER_DATATYPE: &str = "x-yaml";

/// One translatable string extracted from a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationUnit {
    pub key: String,
    /// Source text with placeholder markers (`<c0>`, `</c0>`, `<c1/>`).
    pub source: String,
    pub comment: Option<String>,
    pub locale: String,
    pub datatype: String,
    pub context: Option<String>,
    /// Markup behind each placeholder, indexed by placeholder number.
    pub spans: Vec<PlaceholderSpan>,
    /// Container prefix re-inserted after each newline of the output.
    pub line_prefix: String,
}

impl TranslationUnit {
    pub fn new(source: impl Into<String>, locale: impl Into<String>) -> Self {
        let source = source.into();
        Self {
            key: super::key::make_key(&source),
            source,
            comment: None,
            locale: locale.into(),
            datatype: MARKDOWN_DATATYPE.to_string(),
            context: None,
            spans: Vec::new(),
            line_prefix: String::new(),
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn with_comment(mut self, comment: Option<String>) -> Self {
        self.comment = comment;
        self
    }

    pub fn with_datatype(mut self, datatype: &str) -> Self {
        self.datatype = datatype.to_string();
        self
    }

    pub fn with_context(mut self, context: Option<String>) -> Self {
        self.context = context;
        self
    }

    pub fn to_resource(&self, path: &str) -> Resource {
        Resource {
            key: self.key.clone(),
            source: self.source.clone(),
            target: None,
            source_locale: self.locale.clone(),
            target_locale: None,
            comment: self.comment.clone(),
            datatype: self.datatype.clone(),
            context: self.context.clone(),
            path: path.to_string(),
        }
    }
}

/// A string as written to `extracted.json` or `new-strings.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub key: String,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    pub source_locale: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_locale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub datatype: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    pub path: String,
}

impl Resource {
    fn locale_key(&self) -> (String, String) {
        let locale = self
            .target_locale
            .clone()
            .unwrap_or_else(|| self.source_locale.clone());
        (self.key.clone(), locale)
    }
}

/// Append-only set of resources, keyed by (key, locale).
///
/// Shared between worker threads; the first insertion of a key wins.
#[derive(Debug, Default)]
pub struct ResourceSet {
    inner: Mutex<BTreeMap<(String, String), Resource>>,
}

impl ResourceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `resource` unless its (key, locale) is already present.
    /// Returns `true` if the resource was added.
    pub fn insert(&self, resource: Resource) -> bool {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let slot = resource.locale_key();
        if inner.contains_key(&slot) {
            return false;
        }
        inner.insert(slot, resource);
        true
    }

    pub fn contains(&self, key: &str, locale: &str) -> bool {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.contains_key(&(key.to_string(), locale.to_string()))
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the resources, ordered by key then locale.
    pub fn to_vec(&self) -> Vec<Resource> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.values().cloned().collect()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn new_resource(key: &str, locale: &str) -> Resource {
        let mut resource = TranslationUnit::new("Hello", "en-US")
            .with_key(key)
            .to_resource("docs/a.md");
        resource.target_locale = Some(locale.to_string());
        resource
    }

    #[test]
    fn test_unit_key_from_source() {
        let unit = TranslationUnit::new("This is a test", "en-US");
        assert_eq!(unit.key, "r654479252");
        assert_eq!(unit.datatype, MARKDOWN_DATATYPE);
    }

    #[test]
    fn test_set_is_append_once() {
        let set = ResourceSet::new();
        assert!(set.insert(new_resource("r1", "de-DE")));
        assert!(!set.insert(new_resource("r1", "de-DE")));
        assert!(set.insert(new_resource("r1", "fr-FR")));
        assert_eq!(set.len(), 2);
        assert!(set.contains("r1", "fr-FR"));
    }

    #[test]
    fn test_set_ordering() {
        let set = ResourceSet::new();
        set.insert(new_resource("r2", "de-DE"));
        set.insert(new_resource("r1", "fr-FR"));
        set.insert(new_resource("r1", "de-DE"));
        let keys: Vec<(String, Option<String>)> = set
            .to_vec()
            .into_iter()
            .map(|r| (r.key, r.target_locale))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("r1".to_string(), Some("de-DE".to_string())),
                ("r1".to_string(), Some("fr-FR".to_string())),
                ("r2".to_string(), Some("de-DE".to_string())),
            ]
        );
    }

    #[test]
    fn test_resource_json_shape() {
        let resource = TranslationUnit::new("Hello", "en-US")
            .with_comment(Some("greeting".to_string()))
            .to_resource("docs/a.md");
        let json = serde_json::to_value(&resource).unwrap();
        assert_eq!(json["key"], "r548414328");
        assert_eq!(json["sourceLocale"], "en-US");
        assert_eq!(json["comment"], "greeting");
        assert!(json.get("target").is_none());
    }
}
