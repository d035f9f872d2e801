//! Translation lookup and pseudo-localization.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

/// Source of translations, queried by (key, locale).
pub trait TranslationStore: Sync {
    fn get(&self, key: &str, locale: &str) -> Option<String>;
}

/// Produces a machine-generated stand-in for a translation.
pub trait PseudoLocalizer: Sync {
    fn pseudo(&self, source: &str) -> String;
}

/// Translations loaded from `<dir>/<locale>.json`, one flat `key -> text`
/// object per locale.
#[derive(Debug, Default, Clone)]
pub struct TranslationSet {
    locales: HashMap<String, HashMap<String, String>>,
}

impl TranslationSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, locale: &str, key: &str, text: &str) {
        self.locales
            .entry(locale.to_string())
            .or_default()
            .insert(key.to_string(), text.to_string());
    }

    pub fn with(mut self, locale: &str, key: &str, text: &str) -> Self {
        self.insert(locale, key, text);
        self
    }

    /// Number of translations for `locale`.
    pub fn count(&self, locale: &str) -> usize {
        self.locales.get(locale).map_or(0, HashMap::len)
    }

    /// Load translation files for `locales` from `dir`. A missing file means
    /// no translations for that locale.
    pub fn load_dir(dir: &Path, locales: &[String]) -> Result<Self> {
        let mut set = Self::new();
        for locale in locales {
            let path = translation_file(dir, locale);
            if !path.exists() {
                tracing::debug!(path = %path.display(), "no translation file");
                continue;
            }
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read translations: {}", path.display()))?;
            let entries: HashMap<String, String> = serde_json::from_str(&content)
                .with_context(|| format!("Invalid translation file: {}", path.display()))?;
            tracing::debug!(locale = %locale, count = entries.len(), "loaded translations");
            set.locales.entry(locale.clone()).or_default().extend(entries);
        }
        Ok(set)
    }
}

impl TranslationStore for TranslationSet {
    fn get(&self, key: &str, locale: &str) -> Option<String> {
        self.locales.get(locale)?.get(key).cloned()
    }
}

pub fn translation_file(dir: &Path, locale: &str) -> PathBuf {
    dir.join(format!("{locale}.json"))
}

/// Replaces letters with accented look-alikes and brackets the result.
/// Markup and placeholders (anything between `<` and `>`) are kept as is.
#[derive(Debug, Default, Clone, Copy)]
pub struct AccentPseudo;

const ACCENTS: &[(char, char)] = &[
    ('a', 'à'),
    ('c', 'ç'),
    ('e', 'è'),
    ('i', 'ì'),
    ('n', 'ñ'),
    ('o', 'ò'),
    ('u', 'ù'),
    ('y', 'ÿ'),
    ('A', 'À'),
    ('C', 'Ç'),
    ('E', 'È'),
    ('I', 'Ì'),
    ('N', 'Ñ'),
    ('O', 'Ò'),
    ('U', 'Ù'),
];

impl PseudoLocalizer for AccentPseudo {
    fn pseudo(&self, source: &str) -> String {
        let mut out = String::with_capacity(source.len() + 8);
        let mut in_tag = false;
        out.push('[');
        for c in source.chars() {
            match c {
                '<' => in_tag = true,
                '>' => in_tag = false,
                _ => {}
            }
            let mapped = if in_tag {
                c
            } else {
                ACCENTS
                    .iter()
                    .find(|(plain, _)| *plain == c)
                    .map_or(c, |(_, accented)| *accented)
            };
            out.push(mapped);
        }
        out.push(']');
        out
    }
}
