//! Output path templating for localized documents.

use std::collections::BTreeMap;

use glob::{MatchOptions, Pattern};
use serde::{Deserialize, Serialize};

use super::front_matter::FieldSelection;

pub const DEFAULT_TEMPLATE: &str = "[dir]/[locale]/[filename]";

fn default_template() -> String {
    DEFAULT_TEMPLATE.to_string()
}

/// How documents matching one glob are localized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathMapping {
    #[serde(default = "default_template")]
    pub template: String,

    /// Translatable front-matter fields; front matter is copied as is when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frontmatter: Option<FieldSelection>,

    /// Target locale to the locale name used in output paths.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub locale_map: BTreeMap<String, String>,
}

impl Default for PathMapping {
    fn default() -> Self {
        Self {
            template: default_template(),
            frontmatter: None,
            locale_map: BTreeMap::new(),
        }
    }
}

impl PathMapping {
    pub fn output_locale<'a>(&'a self, locale: &'a str) -> &'a str {
        self.locale_map.get(locale).map_or(locale, String::as_str)
    }

    /// Output path of `source_path` for `locale`.
    ///
    /// A directory named after the source locale is swapped for the target
    /// locale. Otherwise the template is filled in: `[dir]`, `[filename]`,
    /// `[base]`, `[locale]` and `[localeUnder]`.
    pub fn output_path(&self, source_path: &str, source_locale: &str, locale: &str) -> String {
        let out_locale = self.output_locale(locale);
        let segments: Vec<&str> = source_path.split('/').collect();

        if let Some((_, dirs)) = segments.split_last()
            && let Some(pos) = dirs.iter().position(|s| *s == source_locale)
        {
            let mut replaced: Vec<&str> = segments.clone();
            replaced[pos] = out_locale;
            return replaced.join("/");
        }

        let (dir, filename) = match source_path.rsplit_once('/') {
            Some((dir, filename)) => (dir, filename),
            None => (".", source_path),
        };
        let base = filename
            .rsplit_once('.')
            .map_or(filename, |(base, _)| base);

        let path = self
            .template
            .replace("[dir]", dir)
            .replace("[filename]", filename)
            .replace("[base]", base)
            .replace("[localeUnder]", &out_locale.replace('-', "_"))
            .replace("[locale]", out_locale);
        normalize(&path)
    }
}

/// Drop `.` and empty segments, keeping a leading `/`.
fn normalize(path: &str) -> String {
    let absolute = path.starts_with('/');
    let joined = path
        .split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .collect::<Vec<_>>()
        .join("/");
    if absolute {
        format!("/{joined}")
    } else {
        joined
    }
}

/// The mapping for `path`: the longest matching glob wins.
pub fn select_mapping<'a>(
    mappings: &'a BTreeMap<String, PathMapping>,
    path: &str,
) -> Option<&'a PathMapping> {
    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    };
    mappings
        .iter()
        .filter(|(pattern, _)| {
            Pattern::new(pattern)
                .map(|p| p.matches_with(path, options))
                .unwrap_or(false)
        })
        .max_by_key(|(pattern, _)| pattern.len())
        .map(|(_, mapping)| mapping)
}
