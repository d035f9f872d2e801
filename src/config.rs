use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::core::{
    DocumentOptions, PathMapping, classify::default_localizable_attributes, select_mapping,
};

pub const CONFIG_FILE_NAME: &str = ".mdl10nrc.json";

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_source_locale")]
    pub source_locale: String,
    #[serde(default)]
    pub target_locales: Vec<String>,
    #[serde(default = "default_includes")]
    pub includes: Vec<String>,
    #[serde(default)]
    pub ignores: Vec<String>,
    #[serde(default = "default_mappings")]
    pub mappings: BTreeMap<String, PathMapping>,
    #[serde(default = "default_translations_dir")]
    pub translations_dir: String,
    #[serde(default = "default_extracted_file")]
    pub extracted_file: String,
    #[serde(default = "default_new_resources_file")]
    pub new_resources_file: String,
    /// Only write localized documents that are fully translated.
    #[serde(default)]
    pub fully_translated: bool,
    /// Locales rendered with pseudo-translations instead of the store.
    #[serde(default)]
    pub pseudo_locales: Vec<String>,
    #[serde(default = "default_localizable_attributes")]
    pub localizable_attributes: Vec<String>,
}

fn default_source_locale() -> String {
    "en-US".to_string()
}

fn default_includes() -> Vec<String> {
    vec!["**/*.md".to_string()]
}

fn default_mappings() -> BTreeMap<String, PathMapping> {
    BTreeMap::from([("**/*.md".to_string(), PathMapping::default())])
}

fn default_translations_dir() -> String {
    "./translations".to_string()
}

fn default_extracted_file() -> String {
    "./extracted.json".to_string()
}

fn default_new_resources_file() -> String {
    "./new-strings.json".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_locale: default_source_locale(),
            target_locales: Vec::new(),
            includes: default_includes(),
            ignores: Vec::new(),
            mappings: default_mappings(),
            translations_dir: default_translations_dir(),
            extracted_file: default_extracted_file(),
            new_resources_file: default_new_resources_file(),
            fully_translated: false,
            pseudo_locales: Vec::new(),
            localizable_attributes: default_localizable_attributes(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Returns an error for invalid glob patterns in `includes`, `ignores` or
    /// `mappings`, and for empty locale names.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.includes {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'includes': \"{}\"", pattern))?;
        }
        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }
        for pattern in self.mappings.keys() {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'mappings': \"{}\"", pattern))?;
        }

        if self.source_locale.trim().is_empty() {
            bail!("'sourceLocale' must not be empty");
        }
        if self
            .target_locales
            .iter()
            .chain(&self.pseudo_locales)
            .any(|l| l.trim().is_empty())
        {
            bail!("Locale names in 'targetLocales' and 'pseudoLocales' must not be empty");
        }

        Ok(())
    }

    /// Every locale documents are localized into: target locales, then
    /// pseudo locales not already listed.
    pub fn output_locales(&self) -> Vec<String> {
        let mut locales = self.target_locales.clone();
        for locale in &self.pseudo_locales {
            if !locales.contains(locale) {
                locales.push(locale.clone());
            }
        }
        locales
    }

    pub fn is_pseudo_locale(&self, locale: &str) -> bool {
        self.pseudo_locales.iter().any(|l| l == locale)
    }

    pub fn mapping_for(&self, path: &str) -> Option<&PathMapping> {
        select_mapping(&self.mappings, path)
    }

    /// Parse options for the document at `path`.
    pub fn document_options(&self, path: &str) -> DocumentOptions {
        DocumentOptions {
            source_locale: self.source_locale.clone(),
            front_matter: self
                .mapping_for(path)
                .and_then(|mapping| mapping.frontmatter.clone()),
            localizable_attributes: self.localizable_attributes.clone(),
        }
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// Directory of the config file, or the start directory when using defaults.
    pub root: PathBuf,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            let root = path
                .parent()
                .map_or_else(|| start_dir.to_path_buf(), Path::to_path_buf);
            Ok(ConfigLoadResult {
                config,
                root,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            root: start_dir.to_path_buf(),
            from_file: false,
        }),
    }
}

#[cfg(test)]
mod tests {
    use crate::config::*;
    use crate::core::FieldSelection;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.source_locale, "en-US");
        assert!(config.target_locales.is_empty());
        assert_eq!(config.includes, vec!["**/*.md"]);
        assert!(config.mappings.contains_key("**/*.md"));
        assert!(!config.fully_translated);
    }

    #[test]
    fn test_parse_config() {
        let json = r#"{
              "sourceLocale": "en-GB",
              "targetLocales": ["de-DE", "fr-FR"],
              "ignores": ["**/node_modules/**"],
              "mappings": {
                  "docs/**/*.md": {
                      "template": "docs/[locale]/[filename]",
                      "frontmatter": ["title", "description"],
                      "localeMap": { "fr-FR": "fr" }
                  }
              },
              "fullyTranslated": true
          }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.source_locale, "en-GB");
        assert_eq!(config.target_locales, vec!["de-DE", "fr-FR"]);
        assert!(config.fully_translated);

        let mapping = config.mapping_for("docs/guide/intro.md").unwrap();
        assert_eq!(mapping.template, "docs/[locale]/[filename]");
        assert_eq!(
            mapping.frontmatter,
            Some(FieldSelection::Fields(vec![
                "title".to_string(),
                "description".to_string()
            ]))
        );
        assert_eq!(mapping.output_locale("fr-FR"), "fr");
    }

    #[test]
    fn test_partial_config() {
        let json = r#"{ "targetLocales": ["ja-JP"] }"#;
        let config: Config = serde_json::from_str(json).unwrap();

        assert_eq!(config.target_locales, vec!["ja-JP"]);
        assert_eq!(config.includes, default_includes());
        assert_eq!(config.translations_dir, "./translations");
        assert_eq!(config.new_resources_file, "./new-strings.json");
    }

    #[test]
    fn test_output_locales_include_pseudo() {
        let config = Config {
            target_locales: vec!["de-DE".to_string()],
            pseudo_locales: vec!["zxx-XX".to_string(), "de-DE".to_string()],
            ..Default::default()
        };
        assert_eq!(config.output_locales(), vec!["de-DE", "zxx-XX"]);
        assert!(config.is_pseudo_locale("zxx-XX"));
    }

    #[test]
    fn test_document_options_follow_mapping() {
        let json = r#"{ "mappings": { "**/*.md": { "frontmatter": "all" } } }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(
            config.document_options("a/b.md").front_matter,
            Some(FieldSelection::All)
        );
        assert_eq!(config.document_options("a/b.txt").front_matter, None);
    }

    #[test]
    fn test_find_config_file() {
        let dir = tempdir().unwrap();
        let sub_dir = dir.path().join("docs").join("guide");
        fs::create_dir_all(&sub_dir).unwrap();

        let config_path = dir.path().join(CONFIG_FILE_NAME);
        File::create(&config_path).unwrap();

        let found = find_config_file(&sub_dir);
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_not_found() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();

        assert!(find_config_file(dir.path()).is_none());
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempdir().unwrap();
        let sub_dir = dir.path().join("docs");
        fs::create_dir(&sub_dir).unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{ "targetLocales": ["de-DE"] }"#,
        )
        .unwrap();

        let result = load_config(&sub_dir).unwrap();
        assert!(result.from_file);
        assert_eq!(result.root, dir.path());
        assert_eq!(result.config.target_locales, vec!["de-DE"]);
    }

    #[test]
    fn test_load_config_default_when_not_found() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();

        let result = load_config(dir.path()).unwrap();
        assert!(!result.from_file);
        assert_eq!(result.root, dir.path());
        assert_eq!(result.config.includes, default_includes());
    }

    #[test]
    fn test_validate_invalid_ignore_pattern() {
        let config = Config {
            ignores: vec!["[invalid".to_string()],
            ..Default::default()
        };
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("ignores"));
    }

    #[test]
    fn test_validate_invalid_mapping_pattern() {
        let config = Config {
            mappings: BTreeMap::from([("docs/[invalid".to_string(), PathMapping::default())]),
            ..Default::default()
        };
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("mappings"));
    }

    #[test]
    fn test_validate_empty_locale() {
        let config = Config {
            target_locales: vec!["".to_string()],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_config_with_invalid_pattern_fails() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{ "includes": ["[invalid"] }"#,
        )
        .unwrap();

        assert!(load_config(dir.path()).is_err());
    }

    #[test]
    fn test_default_config_json_round_trips() {
        let json = default_config_json().unwrap();
        assert!(json.contains("sourceLocale"));
        assert!(json.contains("newResourcesFile"));
        let config: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(config.source_locale, "en-US");
    }
}
