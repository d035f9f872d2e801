use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use colored::Colorize;
use rayon::prelude::*;

use super::super::{
    args::CommonArgs,
    scan::{ScanResult, scan_documents},
};
use crate::{
    config::{Config, ConfigLoadResult, load_config},
    core::{MarkdownDocument, PathMapping, ResourceSet},
    utils::to_slash,
};

/// Project state shared by the commands: the loaded config with command-line
/// overrides applied, and where things live on disk.
pub struct Workspace {
    pub config: Config,
    pub root: PathBuf,
    pub translations_dir: PathBuf,
    pub from_file: bool,
    pub verbose: bool,
}

/// A document that could not be read.
#[derive(Debug, Clone)]
pub struct ReadWarning {
    pub file_path: String,
    pub error: String,
}

impl Workspace {
    pub fn load(common: &CommonArgs) -> Result<Self> {
        let start = match &common.root {
            Some(root) => root.clone(),
            None => std::env::current_dir().context("Failed to get current directory")?,
        };
        let ConfigLoadResult {
            mut config,
            root,
            from_file,
        } = load_config(&start)?;

        if let Some(locale) = &common.source_locale {
            config.source_locale = locale.clone();
        }
        config.validate()?;

        let translations_dir = match &common.translations_dir {
            Some(dir) => dir.clone(),
            None => resolve(&root, &config.translations_dir),
        };

        tracing::debug!(
            root = %root.display(),
            from_file,
            source_locale = %config.source_locale,
            "loaded workspace"
        );

        Ok(Self {
            config,
            root,
            translations_dir,
            from_file,
            verbose: common.verbose,
        })
    }

    /// Resolve a config-relative path against the project root.
    pub fn resolve(&self, path: &str) -> PathBuf {
        resolve(&self.root, path)
    }

    /// Find the source documents. Directories named after an output locale
    /// (or a remapped locale) are excluded so localized copies are never
    /// read back as sources.
    pub fn scan(&self) -> ScanResult {
        let mut excluded = self.config.output_locales();
        for mapping in self.config.mappings.values() {
            excluded.extend(mapping.locale_map.values().cloned());
        }
        excluded.retain(|l| *l != self.config.source_locale);

        let result = scan_documents(
            &self.root,
            &self.config.includes,
            &self.config.ignores,
            &excluded,
            self.verbose,
        );

        if result.skipped_count > 0 {
            eprintln!(
                "{} {} path(s) skipped due to access errors{}",
                "warning:".bold().yellow(),
                result.skipped_count,
                if self.verbose { "" } else { " (use -v for details)" }
            );
        }
        result
    }

    /// Read and parse the documents in parallel. Unreadable files are
    /// returned as warnings; the rest keep their scan order.
    pub fn read_documents(&self, files: &[String]) -> (Vec<MarkdownDocument>, Vec<ReadWarning>) {
        let results: Vec<_> = files
            .par_iter()
            .map(|file_path| {
                let text = fs::read_to_string(self.root.join(file_path));
                let result = text.map(|text| {
                    let options = self.config.document_options(file_path);
                    MarkdownDocument::parse(file_path, &text, &options)
                });
                (file_path, result)
            })
            .collect();

        let mut documents = Vec::new();
        let mut warnings = Vec::new();
        for (file_path, result) in results {
            match result {
                Ok(document) => documents.push(document),
                Err(e) => warnings.push(ReadWarning {
                    file_path: file_path.clone(),
                    error: format!("Failed to read file: {}", e),
                }),
            }
        }
        (documents, warnings)
    }

    /// Output path of `document` in `locale`, relative to the root.
    pub fn output_path(&self, document: &MarkdownDocument, locale: &str) -> String {
        let source_locale = &self.config.source_locale;
        match self.config.mapping_for(document.path()) {
            Some(mapping) => mapping.output_path(document.path(), source_locale, locale),
            None => PathMapping::default().output_path(document.path(), source_locale, locale),
        }
    }
}

fn resolve(root: &Path, path: &str) -> PathBuf {
    let p = Path::new(path);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        root.join(p.strip_prefix(".").unwrap_or(p))
    }
}

/// Write `resources` as a JSON array, creating parent directories.
pub fn write_resources(path: &Path, resources: &ResourceSet) -> Result<()> {
    let json = resources
        .to_json()
        .context("Failed to serialize resources")?;
    write_file(path, &json)
}

pub fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", to_slash(parent)))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", to_slash(path)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CONFIG_FILE_NAME;
    use tempfile::tempdir;

    fn workspace(root: &Path) -> Workspace {
        Workspace::load(&CommonArgs {
            root: Some(root.to_path_buf()),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_load_applies_overrides() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{ "sourceLocale": "en-GB", "translationsDir": "./l10n" }"#,
        )
        .unwrap();

        let ws = workspace(dir.path());
        assert!(ws.from_file);
        assert_eq!(ws.config.source_locale, "en-GB");
        assert_eq!(ws.translations_dir, dir.path().join("l10n"));

        let ws = Workspace::load(&CommonArgs {
            root: Some(dir.path().to_path_buf()),
            source_locale: Some("fr-FR".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(ws.config.source_locale, "fr-FR");
    }

    #[test]
    fn test_scan_excludes_localized_copies() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{ "targetLocales": ["de-DE", "fr-FR"],
                 "mappings": { "**/*.md": { "localeMap": { "fr-FR": "fr" } } } }"#,
        )
        .unwrap();
        for path in ["README.md", "de-DE/README.md", "fr/README.md"] {
            let path = dir.path().join(path);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "Hello\n").unwrap();
        }

        let ws = workspace(dir.path());
        assert_eq!(ws.scan().files, vec!["README.md"]);
    }

    #[test]
    fn test_read_documents_reports_unreadable_files() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        fs::write(dir.path().join("a.md"), "Hello\n").unwrap();

        let ws = workspace(dir.path());
        let (documents, warnings) =
            ws.read_documents(&["a.md".to_string(), "missing.md".to_string()]);
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].path(), "a.md");
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].file_path, "missing.md");
    }

    #[test]
    fn test_output_path_uses_default_template() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        let ws = workspace(dir.path());
        let doc = MarkdownDocument::parse("docs/intro.md", "Hi\n", &Default::default());
        assert_eq!(ws.output_path(&doc, "de-DE"), "docs/de-DE/intro.md");
    }
}
