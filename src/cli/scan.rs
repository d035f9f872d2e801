use std::path::Path;

use colored::Colorize;
use glob::{MatchOptions, Pattern};
use walkdir::{DirEntry, WalkDir};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Result of scanning for documents.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Paths relative to the scan root, `/`-separated and sorted.
    pub files: Vec<String>,
    pub skipped_count: usize,
}

fn compile(patterns: &[String], kind: &str, verbose: bool) -> Vec<Pattern> {
    patterns
        .iter()
        .filter_map(|p| match Pattern::new(p) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                if verbose {
                    eprintln!(
                        "{} Invalid {} pattern '{}': {}",
                        "warning:".bold().yellow(),
                        kind,
                        p,
                        e
                    );
                }
                None
            }
        })
        .collect()
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
}

/// Find documents under `root` matching `includes` and none of `ignores`.
///
/// Directories named like one of `output_locales` hold localized copies and
/// are skipped, as are hidden directories.
pub fn scan_documents(
    root: &Path,
    includes: &[String],
    ignores: &[String],
    output_locales: &[String],
    verbose: bool,
) -> ScanResult {
    let includes = compile(includes, "include", verbose);
    let ignores = compile(ignores, "ignore", verbose);
    let mut result = ScanResult::default();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden(e));

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                result.skipped_count += 1;
                if verbose {
                    eprintln!("{} {}", "warning:".bold().yellow(), e);
                }
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        let relative = relative.to_string_lossy().replace('\\', "/");

        let dirs = relative.split('/').rev().skip(1);
        if dirs.into_iter().any(|d| output_locales.iter().any(|l| l == d)) {
            continue;
        }
        if !includes.iter().any(|p| p.matches_with(&relative, MATCH_OPTIONS)) {
            continue;
        }
        if ignores.iter().any(|p| p.matches_with(&relative, MATCH_OPTIONS)) {
            continue;
        }
        result.files.push(relative);
    }

    result.files.sort();
    result
}
