//! Report formatting and printing utilities.
//!
//! Separate from the commands so mdl10n can be used as a library.

use std::io::{self, Write};

use colored::Colorize;

use super::commands::{
    CommandResult, CommandSummary, ExtractSummary, InitSummary, LocalizeSummary,
    helper::ReadWarning,
};
use crate::config::CONFIG_FILE_NAME;
use crate::utils::{plural, to_slash};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Maximum number of untranslated documents listed without `-v`.
const MAX_FILES_DISPLAY: usize = 5;

pub fn print(result: &CommandResult, verbose: bool) {
    let mut stdout = io::stdout().lock();
    let mut stderr = io::stderr().lock();
    print_warnings_to(&result.warnings, verbose, &mut stderr);
    match &result.summary {
        CommandSummary::Extract(summary) => print_extract_to(summary, &mut stdout),
        CommandSummary::Localize(summary) => print_localize_to(summary, verbose, &mut stdout),
        CommandSummary::Init(summary) => print_init_to(summary, &mut stdout, &mut stderr),
    }
}

/// Print documents that could not be read or written.
pub fn print_warnings_to<W: Write>(warnings: &[ReadWarning], verbose: bool, writer: &mut W) {
    if warnings.is_empty() {
        return;
    }
    if verbose {
        for warning in warnings {
            let _ = writeln!(
                writer,
                "{} {}: {}",
                "warning:".bold().yellow(),
                warning.file_path,
                warning.error
            );
        }
    } else {
        let _ = writeln!(
            writer,
            "{} {} could not be processed (use {} for details)",
            "warning:".bold().yellow(),
            plural(warnings.len(), "file"),
            "-v".cyan()
        );
    }
}

pub fn print_extract_to<W: Write>(summary: &ExtractSummary, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Extracted {} from {} to {}",
            plural(summary.resource_count, "string"),
            plural(summary.document_count, "document"),
            to_slash(&summary.output)
        )
        .green()
    );
}

pub fn print_localize_to<W: Write>(summary: &LocalizeSummary, verbose: bool, writer: &mut W) {
    if summary.locales.is_empty() {
        let _ = writeln!(
            writer,
            "{} No target locales configured (set {} in {} or pass {})",
            "warning:".bold().yellow(),
            "targetLocales".cyan(),
            CONFIG_FILE_NAME,
            "--locale".cyan()
        );
        return;
    }

    for file in &summary.skipped {
        let _ = writeln!(
            writer,
            "{} {} [{}]: output path is the source document, skipped",
            "warning:".bold().yellow(),
            file.source,
            file.locale
        );
    }

    let incomplete: Vec<_> = summary.files.iter().filter(|f| f.missing > 0).collect();
    let shown = if verbose {
        incomplete.len()
    } else {
        incomplete.len().min(MAX_FILES_DISPLAY)
    };
    for file in incomplete.iter().take(shown) {
        let _ = writeln!(
            writer,
            "  {} {} {}",
            "-->".blue(),
            file.output,
            format!("({} untranslated)", file.missing).dimmed()
        );
    }
    if shown < incomplete.len() {
        let _ = writeln!(
            writer,
            "  ... and {} more (use {} to list all)",
            incomplete.len() - shown,
            "-v".cyan()
        );
    }

    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Localized {} into {} ({})",
            plural(summary.document_count, "document"),
            plural(summary.locales.len(), "locale"),
            summary.locales.join(", ")
        )
        .green()
    );

    if let Some(path) = &summary.new_resources_file {
        let _ = writeln!(
            writer,
            "{} {} without translation written to {}",
            FAILURE_MARK.yellow(),
            plural(summary.new_resource_count, "string"),
            to_slash(path)
        );
    }
}

pub fn print_init_to<W: Write, E: Write>(summary: &InitSummary, writer: &mut W, errors: &mut E) {
    if summary.created {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!("Created {}", CONFIG_FILE_NAME).green()
        );
    } else {
        let _ = writeln!(errors, "Error: {} already exists", CONFIG_FILE_NAME);
    }
}
