pub mod extract;
pub mod helper;
pub mod init;
pub mod localize;

use std::path::PathBuf;

use super::exit_status::ExitStatus;
use helper::ReadWarning;

#[derive(Debug)]
pub enum CommandSummary {
    Extract(ExtractSummary),
    Localize(LocalizeSummary),
    Init(InitSummary),
}

#[derive(Debug)]
pub struct ExtractSummary {
    pub document_count: usize,
    pub resource_count: usize,
    pub output: PathBuf,
}

/// One localized document written (or skipped) for one locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizedFile {
    pub source: String,
    pub output: String,
    pub locale: String,
    pub fully_translated: bool,
    pub missing: usize,
}

#[derive(Debug)]
pub struct LocalizeSummary {
    pub document_count: usize,
    pub locales: Vec<String>,
    pub files: Vec<LocalizedFile>,
    /// Output paths that would overwrite their source document.
    pub skipped: Vec<LocalizedFile>,
    pub new_resource_count: usize,
    /// Where new resources were written, if there were any.
    pub new_resources_file: Option<PathBuf>,
}

#[derive(Debug)]
pub struct InitSummary {
    pub created: bool,
}

/// Result of running mdl10n commands
#[derive(Debug)]
pub struct CommandResult {
    pub summary: CommandSummary,
    /// Per-document problems that did not stop the command.
    pub warnings: Vec<ReadWarning>,
    pub exit_status: ExitStatus,
}
