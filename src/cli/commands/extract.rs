use anyhow::Result;

use super::super::{args::ExtractCommand, exit_status::ExitStatus};
use super::{
    CommandResult, CommandSummary, ExtractSummary,
    helper::{Workspace, write_resources},
};
use crate::core::ResourceSet;

/// Extract every translatable string of the project into one JSON file.
///
/// A string shared by several documents is listed once, attributed to the
/// first document (in path order) that contains it.
pub fn extract(cmd: ExtractCommand) -> Result<CommandResult> {
    let ws = Workspace::load(&cmd.common)?;
    let scan = ws.scan();
    let (documents, warnings) = ws.read_documents(&scan.files);

    let resources = ResourceSet::new();
    for document in &documents {
        for resource in document.resources() {
            resources.insert(resource);
        }
    }

    let output = match cmd.output {
        Some(path) => path,
        None => ws.resolve(&ws.config.extracted_file),
    };
    write_resources(&output, &resources)?;

    tracing::debug!(
        documents = documents.len(),
        resources = resources.len(),
        "extracted resources"
    );

    Ok(CommandResult {
        summary: CommandSummary::Extract(ExtractSummary {
            document_count: documents.len(),
            resource_count: resources.len(),
            output,
        }),
        warnings,
        exit_status: ExitStatus::Success,
    })
}
