use anyhow::Result;
use rayon::prelude::*;

use super::super::{args::LocalizeCommand, exit_status::ExitStatus};
use super::{
    CommandResult, CommandSummary, LocalizeSummary, LocalizedFile,
    helper::{ReadWarning, Workspace, write_file, write_resources},
};
use crate::core::{
    AccentPseudo, LocalizeRequest, MarkdownDocument, PseudoLocalizer, ResourceSet, TranslationSet,
};

enum Outcome {
    Written(LocalizedFile),
    Skipped(LocalizedFile),
    Failed(ReadWarning),
}

/// Write a localized copy of every document for every requested locale.
///
/// Strings without a translation fall back to their source text and are
/// collected into the new-resources file.
pub fn localize(cmd: LocalizeCommand) -> Result<CommandResult> {
    let ws = Workspace::load(&cmd.common)?;
    let locales = if cmd.locales.is_empty() {
        ws.config.output_locales()
    } else {
        cmd.locales.clone()
    };

    let store = TranslationSet::load_dir(&ws.translations_dir, &locales)?;
    let scan = ws.scan();
    let (documents, mut warnings) = ws.read_documents(&scan.files);

    let new_resources = ResourceSet::new();
    let jobs: Vec<(&MarkdownDocument, &str)> = documents
        .iter()
        .flat_map(|d| locales.iter().map(move |l| (d, l.as_str())))
        .collect();

    let outcomes: Vec<Outcome> = jobs
        .par_iter()
        .map(|(document, locale)| localize_one(&ws, document, locale, &store, &new_resources))
        .collect();

    let mut files = Vec::new();
    let mut skipped = Vec::new();
    for outcome in outcomes {
        match outcome {
            Outcome::Written(file) => files.push(file),
            Outcome::Skipped(file) => skipped.push(file),
            Outcome::Failed(warning) => warnings.push(warning),
        }
    }

    let new_resources_file = if new_resources.is_empty() {
        None
    } else {
        let path = ws.resolve(&ws.config.new_resources_file);
        write_resources(&path, &new_resources)?;
        Some(path)
    };

    let exit_status = if cmd.fail_on_new && !new_resources.is_empty() {
        ExitStatus::Failure
    } else {
        ExitStatus::Success
    };

    Ok(CommandResult {
        summary: CommandSummary::Localize(LocalizeSummary {
            document_count: documents.len(),
            locales,
            files,
            skipped,
            new_resource_count: new_resources.len(),
            new_resources_file,
        }),
        warnings,
        exit_status,
    })
}

fn localize_one(
    ws: &Workspace,
    document: &MarkdownDocument,
    locale: &str,
    store: &TranslationSet,
    new_resources: &ResourceSet,
) -> Outcome {
    let pseudo = AccentPseudo;
    let output = ws.output_path(document, locale);
    let request = LocalizeRequest {
        locale,
        store,
        pseudo: ws
            .config
            .is_pseudo_locale(locale)
            .then_some(&pseudo as &dyn PseudoLocalizer),
        new_resources,
        fully_translated_policy: ws.config.fully_translated,
    };

    if output == document.path() {
        tracing::debug!(path = document.path(), locale, "output path equals source path");
        return Outcome::Skipped(LocalizedFile {
            source: document.path().to_string(),
            output,
            locale: locale.to_string(),
            fully_translated: false,
            missing: 0,
        });
    }

    let localized = document.localize(&request);
    let file = LocalizedFile {
        source: document.path().to_string(),
        output,
        locale: locale.to_string(),
        fully_translated: localized.fully_translated,
        missing: localized.missing,
    };

    match write_file(&ws.resolve(&file.output), &localized.text) {
        Ok(()) => Outcome::Written(file),
        Err(e) => Outcome::Failed(ReadWarning {
            file_path: file.output,
            error: format!("{:#}", e),
        }),
    }
}
