//! A parsed Markdown document: extraction and localization entry points.

use std::collections::HashMap;

use super::{
    classify::default_localizable_attributes,
    extract::{Extraction, extract},
    front_matter::{
        FULLY_TRANSLATED_FIELD, FieldSelection, FrontMatter, field_key, split_front_matter,
    },
    localize::Localizer,
    resource::{Resource, ResourceSet, TranslationUnit},
    store::{PseudoLocalizer, TranslationStore},
    tokenize::{normalize_headings, tokenize},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentOptions {
    pub source_locale: String,
    /// Translatable front-matter fields.
    pub front_matter: Option<FieldSelection>,
    /// HTML attributes whose values are translated.
    pub localizable_attributes: Vec<String>,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            source_locale: "en-US".to_string(),
            front_matter: None,
            localizable_attributes: default_localizable_attributes(),
        }
    }
}

/// Parameters for one localization pass.
pub struct LocalizeRequest<'a> {
    pub locale: &'a str,
    pub store: &'a dyn TranslationStore,
    pub pseudo: Option<&'a dyn PseudoLocalizer>,
    pub new_resources: &'a ResourceSet,
    /// Only write translated output for fully translated documents, and
    /// mark them in the front matter.
    pub fully_translated_policy: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizedDocument {
    pub text: String,
    pub fully_translated: bool,
    /// Strings that fell back to their source text.
    pub missing: usize,
}

#[derive(Debug, Clone)]
pub struct MarkdownDocument {
    path: String,
    text: String,
    front_matter: Option<FrontMatter>,
    front_matter_units: Vec<TranslationUnit>,
    /// Whether front-matter fields are translated for this document.
    translates_front_matter: bool,
    /// A leading block that looked like front matter but did not parse.
    opaque_head: String,
    body: String,
    extraction: Extraction,
}

impl MarkdownDocument {
    /// Parse `text`. `path` identifies the document in resources and keys
    /// front-matter units.
    pub fn parse(path: &str, text: &str, options: &DocumentOptions) -> Self {
        let (front_matter, offset) = split_front_matter(text);
        let opaque_head = match front_matter {
            Some(_) => String::new(),
            None => text[..offset].to_string(),
        };
        let body = normalize_headings(&text[offset..]);
        let tokens = tokenize(&body, &options.localizable_attributes);
        let extraction = extract(&body, &tokens, &options.source_locale);

        let front_matter_units = match (&front_matter, &options.front_matter) {
            (Some(front_matter), Some(selection)) => {
                front_matter.units(path, selection, &options.source_locale)
            }
            _ => Vec::new(),
        };

        tracing::debug!(
            path,
            tokens = tokens.len(),
            units = extraction.units.len() + front_matter_units.len(),
            "parsed document"
        );

        Self {
            path: path.to_string(),
            text: text.to_string(),
            front_matter,
            front_matter_units,
            translates_front_matter: options.front_matter.is_some(),
            opaque_head,
            body,
            extraction,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Front-matter units first, then body units in document order.
    pub fn units(&self) -> impl Iterator<Item = &TranslationUnit> {
        self.front_matter_units
            .iter()
            .chain(self.extraction.units.iter())
    }

    pub fn resources(&self) -> Vec<Resource> {
        self.units().map(|u| u.to_resource(&self.path)).collect()
    }

    pub fn localize(&self, request: &LocalizeRequest<'_>) -> LocalizedDocument {
        let mut localizer = Localizer::new(
            request.locale,
            &self.path,
            request.store,
            request.new_resources,
        )
        .with_pseudo(request.pseudo);

        let mut translations = HashMap::new();
        if let Some(front_matter) = &self.front_matter {
            for unit in &self.front_matter_units {
                let Some(text) = localizer.lookup(unit) else {
                    continue;
                };
                if let Some(field) = front_matter
                    .fields
                    .iter()
                    .find(|f| field_key(&self.path, &f.name) == unit.key)
                {
                    translations.insert(field.name.clone(), text);
                }
            }
        }

        let body = localizer.render(&self.body, &self.extraction);
        let fully_translated = localizer.is_fully_translated();
        let missing = localizer.missing();

        if request.fully_translated_policy && !fully_translated {
            tracing::debug!(
                path = %self.path,
                locale = request.locale,
                missing,
                "not fully translated, keeping source text"
            );
            return LocalizedDocument {
                text: self.text.clone(),
                fully_translated,
                missing,
            };
        }

        let mut text = match &self.front_matter {
            Some(front_matter)
                if self.translates_front_matter || request.fully_translated_policy =>
            {
                front_matter.render(&translations, request.fully_translated_policy)
            }
            Some(front_matter) => front_matter.raw.clone(),
            None if request.fully_translated_policy && self.opaque_head.is_empty() => {
                format!("---\n{FULLY_TRANSLATED_FIELD}: true\n---\n")
            }
            None => self.opaque_head.clone(),
        };
        text.push_str(&body);

        LocalizedDocument {
            text,
            fully_translated,
            missing,
        }
    }
}
