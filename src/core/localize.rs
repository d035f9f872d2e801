//! Rebuilding a document from its layout and translated units.

use std::{collections::HashMap, sync::LazyLock};

use regex::Regex;

use super::{
    extract::{Extraction, MarkupPiece, MarkupTemplate, Piece, PlaceholderKind},
    resource::{ResourceSet, TranslationUnit},
    store::{PseudoLocalizer, TranslationStore},
    table::{clean_cell, render_table},
};

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(/?)c(\d+)(/?)>").expect("placeholder regex is valid"));

/// A piece of translated text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    Open(usize),
    Close(usize),
    SelfClosing(usize),
}

/// Split a translation into text and placeholder markers.
pub fn parse_placeholders(text: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut pos = 0;

    for caps in PLACEHOLDER_RE.captures_iter(text) {
        let (Some(whole), Some(number)) = (caps.get(0), caps.get(2)) else {
            continue;
        };
        let Ok(index) = number.as_str().parse::<usize>() else {
            continue;
        };
        if whole.start() > pos {
            segments.push(Segment::Text(&text[pos..whole.start()]));
        }
        let closing = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
        let self_closing = caps.get(3).is_some_and(|m| !m.as_str().is_empty());
        segments.push(match (closing, self_closing) {
            (true, _) => Segment::Close(index),
            (false, true) => Segment::SelfClosing(index),
            (false, false) => Segment::Open(index),
        });
        pos = whole.end();
    }
    if pos < text.len() {
        segments.push(Segment::Text(&text[pos..]));
    }

    segments
}

/// Looks up translations for one document and target locale.
///
/// Strings without a translation fall back to a pseudo-translation when one
/// is configured, otherwise to the source text; the latter are recorded in
/// `new_resources` and make the document not fully translated.
pub struct Localizer<'a> {
    locale: &'a str,
    path: &'a str,
    store: &'a dyn TranslationStore,
    pseudo: Option<&'a dyn PseudoLocalizer>,
    new_resources: &'a ResourceSet,
    cache: HashMap<String, Option<String>>,
    missing: usize,
}

impl<'a> Localizer<'a> {
    pub fn new(
        locale: &'a str,
        path: &'a str,
        store: &'a dyn TranslationStore,
        new_resources: &'a ResourceSet,
    ) -> Self {
        Self {
            locale,
            path,
            store,
            pseudo: None,
            new_resources,
            cache: HashMap::new(),
            missing: 0,
        }
    }

    pub fn with_pseudo(mut self, pseudo: Option<&'a dyn PseudoLocalizer>) -> Self {
        self.pseudo = pseudo;
        self
    }

    pub fn is_fully_translated(&self) -> bool {
        self.missing == 0
    }

    /// Number of strings that fell back to their source text.
    pub fn missing(&self) -> usize {
        self.missing
    }

    /// The translation of `unit`, or `None` if it falls back to source.
    pub fn lookup(&mut self, unit: &TranslationUnit) -> Option<String> {
        if let Some(cached) = self.cache.get(&unit.key) {
            return cached.clone();
        }

        let resolved = match self.store.get(&unit.key, self.locale) {
            Some(text) => Some(text),
            None => match self.pseudo {
                Some(pseudo) => Some(pseudo.pseudo(&unit.source)),
                None => {
                    self.missing += 1;
                    let mut resource = unit.to_resource(self.path);
                    resource.target_locale = Some(self.locale.to_string());
                    if self.new_resources.insert(resource) {
                        tracing::debug!(key = %unit.key, locale = self.locale, "new string");
                    }
                    None
                }
            },
        };
        self.cache.insert(unit.key.clone(), resolved.clone());
        resolved
    }

    pub fn translate(&mut self, unit: &TranslationUnit) -> String {
        self.lookup(unit).unwrap_or_else(|| unit.source.clone())
    }

    /// Rebuild the body described by `extraction`.
    pub fn render(&mut self, body: &str, extraction: &Extraction) -> String {
        let mut by_key: HashMap<&str, &TranslationUnit> = HashMap::new();
        for unit in &extraction.units {
            by_key.entry(unit.key.as_str()).or_insert(unit);
        }

        let mut out = String::with_capacity(body.len());
        self.render_pieces(body, extraction, &by_key, &extraction.layout, &mut out);
        out
    }

    fn render_pieces(
        &mut self,
        body: &str,
        extraction: &Extraction,
        by_key: &HashMap<&str, &TranslationUnit>,
        pieces: &[Piece],
        out: &mut String,
    ) {
        for piece in pieces {
            match piece {
                Piece::Verbatim(range) => out.push_str(&body[range.clone()]),
                Piece::Unit(index) => {
                    if let Some(unit) = extraction.units.get(*index) {
                        let text = self.render_unit(unit, by_key);
                        out.push_str(&text);
                    }
                }
                Piece::Markup(template) => {
                    let text = self.render_template(template, by_key);
                    out.push_str(&text);
                }
                Piece::Table(table) => {
                    let mut rows = Vec::with_capacity(table.rows.len());
                    for row in &table.rows {
                        let mut cells = Vec::with_capacity(row.len());
                        for cell in row {
                            let mut text = String::new();
                            self.render_pieces(body, extraction, by_key, cell, &mut text);
                            cells.push(clean_cell(&text));
                        }
                        rows.push(cells);
                    }
                    out.push_str(&render_table(
                        &table.alignments,
                        &rows,
                        &table.line_prefix,
                        table.trailing_newline,
                    ));
                }
            }
        }
    }

    /// Translate a unit and put its markup back.
    ///
    /// Placeholders unknown to the unit are dropped and their content kept.
    /// Each placeholder is rendered with the kind it had in the source; paired
    /// spans left open by the translation are closed at the end.
    fn render_unit(
        &mut self,
        unit: &TranslationUnit,
        by_key: &HashMap<&str, &TranslationUnit>,
    ) -> String {
        let translated = self.translate(unit);
        let mut out = String::with_capacity(translated.len());
        let mut open: Vec<usize> = Vec::new();

        for segment in parse_placeholders(&translated) {
            match segment {
                Segment::Text(text) => push_text(&mut out, text, &unit.line_prefix),
                Segment::Open(index) => {
                    let Some(span) = unit.spans.get(index) else {
                        tracing::debug!(key = %unit.key, index, "unknown placeholder dropped");
                        continue;
                    };
                    out.push_str(&self.render_template(&span.open, by_key));
                    if span.kind == PlaceholderKind::Paired {
                        open.push(index);
                    }
                }
                Segment::Close(index) => {
                    let Some(span) = unit.spans.get(index) else {
                        continue;
                    };
                    if let Some(pos) = open.iter().rposition(|&i| i == index) {
                        open.remove(pos);
                        out.push_str(&self.render_template(&span.close, by_key));
                    }
                }
                Segment::SelfClosing(index) => {
                    let Some(span) = unit.spans.get(index) else {
                        continue;
                    };
                    out.push_str(&self.render_template(&span.open, by_key));
                    if span.kind == PlaceholderKind::Paired {
                        out.push_str(&self.render_template(&span.close, by_key));
                    }
                }
            }
        }

        while let Some(index) = open.pop() {
            if let Some(span) = unit.spans.get(index) {
                out.push_str(&self.render_template(&span.close, by_key));
            }
        }

        out
    }

    fn render_template(
        &mut self,
        template: &MarkupTemplate,
        by_key: &HashMap<&str, &TranslationUnit>,
    ) -> String {
        let mut out = String::new();
        for piece in &template.pieces {
            match piece {
                MarkupPiece::Literal(text) => out.push_str(text),
                MarkupPiece::Localizable { key, source } => match by_key.get(key.as_str()) {
                    Some(unit) => out.push_str(&self.translate(unit)),
                    None => out.push_str(source),
                },
            }
        }
        out
    }
}

fn push_text(out: &mut String, text: &str, line_prefix: &str) {
    if line_prefix.is_empty() {
        out.push_str(text);
        return;
    }
    let mut lines = text.split('\n');
    if let Some(first) = lines.next() {
        out.push_str(first);
    }
    for line in lines {
        out.push('\n');
        out.push_str(line_prefix);
        out.push_str(line);
    }
}
