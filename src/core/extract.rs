//! Segmentation of a token stream into translation units.
//!
//! Tokens between two breaks are buffered. On flush the buffer is trimmed
//! (surrounding whitespace, edge comments and wrapping spans move out of the
//! unit), placeholders are numbered in order of appearance and the remaining
//! slice of the body becomes the unit source. Everything that is not part of a
//! unit is recorded as a verbatim range so the document can be rebuilt.

use std::{collections::HashMap, fmt::Write as _, ops::Range, sync::LazyLock};

use regex::Regex;

use super::{
    directive::{Directive, DirectiveState},
    resource::TranslationUnit,
    tokenize::{ColumnAlignment, Markup, Token, TokenKind},
};

static BARE_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[A-Za-z][A-Za-z0-9+.-]*://|www\.)\S+$").expect("url regex is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderKind {
    Paired,
    SelfClosing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupPiece {
    Literal(String),
    /// A localizable part of the markup, extracted as its own unit.
    Localizable { key: String, source: String },
}

/// Original markup of a placeholder, split into literal and localizable parts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkupTemplate {
    pub pieces: Vec<MarkupPiece>,
}

impl MarkupTemplate {
    /// The markup as written in the source document.
    pub fn source(&self) -> String {
        self.pieces
            .iter()
            .map(|piece| match piece {
                MarkupPiece::Literal(text) => text.as_str(),
                MarkupPiece::Localizable { source, .. } => source.as_str(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderSpan {
    pub index: usize,
    pub kind: PlaceholderKind,
    pub open: MarkupTemplate,
    /// Empty for self-closing placeholders and implicitly closed spans.
    pub close: MarkupTemplate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLayout {
    pub alignments: Vec<ColumnAlignment>,
    /// Header row first. Each cell is a layout of its own.
    pub rows: Vec<Vec<Vec<Piece>>>,
    pub line_prefix: String,
    pub trailing_newline: bool,
}

/// One piece of the rebuilt document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Piece {
    Verbatim(Range<usize>),
    /// Index into [`Extraction::units`].
    Unit(usize),
    /// Markup outside of any unit that has localizable parts.
    Markup(MarkupTemplate),
    Table(TableLayout),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Units in document order; sub-units follow the unit they belong to.
    pub units: Vec<TranslationUnit>,
    pub layout: Vec<Piece>,
}

pub fn extract(body: &str, tokens: &[Token], locale: &str) -> Extraction {
    let mut extractor = Extractor {
        body,
        locale,
        units: Vec::new(),
        layout: Vec::new(),
        table: None,
        cursor: 0,
        buffer: Vec::new(),
        note: None,
        state: DirectiveState::default(),
    };

    for token in tokens {
        extractor.token(token);
    }
    extractor.flush();
    extractor.verbatim_to(body.len());

    Extraction {
        units: extractor.units,
        layout: extractor.layout,
    }
}

struct TableBuilder {
    alignments: Vec<ColumnAlignment>,
    rows: Vec<Vec<Vec<Piece>>>,
    cell: Option<Vec<Piece>>,
    line_prefix: String,
    trailing_newline: bool,
}

struct Extractor<'a> {
    body: &'a str,
    locale: &'a str,
    units: Vec<TranslationUnit>,
    layout: Vec<Piece>,
    table: Option<TableBuilder>,
    cursor: usize,
    buffer: Vec<&'a Token>,
    /// Translator note waiting for the next unit.
    note: Option<String>,
    state: DirectiveState,
}

impl<'a> Extractor<'a> {
    fn token(&mut self, token: &'a Token) {
        match &token.kind {
            TokenKind::Text
            | TokenKind::SoftBreak { .. }
            | TokenKind::Open { .. }
            | TokenKind::Close { .. }
            | TokenKind::Void { .. } => self.buffer.push(token),
            TokenKind::Comment { directive } => {
                match directive {
                    Some(Directive::Note(note)) => self.note = Some(note.clone()),
                    Some(directive) => self.state.apply(directive),
                    None => {}
                }
                self.buffer.push(token);
            }
            TokenKind::Break => self.flush(),
            TokenKind::Opaque => {
                self.flush();
                self.note = None;
            }
            TokenKind::LinkDefinition { markup } => {
                self.flush();
                self.note = None;
                self.emit_markup(markup);
            }
            TokenKind::TableStart { alignments } => {
                self.flush();
                self.verbatim_to(token.range.start);
                let line_start = self.body[..token.range.start]
                    .rfind('\n')
                    .map_or(0, |p| p + 1);
                self.table = Some(TableBuilder {
                    alignments: alignments.clone(),
                    rows: Vec::new(),
                    cell: None,
                    line_prefix: self.body[line_start..token.range.start].to_string(),
                    trailing_newline: self.body[token.range.clone()].ends_with('\n'),
                });
            }
            TokenKind::RowStart => {
                self.flush();
                if let Some(table) = self.table.as_mut() {
                    table.rows.push(Vec::new());
                }
            }
            TokenKind::RowEnd => self.flush(),
            TokenKind::CellStart => {
                self.flush();
                if let Some(table) = self.table.as_mut() {
                    table.cell = Some(Vec::new());
                    self.cursor = token.range.start;
                }
            }
            TokenKind::CellEnd => {
                self.flush();
                self.verbatim_to(token.range.end);
                if let Some(table) = self.table.as_mut()
                    && let Some(cell) = table.cell.take()
                {
                    if table.rows.is_empty() {
                        table.rows.push(Vec::new());
                    }
                    if let Some(row) = table.rows.last_mut() {
                        row.push(cell);
                    }
                }
            }
            TokenKind::TableEnd => {
                self.flush();
                if let Some(table) = self.table.take() {
                    self.layout.push(Piece::Table(TableLayout {
                        alignments: table.alignments,
                        rows: table.rows,
                        line_prefix: table.line_prefix,
                        trailing_newline: table.trailing_newline,
                    }));
                }
                self.cursor = self.cursor.max(token.range.end);
            }
        }
    }

    fn out(&mut self) -> &mut Vec<Piece> {
        match self.table.as_mut().and_then(|t| t.cell.as_mut()) {
            Some(cell) => cell,
            None => &mut self.layout,
        }
    }

    fn in_cell(&self) -> bool {
        self.table.as_ref().is_some_and(|t| t.cell.is_some())
    }

    fn verbatim_to(&mut self, pos: usize) {
        if pos > self.cursor {
            let range = self.cursor..pos;
            self.out().push(Piece::Verbatim(range));
            self.cursor = pos;
        }
    }

    fn is_blank(&self, token: &Token) -> bool {
        match token.kind {
            TokenKind::Text => self.body[token.range.clone()].trim().is_empty(),
            TokenKind::SoftBreak { .. } | TokenKind::Comment { .. } => true,
            _ => false,
        }
    }

    fn flush(&mut self) {
        let items = std::mem::take(&mut self.buffer);
        if items.is_empty() {
            return;
        }

        let has_text = items.iter().any(|t| {
            t.kind == TokenKind::Text && !self.body[t.range.clone()].trim().is_empty()
        });
        if !has_text {
            self.flush_markup_only(&items);
            return;
        }

        let (mut lo, mut hi) = (0, items.len());
        loop {
            while lo < hi && self.is_blank(items[lo]) {
                lo += 1;
            }
            while hi > lo && self.is_blank(items[hi - 1]) {
                hi -= 1;
            }
            if hi - lo < 2 {
                break;
            }
            match (&items[lo].kind, &items[hi - 1].kind) {
                (TokenKind::Open { id: open, .. }, TokenKind::Close { id: close, .. })
                    if open == close =>
                {
                    lo += 1;
                    hi -= 1;
                }
                _ => break,
            }
        }
        if lo >= hi {
            return;
        }
        if !self.state.localize_links && self.is_bare_url(&items[lo..hi]) {
            self.flush_markup_only(&items);
            return;
        }

        for token in &items[..lo] {
            self.emit_token_markup(token);
        }
        self.emit_unit(&items[lo..hi]);
        for token in &items[hi..] {
            self.emit_token_markup(token);
        }
    }

    /// A paragraph holding nothing but a URL.
    fn is_bare_url(&self, items: &[&Token]) -> bool {
        let (Some(first), Some(last)) = (items.first(), items.last()) else {
            return false;
        };
        items
            .iter()
            .all(|t| matches!(t.kind, TokenKind::Text))
            && BARE_URL_RE.is_match(self.body[first.range.start..last.range.end].trim())
    }

    /// A buffer without text is not a unit. A lone code span still is, as a
    /// literal, unless it sits in a table cell.
    ///
    /// A pending note survives only the block of its own comment.
    fn flush_markup_only(&mut self, items: &[&'a Token]) {
        let visible: Vec<&&Token> = items.iter().filter(|t| !self.is_blank(t)).collect();
        if let [token] = visible.as_slice()
            && let TokenKind::Void {
                code: Some(code), ..
            } = &token.kind
            && !self.in_cell()
        {
            self.emit_code_literal(token, code);
            return;
        }

        let holds_note = items.iter().any(|t| {
            matches!(
                t.kind,
                TokenKind::Comment {
                    directive: Some(Directive::Note(_))
                }
            )
        });
        if !holds_note {
            self.note = None;
        }

        for token in items {
            self.emit_token_markup(token);
        }
    }

    /// The code span is the unit, delimiters included.
    fn emit_code_literal(&mut self, token: &Token, code: &str) {
        if code.trim().is_empty() {
            return;
        }
        let source = &self.body[token.range.clone()];
        let unit = TranslationUnit::new(source, self.locale).with_comment(self.note.take());

        self.verbatim_to(token.range.start);
        let index = self.units.len();
        self.out().push(Piece::Unit(index));
        self.cursor = token.range.end;
        self.units.push(unit);
    }

    fn emit_token_markup(&mut self, token: &Token) {
        match &token.kind {
            TokenKind::Open { markup, .. }
            | TokenKind::Close { markup, .. }
            | TokenKind::Void { markup, .. }
                if !markup.localizable.is_empty() =>
            {
                self.emit_markup(markup)
            }
            _ => {}
        }
    }

    fn emit_markup(&mut self, markup: &Markup) {
        let mut subunits = Vec::new();
        let template = self.template(markup, &mut subunits);
        self.verbatim_to(markup.range.start);
        self.out().push(Piece::Markup(template));
        self.cursor = self.cursor.max(markup.range.end);
        self.units.extend(subunits);
    }

    fn template(&self, markup: &Markup, subunits: &mut Vec<TranslationUnit>) -> MarkupTemplate {
        let mut pieces = Vec::new();
        let mut pos = markup.range.start;
        let mut ranges = markup.localizable.clone();
        ranges.sort_by_key(|r| r.start);

        for range in ranges {
            if range.start < pos || range.end > markup.range.end {
                continue;
            }
            if range.start > pos {
                pieces.push(MarkupPiece::Literal(self.body[pos..range.start].to_string()));
            }
            let text = &self.body[range.clone()];
            if text.trim().is_empty() {
                pieces.push(MarkupPiece::Literal(text.to_string()));
            } else {
                let unit = TranslationUnit::new(text, self.locale);
                pieces.push(MarkupPiece::Localizable {
                    key: unit.key.clone(),
                    source: text.to_string(),
                });
                subunits.push(unit);
            }
            pos = range.end;
        }
        if pos < markup.range.end {
            pieces.push(MarkupPiece::Literal(
                self.body[pos..markup.range.end].to_string(),
            ));
        }

        MarkupTemplate { pieces }
    }

    fn emit_unit(&mut self, items: &[&'a Token]) {
        let (Some(first), Some(last)) = (items.first(), items.last()) else {
            return;
        };
        let start = match first.kind {
            TokenKind::Text => {
                let text = &self.body[first.range.clone()];
                first.range.start + (text.len() - text.trim_start().len())
            }
            _ => first.range.start,
        };
        let end = match last.kind {
            TokenKind::Text => last.range.start + self.body[last.range.clone()].trim_end().len(),
            _ => last.range.end,
        };

        let mut source = String::new();
        let mut spans: Vec<PlaceholderSpan> = Vec::new();
        let mut ids: HashMap<usize, usize> = HashMap::new();
        let mut codes: Vec<(usize, &str)> = Vec::new();
        let mut subunits = Vec::new();
        let mut line_prefix = String::new();
        let mut pos = start;

        for token in items {
            let range = token.range.start.max(start)..token.range.end.min(end);
            if range.start > pos {
                source.push_str(&self.body[pos..range.start]);
            }

            match &token.kind {
                TokenKind::Text => {
                    if range.start < range.end {
                        source.push_str(&self.body[range.clone()]);
                    }
                }
                TokenKind::SoftBreak { newline_end } => {
                    source.push('\n');
                    if line_prefix.is_empty() {
                        line_prefix = self.body[*newline_end..token.range.end].to_string();
                    }
                }
                TokenKind::Open { id, markup } => {
                    let index = spans.len();
                    ids.insert(*id, index);
                    spans.push(PlaceholderSpan {
                        index,
                        kind: PlaceholderKind::Paired,
                        open: self.template(markup, &mut subunits),
                        close: MarkupTemplate::default(),
                    });
                    let _ = write!(source, "<c{index}>");
                }
                TokenKind::Close { id, markup } => {
                    if let Some(&index) = ids.get(id) {
                        spans[index].close = self.template(markup, &mut subunits);
                        let _ = write!(source, "</c{index}>");
                    }
                }
                TokenKind::Void { markup, code } => {
                    let index = spans.len();
                    spans.push(PlaceholderSpan {
                        index,
                        kind: PlaceholderKind::SelfClosing,
                        open: self.template(markup, &mut subunits),
                        close: MarkupTemplate::default(),
                    });
                    if let Some(code) = code {
                        codes.push((index, code));
                    }
                    let _ = write!(source, "<c{index}/>");
                }
                TokenKind::Comment { .. } => {
                    let index = spans.len();
                    spans.push(PlaceholderSpan {
                        index,
                        kind: PlaceholderKind::SelfClosing,
                        open: self.template(&Markup::plain(token.range.clone()), &mut subunits),
                        close: MarkupTemplate::default(),
                    });
                    let _ = write!(source, "<c{index}/>");
                }
                _ => {}
            }
            pos = pos.max(match token.kind {
                TokenKind::Text => range.end,
                _ => token.range.end,
            });
        }

        let mut comments: Vec<String> = self.note.take().into_iter().collect();
        comments.extend(
            codes
                .into_iter()
                .map(|(index, code)| format!("c{index} will be replaced with the inline code `{code}`.")),
        );
        let comment = (!comments.is_empty()).then(|| comments.join(" "));

        let mut unit = TranslationUnit::new(source, self.locale).with_comment(comment);
        unit.spans = spans;
        unit.line_prefix = line_prefix;

        tracing::trace!(key = %unit.key, source = %unit.source, "extracted unit");
        self.verbatim_to(start);
        let index = self.units.len();
        self.out().push(Piece::Unit(index));
        self.cursor = end;
        self.units.push(unit);
        self.units.extend(subunits);
    }
}
