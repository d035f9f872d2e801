//! Tokenizer for Markdown bodies.
//!
//! `pulldown-cmark` finds the block structure, emphasis, links and code spans.
//! On top of its event stream this module lexes raw HTML, tracks the stack of
//! open inline spans, resolves improperly nested tags and produces a flat
//! token stream with byte ranges into the body.
//!
//! ## Open spans
//!
//! Spans are kept on an explicit stack. A closing tag pops until it finds its
//! opening tag and emits zero-width closes for everything opened after it.
//! At a block boundary the stack is cleared; HTML tags that never closed are
//! rewritten into [`TokenKind::Break`] so spans never straddle blocks.

use std::{ops::Range, sync::LazyLock};

use pulldown_cmark::{Alignment, Event, LinkType, Options, Parser, Tag, TagEnd};
use regex::Regex;

use super::{
    classify::{Construct, SpanClass, classify, is_link_attribute},
    directive::{Directive, DirectiveState},
    html::{HtmlPiece, HtmlTag, lex_html},
};

static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^( {0,3})(#{1,6})[ \t]*([^\s#])").expect("heading regex is valid"));

/// Raw markup of a placeholder or structural element.
///
/// `localizable` lists sub-ranges (attribute values, link targets, image alt
/// text) that are extracted as units of their own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markup {
    pub range: Range<usize>,
    pub localizable: Vec<Range<usize>>,
}

impl Markup {
    pub fn plain(range: Range<usize>) -> Self {
        Self {
            range,
            localizable: Vec::new(),
        }
    }

    /// Zero-width markup, used for spans closed implicitly.
    pub fn empty_at(pos: usize) -> Self {
        Self::plain(pos..pos)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnAlignment {
    None,
    Left,
    Center,
    Right,
}

impl From<Alignment> for ColumnAlignment {
    fn from(alignment: Alignment) -> Self {
        match alignment {
            Alignment::None => Self::None,
            Alignment::Left => Self::Left,
            Alignment::Center => Self::Center,
            Alignment::Right => Self::Right,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Translatable text.
    Text,
    /// Line break inside a paragraph. The token range also covers the container
    /// prefix (`> `, list indentation) of the following line.
    SoftBreak { newline_end: usize },
    Open { id: usize, markup: Markup },
    Close { id: usize, markup: Markup },
    /// Self-closing placeholder. `code` holds the content of inline code.
    Void { markup: Markup, code: Option<String> },
    /// HTML comment, with the `i18n` directive it carries.
    Comment { directive: Option<Directive> },
    /// Ends the current unit.
    Break,
    /// Ends the current unit; content is never translated.
    Opaque,
    /// Link reference definition with localizable parts.
    LinkDefinition { markup: Markup },
    TableStart { alignments: Vec<ColumnAlignment> },
    RowStart,
    RowEnd,
    CellStart,
    CellEnd,
    TableEnd,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub range: Range<usize>,
    pub kind: TokenKind,
}

/// Insert the missing space in `#Heading` and collapse extra spaces after the
/// marker run. Fenced code blocks are left alone.
pub fn normalize_headings(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    let mut fence: Option<&str> = None;

    for line in text.split_inclusive('\n') {
        let trimmed = line.trim_start();
        if let Some(marker) = fence {
            if trimmed.starts_with(marker) {
                fence = None;
            }
            out.push_str(line);
            continue;
        }
        if trimmed.starts_with("```") {
            fence = Some("```");
            out.push_str(line);
            continue;
        }
        if trimmed.starts_with("~~~") {
            fence = Some("~~~");
            out.push_str(line);
            continue;
        }
        out.push_str(&HEADING_RE.replace(line, "$1$2 $3"));
    }

    out
}

/// Tokenize a (heading-normalized) Markdown body.
pub fn tokenize(body: &str, localizable_attributes: &[String]) -> Vec<Token> {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS;
    let parser = Parser::new_ext(body, options);

    let mut definitions: Vec<Definition> = parser
        .reference_definitions()
        .iter()
        .map(|(_, def)| Definition {
            span: def.span.clone(),
            dest: def.dest.to_string(),
            title: def.title.as_ref().map(|t| t.to_string()).unwrap_or_default(),
        })
        .collect();
    definitions.sort_by_key(|d| d.span.start);

    let events: Vec<(Event<'_>, Range<usize>)> = parser.into_offset_iter().collect();

    Tokenizer {
        body,
        attributes: localizable_attributes,
        events,
        definitions,
        next_definition: 0,
        tokens: Vec::new(),
        stack: Vec::new(),
        auto_closed: Vec::new(),
        state: DirectiveState::default(),
        next_id: 0,
        raw_text_until: None,
    }
    .run()
}

struct Definition {
    span: Range<usize>,
    dest: String,
    title: String,
}

enum SpanOrigin {
    Markdown,
    Html(String),
}

struct LinkTarget {
    dest: String,
    title: String,
}

struct OpenSpan {
    id: usize,
    origin: SpanOrigin,
    /// Index of the `Open` token in the output.
    token: usize,
    link: Option<LinkTarget>,
}

struct Tokenizer<'a> {
    body: &'a str,
    attributes: &'a [String],
    events: Vec<(Event<'a>, Range<usize>)>,
    definitions: Vec<Definition>,
    next_definition: usize,
    tokens: Vec<Token>,
    stack: Vec<OpenSpan>,
    /// HTML tags of the current block closed implicitly by an outer close.
    auto_closed: Vec<String>,
    state: DirectiveState,
    next_id: usize,
    /// Set inside an inline `<script>`/`<style>` element.
    raw_text_until: Option<String>,
}

impl<'a> Tokenizer<'a> {
    fn run(mut self) -> Vec<Token> {
        let mut i = 0;
        while i < self.events.len() {
            let start = self.events[i].1.start;
            self.inject_definitions(start);
            i = self.step(i);
        }
        self.inject_definitions(usize::MAX);
        self.close_block(self.body.len());
        self.tokens
    }

    fn step(&mut self, i: usize) -> usize {
        let (event, range) = self.events[i].clone();

        if self.raw_text_until.is_some()
            && !matches!(event, Event::InlineHtml(_) | Event::Start(_) | Event::End(_))
        {
            self.push(range, TokenKind::Opaque);
            return i + 1;
        }

        match event {
            Event::Text(_) => self.push(range, TokenKind::Text),
            Event::Code(code) => self.push(
                range.clone(),
                TokenKind::Void {
                    markup: Markup::plain(range),
                    code: Some(code.to_string()),
                },
            ),
            Event::SoftBreak => {
                let end = self.next_start(i).unwrap_or(range.end).max(range.end);
                self.push(
                    range.start..end,
                    TokenKind::SoftBreak {
                        newline_end: range.end,
                    },
                );
            }
            Event::HardBreak => {
                let end = self.next_start(i).unwrap_or(range.end).max(range.end);
                self.push_void(Markup::plain(range.start..end));
            }
            Event::FootnoteReference(_) => self.push_void(Markup::plain(range)),
            Event::InlineHtml(_) | Event::Html(_) => self.html(range),
            Event::Rule => {
                self.close_block(range.start);
                self.push(range.clone(), TokenKind::Opaque);
                self.close_block(range.end);
            }
            Event::TaskListMarker(_) => {
                self.close_block(range.start);
                self.close_block(range.end);
            }

            Event::Start(Tag::HtmlBlock) => return self.html_block(i, range),
            Event::Start(Tag::CodeBlock(_)) => {
                self.close_block(range.start);
                self.push(range.clone(), TokenKind::Opaque);
                let end = self.matching_end(i);
                self.close_block(range.end);
                return end + 1;
            }
            Event::Start(Tag::Emphasis | Tag::Strong | Tag::Strikethrough) => {
                self.open_markdown(i, range, None)
            }
            Event::End(TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough | TagEnd::Link) => {
                self.close_markdown(i, range)
            }
            Event::Start(Tag::Link {
                link_type,
                dest_url,
                title,
                ..
            }) => return self.link(i, range, link_type, dest_url.to_string(), title.to_string()),
            Event::Start(Tag::Image {
                dest_url, title, ..
            }) => return self.image(i, range, &dest_url, &title),

            Event::Start(Tag::Table(alignments)) => {
                self.close_block(range.start);
                let alignments = alignments.into_iter().map(ColumnAlignment::from).collect();
                self.push(range, TokenKind::TableStart { alignments });
            }
            Event::Start(Tag::TableHead | Tag::TableRow) => {
                self.close_block(range.start);
                self.push(range, TokenKind::RowStart);
            }
            Event::End(TagEnd::TableHead | TagEnd::TableRow) => {
                self.close_block(range.end);
                self.push(range, TokenKind::RowEnd);
            }
            Event::Start(Tag::TableCell) => {
                self.close_block(range.start);
                self.push(range, TokenKind::CellStart);
            }
            Event::End(TagEnd::TableCell) => {
                self.close_block(range.end);
                self.push(range, TokenKind::CellEnd);
            }
            Event::End(TagEnd::Table) => {
                self.close_block(range.end);
                self.push(range, TokenKind::TableEnd);
            }

            Event::Start(_) => self.close_block(range.start),
            Event::End(_) => self.close_block(range.end),
            _ => self.push_void(Markup::plain(range)),
        }

        i + 1
    }

    fn push(&mut self, range: Range<usize>, kind: TokenKind) {
        self.tokens.push(Token { range, kind });
    }

    fn push_void(&mut self, markup: Markup) {
        self.push(markup.range.clone(), TokenKind::Void { markup, code: None });
    }

    fn next_start(&self, i: usize) -> Option<usize> {
        self.events.get(i + 1).map(|(_, r)| r.start)
    }

    /// Index of the `End` event matching the `Start` at `i`.
    fn matching_end(&self, i: usize) -> usize {
        let mut depth = 0usize;
        for (j, (event, _)) in self.events.iter().enumerate().skip(i) {
            match event {
                Event::Start(_) => depth += 1,
                Event::End(_) => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return j;
                    }
                }
                _ => {}
            }
        }
        self.events.len().saturating_sub(1)
    }

    /// Block boundary: forget open spans and emit a break.
    fn close_block(&mut self, pos: usize) {
        for span in self.stack.drain(..) {
            if let Some(token) = self.tokens.get_mut(span.token) {
                token.kind = TokenKind::Break;
            }
        }
        self.auto_closed.clear();
        self.raw_text_until = None;
        self.push(pos..pos, TokenKind::Break);
    }

    fn inject_definitions(&mut self, upto: usize) {
        while let Some(def) = self.definitions.get(self.next_definition) {
            if def.span.start > upto {
                break;
            }
            self.next_definition += 1;

            let span = def.span.clone();
            let localizable = if self.state.localize_links {
                let text = &self.body[span.clone()];
                let tail_start = span.start + text.find("]:").map(|p| p + 2).unwrap_or(0);
                locate_link_parts(self.body, tail_start..span.end, &def.dest, &def.title, true, true)
            } else {
                Vec::new()
            };
            self.close_block(span.start);
            if localizable.is_empty() {
                self.push(span, TokenKind::Opaque);
                continue;
            }
            self.push(
                span.clone(),
                TokenKind::LinkDefinition {
                    markup: Markup {
                        range: span,
                        localizable,
                    },
                },
            );
        }
    }

    fn open_markdown(&mut self, i: usize, range: Range<usize>, link: Option<LinkTarget>) {
        let inner_start = self
            .next_start(i)
            .unwrap_or(range.end)
            .clamp(range.start, range.end);
        let id = self.next_id;
        self.next_id += 1;
        self.stack.push(OpenSpan {
            id,
            origin: SpanOrigin::Markdown,
            token: self.tokens.len(),
            link,
        });
        let open = range.start..inner_start;
        self.push(
            open.clone(),
            TokenKind::Open {
                id,
                markup: Markup::plain(open),
            },
        );
    }

    fn close_markdown(&mut self, i: usize, range: Range<usize>) {
        let Some(pos) = self
            .stack
            .iter()
            .rposition(|s| matches!(s.origin, SpanOrigin::Markdown))
        else {
            return;
        };

        let inner_end = match i.checked_sub(1).and_then(|p| self.events.get(p)) {
            Some((_, prev)) => prev.end.clamp(range.start, range.end),
            None => range.end,
        };
        self.auto_close_above(pos, inner_end);

        let Some(span) = self.stack.pop() else {
            return;
        };
        let close = inner_end..range.end;
        let localizable = match &span.link {
            Some(target) if self.state.localize_links => locate_link_parts(
                self.body,
                close.clone(),
                &target.dest,
                &target.title,
                true,
                true,
            ),
            _ => Vec::new(),
        };
        self.push(
            close.clone(),
            TokenKind::Close {
                id: span.id,
                markup: Markup {
                    range: close,
                    localizable,
                },
            },
        );
    }

    /// Close every span opened after the one at `pos`, innermost first.
    fn auto_close_above(&mut self, pos: usize, at: usize) {
        while self.stack.len() > pos + 1 {
            if let Some(span) = self.stack.pop() {
                if let SpanOrigin::Html(name) = &span.origin {
                    self.auto_closed.push(name.clone());
                }
                self.push(
                    at..at,
                    TokenKind::Close {
                        id: span.id,
                        markup: Markup::empty_at(at),
                    },
                );
            }
        }
    }

    fn link(
        &mut self,
        i: usize,
        range: Range<usize>,
        link_type: LinkType,
        dest: String,
        title: String,
    ) -> usize {
        let end = self.matching_end(i);
        if end <= i + 1 {
            self.push_void(Markup::plain(range));
            return end + 1;
        }

        let label = self.events[i + 1].1.start..self.events[end - 1].1.end;
        let label_is_url = matches!(link_type, LinkType::Autolink | LinkType::Email)
            || self.body.get(label.clone()).map(str::trim) == Some(dest.as_str());

        match classify(Construct::Link { label_is_url }) {
            SpanClass::Ignore => {
                let mut localizable = Vec::new();
                if self.state.localize_links {
                    localizable.push(label.clone());
                    localizable.extend(locate_link_parts(
                        self.body,
                        label.end..range.end,
                        &dest,
                        "",
                        true,
                        false,
                    ));
                }
                self.push_void(Markup { range, localizable });
                end + 1
            }
            _ => {
                self.open_markdown(i, range, Some(LinkTarget { dest, title }));
                i + 1
            }
        }
    }

    fn image(&mut self, i: usize, range: Range<usize>, dest: &str, title: &str) -> usize {
        let end = self.matching_end(i);
        let mut localizable = Vec::new();

        let tail_start = if end > i + 1 {
            let alt = self.events[i + 1].1.start..self.events[end - 1].1.end;
            if !self.body[alt.clone()].trim().is_empty() {
                localizable.push(alt.clone());
            }
            alt.end
        } else {
            range.start
        };
        localizable.extend(locate_link_parts(
            self.body,
            tail_start..range.end,
            dest,
            title,
            self.state.localize_links,
            true,
        ));

        self.push_void(Markup { range, localizable });
        end + 1
    }

    fn html_block(&mut self, i: usize, range: Range<usize>) -> usize {
        let end = self.matching_end(i);
        let mut html: Option<Range<usize>> = None;
        for (event, r) in &self.events[i + 1..end] {
            if matches!(event, Event::Html(_) | Event::Text(_)) {
                html = Some(match html {
                    Some(h) => h.start.min(r.start)..h.end.max(r.end),
                    None => r.clone(),
                });
            }
        }

        self.close_block(range.start);
        if let Some(html) = html {
            self.html(html);
        }
        self.close_block(range.end);
        end + 1
    }

    fn html(&mut self, range: Range<usize>) {
        for piece in lex_html(&self.body[range.clone()], range.start) {
            match piece {
                HtmlPiece::Text(r) => {
                    let kind = if self.raw_text_until.is_some() {
                        TokenKind::Opaque
                    } else {
                        TokenKind::Text
                    };
                    self.push(r, kind);
                }
                HtmlPiece::Raw(r) => self.push(r, TokenKind::Opaque),
                HtmlPiece::Comment { range, body } => {
                    let directive = Directive::parse(&body);
                    if let Some(directive) = &directive {
                        self.state.apply(directive);
                    }
                    self.push(range, TokenKind::Comment { directive });
                }
                HtmlPiece::Tag(tag) => self.html_tag(tag),
            }
        }
    }

    fn html_tag(&mut self, tag: HtmlTag) {
        if let Some(name) = &self.raw_text_until {
            if tag.closing && tag.name == *name {
                self.raw_text_until = None;
                self.push(tag.range, TokenKind::Break);
            } else {
                self.push(tag.range, TokenKind::Opaque);
            }
            return;
        }

        let construct = if tag.self_closing {
            Construct::SelfClosingTag(&tag.name)
        } else {
            Construct::Tag(&tag.name)
        };

        match classify(construct) {
            SpanClass::Breaking => self.push(tag.range, TokenKind::Break),
            SpanClass::Ignore => {
                if !tag.closing && !tag.self_closing {
                    self.raw_text_until = Some(tag.name.clone());
                }
                self.push(tag.range, TokenKind::Break);
            }
            SpanClass::SelfClosing => {
                let markup = self.tag_markup(&tag);
                self.push_void(markup);
            }
            SpanClass::Paired if tag.closing => self.close_html(tag),
            SpanClass::Paired => {
                let id = self.next_id;
                self.next_id += 1;
                let markup = self.tag_markup(&tag);
                self.stack.push(OpenSpan {
                    id,
                    origin: SpanOrigin::Html(tag.name),
                    token: self.tokens.len(),
                    link: None,
                });
                self.push(markup.range.clone(), TokenKind::Open { id, markup });
            }
        }
    }

    fn close_html(&mut self, tag: HtmlTag) {
        let found = self
            .stack
            .iter()
            .rposition(|s| matches!(&s.origin, SpanOrigin::Html(name) if *name == tag.name));
        let Some(pos) = found else {
            // The late close of an implicitly closed tag stays inside the unit.
            if let Some(i) = self.auto_closed.iter().rposition(|name| *name == tag.name) {
                self.auto_closed.remove(i);
                self.push_void(Markup::plain(tag.range));
            } else {
                self.push(tag.range, TokenKind::Break);
            }
            return;
        };

        self.auto_close_above(pos, tag.range.start);
        if let Some(span) = self.stack.pop() {
            let markup = self.tag_markup(&tag);
            self.push(
                markup.range.clone(),
                TokenKind::Close {
                    id: span.id,
                    markup,
                },
            );
        }
    }

    fn tag_markup(&self, tag: &HtmlTag) -> Markup {
        let localizable = tag
            .attributes
            .iter()
            .filter(|attr| {
                self.attributes
                    .iter()
                    .any(|a| a.eq_ignore_ascii_case(&attr.name))
                    || (self.state.localize_links && is_link_attribute(&attr.name))
            })
            .filter_map(|attr| attr.value.clone())
            .filter(|value| !self.body[value.clone()].trim().is_empty())
            .collect();
        Markup {
            range: tag.range.clone(),
            localizable,
        }
    }
}

/// Find the byte ranges of a link destination and title inside `range`.
fn locate_link_parts(
    body: &str,
    range: Range<usize>,
    dest: &str,
    title: &str,
    include_dest: bool,
    include_title: bool,
) -> Vec<Range<usize>> {
    let Some(text) = body.get(range.clone()) else {
        return Vec::new();
    };
    let mut parts = Vec::new();
    let mut search_from = 0;

    if !dest.is_empty()
        && let Some(pos) = text.find(dest)
    {
        if include_dest {
            parts.push(range.start + pos..range.start + pos + dest.len());
        }
        search_from = pos + dest.len();
    }
    if include_title
        && !title.trim().is_empty()
        && let Some(pos) = text[search_from..].find(title)
    {
        let start = range.start + search_from + pos;
        parts.push(start..start + title.len());
    }

    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn attrs() -> Vec<String> {
        crate::core::classify::default_localizable_attributes()
    }

    fn kinds(tokens: &[Token]) -> Vec<&TokenKind> {
        tokens
            .iter()
            .filter(|t| !matches!(t.kind, TokenKind::Break))
            .map(|t| &t.kind)
            .collect()
    }

    fn texts<'a>(body: &'a str, tokens: &[Token]) -> Vec<&'a str> {
        tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Text)
            .map(|t| &body[t.range.clone()])
            .filter(|s| !s.trim().is_empty())
            .collect()
    }

    #[test]
    fn test_normalize_headings() {
        assert_eq!(normalize_headings("#Title\n"), "# Title\n");
        assert_eq!(normalize_headings("##   Spaced\n"), "## Spaced\n");
        assert_eq!(normalize_headings("# Fine\n"), "# Fine\n");
        assert_eq!(normalize_headings("####### seven\n"), "####### seven\n");
    }

    #[test]
    fn test_normalize_headings_skips_code_fences() {
        let src = "```\n#include <stdio.h>\n```\n#Title\n";
        assert_eq!(
            normalize_headings(src),
            "```\n#include <stdio.h>\n```\n# Title\n"
        );
    }

    #[test]
    fn test_tokenize_paragraphs() {
        let body = "This is a test\n\nThis is also a test\n";
        let tokens = tokenize(body, &attrs());
        assert_eq!(
            texts(body, &tokens),
            vec!["This is a test", "This is also a test"]
        );
    }

    #[test]
    fn test_tokenize_emphasis_delimiters() {
        let body = "This is *very* important.\n";
        let tokens = tokenize(body, &attrs());
        let open = tokens
            .iter()
            .find_map(|t| match &t.kind {
                TokenKind::Open { markup, .. } => Some(&body[markup.range.clone()]),
                _ => None,
            })
            .unwrap();
        let close = tokens
            .iter()
            .find_map(|t| match &t.kind {
                TokenKind::Close { markup, .. } => Some(&body[markup.range.clone()]),
                _ => None,
            })
            .unwrap();
        assert_eq!(open, "*");
        assert_eq!(close, "*");
    }

    #[test]
    fn test_tokenize_inline_code_is_void() {
        let body = "Call `foo()` first.\n";
        let tokens = tokenize(body, &attrs());
        let code = tokens.iter().find_map(|t| match &t.kind {
            TokenKind::Void { code, .. } => code.clone(),
            _ => None,
        });
        assert_eq!(code.as_deref(), Some("foo()"));
    }

    #[test]
    fn test_tokenize_auto_closes_inner_span() {
        let body = "Some <span>text <em>here</span> and more.\n";
        let tokens = tokenize(body, &attrs());
        let closes: Vec<&Token> = tokens
            .iter()
            .filter(|t| matches!(t.kind, TokenKind::Close { .. }))
            .collect();
        assert_eq!(closes.len(), 2);
        // The <em> is closed implicitly, right where </span> starts.
        assert!(closes[0].range.is_empty());
        assert_eq!(&body[closes[1].range.clone()], "</span>");
    }

    #[test]
    fn test_tokenize_unclosed_tag_breaks() {
        let body = "Before <span>after\n";
        let tokens = tokenize(body, &attrs());
        assert!(
            !tokens
                .iter()
                .any(|t| matches!(t.kind, TokenKind::Open { .. }))
        );
        assert_eq!(texts(body, &tokens), vec!["Before ", "after"]);
    }

    #[test]
    fn test_tokenize_stray_close_breaks() {
        let body = "Before </b> after\n";
        let tokens = tokenize(body, &attrs());
        assert!(
            !tokens
                .iter()
                .any(|t| matches!(t.kind, TokenKind::Close { .. }))
        );
    }

    #[test]
    fn test_tokenize_late_close_of_auto_closed_tag() {
        let body = "Some <span>text <em>nesting</span> here</em> now.\n";
        let tokens = tokenize(body, &attrs());
        assert!(tokens.iter().any(|t| matches!(&t.kind,
            TokenKind::Void { markup, .. } if &body[markup.range.clone()] == "</em>")));
        assert!(
            !tokens
                .iter()
                .any(|t| t.kind == TokenKind::Break && !t.range.is_empty())
        );
    }

    #[test]
    fn test_tokenize_rule_is_opaque() {
        let body = "Before\n\n---\n\nAfter\n";
        let tokens = tokenize(body, &attrs());
        assert!(tokens.iter().any(|t| t.kind == TokenKind::Opaque
            && body[t.range.clone()].trim() == "---"));
    }

    #[test]
    fn test_tokenize_html_block_text() {
        let body = "<div>This is <b>bold</b> text.</div>\n";
        let tokens = tokenize(body, &attrs());
        assert_eq!(texts(body, &tokens), vec!["This is ", "bold", " text."]);
    }

    #[test]
    fn test_tokenize_script_is_opaque() {
        let body = "<script>\nvar x = \"not text\";\n</script>\n";
        let tokens = tokenize(body, &attrs());
        assert!(texts(body, &tokens).is_empty());
        assert!(tokens.iter().any(|t| t.kind == TokenKind::Opaque));
    }

    #[test]
    fn test_tokenize_comment_note() {
        let body = "<!-- i18n: a note -->\n\nText\n";
        let tokens = tokenize(body, &attrs());
        assert!(tokens.iter().any(|t| t.kind
            == TokenKind::Comment {
                directive: Some(Directive::Note("a note".to_string()))
            }));
    }

    #[test]
    fn test_tokenize_link_parts_with_localization() {
        let body = "<!-- i18n-enable localize-links -->\n\nSee [the docs](https://example.com/docs \"Docs\") now.\n";
        let tokens = tokenize(body, &attrs());
        let close = tokens
            .iter()
            .find_map(|t| match &t.kind {
                TokenKind::Close { markup, .. } => Some(markup.clone()),
                _ => None,
            })
            .unwrap();
        let parts: Vec<&str> = close
            .localizable
            .iter()
            .map(|r| &body[r.clone()])
            .collect();
        assert_eq!(parts, vec!["https://example.com/docs", "Docs"]);
    }

    #[test]
    fn test_tokenize_link_without_localization() {
        let body = "See [the docs](https://example.com/docs \"Docs\") now.\n";
        let tokens = tokenize(body, &attrs());
        let close = tokens
            .iter()
            .find_map(|t| match &t.kind {
                TokenKind::Close { markup, .. } => Some(markup.clone()),
                _ => None,
            })
            .unwrap();
        assert!(close.localizable.is_empty());
        assert_eq!(&body[close.range], "](https://example.com/docs \"Docs\")");
    }

    #[test]
    fn test_tokenize_autolink_is_void() {
        let body = "Visit <https://example.com> today.\n";
        let tokens = tokenize(body, &attrs());
        let voids: Vec<&TokenKind> = kinds(&tokens)
            .into_iter()
            .filter(|k| matches!(k, TokenKind::Void { .. }))
            .collect();
        assert_eq!(voids.len(), 1);
        assert_eq!(texts(body, &tokens), vec!["Visit ", " today."]);
    }

    #[test]
    fn test_tokenize_image_alt_is_localizable() {
        let body = "![A cat](cat.png \"Cat title\")\n";
        let tokens = tokenize(body, &attrs());
        let markup = tokens
            .iter()
            .find_map(|t| match &t.kind {
                TokenKind::Void { markup, .. } => Some(markup.clone()),
                _ => None,
            })
            .unwrap();
        let parts: Vec<&str> = markup
            .localizable
            .iter()
            .map(|r| &body[r.clone()])
            .collect();
        assert_eq!(parts, vec!["A cat", "Cat title"]);
    }

    #[test]
    fn test_tokenize_table_structure() {
        let body = "| a | b |\n|---|---|\n| c | d |\n";
        let tokens = tokenize(body, &attrs());
        let starts = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::CellStart)
            .count();
        let rows = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::RowStart)
            .count();
        assert_eq!(starts, 4);
        assert_eq!(rows, 2);
        assert_eq!(texts(body, &tokens), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_tokenize_footnote_reference() {
        let body = "Text with a note[^1].\n\n[^1]: The note.\n";
        let tokens = tokenize(body, &attrs());
        assert!(tokens.iter().any(|t| matches!(&t.kind,
            TokenKind::Void { markup, .. } if &body[markup.range.clone()] == "[^1]")));
        assert!(texts(body, &tokens).contains(&"The note."));
    }

    #[test]
    fn test_tokenize_reference_definition_forward() {
        let body = "<!-- i18n-enable localize-links -->\n\nSee [docs][ref].\n\n[ref]: https://example.com \"Title\"\n";
        let tokens = tokenize(body, &attrs());
        let def = tokens
            .iter()
            .find_map(|t| match &t.kind {
                TokenKind::LinkDefinition { markup } => Some(markup.clone()),
                _ => None,
            })
            .unwrap();
        let parts: Vec<&str> = def.localizable.iter().map(|r| &body[r.clone()]).collect();
        assert_eq!(parts, vec!["https://example.com", "Title"]);
    }
}
