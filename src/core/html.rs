//! A small lexer for raw HTML fragments embedded in Markdown.
//!
//! It does not build a tree. Tags, comments and text runs are reported in
//! source order with absolute byte ranges so the tokenizer can decide what
//! breaks a unit and what becomes a placeholder.

use std::{ops::Range, sync::LazyLock};

use regex::Regex;

use super::classify::{SpanClass, classify_tag};

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^<(/)?([A-Za-z][A-Za-z0-9:-]*)((?:\s+[^\s"'>/=]+(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s"'=<>`]+))?)*)\s*(/)?>"#,
    )
    .expect("tag regex is valid")
});

static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([^\s"'>/=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
        .expect("attribute regex is valid")
});

/// One attribute of a tag. `value` is the byte range of the value without quotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlAttribute {
    pub name: String,
    pub value: Option<Range<usize>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlTag {
    pub range: Range<usize>,
    /// Lowercased tag name.
    pub name: String,
    pub closing: bool,
    pub self_closing: bool,
    pub attributes: Vec<HtmlAttribute>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HtmlPiece {
    Text(Range<usize>),
    Comment { range: Range<usize>, body: String },
    Tag(HtmlTag),
    /// Body of a `script` or `style` element.
    Raw(Range<usize>),
}

/// Lex `source`, reporting ranges shifted by `offset`.
pub fn lex_html(source: &str, offset: usize) -> Vec<HtmlPiece> {
    let mut pieces = Vec::new();
    let mut pos = 0;
    let mut text_start = 0;

    while let Some(rel) = source[pos..].find('<') {
        let lt = pos + rel;
        let rest = &source[lt..];

        if rest.starts_with("<!--") {
            let body_start = lt + 4;
            let (body_end, end) = match source[body_start..].find("-->") {
                Some(i) => (body_start + i, body_start + i + 3),
                None => (source.len(), source.len()),
            };
            push_text(&mut pieces, text_start..lt, offset);
            pieces.push(HtmlPiece::Comment {
                range: offset + lt..offset + end,
                body: source[body_start..body_end].to_string(),
            });
            pos = end;
            text_start = end;
            continue;
        }

        let Some(caps) = TAG_RE.captures(rest) else {
            pos = lt + 1;
            continue;
        };

        let whole = caps.get(0).map(|m| m.end()).unwrap_or(1);
        let end = lt + whole;
        let name = caps
            .get(2)
            .map(|m| m.as_str().to_ascii_lowercase())
            .unwrap_or_default();
        let attributes = caps
            .get(3)
            .map(|m| parse_attributes(m.as_str(), offset + lt + m.start()))
            .unwrap_or_default();
        let tag = HtmlTag {
            range: offset + lt..offset + end,
            closing: caps.get(1).is_some(),
            self_closing: caps.get(4).is_some(),
            name,
            attributes,
        };

        push_text(&mut pieces, text_start..lt, offset);
        let opens_raw_text =
            !tag.closing && !tag.self_closing && classify_tag(&tag.name) == SpanClass::Ignore;
        let raw_close = format!("</{}", tag.name);
        pieces.push(HtmlPiece::Tag(tag));
        pos = end;
        text_start = end;

        if opens_raw_text {
            let close = source[end..]
                .to_ascii_lowercase()
                .find(&raw_close)
                .map(|i| end + i)
                .unwrap_or(source.len());
            if close > end {
                pieces.push(HtmlPiece::Raw(offset + end..offset + close));
            }
            pos = close;
            text_start = close;
        }
    }

    push_text(&mut pieces, text_start..source.len(), offset);
    pieces
}

fn push_text(pieces: &mut Vec<HtmlPiece>, range: Range<usize>, offset: usize) {
    if range.start < range.end {
        pieces.push(HtmlPiece::Text(offset + range.start..offset + range.end));
    }
}

fn parse_attributes(source: &str, offset: usize) -> Vec<HtmlAttribute> {
    ATTR_RE
        .captures_iter(source)
        .filter_map(|caps| {
            let name = caps.get(1)?.as_str().to_ascii_lowercase();
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map(|m| offset + m.start()..offset + m.end());
            Some(HtmlAttribute { name, value })
        })
        .collect()
}
