//! Classification of inline markup constructs.
//!
//! Every construct the tokenizer meets is mapped to a [`SpanClass`]. HTML tags
//! are looked up in a flat table; adding a tag is a table edit.

/// How a markup construct interacts with translation units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpanClass {
    /// Ends the current unit. The markup stays in the document verbatim.
    Breaking,
    /// Travels with the text as a `<cN>...</cN>` placeholder pair.
    Paired,
    /// Travels with the text as a `<cN/>` placeholder.
    SelfClosing,
    /// Opaque content, copied through without being tokenized for translation.
    Ignore,
}

/// HTML tags that do not break a translation unit.
const INLINE_TAGS: &[(&str, SpanClass)] = &[
    ("a", SpanClass::Paired),
    ("abbr", SpanClass::Paired),
    ("acronym", SpanClass::Paired),
    ("b", SpanClass::Paired),
    ("bdi", SpanClass::Paired),
    ("bdo", SpanClass::Paired),
    ("big", SpanClass::Paired),
    ("blink", SpanClass::Paired),
    ("cite", SpanClass::Paired),
    ("code", SpanClass::Paired),
    ("data", SpanClass::Paired),
    ("del", SpanClass::Paired),
    ("dfn", SpanClass::Paired),
    ("em", SpanClass::Paired),
    ("font", SpanClass::Paired),
    ("i", SpanClass::Paired),
    ("ins", SpanClass::Paired),
    ("kbd", SpanClass::Paired),
    ("label", SpanClass::Paired),
    ("mark", SpanClass::Paired),
    ("q", SpanClass::Paired),
    ("s", SpanClass::Paired),
    ("samp", SpanClass::Paired),
    ("small", SpanClass::Paired),
    ("span", SpanClass::Paired),
    ("strike", SpanClass::Paired),
    ("strong", SpanClass::Paired),
    ("sub", SpanClass::Paired),
    ("sup", SpanClass::Paired),
    ("time", SpanClass::Paired),
    ("tt", SpanClass::Paired),
    ("u", SpanClass::Paired),
    ("var", SpanClass::Paired),
    ("br", SpanClass::SelfClosing),
    ("hr", SpanClass::SelfClosing),
    ("img", SpanClass::SelfClosing),
    ("input", SpanClass::SelfClosing),
    ("wbr", SpanClass::SelfClosing),
    ("script", SpanClass::Ignore),
    ("style", SpanClass::Ignore),
];

/// Markdown and HTML constructs that can appear inside a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Construct<'a> {
    Emphasis,
    Strong,
    Strikethrough,
    InlineCode,
    HardBreak,
    Image,
    FootnoteReference,
    Comment,
    /// A link. `label_is_url` is true for autolinks and links whose visible
    /// text is their own destination.
    Link { label_is_url: bool },
    /// An HTML tag written as `<name ...>`.
    Tag(&'a str),
    /// An HTML tag written as `<name ... />`.
    SelfClosingTag(&'a str),
}

/// Classify a construct.
pub fn classify(construct: Construct<'_>) -> SpanClass {
    match construct {
        Construct::Emphasis | Construct::Strong | Construct::Strikethrough => SpanClass::Paired,
        Construct::Link { label_is_url: true } => SpanClass::Ignore,
        Construct::Link { label_is_url: false } => SpanClass::Paired,
        Construct::InlineCode
        | Construct::HardBreak
        | Construct::Image
        | Construct::FootnoteReference
        | Construct::Comment => SpanClass::SelfClosing,
        Construct::Tag(name) => classify_tag(name),
        Construct::SelfClosingTag(name) => match classify_tag(name) {
            SpanClass::Paired | SpanClass::SelfClosing => SpanClass::SelfClosing,
            other => other,
        },
    }
}

/// Look up an HTML tag name (case insensitive). Unknown tags break units.
pub fn classify_tag(name: &str) -> SpanClass {
    let lower = name.to_ascii_lowercase();
    INLINE_TAGS
        .iter()
        .find(|(tag, _)| *tag == lower)
        .map(|(_, class)| *class)
        .unwrap_or(SpanClass::Breaking)
}

/// Attributes whose values are extracted as their own units by default.
pub fn default_localizable_attributes() -> Vec<String> {
    [
        "alt",
        "title",
        "placeholder",
        "aria-label",
        "aria-description",
        "aria-placeholder",
        "aria-roledescription",
        "aria-valuetext",
    ]
    .map(String::from)
    .to_vec()
}

/// Attributes that hold a URL; localizable only while link localization is on.
pub fn is_link_attribute(name: &str) -> bool {
    matches!(name.to_ascii_lowercase().as_str(), "href" | "src")
}
