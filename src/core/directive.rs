//! Directive parsing for `i18n` HTML comments.
//!
//! Supported comments:
//! - `<!-- i18n-enable localize-links -->` - start extracting link targets
//! - `<!-- i18n-disable localize-links -->` - stop extracting link targets
//! - `<!-- i18n: note for translators -->` - attach a note to the next unit

/// Features that can be toggled with enable/disable comments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    LocalizeLinks,
}

impl Feature {
    /// Parse feature name from string (case insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "localize-links" => Some(Self::LocalizeLinks),
            _ => None,
        }
    }
}

/// Parsed i18n directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Enable(Feature),
    Disable(Feature),
    /// Translator note for the next unit.
    Note(String),
}

impl Directive {
    /// Parse directive from the body of an HTML comment.
    /// Returns None if the comment is not an i18n directive.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();

        // Order matters: check longer prefix first
        if let Some(rest) = text.strip_prefix("i18n-enable") {
            return Feature::parse(rest.trim()).map(Self::Enable);
        }
        if let Some(rest) = text.strip_prefix("i18n-disable") {
            return Feature::parse(rest.trim()).map(Self::Disable);
        }
        if let Some(rest) = text.strip_prefix("i18n") {
            if !rest.is_empty() && !rest.starts_with([':', ' ', '\t', '\n', '\r']) {
                return None;
            }
            let note = rest.trim_start_matches(':').trim();
            if note.is_empty() {
                return None;
            }
            return Some(Self::Note(note.to_string()));
        }

        None
    }
}

/// Per-document directive state, recomputed on every parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectiveState {
    pub localize_links: bool,
}

impl DirectiveState {
    /// Apply a directive. Notes do not change the state.
    pub fn apply(&mut self, directive: &Directive) {
        match directive {
            Directive::Enable(Feature::LocalizeLinks) => self.localize_links = true,
            Directive::Disable(Feature::LocalizeLinks) => self.localize_links = false,
            Directive::Note(_) => {}
        }
    }
}
