//! YAML front matter: detection, field extraction and re-serialization.

use std::{collections::HashMap, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use super::resource::{FRONT_MATTER_DATATYPE, TranslationUnit};

pub const FULLY_TRANSLATED_FIELD: &str = "fullyTranslated";

static FIELD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^\s:#'\x22-][^:]*):(?:\s|$)").expect("field regex is valid"));

/// Which front-matter fields are translatable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawSelection", into = "RawSelection")]
pub enum FieldSelection {
    All,
    Fields(Vec<String>),
}

impl FieldSelection {
    pub fn includes(&self, name: &str) -> bool {
        match self {
            Self::All => true,
            Self::Fields(fields) => fields.iter().any(|f| f == name),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawSelection {
    Keyword(String),
    Fields(Vec<String>),
}

impl From<RawSelection> for FieldSelection {
    fn from(raw: RawSelection) -> Self {
        match raw {
            RawSelection::Keyword(keyword) if keyword == "all" => Self::All,
            RawSelection::Keyword(field) => Self::Fields(vec![field]),
            RawSelection::Fields(fields) => Self::Fields(fields),
        }
    }
}

impl From<FieldSelection> for RawSelection {
    fn from(selection: FieldSelection) -> Self {
        match selection {
            FieldSelection::All => Self::Keyword("all".to_string()),
            FieldSelection::Fields(fields) => Self::Fields(fields),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontMatterField {
    pub name: String,
    /// The field as written, including continuation lines.
    pub raw: String,
    /// Decoded value for string fields.
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontMatter {
    /// Comment lines before the first field.
    pub preamble: String,
    pub fields: Vec<FrontMatterField>,
    /// The whole block including both fences.
    pub raw: String,
}

/// Split a leading `---` block off `text`.
///
/// Returns the parsed front matter and the byte offset where the body
/// starts. A block that is not a YAML mapping yields `None` with the offset
/// past its closing fence, so the caller can copy it through untouched. An
/// unterminated block ends at the first blank line.
pub fn split_front_matter(text: &str) -> (Option<FrontMatter>, usize) {
    let Some(rest) = text
        .strip_prefix("---\n")
        .or_else(|| text.strip_prefix("---\r\n"))
    else {
        return (None, 0);
    };
    let open_len = text.len() - rest.len();

    let mut offset = open_len;
    for line in rest.split_inclusive('\n') {
        let trimmed = line.trim_end();
        if trimmed == "---" || trimmed == "..." {
            let end = offset + line.len();
            return match FrontMatter::parse(&text[open_len..offset], &text[..end]) {
                Some(front_matter) => (Some(front_matter), end),
                None => {
                    tracing::debug!("malformed front matter kept as is");
                    (None, end)
                }
            };
        }
        if line.trim().is_empty() {
            break;
        }
        offset += line.len();
    }

    tracing::debug!("unterminated front matter kept as is");
    (None, offset)
}

impl FrontMatter {
    fn parse(content: &str, raw: &str) -> Option<Self> {
        let mapping: Mapping = if content.trim().is_empty() {
            Mapping::new()
        } else {
            serde_yaml::from_str(content).ok()?
        };

        let mut preamble = String::new();
        let mut fields: Vec<FrontMatterField> = Vec::new();
        for line in content.split_inclusive('\n') {
            let continuation = line.trim().is_empty()
                || line.starts_with([' ', '\t', '#', '-'])
                || line.trim_start().starts_with('#');
            if continuation {
                match fields.last_mut() {
                    Some(field) => field.raw.push_str(line),
                    None => preamble.push_str(line),
                }
                continue;
            }

            let name = FIELD_RE.captures(line)?.get(1)?.as_str().trim().to_string();
            let value = mapping
                .get(name.as_str())
                .and_then(Value::as_str)
                .map(str::to_string);
            fields.push(FrontMatterField {
                name,
                raw: line.to_string(),
                value,
            });
        }

        Some(Self {
            preamble,
            fields,
            raw: raw.to_string(),
        })
    }

    /// Units for the selected string fields, keyed `<doc_key>.<field>`.
    pub fn units(
        &self,
        doc_key: &str,
        selection: &FieldSelection,
        locale: &str,
    ) -> Vec<TranslationUnit> {
        self.fields
            .iter()
            .filter(|field| selection.includes(&field.name))
            .filter_map(|field| {
                let value = field.value.as_ref().filter(|v| !v.trim().is_empty())?;
                Some(
                    TranslationUnit::new(value.clone(), locale)
                        .with_key(field_key(doc_key, &field.name))
                        .with_datatype(FRONT_MATTER_DATATYPE)
                        .with_context(Some(doc_key.to_string())),
                )
            })
            .collect()
    }

    /// Render the block with `translations` (field name to text) applied.
    ///
    /// Fields are written in sorted order; untranslated fields keep their
    /// original text.
    pub fn render(&self, translations: &HashMap<String, String>, marker: bool) -> String {
        let mut fields: Vec<&FrontMatterField> = self
            .fields
            .iter()
            .filter(|f| !(marker && f.name == FULLY_TRANSLATED_FIELD))
            .collect();
        fields.sort_by(|a, b| a.name.cmp(&b.name));

        let mut out = String::from("---\n");
        out.push_str(&self.preamble);
        for field in fields {
            match translations.get(&field.name) {
                Some(text) => out.push_str(&encode_field(&field.name, text)),
                None => out.push_str(&field.raw),
            }
        }
        if marker {
            out.push_str(FULLY_TRANSLATED_FIELD);
            out.push_str(": true\n");
        }
        out.push_str("---\n");
        out
    }
}

pub fn field_key(doc_key: &str, field: &str) -> String {
    format!("{doc_key}.{field}")
}

fn encode_field(name: &str, value: &str) -> String {
    let mut mapping = Mapping::new();
    mapping.insert(
        Value::String(name.to_string()),
        Value::String(value.to_string()),
    );
    match serde_yaml::to_string(&mapping) {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!(field = name, error = %err, "failed to encode front matter field");
            format!("{name}: {value}\n")
        }
    }
}
