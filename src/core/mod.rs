//! Markdown localization engine.
//!
//! A document goes through these stages:
//!
//! 1. `front_matter`: split off and decode the YAML front matter
//! 2. `tokenize`: turn the body into a flat token stream
//! 3. `extract`: segment tokens into translation units and a layout
//! 4. `localize`: look up translations and rebuild the text from the layout
//!
//! `document` ties the stages together.

pub mod classify;
pub mod directive;
pub mod document;
pub mod extract;
pub mod front_matter;
pub mod html;
pub mod key;
pub mod localize;
pub mod path;
pub mod resource;
pub mod store;
pub mod table;
pub mod tokenize;

pub use document::{DocumentOptions, LocalizeRequest, LocalizedDocument, MarkdownDocument};
pub use front_matter::FieldSelection;
pub use key::make_key;
pub use path::{PathMapping, select_mapping};
pub use resource::{Resource, ResourceSet, TranslationUnit};
pub use store::{AccentPseudo, PseudoLocalizer, TranslationSet, TranslationStore};
