//! mdl10n - Markdown localization
//!
//! mdl10n extracts the translatable strings of Markdown documents into
//! translation units with stable hash keys, and writes localized copies of
//! the documents from a set of translations, keeping every piece of markup
//! the translator never sees.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (extract, localize, init)
//! - `config`: Configuration file loading and parsing
//! - `core`: Markdown engine (tokenize, extract, localize)
//! - `utils`: Shared utility functions

pub mod cli;
pub mod config;
pub mod core;
pub mod utils;
