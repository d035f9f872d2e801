//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `extract`: Write every translatable string of the project to a JSON file
//! - `localize`: Write localized copies of every document
//! - `init`: Initialize the configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Extract(cmd)) => cmd.common.verbose,
            Some(Command::Localize(cmd)) => cmd.common.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

/// Common arguments shared by all commands.
#[derive(Debug, Clone, Default, Args)]
pub struct CommonArgs {
    /// Project root to search for the config file (default: current directory)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Source locale (overrides config file)
    #[arg(long)]
    pub source_locale: Option<String>,

    /// Translations directory (overrides config file)
    #[arg(long)]
    pub translations_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct ExtractCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Output file (default: `extractedFile` from the config)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct LocalizeCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Locales to write (default: target and pseudo locales from the config)
    /// Can be specified multiple times: --locale de-DE --locale fr-FR
    #[arg(short, long = "locale")]
    pub locales: Vec<String>,

    /// Exit with status 1 when strings without translation were found
    #[arg(long)]
    pub fail_on_new: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract translatable strings from Markdown documents
    Extract(ExtractCommand),
    /// Write localized copies of Markdown documents
    Localize(LocalizeCommand),
    /// Initialize a new .mdl10nrc.json configuration file
    Init,
}
