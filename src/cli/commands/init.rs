use std::{env, fs};

use anyhow::{Context, Result};

use super::super::exit_status::ExitStatus;
use super::{CommandResult, CommandSummary, InitSummary};
use crate::config::{CONFIG_FILE_NAME, default_config_json};

/// Write a default config file into the current directory, refusing to
/// overwrite an existing one.
pub fn init() -> Result<CommandResult> {
    let config_path = env::current_dir()
        .context("Failed to get current directory")?
        .join(CONFIG_FILE_NAME);

    let created = !config_path.exists();
    if created {
        fs::write(&config_path, default_config_json()?)
            .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;
    }

    Ok(CommandResult {
        summary: CommandSummary::Init(InitSummary { created }),
        warnings: Vec::new(),
        exit_status: if created {
            ExitStatus::Success
        } else {
            ExitStatus::Failure
        },
    })
}
