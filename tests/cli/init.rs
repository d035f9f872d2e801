use anyhow::{Context, Result};
use serde_json::Value;

use crate::{CliTest, stderr, stdout};

/// Validates config file structure and default values.
fn assert_config_content(content: &str) -> Result<()> {
    let parsed: Value = serde_json::from_str(content).context("Config should be valid JSON")?;

    assert_eq!(parsed["sourceLocale"], "en-US");
    assert_eq!(parsed["includes"], serde_json::json!(["**/*.md"]));
    assert!(
        parsed.get("mappings").is_some(),
        "Config should have 'mappings' field"
    );
    assert!(
        parsed.get("translationsDir").is_some(),
        "Config should have 'translationsDir' field"
    );

    assert!(
        content.contains("  "),
        "Config should use 2-space indentation"
    );

    Ok(())
}

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.run(&["init"])?;
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("Created .mdl10nrc.json"));

    assert!(test.root().join(".mdl10nrc.json").exists());
    let content = test.read_file(".mdl10nrc.json")?;
    assert_config_content(&content)?;

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::with_file(".mdl10nrc.json", "{}")?;

    let output = test.run(&["init"])?;
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains(".mdl10nrc.json already exists"));
    assert_eq!(test.read_file(".mdl10nrc.json")?, "{}");

    Ok(())
}
