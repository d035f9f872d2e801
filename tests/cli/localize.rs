use anyhow::Result;
use pretty_assertions::assert_eq;

use crate::{CliTest, stderr, stdout};

const README: &str = "# Title\n\nThis is a test\n";

fn project(config: &str) -> Result<CliTest> {
    let test = CliTest::with_file(".mdl10nrc.json", config)?;
    test.write_file("README.md", README)?;
    Ok(test)
}

#[test]
fn test_localize_writes_translated_document() -> Result<()> {
    let test = project(r#"{ "targetLocales": ["de-DE"] }"#)?;
    test.write_file(
        "translations/de-DE.json",
        r#"{ "r1017094113": "Titel", "r654479252": "Dies ist ein Test" }"#,
    )?;

    let output = test.run(&["localize"])?;
    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));
    assert!(stdout(&output).contains("Localized 1 document into 1 locale (de-DE)"));

    assert_eq!(
        test.read_file("de-DE/README.md")?,
        "# Titel\n\nDies ist ein Test\n"
    );
    assert!(!test.root().join("new-strings.json").exists());

    Ok(())
}

#[test]
fn test_localize_records_new_strings() -> Result<()> {
    let test = project(r#"{ "targetLocales": ["de-DE"] }"#)?;
    test.write_file("translations/de-DE.json", r#"{ "r1017094113": "Titel" }"#)?;

    let output = test.run(&["localize"])?;
    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));
    assert!(stdout(&output).contains("1 string without translation"));

    assert_eq!(
        test.read_file("de-DE/README.md")?,
        "# Titel\n\nThis is a test\n"
    );
    let new_strings = test.read_json("new-strings.json")?;
    assert_eq!(new_strings[0]["key"], "r654479252");
    assert_eq!(new_strings[0]["targetLocale"], "de-DE");
    assert_eq!(new_strings.as_array().map(Vec::len), Some(1));

    Ok(())
}

#[test]
fn test_localize_fail_on_new() -> Result<()> {
    let test = project(r#"{ "targetLocales": ["de-DE"] }"#)?;

    let output = test.run(&["localize", "--fail-on-new"])?;
    assert_eq!(output.status.code(), Some(1));
    assert!(test.root().join("de-DE/README.md").exists());

    Ok(())
}

#[test]
fn test_localize_fully_translated_policy() -> Result<()> {
    let test = project(r#"{ "targetLocales": ["de-DE", "fr-FR"], "fullyTranslated": true }"#)?;
    test.write_file(
        "translations/de-DE.json",
        r#"{ "r1017094113": "Titel", "r654479252": "Dies ist ein Test" }"#,
    )?;
    test.write_file("translations/fr-FR.json", r#"{ "r1017094113": "Titre" }"#)?;

    let output = test.run(&["localize"])?;
    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));

    assert_eq!(
        test.read_file("de-DE/README.md")?,
        "---\nfullyTranslated: true\n---\n# Titel\n\nDies ist ein Test\n"
    );
    assert_eq!(test.read_file("fr-FR/README.md")?, README);

    Ok(())
}

#[test]
fn test_localize_locale_flag_and_mapping() -> Result<()> {
    let test = project(
        r#"{
            "targetLocales": ["de-DE", "fr-FR"],
            "mappings": {
                "**/*.md": { "template": "i18n/[base].[locale].md", "localeMap": { "fr-FR": "fr" } }
            }
        }"#,
    )?;

    let output = test.run(&["localize", "--locale", "fr-FR"])?;
    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));

    assert_eq!(test.read_file("i18n/README.fr.md")?, README);
    assert!(!test.root().join("i18n/README.de-DE.md").exists());

    Ok(())
}

#[test]
fn test_localize_pseudo_locale() -> Result<()> {
    let test = CliTest::with_file(".mdl10nrc.json", r#"{ "pseudoLocales": ["zxx-XX"] }"#)?;
    test.write_file("a.md", "Hello\n")?;

    let output = test.run(&["localize"])?;
    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));

    let localized = test.read_file("zxx-XX/a.md")?;
    assert!(localized.starts_with('['), "{}", localized);
    assert_ne!(localized, "Hello\n");
    assert!(!test.root().join("new-strings.json").exists());

    Ok(())
}

#[test]
fn test_localize_does_not_read_back_outputs() -> Result<()> {
    let test = project(r#"{ "targetLocales": ["de-DE"] }"#)?;

    test.run(&["localize"])?;
    let output = test.run(&["localize"])?;
    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));
    assert!(stdout(&output).contains("Localized 1 document"));
    assert!(!test.root().join("de-DE/de-DE/README.md").exists());

    Ok(())
}

#[test]
fn test_localize_invalid_translation_file() -> Result<()> {
    let test = project(r#"{ "targetLocales": ["de-DE"] }"#)?;
    test.write_file("translations/de-DE.json", "not json")?;

    let output = test.run(&["localize"])?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Invalid translation file"));

    Ok(())
}
