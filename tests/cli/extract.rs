use anyhow::Result;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::{CliTest, stderr, stdout};

#[test]
fn test_extract_writes_resources() -> Result<()> {
    let test = CliTest::with_file("README.md", "# Title\n\nThis is a test\n")?;
    test.write_file("docs/guide.md", "This is a test\n\nThis is also a test\n")?;

    let output = test.run(&["extract"])?;
    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));
    assert!(stdout(&output).contains("Extracted 3 strings from 2 documents"));

    let resources = test.read_json("extracted.json")?;
    assert_eq!(
        resources,
        json!([
            {
                "key": "r1017094113",
                "source": "Title",
                "sourceLocale": "en-US",
                "datatype": "markdown",
                "path": "README.md"
            },
            {
                "key": "r654479252",
                "source": "This is a test",
                "sourceLocale": "en-US",
                "datatype": "markdown",
                "path": "README.md"
            },
            {
                "key": "r999080996",
                "source": "This is also a test",
                "sourceLocale": "en-US",
                "datatype": "markdown",
                "path": "docs/guide.md"
            }
        ])
    );

    Ok(())
}

#[test]
fn test_extract_to_custom_output() -> Result<()> {
    let test = CliTest::with_file("a.md", "Hello\n")?;

    let output = test.run(&["extract", "-o", "out/strings.json"])?;
    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));

    let resources = test.read_json("out/strings.json")?;
    assert_eq!(resources[0]["key"], "r548414328");
    assert!(!test.root().join("extracted.json").exists());

    Ok(())
}

#[test]
fn test_extract_front_matter_fields() -> Result<()> {
    let test = CliTest::with_file(
        ".mdl10nrc.json",
        r#"{ "mappings": { "**/*.md": { "frontmatter": ["title"] } } }"#,
    )?;
    test.write_file("a.md", "---\ntitle: Hello\nlayout: page\n---\nHello world\n")?;

    let output = test.run(&["extract"])?;
    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));

    let resources = test.read_json("extracted.json")?;
    assert_eq!(resources[0]["key"], "a.md.title");
    assert_eq!(resources[0]["datatype"], "x-yaml");
    assert_eq!(resources[1]["key"], "r439544977");
    assert_eq!(resources.as_array().map(Vec::len), Some(2));

    Ok(())
}

#[test]
fn test_extract_invalid_config_is_an_error() -> Result<()> {
    let test = CliTest::with_file(".mdl10nrc.json", r#"{ "includes": ["[invalid"] }"#)?;

    let output = test.run(&["extract"])?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Invalid glob pattern in 'includes'"));

    Ok(())
}
