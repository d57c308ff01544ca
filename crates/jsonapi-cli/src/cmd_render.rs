use anyhow::{Context, Result};
use jsonapi::v1::Document;
use std::path::PathBuf;

pub fn run(input: Option<PathBuf>, output: Option<PathBuf>, pretty: bool) -> Result<()> {
    let content = if let Some(path) = &input {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?
    } else {
        use std::io::Read;
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read from stdin")?;
        buf
    };

    let rendered = render_content(&content, pretty)?;

    if let Some(path) = &output {
        std::fs::write(path, &rendered).with_context(|| format!("Failed to write {:?}", path))?;
    } else {
        print!("{}", rendered);
    }

    Ok(())
}

/// Parse and re-serialize: invalid resources drop, linked resources land
/// de-duplicated in `included`, empty fields disappear. A document that
/// serializes to no content renders as nothing at all.
fn render_content(content: &str, pretty: bool) -> Result<String> {
    let doc = Document::from_json(content).context("Failed to parse JSON:API document")?;
    let Some(value) = doc.to_value() else {
        return Ok(String::new());
    };
    let json = if pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };
    Ok(json + "\n")
}
