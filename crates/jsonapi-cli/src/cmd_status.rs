use anyhow::{Context, Result};
use jsonapi::v1::{Document, detect_status};
use std::path::PathBuf;

pub fn run(input: Option<PathBuf>) -> Result<()> {
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

    println!("{}", derive_status(&content)?);
    Ok(())
}

fn derive_status(content: &str) -> Result<u16> {
    let doc = Document::from_json(content).context("Failed to parse JSON:API document")?;
    let tree = doc.to_value();
    Ok(detect_status(tree.as_ref()))
}
