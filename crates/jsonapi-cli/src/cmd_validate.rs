use anyhow::{Context, Result};
use jsonapi::v1::Document;
use serde_json::Value;
use std::path::PathBuf;

pub fn run(input: PathBuf) -> Result<()> {
    let content =
        std::fs::read_to_string(&input).with_context(|| format!("Failed to read {:?}", input))?;
    println!("Valid: {}", validate_content(&content)?);
    Ok(())
}

fn validate_content(content: &str) -> Result<String> {
    match Document::from_json(content) {
        Ok(doc) => Ok(summarize(&doc)),
        Err(e) => Err(anyhow::anyhow!("Invalid: {}", e)),
    }
}

/// One line describing the serialized shape: primary-data flavor plus
/// error and included counts.
fn summarize(doc: &Document) -> String {
    let Some(tree) = doc.to_value() else {
        return "no content".to_string();
    };

    let mut parts = Vec::new();
    match tree.get("data") {
        Some(Value::Array(items)) => parts.push(format!(
            "collection of {} resource{}",
            items.len(),
            plural(items.len())
        )),
        Some(Value::Null) => parts.push("null resource".to_string()),
        Some(_) => parts.push("single resource".to_string()),
        None => {}
    }
    if let Some(Value::Array(errors)) = tree.get("errors") {
        parts.push(format!("{} error{}", errors.len(), plural(errors.len())));
    }
    if parts.is_empty() {
        parts.push("meta only".to_string());
    }
    if let Some(Value::Array(included)) = tree.get("included") {
        parts.push(format!("{} included", included.len()));
    }
    parts.join(", ")
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_single_resource_summary() {
        let summary =
            validate_content(r#"{"data": {"id": "1", "type": "articles"}}"#).unwrap();
        assert_eq!(summary, "single resource");
    }

    #[test]
    fn test_collection_summary_counts_included() {
        let json = r#"{
            "data": [
                {"id": "1", "type": "articles",
                 "relationships": {"author": {"data": {"id": "9", "type": "people"}}}},
                {"id": "2", "type": "articles"}
            ],
            "included": [{"id": "9", "type": "people", "attributes": {"name": "Kate"}}]
        }"#;
        assert_eq!(
            validate_content(json).unwrap(),
            "collection of 2 resources, 1 included"
        );
    }

    #[test]
    fn test_error_document_summary() {
        let summary =
            validate_content(r#"{"errors": [{"status": "404"}, {"status": "403"}]}"#).unwrap();
        assert_eq!(summary, "2 errors");
    }

    #[test]
    fn test_null_resource_summary() {
        assert_eq!(validate_content(r#"{"data": null}"#).unwrap(), "null resource");
    }

    #[test]
    fn test_meta_only_summary() {
        assert_eq!(validate_content(r#"{"meta": {"k": 1}}"#).unwrap(), "meta only");
    }

    #[test]
    fn test_empty_document_summary() {
        assert_eq!(validate_content("{}").unwrap(), "no content");
    }

    #[test]
    fn test_invalid_json() {
        assert!(validate_content("not json").is_err());
    }

    #[test]
    fn test_invalid_structure() {
        assert!(validate_content(r#"{"data": 5}"#).is_err());
    }

    #[test]
    fn test_run_with_temp_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, r#"{{"data": {{"id": "1", "type": "articles"}}}}"#).unwrap();
        f.flush().unwrap();
        assert!(run(f.path().to_path_buf()).is_ok());
    }

    #[test]
    fn test_run_nonexistent_file() {
        assert!(run(PathBuf::from("/nonexistent/file.json")).is_err());
    }
}
