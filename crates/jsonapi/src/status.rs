//! HTTP status derivation for serialized documents.

use serde_json::Value;

/// Fold the error statuses of a serialized document into one HTTP
/// response code.
///
/// No document at all means 204, a document without errors means 200, and
/// a single distinct error status is returned as-is. Mixed statuses
/// collapse: all below 500 to a generic 400, any mix involving a server
/// error to 500. Errors whose `status` is missing or not numeric are
/// skipped; if none contributed a usable status the result is 500.
///
/// # Examples
///
/// ```
/// use jsonapi::v1::detect_status;
/// use serde_json::json;
///
/// assert_eq!(detect_status(None), 204);
/// assert_eq!(detect_status(Some(&json!({"data": null}))), 200);
/// assert_eq!(
///     detect_status(Some(&json!({"errors": [{"status": "404"}]}))),
///     404
/// );
/// assert_eq!(
///     detect_status(Some(&json!({"errors": [{"status": "404"}, {"status": "403"}]}))),
///     400
/// );
/// assert_eq!(
///     detect_status(Some(&json!({"errors": [{"status": "404"}, {"status": "500"}]}))),
///     500
/// );
/// ```
pub fn detect_status(document: Option<&Value>) -> u16 {
    let Some(document) = document else {
        return 204;
    };
    if document.is_null() {
        return 204;
    }
    let errors = match document.get("errors") {
        Some(Value::Array(errors)) if !errors.is_empty() => errors,
        _ => return 200,
    };

    let mut current: Option<u16> = None;
    for error in errors {
        let Some(status) = error.get("status").and_then(parse_status) else {
            continue;
        };
        current = Some(match current {
            None => status,
            Some(aggregate) if aggregate == status => aggregate,
            Some(aggregate) if aggregate < 500 && status < 500 => 400,
            Some(_) => 500,
        });
    }
    current.unwrap_or(500)
}

/// Lenient numeric read of an error `status`: decimal text or a JSON
/// number, fractional values truncating toward zero.
fn parse_status(value: &Value) -> Option<u16> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    let truncated = number.trunc();
    if !truncated.is_finite() || truncated < 0.0 || truncated > f64::from(u16::MAX) {
        return None;
    }
    Some(truncated as u16)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_no_document_is_204() {
        assert_eq!(detect_status(None), 204);
        assert_eq!(detect_status(Some(&Value::Null)), 204);
    }

    #[test]
    fn test_no_errors_is_200() {
        assert_eq!(detect_status(Some(&json!({}))), 200);
        assert_eq!(detect_status(Some(&json!({"data": null}))), 200);
        assert_eq!(detect_status(Some(&json!({"errors": []}))), 200);
        assert_eq!(detect_status(Some(&json!({"errors": "nope"}))), 200);
    }

    #[test]
    fn test_single_status_passes_through() {
        let doc = json!({"errors": [{"status": "404"}]});
        assert_eq!(detect_status(Some(&doc)), 404);
    }

    #[test]
    fn test_repeated_status_stays() {
        let doc = json!({"errors": [{"status": "404"}, {"status": "404"}]});
        assert_eq!(detect_status(Some(&doc)), 404);
    }

    #[test]
    fn test_mixed_client_errors_collapse_to_400() {
        let doc = json!({"errors": [{"status": "404"}, {"status": "403"}]});
        assert_eq!(detect_status(Some(&doc)), 400);
    }

    #[test]
    fn test_server_error_in_the_mix_collapses_to_500() {
        let doc = json!({"errors": [{"status": "404"}, {"status": "500"}]});
        assert_eq!(detect_status(Some(&doc)), 500);

        let doc = json!({"errors": [{"status": "503"}, {"status": "404"}]});
        assert_eq!(detect_status(Some(&doc)), 500);
    }

    #[test]
    fn test_collapse_is_monotonic() {
        // Once collapsed to 400, further client errors keep it there.
        let doc = json!({"errors": [
            {"status": "404"}, {"status": "403"}, {"status": "404"}
        ]});
        assert_eq!(detect_status(Some(&doc)), 400);

        // And a later server error still escalates.
        let doc = json!({"errors": [
            {"status": "404"}, {"status": "403"}, {"status": "502"}
        ]});
        assert_eq!(detect_status(Some(&doc)), 500);
    }

    #[test]
    fn test_unusable_statuses_default_to_500() {
        let doc = json!({"errors": [{"status": "abc"}]});
        assert_eq!(detect_status(Some(&doc)), 500);

        let doc = json!({"errors": [{"title": "no status at all"}]});
        assert_eq!(detect_status(Some(&doc)), 500);
    }

    #[test]
    fn test_unusable_statuses_are_skipped_not_counted() {
        let doc = json!({"errors": [{"status": "abc"}, {"status": "404"}]});
        assert_eq!(detect_status(Some(&doc)), 404);
    }

    #[test]
    fn test_numeric_statuses_accepted() {
        let doc = json!({"errors": [{"status": 404}]});
        assert_eq!(detect_status(Some(&doc)), 404);

        let doc = json!({"errors": [{"status": "404.9"}]});
        assert_eq!(detect_status(Some(&doc)), 404);
    }

    #[test]
    fn test_non_object_error_entries_are_skipped() {
        let doc = json!({"errors": ["broken", {"status": "410"}]});
        assert_eq!(detect_status(Some(&doc)), 410);
    }

    #[test]
    fn test_out_of_range_statuses_are_skipped() {
        let doc = json!({"errors": [{"status": "-1"}, {"status": "99999"}, {"status": "410"}]});
        assert_eq!(detect_status(Some(&doc)), 410);
    }
}
