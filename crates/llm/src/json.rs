//! Pull a JSON object out of a model reply.
//!
//! Models wrap JSON in code fences or chat around it. The first balanced
//! top-level object wins.

use serde_json::Value as JsonValue;

use crate::client::LlmError;

/// Extract the first JSON object from `text`.
pub fn extract_json(text: &str) -> Result<JsonValue, LlmError> {
    let trimmed = text.trim();

    // Fast path: the whole reply is JSON.
    if let Ok(value @ JsonValue::Object(_)) = serde_json::from_str::<JsonValue>(trimmed) {
        return Ok(value);
    }

    for (start, end) in object_spans(trimmed) {
        let candidate = &trimmed[start..end];
        if let Ok(value @ JsonValue::Object(_)) = serde_json::from_str::<JsonValue>(candidate) {
            return Ok(value);
        }
    }

    Err(LlmError::InvalidResponse(format!(
        "no JSON object in reply: {}",
        preview(trimmed)
    )))
}

/// Byte ranges of balanced `{...}` spans, outermost first by start offset.
///
/// One pass from the first `{`; braces inside JSON strings are ignored and
/// unclosed braces never produce a span.
fn object_spans(s: &str) -> Vec<(usize, usize)> {
    let Some(first) = s.find('{') else {
        return Vec::new();
    };

    let mut opens = Vec::new();
    let mut spans = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in s[first..].char_indices() {
        let i = first + i;
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => opens.push(i),
            '}' => {
                if let Some(start) = opens.pop() {
                    spans.push((start, i + 1));
                }
            }
            _ => {}
        }
    }

    spans.sort_by_key(|&(start, _)| start);
    spans
}

fn preview(s: &str) -> String {
    let mut out: String = s.chars().take(80).collect();
    if s.chars().count() > 80 {
        out.push_str("...");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_json() {
        let value = extract_json(r#"{"a": 1}"#).unwrap();
        assert_eq!(value["a"], 1);
    }

    #[test]
    fn test_fenced_json_with_prose() {
        let reply = "Here is my review:\n```json\n{\"scores\": {\"clarity\": {\"score\": 7}}}\n```\nHope it helps!";
        let value = extract_json(reply).unwrap();
        assert_eq!(value["scores"]["clarity"]["score"], 7);
    }

    #[test]
    fn test_braces_inside_strings() {
        let reply = r#"note {not json} then {"issue": "uses {curly} braces", "n": 2}"#;
        let value = extract_json(reply).unwrap();
        assert_eq!(value["issue"], "uses {curly} braces");
        assert_eq!(value["n"], 2);
    }

    #[test]
    fn test_unclosed_braces_before_object() {
        let reply = format!("{} then {}", "{".repeat(10_000), r#"{"a": 1}"#);
        assert_eq!(extract_json(&reply).unwrap()["a"], 1);

        let value = extract_json(r#"scores { pending, final: {"clarity": 8}"#).unwrap();
        assert_eq!(value["clarity"], 8);
    }

    #[test]
    fn test_nested_object_is_returned_whole() {
        let value = extract_json(r#"Result: {"scores": {"grammar": 9}} done"#).unwrap();
        assert_eq!(value["scores"]["grammar"], 9);
    }

    #[test]
    fn test_no_object() {
        assert!(extract_json("I cannot score this content.").is_err());
        assert!(extract_json("[1, 2, 3]").is_err());
    }
}
