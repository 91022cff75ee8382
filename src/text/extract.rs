//! Tolerant JSON extraction from model text output.
//!
//! Models asked for "JSON only" still wrap their answer in prose or in
//! triple-backtick fences. The extractor runs an ordered list of pure
//! strategies and keeps the first value of the expected shape:
//!
//! 1. the whole trimmed text
//! 2. the interior of a fenced block (optionally tagged `json`)
//! 3. a bracket span: first opening bracket to last closing bracket, then the
//!    first balanced span
//!
//! Malformed JSON is never repaired.

use serde_json::Value;

const FENCE: &str = "```";

/// Top-level JSON shape a caller expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// `{ ... }`
    Object,
    /// `[ ... ]`
    Array,
}

impl Shape {
    fn open(self) -> char {
        match self {
            Self::Object => '{',
            Self::Array => '[',
        }
    }

    fn close(self) -> char {
        match self {
            Self::Object => '}',
            Self::Array => ']',
        }
    }

    fn matches(self, value: &Value) -> bool {
        match self {
            Self::Object => value.is_object(),
            Self::Array => value.is_array(),
        }
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Object => write!(f, "object"),
            Self::Array => write!(f, "array"),
        }
    }
}

/// No strategy could recover a JSON value of the expected shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no JSON {shape} found in response ({} chars)", .raw.chars().count())]
pub struct ExtractionError {
    /// Shape that was looked for.
    pub shape: Shape,
    /// The original text, kept for diagnostics.
    pub raw: String,
}

type Strategy = fn(&str, Shape) -> Option<Value>;

const STRATEGIES: [Strategy; 3] = [parse_direct, parse_fenced, parse_bracket_span];

/// Extracts a JSON object from `text`.
pub fn extract(text: &str) -> Result<Value, ExtractionError> {
    extract_shape(text, Shape::Object)
}

/// Extracts a JSON array from `text`.
pub fn extract_array(text: &str) -> Result<Value, ExtractionError> {
    extract_shape(text, Shape::Array)
}

/// Extracts a JSON value of `shape` from `text`.
pub fn extract_shape(text: &str, shape: Shape) -> Result<Value, ExtractionError> {
    let trimmed = text.trim();
    STRATEGIES
        .iter()
        .find_map(|strategy| strategy(trimmed, shape))
        .ok_or_else(|| ExtractionError {
            shape,
            raw: text.to_string(),
        })
}

fn parse_as(candidate: &str, shape: Shape) -> Option<Value> {
    serde_json::from_str::<Value>(candidate)
        .ok()
        .filter(|v| shape.matches(v))
}

/// Strategy 1: the response is already pure JSON.
pub fn parse_direct(text: &str, shape: Shape) -> Option<Value> {
    parse_as(text.trim(), shape)
}

/// Strategy 2: JSON inside a ```` ``` ```` or ```` ```json ```` fence.
pub fn parse_fenced(text: &str, shape: Shape) -> Option<Value> {
    let mut rest = text;
    while let Some(start) = rest.find(FENCE) {
        let after = &rest[start + FENCE.len()..];
        let body_start = strip_json_tag(after);
        let end = body_start.find(FENCE)?;
        let body = body_start[..end].trim();

        if body.starts_with(shape.open()) && body.ends_with(shape.close()) {
            if let Some(value) = parse_as(body, shape) {
                return Some(value);
            }
        }
        rest = &body_start[end + FENCE.len()..];
    }
    None
}

fn strip_json_tag(s: &str) -> &str {
    match s.get(..4) {
        Some(tag) if tag.eq_ignore_ascii_case("json") => &s[4..],
        _ => s,
    }
}

/// Strategy 3: a bracketed span somewhere in surrounding prose.
pub fn parse_bracket_span(text: &str, shape: Shape) -> Option<Value> {
    let start = text.find(shape.open())?;

    if let Some(end) = text.rfind(shape.close()) {
        if end > start {
            if let Some(value) = parse_as(&text[start..=end], shape) {
                return Some(value);
            }
        }
    }

    balanced_span(text, start, shape).and_then(|span| parse_as(span, shape))
}

/// Returns the balanced span beginning at byte `start`, skipping brackets that
/// appear inside JSON strings.
fn balanced_span(text: &str, start: usize, shape: Shape) -> Option<&str> {
    let (open, close) = (shape.open(), shape.close());
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
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
            c if c == open => depth += 1,
            c if c == close => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(&text[start..start + offset + c.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_direct_object() {
        assert_eq!(extract(r#"{"a":1}"#).unwrap(), json!({"a": 1}));
        assert_eq!(extract("  \n{\"a\":1}\n ").unwrap(), json!({"a": 1}));
    }

    #[test]
    fn test_fenced_object_with_prose() {
        let text = "blah ```json\n{\"a\":1}\n``` blah";
        assert_eq!(extract(text).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn test_fence_tag_is_optional_and_case_insensitive() {
        assert_eq!(extract("```\n{\"a\":1}\n```").unwrap(), json!({"a": 1}));
        assert_eq!(extract("```JSON {\"a\":1} ```").unwrap(), json!({"a": 1}));
    }

    #[test]
    fn test_skips_fences_without_json() {
        let text = "```bash\nls\n```\nthen\n```json\n{\"ok\":true}\n```";
        assert_eq!(parse_fenced(text, Shape::Object), Some(json!({"ok": true})));
    }

    #[test]
    fn test_no_json_is_an_error() {
        let err = extract("no json here").unwrap_err();
        assert_eq!(err.shape, Shape::Object);
        assert_eq!(err.raw, "no json here");
    }

    #[test]
    fn test_empty_text_is_an_error() {
        assert!(extract("").is_err());
        assert!(extract_array("   ").is_err());
    }

    #[test]
    fn test_greedy_bracket_span() {
        let text = "Claro, aquí tienes: {\"short\": \"x\", \"nested\": {\"k\": 1}} ¡Saludos!";
        assert_eq!(
            extract(text).unwrap(),
            json!({"short": "x", "nested": {"k": 1}})
        );
    }

    #[test]
    fn test_balanced_span_when_greedy_span_fails() {
        let text = "first {\"a\": \"}\"} and later {oops}";
        assert_eq!(extract(text).unwrap(), json!({"a": "}"}));
    }

    #[test]
    fn test_malformed_region_is_not_repaired() {
        assert!(extract("```json\n{\"a\": 1,}\n```").is_err());
        assert!(extract("here {'a': 1} there").is_err());
    }

    #[test]
    fn test_direct_parse_requires_shape() {
        assert!(extract("[1, 2]").is_err());
        assert!(extract_array(r#"{"a":1}"#).is_err());
        assert!(extract("42").is_err());
    }

    #[test]
    fn test_array_variant() {
        let text = "Resultado:\n```json\n[{\"review\":\"ok\",\"sentiment\":\"neutral\"}]\n```";
        assert_eq!(
            extract_array(text).unwrap(),
            json!([{"review": "ok", "sentiment": "neutral"}])
        );
        assert_eq!(
            extract_array("lista: [1, 2, 3].").unwrap(),
            json!([1, 2, 3])
        );
    }

    #[test]
    fn test_unterminated_fence_falls_through_to_brackets() {
        let text = "```json\n{\"a\": 2}";
        assert_eq!(extract(text).unwrap(), json!({"a": 2}));
    }

    #[test]
    fn test_error_display_mentions_shape() {
        let err = extract_array("nada").unwrap_err();
        assert_eq!(err.to_string(), "no JSON array found in response (4 chars)");
    }
}
