//! Shape guarantees for product-description responses.

use crate::text::extract::{extract, ExtractionError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Product copy ready for display.
///
/// `bullets` and `hashtags` are always concrete lists, whatever the upstream
/// sent. `raw` holds the verbatim upstream text when there was one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptionResult {
    /// Short description (80-120 characters requested).
    pub short: String,
    /// Long SEO description.
    pub long: String,
    /// Benefit bullets, in upstream order.
    pub bullets: Vec<String>,
    /// Hashtags, each starting with `#` when split from a string.
    pub hashtags: Vec<String>,
    /// Verbatim upstream text, for diagnostics.
    #[serde(default)]
    pub raw: String,
}

impl DescriptionResult {
    /// Extracts and normalizes an upstream response. Never fails: if no JSON
    /// can be recovered, every field is empty except `raw`.
    pub fn from_response(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        match Self::try_from_response(&raw) {
            Ok(result) => result,
            Err(err) => {
                tracing::debug!(error = %err, "description response had no usable JSON");
                Self {
                    raw,
                    ..Self::default()
                }
            }
        }
    }

    /// Like [`from_response`](Self::from_response) but reports when the text
    /// contained no parseable JSON at all.
    pub fn try_from_response(raw: &str) -> Result<Self, ExtractionError> {
        let value = extract(raw)?;
        Ok(Self {
            raw: raw.to_string(),
            ..normalize(&value)
        })
    }

    /// Returns true when no display field carries content.
    pub fn is_empty(&self) -> bool {
        self.short.is_empty()
            && self.long.is_empty()
            && self.bullets.is_empty()
            && self.hashtags.is_empty()
    }
}

/// Coerces a loosely structured value into a [`DescriptionResult`].
///
/// Missing fields default to empty, string-valued `bullets` and `hashtags`
/// are split into lists, list elements are trimmed and empties dropped.
/// `raw` is left empty. A non-object value yields the empty result.
pub fn normalize(value: &Value) -> DescriptionResult {
    let Some(obj) = value.as_object() else {
        return DescriptionResult::default();
    };

    let bullets = match obj.get("bullets") {
        Some(Value::String(s)) => split_bullets(s),
        other => string_list(other),
    };
    let hashtags = match obj.get("hashtags") {
        Some(Value::String(s)) => split_hashtags(s),
        other => string_list(other),
    };

    DescriptionResult {
        short: text_field(obj.get("short")),
        long: text_field(obj.get("long")),
        bullets,
        hashtags,
        raw: String::new(),
    }
}

fn text_field(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(v @ (Value::Number(_) | Value::Bool(_))) => v.to_string(),
        _ => String::new(),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(_) | Value::Bool(_) => value.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(scalar_text).collect(),
        Some(v) => scalar_text(v).into_iter().collect(),
        None => Vec::new(),
    }
}

fn split_bullets(s: &str) -> Vec<String> {
    s.split(['\n', '•', '-', ';'])
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

fn split_hashtags(s: &str) -> Vec<String> {
    s.split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|t| t.starts_with('#'))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_fields_default_to_empty() {
        let out = normalize(&json!({}));
        assert_eq!(out, DescriptionResult::default());
        assert!(out.is_empty());
    }

    #[test]
    fn test_bullets_string_is_split() {
        let out = normalize(&json!({"bullets": "a; b; c"}));
        assert_eq!(out.bullets, vec!["a", "b", "c"]);

        let out = normalize(&json!({"bullets": "• Rico en fibra\n• Sin azúcar\n\n- Práctico"}));
        assert_eq!(out.bullets, vec!["Rico en fibra", "Sin azúcar", "Práctico"]);
    }

    #[test]
    fn test_hashtags_string_keeps_only_tags() {
        let out = normalize(&json!({"hashtags": "#a #b c"}));
        assert_eq!(out.hashtags, vec!["#a", "#b"]);

        let out = normalize(&json!({"hashtags": "#Snack,#Quinoa ,, saludable"}));
        assert_eq!(out.hashtags, vec!["#Snack", "#Quinoa"]);
    }

    #[test]
    fn test_list_elements_are_coerced_and_trimmed() {
        let out = normalize(&json!({
            "bullets": ["  uno ", "", 2, null, true, ["x"], "   "],
            "hashtags": [" #a", "#b "]
        }));
        assert_eq!(out.bullets, vec!["uno", "2", "true"]);
        assert_eq!(out.hashtags, vec!["#a", "#b"]);
    }

    #[test]
    fn test_list_order_is_preserved() {
        let out = normalize(&json!({"bullets": ["z", "a", "m"]}));
        assert_eq!(out.bullets, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_odd_field_types() {
        let out = normalize(&json!({
            "short": 12,
            "long": null,
            "bullets": 7,
            "hashtags": {"tag": "#x"}
        }));
        assert_eq!(out.short, "12");
        assert_eq!(out.long, "");
        assert_eq!(out.bullets, vec!["7"]);
        assert!(out.hashtags.is_empty());
    }

    #[test]
    fn test_non_object_is_empty() {
        assert_eq!(normalize(&json!([1, 2])), DescriptionResult::default());
        assert_eq!(normalize(&json!("text")), DescriptionResult::default());
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let inputs = [
            json!({"short": "s", "long": "l", "bullets": "a;b", "hashtags": "#x y #z"}),
            json!({"bullets": [" a ", 3]}),
            json!({}),
        ];
        for input in inputs {
            let once = normalize(&input);
            let twice = normalize(&serde_json::to_value(&once).unwrap());
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_well_formed_round_trip() {
        let upstream = json!({
            "short": "Snack de quinoa crocante",
            "long": "Disfruta un snack hecho con quinoa peruana.",
            "bullets": ["Alto en fibra", "Sin azúcar añadida"],
            "hashtags": ["#Quinoa", "#Snack"]
        });
        let raw = upstream.to_string();
        let out = DescriptionResult::from_response(raw.clone());

        assert_eq!(out.short, "Snack de quinoa crocante");
        assert_eq!(out.long, "Disfruta un snack hecho con quinoa peruana.");
        assert_eq!(out.bullets, vec!["Alto en fibra", "Sin azúcar añadida"]);
        assert_eq!(out.hashtags, vec!["#Quinoa", "#Snack"]);
        assert_eq!(out.raw, raw);
    }

    #[test]
    fn test_unparseable_response_keeps_raw() {
        let out = DescriptionResult::from_response("Lo siento, no puedo ayudar.");
        assert!(out.is_empty());
        assert_eq!(out.raw, "Lo siento, no puedo ayudar.");

        assert!(DescriptionResult::try_from_response("Lo siento").is_err());
    }

    #[test]
    fn test_fenced_response_is_normalized() {
        let text = "Aquí está:\n```json\n{\"short\":\"Hola\",\"bullets\":\"uno\\ndos\"}\n```";
        let out = DescriptionResult::from_response(text);
        assert_eq!(out.short, "Hola");
        assert_eq!(out.bullets, vec!["uno", "dos"]);
        assert_eq!(out.raw, text);
    }
}
