//! Review summaries and sentiment classification with the remote model.

use crate::error::Result;
use crate::fallback::Outcome;
use crate::feedback::sentiment::{self, truncate_chars, ReviewRecord, Sentiment};
use crate::llm::{SamplingParams, TextProvider, TextRequest};
use crate::text::extract_array;
use serde_json::Value;

/// Reviews included in a summary prompt.
pub const SUMMARY_REVIEW_LIMIT: usize = 300;
/// Reviews included in a classification prompt.
pub const CLASSIFY_REVIEW_LIMIT: usize = 200;
/// Characters kept from a review in a placeholder record.
pub const PLACEHOLDER_TEXT_LIMIT: usize = 160;

const SUMMARY_PARAMS: SamplingParams = SamplingParams::new(0.4, 0.9, 512);
const CLASSIFY_PARAMS: SamplingParams = SamplingParams::new(0.2, 0.9, 2048);

fn reviews_json<S: AsRef<str>>(reviews: &[S], limit: usize) -> String {
    let slice: Vec<&str> = reviews.iter().take(limit).map(AsRef::as_ref).collect();
    // A list of strings always serializes
    serde_json::to_string(&slice).unwrap_or_else(|_| "[]".to_string())
}

/// Builds the summary prompt.
pub fn summary_prompt<S: AsRef<str>>(reviews: &[S]) -> String {
    format!(
        "Eres un analista de CX para consumo masivo en Perú.\n\
         Te paso una lista de comentarios de clientes (JSON). Devuélveme un resumen breve con:\n\
         - 3 a 5 bullets de hallazgos clave (positivos/negativos)\n\
         - 1 recomendación accionable para marketing/comercial\n\
         Responde en español, conciso.\n\n\
         COMENTARIOS_JSON:\n{}",
        reviews_json(reviews, SUMMARY_REVIEW_LIMIT)
    )
}

/// Builds the classification prompt.
pub fn classify_prompt<S: AsRef<str>>(reviews: &[S]) -> String {
    format!(
        "Clasifica cada review en: positivo, negativo o neutral. \
         Devuelve SOLO JSON válido: una lista de objetos \
         {{\"review\":\"...\", \"sentiment\":\"positivo|negativo|neutral\", \"rationale\":\"breve motivo\"}}\n\
         REVIEWS_JSON:\n{}",
        reviews_json(reviews, CLASSIFY_REVIEW_LIMIT)
    )
}

/// Short findings-and-recommendation summary written by the remote model.
pub async fn summarize_reviews<P, S>(provider: &P, reviews: &[S]) -> Result<String>
where
    P: TextProvider + ?Sized,
    S: AsRef<str>,
{
    let request = TextRequest::new(summary_prompt(reviews)).with_params(SUMMARY_PARAMS);
    Ok(provider.generate(&request).await?.text)
}

/// Per-review sentiment from the remote model.
///
/// Upstream failures are returned as errors. An answer without a JSON list
/// yields one neutral placeholder per input review instead.
pub async fn score_sentiment<P, S>(provider: &P, reviews: &[S]) -> Result<Vec<ReviewRecord>>
where
    P: TextProvider + ?Sized,
    S: AsRef<str>,
{
    let request = TextRequest::new(classify_prompt(reviews)).with_params(CLASSIFY_PARAMS);
    let generated = provider.generate(&request).await?;
    Ok(parse_classification(&generated.text, reviews))
}

/// Converts a classification answer into records, substituting placeholders
/// when no JSON list can be recovered.
pub fn parse_classification<S: AsRef<str>>(text: &str, reviews: &[S]) -> Vec<ReviewRecord> {
    match extract_array(text) {
        Ok(Value::Array(items)) => items.iter().filter_map(record_from_value).collect(),
        Ok(_) => placeholders(reviews),
        Err(err) => {
            tracing::warn!(error = %err, reviews = reviews.len(), "classification answer unparseable");
            placeholders(reviews)
        }
    }
}

/// One neutral record per review, used when classification output is unusable.
pub fn placeholders<S: AsRef<str>>(reviews: &[S]) -> Vec<ReviewRecord> {
    reviews
        .iter()
        .map(|r| ReviewRecord {
            text: truncate_chars(r.as_ref(), PLACEHOLDER_TEXT_LIMIT),
            sentiment: Sentiment::Neutral,
            rationale: Some(String::new()),
        })
        .collect()
}

fn record_from_value(value: &Value) -> Option<ReviewRecord> {
    let obj = value.as_object()?;
    let field = |names: &[&str]| {
        names
            .iter()
            .find_map(|n| obj.get(*n).and_then(Value::as_str))
            .map(str::trim)
            .map(str::to_string)
    };

    let Some(text) = field(&["review", "text", "comentario"]) else {
        tracing::debug!(%value, "dropping classification item without review text");
        return None;
    };
    let sentiment = field(&["sentiment", "sentimiento"])
        .and_then(|label| Sentiment::from_label(&label))
        .unwrap_or_default();

    Some(ReviewRecord {
        text,
        sentiment,
        rationale: field(&["rationale", "motivo"]),
    })
}

/// Remote summary, or the local count summary when the call fails.
pub async fn summarize_or_local<P, S>(provider: Option<&P>, reviews: &[S]) -> Outcome<String>
where
    P: TextProvider + ?Sized,
    S: AsRef<str>,
{
    match provider {
        Some(provider) => Outcome::from_result(summarize_reviews(provider, reviews).await, || {
            sentiment::summarize(reviews)
        }),
        None => Outcome::unconfigured(sentiment::summarize(reviews)),
    }
}

/// Remote classification, or the local keyword scorer when the call fails.
pub async fn score_or_local<P, S>(provider: Option<&P>, reviews: &[S]) -> Outcome<Vec<ReviewRecord>>
where
    P: TextProvider + ?Sized,
    S: AsRef<str>,
{
    match provider {
        Some(provider) => Outcome::from_result(score_sentiment(provider, reviews).await, || {
            sentiment::score(reviews)
        }),
        None => Outcome::unconfigured(sentiment::score(reviews)),
    }
}
