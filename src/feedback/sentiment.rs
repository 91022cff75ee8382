//! Keyword-based sentiment fallback for customer reviews.
//!
//! Used when the remote classifier is unavailable. Each review is lowercased
//! and scored +1 per positive marker phrase it contains and -1 per negative
//! one; the sign of the total is the label. Only lowercasing is applied, so
//! unaccented spellings such as "pesimo" do not match "pésimo".

use serde::{Deserialize, Deserializer, Serialize};

/// Maximum characters of review text kept in a locally scored record.
pub const REVIEW_TEXT_LIMIT: usize = 120;

const POSITIVE: &[&str] = &[
    "bueno",
    "excelente",
    "rico",
    "delicioso",
    "me encanta",
    "recomendado",
    "perfecto",
    "genial",
    "sabroso",
    "agradable",
];

const NEGATIVE: &[&str] = &[
    "malo",
    "horrible",
    "feo",
    "asqueroso",
    "no me gusta",
    "pésimo",
    "defecto",
    "tardó",
    "caro",
];

/// Review polarity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    /// Net positive.
    Positive,
    /// Net negative.
    Negative,
    /// No signal, or signals cancel out.
    #[default]
    Neutral,
}

impl Sentiment {
    /// Returns the label as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }

    /// Parses an English or Spanish label, case-insensitively.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "positive" | "positivo" | "positiva" => Some(Self::Positive),
            "negative" | "negativo" | "negativa" => Some(Self::Negative),
            "neutral" | "neutro" | "neutra" => Some(Self::Neutral),
            _ => None,
        }
    }

    fn from_score(score: i32) -> Self {
        match score {
            s if s > 0 => Self::Positive,
            s if s < 0 => Self::Negative,
            _ => Self::Neutral,
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl<'de> Deserialize<'de> for Sentiment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Self::from_label(&label)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown sentiment label: {label}")))
    }
}

/// One classified review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRecord {
    /// Review text, possibly truncated for display.
    pub text: String,
    /// Polarity label.
    pub sentiment: Sentiment,
    /// Short explanation, when the classifier gave one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
}

/// Returns the first `limit` characters of `text`.
pub(crate) fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

/// Net keyword score of a single review.
pub fn keyword_score(review: &str) -> i32 {
    let lower = review.to_lowercase();
    let hits = |phrases: &[&str]| phrases.iter().filter(|p| lower.contains(*p)).count() as i32;
    hits(POSITIVE) - hits(NEGATIVE)
}

/// Classifies every review locally. Always returns one record per input.
pub fn score<S: AsRef<str>>(reviews: &[S]) -> Vec<ReviewRecord> {
    reviews
        .iter()
        .map(|r| {
            let review = r.as_ref();
            ReviewRecord {
                text: truncate_chars(review, REVIEW_TEXT_LIMIT),
                sentiment: Sentiment::from_score(keyword_score(review)),
                rationale: None,
            }
        })
        .collect()
}

/// Placeholder summary reporting how many reviews were processed.
pub fn summarize<S: AsRef<str>>(reviews: &[S]) -> String {
    format!("{} comentarios analizados.", reviews.len())
}
