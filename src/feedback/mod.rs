//! Customer feedback: review tables, local keyword sentiment and the remote
//! summary and classification calls.

pub mod remote;
mod reviews;
mod sentiment;

pub use remote::{score_or_local, score_sentiment, summarize_or_local, summarize_reviews};
pub use reviews::{ReviewTable, TEXT_COLUMN_CANDIDATES};
pub use sentiment::{keyword_score, score, summarize, ReviewRecord, Sentiment, REVIEW_TEXT_LIMIT};
