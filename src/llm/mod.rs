//! Remote text generation.

#[cfg(feature = "gemini")]
mod gemini;
mod provider;
mod types;

#[cfg(feature = "gemini")]
pub use gemini::{GeminiTextProvider, GeminiTextProviderBuilder};
pub use provider::{TextProvider, TextProviderExt};
pub use types::{
    GeneratedText, InlineImage, SamplingParams, TextMetadata, TextProviderKind, TextRequest,
};

#[cfg(test)]
pub(crate) use provider::testing;
