#![warn(missing_docs)]
//! IAGen - Marketing copy, feedback analysis and promo creatives for
//! consumer-goods products.
//!
//! Remote generation goes through Gemini. Every remote operation has a
//! deterministic local counterpart, and model output is never trusted to be
//! well formed: answers are run through a tolerant JSON extractor and a
//! normalizer that always yields the same shape.
//!
//! # Quick Start - Descriptions
//!
//! ```no_run
//! use iagen::{copy, Channel, DescriptionRequest, GeminiConfig, GeminiTextProvider};
//!
//! #[tokio::main]
//! async fn main() -> iagen::Result<()> {
//!     let provider = GeminiTextProvider::connect(&GeminiConfig::from_env()).await?;
//!     let request = DescriptionRequest::new(
//!         "Snack Saludable Quinoa 120 g",
//!         "sabor: coco; sin azúcar",
//!         Channel::Ecommerce,
//!     );
//!     let description = copy::describe(&provider, &request).await?;
//!     println!("{}", description.short);
//!     Ok(())
//! }
//! ```
//!
//! # Quick Start - Local Only
//!
//! ```
//! use iagen::{feedback, parse_attributes, Sentiment};
//!
//! let attrs = parse_attributes("peso: 120 g; sabor: coco");
//! assert_eq!(attrs.get("sabor"), Some("coco"));
//!
//! let records = feedback::score(&["Delicioso", "Llegó tarde y caro"]);
//! assert_eq!(records[0].sentiment, Sentiment::Positive);
//! assert_eq!(records[1].sentiment, Sentiment::Negative);
//! ```
//!
//! # Features
//!
//! - `gemini`: Gemini text provider (public API key or Vertex AI)
//! - `creative`: Promotional creative compositing (`image`, `imageproc`, `ab_glyph`)
//! - `cli`: Command-line interface

mod error;

pub mod config;
pub mod copy;
pub mod fallback;
pub mod feedback;
pub mod llm;
pub mod text;

#[cfg(feature = "creative")]
pub mod creative;

// Re-export error types at crate root
pub use error::{IaGenError, Result};

pub use config::{GeminiBackend, GeminiConfig};
pub use copy::{Channel, DescriptionRequest};
pub use fallback::{FailureKind, Outcome};
pub use feedback::{ReviewRecord, ReviewTable, Sentiment};
pub use text::{
    extract, extract_array, normalize, parse_attributes, AttributeMap, DescriptionResult,
    ExtractionError,
};

pub use llm::{
    GeneratedText, InlineImage, SamplingParams, TextMetadata, TextProvider, TextProviderExt,
    TextProviderKind, TextRequest,
};

#[cfg(feature = "gemini")]
pub use llm::{GeminiTextProvider, GeminiTextProviderBuilder};

#[cfg(feature = "creative")]
pub use creative::{
    Background, CanvasFormat, Creative, CreativeBrief, CreativeFont, CreativeLayout,
};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{IaGenError, Result};
    pub use crate::fallback::Outcome;
    pub use crate::llm::{TextProvider, TextProviderExt, TextRequest};
    pub use crate::text::DescriptionResult;

    #[cfg(feature = "gemini")]
    pub use crate::llm::GeminiTextProvider;

    #[cfg(feature = "gemini")]
    pub use crate::config::GeminiConfig;
}
