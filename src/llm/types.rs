//! Core types for remote text generation.

use serde::{Deserialize, Serialize};

/// Text provider kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextProviderKind {
    /// Google Gemini through the public Generative Language API.
    Gemini,
    /// Google Gemini through Vertex AI.
    Vertex,
    /// In-process provider (tests, offline runs).
    Local,
}

impl std::fmt::Display for TextProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gemini => write!(f, "gemini"),
            Self::Vertex => write!(f, "vertex"),
            Self::Local => write!(f, "local"),
        }
    }
}

/// An image attached to a text request (e.g., a product packshot).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    /// Raw image bytes.
    pub data: Vec<u8>,
    /// MIME type sent upstream.
    pub mime_type: String,
}

impl InlineImage {
    /// Wraps image bytes, detecting PNG/WebP from magic bytes and defaulting
    /// to JPEG.
    pub fn new(data: Vec<u8>) -> Self {
        let mime_type = detect_image_mime(&data).to_string();
        Self { data, mime_type }
    }
}

fn detect_image_mime(data: &[u8]) -> &'static str {
    if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
        "image/png"
    } else if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
        "image/webp"
    } else {
        "image/jpeg"
    }
}

/// Sampling parameters for a generation call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingParams {
    /// Sampling temperature.
    pub temperature: f32,
    /// Nucleus sampling mass.
    pub top_p: f32,
    /// Upper bound on generated tokens.
    pub max_output_tokens: u32,
}

impl SamplingParams {
    /// Creates sampling parameters.
    pub const fn new(temperature: f32, top_p: f32, max_output_tokens: u32) -> Self {
        Self {
            temperature,
            top_p,
            max_output_tokens,
        }
    }
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self::new(0.9, 0.95, 1024)
    }
}

/// A request to generate text.
#[derive(Debug, Clone)]
pub struct TextRequest {
    /// The prompt.
    pub prompt: String,
    /// Images sent after the prompt.
    pub images: Vec<InlineImage>,
    /// Sampling parameters.
    pub params: SamplingParams,
}

impl TextRequest {
    /// Creates a request with default sampling parameters.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            images: Vec::new(),
            params: SamplingParams::default(),
        }
    }

    /// Sets the sampling parameters.
    pub fn with_params(mut self, params: SamplingParams) -> Self {
        self.params = params;
        self
    }

    /// Attaches an image.
    pub fn with_image(mut self, image: InlineImage) -> Self {
        self.images.push(image);
        self
    }
}

/// Metadata about a generation call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextMetadata {
    /// Model used for generation.
    pub model: Option<String>,
    /// Generation duration in milliseconds.
    pub duration_ms: Option<u64>,
    /// Upstream finish reason (e.g., `STOP`, `MAX_TOKENS`).
    pub finish_reason: Option<String>,
}

/// Generated text with its metadata.
#[derive(Debug, Clone)]
pub struct GeneratedText {
    /// Trimmed text of the response; may be empty.
    pub text: String,
    /// Provider that answered.
    pub provider: TextProviderKind,
    /// Generation metadata.
    pub metadata: TextMetadata,
}

impl GeneratedText {
    /// Creates generated text, trimming surrounding whitespace.
    pub fn new(text: impl AsRef<str>, provider: TextProviderKind, metadata: TextMetadata) -> Self {
        Self {
            text: text.as_ref().trim().to_string(),
            provider,
            metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_image_mime_detection() {
        let png = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
        assert_eq!(InlineImage::new(png).mime_type, "image/png");

        let webp = b"RIFF\x00\x00\x00\x00WEBP".to_vec();
        assert_eq!(InlineImage::new(webp).mime_type, "image/webp");

        let jpeg = vec![0xFF, 0xD8, 0xFF, 0xE0];
        assert_eq!(InlineImage::new(jpeg).mime_type, "image/jpeg");
        assert_eq!(InlineImage::new(Vec::new()).mime_type, "image/jpeg");
    }

    #[test]
    fn test_request_builder() {
        let req = TextRequest::new("hola")
            .with_params(SamplingParams::new(0.2, 0.9, 2048))
            .with_image(InlineImage::new(vec![1, 2, 3]));
        assert_eq!(req.prompt, "hola");
        assert_eq!(req.params.max_output_tokens, 2048);
        assert_eq!(req.images.len(), 1);
    }

    #[test]
    fn test_default_params() {
        let p = SamplingParams::default();
        assert_eq!(p.temperature, 0.9);
        assert_eq!(p.top_p, 0.95);
        assert_eq!(p.max_output_tokens, 1024);
    }

    #[test]
    fn test_generated_text_is_trimmed() {
        let out = GeneratedText::new("  {}\n", TextProviderKind::Local, TextMetadata::default());
        assert_eq!(out.text, "{}");
        assert_eq!(out.provider.to_string(), "local");
    }
}
