//! Text provider trait and utilities.

use crate::error::Result;
use crate::llm::types::{GeneratedText, TextProviderKind, TextRequest};
use async_trait::async_trait;

/// Trait for remote text generation providers.
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Generates text for the given request.
    async fn generate(&self, request: &TextRequest) -> Result<GeneratedText>;

    /// Returns the kind of this provider.
    fn kind(&self) -> TextProviderKind;

    /// Returns the name of this provider for display.
    fn name(&self) -> &str {
        match self.kind() {
            TextProviderKind::Gemini => "Gemini (Generative Language API)",
            TextProviderKind::Vertex => "Gemini (Vertex AI)",
            TextProviderKind::Local => "Local",
        }
    }

    /// Checks if the provider is reachable and authenticated.
    async fn health_check(&self) -> Result<()>;
}

/// Extension trait for providers with retry logic.
#[async_trait]
pub trait TextProviderExt: TextProvider {
    /// Generates with automatic retries on transient failures.
    async fn generate_with_retries(
        &self,
        request: &TextRequest,
        max_retries: u32,
    ) -> Result<GeneratedText> {
        let mut attempt = 0;
        loop {
            match self.generate(request).await {
                Ok(text) => return Ok(text),
                Err(e) if e.is_retryable() && attempt < max_retries => {
                    attempt += 1;
                    let delay = e.retry_after().unwrap_or(std::time::Duration::from_secs(1));
                    tracing::warn!(
                        attempt,
                        max_retries,
                        delay_ms = delay.as_millis() as u64,
                        "retrying after transient error: {e}"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl<T: TextProvider + ?Sized> TextProviderExt for T {}
