//! Gemini (Google) text generation provider.

use crate::config::{GeminiBackend, GeminiConfig, DEFAULT_LOCATION, DEFAULT_MODEL};
use crate::error::{parse_retry_after, sanitize_error_message, IaGenError, Result};
use crate::llm::provider::TextProvider;
use crate::llm::types::{GeneratedText, TextMetadata, TextProviderKind, TextRequest};
use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

const PUBLIC_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// gcloud access tokens live for an hour; refresh well before that.
const TOKEN_TTL: Duration = Duration::from_secs(45 * 60);

const HARM_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_HARASSMENT",
];

/// Builder for GeminiTextProvider.
#[derive(Clone, Default)]
pub struct GeminiTextProviderBuilder {
    api_key: Option<String>,
    model: Option<String>,
    backend: Option<GeminiBackend>,
    project: Option<String>,
    location: Option<String>,
    timeout: Option<Duration>,
}

impl GeminiTextProviderBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from a resolved configuration.
    pub fn from_config(config: &GeminiConfig) -> Result<Self> {
        Ok(Self::new()
            .backend(config.resolve()?)
            .model(config.model.clone()))
    }

    /// Sets the API key (public backend).
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the model identifier.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Explicitly sets the backend.
    pub fn backend(mut self, backend: GeminiBackend) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Sets the GCP project ID (implies Vertex AI backend).
    pub fn project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    /// Sets the GCP location (implies Vertex AI backend, defaults to "global").
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Sets the per-request timeout (default 60 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the provider, resolving the backend.
    pub fn build(self) -> Result<GeminiTextProvider> {
        let backend = if let Some(b) = self.backend {
            b
        } else if let Some(project) = self.project {
            GeminiBackend::Vertex {
                project,
                location: self
                    .location
                    .unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
            }
        } else if let Some(api_key) = self.api_key {
            GeminiBackend::Public { api_key }
        } else {
            return Err(IaGenError::Auth(
                "no API key or GCP project provided for Gemini".into(),
            ));
        };

        let timeout = self.timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT);
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(GeminiTextProvider {
            client,
            backend,
            model: self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            timeout,
            token: TokenCache::new(TOKEN_TTL),
        })
    }
}

/// Gemini text generation provider.
pub struct GeminiTextProvider {
    client: reqwest::Client,
    backend: GeminiBackend,
    model: String,
    timeout: Duration,
    token: TokenCache,
}

/// A bearer token shared by every request of one provider.
struct TokenCache {
    ttl: Duration,
    slot: Mutex<Option<(String, Instant)>>,
}

impl TokenCache {
    fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: Mutex::new(None),
        }
    }

    /// Returns the cached token, running `fetch` when there is none or it
    /// has expired. Concurrent callers wait for a single fetch.
    async fn get_or_fetch<F, Fut>(&self, fetch: F) -> Result<String>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String>>,
    {
        let mut slot = self.slot.lock().await;
        if let Some((token, fetched)) = slot.as_ref() {
            if fetched.elapsed() < self.ttl {
                return Ok(token.clone());
            }
        }
        let token = fetch().await?;
        *slot = Some((token.clone(), Instant::now()));
        Ok(token)
    }

    async fn invalidate(&self) {
        self.slot.lock().await.take();
    }
}

/// Get a bearer token by running `gcloud auth print-access-token`.
async fn gcloud_access_token() -> Result<String> {
    let output = tokio::process::Command::new("gcloud")
        .args(["auth", "print-access-token"])
        .output()
        .await
        .map_err(|e| {
            IaGenError::Auth(format!(
                "Failed to run gcloud CLI: {}. Install it from https://cloud.google.com/sdk/docs/install",
                e
            ))
        })?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(IaGenError::Auth(format!("gcloud auth failed: {}", stderr.trim())));
    }
    tracing::debug!("fetched gcloud access token");
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Maps a transport failure, keeping timeouts distinct from other network errors.
fn transport_error(err: reqwest::Error, timeout: Duration) -> IaGenError {
    if err.is_timeout() {
        IaGenError::Timeout(timeout)
    } else {
        IaGenError::Network(err)
    }
}

fn vertex_host(location: &str) -> String {
    if location == "global" {
        "aiplatform.googleapis.com".to_string()
    } else {
        format!("{location}-aiplatform.googleapis.com")
    }
}

impl GeminiTextProvider {
    /// Creates a new `GeminiTextProviderBuilder`.
    pub fn builder() -> GeminiTextProviderBuilder {
        GeminiTextProviderBuilder::new()
    }

    /// Resolves the configured backend and verifies it.
    ///
    /// A Vertex backend that fails its health check is replaced by the public
    /// API when the config carries a key; otherwise the failure is returned
    /// as [`IaGenError::Auth`].
    pub async fn connect(config: &GeminiConfig) -> Result<Self> {
        let provider = GeminiTextProviderBuilder::from_config(config)?.build()?;
        if !matches!(provider.backend, GeminiBackend::Vertex { .. }) {
            return Ok(provider);
        }

        match provider.health_check().await {
            Ok(()) => Ok(provider),
            Err(err) => match config.public_fallback() {
                Some(public) => {
                    tracing::warn!(error = %err, "Vertex AI unavailable, using public Gemini API");
                    GeminiTextProviderBuilder::new()
                        .backend(public)
                        .model(config.model.clone())
                        .build()
                }
                None => Err(IaGenError::Auth(format!(
                    "could not authenticate with Vertex AI ({err}); check gcloud credentials, \
                     IAM roles and billing, or set GOOGLE_API_KEY for the public API"
                ))),
            },
        }
    }

    /// Returns a reference to the active backend.
    pub fn backend(&self) -> &GeminiBackend {
        &self.backend
    }

    /// Returns the model identifier.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn model_url(&self) -> String {
        match &self.backend {
            GeminiBackend::Public { .. } => format!("{PUBLIC_BASE_URL}/models/{}", self.model),
            GeminiBackend::Vertex { project, location } => format!(
                "https://{}/v1/projects/{project}/locations/{location}/publishers/google/models/{}",
                vertex_host(location),
                self.model,
            ),
        }
    }

    async fn authorize(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::RequestBuilder> {
        Ok(match &self.backend {
            GeminiBackend::Public { api_key } => builder.header("x-goog-api-key", api_key),
            GeminiBackend::Vertex { .. } => {
                let token = self.token.get_or_fetch(gcloud_access_token).await?;
                builder.header("Authorization", format!("Bearer {}", token))
            }
        })
    }

    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let response = self
            .authorize(builder)
            .await?
            .send()
            .await
            .map_err(|e| transport_error(e, self.timeout))?;
        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            self.token.invalidate().await;
        }
        Ok(response)
    }

    async fn generate_impl(&self, request: &TextRequest) -> Result<GeneratedText> {
        let start = Instant::now();

        let url = format!("{}:generateContent", self.model_url());
        let body = GeminiRequest::from_text_request(request);

        tracing::debug!(
            model = %self.model,
            backend = self.backend.label(),
            images = request.images.len(),
            "sending generateContent request"
        );

        let response = self
            .send(
                self.client
                    .post(&url)
                    .header("Content-Type", "application/json")
                    .json(&body),
            )
            .await?;

        let status = response.status();
        if !status.is_success() {
            let headers = response.headers().clone();
            let text = response.text().await.unwrap_or_default();
            return Err(self.parse_error(status.as_u16(), &text, &headers));
        }

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| transport_error(e, self.timeout))?;
        let (text, finish_reason) = gemini_response.into_text()?;

        let duration_ms = start.elapsed().as_millis() as u64;
        tracing::debug!(duration_ms, chars = text.len(), "generateContent complete");

        Ok(GeneratedText::new(
            text,
            self.kind(),
            TextMetadata {
                model: Some(self.model.clone()),
                duration_ms: Some(duration_ms),
                finish_reason,
            },
        ))
    }

    fn parse_error(
        &self,
        status: u16,
        text: &str,
        headers: &reqwest::header::HeaderMap,
    ) -> IaGenError {
        let text = sanitize_error_message(text);
        if status == 402 {
            return IaGenError::Billing(
                "Gemini billing issue: enable billing for the project or key".into(),
            );
        }
        if status == 404 {
            return IaGenError::InvalidRequest(format!(
                "Model '{}' not found. Verify the model name is correct.",
                self.model
            ));
        }
        if status == 429 {
            let retry_after = parse_retry_after(headers).map(std::time::Duration::from_secs);
            return IaGenError::RateLimited { retry_after };
        }
        if status == 401 || status == 403 {
            return IaGenError::Auth(text);
        }
        let lower = text.to_lowercase();
        if lower.contains("safety")
            || lower.contains("blocked")
            || lower.contains("prohibited")
        {
            return IaGenError::ContentBlocked(text);
        }
        IaGenError::Api {
            status,
            message: text,
        }
    }
}

#[async_trait]
impl TextProvider for GeminiTextProvider {
    async fn generate(&self, request: &TextRequest) -> Result<GeneratedText> {
        self.generate_impl(request).await
    }

    fn kind(&self) -> TextProviderKind {
        match self.backend {
            GeminiBackend::Public { .. } => TextProviderKind::Gemini,
            GeminiBackend::Vertex { .. } => TextProviderKind::Vertex,
        }
    }

    async fn health_check(&self) -> Result<()> {
        let response = self.send(self.client.get(self.model_url())).await?;

        match response.status().as_u16() {
            401 | 403 => Err(IaGenError::Auth(match self.backend {
                GeminiBackend::Public { .. } => "Invalid API key".into(),
                GeminiBackend::Vertex { .. } => {
                    "Vertex AI auth failed. Run `gcloud auth login` and verify project access."
                        .into()
                }
            })),
            404 => Err(IaGenError::InvalidRequest(format!(
                "Model '{}' not found. Verify the model name is correct.",
                self.model
            ))),
            s if !(200..300).contains(&s) => Err(IaGenError::Api {
                status: s,
                message: "Health check failed".into(),
            }),
            _ => Ok(()),
        }
    }
}

// Request/Response types
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GeminiGenerationConfig,
    safety_settings: Vec<SafetySetting>,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    role: &'static str,
    parts: Vec<GeminiRequestPart>,
}

/// A part in a Gemini request - can be text or inline image data.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum GeminiRequestPart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: GeminiInlineData,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiInlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    temperature: f32,
    top_p: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Serialize)]
struct SafetySetting {
    category: &'static str,
    threshold: &'static str,
}

impl GeminiRequest {
    fn from_text_request(req: &TextRequest) -> Self {
        let mut parts = vec![GeminiRequestPart::Text {
            text: req.prompt.clone(),
        }];

        parts.extend(req.images.iter().map(|image| GeminiRequestPart::InlineData {
            inline_data: GeminiInlineData {
                mime_type: image.mime_type.clone(),
                data: base64::engine::general_purpose::STANDARD.encode(&image.data),
            },
        }));

        Self {
            contents: vec![GeminiContent {
                role: "user",
                parts,
            }],
            generation_config: GeminiGenerationConfig {
                temperature: req.params.temperature,
                top_p: req.params.top_p,
                max_output_tokens: req.params.max_output_tokens,
            },
            safety_settings: HARM_CATEGORIES
                .iter()
                .map(|&category| SafetySetting {
                    category,
                    threshold: "BLOCK_NONE",
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContentResponse>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
    #[serde(default)]
    block_reason_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiContentResponse {
    #[serde(default)]
    parts: Vec<GeminiPartResponse>,
}

#[derive(Debug, Deserialize)]
struct GeminiPartResponse {
    #[serde(default)]
    text: Option<String>,
}

impl GeminiResponse {
    /// Concatenated text of the first candidate plus its finish reason.
    fn into_text(self) -> Result<(String, Option<String>)> {
        // Prompt blocks come back as HTTP 200
        if let Some(feedback) = self.prompt_feedback {
            if let Some(reason) = feedback.block_reason {
                let msg = feedback
                    .block_reason_message
                    .unwrap_or_else(|| format!("Prompt blocked: {}", reason));
                return Err(IaGenError::ContentBlocked(msg));
            }
        }

        let candidate = self.candidates.into_iter().next().ok_or_else(|| {
            IaGenError::UnexpectedResponse("No candidates in Gemini response".into())
        })?;

        if let Some(reason) = candidate.finish_reason.as_deref() {
            if matches!(
                reason,
                "SAFETY" | "RECITATION" | "PROHIBITED_CONTENT" | "BLOCKLIST" | "SPII"
            ) {
                return Err(IaGenError::ContentBlocked(format!(
                    "Content blocked by Gemini safety filter: {}",
                    reason
                )));
            }
        }

        let text = candidate
            .content
            .map(|c| {
                c.parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<String>()
            })
            .unwrap_or_default();

        Ok((text, candidate.finish_reason))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::types::{InlineImage, SamplingParams};

    #[test]
    fn test_builder_with_explicit_key() {
        let provider = GeminiTextProviderBuilder::new().api_key("test-key").build();
        let provider = provider.unwrap();
        assert_eq!(provider.kind(), TextProviderKind::Gemini);
        assert_eq!(provider.model(), DEFAULT_MODEL);
    }

    #[test]
    fn test_builder_project_implies_vertex() {
        let provider = GeminiTextProvider::builder()
            .project("demo")
            .location("us-central1")
            .model("gemini-2.5-flash")
            .build()
            .unwrap();
        assert_eq!(provider.kind(), TextProviderKind::Vertex);
        assert_eq!(
            provider.model_url(),
            "https://us-central1-aiplatform.googleapis.com/v1/projects/demo/locations/us-central1/publishers/google/models/gemini-2.5-flash"
        );
    }

    #[test]
    fn test_builder_without_credentials_fails() {
        let err = GeminiTextProviderBuilder::new().build().err().unwrap();
        assert!(matches!(err, IaGenError::Auth(_)));
    }

    #[test]
    fn test_builder_from_config() {
        let config = GeminiConfig::new().with_api_key("k").with_model("m-1");
        let provider = GeminiTextProviderBuilder::from_config(&config)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(provider.model(), "m-1");
        assert_eq!(
            provider.model_url(),
            "https://generativelanguage.googleapis.com/v1beta/models/m-1"
        );
    }

    #[tokio::test]
    async fn test_connect_public_skips_health_check() {
        let config = GeminiConfig::new().with_api_key("k");
        let provider = GeminiTextProvider::connect(&config).await.unwrap();
        assert_eq!(provider.backend().label(), "public");
    }

    #[test]
    fn test_global_vertex_host() {
        assert_eq!(vertex_host("global"), "aiplatform.googleapis.com");
        assert_eq!(vertex_host("europe-west1"), "europe-west1-aiplatform.googleapis.com");
    }

    #[test]
    fn test_request_construction() {
        let req = TextRequest::new("Describe el producto")
            .with_params(SamplingParams::new(0.4, 0.9, 512))
            .with_image(InlineImage::new(vec![0xFF, 0xD8, 0xFF, 0xE0]));
        let body = GeminiRequest::from_text_request(&req);
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "Describe el producto");
        assert_eq!(
            json["contents"][0]["parts"][1]["inlineData"]["mimeType"],
            "image/jpeg"
        );
        assert_eq!(json["contents"][0]["parts"][1]["inlineData"]["data"], "/9j/4A==");
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 512);
        assert_eq!(json["safetySettings"].as_array().unwrap().len(), 4);
        assert_eq!(json["safetySettings"][0]["threshold"], "BLOCK_NONE");
        assert!(json.get("generation_config").is_none());
    }

    #[test]
    fn test_response_text_is_concatenated() {
        let json = r#"{
            "candidates": [{
                "content": {"parts": [{"text": "{\"short\":"}, {"text": "\"hola\"}"}]},
                "finishReason": "STOP"
            }]
        }"#;
        let resp: GeminiResponse = serde_json::from_str(json).unwrap();
        let (text, reason) = resp.into_text().unwrap();
        assert_eq!(text, r#"{"short":"hola"}"#);
        assert_eq!(reason.as_deref(), Some("STOP"));
    }

    #[test]
    fn test_response_without_content_is_empty_text() {
        let json = r#"{"candidates": [{"finishReason": "MAX_TOKENS"}]}"#;
        let resp: GeminiResponse = serde_json::from_str(json).unwrap();
        let (text, _) = resp.into_text().unwrap();
        assert!(text.is_empty());
    }

    #[test]
    fn test_response_prompt_block() {
        let json = r#"{
            "candidates": [],
            "promptFeedback": {"blockReason": "SAFETY"}
        }"#;
        let resp: GeminiResponse = serde_json::from_str(json).unwrap();
        let err = resp.into_text().unwrap_err();
        assert!(matches!(err, IaGenError::ContentBlocked(m) if m == "Prompt blocked: SAFETY"));
    }

    #[test]
    fn test_response_safety_finish_reason() {
        let json = r#"{"candidates": [{"finishReason": "SAFETY"}]}"#;
        let resp: GeminiResponse = serde_json::from_str(json).unwrap();
        assert!(matches!(
            resp.into_text(),
            Err(IaGenError::ContentBlocked(_))
        ));
    }

    #[test]
    fn test_response_no_candidates() {
        let resp: GeminiResponse = serde_json::from_str("{}").unwrap();
        assert!(matches!(
            resp.into_text(),
            Err(IaGenError::UnexpectedResponse(_))
        ));
    }

    #[test]
    fn test_parse_error_mapping() {
        let provider = GeminiTextProvider::builder().api_key("k").build().unwrap();
        let mut headers = reqwest::header::HeaderMap::new();

        assert!(matches!(
            provider.parse_error(403, "denied", &headers),
            IaGenError::Auth(_)
        ));
        assert!(matches!(
            provider.parse_error(402, "", &headers),
            IaGenError::Billing(_)
        ));
        assert!(matches!(
            provider.parse_error(404, "", &headers),
            IaGenError::InvalidRequest(_)
        ));
        assert!(matches!(
            provider.parse_error(400, "request blocked by safety", &headers),
            IaGenError::ContentBlocked(_)
        ));
        assert!(matches!(
            provider.parse_error(500, "boom", &headers),
            IaGenError::Api { status: 500, .. }
        ));

        headers.insert(reqwest::header::RETRY_AFTER, "30".parse().unwrap());
        match provider.parse_error(429, "quota", &headers) {
            IaGenError::RateLimited { retry_after } => {
                assert_eq!(retry_after, Some(std::time::Duration::from_secs(30)))
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_token_cache_reuses_until_invalidated() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let cache = TokenCache::new(Duration::from_secs(60));
        let counter = AtomicUsize::new(0);
        let fetches = &counter;
        let fetch = move || async move {
            let n = fetches.fetch_add(1, Ordering::SeqCst);
            Ok(format!("token-{n}"))
        };

        assert_eq!(cache.get_or_fetch(fetch).await.unwrap(), "token-0");
        assert_eq!(cache.get_or_fetch(fetch).await.unwrap(), "token-0");
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        cache.invalidate().await;
        assert_eq!(cache.get_or_fetch(fetch).await.unwrap(), "token-1");
    }

    #[tokio::test]
    async fn test_token_cache_refetches_expired_and_keeps_errors_out() {
        let cache = TokenCache::new(Duration::ZERO);
        assert_eq!(cache.get_or_fetch(|| async { Ok("a".to_string()) }).await.unwrap(), "a");
        assert_eq!(cache.get_or_fetch(|| async { Ok("b".to_string()) }).await.unwrap(), "b");

        let cache = TokenCache::new(Duration::from_secs(60));
        let err = cache
            .get_or_fetch(|| async { Err(IaGenError::Auth("no gcloud".into())) })
            .await;
        assert!(matches!(err, Err(IaGenError::Auth(_))));
        assert_eq!(cache.get_or_fetch(|| async { Ok("c".to_string()) }).await.unwrap(), "c");
    }

    #[tokio::test]
    async fn test_silent_server_maps_to_timeout() {
        // Accepted by the kernel backlog, never answered.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/", listener.local_addr().unwrap());
        let timeout = Duration::from_millis(100);
        let client = reqwest::Client::builder().timeout(timeout).build().unwrap();

        let err = client.get(&url).send().await.unwrap_err();
        let err = transport_error(err, timeout);
        assert!(matches!(err, IaGenError::Timeout(t) if t == timeout));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_builder_timeout() {
        let provider = GeminiTextProvider::builder().api_key("k").build().unwrap();
        assert_eq!(provider.timeout, DEFAULT_REQUEST_TIMEOUT);
        let provider = GeminiTextProvider::builder()
            .api_key("k")
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        assert_eq!(provider.timeout, Duration::from_secs(5));
    }
}
