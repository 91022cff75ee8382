//! Product descriptions: prompt building, remote generation and the local
//! template fallback.

use crate::error::{IaGenError, Result};
use crate::fallback::Outcome;
use crate::llm::{InlineImage, SamplingParams, TextProvider, TextRequest};
use crate::text::{AttributeMap, DescriptionResult};
use serde::{Deserialize, Serialize};

/// Sampling defaults for product copy.
pub const DESCRIPTION_PARAMS: SamplingParams = SamplingParams::new(0.9, 0.95, 1024);

/// Where the copy will be published.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Own online store.
    #[default]
    Ecommerce,
    /// Third-party marketplace listing.
    Marketplace,
    /// Social networks.
    Redes,
}

impl Channel {
    /// Returns the channel name used in prompts.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ecommerce => "ecommerce",
            Self::Marketplace => "marketplace",
            Self::Redes => "redes",
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Channel {
    type Err = IaGenError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "ecommerce" => Ok(Self::Ecommerce),
            "marketplace" => Ok(Self::Marketplace),
            "redes" | "social" => Ok(Self::Redes),
            other => Err(IaGenError::InvalidRequest(format!(
                "unknown channel '{other}' (expected ecommerce, marketplace or redes)"
            ))),
        }
    }
}

/// Input for a product description.
#[derive(Debug, Clone)]
pub struct DescriptionRequest {
    /// Product name, e.g. "Snack Saludable Quinoa 120 g".
    pub name: String,
    /// Free-text attributes, e.g. "sabor: coco; sin azúcar".
    pub attributes: String,
    /// Target channel.
    pub channel: Channel,
    /// Optional product photos sent alongside the prompt.
    pub images: Vec<InlineImage>,
}

impl DescriptionRequest {
    /// Creates a request without images.
    pub fn new(name: impl Into<String>, attributes: impl Into<String>, channel: Channel) -> Self {
        Self {
            name: name.into(),
            attributes: attributes.into(),
            channel,
            images: Vec::new(),
        }
    }

    /// Attaches a product photo.
    pub fn with_image(mut self, data: Vec<u8>) -> Self {
        self.images.push(InlineImage::new(data));
        self
    }
}

/// Builds the copywriter prompt, asking for a strict JSON answer.
pub fn build_prompt(request: &DescriptionRequest) -> String {
    format!(
        r##"Eres un redactor experto en e-commerce para consumo masivo en Perú (Alicorp).
Producto: {name}
Atributos: {attributes}
Canal: {channel}

DEVUELVE EXCLUSIVAMENTE UN JSON VÁLIDO (sin bloques de código, sin ```).
Estructura exacta:
{{
  "short": "<string 80-120 chars>",
  "long": "<string 90-120 palabras>",
  "bullets": ["<b1>", "<b2>", "<b3>", "<b4>", "<b5>"],
  "hashtags": ["#tag1", "#tag2", "#tag3", "#tag4", "#tag5", "#tag6"]
}}
Restricciones:
- No incluyas precios.
- Tono cercano, claro, orientado a beneficios; evita claims de salud no verificados.
- Español (Perú), lenguaje sencillo y profesional.
- No inventes sabores/variantes si no están en los atributos; si faltan datos, manténlo genérico."##,
        name = request.name,
        attributes = request.attributes,
        channel = request.channel,
    )
}

/// Generates a description with the remote model.
///
/// Upstream failures are returned as classified errors. An answer without
/// usable JSON is not an error: the result is empty apart from `raw`.
pub async fn describe<P>(provider: &P, request: &DescriptionRequest) -> Result<DescriptionResult>
where
    P: TextProvider + ?Sized,
{
    describe_with_params(provider, request, DESCRIPTION_PARAMS).await
}

/// [`describe`] with explicit sampling parameters.
pub async fn describe_with_params<P>(
    provider: &P,
    request: &DescriptionRequest,
    params: SamplingParams,
) -> Result<DescriptionResult>
where
    P: TextProvider + ?Sized,
{
    let mut text_request = TextRequest::new(build_prompt(request)).with_params(params);
    text_request.images = request.images.clone();

    let generated = provider.generate(&text_request).await?;
    let result = DescriptionResult::from_response(generated.text);
    if result.is_empty() {
        tracing::warn!(product = %request.name, "model answer held no usable description");
    }
    Ok(result)
}

/// Template description built only from the parsed attributes.
pub fn describe_local(request: &DescriptionRequest) -> DescriptionResult {
    let attrs = AttributeMap::parse(&request.attributes);
    let listed = attrs
        .iter()
        .map(|(k, v)| format!("{k}: {v}"))
        .collect::<Vec<_>>();

    let long = if listed.is_empty() {
        format!("{}.", request.name)
    } else {
        format!("{} con atributos {}.", request.name, listed.join(", "))
    };

    DescriptionResult {
        short: format!("{} ideal para {}.", request.name, request.channel),
        long,
        bullets: listed,
        hashtags: vec!["#Alicorp".into(), "#IAgenerativa".into()],
        raw: String::new(),
    }
}

/// Remote description when possible, template otherwise.
pub async fn describe_or_local<P>(
    provider: Option<&P>,
    request: &DescriptionRequest,
) -> Outcome<DescriptionResult>
where
    P: TextProvider + ?Sized,
{
    match provider {
        Some(provider) => {
            Outcome::from_result(describe(provider, request).await, || describe_local(request))
        }
        None => Outcome::unconfigured(describe_local(request)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::FailureKind;
    use crate::llm::testing::ScriptedProvider;

    fn request() -> DescriptionRequest {
        DescriptionRequest::new(
            "Snack Saludable Quinoa 120 g",
            "sabor: coco; sin azúcar; fibra: alta",
            Channel::Ecommerce,
        )
    }

    #[test]
    fn test_prompt_mentions_inputs_and_shape() {
        let prompt = build_prompt(&request());
        assert!(prompt.contains("Producto: Snack Saludable Quinoa 120 g"));
        assert!(prompt.contains("Atributos: sabor: coco; sin azúcar; fibra: alta"));
        assert!(prompt.contains("Canal: ecommerce"));
        assert!(prompt.contains(r#""bullets": ["<b1>""#));
        assert!(prompt.contains("No incluyas precios."));
    }

    #[test]
    fn test_channel_parsing() {
        assert_eq!("Marketplace".parse::<Channel>().unwrap(), Channel::Marketplace);
        assert_eq!("redes".parse::<Channel>().unwrap(), Channel::Redes);
        assert!("tv".parse::<Channel>().is_err());
    }

    #[test]
    fn test_local_template() {
        let out = describe_local(&request());
        assert_eq!(out.short, "Snack Saludable Quinoa 120 g ideal para ecommerce.");
        assert_eq!(out.bullets, vec!["sabor: coco", "fibra: alta"]);
        assert_eq!(out.hashtags, vec!["#Alicorp", "#IAgenerativa"]);
        assert!(out.long.contains("sabor: coco, fibra: alta"));
    }

    #[tokio::test]
    async fn test_describe_normalizes_fenced_answer() {
        let provider = ScriptedProvider::replying(
            "Claro:\n```json\n{\"short\":\"Crocante\",\"long\":\"L\",\"bullets\":\"a; b\",\"hashtags\":\"#Q x\"}\n```",
        );
        let out = describe(&provider, &request().with_image(vec![0xFF, 0xD8, 0xFF]))
            .await
            .unwrap();
        assert_eq!(out.short, "Crocante");
        assert_eq!(out.bullets, vec!["a", "b"]);
        assert_eq!(out.hashtags, vec!["#Q"]);
        assert!(out.raw.starts_with("Claro:"));

        let sent = provider.last_request();
        assert_eq!(sent.images.len(), 1);
        assert_eq!(sent.params, DESCRIPTION_PARAMS);
    }

    #[tokio::test]
    async fn test_describe_with_params() {
        let provider = ScriptedProvider::replying(r#"{"short":"s"}"#);
        let params = SamplingParams::new(0.2, 0.8, 256);
        describe_with_params(&provider, &request(), params).await.unwrap();
        assert_eq!(provider.last_request().params, params);
    }

    #[tokio::test]
    async fn test_describe_garbage_is_empty_with_raw() {
        let provider = ScriptedProvider::replying("No puedo responder eso.");
        let out = describe(&provider, &request()).await.unwrap();
        assert!(out.is_empty());
        assert_eq!(out.raw, "No puedo responder eso.");
    }

    #[tokio::test]
    async fn test_describe_propagates_upstream_errors() {
        let provider = ScriptedProvider::failing(IaGenError::RateLimited { retry_after: None });
        let err = describe(&provider, &request()).await.unwrap_err();
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_describe_or_local() {
        let provider = ScriptedProvider::failing(IaGenError::Auth("bad".into()));
        let outcome = describe_or_local(Some(&provider), &request()).await;
        assert_eq!(outcome.reason(), Some(FailureKind::Auth));
        assert_eq!(outcome.value().hashtags, vec!["#Alicorp", "#IAgenerativa"]);

        let outcome = describe_or_local::<ScriptedProvider>(None, &request()).await;
        assert_eq!(outcome.reason(), Some(FailureKind::Unconfigured));

        let provider = ScriptedProvider::replying(r#"{"short":"ok"}"#);
        let outcome = describe_or_local(Some(&provider), &request()).await;
        assert!(!outcome.is_fallback());
        assert_eq!(outcome.value().short, "ok");
    }
}
