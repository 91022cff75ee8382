//! Explicit configuration for the Gemini text backend.
//!
//! Built once at startup (usually with [`GeminiConfig::from_env`]) and passed
//! to the provider. Nothing below the entry point reads the environment.

use crate::error::{IaGenError, Result};

/// Default Gemini model for text generation.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-lite";
/// Default Vertex AI location.
pub const DEFAULT_LOCATION: &str = "global";

/// Which Google API serves Gemini requests.
#[derive(Clone, PartialEq, Eq)]
pub enum GeminiBackend {
    /// Generative Language API (generativelanguage.googleapis.com), API key auth.
    Public {
        /// API key sent as `x-goog-api-key`.
        api_key: String,
    },
    /// Vertex AI (aiplatform.googleapis.com), gcloud bearer-token auth.
    Vertex {
        /// GCP project ID.
        project: String,
        /// GCP location (e.g. "global", "us-central1").
        location: String,
    },
}

impl GeminiBackend {
    /// Short name for logs and CLI output.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Public { .. } => "public",
            Self::Vertex { .. } => "vertex",
        }
    }
}

impl std::fmt::Debug for GeminiBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Public { .. } => f
                .debug_struct("Public")
                .field("api_key", &"[REDACTED]")
                .finish(),
            Self::Vertex { project, location } => f
                .debug_struct("Vertex")
                .field("project", project)
                .field("location", location)
                .finish(),
        }
    }
}

/// Settings for reaching Gemini.
#[derive(Clone, PartialEq, Eq)]
pub struct GeminiConfig {
    /// GCP project; selects Vertex AI unless `force_public` is set.
    pub project: Option<String>,
    /// Vertex AI location.
    pub location: String,
    /// Public API key; also the fallback when Vertex cannot authenticate.
    pub api_key: Option<String>,
    /// Model identifier.
    pub model: String,
    /// Use the public API even when a project is configured.
    pub force_public: bool,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            project: None,
            location: DEFAULT_LOCATION.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            force_public: false,
        }
    }
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("project", &self.project)
            .field("location", &self.location)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("force_public", &self.force_public)
            .finish()
    }
}

impl GeminiConfig {
    /// Creates a config with default model and location and no credentials.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `GCP_PROJECT`, `GCP_LOCATION`, `GOOGLE_API_KEY`, `GEMINI_MODEL`
    /// and `FORCE_GEMINI_PUBLIC` from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable lookup. Empty values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let force_public = get("FORCE_GEMINI_PUBLIC")
            .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Self {
            project: get("GCP_PROJECT"),
            location: get("GCP_LOCATION").unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
            api_key: get("GOOGLE_API_KEY"),
            model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            force_public,
        }
    }

    /// Sets the GCP project.
    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    /// Sets the Vertex AI location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Sets the public API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Forces the public API.
    pub fn with_force_public(mut self, force: bool) -> Self {
        self.force_public = force;
        self
    }

    /// Picks the preferred backend.
    ///
    /// Order: forced public (with a key), Vertex when a project is set, public
    /// when a key is set. Without any of these the configuration is unusable.
    pub fn resolve(&self) -> Result<GeminiBackend> {
        if self.force_public {
            if let Some(api_key) = &self.api_key {
                return Ok(GeminiBackend::Public {
                    api_key: api_key.clone(),
                });
            }
        }
        if let Some(project) = &self.project {
            return Ok(GeminiBackend::Vertex {
                project: project.clone(),
                location: self.location.clone(),
            });
        }
        if let Some(api_key) = &self.api_key {
            return Ok(GeminiBackend::Public {
                api_key: api_key.clone(),
            });
        }
        Err(IaGenError::Auth(
            "no Gemini configuration found: set GCP_PROJECT (Vertex AI, with gcloud credentials) \
             or GOOGLE_API_KEY (public API); FORCE_GEMINI_PUBLIC=true prefers the public API"
                .into(),
        ))
    }

    /// Public backend built from the configured key, if any.
    pub fn public_fallback(&self) -> Option<GeminiBackend> {
        self.api_key.as_ref().map(|api_key| GeminiBackend::Public {
            api_key: api_key.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> GeminiConfig {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        GeminiConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config(&[]);
        assert_eq!(cfg.model, DEFAULT_MODEL);
        assert_eq!(cfg.location, "global");
        assert!(cfg.project.is_none());
        assert!(!cfg.force_public);
    }

    #[test]
    fn test_reads_variables() {
        let cfg = config(&[
            ("GCP_PROJECT", "demo-project"),
            ("GCP_LOCATION", "us-central1"),
            ("GOOGLE_API_KEY", "k"),
            ("GEMINI_MODEL", "gemini-2.5-flash"),
            ("FORCE_GEMINI_PUBLIC", "Yes"),
        ]);
        assert_eq!(cfg.project.as_deref(), Some("demo-project"));
        assert_eq!(cfg.location, "us-central1");
        assert_eq!(cfg.api_key.as_deref(), Some("k"));
        assert_eq!(cfg.model, "gemini-2.5-flash");
        assert!(cfg.force_public);
    }

    #[test]
    fn test_blank_values_are_unset() {
        let cfg = config(&[("GCP_PROJECT", "  "), ("FORCE_GEMINI_PUBLIC", "0")]);
        assert!(cfg.project.is_none());
        assert!(!cfg.force_public);
    }

    #[test]
    fn test_resolve_prefers_vertex_with_project() {
        let cfg = GeminiConfig::new().with_project("p").with_api_key("k");
        assert_eq!(
            cfg.resolve().unwrap(),
            GeminiBackend::Vertex {
                project: "p".into(),
                location: "global".into()
            }
        );
        assert_eq!(
            cfg.public_fallback(),
            Some(GeminiBackend::Public { api_key: "k".into() })
        );
    }

    #[test]
    fn test_resolve_force_public() {
        let cfg = GeminiConfig::new()
            .with_project("p")
            .with_api_key("k")
            .with_force_public(true);
        assert_eq!(cfg.resolve().unwrap().label(), "public");

        // Forcing without a key still uses the project.
        let cfg = GeminiConfig::new().with_project("p").with_force_public(true);
        assert_eq!(cfg.resolve().unwrap().label(), "vertex");
    }

    #[test]
    fn test_resolve_public_with_key_only() {
        let cfg = GeminiConfig::new().with_api_key("k");
        assert_eq!(
            cfg.resolve().unwrap(),
            GeminiBackend::Public { api_key: "k".into() }
        );
    }

    #[test]
    fn test_resolve_without_credentials() {
        let err = GeminiConfig::new().resolve().unwrap_err();
        assert!(matches!(err, IaGenError::Auth(_)));
        assert!(err.to_string().contains("GOOGLE_API_KEY"));
    }

    #[test]
    fn test_debug_redacts_key() {
        let cfg = GeminiConfig::new().with_api_key("super-secret");
        let dbg = format!("{cfg:?}");
        assert!(!dbg.contains("super-secret"));
        let backend = cfg.resolve().unwrap();
        assert!(!format!("{backend:?}").contains("super-secret"));
    }
}
