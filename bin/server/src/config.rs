//! Centralized server configuration.
//!
//! Loaded via the `config` crate from environment variables. Nested keys use
//! a double underscore, so `GITHUB__MODEL` overrides the primary backend's
//! model while `GITHUB_TOKEN` is the top-level `github_token` key.

use cartwise_ai::LlmBackendConfig;
use serde::Deserialize;
use std::fmt;

/// Server configuration.
#[derive(Clone, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Token for the primary (GitHub Models) backend.
    pub github_token: String,

    /// Token for the secondary (Hugging Face) backend. The secondary chat
    /// endpoint is unavailable without it.
    #[serde(default)]
    pub huggingface_token: Option<String>,

    /// Endpoint overrides for the primary backend.
    #[serde(default)]
    pub github: ProviderOverrides,

    /// Endpoint overrides for the secondary backend.
    #[serde(default)]
    pub huggingface: ProviderOverrides,

    /// Transport timeout for every provider call, in seconds.
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,
}

/// Optional endpoint and model overrides for one provider.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderOverrides {
    /// Replaces the provider's default base URL.
    pub base_url: Option<String>,
    /// Replaces the provider's default model.
    pub model: Option<String>,
}

impl ProviderOverrides {
    fn apply(&self, mut config: LlmBackendConfig) -> LlmBackendConfig {
        if let Some(base_url) = &self.base_url {
            config = config.with_base_url(base_url.as_str());
        }
        if let Some(model) = &self.model {
            config = config.with_model(model.as_str());
        }
        config
    }
}

fn default_bind_addr() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_request_timeout_seconds() -> u64 {
    60
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required configuration is missing or invalid.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::from_environment(config::Environment::default())
    }

    fn from_environment(environment: config::Environment) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(environment.separator("__").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Connection settings for the primary backend.
    #[must_use]
    pub fn primary_backend(&self) -> LlmBackendConfig {
        self.github
            .apply(LlmBackendConfig::github_models(self.github_token.as_str()))
            .with_timeout_secs(self.request_timeout_seconds)
    }

    /// Connection settings for the secondary backend, if a token is set.
    #[must_use]
    pub fn secondary_backend(&self) -> Option<LlmBackendConfig> {
        let token = self
            .huggingface_token
            .as_deref()
            .filter(|token| !token.is_empty())?;
        Some(
            self.huggingface
                .apply(LlmBackendConfig::hugging_face(token))
                .with_timeout_secs(self.request_timeout_seconds),
        )
    }
}

// Hand-written so tokens never end up in logs.
impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("bind_addr", &self.bind_addr)
            .field("github_token", &"<redacted>")
            .field(
                "huggingface_token",
                &self.huggingface_token.as_ref().map(|_| "<redacted>"),
            )
            .field("github", &self.github)
            .field("huggingface", &self.huggingface)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cartwise_ai::LlmProvider;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<ServerConfig, config::ConfigError> {
        let source: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ServerConfig::from_environment(config::Environment::default().source(Some(source)))
    }

    #[test]
    fn defaults_with_only_primary_token() {
        let config = load(&[("GITHUB_TOKEN", "gh-secret")]).expect("load");
        assert_eq!(config.bind_addr, "127.0.0.1:3000");
        assert_eq!(config.request_timeout_seconds, 60);
        assert!(config.secondary_backend().is_none());

        let primary = config.primary_backend();
        assert_eq!(primary.provider, LlmProvider::GithubModels);
        assert_eq!(primary.base_url, LlmBackendConfig::GITHUB_MODELS_URL);
        assert_eq!(primary.model, LlmBackendConfig::GITHUB_MODELS_MODEL);
        assert_eq!(primary.api_key.as_deref(), Some("gh-secret"));
        assert_eq!(primary.timeout_secs, Some(60));
    }

    #[test]
    fn missing_primary_token_is_an_error() {
        assert!(load(&[("BIND_ADDR", "0.0.0.0:8080")]).is_err());
    }

    #[test]
    fn nested_overrides_apply() {
        let config = load(&[
            ("GITHUB_TOKEN", "gh"),
            ("HUGGINGFACE_TOKEN", "hf"),
            ("GITHUB__MODEL", "openai/gpt-4o-mini"),
            ("HUGGINGFACE__BASE_URL", "http://localhost:9000/v1"),
            ("REQUEST_TIMEOUT_SECONDS", "15"),
        ])
        .expect("load");

        let primary = config.primary_backend();
        assert_eq!(primary.model, "openai/gpt-4o-mini");
        assert_eq!(primary.base_url, LlmBackendConfig::GITHUB_MODELS_URL);
        assert_eq!(primary.timeout_secs, Some(15));

        let secondary = config.secondary_backend().expect("secondary configured");
        assert_eq!(secondary.provider, LlmProvider::HuggingFace);
        assert_eq!(secondary.base_url, "http://localhost:9000/v1");
        assert_eq!(secondary.model, LlmBackendConfig::HUGGING_FACE_MODEL);
        assert_eq!(secondary.api_key.as_deref(), Some("hf"));
    }

    #[test]
    fn empty_secondary_token_disables_secondary() {
        let config = load(&[("GITHUB_TOKEN", "gh"), ("HUGGINGFACE_TOKEN", "")]).expect("load");
        assert!(config.secondary_backend().is_none());
    }

    #[test]
    fn debug_output_redacts_tokens() {
        let config = load(&[("GITHUB_TOKEN", "gh-secret"), ("HUGGINGFACE_TOKEN", "hf-secret")])
            .expect("load");
        let debug = format!("{config:?}");
        assert!(!debug.contains("gh-secret"));
        assert!(!debug.contains("hf-secret"));
    }
}
