//! LLM backend abstraction.
//!
//! The only capability the rest of the workspace consumes from a provider:
//! role-tagged messages and sampling parameters in, one completion out.
//! Backends are constructed once and shared read-only, so tests can swap in
//! a fake that returns canned text.

use crate::error::LlmError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Available LLM providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LlmProvider {
    /// GitHub Models inference endpoint.
    GithubModels,
    /// Hugging Face inference router.
    HuggingFace,
    /// Any other OpenAI-compatible API.
    OpenAiCompatible,
}

impl LlmProvider {
    /// Returns the provider's stable name, as used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GithubModels => "github_models",
            Self::HuggingFace => "hugging_face",
            Self::OpenAiCompatible => "openai_compatible",
        }
    }
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Connection settings for an LLM backend.
#[derive(Clone, PartialEq, Eq)]
pub struct LlmBackendConfig {
    /// The provider type.
    pub provider: LlmProvider,
    /// Base URL; `/chat/completions` is appended to it.
    pub base_url: String,
    /// Model identifier sent with every request that doesn't name one.
    pub model: String,
    /// Bearer token, if the provider requires one.
    pub api_key: Option<String>,
    /// Transport timeout. `None` leaves the HTTP client's default.
    pub timeout_secs: Option<u64>,
}

impl LlmBackendConfig {
    /// Default GitHub Models inference endpoint.
    pub const GITHUB_MODELS_URL: &'static str = "https://models.github.ai/inference";
    /// Default model served through GitHub Models.
    pub const GITHUB_MODELS_MODEL: &'static str = "meta/Meta-Llama-3.1-8B-Instruct";
    /// Default Hugging Face router endpoint.
    pub const HUGGING_FACE_URL: &'static str = "https://router.huggingface.co/v1";
    /// Default model served through the Hugging Face router (fireworks-ai provider).
    pub const HUGGING_FACE_MODEL: &'static str = "meta-llama/Llama-3.1-70B-Instruct:fireworks-ai";

    /// GitHub Models with its default endpoint and model.
    #[must_use]
    pub fn github_models(token: impl Into<String>) -> Self {
        Self {
            provider: LlmProvider::GithubModels,
            base_url: Self::GITHUB_MODELS_URL.to_string(),
            model: Self::GITHUB_MODELS_MODEL.to_string(),
            api_key: Some(token.into()),
            timeout_secs: None,
        }
    }

    /// Hugging Face router with its default endpoint and model.
    #[must_use]
    pub fn hugging_face(token: impl Into<String>) -> Self {
        Self {
            provider: LlmProvider::HuggingFace,
            base_url: Self::HUGGING_FACE_URL.to_string(),
            model: Self::HUGGING_FACE_MODEL.to_string(),
            api_key: Some(token.into()),
            timeout_secs: None,
        }
    }

    /// A generic OpenAI-compatible endpoint without credentials.
    #[must_use]
    pub fn openai_compatible(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            provider: LlmProvider::OpenAiCompatible,
            base_url: base_url.into(),
            model: model.into(),
            api_key: None,
            timeout_secs: None,
        }
    }

    /// Overrides the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Overrides the model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the transport timeout.
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }
}

// Hand-written so tokens never end up in logs.
impl fmt::Debug for LlmBackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmBackendConfig")
            .field("provider", &self.provider)
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// A request to an LLM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmRequest {
    /// Messages in conversation order.
    pub messages: Vec<LlmMessage>,
    /// Temperature for sampling.
    pub temperature: Option<f32>,
    /// Nucleus sampling cutoff.
    pub top_p: Option<f32>,
    /// Maximum tokens to generate.
    pub max_tokens: Option<u32>,
    /// Model override; the backend's configured model is used when unset.
    pub model: Option<String>,
}

impl LlmRequest {
    /// Creates a request from the given messages.
    #[must_use]
    pub fn new(messages: Vec<LlmMessage>) -> Self {
        Self {
            messages,
            temperature: None,
            top_p: None,
            max_tokens: None,
            model: None,
        }
    }

    /// Sets the temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Sets top-p.
    #[must_use]
    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.top_p = Some(top_p);
        self
    }

    /// Sets the max tokens.
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Names the model explicitly.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Returns the content of the last user message, if any.
    #[must_use]
    pub fn user_content(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::User)
            .map(|m| m.content.as_str())
    }
}

/// A message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmMessage {
    /// The role of the message sender.
    pub role: MessageRole,
    /// The content of the message.
    pub content: String,
}

impl LlmMessage {
    /// Creates a system message.
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    /// Creates a user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    /// Creates an assistant message.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// The role of a message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// User/human message.
    User,
    /// Assistant/AI message.
    Assistant,
    /// System message.
    System,
}

/// A response from an LLM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmResponse {
    /// The generated completion text.
    pub content: String,
    /// Token usage statistics.
    pub usage: TokenUsage,
    /// Model that generated the response.
    pub model: String,
}

impl LlmResponse {
    /// A response with no usage information.
    #[must_use]
    pub fn text(content: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            usage: TokenUsage::default(),
            model: model.into(),
        }
    }
}

/// Token usage statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Number of input tokens.
    pub input_tokens: u32,
    /// Number of output tokens.
    pub output_tokens: u32,
}

impl TokenUsage {
    /// Returns the total number of tokens, saturating at `u32::MAX`.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.input_tokens.saturating_add(self.output_tokens)
    }
}

/// Trait for LLM backends.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Generates one completion for the given request.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider cannot be reached or rejects the
    /// request. Implementations must not retry.
    async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError>;

    /// Returns the provider type.
    fn provider(&self) -> LlmProvider;

    /// Returns the model name.
    fn model(&self) -> &str;
}
