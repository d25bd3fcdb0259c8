//! LLM Call primitive.
//!
//! Single-shot inference: one system instruction, one user message, one
//! completion. Every extraction in the workspace is built on this.

use crate::backend::{LlmBackend, LlmMessage, LlmRequest, LlmResponse, TokenUsage};
use crate::error::LlmError;
use cartwise_core::InvocationId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, instrument, warn};

/// Configuration for an LLM Call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmCallConfig {
    /// Instruction sent as the leading system message.
    pub system_prompt: Option<String>,
    /// Temperature for sampling.
    pub temperature: Option<f32>,
    /// Nucleus sampling cutoff.
    pub top_p: Option<f32>,
    /// Maximum tokens to generate.
    pub max_tokens: Option<u32>,
}

impl LlmCallConfig {
    /// Creates an empty configuration; the provider's defaults apply.
    #[must_use]
    pub fn new() -> Self {
        Self {
            system_prompt: None,
            temperature: None,
            top_p: None,
            max_tokens: None,
        }
    }
}

impl Default for LlmCallConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// The result of an LLM Call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmCallResult {
    /// Unique identifier for this invocation.
    pub id: InvocationId,
    /// The raw completion text.
    pub content: String,
    /// Token usage statistics.
    pub usage: TokenUsage,
    /// Model that generated the response.
    pub model: String,
    /// When the call completed.
    pub timestamp: DateTime<Utc>,
    /// Latency in milliseconds.
    pub latency_ms: u64,
}

impl LlmCallResult {
    /// Creates a result from an LLM response.
    #[must_use]
    pub fn from_response(id: InvocationId, response: LlmResponse, latency_ms: u64) -> Self {
        Self {
            id,
            content: response.content,
            usage: response.usage,
            model: response.model,
            timestamp: Utc::now(),
            latency_ms,
        }
    }
}

/// An LLM Call executor.
#[derive(Debug, Clone, Default)]
pub struct LlmCall {
    config: LlmCallConfig,
}

impl LlmCall {
    /// Creates a call with no system prompt and provider-default sampling.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an LLM Call from a configuration.
    #[must_use]
    pub fn from_config(config: LlmCallConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &LlmCallConfig {
        &self.config
    }

    /// Adds a system prompt.
    #[must_use]
    pub fn with_system_prompt(mut self, system: impl Into<String>) -> Self {
        self.config.system_prompt = Some(system.into());
        self
    }

    /// Sets the temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.config.temperature = Some(temperature);
        self
    }

    /// Sets top-p.
    #[must_use]
    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.config.top_p = Some(top_p);
        self
    }

    /// Sets the max tokens.
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.config.max_tokens = Some(max_tokens);
        self
    }

    /// Builds the `[system, user]` request for the given user content.
    #[must_use]
    pub fn build_request(&self, user_content: impl Into<String>) -> LlmRequest {
        let mut messages = Vec::with_capacity(2);
        if let Some(ref system) = self.config.system_prompt {
            messages.push(LlmMessage::system(system.clone()));
        }
        messages.push(LlmMessage::user(user_content));

        let mut request = LlmRequest::new(messages);

        if let Some(temp) = self.config.temperature {
            request = request.with_temperature(temp);
        }

        if let Some(top_p) = self.config.top_p {
            request = request.with_top_p(top_p);
        }

        if let Some(max_tokens) = self.config.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }

        request
    }

    /// Sends the user content through `backend` and returns the completion.
    ///
    /// # Errors
    ///
    /// Propagates the backend's error unchanged.
    #[instrument(
        skip_all,
        fields(
            provider = %backend.provider(),
            model = backend.model(),
            invocation_id = tracing::field::Empty
        )
    )]
    pub async fn execute(
        &self,
        backend: &dyn LlmBackend,
        user_content: impl Into<String>,
    ) -> cartwise_core::Result<LlmCallResult, LlmError> {
        let id = InvocationId::new();
        tracing::Span::current().record("invocation_id", tracing::field::display(id));

        let request = self.build_request(user_content);
        let started = Instant::now();

        let response = backend.generate(&request).await.inspect_err(|e| {
            warn!(error = %e, "completion gateway call failed");
        })?;

        let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        debug!(
            latency_ms,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "completion received"
        );

        Ok(LlmCallResult::from_response(id, response, latency_ms))
    }
}
