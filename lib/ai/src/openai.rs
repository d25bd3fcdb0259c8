//! OpenAI-compatible chat-completions backend.
//!
//! GitHub Models and the Hugging Face router both speak this dialect, so one
//! reqwest-based implementation covers every provider the assistant uses.

use crate::backend::{
    LlmBackend, LlmBackendConfig, LlmMessage, LlmProvider, LlmRequest, LlmResponse, TokenUsage,
};
use crate::error::LlmError;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Backend for any `/chat/completions` endpoint.
///
/// Holds one pooled HTTP client and is shared across requests behind
/// `Arc<dyn LlmBackend>`.
#[derive(Debug)]
pub struct OpenAiCompatibleBackend {
    client: reqwest::Client,
    config: LlmBackendConfig,
    completions_url: String,
}

impl OpenAiCompatibleBackend {
    /// Creates a backend from its configuration.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::InvalidConfig`] if the base URL or model is empty,
    /// or the HTTP client cannot be built.
    pub fn new(config: LlmBackendConfig) -> Result<Self, LlmError> {
        if config.base_url.trim().is_empty() {
            return Err(LlmError::InvalidConfig {
                reason: format!("{} base URL is empty", config.provider),
            });
        }
        if config.model.trim().is_empty() {
            return Err(LlmError::InvalidConfig {
                reason: format!("{} model is empty", config.provider),
            });
        }

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(|e| LlmError::InvalidConfig {
            reason: e.to_string(),
        })?;

        let completions_url = format!("{}/chat/completions", config.base_url.trim_end_matches('/'));

        Ok(Self {
            client,
            config,
            completions_url,
        })
    }

    /// Returns the configuration this backend was built from.
    #[must_use]
    pub fn config(&self) -> &LlmBackendConfig {
        &self.config
    }
}

#[derive(Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: &'a [LlmMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
    #[serde(default)]
    model: Option<String>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

#[async_trait]
impl LlmBackend for OpenAiCompatibleBackend {
    #[instrument(skip_all, fields(provider = %self.config.provider, endpoint = %self.completions_url))]
    async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        let model = request.model.as_deref().unwrap_or(&self.config.model);
        let body = ChatCompletionBody {
            model,
            messages: &request.messages,
            temperature: request.temperature,
            top_p: request.top_p,
            max_tokens: request.max_tokens,
        };

        let mut http_request = self.client.post(&self.completions_url).json(&body);
        if let Some(api_key) = &self.config.api_key
            && !api_key.is_empty()
        {
            http_request = http_request.bearer_auth(api_key);
        }

        let response = http_request.send().await.map_err(|e| {
            warn!(error = %e, "failed to reach completion endpoint");
            if e.is_timeout() {
                LlmError::Timeout
            } else {
                LlmError::RequestFailed {
                    reason: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse().ok());
            return Err(LlmError::RateLimited { retry_after_secs });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "completion endpoint returned error");
            return Err(LlmError::ProviderRejected {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatCompletionResponse =
            response
                .json()
                .await
                .map_err(|e| LlmError::ResponseParseFailed {
                    reason: e.to_string(),
                })?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::ResponseParseFailed {
                reason: "response contained no choices".to_string(),
            })?;

        let usage = parsed
            .usage
            .map(|u| TokenUsage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            })
            .unwrap_or_default();
        let content = choice.message.content.unwrap_or_default();

        debug!(
            completion_chars = content.len(),
            total_tokens = usage.total(),
            "completion endpoint responded"
        );

        Ok(LlmResponse {
            content,
            usage,
            model: parsed.model.unwrap_or_else(|| model.to_string()),
        })
    }

    fn provider(&self) -> LlmProvider {
        self.config.provider
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}
