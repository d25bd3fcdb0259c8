//! The assistant's public operations.
//!
//! Each operation makes at most one gateway call and decodes the completion
//! synchronously. Gateway failures propagate untouched; missing fields in a
//! completion never do, since every decoder has its own absence policy.

use crate::prompts;
use cartwise_ai::{LlmBackend, LlmCall, LlmError};
use cartwise_core::Result;
use cartwise_extract::{ChatbotReply, ClickRecord, FacetExtraction, chat, clicks, keywords};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Sampling temperature for every call.
pub const TEMPERATURE: f32 = 0.2;
/// Nucleus sampling cutoff for every call.
pub const TOP_P: f32 = 0.1;
/// Token budget for chat replies.
pub const CHAT_MAX_TOKENS: u32 = 1000;
/// Token budget for keyword and facet extraction.
pub const EXTRACTION_MAX_TOKENS: u32 = 200;

const SECONDARY_PROVIDER: &str = "secondary";

/// Shopping assistant over one primary and an optional secondary backend.
///
/// Cheap to share: wrap it in an `Arc` and call it from any number of tasks.
pub struct ShoppingAssistant {
    primary: Arc<dyn LlmBackend>,
    secondary: Option<Arc<dyn LlmBackend>>,
    chat_call: LlmCall,
    keyword_call: LlmCall,
    facet_call: LlmCall,
    secondary_call: LlmCall,
}

impl ShoppingAssistant {
    /// Creates an assistant using `primary` for every decoded operation.
    #[must_use]
    pub fn new(primary: Arc<dyn LlmBackend>) -> Self {
        let registry = prompts::default_registry();
        let chat_prompt = prompts::render(&registry, prompts::CHAT_REPLY);

        let extraction = |name: &str| {
            LlmCall::new()
                .with_system_prompt(prompts::render(&registry, name))
                .with_temperature(TEMPERATURE)
                .with_top_p(TOP_P)
                .with_max_tokens(EXTRACTION_MAX_TOKENS)
        };

        Self {
            primary,
            secondary: None,
            chat_call: LlmCall::new()
                .with_system_prompt(chat_prompt.clone())
                .with_temperature(TEMPERATURE)
                .with_top_p(TOP_P)
                .with_max_tokens(CHAT_MAX_TOKENS),
            keyword_call: extraction(prompts::KEYWORDS),
            facet_call: extraction(prompts::CLICK_FACETS),
            // The secondary provider runs with its own sampling defaults.
            secondary_call: LlmCall::new().with_system_prompt(chat_prompt),
        }
    }

    /// Adds the backend used by [`Self::secondary_chat`].
    #[must_use]
    pub fn with_secondary(mut self, backend: Arc<dyn LlmBackend>) -> Self {
        self.secondary = Some(backend);
        self
    }

    /// Returns whether a secondary backend is configured.
    #[must_use]
    pub fn has_secondary(&self) -> bool {
        self.secondary.is_some()
    }

    /// Answers one shopper message.
    ///
    /// # Errors
    ///
    /// Returns the gateway error if the completion call fails. A completion
    /// missing any reply field is not an error; it decodes to
    /// [`ChatbotReply::fallback`].
    #[instrument(skip_all, fields(message_chars = message.len()))]
    pub async fn chat_reply(&self, message: &str) -> Result<ChatbotReply, LlmError> {
        let result = self.chat_call.execute(self.primary.as_ref(), message).await?;
        let reply = chat::decode(&result.content);
        debug!(
            invocation_id = %result.id,
            product_requested = reply.product_requested,
            "decoded chat reply"
        );
        Ok(reply)
    }

    /// Extracts deduplicated, lowercased keywords from a conversation.
    ///
    /// # Errors
    ///
    /// Returns the gateway error if the completion call fails.
    #[instrument(skip_all, fields(messages = messages.len()))]
    pub async fn extract_keywords<S: AsRef<str> + Sync>(
        &self,
        messages: &[S],
    ) -> Result<Vec<String>, LlmError> {
        let combined = keywords::join_messages(messages);
        let result = self
            .keyword_call
            .execute(self.primary.as_ref(), combined)
            .await?;
        let keywords = keywords::decode(&result.content);
        debug!(
            invocation_id = %result.id,
            keywords = keywords.len(),
            "decoded keywords"
        );
        Ok(keywords.into_vec())
    }

    /// Infers category, brand, price-range and store facets from clicks.
    ///
    /// An empty record list returns all-empty facets without calling the
    /// gateway.
    ///
    /// # Errors
    ///
    /// Returns the gateway error if the completion call fails.
    #[instrument(skip_all, fields(records = records.len()))]
    pub async fn extract_facets_from_clicks(
        &self,
        records: &[ClickRecord],
    ) -> Result<FacetExtraction, LlmError> {
        if records.is_empty() {
            debug!("no click records, skipping completion");
            return Ok(FacetExtraction::empty());
        }

        let summary = clicks::summarize(records);
        let result = self
            .facet_call
            .execute(self.primary.as_ref(), summary)
            .await?;
        let facets = clicks::decode(&result.content);
        debug!(
            invocation_id = %result.id,
            categories = facets.categories.len(),
            brands = facets.brands.len(),
            price_ranges = facets.price_ranges.len(),
            stores = facets.stores.len(),
            "decoded click facets"
        );
        Ok(facets)
    }

    /// Sends a shopper message to the secondary backend and returns the raw
    /// completion text, undecoded.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::ProviderUnavailable`] when no secondary backend is
    /// configured, or the gateway error if the call fails.
    #[instrument(skip_all, fields(message_chars = message.len()))]
    pub async fn secondary_chat(&self, message: &str) -> Result<String, LlmError> {
        let Some(backend) = &self.secondary else {
            return Err(LlmError::ProviderUnavailable {
                provider: SECONDARY_PROVIDER.to_string(),
                reason: "no secondary backend configured".to_string(),
            }
            .into());
        };

        let result = self.secondary_call.execute(backend.as_ref(), message).await?;
        Ok(result.content)
    }
}
