//! Chatbot reply decoding.
//!
//! The reply needs all three of `ChatbotMessage`, `ProductRequested` and
//! `ProductQuery`. If any one is missing the completion is treated as
//! truncated or malformed and the whole reply falls back to
//! [`ChatbotReply::fallback`]; a partial intent signal is never returned.

use crate::normalize;
use crate::tagged::{FieldName, TaggedText};
use serde::{Deserialize, Serialize};

/// Message shown when a completion could not be decoded.
pub const FALLBACK_MESSAGE: &str = "No message";

/// The structured reply to one shopper message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatbotReply {
    /// Text shown to the shopper.
    pub message: String,
    /// Whether the shopper asked for a product.
    pub product_requested: bool,
    /// Search query for the product; may be empty.
    pub product_query: String,
}

impl ChatbotReply {
    /// The reply used when any required field is missing.
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            message: FALLBACK_MESSAGE.to_string(),
            product_requested: false,
            product_query: String::new(),
        }
    }

    /// Re-encodes the reply in the tagged-field convention.
    #[must_use]
    pub fn to_tagged_text(&self) -> String {
        TaggedText::new()
            .field(FieldName::ChatbotMessage, &self.message)
            .field(
                FieldName::ProductRequested,
                if self.product_requested { "true" } else { "false" },
            )
            .field(FieldName::ProductQuery, &self.product_query)
            .build()
    }
}

/// Decodes a completion into a [`ChatbotReply`].
#[must_use]
pub fn decode(completion: &str) -> ChatbotReply {
    let (Some(message), Some(requested), Some(query)) = (
        FieldName::ChatbotMessage.extract(completion),
        FieldName::ProductRequested.extract(completion),
        FieldName::ProductQuery.extract(completion),
    ) else {
        tracing::debug!(
            completion_chars = completion.len(),
            "chat completion missing required fields, using fallback reply"
        );
        return ChatbotReply::fallback();
    };

    ChatbotReply {
        message: normalize::identity(Some(message)).unwrap_or_default(),
        product_requested: normalize::boolean(Some(requested)),
        product_query: normalize::identity(Some(query)).unwrap_or_default(),
    }
}
