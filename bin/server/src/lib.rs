//! cartwise HTTP server.
//!
//! Exposes the shopping assistant's operations as JSON endpoints. Provider
//! backends are built once from [`config::ServerConfig`] at startup and
//! shared by every request.

pub mod api;
pub mod config;
pub mod error;

use cartwise_ai::{LlmError, OpenAiCompatibleBackend};
use cartwise_assistant::ShoppingAssistant;
use config::ServerConfig;
use std::sync::Arc;

/// Builds the assistant and its provider backends from configuration.
///
/// # Errors
///
/// Returns an error if a backend configuration is invalid.
pub fn build_assistant(config: &ServerConfig) -> cartwise_core::Result<ShoppingAssistant, LlmError> {
    let primary = OpenAiCompatibleBackend::new(config.primary_backend())?;
    let mut assistant = ShoppingAssistant::new(Arc::new(primary));

    if let Some(secondary) = config.secondary_backend() {
        let secondary = OpenAiCompatibleBackend::new(secondary)?;
        assistant = assistant.with_secondary(Arc::new(secondary));
    }

    Ok(assistant)
}
