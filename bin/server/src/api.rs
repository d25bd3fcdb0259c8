//! JSON API routes.

use crate::error::ApiError;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use cartwise_ai::LlmError;
use cartwise_assistant::ShoppingAssistant;
use cartwise_core::RequestId;
use cartwise_extract::clicks::records_from_logs;
use cartwise_extract::{ChatbotReply, FacetExtraction};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::future::Future;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::Instrument;

/// Shared application state.
pub struct AppState {
    /// The assistant every handler delegates to.
    pub assistant: ShoppingAssistant,
}

impl AppState {
    /// Creates the state around a configured assistant.
    #[must_use]
    pub fn new(assistant: ShoppingAssistant) -> Self {
        Self { assistant }
    }
}

/// Body of `POST /api/chat` and `POST /api/chat/secondary`.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// The shopper's message.
    pub message: String,
}

/// Body of `POST /api/keywords`.
#[derive(Debug, Deserialize)]
pub struct KeywordsRequest {
    /// Conversation history, oldest first.
    pub messages: Vec<String>,
}

/// Response of `POST /api/keywords`.
#[derive(Debug, Serialize, Deserialize)]
pub struct KeywordsResponse {
    /// Lowercased, deduplicated keywords.
    pub keywords: Vec<String>,
}

/// Body of `POST /api/clicks/facets`.
#[derive(Debug, Deserialize)]
pub struct ClickFacetsRequest {
    /// Raw analytics click events.
    pub logs: Vec<JsonValue>,
}

/// Response of `POST /api/chat/secondary`.
#[derive(Debug, Serialize, Deserialize)]
pub struct SecondaryChatResponse {
    /// Raw completion text from the secondary provider.
    pub reply: String,
}

/// Builds the API router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/chat", post(chat))
        .route("/api/chat/secondary", post(secondary_chat))
        .route("/api/keywords", post(keywords))
        .route("/api/clicks/facets", post(click_facets))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

/// Runs one gateway-backed operation under a fresh request id.
async fn respond<T, F>(route: &'static str, operation: F) -> Result<Json<T>, ApiError>
where
    F: Future<Output = cartwise_core::Result<T, LlmError>>,
{
    let request_id = RequestId::new();
    operation
        .instrument(tracing::info_span!("api_request", route, %request_id))
        .await
        .map(Json)
        .map_err(|report| ApiError::gateway(request_id, &report))
}

async fn chat(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ChatRequest>,
) -> Result<Json<ChatbotReply>, ApiError> {
    respond("chat", state.assistant.chat_reply(&body.message)).await
}

async fn secondary_chat(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ChatRequest>,
) -> Result<Json<SecondaryChatResponse>, ApiError> {
    respond("chat_secondary", async {
        let reply = state.assistant.secondary_chat(&body.message).await?;
        Ok(SecondaryChatResponse { reply })
    })
    .await
}

async fn keywords(
    State(state): State<Arc<AppState>>,
    Json(body): Json<KeywordsRequest>,
) -> Result<Json<KeywordsResponse>, ApiError> {
    respond("keywords", async {
        let keywords = state.assistant.extract_keywords(body.messages.as_slice()).await?;
        Ok(KeywordsResponse { keywords })
    })
    .await
}

async fn click_facets(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ClickFacetsRequest>,
) -> Result<Json<FacetExtraction>, ApiError> {
    let records = records_from_logs(&body.logs);
    respond(
        "click_facets",
        state.assistant.extract_facets_from_clicks(&records),
    )
    .await
}
