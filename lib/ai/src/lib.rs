//! Completion gateway for cartwise.
//!
//! Everything the rest of the workspace knows about language models goes
//! through the [`LlmBackend`] trait: a list of role-tagged messages plus
//! sampling parameters in, one free-text completion out.
//!
//! - [`LlmCall`]: a single-shot call with a fixed system instruction
//! - [`PromptTemplate`]: `{{variable}}` templates for those instructions
//! - [`OpenAiCompatibleBackend`]: HTTP backend for `/chat/completions` APIs

pub mod backend;
pub mod error;
pub mod llm_call;
pub mod openai;
pub mod prompt;

pub use backend::{
    LlmBackend, LlmBackendConfig, LlmMessage, LlmProvider, LlmRequest, LlmResponse, MessageRole,
    TokenUsage,
};
pub use error::LlmError;
pub use llm_call::{LlmCall, LlmCallConfig, LlmCallResult};
pub use openai::OpenAiCompatibleBackend;
pub use prompt::{PromptRegistry, PromptTemplate, VariableDefinition};
