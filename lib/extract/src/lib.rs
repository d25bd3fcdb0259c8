//! Structured-response extraction for cartwise.
//!
//! Models are asked to answer with `FieldName=value` lines inside otherwise
//! free-form text. This crate owns that convention end to end:
//!
//! - [`tagged`]: finding a field's raw value in a completion
//! - [`normalize`]: boolean, list and free-text coercions of raw values
//! - [`chat`]: the chatbot reply, decoded all-or-nothing
//! - [`keywords`]: a deduplicated keyword set
//! - [`clicks`]: click-log summaries in, four independent facets out
//!
//! Everything here is synchronous and pure; the completion text comes from
//! the gateway in `cartwise-ai`.

pub mod chat;
pub mod clicks;
pub mod keywords;
pub mod normalize;
pub mod tagged;

pub use chat::ChatbotReply;
pub use clicks::{ClickRecord, FacetExtraction};
pub use keywords::KeywordSet;
pub use tagged::{FieldName, TaggedText};
