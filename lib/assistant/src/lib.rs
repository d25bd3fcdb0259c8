//! Shopping assistant entry points.
//!
//! [`ShoppingAssistant`] pairs the completion gateway from `cartwise-ai`
//! with the decoders from `cartwise-extract`. Backends are injected, so the
//! same code runs against GitHub Models in production and a canned fake in
//! tests.

pub mod prompts;
pub mod service;

pub use service::ShoppingAssistant;
