//! Foundational types shared by the cartwise crates.
//!
//! Holds the rootcause-backed `Result` alias every fallible API returns and
//! the ULID identifiers used to correlate requests and completions in logs.

pub mod error;
pub mod id;

pub use error::Result;
pub use id::{InvocationId, ParseIdError, RequestId};
