//! Strongly-typed identifiers.
//!
//! Identifiers wrap a ULID so they sort by creation time, which keeps log
//! lines for one request or completion easy to find.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ulid::Ulid;

/// Error returned when parsing an ID from a string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    /// The type of ID that failed to parse.
    pub id_type: &'static str,
    /// The reason for the parse failure.
    pub reason: String,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {}: {}", self.id_type, self.reason)
    }
}

impl std::error::Error for ParseIdError {}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Ulid);

        impl $name {
            /// Creates a new ID with a freshly generated ULID.
            #[must_use]
            pub fn new() -> Self {
                Self(Ulid::new())
            }

            /// Returns the underlying ULID.
            #[must_use]
            pub const fn as_ulid(&self) -> Ulid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}_{}", $prefix, self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            /// Accepts both the prefixed display form and a bare ULID.
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let raw = s.strip_prefix(concat!($prefix, "_")).unwrap_or(s);
                Ulid::from_str(raw).map(Self).map_err(|e| ParseIdError {
                    id_type: stringify!($name),
                    reason: e.to_string(),
                })
            }
        }
    };
}

define_id!(
    /// Identifies one inbound API request.
    RequestId,
    "req"
);

define_id!(
    /// Identifies one completion-gateway invocation.
    InvocationId,
    "llm"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_prefix() {
        assert!(RequestId::new().to_string().starts_with("req_"));
        assert!(InvocationId::new().to_string().starts_with("llm_"));
    }

    #[test]
    fn parse_with_and_without_prefix() {
        let id = InvocationId::new();
        let parsed: InvocationId = id.to_string().parse().expect("prefixed form");
        assert_eq!(id, parsed);

        let bare: InvocationId = id.as_ulid().to_string().parse().expect("bare ulid");
        assert_eq!(id, bare);
    }

    #[test]
    fn parse_rejects_garbage() {
        let err = "req_not-a-ulid"
            .parse::<RequestId>()
            .expect_err("should not parse");
        assert_eq!(err.id_type, "RequestId");
    }

    #[test]
    fn serializes_as_bare_ulid() {
        let id = RequestId::new();
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, format!("\"{}\"", id.as_ulid()));
    }
}
