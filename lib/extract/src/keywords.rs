//! Keyword extraction from conversation history.

use crate::normalize;
use crate::tagged::{FieldName, TaggedText};
use serde::{Deserialize, Serialize};

/// Joins the caller's messages with single spaces into the text sent to the
/// model.
#[must_use]
pub fn join_messages<S: AsRef<str>>(messages: &[S]) -> String {
    messages
        .iter()
        .map(|m| m.as_ref())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lowercased, trimmed, deduplicated keywords.
///
/// Iteration follows first occurrence in the completion; equality ignores
/// order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct KeywordSet {
    keywords: Vec<String>,
}

impl KeywordSet {
    /// Returns the number of keywords.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    /// Returns whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Returns whether `keyword` is in the set.
    #[must_use]
    pub fn contains(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k == keyword)
    }

    /// Iterates over the keywords.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(String::as_str)
    }

    /// Consumes the set, returning the keywords in first-occurrence order.
    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        self.keywords
    }

    /// Re-encodes the set in the tagged-field convention. An empty set
    /// renders no line, since `Keywords=` would decode to one empty keyword.
    #[must_use]
    pub fn to_tagged_text(&self) -> String {
        if self.is_empty() {
            return String::new();
        }
        TaggedText::new()
            .list(FieldName::Keywords, &self.keywords)
            .build()
    }
}

impl From<Vec<String>> for KeywordSet {
    fn from(keywords: Vec<String>) -> Self {
        let mut deduped: Vec<String> = Vec::with_capacity(keywords.len());
        for keyword in keywords {
            if !deduped.contains(&keyword) {
                deduped.push(keyword);
            }
        }
        Self { keywords: deduped }
    }
}

impl From<KeywordSet> for Vec<String> {
    fn from(set: KeywordSet) -> Self {
        set.keywords
    }
}

impl PartialEq for KeywordSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|k| other.contains(k))
    }
}

impl Eq for KeywordSet {}

impl IntoIterator for KeywordSet {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.keywords.into_iter()
    }
}

/// Decodes the `Keywords` field of a completion. A missing field yields an
/// empty set.
#[must_use]
pub fn decode(completion: &str) -> KeywordSet {
    KeywordSet {
        keywords: normalize::deduplicated_list(FieldName::Keywords.extract(completion)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> KeywordSet {
        KeywordSet::from(items.iter().map(|s| (*s).to_string()).collect::<Vec<_>>())
    }

    #[test]
    fn joins_messages_with_single_spaces() {
        let messages = vec!["I need shoes".to_string(), "for running".to_string()];
        assert_eq!(join_messages(&messages), "I need shoes for running");
        assert_eq!(join_messages::<&str>(&[]), "");
        assert_eq!(join_messages(&["one"]), "one");
    }

    #[test]
    fn decodes_deduplicated_lowercase_keywords() {
        let keywords = decode("Keywords=Shoes, RUNNING , shoes");
        assert_eq!(keywords.len(), 2);
        assert!(keywords.contains("shoes"));
        assert!(keywords.contains("running"));
        assert_eq!(keywords, set(&["running", "shoes"]));
    }

    #[test]
    fn missing_field_is_empty_set() {
        assert!(decode("I could not find any keywords.").is_empty());
    }

    #[test]
    fn keywords_amid_prose() {
        let keywords = decode("Here you go:\nKeywords=hiking boots,Waterproof\nHope that helps");
        assert_eq!(keywords.into_vec(), vec!["hiking boots", "waterproof"]);
    }

    #[test]
    fn equality_ignores_order() {
        assert_eq!(set(&["a", "b"]), set(&["b", "a"]));
        assert_ne!(set(&["a", "b"]), set(&["a"]));
    }

    #[test]
    fn deserializing_drops_duplicates() {
        let parsed: KeywordSet = serde_json::from_str(r#"["bags","bags","hats"]"#).expect("parse");
        assert_eq!(parsed.len(), 2);
        let json = serde_json::to_string(&parsed).expect("serialize");
        assert_eq!(json, r#"["bags","hats"]"#);
    }

    #[test]
    fn re_decoding_serialized_set_is_stable() {
        let original = decode("Keywords=Laptop, USB-C hub ,laptop,Charger");
        assert_eq!(decode(&original.to_tagged_text()), original);
    }

    #[test]
    fn re_decoding_serialized_empty_set_is_stable() {
        let original = decode("no keywords here");
        assert!(original.is_empty());
        assert_eq!(original.to_tagged_text(), "");
        assert_eq!(decode(&original.to_tagged_text()), original);
    }
}
