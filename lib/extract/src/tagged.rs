//! The `FieldName=value` text convention.
//!
//! A completion may contain any amount of prose; structured data rides along
//! as lines of the form `FieldName=value`. The grammar is deliberately loose:
//!
//! - the first occurrence of `FieldName=` wins, matched case-sensitively and
//!   anywhere in the text (not only at the start of a line);
//! - the value runs to the next line break (`\n`, `\r`, U+2028, U+2029) or
//!   to the end of the text when no line break follows;
//! - further `=` and `,` characters belong to the value;
//! - `FieldName=` followed directly by a line break is present and empty.
//!
//! There is no escaping, so a value can never contain a line break.

use std::fmt;

/// The field names the assistant asks models to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldName {
    /// Free-text reply shown to the shopper.
    ChatbotMessage,
    /// `true` when the shopper asked for a product.
    ProductRequested,
    /// Search query for the requested product.
    ProductQuery,
    /// Comma-separated keywords from a conversation.
    Keywords,
    /// Comma-separated product categories.
    Categories,
    /// Comma-separated brands.
    Brands,
    /// Comma-separated price ranges.
    PriceRanges,
    /// Comma-separated store names.
    Stores,
}

impl FieldName {
    /// Every recognized field.
    pub const ALL: [Self; 8] = [
        Self::ChatbotMessage,
        Self::ProductRequested,
        Self::ProductQuery,
        Self::Keywords,
        Self::Categories,
        Self::Brands,
        Self::PriceRanges,
        Self::Stores,
    ];

    /// Returns the tag exactly as it appears in completion text.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ChatbotMessage => "ChatbotMessage",
            Self::ProductRequested => "ProductRequested",
            Self::ProductQuery => "ProductQuery",
            Self::Keywords => "Keywords",
            Self::Categories => "Categories",
            Self::Brands => "Brands",
            Self::PriceRanges => "PriceRanges",
            Self::Stores => "Stores",
        }
    }

    /// Extracts this field's raw value from `text`.
    #[must_use]
    pub fn extract(self, text: &str) -> Option<&str> {
        extract(text, self.as_str())
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns true for the characters that terminate a field value.
#[must_use]
pub fn is_line_break(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Returns the raw value of the first `name=` in `text`, or `None` when the
/// field does not occur.
#[must_use]
pub fn extract<'a>(text: &'a str, name: &str) -> Option<&'a str> {
    let start = text
        .match_indices(name)
        .map(|(at, _)| at + name.len())
        .find(|&after| text[after..].starts_with('='))?
        + 1;

    let rest = &text[start..];
    let end = rest.find(is_line_break).unwrap_or(rest.len());
    Some(&rest[..end])
}

/// Renders a single `name=value` line.
///
/// Line breaks inside `value` are replaced by spaces, since the convention
/// cannot carry them.
#[must_use]
pub fn render(name: FieldName, value: &str) -> String {
    let value = if value.contains(is_line_break) {
        tracing::debug!(field = %name, "replacing line breaks in tagged value");
        value.replace(is_line_break, " ")
    } else {
        value.to_string()
    };
    format!("{name}={value}")
}

/// Builder for completion-style text made of tagged lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaggedText {
    lines: Vec<String>,
}

impl TaggedText {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a `name=value` line.
    #[must_use]
    pub fn field(mut self, name: FieldName, value: impl AsRef<str>) -> Self {
        self.lines.push(render(name, value.as_ref()));
        self
    }

    /// Appends a `name=a,b,c` line.
    #[must_use]
    pub fn list<I, S>(self, name: FieldName, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = items
            .into_iter()
            .map(|s| s.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(",");
        self.field(name, joined)
    }

    /// Joins the lines with `\n`.
    #[must_use]
    pub fn build(&self) -> String {
        self.lines.join("\n")
    }
}

impl fmt::Display for TaggedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_runs_to_line_break() {
        let text = "ChatbotMessage=Hello there\nProductRequested=true";
        assert_eq!(extract(text, "ChatbotMessage"), Some("Hello there"));
    }

    #[test]
    fn trailing_field_runs_to_end_of_text() {
        let text = "ChatbotMessage=Hi\nProductQuery=running shoes";
        assert_eq!(extract(text, "ProductQuery"), Some("running shoes"));
    }

    #[test]
    fn absent_field() {
        assert_eq!(extract("ChatbotMessage=Hi", "ProductQuery"), None);
        assert_eq!(extract("", "Keywords"), None);
    }

    #[test]
    fn first_occurrence_wins() {
        let text = "Keywords=first\nKeywords=second";
        assert_eq!(extract(text, "Keywords"), Some("first"));
    }

    #[test]
    fn name_is_case_sensitive() {
        assert_eq!(extract("keywords=shoes", "Keywords"), None);
    }

    #[test]
    fn embedded_equals_belongs_to_value() {
        let text = "ProductQuery=size=10 shoes\n";
        assert_eq!(extract(text, "ProductQuery"), Some("size=10 shoes"));
    }

    #[test]
    fn embedded_commas_stay_in_raw_value() {
        assert_eq!(
            extract("Brands=Nike, Adidas,Puma", "Brands"),
            Some("Nike, Adidas,Puma")
        );
    }

    #[test]
    fn empty_value_is_present() {
        assert_eq!(extract("ProductQuery=\nStores=x", "ProductQuery"), Some(""));
        assert_eq!(extract("ProductQuery=", "ProductQuery"), Some(""));
    }

    #[test]
    fn field_embedded_in_prose() {
        let text = "Sure! Here is what I found.\n\nSome prose, Keywords=shoes, bags and more\nThanks";
        assert_eq!(extract(text, "Keywords"), Some("shoes, bags and more"));
    }

    #[test]
    fn name_without_equals_is_skipped() {
        let text = "Keywords are listed below.\nKeywords=hats";
        assert_eq!(extract(text, "Keywords"), Some("hats"));
    }

    #[test]
    fn crlf_and_unicode_line_breaks_terminate_values() {
        assert_eq!(extract("Stores=A\r\nBrands=B", "Stores"), Some("A"));
        assert_eq!(extract("Stores=A\u{2028}Brands=B", "Stores"), Some("A"));
    }

    #[test]
    fn multibyte_text_is_sliced_on_char_boundaries() {
        let text = "ChatbotMessage=¡Hola! ¿Qué tal? 👟\nProductRequested=false";
        assert_eq!(extract(text, "ChatbotMessage"), Some("¡Hola! ¿Qué tal? 👟"));
    }

    #[test]
    fn field_name_extract_matches_free_function() {
        let text = "PriceRanges=under $50";
        assert_eq!(FieldName::PriceRanges.extract(text), Some("under $50"));
    }

    #[test]
    fn field_names_round_trip_through_display() {
        for name in FieldName::ALL {
            let line = render(name, "v");
            assert_eq!(extract(&line, &name.to_string()), Some("v"));
        }
    }

    #[test]
    fn builder_renders_lines_and_lists() {
        let text = TaggedText::new()
            .field(FieldName::ChatbotMessage, "two\nlines")
            .list(FieldName::Brands, ["nike", "puma"])
            .build();
        assert_eq!(text, "ChatbotMessage=two lines\nBrands=nike,puma");
    }
}
