//! Click-log aggregation.
//!
//! Shopper clicks arrive as loosely-shaped analytics events. Each one is read
//! into a narrow [`ClickRecord`], rendered to a single line of context for
//! the model, and the model's answer is decoded into four facet lists.
//!
//! Unlike the chat reply, facets are independent: a missing `Brands` line
//! leaves `brands` empty without touching the other three.

use crate::normalize;
use crate::tagged::{FieldName, TaggedText};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Separator between rendered click records.
pub const RECORD_SEPARATOR: &str = "; ";

/// One clicked product, as read from a log entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClickRecord {
    /// Product title.
    #[serde(default)]
    pub title: Option<String>,
    /// Store or site the product was listed on.
    #[serde(default)]
    pub source: Option<String>,
    /// Listed price.
    #[serde(default)]
    pub price: Option<f64>,
}

impl ClickRecord {
    /// Creates a record with a title and a source and no price.
    #[must_use]
    pub fn new(title: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            source: Some(source.into()),
            price: None,
        }
    }

    /// Sets the price.
    #[must_use]
    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    /// Reads a record from an analytics log entry.
    ///
    /// Fields are taken from the entry's `params` object when it has one,
    /// otherwise from the entry itself. Anything of the wrong shape is
    /// dropped: non-string titles and sources, and prices that are neither
    /// finite numbers nor numeric strings.
    #[must_use]
    pub fn from_log_entry(entry: &JsonValue) -> Self {
        let fields = entry
            .get("params")
            .filter(|params| params.is_object())
            .unwrap_or(entry);

        let text = |key: &str| fields.get(key).and_then(JsonValue::as_str).map(str::to_string);
        let price = fields.get("price").and_then(|value| match value {
            JsonValue::Number(n) => n.as_f64(),
            JsonValue::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        });

        Self {
            title: text("title"),
            source: text("source"),
            price: price.filter(|p| p.is_finite()),
        }
    }

    /// Renders `Title: {title}, Store: {source}, Price: ${price}`, or `None`
    /// when both title and source are empty.
    #[must_use]
    pub fn render(&self) -> Option<String> {
        let title = self.title.as_deref().unwrap_or_default();
        let source = self.source.as_deref().unwrap_or_default();
        if title.is_empty() && source.is_empty() {
            return None;
        }

        let price = match self.price {
            Some(p) if p.is_finite() && p != 0.0 => p,
            _ => 0.0,
        };
        Some(format!("Title: {title}, Store: {source}, Price: ${price}"))
    }
}

/// Reads every log entry into a [`ClickRecord`].
#[must_use]
pub fn records_from_logs(entries: &[JsonValue]) -> Vec<ClickRecord> {
    entries.iter().map(ClickRecord::from_log_entry).collect()
}

/// Renders the records that carry a title or a source into one line of
/// model context.
///
/// Callers skip the model entirely for an empty record list; this function
/// just returns an empty string for it.
#[must_use]
pub fn summarize(records: &[ClickRecord]) -> String {
    records
        .iter()
        .filter_map(ClickRecord::render)
        .collect::<Vec<_>>()
        .join(RECORD_SEPARATOR)
}

/// Facets inferred from a shopper's clicks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetExtraction {
    /// Product categories.
    pub categories: Vec<String>,
    /// Brands.
    pub brands: Vec<String>,
    /// Price ranges, in whatever wording the model used.
    pub price_ranges: Vec<String>,
    /// Store names.
    pub stores: Vec<String>,
}

impl FacetExtraction {
    /// All four facets empty.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns whether every facet is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
            && self.brands.is_empty()
            && self.price_ranges.is_empty()
            && self.stores.is_empty()
    }

    /// Re-encodes the non-empty facets in the tagged-field convention.
    #[must_use]
    pub fn to_tagged_text(&self) -> String {
        [
            (FieldName::Categories, &self.categories),
            (FieldName::Brands, &self.brands),
            (FieldName::PriceRanges, &self.price_ranges),
            (FieldName::Stores, &self.stores),
        ]
        .into_iter()
        .filter(|(_, values)| !values.is_empty())
        .fold(TaggedText::new(), |text, (name, values)| text.list(name, values))
        .build()
    }
}

/// Decodes the four facet fields of a completion independently.
#[must_use]
pub fn decode(completion: &str) -> FacetExtraction {
    let facet = |name: FieldName| normalize::delimited_list(name.extract(completion));

    FacetExtraction {
        categories: facet(FieldName::Categories),
        brands: facet(FieldName::Brands),
        price_ranges: facet(FieldName::PriceRanges),
        stores: facet(FieldName::Stores),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn discards_records_without_title_and_source() {
        let records = vec![
            ClickRecord::new("", ""),
            ClickRecord::new("Shoe", "StoreA").with_price(40.0),
        ];
        assert_eq!(summarize(&records), "Title: Shoe, Store: StoreA, Price: $40");
    }

    #[test]
    fn joins_records_with_semicolons() {
        let records = vec![
            ClickRecord::new("Shoe", "StoreA").with_price(40.0),
            ClickRecord::new("Bag", "StoreB").with_price(19.99),
        ];
        assert_eq!(
            summarize(&records),
            "Title: Shoe, Store: StoreA, Price: $40; Title: Bag, Store: StoreB, Price: $19.99"
        );
    }

    #[test]
    fn missing_fields_default() {
        let title_only = ClickRecord {
            title: Some("Lamp".to_string()),
            ..ClickRecord::default()
        };
        assert_eq!(
            title_only.render().as_deref(),
            Some("Title: Lamp, Store: , Price: $0")
        );

        let source_only = ClickRecord {
            source: Some("StoreC".to_string()),
            ..ClickRecord::default()
        };
        assert_eq!(
            source_only.render().as_deref(),
            Some("Title: , Store: StoreC, Price: $0")
        );

        assert_eq!(ClickRecord::default().render(), None);
    }

    #[test]
    fn odd_prices_render_as_zero() {
        for price in [f64::NAN, f64::INFINITY, -0.0] {
            let record = ClickRecord::new("Cap", "StoreD").with_price(price);
            assert_eq!(
                record.render().as_deref(),
                Some("Title: Cap, Store: StoreD, Price: $0"),
                "price {price}"
            );
        }
    }

    #[test]
    fn all_records_discarded_gives_empty_summary() {
        assert_eq!(summarize(&[ClickRecord::new("", "")]), "");
        assert_eq!(summarize(&[]), "");
    }

    #[test]
    fn reads_params_from_log_entries() {
        let entry = json!({
            "event": "product_click",
            "params": { "title": "Trail Shoe", "source": "StoreA", "price": 89.5 }
        });
        assert_eq!(
            ClickRecord::from_log_entry(&entry),
            ClickRecord::new("Trail Shoe", "StoreA").with_price(89.5)
        );
    }

    #[test]
    fn reads_flat_entries_and_numeric_strings() {
        let entry = json!({ "title": "Mug", "source": "StoreE", "price": " 12.5 " });
        assert_eq!(
            ClickRecord::from_log_entry(&entry),
            ClickRecord::new("Mug", "StoreE").with_price(12.5)
        );
    }

    #[test]
    fn wrong_shapes_are_dropped() {
        let entry = json!({
            "params": { "title": 42, "source": ["x"], "price": "cheap" }
        });
        let record = ClickRecord::from_log_entry(&entry);
        assert_eq!(record, ClickRecord::default());
        assert_eq!(record.render(), None);

        let records = records_from_logs(&[json!(null), json!("click"), json!({ "params": null })]);
        assert!(records.iter().all(|r| *r == ClickRecord::default()));
    }

    #[test]
    fn decodes_facets_independently() {
        let facets = decode("Categories=Shoes,Bags\nBrands=Nike");
        assert_eq!(
            facets,
            FacetExtraction {
                categories: vec!["shoes".to_string(), "bags".to_string()],
                brands: vec!["nike".to_string()],
                price_ranges: vec![],
                stores: vec![],
            }
        );
    }

    #[test]
    fn facets_are_not_deduplicated() {
        let facets = decode("Stores=StoreA, storea\nPriceRanges=$0-$50, $50-$100");
        assert_eq!(facets.stores, vec!["storea", "storea"]);
        assert_eq!(facets.price_ranges, vec!["$0-$50", "$50-$100"]);
    }

    #[test]
    fn completion_without_facets_is_empty() {
        assert!(decode("I can't tell from these clicks.").is_empty());
        assert!(FacetExtraction::empty().is_empty());
    }

    #[test]
    fn re_decoding_serialized_facets_is_stable() {
        let original = decode("Categories=Shoes, Socks\nBrands=Nike\nStores=StoreA");
        assert_eq!(decode(&original.to_tagged_text()), original);
    }

    #[test]
    fn serializes_in_camel_case() {
        let json = serde_json::to_value(FacetExtraction::empty()).expect("serialize");
        assert_eq!(
            json,
            json!({ "categories": [], "brands": [], "priceRanges": [], "stores": [] })
        );
    }
}
