//! System instructions for each assistant operation.
//!
//! Field tags are written as `{{FieldName}}` placeholders and filled in from
//! [`FieldName::as_str`], so the instructions always name exactly the tags
//! the decoders look for.

use cartwise_ai::{PromptRegistry, PromptTemplate, VariableDefinition};
use cartwise_extract::FieldName;
use std::collections::HashMap;

/// Template for shopper chat replies.
pub const CHAT_REPLY: &str = "chat_reply";
/// Template for keyword extraction from conversation history.
pub const KEYWORDS: &str = "keywords";
/// Template for facet extraction from click summaries.
pub const CLICK_FACETS: &str = "click_facets";

const CHAT_REPLY_TEXT: &str = "\
You are a friendly shopping assistant. Answer the shopper's message, then \
decide whether they are asking to find or buy a product.

Reply with exactly these three lines and nothing else:
{{ChatbotMessage}}=<your reply to the shopper, on one line>
{{ProductRequested}}=<true if they want a product, otherwise false>
{{ProductQuery}}=<a short product search query, or empty if none>";

const KEYWORDS_TEXT: &str = "\
You extract shopping interests from a conversation. Identify the products, \
product types, brands and attributes the shopper cares about.

Reply with exactly one line and nothing else:
{{Keywords}}=<comma-separated keywords>";

const CLICK_FACETS_TEXT: &str = "\
You analyze the products a shopper clicked on. Each click is given as \
'Title: ..., Store: ..., Price: $...' and clicks are separated by semicolons.

Reply with exactly these four lines and nothing else, each a \
comma-separated list (leave a list empty if nothing fits):
{{Categories}}=<product categories>
{{Brands}}=<brands>
{{PriceRanges}}=<price ranges such as $0-$50>
{{Stores}}=<stores>";

fn template(name: &str, content: &str, fields: &[FieldName]) -> PromptTemplate {
    fields.iter().fold(PromptTemplate::new(name, content), |t, field| {
        t.with_variable(
            field.as_str(),
            VariableDefinition::required(format!("tag for the {field} field")),
        )
    })
}

/// The built-in templates.
#[must_use]
pub fn default_registry() -> PromptRegistry {
    let mut registry = PromptRegistry::new();
    registry.register(template(
        CHAT_REPLY,
        CHAT_REPLY_TEXT,
        &[
            FieldName::ChatbotMessage,
            FieldName::ProductRequested,
            FieldName::ProductQuery,
        ],
    ));
    registry.register(template(KEYWORDS, KEYWORDS_TEXT, &[FieldName::Keywords]));
    registry.register(template(
        CLICK_FACETS,
        CLICK_FACETS_TEXT,
        &[
            FieldName::Categories,
            FieldName::Brands,
            FieldName::PriceRanges,
            FieldName::Stores,
        ],
    ));
    registry
}

/// Renders the named template with every field tag filled in. Unknown names
/// render to an empty instruction.
#[must_use]
pub fn render(registry: &PromptRegistry, name: &str) -> String {
    let tags: HashMap<String, String> = FieldName::ALL
        .iter()
        .map(|field| (field.as_str().to_string(), field.as_str().to_string()))
        .collect();

    match registry.get(name) {
        Some(template) => {
            debug_assert!(template.validate_variables(&tags).is_ok());
            template.render(&tags)
        }
        None => {
            tracing::warn!(template = name, "prompt template not registered");
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_holds_all_templates() {
        let registry = default_registry();
        assert_eq!(registry.len(), 3);
        for name in [CHAT_REPLY, KEYWORDS, CLICK_FACETS] {
            assert!(registry.get(name).is_some(), "{name} missing");
        }
    }

    #[test]
    fn rendered_prompts_name_their_fields() {
        let registry = default_registry();

        let chat = render(&registry, CHAT_REPLY);
        assert!(chat.contains("ChatbotMessage=<"));
        assert!(chat.contains("ProductRequested=<"));
        assert!(chat.contains("ProductQuery=<"));

        let keywords = render(&registry, KEYWORDS);
        assert!(keywords.contains("Keywords=<"));

        let facets = render(&registry, CLICK_FACETS);
        for field in ["Categories", "Brands", "PriceRanges", "Stores"] {
            assert!(facets.contains(&format!("{field}=<")), "{field} missing");
        }
    }

    #[test]
    fn rendered_prompts_have_no_leftover_placeholders() {
        let registry = default_registry();
        for name in [CHAT_REPLY, KEYWORDS, CLICK_FACETS] {
            let rendered = render(&registry, name);
            assert!(!rendered.contains("{{"), "{name}: {rendered}");
        }
    }

    #[test]
    fn unknown_template_renders_empty() {
        assert_eq!(render(&default_registry(), "nope"), "");
    }
}
