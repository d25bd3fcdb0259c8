//! Prompt template registry.
//!
//! Templates hold the fixed system instructions sent with each completion.
//! Placeholders use `{{variable_name}}` syntax.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Definition of a template variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableDefinition {
    /// Description of what this variable is for.
    pub description: String,
    /// Whether this variable is required.
    pub required: bool,
    /// Default value if not provided.
    pub default: Option<String>,
}

impl VariableDefinition {
    /// Creates a required variable definition.
    #[must_use]
    pub fn required(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            required: true,
            default: None,
        }
    }

    /// Creates an optional variable definition.
    #[must_use]
    pub fn optional(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            required: false,
            default: None,
        }
    }

    /// Sets a default value.
    #[must_use]
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// A versioned prompt template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptTemplate {
    /// Template name (used for lookup).
    pub name: String,
    /// Semantic version.
    pub version: String,
    /// Template content with placeholders.
    pub content: String,
    /// Variable definitions (name -> definition).
    pub variables: HashMap<String, VariableDefinition>,
}

impl PromptTemplate {
    /// Creates a new prompt template.
    #[must_use]
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: "0.1.0".to_string(),
            content: content.into(),
            variables: HashMap::new(),
        }
    }

    /// Sets the version.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Adds a variable definition.
    #[must_use]
    pub fn with_variable(
        mut self,
        name: impl Into<String>,
        definition: VariableDefinition,
    ) -> Self {
        self.variables.insert(name.into(), definition);
        self
    }

    /// Renders the template, substituting provided values first and then
    /// declared defaults. Unknown placeholders are left as-is.
    #[must_use]
    pub fn render(&self, values: &HashMap<String, String>) -> String {
        let mut result = self.content.clone();

        for (name, value) in values {
            result = result.replace(&placeholder(name), value);
        }

        for (name, def) in &self.variables {
            let slot = placeholder(name);
            if let Some(default) = &def.default
                && result.contains(&slot)
            {
                result = result.replace(&slot, default);
            }
        }

        result
    }

    /// Validates that all required variables are provided.
    ///
    /// # Errors
    ///
    /// Returns the sorted names of the missing variables.
    pub fn validate_variables(&self, values: &HashMap<String, String>) -> Result<(), Vec<String>> {
        let mut missing: Vec<String> = self
            .variables
            .iter()
            .filter(|(_, def)| def.required && def.default.is_none())
            .filter(|(name, _)| !values.contains_key(*name))
            .map(|(name, _)| name.clone())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            missing.sort();
            Err(missing)
        }
    }
}

fn placeholder(name: &str) -> String {
    format!("{{{{{name}}}}}")
}

/// Registry of prompt templates, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct PromptRegistry {
    templates: HashMap<String, PromptTemplate>,
}

impl PromptRegistry {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a template, replacing any previous one with the same name.
    pub fn register(&mut self, template: PromptTemplate) {
        self.templates.insert(template.name.clone(), template);
    }

    /// Gets a template by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PromptTemplate> {
        self.templates.get(name)
    }

    /// Returns the number of registered templates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Returns whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
