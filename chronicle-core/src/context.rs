//! Seed context loaded from document extraction, and model-driven
//! context expansion.
//!
//! The extraction step itself is an external collaborator; this module
//! consumes its JSON output (category -> list of name/description
//! entries) and can ask the model to grow each category with one new
//! entry, using the existing ones as few-shot examples.

use crate::generator::ChatModel;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;
use tokio::fs;

/// One extracted entity: a proper noun plus a free-text description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextItem {
    #[serde(alias = "Name")]
    pub name: String,
    #[serde(alias = "Description")]
    pub description: String,
}

/// Errors from context loading.
#[derive(Debug, Error)]
pub enum ContextError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors from model-driven context expansion.
#[derive(Debug, Error)]
pub enum ExpandError {
    #[error("model error: {0}")]
    Model(#[from] openai::Error),

    #[error("model produced an invalid context item: {0}")]
    InvalidItem(String),
}

/// Seed context injected into every generation prompt for a run.
#[derive(Debug, Clone, Default)]
pub struct SeedContext {
    categories: BTreeMap<String, Vec<ContextItem>>,
}

impl SeedContext {
    /// Load seed context from the extraction output file.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ContextError> {
        let content = fs::read_to_string(path).await?;
        let categories = serde_json::from_str(&content)?;
        Ok(Self { categories })
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Iterate categories with their items.
    pub fn categories(&self) -> impl Iterator<Item = (&str, &[ContextItem])> {
        self.categories
            .iter()
            .map(|(name, items)| (name.as_str(), items.as_slice()))
    }

    /// The context section of the system prompt. Empty when no context
    /// was loaded.
    pub fn prompt_section(&self) -> String {
        if self.categories.is_empty() {
            return String::new();
        }

        let mut section =
            String::from("\nSome additional context for this world can be found below:\n");
        for (category, items) in &self.categories {
            section.push_str(category);
            section.push_str(":\n");
            for item in items {
                section.push_str(&format!("- {}: {}\n", item.name, item.description));
            }
        }
        section
    }
}

/// Ask the model for one new context item per category, seeded with the
/// generated history so far.
///
/// Each category is expanded independently with a JSON-format request;
/// a malformed reply fails the expansion rather than retrying.
pub async fn expand_context(
    model: &dyn ChatModel,
    setting: &str,
    seed: &SeedContext,
    history_digest: &str,
) -> Result<Vec<ContextItem>, ExpandError> {
    let mut items = Vec::new();

    for (category, examples) in seed.categories() {
        let system = expansion_system_prompt(setting, category, examples, history_digest);
        let request = openai::Request::new(vec![openai::Message::user(
            "Generate a new item in this category",
        )])
        .with_system(system)
        .with_json_response();

        let response = model.complete(request).await?;
        let item: ContextItem = serde_json::from_str(response.content.trim())
            .map_err(|e| ExpandError::InvalidItem(e.to_string()))?;

        tracing::info!(category, name = %item.name, "expanded context");
        items.push(item);
    }

    Ok(items)
}

fn expansion_system_prompt(
    setting: &str,
    category: &str,
    examples: &[ContextItem],
    history_digest: &str,
) -> String {
    let mut prompt = format!(
        "You are a world history creation bot, you are creating fake history for a {setting} setting.\n\n"
    );
    prompt.push_str(include_str!("prompts/context_schema.txt"));
    prompt.push_str("\nGenerated history\n");
    prompt.push_str(history_digest);
    prompt.push_str(&format!("\n{category}:\nExamples:\n"));
    for item in examples {
        prompt.push_str(&format!("- {}: {}\n", item.name, item.description));
    }
    prompt
}
