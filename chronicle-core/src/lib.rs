//! Fictional history timeline generation with an LLM chronicler.
//!
//! This crate provides:
//! - Theme palette and year selection for prompt variety
//! - Prompt assembly for an OpenAI-compatible chat model
//! - A generate/validate/retry loop for schema-bound events
//! - History accumulation and sorted JSON serialization
//! - Seed-context loading and model-driven context expansion
//!
//! # Quick Start
//!
//! ```ignore
//! use chronicle_core::{Chronicler, Config, SeedContext};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.json").await?;
//!     let client = openai::Client::new(&config.api_key)
//!         .with_base_url(&config.api_base)
//!         .with_model(&config.model_name);
//!
//!     let mut chronicler = Chronicler::new(Arc::new(client), &config, &SeedContext::default());
//!     let history = chronicler.generate_history().await?;
//!     chronicle_core::history::save_to_json(&history, &config.output_file).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod context;
pub mod event;
pub mod generator;
pub mod history;
pub mod palette;
pub mod prompt;
pub mod testing;

// Primary public API
pub use config::{Config, ConfigError};
pub use context::{ContextError, ContextItem, ExpandError, SeedContext};
pub use event::{Event, Scale, Violation};
pub use generator::{ChatModel, Chronicler, GenerateError};
pub use history::{EventPayload, HistoryRecord, WriteError};
pub use palette::ThemePalette;
pub use testing::ScriptedModel;
