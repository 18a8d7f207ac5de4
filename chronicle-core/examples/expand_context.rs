//! Expand the seed context with one new model-generated item per
//! category, using a previously generated timeline as grounding.
//!
//! Expects `config.json`, `user_context.json`, and the configured
//! output file in the working directory:
//!
//! ```bash
//! cargo run -p chronicle-core --example expand_context
//! ```

use chronicle_core::context::expand_context;
use chronicle_core::history::{timeline_digest, HistoryRecord};
use chronicle_core::{Config, SeedContext};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load("config.json").await?;
    let seed = SeedContext::load("user_context.json").await?;

    let content = tokio::fs::read_to_string(&config.output_file).await?;
    let history: Vec<HistoryRecord> = serde_json::from_str(&content)?;

    let client = openai::Client::new(&config.api_key)
        .with_base_url(&config.api_base)
        .with_model(&config.model_name);

    let items = expand_context(
        &client,
        &config.setting,
        &seed,
        &timeline_digest(&history),
    )
    .await?;

    for item in &items {
        println!("- {}: {}", item.name, item.description);
    }

    Ok(())
}
