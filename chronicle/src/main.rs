//! Generate a fictional history timeline using AI.
//!
//! Reads `config.json` (and `user_context.json` when document
//! extraction is enabled), generates the configured number of events
//! through an OpenAI-compatible chat model, and writes the timeline as
//! a year-sorted JSON file.

use anyhow::Context;
use chronicle_core::history::save_to_json;
use chronicle_core::{Chronicler, Config, SeedContext};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const CONFIG_PATH: &str = "config.json";
const USER_CONTEXT_PATH: &str = "user_context.json";

/// Generate a fictional history timeline using AI.
#[derive(Parser, Debug)]
#[command(name = "chronicle")]
struct Args {
    /// Number of events to generate
    #[arg(long)]
    events: Option<usize>,

    /// Output JSON filename
    #[arg(long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();

    let mut config = Config::load(CONFIG_PATH)
        .await
        .with_context(|| format!("failed to load {CONFIG_PATH}"))?;

    // CLI flags override configured values.
    if let Some(events) = args.events {
        config.events_count = events;
    }
    let output = args.output.unwrap_or_else(|| config.output_file.clone());

    let seed = if config.document_extraction {
        SeedContext::load(USER_CONTEXT_PATH)
            .await
            .with_context(|| format!("failed to load {USER_CONTEXT_PATH}"))?
    } else {
        SeedContext::default()
    };

    let client = openai::Client::new(&config.api_key)
        .with_base_url(&config.api_base)
        .with_model(&config.model_name);

    let mut chronicler = Chronicler::new(Arc::new(client), &config, &seed);

    println!("Generating history...");
    let history = chronicler.generate_history().await?;
    save_to_json(&history, &output).await?;
    println!("History saved to {}", output.display());

    Ok(())
}
