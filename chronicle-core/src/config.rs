//! Run configuration loaded from a JSON file.
//!
//! Configuration is read once at startup and passed by reference into
//! each component; nothing reads it through global state.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

/// Errors from configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Run configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// The fictional genre/world description, e.g. "high fantasy".
    pub setting: String,

    /// Model name passed through to the chat API.
    pub model_name: String,

    /// API key for the chat API.
    pub api_key: String,

    /// Base URL of an OpenAI-compatible server.
    pub api_base: String,

    /// Sampling temperature.
    pub temperature: f32,

    /// Number of events to generate when not overridden on the CLI.
    #[serde(default = "default_events_count")]
    pub events_count: usize,

    /// Output path for the sorted timeline.
    #[serde(default = "default_output_file")]
    pub output_file: PathBuf,

    /// First year of history.
    #[serde(default = "default_start_year")]
    pub start_year: i64,

    /// Events are generated up to this year.
    #[serde(default = "default_end_year")]
    pub end_year: i64,

    /// When true the model chooses each event's year; otherwise the
    /// year selector draws one and the model is told to use it.
    #[serde(default = "default_true")]
    pub llm_generates_year: bool,

    /// When true, seed context extracted from documents is loaded and
    /// injected into every prompt.
    #[serde(default)]
    pub document_extraction: bool,

    /// Schema-bound mode: validate each response as a structured event.
    /// When false, raw text responses are accepted as-is.
    #[serde(default = "default_true")]
    pub structured_events: bool,

    /// Cap on validation retries per event. `None` retries forever.
    #[serde(default)]
    pub max_attempts: Option<u32>,
}

fn default_events_count() -> usize {
    10
}

fn default_output_file() -> PathBuf {
    PathBuf::from("history.json")
}

fn default_start_year() -> i64 {
    1000
}

fn default_end_year() -> i64 {
    2000
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a JSON file.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "setting": "high fantasy",
        "model_name": "local-model",
        "api_key": "sk-test",
        "api_base": "http://localhost:1234/v1",
        "temperature": 0.7
    }"#;

    #[test]
    fn test_defaults_applied() {
        let config: Config = serde_json::from_str(MINIMAL).unwrap();
        assert_eq!(config.events_count, 10);
        assert_eq!(config.output_file, PathBuf::from("history.json"));
        assert_eq!(config.start_year, 1000);
        assert_eq!(config.end_year, 2000);
        assert!(config.llm_generates_year);
        assert!(!config.document_extraction);
        assert!(config.structured_events);
        assert_eq!(config.max_attempts, None);
    }

    #[test]
    fn test_explicit_values_override_defaults() {
        let config: Config = serde_json::from_str(
            r#"{
                "setting": "space opera",
                "model_name": "gpt-4o-mini",
                "api_key": "sk-test",
                "api_base": "https://api.openai.com/v1",
                "temperature": 1.0,
                "events_count": 3,
                "output_file": "out/timeline.json",
                "start_year": 1,
                "end_year": 500,
                "llm_generates_year": false,
                "document_extraction": true,
                "structured_events": false,
                "max_attempts": 5
            }"#,
        )
        .unwrap();

        assert_eq!(config.events_count, 3);
        assert_eq!(config.output_file, PathBuf::from("out/timeline.json"));
        assert_eq!(config.start_year, 1);
        assert_eq!(config.end_year, 500);
        assert!(!config.llm_generates_year);
        assert!(config.document_extraction);
        assert!(!config.structured_events);
        assert_eq!(config.max_attempts, Some(5));
    }

    #[test]
    fn test_missing_required_field_is_an_error() {
        let result: Result<Config, _> = serde_json::from_str(r#"{"setting": "noir"}"#);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_load_missing_file_is_fatal() {
        let result = Config::load("does-not-exist.json").await;
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
