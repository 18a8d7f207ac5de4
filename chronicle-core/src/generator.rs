//! Event generation: the model seam, year selection, and the
//! generate/validate/retry loop.

use crate::config::Config;
use crate::context::SeedContext;
use crate::event::Event;
use crate::history::{EventPayload, HistoryRecord};
use crate::palette::ThemePalette;
use crate::prompt::{build_system_prompt, build_user_prompt, YearDirective};
use async_trait::async_trait;
use chrono::{Datelike, Utc};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// The model collaborator boundary.
///
/// Implemented by [`openai::Client`] in production and by scripted
/// models in tests, so generation can be exercised without API calls.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, request: openai::Request) -> Result<openai::Response, openai::Error>;
}

#[async_trait]
impl ChatModel for openai::Client {
    async fn complete(&self, request: openai::Request) -> Result<openai::Response, openai::Error> {
        openai::Client::complete(self, request).await
    }
}

/// Errors from event generation.
///
/// Schema validation failures are not errors: they are retried inside
/// the loop. Only transport/auth failures and an exhausted retry budget
/// surface here.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("model error: {0}")]
    Model(#[from] openai::Error),

    #[error("no valid event after {attempts} attempts")]
    AttemptsExhausted { attempts: u32 },
}

/// One accepted generation result, before bookkeeping is attached.
#[derive(Debug)]
pub struct GeneratedEvent {
    pub year: i64,
    pub payload: EventPayload,
}

/// Draw a year uniformly from `[start_year, end_year]`, inclusive.
pub fn pick_year(rng: &mut impl Rng, start_year: i64, end_year: i64) -> i64 {
    let year = rng.gen_range(start_year..=end_year);
    // Clamped to end_year even though the inclusive draw cannot exceed it.
    year.min(end_year)
}

/// Scan free-text output for `Year: <n>`.
fn extract_year(text: &str) -> Option<i64> {
    let at = text.find("Year:")?;
    let rest = text[at + "Year:".len()..].trim_start();
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}

/// The history generator.
///
/// Holds the model handle, the static system prompt (built once per
/// run), and the RNG used for palette and year draws. Generation is
/// strictly sequential: each call sees the full history so far.
pub struct Chronicler {
    model: Arc<dyn ChatModel>,
    system_prompt: String,
    start_year: i64,
    end_year: i64,
    events_count: usize,
    llm_generates_year: bool,
    structured: bool,
    temperature: f32,
    max_attempts: Option<u32>,
    rng: SmallRng,
}

impl Chronicler {
    /// Create a generator from a run configuration and seed context.
    pub fn new(model: Arc<dyn ChatModel>, config: &Config, seed: &SeedContext) -> Self {
        Self {
            model,
            system_prompt: build_system_prompt(&config.setting, config.structured_events, seed),
            start_year: config.start_year,
            end_year: config.end_year,
            events_count: config.events_count,
            llm_generates_year: config.llm_generates_year,
            structured: config.structured_events,
            temperature: config.temperature,
            max_attempts: config.max_attempts,
            rng: SmallRng::from_entropy(),
        }
    }

    /// Use a fixed RNG seed, for reproducible palette and year draws.
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng = SmallRng::seed_from_u64(seed);
        self
    }

    /// Generate one event, retrying on schema validation failure.
    ///
    /// The palette, year directive, and nonce are drawn once per call;
    /// retries reuse the same prompt. Validation failures are logged at
    /// debug level and retried until a response passes or the attempt
    /// budget (when configured) runs out.
    pub async fn generate_event(
        &mut self,
        history: &[HistoryRecord],
    ) -> Result<GeneratedEvent, GenerateError> {
        let palette = ThemePalette::draw(&mut self.rng);
        let directive = if self.llm_generates_year {
            YearDirective::ModelChooses
        } else {
            YearDirective::Preselected(pick_year(&mut self.rng, self.start_year, self.end_year))
        };

        let user_prompt = build_user_prompt(
            Uuid::new_v4(),
            &palette,
            self.start_year,
            self.end_year,
            self.events_count,
            history,
            directive,
        );

        let mut attempts: u32 = 0;
        loop {
            attempts += 1;

            let mut request =
                openai::Request::new(vec![openai::Message::user(user_prompt.clone())])
                    .with_system(self.system_prompt.clone())
                    .with_temperature(self.temperature);
            if self.structured {
                request = request.with_json_response();
            }

            let response = self.model.complete(request).await?;

            if !self.structured {
                return Ok(self.accept_free_text(response.content, directive));
            }

            match Event::parse(&response.content) {
                Ok(event) => {
                    // The record's year is denormalized from the validated
                    // event; a preselected year only steers the prompt.
                    return Ok(GeneratedEvent {
                        year: event.year,
                        payload: EventPayload::Structured(event),
                    });
                }
                Err(violations) => {
                    tracing::debug!(
                        attempt = attempts,
                        ?violations,
                        "discarding response that failed validation"
                    );
                    if let Some(max) = self.max_attempts {
                        if attempts >= max {
                            return Err(GenerateError::AttemptsExhausted { attempts });
                        }
                    }
                }
            }
        }
    }

    /// Free-text mode accepts the response as-is; only the year needs
    /// recovering when the model was asked to choose it.
    fn accept_free_text(&self, content: String, directive: YearDirective) -> GeneratedEvent {
        let year = match directive {
            YearDirective::Preselected(year) => year,
            YearDirective::ModelChooses => match extract_year(&content) {
                Some(year) => year,
                None => {
                    tracing::warn!("Year not found in model response. Using current year.");
                    i64::from(Utc::now().year())
                }
            },
        };

        GeneratedEvent {
            year,
            payload: EventPayload::Text(content),
        }
    }

    /// Generate the configured number of events sequentially, assigning
    /// 1-based ids in call order and a wall-clock timestamp to each.
    pub async fn generate_history(&mut self) -> Result<Vec<HistoryRecord>, GenerateError> {
        let mut history: Vec<HistoryRecord> = Vec::with_capacity(self.events_count);

        for i in 0..self.events_count {
            let generated = self.generate_event(&history).await?;
            tracing::info!(id = i + 1, year = generated.year, "event accepted");
            history.push(HistoryRecord {
                id: (i + 1) as u64,
                year: generated.year,
                event: generated.payload,
                timestamp: Utc::now(),
            });
        }

        Ok(history)
    }
}
