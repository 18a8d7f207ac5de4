//! Structured event schema and validation.
//!
//! In schema-bound mode the model's response must decode into [`Event`]
//! and satisfy the field constraints below. Validation returns the full
//! list of violated constraints so the retry loop can log them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Narrative granularity of an event, coarse to fine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scale {
    /// The beginning of a large-scale era.
    Period,
    /// A narrative-moving occurrence within a Period.
    Middling,
    /// A granular character-level moment.
    Scene,
}

impl Scale {
    fn parse(s: &str) -> Option<Self> {
        match s {
            _ if s.eq_ignore_ascii_case("period") => Some(Scale::Period),
            _ if s.eq_ignore_ascii_case("middling") => Some(Scale::Middling),
            _ if s.eq_ignore_ascii_case("scene") => Some(Scale::Scene),
            _ => None,
        }
    }
}

/// One generated history entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub year: i64,
    pub scale: Scale,
    /// Duration in years.
    pub length: i64,
    pub name: String,
    pub description: String,
}

/// A constraint violated by a model response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("response is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("year must be positive, got {0}")]
    YearNotPositive(i64),

    #[error("length must be positive, got {0}")]
    LengthNotPositive(i64),

    #[error("scale must be one of Period, Middling, Scene; got {0:?}")]
    UnknownScale(String),
}

/// Decode shape before constraint checks. Models sometimes emit the
/// title under `event` instead of `name`; both are accepted.
#[derive(Debug, Deserialize)]
struct RawEvent {
    year: i64,
    scale: String,
    length: i64,
    #[serde(alias = "event")]
    name: String,
    description: String,
}

impl Event {
    /// Parse and validate a model response.
    ///
    /// Returns the validated event, or every constraint the response
    /// violated.
    pub fn parse(text: &str) -> Result<Event, Vec<Violation>> {
        let raw: RawEvent = serde_json::from_str(strip_code_fence(text))
            .map_err(|e| vec![Violation::InvalidJson(e.to_string())])?;

        let mut violations = Vec::new();

        if raw.year <= 0 {
            violations.push(Violation::YearNotPositive(raw.year));
        }
        if raw.length <= 0 {
            violations.push(Violation::LengthNotPositive(raw.length));
        }
        let scale = match Scale::parse(&raw.scale) {
            Some(scale) => scale,
            None => {
                violations.push(Violation::UnknownScale(raw.scale.clone()));
                Scale::Scene
            }
        };

        if !violations.is_empty() {
            return Err(violations);
        }

        Ok(Event {
            year: raw.year,
            scale,
            length: raw.length,
            name: raw.name,
            description: raw.description,
        })
    }
}

/// Strip a surrounding markdown code fence, which chat models like to
/// wrap JSON in even when told not to.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
