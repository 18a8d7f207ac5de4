//! Prompt assembly.
//!
//! This module is intentionally dumb: it only formats text. No parsing,
//! no networking, no retry logic. The static scaffolding lives in
//! `prompts/*.txt`; everything dynamic is pushed in around it.

use crate::context::SeedContext;
use crate::history::{timeline_digest, HistoryRecord};
use crate::palette::ThemePalette;
use uuid::Uuid;

/// Who decides an event's year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearDirective {
    /// The model is asked to emit the year itself.
    ModelChooses,
    /// The year selector already drew one; the model is told to use it.
    Preselected(i64),
}

/// Build the static system prompt, once per run.
pub fn build_system_prompt(setting: &str, structured: bool, seed: &SeedContext) -> String {
    let mut prompt = format!(
        "You are a world history creation bot, you are creating fake history for a {setting} setting.\n"
    );

    if structured {
        prompt.push_str(include_str!("prompts/json_format.txt"));
    } else {
        prompt.push_str(include_str!("prompts/text_format.txt"));
    }

    prompt.push('\n');
    prompt.push_str(include_str!("prompts/scale_guide.txt"));
    prompt.push_str(&seed.prompt_section());

    prompt
}

/// Build the per-call user prompt.
///
/// The running-history digest is always sorted by year ascending, so
/// the model sees a coherent timeline regardless of generation order.
pub fn build_user_prompt(
    nonce: Uuid,
    palette: &ThemePalette,
    start_year: i64,
    end_year: i64,
    num_events: usize,
    history: &[HistoryRecord],
    directive: YearDirective,
) -> String {
    let mut prompt = String::new();

    // Defeats deterministic repetition by the model across calls.
    prompt.push_str(&format!("Uniqueness key: {nonce}\n"));

    prompt.push_str(&palette.instruction());

    prompt.push_str(&format!(
        "Events will be generated up to year {end_year}, there will be a total of {num_events} \
         number of years generated, with year {start_year} being the beginning of history\n"
    ));

    if !history.is_empty() {
        prompt.push_str("The history generated so far, in chronological order:\n");
        prompt.push_str(&timeline_digest(history));
    }

    match directive {
        YearDirective::ModelChooses => {
            prompt.push_str("Generate a historical event description including the year it occurred:");
        }
        YearDirective::Preselected(year) => {
            prompt.push_str(&format!(
                "Generate a historical event description for the year {year}:"
            ));
        }
    }

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Event, Scale};
    use crate::history::EventPayload;
    use chrono::Utc;

    fn record(id: u64, year: i64, name: &str) -> HistoryRecord {
        HistoryRecord {
            id,
            year,
            event: EventPayload::Structured(Event {
                year,
                scale: Scale::Middling,
                length: 1,
                name: name.to_string(),
                description: String::new(),
            }),
            timestamp: Utc::now(),
        }
    }

    fn palette() -> ThemePalette {
        ThemePalette {
            include: vec!["trade"],
            exclude: vec![],
        }
    }

    #[test]
    fn test_user_prompt_section_order() {
        let nonce = Uuid::new_v4();
        let history = vec![record(1, 1200, "The Founding")];
        let prompt = build_user_prompt(
            nonce,
            &palette(),
            1000,
            2000,
            5,
            &history,
            YearDirective::ModelChooses,
        );

        let nonce_at = prompt.find(&nonce.to_string()).unwrap();
        let palette_at = prompt.find("Include these themes").unwrap();
        let bounds_at = prompt.find("up to year 2000").unwrap();
        let digest_at = prompt.find("The Founding").unwrap();
        let final_at = prompt.find("including the year it occurred").unwrap();

        assert!(nonce_at < palette_at);
        assert!(palette_at < bounds_at);
        assert!(bounds_at < digest_at);
        assert!(digest_at < final_at);
    }

    #[test]
    fn test_digest_is_sorted_by_year_regardless_of_generation_order() {
        let history = vec![record(1, 1900, "Late"), record(2, 1100, "Early")];
        let prompt = build_user_prompt(
            Uuid::new_v4(),
            &palette(),
            1000,
            2000,
            5,
            &history,
            YearDirective::ModelChooses,
        );

        assert!(prompt.find("Early").unwrap() < prompt.find("Late").unwrap());
    }

    #[test]
    fn test_preselected_year_appears_in_final_instruction() {
        let prompt = build_user_prompt(
            Uuid::new_v4(),
            &palette(),
            1000,
            2000,
            5,
            &[],
            YearDirective::Preselected(1500),
        );
        assert!(prompt.ends_with("for the year 1500:"));
        assert!(!prompt.contains("history generated so far"));
    }

    #[test]
    fn test_system_prompt_carries_setting_format_and_context() {
        let seed = SeedContext::default();
        let prompt = build_system_prompt("space opera", true, &seed);
        assert!(prompt.contains("space opera"));
        assert!(prompt.contains("single JSON object"));
        assert!(prompt.contains("Periods are the beginning of large events"));

        let text_prompt = build_system_prompt("space opera", false, &seed);
        assert!(text_prompt.contains("Year: <year> Scale: <scale>"));
    }
}
