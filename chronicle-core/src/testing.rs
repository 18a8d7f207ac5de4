//! Testing utilities.
//!
//! [`ScriptedModel`] is a deterministic stand-in for the chat API:
//! it returns canned responses in order and records every request it
//! receives, so generation logic can be tested without network access.

use crate::generator::ChatModel;
use async_trait::async_trait;
use std::sync::Mutex;

enum Script {
    /// Return these responses in order; fail once exhausted.
    Sequence(Vec<String>),
    /// Always return the same response.
    Repeating(String),
}

/// A scripted chat model for tests.
pub struct ScriptedModel {
    script: Script,
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    calls: usize,
    requests: Vec<openai::Request>,
}

impl ScriptedModel {
    /// Return `responses` in order. A call past the end of the script
    /// is an API error, so under-scripted tests fail loudly.
    pub fn sequence(responses: Vec<impl Into<String>>) -> Self {
        Self {
            script: Script::Sequence(responses.into_iter().map(Into::into).collect()),
            state: Mutex::new(State::default()),
        }
    }

    /// Always return the same response.
    pub fn repeating(response: impl Into<String>) -> Self {
        Self {
            script: Script::Repeating(response.into()),
            state: Mutex::new(State::default()),
        }
    }

    /// Number of completion calls made so far.
    pub fn calls(&self) -> usize {
        self.state.lock().unwrap().calls
    }

    /// Copies of every request received, in order.
    pub fn requests(&self) -> Vec<openai::Request> {
        self.state.lock().unwrap().requests.clone()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn complete(&self, request: openai::Request) -> Result<openai::Response, openai::Error> {
        let mut state = self.state.lock().unwrap();
        let index = state.calls;
        state.calls += 1;
        state.requests.push(request);

        let content = match &self.script {
            Script::Repeating(response) => response.clone(),
            Script::Sequence(responses) => responses
                .get(index)
                .cloned()
                .ok_or_else(|| openai::Error::Api {
                    status: 500,
                    message: format!("scripted model exhausted after {index} responses"),
                })?,
        };

        Ok(openai::Response::from_text(content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sequence_returns_in_order_then_errors() {
        let model = ScriptedModel::sequence(vec!["one", "two"]);
        let request = || openai::Request::new(vec![openai::Message::user("hi")]);

        assert_eq!(model.complete(request()).await.unwrap().content, "one");
        assert_eq!(model.complete(request()).await.unwrap().content, "two");
        assert!(model.complete(request()).await.is_err());
        assert_eq!(model.calls(), 3);
    }

    #[tokio::test]
    async fn test_repeating_never_runs_out() {
        let model = ScriptedModel::repeating("same");
        let request = || openai::Request::new(vec![openai::Message::user("hi")]);

        for _ in 0..5 {
            assert_eq!(model.complete(request()).await.unwrap().content, "same");
        }
        assert_eq!(model.calls(), 5);
    }
}
