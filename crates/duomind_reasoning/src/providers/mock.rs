//! Mock provider: deterministic responses for running without a model.

use crate::error::GenerationError;
use crate::llm::{CompletionParams, TextGenerator};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone)]
enum MockBehavior {
    Echo,
    Fixed(String),
    Fail(String),
}

/// Answers every prompt with a line derived from its `Task:` line.
///
/// Test hooks: a fixed reply, a forced failure, an artificial delay, and a
/// record of the parameters each call was made with.
#[derive(Debug, Clone)]
pub struct MockProvider {
    label: String,
    behavior: MockBehavior,
    delay: Duration,
    calls: Arc<Mutex<Vec<CompletionParams>>>,
}

impl MockProvider {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            behavior: MockBehavior::Echo,
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Always reply with `text`.
    pub fn fixed(label: &str, text: &str) -> Self {
        Self {
            behavior: MockBehavior::Fixed(text.to_string()),
            ..Self::new(label)
        }
    }

    /// Always reply with empty text.
    pub fn empty(label: &str) -> Self {
        Self::fixed(label, "")
    }

    /// Always fail with a request error carrying `message`.
    pub fn failing(label: &str, message: &str) -> Self {
        Self {
            behavior: MockBehavior::Fail(message.to_string()),
            ..Self::new(label)
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Parameters of every call so far, in call order.
    pub fn recorded_params(&self) -> Vec<CompletionParams> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn echo(&self, prompt: &str, params: CompletionParams) -> String {
        let task_line = prompt
            .lines()
            .map(str::trim)
            .find(|l| l.starts_with("Task:"))
            .or_else(|| prompt.lines().map(str::trim).find(|l| !l.is_empty()))
            .unwrap_or("<empty prompt>");
        format!(
            "(Mock {}) {} [temperature={:.2}]",
            self.label, task_line, params.temperature
        )
    }
}

#[async_trait::async_trait]
impl TextGenerator for MockProvider {
    fn name(&self) -> &str {
        &self.label
    }

    async fn generate(
        &self,
        prompt: &str,
        params: CompletionParams,
    ) -> Result<String, GenerationError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(params);
        }
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match &self.behavior {
            MockBehavior::Echo => Ok(self.echo(prompt, params)),
            MockBehavior::Fixed(text) => Ok(text.clone()),
            MockBehavior::Fail(message) => Err(GenerationError::Request {
                provider: self.label.clone(),
                message: message.clone(),
            }),
        }
    }
}
