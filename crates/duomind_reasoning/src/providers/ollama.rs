//! Ollama provider
//!
//! Ollama exposes an OpenAI-compatible API at localhost:11434/v1, so one
//! non-streaming `/chat/completions` call per prompt is all we need.

use crate::error::GenerationError;
use crate::llm::{CompletionParams, TextGenerator};
use crate::retry::{with_retry, RetryConfig};
use reqwest::Client;
use serde_json::{json, Value};
use std::env;
use std::time::Duration;

const PROVIDER: &str = "Ollama";
const DEFAULT_BASE_URL: &str = "http://localhost:11434/v1";

#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
    retry: RetryConfig,
}

impl OllamaClient {
    /// `base_url` falls back to `OLLAMA_BASE_URL`, then to the local default.
    pub fn new(
        model: &str,
        base_url: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, GenerationError> {
        let base_url = base_url
            .map(str::to_string)
            .or_else(|| env::var("OLLAMA_BASE_URL").ok())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GenerationError::NotConfigured(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            model: model.to_string(),
            retry: RetryConfig::default(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

fn build_payload(model: &str, prompt: &str, params: CompletionParams) -> Value {
    json!({
        "model": model,
        "messages": [{"role": "user", "content": prompt}],
        "temperature": params.temperature,
        "max_tokens": params.max_tokens,
        "stream": false,
    })
}

/// Pull the completion text out of an OpenAI-compatible response.
///
/// A response without any choice is an error; a choice with empty or null
/// content is an empty answer.
fn parse_completion(resp_json: &Value) -> Result<String, GenerationError> {
    let choice = resp_json["choices"]
        .as_array()
        .and_then(|c| c.first())
        .ok_or_else(|| GenerationError::EmptyResponse {
            provider: PROVIDER.to_string(),
        })?;
    Ok(choice["message"]["content"]
        .as_str()
        .unwrap_or_default()
        .to_string())
}

#[async_trait::async_trait]
impl TextGenerator for OllamaClient {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn generate(
        &self,
        prompt: &str,
        params: CompletionParams,
    ) -> Result<String, GenerationError> {
        let payload = build_payload(&self.model, prompt, params);
        let url = format!("{}/chat/completions", self.base_url);
        let client = &self.client;

        tracing::debug!(
            "Ollama request model={} temperature={:.2} max_tokens={}",
            self.model,
            params.temperature,
            params.max_tokens
        );

        let response = with_retry(&self.retry, PROVIDER, || {
            client.post(&url).json(&payload).send()
        })
        .await?;

        let resp_json: Value = response.json().await.map_err(|e| GenerationError::Request {
            provider: PROVIDER.to_string(),
            message: format!("invalid JSON body: {}", e),
        })?;
        parse_completion(&resp_json)
    }
}
