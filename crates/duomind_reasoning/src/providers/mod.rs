//! Generation backends and the factory that picks one from configuration.

mod mock;
mod ollama;

pub use mock::MockProvider;
pub use ollama::OllamaClient;

use crate::error::GenerationError;
use crate::llm::TextGenerator;
use duomind_core::config::LlmConfig;
use std::sync::Arc;
use std::time::Duration;

/// Build the backend named by `config.provider`. `label` tags mock output.
pub fn build_generator(
    config: &LlmConfig,
    label: &str,
) -> Result<Arc<dyn TextGenerator>, GenerationError> {
    match config.provider.trim().to_ascii_lowercase().as_str() {
        "mock" => Ok(Arc::new(MockProvider::new(label))),
        "ollama" => {
            let client = OllamaClient::new(
                &config.model,
                config.base_url.as_deref(),
                Duration::from_secs(config.timeout_secs),
            )?;
            tracing::info!(
                "Using Ollama model '{}' at {} for {}",
                config.model,
                client.base_url(),
                label
            );
            Ok(Arc::new(client))
        }
        other => Err(GenerationError::NotConfigured(format!(
            "unknown provider '{}' (expected mock or ollama)",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_mock_by_default() {
        let generator = build_generator(&LlmConfig::default(), "architect").unwrap();
        assert_eq!(generator.name(), "architect");
    }

    #[test]
    fn test_build_ollama() {
        let config = LlmConfig {
            provider: "Ollama".into(),
            base_url: Some("http://localhost:11434/v1".into()),
            ..Default::default()
        };
        assert_eq!(build_generator(&config, "oracle").unwrap().name(), "Ollama");
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let config = LlmConfig {
            provider: "carrier-pigeon".into(),
            ..Default::default()
        };
        let err = build_generator(&config, "x").err().unwrap();
        assert!(err.to_string().contains("carrier-pigeon"));
    }
}
