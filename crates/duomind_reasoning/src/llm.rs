use crate::error::GenerationError;
use async_trait::async_trait;

/// Sampling parameters for one completion, chosen per role per task.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionParams {
    /// Sampling temperature (0.0 - 2.0, providers clamp further if needed)
    pub temperature: f64,
    /// Maximum tokens to generate
    pub max_tokens: u32,
}

impl Default for CompletionParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 256,
        }
    }
}

/// A text-generation backend. Both roles may share one instance.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Short label used in logs and error messages.
    fn name(&self) -> &str;

    /// Complete a single prompt. Empty text is a valid answer; errors are
    /// reserved for a backend that could not answer at all.
    async fn generate(
        &self,
        prompt: &str,
        params: CompletionParams,
    ) -> Result<String, GenerationError>;
}
