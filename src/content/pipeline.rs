//! The structured content pipeline.
//!
//! `produce` is total: render prompt → call generator → parse/validate →
//! retry on failure → synthesize fallback after the retry budget. The
//! caller never sees an error; at worst it receives templated content.

use std::sync::Arc;

use serde_json::Value;
use tokio::time::{sleep, Duration};

use super::extract::{extract_free_text, strip_code_fences};
use super::request::{ContentRequest, ContentResult};
use super::{fallback, prompts};
use crate::error::{Result, SimError};
use crate::generator::TextGenerator;

/// Default pause between generator attempts.
pub const DEFAULT_BACKOFF: Duration = Duration::from_secs(1);

/// Turns [`ContentRequest`]s into validated or fallback content.
#[derive(Clone)]
pub struct ContentPipeline {
    generator: Arc<dyn TextGenerator>,
    backoff: Duration,
    retries_override: Option<u32>,
}

impl ContentPipeline {
    /// Build a pipeline over the given generator.
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            backoff: DEFAULT_BACKOFF,
            retries_override: None,
        }
    }

    /// Override the retry backoff (tests use zero).
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Apply a pipeline-wide retry budget, taking precedence over the
    /// per-request budget. Used to wire the configured budget in.
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.retries_override = Some(retries);
        self
    }

    /// Produce content for `request`. Never fails outward.
    pub async fn produce(&self, request: &ContentRequest) -> ContentResult {
        let attempts = self.retries_override.unwrap_or(request.max_retries).max(1);

        for attempt in 1..=attempts {
            // Re-rendered each attempt; the exclusion list a caller bakes
            // into the request may differ between produce() calls.
            let prompt = prompts::render(request);

            match self.attempt(&prompt, request).await {
                Ok(value) => {
                    tracing::debug!(
                        kind = ?request.kind,
                        attempt,
                        "Generator response validated"
                    );
                    return ContentResult::Validated(value);
                },
                Err(e) => {
                    tracing::warn!(
                        kind = ?request.kind,
                        attempt,
                        max_attempts = attempts,
                        "Generator attempt failed: {e}"
                    );
                    if attempt < attempts && !self.backoff.is_zero() {
                        sleep(self.backoff).await;
                    }
                },
            }
        }

        tracing::info!(kind = ?request.kind, "Falling back to synthesized content");
        ContentResult::Fallback(fallback::synthesize(request))
    }

    async fn attempt(&self, prompt: &str, request: &ContentRequest) -> Result<Value> {
        let raw = self
            .generator
            .generate(prompt, request.kind.max_tokens())
            .await?;
        let cleaned = strip_code_fences(&raw);

        let shape = request.kind.shape();
        if shape.free_text_key.is_some() {
            let text = extract_free_text(&cleaned).ok_or_else(|| {
                SimError::InvalidResponse("no usable free text in response".to_string())
            })?;
            return Ok(serde_json::json!({ "content": text }));
        }

        let value: Value = serde_json::from_str(&cleaned)?;
        shape.validate(&value)?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::extract::MIN_TEXT_LEN;
    use crate::content::request::ContentKind;
    use crate::generator::{FailingGenerator, StaticGenerator};

    fn pipeline(generator: Arc<dyn TextGenerator>) -> ContentPipeline {
        ContentPipeline::new(generator).with_backoff(Duration::ZERO)
    }

    fn post_request() -> ContentRequest {
        ContentRequest::new(ContentKind::Post)
            .with_context("name", "Priya Sharma")
            .with_context("title", "ML Engineer")
    }

    #[tokio::test]
    async fn test_valid_response_validated_first_attempt() {
        let generator = Arc::new(StaticGenerator::fixed(
            r#"{"content": "Debugged a gnarly training loop today."}"#,
        ));
        let result = pipeline(generator.clone()).produce(&post_request()).await;

        assert!(!result.is_fallback());
        assert_eq!(result.text(), Some("Debugged a gnarly training loop today."));
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test]
    async fn test_fenced_response_is_cleaned() {
        let generator = Arc::new(StaticGenerator::fixed(
            "```json\n{\"content\": \"Fenced but otherwise perfectly valid.\"}\n```",
        ));
        let result = pipeline(generator).produce(&post_request()).await;
        assert_eq!(result.text(), Some("Fenced but otherwise perfectly valid."));
    }

    #[tokio::test]
    async fn test_failing_generator_exhausts_retries_then_falls_back() {
        let generator = Arc::new(FailingGenerator::new());
        let result = pipeline(generator.clone()).produce(&post_request()).await;

        assert!(result.is_fallback());
        assert_eq!(generator.calls(), ContentRequest::DEFAULT_RETRIES as usize);
        assert!(result.text().unwrap().len() >= MIN_TEXT_LEN);
    }

    #[tokio::test]
    async fn test_invalid_json_exhausts_retries_then_falls_back() {
        let generator = Arc::new(StaticGenerator::fixed("not json at all".to_string()));
        let request = ContentRequest::new(ContentKind::Skill)
            .with_context("title", "Designer")
            .with_max_retries(2);
        let result = pipeline(generator.clone()).produce(&request).await;

        assert!(result.is_fallback());
        assert_eq!(generator.calls(), 2);
        // Fallback still satisfies the shape contract
        assert!(ContentKind::Skill.shape().validate(result.value()).is_ok());
    }

    #[tokio::test]
    async fn test_recovers_on_second_attempt() {
        let generator = Arc::new(StaticGenerator::scripted(vec![
            "garbage".to_string(),
            r#"{"content": "Second attempt comes through fine."}"#.to_string(),
        ]));
        let result = pipeline(generator.clone()).produce(&post_request()).await;

        assert!(!result.is_fallback());
        assert_eq!(generator.calls(), 2);
    }

    #[tokio::test]
    async fn test_produce_total_for_hostile_outputs() {
        for hostile in ["", "{}", "I can't", "{\"content\": \"hi\"}", "null"] {
            let generator = Arc::new(StaticGenerator::fixed(hostile.to_string()));
            let result = pipeline(generator).produce(&post_request()).await;
            let text = result.text().expect("text kinds always carry content");
            assert!(
                text.len() >= MIN_TEXT_LEN,
                "output {hostile:?} must still yield viable text"
            );
        }
    }

    #[tokio::test]
    async fn test_structured_shape_validation_gates_result() {
        // Two skills is below the minimum cardinality of three
        let generator = Arc::new(StaticGenerator::fixed(
            r#"[{"name": "Rust", "category": "Languages"}, {"name": "Git", "category": "Tools"}]"#,
        ));
        let request = ContentRequest::new(ContentKind::Skill).with_max_retries(1);
        let result = pipeline(generator).produce(&request).await;
        assert!(result.is_fallback());
    }
}
