//! Text generator abstraction.
//!
//! The simulation treats the generator as adversarial input: it may time
//! out, return prose instead of JSON, or truncate mid-sentence. The
//! [`TextGenerator`] trait is therefore the only place where network
//! unreliability enters the system; everything downstream goes through
//! the content pipeline's retry/fallback path.
//!
//! Backends:
//! - [`OllamaGenerator`]: production client for an Ollama-compatible
//!   `/api/generate` endpoint.
//! - [`StaticGenerator`]: canned responses, used by `--dry-run` and tests.
//! - [`FailingGenerator`]: always errors, used to exercise the fallback
//!   path in tests.

mod ollama;

pub use ollama::OllamaGenerator;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{Result, SimError};

/// One opaque call to an external text-generation service.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate text for `prompt`, bounded by `max_tokens`.
    ///
    /// The returned string carries no format guarantees: callers must
    /// tolerate malformed, truncated, or prose-wrapped output.
    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String>;
}

/// Generator that replays a fixed script of responses.
///
/// Responses are served in order; once the script is exhausted the last
/// entry repeats. An empty script always yields `{}`.
pub struct StaticGenerator {
    script: Mutex<Vec<String>>,
    cursor: AtomicUsize,
}

impl StaticGenerator {
    /// Generator that always returns `response`.
    pub fn fixed(response: impl Into<String>) -> Self {
        Self::scripted(vec![response.into()])
    }

    /// Generator that serves `script` entries in order.
    pub fn scripted(script: Vec<String>) -> Self {
        Self {
            script: Mutex::new(script),
            cursor: AtomicUsize::new(0),
        }
    }

    /// How many times `generate` has been called.
    pub fn calls(&self) -> usize {
        self.cursor.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for StaticGenerator {
    async fn generate(&self, _prompt: &str, _max_tokens: u32) -> Result<String> {
        let index = self.cursor.fetch_add(1, Ordering::SeqCst);
        let script = self
            .script
            .lock()
            .map_err(|_| SimError::Generator("script lock poisoned".to_string()))?;
        Ok(script
            .get(index)
            .or_else(|| script.last())
            .cloned()
            .unwrap_or_else(|| "{}".to_string()))
    }
}

/// Generator that fails every call, counting attempts.
#[derive(Default)]
pub struct FailingGenerator {
    calls: AtomicUsize,
}

impl FailingGenerator {
    /// Create a new failing generator.
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times `generate` has been called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for FailingGenerator {
    async fn generate(&self, _prompt: &str, _max_tokens: u32) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(SimError::Generator("simulated timeout".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_generator_replays_script() {
        let gen = StaticGenerator::scripted(vec!["one".into(), "two".into()]);
        assert_eq!(gen.generate("p", 10).await.unwrap(), "one");
        assert_eq!(gen.generate("p", 10).await.unwrap(), "two");
        // Exhausted script repeats the last entry
        assert_eq!(gen.generate("p", 10).await.unwrap(), "two");
        assert_eq!(gen.calls(), 3);
    }

    #[tokio::test]
    async fn test_failing_generator_counts_calls() {
        let gen = FailingGenerator::new();
        assert!(gen.generate("p", 10).await.is_err());
        assert!(gen.generate("p", 10).await.is_err());
        assert_eq!(gen.calls(), 2);
    }
}
