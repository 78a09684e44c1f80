//! Ollama-compatible generator backend.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::time::{sleep, Duration};

use super::TextGenerator;
use crate::config::GeneratorConfig;
use crate::error::{Result, SimError};

const SYSTEM_PREAMBLE: &str = "You are a participant in a professional social network. \
You always respond with valid JSON when asked.\n\
System: You must respond with JSON that a strict parser accepts.";

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Debug, Deserialize)]
struct ModelTag {
    #[serde(default)]
    name: String,
}

/// HTTP client for an Ollama-style `/api/generate` endpoint.
pub struct OllamaGenerator {
    base_url: String,
    model: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl OllamaGenerator {
    /// Build a client from generator configuration.
    ///
    /// The request timeout bounds every generator call; a timed-out call
    /// surfaces as a generator error and feeds the pipeline's retry path.
    pub fn new(config: &GeneratorConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SimError::Generator(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: config.url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            client,
        })
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => req.header("Authorization", format!("Bearer {key}")),
            None => req,
        }
    }

    /// Check the server is reachable and the configured model is present,
    /// pulling it if missing. Retries the health probe a few times so the
    /// simulator can start before the generator service finishes booting.
    pub async fn ensure_model_available(&self) -> Result<()> {
        const MAX_PROBES: u32 = 5;
        const PROBE_DELAY: Duration = Duration::from_secs(2);

        let tags_url = format!("{}/api/tags", self.base_url);

        let mut tags = None;
        for attempt in 1..=MAX_PROBES {
            match self.client.get(&tags_url).send().await {
                Ok(resp) if resp.status().is_success() => {
                    tags = Some(resp.json::<TagsResponse>().await?);
                    break;
                },
                Ok(resp) => {
                    tracing::warn!(
                        "Generator health probe returned status {} (attempt {}/{})",
                        resp.status(),
                        attempt,
                        MAX_PROBES
                    );
                },
                Err(e) => {
                    tracing::warn!(
                        "Generator unreachable (attempt {}/{}): {}",
                        attempt,
                        MAX_PROBES,
                        e
                    );
                },
            }
            if attempt < MAX_PROBES {
                sleep(PROBE_DELAY).await;
            }
        }

        let tags = tags.ok_or_else(|| {
            SimError::Generator(format!("Generator at {} never became healthy", self.base_url))
        })?;

        if tags.models.iter().any(|m| m.name == self.model) {
            tracing::info!("Model {} is available", self.model);
            return Ok(());
        }

        tracing::info!("Model {} not found, pulling it", self.model);
        let pull = self
            .authorize(self.client.post(format!("{}/api/pull", self.base_url)))
            .json(&serde_json::json!({ "name": self.model }))
            .send()
            .await?;

        if !pull.status().is_success() {
            return Err(SimError::Generator(format!(
                "Model pull failed with status {}",
                pull.status()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl TextGenerator for OllamaGenerator {
    async fn generate(&self, prompt: &str, _max_tokens: u32) -> Result<String> {
        let request = GenerateRequest {
            model: &self.model,
            prompt: format!("{SYSTEM_PREAMBLE}\nUser: {prompt}"),
            stream: false,
        };

        let response = self
            .authorize(self.client.post(format!("{}/api/generate", self.base_url)))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SimError::Generator(format!(
                "Generator returned {status}: {body}"
            )));
        }

        let result: GenerateResponse = response.json().await?;
        Ok(result.response.trim().to_string())
    }
}
