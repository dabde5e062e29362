use std::time::Duration;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::{AnswerGenerator, DEFAULT_CONTEXT_CHARS, build_prompt};

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub endpoint: String,
    pub model: String,
    pub context_chars: usize,
    pub request_timeout: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            context_chars: DEFAULT_CONTEXT_CHARS,
            request_timeout: Duration::from_secs(60),
        }
    }

    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .with_context(|| format!("{API_KEY_ENV} is not set"))?;
        Ok(Self::new(api_key))
    }

    fn request_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.endpoint.trim_end_matches('/'),
            self.model,
            self.api_key
        )
    }
}

pub struct GeminiGenerator {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiGenerator {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .context("failed to build http client")?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl AnswerGenerator for GeminiGenerator {
    async fn generate(&self, question: &str, context: &str) -> Result<String> {
        let prompt = build_prompt(question, context, self.config.context_chars);
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        debug!(model = %self.config.model, prompt_chars = prompt.len(), "calling gemini");
        let response = self
            .client
            .post(self.config.request_url())
            .json(&body)
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("failed to call {} generateContent", self.config.model))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            bail!("gemini returned {status}: {}", detail.trim());
        }

        let json = response
            .json::<Value>()
            .await
            .map_err(reqwest::Error::without_url)
            .context("failed to decode gemini response")?;
        Ok(response_text(&json).unwrap_or_default().trim().to_string())
    }
}

pub(super) fn response_text(json: &Value) -> Option<&str> {
    json["candidates"][0]["content"]["parts"][0]["text"].as_str()
}
