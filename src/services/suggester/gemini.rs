//! Gemini generateContent 实现
//!
//! 同步 ureq 请求放进 spawn_blocking，Agent 自带全局超时

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{trace, warn};
use ureq::Agent;

use super::{LinkMetadata, MetadataSuggester, parse_aliases, parse_metadata};
use crate::config::SuggesterConfig;
use crate::errors::{ReelinkError, Result};

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateContentResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .find_map(|part| part.text)
    }
}

pub struct GeminiSuggester {
    agent: Agent,
    api_key: String,
    url: String,
}

impl GeminiSuggester {
    pub fn new(config: &SuggesterConfig) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_secs.max(1))))
            .build()
            .into();

        Self {
            agent,
            api_key: config.api_key.clone(),
            url: format!(
                "{}/models/{}:generateContent",
                config.endpoint.trim_end_matches('/'),
                config.model
            ),
        }
    }

    fn metadata_prompt(url: &str) -> String {
        format!(
            "Analise este URL: {url}. Invente um título de filme com no máximo 25 caracteres \
             e um gênero de catálogo de streaming para ele. \
             Responda somente com JSON no formato {{\"title\": \"...\", \"category\": \"...\"}}."
        )
    }

    fn alias_prompt(url: &str) -> String {
        format!(
            "Sugira 3 apelidos curtos em estilo de catálogo de streaming para este URL: {url}. \
             Use apenas letras minúsculas, números e hífens, como pipoca-play ou spoiler-link. \
             Responda somente com um array JSON de strings."
        )
    }

    /// 发起一次 generateContent 请求（同步，在 spawn_blocking 中调用）
    fn generate_sync(agent: Agent, url: String, api_key: String, prompt: String) -> Result<String> {
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": { "responseMimeType": "application/json" }
        });

        let resp = agent
            .post(&url)
            .header("x-goog-api-key", &api_key)
            .send_json(&body)
            .map_err(|e| {
                warn!("Suggester request to \"{}\" failed: {}", url, e);
                ReelinkError::suggester(format!("Request failed: {}", e))
            })?;

        let parsed: GenerateContentResponse = resp.into_body().read_json().map_err(|e| {
            warn!("Suggester response from \"{}\" parse failed: {}", url, e);
            ReelinkError::suggester(format!("Unreadable response: {}", e))
        })?;

        let text = parsed
            .first_text()
            .ok_or_else(|| ReelinkError::suggester("Response has no text candidate"))?;
        trace!("Suggester raw text: {}", text);
        Ok(text)
    }

    async fn generate(&self, prompt: String) -> Result<String> {
        let agent = self.agent.clone();
        let url = self.url.clone();
        let api_key = self.api_key.clone();

        tokio::task::spawn_blocking(move || Self::generate_sync(agent, url, api_key, prompt))
            .await
            .map_err(|e| {
                warn!("Suggester spawn_blocking failed: {}", e);
                ReelinkError::suggester(format!("Worker failed: {}", e))
            })?
    }
}

#[async_trait]
impl MetadataSuggester for GeminiSuggester {
    async fn analyze_link(&self, url: &str) -> Result<LinkMetadata> {
        let text = self.generate(Self::metadata_prompt(url)).await?;
        parse_metadata(&text)
    }

    async fn suggest_aliases(&self, url: &str) -> Result<Vec<String>> {
        let text = self.generate(Self::alias_prompt(url)).await?;
        parse_aliases(&text)
    }

    fn name(&self) -> &'static str {
        "Gemini"
    }
}
