use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const OPENROUTER_API_BASE: &str = "https://openrouter.ai/api/v1";
const DEFAULT_MODEL: &str = "meta-llama/llama-3.3-70b-instruct";

// OpenAI-compatible request/response for OpenRouter
#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    content: String,
}

/// Text-generation collaborator for the asynchronous analysis phase.
/// Any failure here is the caller's cue to take the fallback path.
pub struct AnalysisClient {
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl AnalysisClient {
    /// Reads `OPENROUTER_API_KEY`; `None` means the service is unavailable
    /// and callers should fall back immediately.
    pub fn from_env() -> Option<Self> {
        let key = std::env::var("OPENROUTER_API_KEY").ok()?;
        let key = key.trim().to_string();
        if key.is_empty() {
            return None;
        }
        Some(Self::new(key))
    }

    pub fn new(api_key: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            api_key: api_key.trim().to_string(),
            model: std::env::var("ANALYSIS_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            client,
        }
    }

    pub async fn generate(&self, system: &str, prompt: &str) -> anyhow::Result<String> {
        let url = format!("{}/chat/completions", OPENROUTER_API_BASE);
        let body = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            temperature: 0.3,
            max_tokens: 512,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("analysis request failed")?;

        if !response.status().is_success() {
            bail!("analysis service returned {}", response.status());
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .context("analysis response unreadable")?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default();

        if text.trim().is_empty() {
            bail!("analysis service returned an empty reply");
        }

        Ok(text)
    }
}
