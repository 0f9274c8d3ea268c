use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use credit_core::{CreditError, CreditMetrics, NarrativeGenerator};
use report_render::{memo_prompt, SYSTEM_PROMPT};

use crate::error::{MemoError, MemoResult};
use crate::MemoConfig;

#[derive(Debug, Clone, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Clone, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

/// Client for an OpenAI-compatible chat-completions endpoint.
#[derive(Clone)]
pub struct MemoClient {
    client: reqwest::Client,
    config: MemoConfig,
}

impl MemoClient {
    pub fn new(config: MemoConfig) -> MemoResult<Self> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Single chat turn; returns the assistant's text.
    pub async fn complete(&self, system: &str, user: &str) -> MemoResult<String> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage { role: "system", content: system },
                ChatMessage { role: "user", content: user },
            ],
            temperature: 0.3,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url.trim_end_matches('/')))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MemoError::ServiceUnavailable(format!(
                "Status: {} {}",
                status,
                body.trim()
            )));
        }

        let result: ChatResponse = serde_json::from_str(&response.text().await?)?;
        result
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| MemoError::InvalidResponse("empty completion".to_string()))
    }
}

#[async_trait]
impl NarrativeGenerator for MemoClient {
    async fn generate(&self, metrics: &CreditMetrics) -> Result<String, CreditError> {
        tracing::info!(
            symbol = metrics.ticker(),
            model = %self.config.model,
            "Requesting credit memo"
        );
        let memo = self.complete(SYSTEM_PROMPT, &memo_prompt(metrics)).await?;
        Ok(memo)
    }
}
