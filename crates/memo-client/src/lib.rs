//! LLM-backed credit memos.

pub mod chat;
pub mod error;

pub use chat::MemoClient;
pub use error::{MemoError, MemoResult};

use std::time::Duration;

use credit_core::{AppConfig, CreditMetrics, Narrative, NarrativeGenerator};

pub use credit_core::config::{DEFAULT_OPENAI_BASE_URL as DEFAULT_BASE_URL, DEFAULT_OPENAI_MODEL as DEFAULT_MODEL};

pub const MEMO_DISABLED_NOTE: &str =
    "Set OPENAI_API_KEY environment variable to enable AI-generated credit memos.";

/// Configuration for the chat-completions endpoint
#[derive(Debug, Clone)]
pub struct MemoConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl MemoConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(60),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Memo settings from the shared configuration, `None` without a key.
    pub fn from_app_config(config: &AppConfig) -> Option<Self> {
        let api_key = config.openai_api_key.as_ref()?;
        Some(
            Self::new(api_key.clone())
                .with_base_url(config.openai_base_url.clone())
                .with_model(config.openai_model.clone()),
        )
    }
}

/// Memo for `metrics`, or a note explaining why there is none.
///
/// Never fails: a missing generator or a failed call degrades to
/// [`Narrative::Note`] so the numeric report is still delivered.
pub async fn narrate(generator: Option<&dyn NarrativeGenerator>, metrics: &CreditMetrics) -> Narrative {
    let Some(generator) = generator else {
        return Narrative::Note(MEMO_DISABLED_NOTE.to_string());
    };

    match generator.generate(metrics).await {
        Ok(memo) => Narrative::Memo(memo),
        Err(e) => {
            tracing::warn!(symbol = metrics.ticker(), "Credit memo generation failed: {}", e);
            Narrative::Note(format!("Credit memo generation failed: {}", e))
        }
    }
}
