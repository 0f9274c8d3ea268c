use std::env;
use std::fmt::Display;
use std::str::FromStr;

use crate::CreditError;

pub const DEFAULT_FMP_BASE_URL: &str = "https://financialmodelingprep.com/api/v3";
pub const DEFAULT_SEARCH_EXCHANGES: &str = "NASDAQ,NYSE,AMEX";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

/// Settings read once at startup and shared by the server and the CLI.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub fmp_api_key: Option<String>,
    pub fmp_base_url: String,
    pub fmp_rate_limit: usize,
    pub http_timeout_secs: u64,
    pub search_exchanges: String,

    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub openai_model: String,

    pub host: String,
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            fmp_api_key: None,
            fmp_base_url: DEFAULT_FMP_BASE_URL.to_string(),
            fmp_rate_limit: 300,
            http_timeout_secs: 15,
            search_exchanges: DEFAULT_SEARCH_EXCHANGES.to_string(),
            openai_api_key: None,
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

fn optional(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn string_or(key: &str, default: String) -> String {
    optional(key).unwrap_or(default)
}

fn parse_or<T>(key: &str, default: T) -> Result<T, CreditError>
where
    T: FromStr,
    T::Err: Display,
{
    match optional(key) {
        Some(raw) => raw
            .parse()
            .map_err(|e| CreditError::ConfigError(format!("{} has an invalid value {:?}: {}", key, raw, e))),
        None => Ok(default),
    }
}

impl AppConfig {
    /// Environment values over the defaults. Blank values count as unset.
    pub fn from_env() -> Result<Self, CreditError> {
        let defaults = Self::default();
        Ok(Self {
            fmp_api_key: optional("FMP_API_KEY"),
            fmp_base_url: string_or("FMP_BASE_URL", defaults.fmp_base_url),
            fmp_rate_limit: parse_or("FMP_RATE_LIMIT", defaults.fmp_rate_limit)?,
            http_timeout_secs: parse_or("HTTP_TIMEOUT_SECS", defaults.http_timeout_secs)?,
            search_exchanges: string_or("SEARCH_EXCHANGES", defaults.search_exchanges),

            openai_api_key: optional("OPENAI_API_KEY"),
            openai_base_url: string_or("OPENAI_BASE_URL", defaults.openai_base_url),
            openai_model: string_or("OPENAI_MODEL", defaults.openai_model),

            host: string_or("HOST", defaults.host),
            port: parse_or("PORT", defaults.port)?,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
