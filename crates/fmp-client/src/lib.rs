use async_trait::async_trait;
use credit_core::{AppConfig, CreditError, ResolvedSymbol, StatementRecord, StatementSource, SymbolResolver};
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

pub use credit_core::config::{DEFAULT_FMP_BASE_URL as DEFAULT_BASE_URL, DEFAULT_SEARCH_EXCHANGES as DEFAULT_EXCHANGES};

const MAX_ATTEMPTS: u32 = 3;
const RETRY_WAIT: Duration = Duration::from_secs(15);

/// Sliding-window rate limiter: at most `max_requests` per `window` duration.
#[derive(Clone)]
struct RateLimiter {
    timestamps: Arc<Mutex<VecDeque<Instant>>>,
    max_requests: usize,
    window: Duration,
}

impl RateLimiter {
    fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            timestamps: Arc::new(Mutex::new(VecDeque::new())),
            max_requests: max_requests.max(1),
            window,
        }
    }

    async fn acquire(&self) {
        loop {
            let mut ts = self.timestamps.lock().await;
            let now = Instant::now();

            // Remove timestamps outside the window
            while let Some(&front) = ts.front() {
                if now.duration_since(front) >= self.window {
                    ts.pop_front();
                } else {
                    break;
                }
            }

            if ts.len() < self.max_requests {
                ts.push_back(now);
                return;
            }

            // Wait until the oldest request falls out of the window
            let sleep_dur = match ts.front() {
                Some(&oldest) => (oldest + self.window).duration_since(now) + Duration::from_millis(50),
                None => Duration::from_millis(50),
            };
            drop(ts);
            tracing::debug!("Rate limiter: waiting {:.1}s for FMP API slot", sleep_dur.as_secs_f64());
            tokio::time::sleep(sleep_dur).await;
        }
    }
}

/// Connection settings for the FMP client
#[derive(Debug, Clone)]
pub struct FmpConfig {
    pub api_key: String,
    pub base_url: String,
    /// Requests per minute
    pub rate_limit: usize,
    pub timeout: Duration,
    /// Comma-separated exchange filter for symbol search
    pub exchanges: String,
    /// Pause before retrying a 429 response
    pub retry_wait: Duration,
}

impl FmpConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            rate_limit: 300,
            timeout: Duration::from_secs(15),
            exchanges: DEFAULT_EXCHANGES.to_string(),
            retry_wait: RETRY_WAIT,
        }
    }

    /// Provider settings from the shared configuration, `None` without a key.
    pub fn from_app_config(config: &AppConfig) -> Option<Self> {
        let api_key = config.fmp_api_key.as_ref()?;
        Some(Self {
            api_key: api_key.clone(),
            base_url: config.fmp_base_url.clone(),
            rate_limit: config.fmp_rate_limit,
            timeout: Duration::from_secs(config.http_timeout_secs),
            exchanges: config.search_exchanges.clone(),
            retry_wait: RETRY_WAIT,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Entry of the `/search` endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub symbol: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub exchange_short_name: Option<String>,
}

/// Financial Modeling Prep client
#[derive(Clone)]
pub struct FmpClient {
    api_key: String,
    base_url: String,
    exchanges: String,
    retry_wait: Duration,
    client: Client,
    rate_limiter: RateLimiter,
}

impl FmpClient {
    pub fn new(config: FmpConfig) -> Result<Self, CreditError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| CreditError::ConfigError(format!("Cannot build HTTP client: {}", e)))?;

        Ok(Self {
            api_key: config.api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            exchanges: config.exchanges,
            retry_wait: config.retry_wait,
            client,
            rate_limiter: RateLimiter::new(config.rate_limit, Duration::from_secs(60)),
        })
    }

    /// Send a request with rate limiting and automatic 429 retry.
    async fn send_request(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::Response, CreditError> {
        let request = builder.build().map_err(|e| CreditError::ApiError(e.to_string()))?;

        for attempt in 0..MAX_ATTEMPTS {
            self.rate_limiter.acquire().await;
            let req_clone = request
                .try_clone()
                .ok_or_else(|| CreditError::ApiError("Cannot clone request".to_string()))?;
            let response = self
                .client
                .execute(req_clone)
                .await
                .map_err(|e| CreditError::ApiError(e.to_string()))?;

            if response.status() != StatusCode::TOO_MANY_REQUESTS {
                return Ok(response);
            }
            if attempt + 1 == MAX_ATTEMPTS {
                break;
            }

            tracing::warn!(
                "FMP 429 rate limited, waiting {:.1}s before retry {}/{}",
                self.retry_wait.as_secs_f64(),
                attempt + 1,
                MAX_ATTEMPTS
            );
            tokio::time::sleep(self.retry_wait).await;
        }

        Err(CreditError::ApiError(format!(
            "Rate limited by FMP after {} retries",
            MAX_ATTEMPTS
        )))
    }

    /// Base URL with `segments` appended, each percent-encoded as one path segment.
    fn endpoint_url(&self, segments: &[&str]) -> Result<Url, CreditError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| CreditError::ConfigError(format!("Invalid FMP base URL {}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| CreditError::ConfigError(format!("Invalid FMP base URL {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET `segments` under the base URL and decode the JSON body.
    async fn get_json(&self, segments: &[&str], params: &[(&str, &str)]) -> Result<Value, CreditError> {
        let url = self.endpoint_url(segments)?;

        let response = self
            .send_request(
                self.client
                    .get(url)
                    .query(params)
                    .query(&[("apikey", self.api_key.as_str())]),
            )
            .await?;

        if !response.status().is_success() {
            return Err(CreditError::ApiError(format!(
                "HTTP {}: {}",
                response.status(),
                response.text().await.unwrap_or_default()
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| CreditError::ApiError(e.to_string()))?;

        // FMP reports bad keys and plan limits as a 200 with an error object.
        if let Some(message) = body.get("Error Message").and_then(|v| v.as_str()) {
            return Err(CreditError::ApiError(message.to_string()));
        }

        Ok(body)
    }

    /// Latest annual statement from one of the `*-statement` endpoints.
    async fn latest_statement(
        &self,
        endpoint: &str,
        symbol: &str,
        what: &str,
    ) -> Result<StatementRecord, CreditError> {
        let body = self
            .get_json(&[endpoint, symbol], &[("limit", "1")])
            .await?;

        first_record(body).ok_or_else(|| CreditError::NotFound(format!("No {} data for {}", what, symbol)))
    }

    /// Search symbols by ticker or company name on the configured exchanges
    pub async fn search_tickers(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, CreditError> {
        let limit = limit.to_string();
        let body = self
            .get_json(
                &["search"],
                &[
                    ("query", query.trim()),
                    ("limit", limit.as_str()),
                    ("exchange", self.exchanges.as_str()),
                ],
            )
            .await?;

        serde_json::from_value(body).map_err(|e| CreditError::ApiError(format!("Malformed search response: {}", e)))
    }
}

/// First object of an FMP list response
fn first_record(body: Value) -> Option<StatementRecord> {
    match body {
        Value::Array(items) => items.into_iter().find_map(|item| match item {
            Value::Object(map) => Some(map),
            _ => None,
        }),
        _ => None,
    }
}

#[async_trait]
impl StatementSource for FmpClient {
    async fn fetch_income(&self, symbol: &str) -> Result<StatementRecord, CreditError> {
        self.latest_statement("income-statement", symbol, "income statement").await
    }

    async fn fetch_balance_sheet(&self, symbol: &str) -> Result<StatementRecord, CreditError> {
        self.latest_statement("balance-sheet-statement", symbol, "balance sheet").await
    }

    async fn fetch_cashflow(&self, symbol: &str) -> Result<StatementRecord, CreditError> {
        self.latest_statement("cash-flow-statement", symbol, "cash flow").await
    }

    async fn fetch_profile(&self, symbol: &str) -> Result<StatementRecord, CreditError> {
        let body = self.get_json(&["profile", symbol], &[]).await?;
        Ok(first_record(body).unwrap_or_default())
    }

    fn source_name(&self) -> &'static str {
        "FMP"
    }
}

#[async_trait]
impl SymbolResolver for FmpClient {
    async fn search(&self, query: &str) -> Result<Option<ResolvedSymbol>, CreditError> {
        let hits = self.search_tickers(query, 1).await?;

        Ok(hits.into_iter().next().map(|best| {
            let symbol = best
                .symbol
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| query.trim().to_uppercase());
            let name = best.name.filter(|n| !n.is_empty()).unwrap_or_else(|| symbol.clone());
            ResolvedSymbol { symbol, name }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{Path, Query, State};
    use axum::http::StatusCode as AxumStatus;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const TEST_KEY: &str = "test-key";

    fn authorized(params: &HashMap<String, String>) -> bool {
        params.get("apikey").map(String::as_str) == Some(TEST_KEY)
    }

    async fn income(
        Path(symbol): Path<String>,
        Query(params): Query<HashMap<String, String>>,
    ) -> (AxumStatus, Json<Value>) {
        if !authorized(&params) {
            return (AxumStatus::OK, Json(json!({"Error Message": "Invalid API KEY."})));
        }
        match symbol.as_str() {
            "AAPL" => (
                AxumStatus::OK,
                Json(json!([{"symbol": "AAPL", "calendarYear": "2024", "revenue": 391e9, "ebitda": 134e9}])),
            ),
            "BUSY" => (AxumStatus::INTERNAL_SERVER_ERROR, Json(json!({"error": "upstream down"}))),
            "ODD/SYM#1" => (AxumStatus::OK, Json(json!([{"symbol": "ODD/SYM#1", "revenue": 1e6}]))),
            _ => (AxumStatus::OK, Json(json!([]))),
        }
    }

    async fn profile(Path(symbol): Path<String>) -> Json<Value> {
        if symbol == "AAPL" {
            Json(json!([{"symbol": "AAPL", "companyName": "Apple Inc."}]))
        } else {
            Json(json!([]))
        }
    }

    async fn search(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
        assert_eq!(params.get("exchange").map(String::as_str), Some(DEFAULT_EXCHANGES));
        match params.get("query").map(String::as_str) {
            Some("apple") => Json(json!([{
                "symbol": "AAPL",
                "name": "Apple Inc.",
                "currency": "USD",
                "exchangeShortName": "NASDAQ"
            }])),
            Some("nameless") => Json(json!([{"symbol": "NMLS"}])),
            _ => Json(json!([])),
        }
    }

    async fn throttled(State(hits): State<Arc<AtomicUsize>>) -> AxumStatus {
        hits.fetch_add(1, Ordering::SeqCst);
        AxumStatus::TOO_MANY_REQUESTS
    }

    async fn spawn_throttled_stub() -> (String, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let app = Router::new()
            .route("/income-statement/:symbol", get(throttled))
            .with_state(hits.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{}", addr), hits)
    }

    async fn spawn_stub() -> String {
        let app = Router::new()
            .route("/income-statement/:symbol", get(income))
            .route("/profile/:symbol", get(profile))
            .route("/search", get(search));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn client(base_url: &str, key: &str) -> FmpClient {
        FmpClient::new(FmpConfig::new(key).with_base_url(base_url)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_latest_income_statement() {
        let base = spawn_stub().await;
        let income = client(&base, TEST_KEY).fetch_income("AAPL").await.unwrap();
        assert_eq!(income["calendarYear"], json!("2024"));
        assert_eq!(income["revenue"], json!(391e9));
    }

    #[tokio::test]
    async fn test_empty_statement_list_is_not_found() {
        let base = spawn_stub().await;
        let err = client(&base, TEST_KEY).fetch_income("ZZZZ").await.unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("ZZZZ"));
    }

    #[tokio::test]
    async fn test_http_error_is_api_error() {
        let base = spawn_stub().await;
        let err = client(&base, TEST_KEY).fetch_income("BUSY").await.unwrap_err();
        assert!(matches!(err, CreditError::ApiError(ref m) if m.contains("500")));
    }

    #[tokio::test]
    async fn test_error_message_body_is_api_error() {
        let base = spawn_stub().await;
        let err = client(&base, "wrong-key").fetch_income("AAPL").await.unwrap_err();
        assert!(matches!(err, CreditError::ApiError(ref m) if m.contains("Invalid API KEY")));
    }

    #[tokio::test]
    async fn test_symbol_is_a_single_encoded_path_segment() {
        let base = spawn_stub().await;
        let income = client(&base, TEST_KEY).fetch_income("ODD/SYM#1").await.unwrap();
        assert_eq!(income["symbol"], json!("ODD/SYM#1"));
    }

    #[tokio::test]
    async fn test_persistent_429_gives_up_without_final_wait() {
        let (base, hits) = spawn_throttled_stub().await;
        let mut config = FmpConfig::new(TEST_KEY).with_base_url(base);
        config.retry_wait = Duration::from_millis(500);
        let fmp = FmpClient::new(config).unwrap();

        let start = Instant::now();
        let err = fmp.fetch_income("AAPL").await.unwrap_err();
        let elapsed = start.elapsed();

        assert!(matches!(err, CreditError::ApiError(ref m) if m.contains("Rate limited")));
        assert_eq!(hits.load(Ordering::SeqCst), MAX_ATTEMPTS as usize);
        // Two waits between three attempts, none after the last
        assert!(elapsed >= Duration::from_millis(1000));
        assert!(elapsed < Duration::from_millis(1400), "took {:?}", elapsed);
    }

    #[test]
    fn test_from_app_config() {
        let mut app = AppConfig::default();
        assert!(FmpConfig::from_app_config(&app).is_none());

        app.fmp_api_key = Some("k".into());
        app.http_timeout_secs = 7;
        let config = FmpConfig::from_app_config(&app).unwrap();
        assert_eq!(config.api_key, "k");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(7));
        assert_eq!(config.retry_wait, RETRY_WAIT);
    }

    #[tokio::test]
    async fn test_missing_profile_is_empty() {
        let base = spawn_stub().await;
        let fmp = client(&base, TEST_KEY);
        assert_eq!(fmp.fetch_profile("AAPL").await.unwrap()["companyName"], json!("Apple Inc."));
        assert!(fmp.fetch_profile("ZZZZ").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_resolve_symbol() {
        let base = spawn_stub().await;
        let fmp = client(&base, TEST_KEY);

        let found = fmp.resolve("apple").await;
        assert_eq!(found.symbol, "AAPL");
        assert_eq!(found.name, "Apple Inc.");

        // Name falls back to the symbol
        let nameless = fmp.resolve("nameless").await;
        assert_eq!(nameless.name, "NMLS");

        // No hit: raw query upper-cased
        let missing = fmp.resolve("tesla motors").await;
        assert_eq!(missing, ResolvedSymbol::from_query("tesla motors"));
    }

    #[tokio::test]
    async fn test_resolve_falls_back_when_provider_unreachable() {
        // Nothing listens on port 9 locally
        let fmp = client("http://127.0.0.1:9", TEST_KEY);
        let resolved = fmp.resolve("msft").await;
        assert_eq!(resolved.symbol, "MSFT");
    }

    #[test]
    fn test_first_record() {
        assert!(first_record(json!([])).is_none());
        assert!(first_record(json!({"a": 1})).is_none());
        assert_eq!(first_record(json!([{"a": 1}, {"a": 2}])).unwrap()["a"], json!(1));
    }

    #[tokio::test]
    async fn test_rate_limiter_allows_burst_within_limit() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60));
        let start = Instant::now();
        for _ in 0..3 {
            limiter.acquire().await;
        }
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
