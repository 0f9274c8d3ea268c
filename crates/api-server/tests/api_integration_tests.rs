//! Integration tests for the web routes, backed by in-memory statements.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use api_server::{create_router, AppState};
use credit_core::{
    CreditError, CreditMetrics, InMemoryStatementSource, NarrativeGenerator, RawStatementBundle,
    StatementSource, SymbolResolver,
};

struct CannedMemo;

#[async_trait]
impl NarrativeGenerator for CannedMemo {
    async fn generate(&self, metrics: &CreditMetrics) -> Result<String, CreditError> {
        Ok(format!(
            "1. Business overview\n{} is a reference issuer.\n\n2. Recent financial performance\nStable.",
            metrics.company_name()
        ))
    }
}

fn reference_bundle() -> RawStatementBundle {
    serde_json::from_value(json!({
        "income": {
            "calendarYear": "2024",
            "revenue": 100e9,
            "ebitda": 30e9,
            "ebit": 25e9,
            "interestExpense": 2e9
        },
        "balance_sheet": {"shortTermDebt": 3e9, "longTermDebt": 10e9},
        "cash_flow": {
            "netCashProvidedByOperatingActivities": 20e9,
            "capitalExpenditure": -5e9,
            "changeInWorkingCapital": 0.0
        },
        "profile": {"companyName": "Reference Corp"}
    }))
    .unwrap()
}

fn create_test_state(with_memo: bool) -> AppState {
    let memory = Arc::new(InMemoryStatementSource::new().with_bundle("REF", reference_bundle()));
    let source: Arc<dyn StatementSource> = memory.clone();
    let resolver: Arc<dyn SymbolResolver> = memory;
    let narrator: Option<Arc<dyn NarrativeGenerator>> = if with_memo {
        let memo: Arc<dyn NarrativeGenerator> = Arc::new(CannedMemo);
        Some(memo)
    } else {
        None
    };
    AppState::new(Some(source), Some(resolver), narrator)
}

fn create_test_app() -> Router {
    create_router(create_test_state(false))
}

async fn get(app: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes().to_vec();
    (status, headers, body)
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let (status, _, body) = get(app, uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}

async fn get_text(app: Router, uri: &str) -> (StatusCode, String) {
    let (status, _, body) = get(app, uri).await;
    (status, String::from_utf8(body).unwrap())
}

// =============================================================================
// Health & middleware
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let (status, json) = get_json(create_test_app(), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["fmp_configured"], true);
    assert_eq!(json["memo_enabled"], false);
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_request_id_generated_and_propagated() {
    let (_, headers, _) = get(create_test_app(), "/health").await;
    let generated = headers.get("x-request-id").unwrap().to_str().unwrap();
    assert_eq!(generated.len(), 36);
    assert!(headers.get("content-security-policy").is_some());

    let response = create_test_app()
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-request-id", "proxy-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.headers().get("x-request-id").unwrap(), "proxy-42");
}

#[tokio::test]
async fn test_cors_and_security_headers_on_html() {
    let response = create_test_app()
        .oneshot(
            Request::builder()
                .uri("/")
                .header(header::ORIGIN, "https://example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), "*");
    assert!(headers.get("x-request-id").is_some());
    assert!(headers.get("content-security-policy").is_some());
}

// =============================================================================
// HTML pages
// =============================================================================

#[tokio::test]
async fn test_index_page() {
    let (status, html) = get_text(create_test_app(), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Credit Analysis Platform"));
    assert!(html.contains("action=\"/report\""));
}

#[tokio::test]
async fn test_report_empty_query_redirects_home() {
    for uri in ["/report", "/report?query=", "/report?query=%20%20"] {
        let (status, headers, _) = get(create_test_app(), uri).await;
        assert_eq!(status, StatusCode::SEE_OTHER, "{}", uri);
        assert_eq!(headers.get(header::LOCATION).unwrap(), "/");
    }
}

#[tokio::test]
async fn test_report_by_company_name() {
    let (status, html) = get_text(create_test_app(), "/report?query=Reference").await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Reference Corp"));
    assert!(html.contains("<div class=\"score-value\">20</div>"));
    assert!(html.contains("Low credit risk"));
    assert!(html.contains("<strong>Note:</strong> Set OPENAI_API_KEY"));
    assert!(html.contains("/download-pdf?symbol=REF"));
}

#[tokio::test]
async fn test_report_with_memo() {
    let app = create_router(create_test_state(true));
    let (status, html) = get_text(app, "/report?query=ref").await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("<h3 class=\"memo-heading\">1. Business overview</h3>"));
    assert!(html.contains("<p>Reference Corp is a reference issuer.</p>"));
}

#[tokio::test]
async fn test_report_unknown_symbol_shows_error_card() {
    let (status, html) = get_text(create_test_app(), "/report?query=ZZZZ").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(html.contains("error-card"));
    assert!(html.contains("ZZZZ"));
}

#[tokio::test]
async fn test_report_without_provider_key() {
    let app = create_router(AppState::new(None, None, None));
    let (status, html) = get_text(app, "/report?query=AAPL").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(html.contains("FMP_API_KEY not configured"));
}

// =============================================================================
// PDF download
// =============================================================================

#[tokio::test]
async fn test_download_pdf() {
    let (status, headers, body) = get(create_test_app(), "/download-pdf?symbol=ref").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers.get(header::CONTENT_TYPE).unwrap(), "application/pdf");
    assert_eq!(
        headers.get(header::CONTENT_DISPOSITION).unwrap(),
        "attachment; filename=\"credit_report_REF.pdf\""
    );
    assert!(body.starts_with(b"%PDF"));
}

#[tokio::test]
async fn test_download_pdf_missing_symbol() {
    let (status, text) = get_text(create_test_app(), "/download-pdf").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(text, "Missing symbol parameter");
}

#[tokio::test]
async fn test_download_pdf_unknown_symbol() {
    let (status, text) = get_text(create_test_app(), "/download-pdf?symbol=NOPE").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(text.starts_with("Error generating PDF:"));
}

// =============================================================================
// JSON API
// =============================================================================

#[tokio::test]
async fn test_api_search() {
    let (status, json) = get_json(create_test_app(), "/api/search?q=reference").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["symbol"], "REF");
    assert_eq!(json["data"]["company_name"], "Reference Corp");
}

#[tokio::test]
async fn test_api_search_falls_back_to_query() {
    let (status, json) = get_json(create_test_app(), "/api/search?q=msft").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["symbol"], "MSFT");
    assert_eq!(json["data"]["company_name"], "msft");
}

#[tokio::test]
async fn test_api_search_missing_query() {
    let (status, json) = get_json(create_test_app(), "/api/search").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json, json!({"success": false, "error": "Missing query parameter"}));
}

#[tokio::test]
async fn test_api_search_without_provider_key() {
    let app = create_router(AppState::new(None, None, None));
    let (status, json) = get_json(app, "/api/search?q=AAPL").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["success"], false);
    assert!(json["error"].as_str().unwrap().contains("FMP_API_KEY"));
}

#[tokio::test]
async fn test_api_credit_metrics() {
    let (status, json) = get_json(create_test_app(), "/api/credit/ref").await;

    assert_eq!(status, StatusCode::OK);
    let metrics = &json["data"]["metrics"];
    assert_eq!(metrics["ticker"], "REF");
    assert_eq!(metrics["total_debt"], 13e9);
    assert_eq!(metrics["interest_coverage"], 12.5);
    assert_eq!(metrics["score"], 20);
    assert_eq!(metrics["rating_bucket"], "Low credit risk");
    assert_eq!(json["data"]["source"], "local statement files");
    assert!(json["data"].get("narrative").is_none());
}

#[tokio::test]
async fn test_api_credit_metrics_with_memo() {
    let app = create_router(create_test_state(true));
    let (status, json) = get_json(app, "/api/credit/REF?memo=true").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["narrative"]["kind"], "memo");
    assert!(json["data"]["narrative"]["text"]
        .as_str()
        .unwrap()
        .starts_with("1. Business overview"));
}

#[tokio::test]
async fn test_api_credit_unknown_symbol() {
    let (status, json) = get_json(create_test_app(), "/api/credit/NOPE").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);
}
