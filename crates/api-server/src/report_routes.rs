//! Browser-facing pages: search form, HTML report and PDF download.

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use serde::Deserialize;

use crate::error::status_for;
use crate::AppState;

#[derive(Deserialize)]
pub struct ReportQuery {
    #[serde(default)]
    pub query: Option<String>,
}

#[derive(Deserialize)]
pub struct PdfQuery {
    #[serde(default)]
    pub symbol: Option<String>,
}

pub fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/report", get(report))
        .route("/download-pdf", get(download_pdf))
}

async fn index() -> Html<String> {
    Html(report_render::index_page())
}

async fn report(State(state): State<AppState>, Query(params): Query<ReportQuery>) -> Response {
    let query = params.query.as_deref().map(str::trim).unwrap_or_default();
    if query.is_empty() {
        return Redirect::to("/").into_response();
    }

    if let Err(e) = state.source() {
        return (status_for(&e), Html(report_render::error_page(query, &e.to_string()))).into_response();
    }

    let resolved = state.resolve(query).await;
    let metrics = match state.analyze(&resolved.symbol, Some(&resolved.name)).await {
        Ok(metrics) => metrics,
        Err(e) => {
            tracing::warn!(query, symbol = %resolved.symbol, "Report failed: {}", e);
            let message = format!("Error analyzing '{}': {}", query, e);
            return (status_for(&e), Html(report_render::error_page(query, &message))).into_response();
        }
    };

    let narrative = state.narrate(&metrics).await;
    Html(report_render::report_page(&metrics, &narrative)).into_response()
}

async fn download_pdf(State(state): State<AppState>, Query(params): Query<PdfQuery>) -> Response {
    let symbol = params
        .symbol
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_uppercase();
    if symbol.is_empty() {
        return (StatusCode::BAD_REQUEST, "Missing symbol parameter").into_response();
    }

    let metrics = match state.analyze(&symbol, None).await {
        Ok(metrics) => metrics,
        Err(e) => {
            tracing::warn!(symbol = %symbol, "PDF report failed: {}", e);
            return (status_for(&e), format!("Error generating PDF: {}", e)).into_response();
        }
    };

    let narrative = state.narrate(&metrics).await;
    match report_render::render_pdf(&metrics, narrative.memo(), state.source_name()) {
        Ok(bytes) => {
            let filename = report_render::report_filename(metrics.ticker());
            (
                [
                    (header::CONTENT_TYPE, "application/pdf".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}\"", filename),
                    ),
                ],
                bytes,
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(symbol = %symbol, "PDF rendering failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Error generating PDF: {}", e)).into_response()
        }
    }
}
