//! JSON API Routes
//!
//! Symbol search and machine-readable credit metrics.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use credit_core::{CreditMetrics, Narrative, ResolvedSymbol};
use serde::{Deserialize, Serialize};

use crate::{ApiResponse, AppError, AppState};

#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: Option<String>,
}

#[derive(Deserialize)]
pub struct CreditQuery {
    /// Also generate the narrative memo
    #[serde(default)]
    pub memo: bool,
}

#[derive(Serialize)]
pub struct CreditReport {
    pub metrics: CreditMetrics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narrative: Option<Narrative>,
    pub source: &'static str,
}

pub fn credit_routes() -> Router<AppState> {
    Router::new()
        .route("/api/search", get(search_symbol))
        .route("/api/credit/:symbol", get(get_credit_metrics))
}

async fn search_symbol(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<ResolvedSymbol>>, AppError> {
    let q = query.q.as_deref().map(str::trim).unwrap_or_default();
    if q.is_empty() {
        return Err(AppError::bad_request("Missing query parameter"));
    }
    state.source()?;

    Ok(Json(ApiResponse::success(state.resolve(q).await)))
}

async fn get_credit_metrics(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(query): Query<CreditQuery>,
) -> Result<Json<ApiResponse<CreditReport>>, AppError> {
    let symbol = symbol.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(AppError::bad_request("Missing symbol"));
    }

    let metrics = state.analyze(&symbol, None).await?;
    let narrative = if query.memo {
        Some(state.narrate(&metrics).await)
    } else {
        None
    };

    Ok(Json(ApiResponse::success(CreditReport {
        metrics,
        narrative,
        source: state.source_name(),
    })))
}
