use async_trait::async_trait;
use crate::{CreditError, CreditMetrics, ResolvedSymbol, StatementRecord};

/// Provider of the latest annual statements for a symbol.
///
/// Implemented by the FMP HTTP client and by the in-memory source used for
/// offline runs and tests.
#[async_trait]
pub trait StatementSource: Send + Sync {
    async fn fetch_income(&self, symbol: &str) -> Result<StatementRecord, CreditError>;

    async fn fetch_balance_sheet(&self, symbol: &str) -> Result<StatementRecord, CreditError>;

    async fn fetch_cashflow(&self, symbol: &str) -> Result<StatementRecord, CreditError>;

    /// Company profile. An unknown profile is an empty record, not an error.
    async fn fetch_profile(&self, symbol: &str) -> Result<StatementRecord, CreditError>;

    /// Short provider name shown in report footers
    fn source_name(&self) -> &'static str;
}

/// Maps free text (ticker or company name) onto a listed symbol
#[async_trait]
pub trait SymbolResolver: Send + Sync {
    /// Best match for `query`, or `None` when the provider found nothing.
    async fn search(&self, query: &str) -> Result<Option<ResolvedSymbol>, CreditError>;

    /// Like `search`, but falls back to the raw query on any failure.
    async fn resolve(&self, query: &str) -> ResolvedSymbol {
        match self.search(query).await {
            Ok(Some(found)) => found,
            Ok(None) => {
                tracing::warn!("No search result for '{}', using it directly as symbol", query.trim());
                ResolvedSymbol::from_query(query)
            }
            Err(e) => {
                tracing::warn!("Symbol search failed: {}. Falling back to '{}' as symbol", e, query.trim());
                ResolvedSymbol::from_query(query)
            }
        }
    }
}

/// Turns scored metrics into analyst-style prose
#[async_trait]
pub trait NarrativeGenerator: Send + Sync {
    async fn generate(&self, metrics: &CreditMetrics) -> Result<String, CreditError>;
}
