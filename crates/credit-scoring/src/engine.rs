use credit_core::{CreditError, CreditMetrics, RawStatementBundle, StatementSource};

use crate::{compute_ratios, extract_quantities, score_metrics};

/// Fetch the four statements for `symbol` concurrently.
///
/// Any provider failure aborts the whole fetch.
pub async fn fetch_bundle(
    source: &dyn StatementSource,
    symbol: &str,
) -> Result<RawStatementBundle, CreditError> {
    let (income, balance_sheet, cash_flow, profile) = tokio::join!(
        source.fetch_income(symbol),
        source.fetch_balance_sheet(symbol),
        source.fetch_cashflow(symbol),
        source.fetch_profile(symbol),
    );

    Ok(RawStatementBundle {
        income: income?,
        balance_sheet: balance_sheet?,
        cash_flow: cash_flow?,
        profile: profile?,
    })
}

pub struct CreditScoringEngine;

impl CreditScoringEngine {
    pub fn new() -> Self {
        Self
    }

    /// Pure scoring of an already fetched bundle.
    pub fn score_bundle(
        &self,
        ticker: &str,
        forced_name: Option<&str>,
        bundle: &RawStatementBundle,
    ) -> CreditMetrics {
        let quantities = extract_quantities(ticker, forced_name, bundle);
        let ratios = compute_ratios(&quantities);

        // Undefined ratios score as best case, which also covers fields the
        // provider simply did not report.
        let undefined = ratios.undefined();
        if !undefined.is_empty() {
            tracing::warn!(
                symbol = ticker,
                ratios = ?undefined,
                "Zero denominator; ratio treated as most favourable"
            );
        }

        let metrics = score_metrics(quantities, ratios);
        tracing::debug!(
            symbol = ticker,
            score = metrics.score,
            bucket = %metrics.rating_bucket,
            "Credit score computed"
        );
        metrics
    }

    /// Fetch statements from `source` and score them.
    pub async fn analyze(
        &self,
        source: &dyn StatementSource,
        symbol: &str,
        forced_name: Option<&str>,
    ) -> Result<CreditMetrics, CreditError> {
        let bundle = fetch_bundle(source, symbol).await?;
        Ok(self.score_bundle(symbol, forced_name, &bundle))
    }
}

impl Default for CreditScoringEngine {
    fn default() -> Self {
        Self::new()
    }
}
