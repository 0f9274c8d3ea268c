use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;

use crate::{
    CreditError, RawStatementBundle, ResolvedSymbol, StatementRecord, StatementSource,
    SymbolResolver,
};

/// Statement source backed by bundles held in memory.
///
/// Serves offline runs (a bundle loaded from a JSON file) and tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStatementSource {
    bundles: HashMap<String, RawStatementBundle>,
}

impl InMemoryStatementSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bundle(mut self, symbol: &str, bundle: RawStatementBundle) -> Self {
        self.insert(symbol, bundle);
        self
    }

    pub fn insert(&mut self, symbol: &str, bundle: RawStatementBundle) {
        self.bundles.insert(symbol.to_uppercase(), bundle);
    }

    /// Load a single bundle from a JSON file and register it under `symbol`.
    pub fn from_json_file(symbol: &str, path: impl AsRef<Path>) -> Result<Self, CreditError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CreditError::InvalidData(format!("Cannot read {}: {}", path.display(), e))
        })?;
        let bundle: RawStatementBundle = serde_json::from_str(&content).map_err(|e| {
            CreditError::InvalidData(format!("Malformed bundle {}: {}", path.display(), e))
        })?;
        Ok(Self::new().with_bundle(symbol, bundle))
    }

    fn bundle(&self, symbol: &str) -> Option<&RawStatementBundle> {
        self.bundles.get(&symbol.to_uppercase())
    }

    fn statement(
        &self,
        symbol: &str,
        what: &str,
        pick: fn(&RawStatementBundle) -> &StatementRecord,
    ) -> Result<StatementRecord, CreditError> {
        match self.bundle(symbol).map(pick) {
            Some(record) if !record.is_empty() => Ok(record.clone()),
            _ => Err(CreditError::NotFound(format!("No {} data for {}", what, symbol))),
        }
    }
}

#[async_trait]
impl StatementSource for InMemoryStatementSource {
    async fn fetch_income(&self, symbol: &str) -> Result<StatementRecord, CreditError> {
        self.statement(symbol, "income statement", |b| &b.income)
    }

    async fn fetch_balance_sheet(&self, symbol: &str) -> Result<StatementRecord, CreditError> {
        self.statement(symbol, "balance sheet", |b| &b.balance_sheet)
    }

    async fn fetch_cashflow(&self, symbol: &str) -> Result<StatementRecord, CreditError> {
        self.statement(symbol, "cash flow", |b| &b.cash_flow)
    }

    async fn fetch_profile(&self, symbol: &str) -> Result<StatementRecord, CreditError> {
        Ok(self.bundle(symbol).map(|b| b.profile.clone()).unwrap_or_default())
    }

    fn source_name(&self) -> &'static str {
        "local statement files"
    }
}

#[async_trait]
impl SymbolResolver for InMemoryStatementSource {
    async fn search(&self, query: &str) -> Result<Option<ResolvedSymbol>, CreditError> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(None);
        }

        let mut symbols: Vec<&String> = self.bundles.keys().collect();
        symbols.sort();

        for symbol in symbols {
            let name = self.bundles[symbol]
                .profile
                .get("companyName")
                .and_then(|v| v.as_str())
                .unwrap_or(symbol);
            if symbol.to_lowercase() == needle || name.to_lowercase().contains(&needle) {
                return Ok(Some(ResolvedSymbol {
                    symbol: symbol.clone(),
                    name: name.to_string(),
                }));
            }
        }
        Ok(None)
    }
}
