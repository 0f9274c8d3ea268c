use std::sync::Arc;

use anyhow::Result;
use credit_core::{
    AppConfig, CreditError, CreditMetrics, Narrative, NarrativeGenerator, ResolvedSymbol, StatementSource,
    SymbolResolver,
};
use credit_scoring::CreditScoringEngine;
use fmp_client::{FmpClient, FmpConfig};
use memo_client::{MemoClient, MemoConfig};


pub const MISSING_FMP_KEY: &str = "FMP_API_KEY not configured";

/// Collaborators shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub source: Option<Arc<dyn StatementSource>>,
    pub resolver: Option<Arc<dyn SymbolResolver>>,
    pub narrator: Option<Arc<dyn NarrativeGenerator>>,
    pub engine: Arc<CreditScoringEngine>,
}

impl AppState {
    pub fn new(
        source: Option<Arc<dyn StatementSource>>,
        resolver: Option<Arc<dyn SymbolResolver>>,
        narrator: Option<Arc<dyn NarrativeGenerator>>,
    ) -> Self {
        Self {
            source,
            resolver,
            narrator,
            engine: Arc::new(CreditScoringEngine::new()),
        }
    }

    /// Wire the FMP and memo clients from configuration. A missing key
    /// leaves the matching collaborator unset.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let (source, resolver): (Option<Arc<dyn StatementSource>>, Option<Arc<dyn SymbolResolver>>) =
            match FmpConfig::from_app_config(config) {
                Some(fmp_config) => {
                    let fmp = Arc::new(FmpClient::new(fmp_config)?);
                    let source: Arc<dyn StatementSource> = fmp.clone();
                    let resolver: Arc<dyn SymbolResolver> = fmp;
                    (Some(source), Some(resolver))
                }
                None => {
                    tracing::warn!("FMP_API_KEY not set; credit reports are unavailable");
                    (None, None)
                }
            };

        let narrator: Option<Arc<dyn NarrativeGenerator>> = match MemoConfig::from_app_config(config) {
            Some(memo_config) => {
                let memo = MemoClient::new(memo_config)?;
                let memo: Arc<dyn NarrativeGenerator> = Arc::new(memo);
                Some(memo)
            }
            None => {
                tracing::info!("OPENAI_API_KEY not set; credit memos disabled");
                None
            }
        };

        Ok(Self::new(source, resolver, narrator))
    }

    pub fn source(&self) -> Result<&dyn StatementSource, CreditError> {
        self.source
            .as_deref()
            .ok_or_else(|| CreditError::ConfigError(MISSING_FMP_KEY.to_string()))
    }

    pub async fn resolve(&self, query: &str) -> ResolvedSymbol {
        match &self.resolver {
            Some(resolver) => resolver.resolve(query).await,
            None => ResolvedSymbol::from_query(query),
        }
    }

    pub async fn analyze(
        &self,
        symbol: &str,
        forced_name: Option<&str>,
    ) -> Result<CreditMetrics, CreditError> {
        let source = self.source()?;
        self.engine.analyze(source, symbol, forced_name).await
    }

    pub async fn narrate(&self, metrics: &CreditMetrics) -> Narrative {
        memo_client::narrate(self.narrator.as_deref(), metrics).await
    }

    pub fn source_name(&self) -> &'static str {
        self.source
            .as_ref()
            .map(|s| s.source_name())
            .unwrap_or("FMP")
    }
}
