use serde::{Deserialize, Serialize};

/// One statement for the latest reporting period, keyed by provider field name.
pub type StatementRecord = serde_json::Map<String, serde_json::Value>;

/// Raw provider payloads for a single symbol
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawStatementBundle {
    #[serde(default)]
    pub income: StatementRecord,
    #[serde(default)]
    pub balance_sheet: StatementRecord,
    #[serde(default)]
    pub cash_flow: StatementRecord,
    #[serde(default)]
    pub profile: StatementRecord,
}

/// Line items pulled out of a statement bundle.
///
/// Every amount is finite, capex is a non-negative outflow and
/// `total_debt == short_term_debt + long_term_debt`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialQuantities {
    pub ticker: String,
    pub company_name: String,
    pub fiscal_year: String,
    pub revenue: f64,
    pub ebitda: f64,
    pub ebit: f64,
    pub interest_expense: f64,
    pub operating_cash_flow: f64,
    pub capex: f64,
    pub change_in_working_capital: f64,
    pub short_term_debt: f64,
    pub long_term_debt: f64,
    pub total_debt: f64,
}

/// Free cash flow plus the four credit ratios.
///
/// A ratio whose denominator is zero holds `f64::INFINITY`. On the wire the
/// sentinel is written as `null`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CreditRatios {
    pub fcf: f64,
    #[serde(with = "crate::sentinel")]
    pub fcf_to_debt: f64,
    #[serde(with = "crate::sentinel")]
    pub debt_to_ebitda: f64,
    #[serde(with = "crate::sentinel")]
    pub interest_coverage: f64,
    #[serde(with = "crate::sentinel")]
    pub dscr: f64,
}

impl CreditRatios {
    /// Names of the ratios that fell back to the undefined sentinel.
    pub fn undefined(&self) -> Vec<&'static str> {
        [
            ("fcf_to_debt", self.fcf_to_debt),
            ("debt_to_ebitda", self.debt_to_ebitda),
            ("interest_coverage", self.interest_coverage),
            ("dscr", self.dscr),
        ]
        .into_iter()
        .filter(|(_, v)| v.is_infinite())
        .map(|(name, _)| name)
        .collect()
    }
}

/// Per-ratio scores, each in 1..=5
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubScores {
    pub debt_to_ebitda: u8,
    pub interest_coverage: u8,
    pub dscr: u8,
    pub fcf_to_debt: u8,
}

impl SubScores {
    pub fn total(&self) -> u8 {
        self.debt_to_ebitda + self.interest_coverage + self.dscr + self.fcf_to_debt
    }
}

/// Risk bucket, ordered from best to worst
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskBucket {
    #[serde(rename = "Low credit risk")]
    Low,
    #[serde(rename = "Moderate credit risk")]
    Moderate,
    #[serde(rename = "Elevated credit risk")]
    Elevated,
    #[serde(rename = "High credit risk")]
    High,
}

impl RiskBucket {
    pub fn from_score(score: u8) -> Self {
        match score {
            s if s >= 17 => RiskBucket::Low,
            s if s >= 13 => RiskBucket::Moderate,
            s if s >= 9 => RiskBucket::Elevated,
            _ => RiskBucket::High,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskBucket::Low => "Low credit risk",
            RiskBucket::Moderate => "Moderate credit risk",
            RiskBucket::Elevated => "Elevated credit risk",
            RiskBucket::High => "High credit risk",
        }
    }

    /// Short lowercase tag, used for CSS classes
    pub fn slug(&self) -> &'static str {
        match self {
            RiskBucket::Low => "low",
            RiskBucket::Moderate => "moderate",
            RiskBucket::Elevated => "elevated",
            RiskBucket::High => "high",
        }
    }

    /// One-sentence reading of the bucket
    pub fn interpretation(&self) -> &'static str {
        match self {
            RiskBucket::Low => {
                "Strong capacity to service debt; leverage and coverage metrics are comfortable."
            }
            RiskBucket::Moderate => {
                "Reasonable ability to service debt, but metrics could tighten in a downturn."
            }
            RiskBucket::Elevated => {
                "Weaker cushion; the company may struggle under stress or higher interest rates."
            }
            RiskBucket::High => {
                "High risk profile; limited headroom to absorb shocks or refinancing stress."
            }
        }
    }
}

impl std::fmt::Display for RiskBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Scored credit snapshot for one company. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditMetrics {
    #[serde(flatten)]
    pub quantities: FinancialQuantities,
    #[serde(flatten)]
    pub ratios: CreditRatios,
    pub sub_scores: SubScores,
    /// Composite score, 0 to 20
    pub score: u8,
    pub rating_bucket: RiskBucket,
}

impl CreditMetrics {
    pub fn ticker(&self) -> &str {
        &self.quantities.ticker
    }

    pub fn company_name(&self) -> &str {
        &self.quantities.company_name
    }

    pub fn fiscal_year(&self) -> &str {
        &self.quantities.fiscal_year
    }
}

/// Symbol search hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedSymbol {
    pub symbol: String,
    #[serde(rename = "company_name")]
    pub name: String,
}

impl ResolvedSymbol {
    /// Treat the raw query as the symbol
    pub fn from_query(query: &str) -> Self {
        let raw = query.trim();
        Self {
            symbol: raw.to_uppercase(),
            name: raw.to_string(),
        }
    }
}

/// Outcome of asking for a credit memo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum Narrative {
    /// Generated memo text
    Memo(String),
    /// Placeholder shown when no memo could be produced
    Note(String),
}

impl Narrative {
    pub fn memo(&self) -> Option<&str> {
        match self {
            Narrative::Memo(text) => Some(text),
            Narrative::Note(_) => None,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Narrative::Memo(text) | Narrative::Note(text) => text,
        }
    }
}
