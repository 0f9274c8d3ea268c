use credit_core::{FinancialQuantities, RawStatementBundle, StatementRecord};
use serde_json::Value;

// Field aliases, highest priority first. The leading name is the FMP field;
// the rest are the Yahoo-style statement labels other providers emit.
pub const REVENUE: &[&str] = &["revenue", "Total Revenue", "Revenue", "Net Revenue"];
pub const EBITDA: &[&str] = &["ebitda", "Ebitda", "EBITDA"];
pub const EBIT: &[&str] = &["ebit", "Ebit", "EBIT", "Operating Income", "Operating Income or Loss"];
pub const INTEREST_EXPENSE: &[&str] = &[
    "interestExpense",
    "Interest Expense",
    "Interest Expense Non Operating",
];
pub const OPERATING_CASH_FLOW: &[&str] = &[
    "netCashProvidedByOperatingActivities",
    "netCashProvidedByOperatingActivitiesReported",
    "operatingCashFlow",
    "Total Cash From Operating Activities",
    "Operating Cash Flow",
];
pub const CAPEX: &[&str] = &[
    "capitalExpenditure",
    "Capital Expenditures",
    "Purchase Of Property Plant And Equipment",
];
pub const CHANGE_IN_WORKING_CAPITAL: &[&str] = &["changeInWorkingCapital", "Change In Working Capital"];
pub const SHORT_TERM_DEBT: &[&str] = &[
    "shortTermDebt",
    "shortTermBorrowings",
    "Short Long Term Debt",
    "Short Term Debt",
];
pub const LONG_TERM_DEBT: &[&str] = &["longTermDebt", "Long Term Debt", "Long Term Debt Noncurrent"];

const COMPANY_NAME: &[&str] = &["companyName", "longName", "shortName"];
const YEAR: &[&str] = &["calendarYear", "fiscalYear"];

/// Numeric value of a statement cell. Numeric strings are accepted;
/// anything else (null, text, non-finite) counts as absent.
fn as_amount(value: &Value) -> Option<f64> {
    let amount = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    amount.filter(|v| v.is_finite())
}

/// First alias carrying a usable amount, else 0.0
pub fn read_amount(record: &StatementRecord, aliases: &[&str]) -> f64 {
    aliases
        .iter()
        .find_map(|key| record.get(*key).and_then(as_amount))
        .unwrap_or(0.0)
}

fn read_text(record: &StatementRecord, aliases: &[&str]) -> Option<String> {
    aliases.iter().find_map(|key| match record.get(*key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => i.to_string(),
            (None, Some(f)) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{:.0}", f),
            _ => n.to_string(),
        }),
        _ => None,
    })
}

/// Override name, then the profile's name fields, then the ticker itself.
pub fn resolve_company_name(forced_name: Option<&str>, profile: &StatementRecord, ticker: &str) -> String {
    forced_name
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .or_else(|| read_text(profile, COMPANY_NAME))
        .unwrap_or_else(|| ticker.to_string())
}

/// Explicit year field, else the first four characters of `date`.
pub fn resolve_fiscal_year(statement: &StatementRecord) -> Option<String> {
    read_text(statement, YEAR).or_else(|| {
        statement
            .get("date")
            .and_then(|v| v.as_str())
            .map(|date| date.chars().take(4).collect::<String>())
            .filter(|year| !year.is_empty())
    })
}

/// Build the quantity record for `ticker` from a raw bundle.
///
/// Missing fields are zero, never an error.
pub fn extract_quantities(
    ticker: &str,
    forced_name: Option<&str>,
    bundle: &RawStatementBundle,
) -> FinancialQuantities {
    let income = &bundle.income;
    let balance = &bundle.balance_sheet;
    let cash_flow = &bundle.cash_flow;

    let fiscal_year = [income, cash_flow, balance]
        .into_iter()
        .find_map(resolve_fiscal_year)
        .unwrap_or_default();

    // Providers report capex as a negative cash outflow; store the magnitude.
    let mut capex = read_amount(cash_flow, CAPEX);
    if capex < 0.0 {
        capex = -capex;
    }

    let short_term_debt = read_amount(balance, SHORT_TERM_DEBT);
    let long_term_debt = read_amount(balance, LONG_TERM_DEBT);

    FinancialQuantities {
        ticker: ticker.to_string(),
        company_name: resolve_company_name(forced_name, &bundle.profile, ticker),
        fiscal_year,
        revenue: read_amount(income, REVENUE),
        ebitda: read_amount(income, EBITDA),
        ebit: read_amount(income, EBIT),
        interest_expense: read_amount(income, INTEREST_EXPENSE),
        operating_cash_flow: read_amount(cash_flow, OPERATING_CASH_FLOW),
        capex,
        change_in_working_capital: read_amount(cash_flow, CHANGE_IN_WORKING_CAPITAL),
        short_term_debt,
        long_term_debt,
        total_debt: short_term_debt + long_term_debt,
    }
}
