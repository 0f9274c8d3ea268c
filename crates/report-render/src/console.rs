use std::fmt::Write;

use credit_core::CreditMetrics;

use crate::format::{format_ratio, human_readable, RatioFormat};

const RULE_WIDTH: usize = 70;

/// Plain-text snapshot for terminal output.
pub fn render_console(metrics: &CreditMetrics, source_name: &str) -> String {
    let q = &metrics.quantities;
    let r = &metrics.ratios;
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();

    // Writing into a String cannot fail
    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(
        out,
        " Creditworthiness Snapshot - {} ({})",
        q.company_name, q.ticker
    );
    if !q.fiscal_year.is_empty() {
        let _ = writeln!(out, " Fiscal year: {}", q.fiscal_year);
    }
    let _ = writeln!(out, "{}", rule);

    let _ = writeln!(out, "\n-- Core Financials --");
    for (label, value) in [
        ("Revenue:", q.revenue),
        ("EBITDA:", q.ebitda),
        ("EBIT:", q.ebit),
        ("Operating Cash Flow:", q.operating_cash_flow),
        ("Capex:", q.capex),
        ("Change in Working Cap.:", q.change_in_working_capital),
        ("Total Debt:", q.total_debt),
        ("Interest Expense:", q.interest_expense),
    ] {
        let _ = writeln!(out, "{:<24}{}", label, human_readable(value));
    }

    let _ = writeln!(out, "\n-- Cash Flow & Coverage --");
    let _ = writeln!(out, "{:<24}{}", "Free Cash Flow (FCF):", human_readable(r.fcf));
    let _ = writeln!(out, "{:<24}{}", "FCF / Debt:", format_ratio(r.fcf_to_debt, RatioFormat::Percent));
    let _ = writeln!(out, "{:<24}{}", "Debt / EBITDA:", format_ratio(r.debt_to_ebitda, RatioFormat::Plain));
    let _ = writeln!(out, "{:<24}{}", "Interest Coverage:", format_ratio(r.interest_coverage, RatioFormat::Plain));
    let _ = writeln!(out, "{:<24}{}", "DSCR:", format_ratio(r.dscr, RatioFormat::Plain));

    let _ = writeln!(out, "\n-- Credit View --");
    let _ = writeln!(out, "{:<24}{}", "Score (0-20):", metrics.score);
    let _ = writeln!(out, "{:<24}{}", "Risk Bucket:", metrics.rating_bucket);

    let _ = writeln!(out, "\nInterpretation:");
    let _ = writeln!(out, "• {}", metrics.rating_bucket.interpretation());

    let _ = writeln!(
        out,
        "\nNOTE: This is a simplified model using public data via {}; \
         always cross-check with full financial statements & disclosures.",
        source_name
    );
    let _ = writeln!(out, "{}", rule);
    out
}
