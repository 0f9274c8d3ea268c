use credit_core::CreditMetrics;

use crate::format::{format_ratio, human_readable, RatioFormat};

pub const SYSTEM_PROMPT: &str = "You are an experienced sell-side credit analyst.";

/// Section headings the memo must follow, in order.
pub const MEMO_SECTIONS: [&str; 6] = [
    "Business overview",
    "Recent financial performance",
    "Cash flow generation and leverage",
    "Debt structure and debt service capacity",
    "Key risks and mitigants",
    "Overall credit view and recommendation",
];

/// User prompt asking for a structured memo grounded only in `metrics`.
pub fn memo_prompt(metrics: &CreditMetrics) -> String {
    let q = &metrics.quantities;
    let r = &metrics.ratios;

    let facts = [
        ("Revenue", human_readable(q.revenue)),
        ("EBITDA", human_readable(q.ebitda)),
        ("EBIT", human_readable(q.ebit)),
        ("Operating cash flow", human_readable(q.operating_cash_flow)),
        ("Capex", human_readable(q.capex)),
        ("Change in working capital", human_readable(q.change_in_working_capital)),
        ("Total debt", human_readable(q.total_debt)),
        ("Interest expense", human_readable(q.interest_expense)),
        ("Free cash flow (FCF)", human_readable(r.fcf)),
        ("FCF / Debt", format_ratio(r.fcf_to_debt, RatioFormat::Percent)),
        ("Debt / EBITDA", format_ratio(r.debt_to_ebitda, RatioFormat::Multiple)),
        (
            "Interest coverage (EBIT / interest)",
            format_ratio(r.interest_coverage, RatioFormat::Multiple),
        ),
        (
            "DSCR (OCF / (interest + short-term debt proxy))",
            format_ratio(r.dscr, RatioFormat::Multiple),
        ),
        ("Internal score (0-20)", metrics.score.to_string()),
        ("Risk bucket", metrics.rating_bucket.label().to_string()),
    ];

    let year = if q.fiscal_year.is_empty() {
        "latest fiscal year".to_string()
    } else {
        format!("fiscal year {}", q.fiscal_year)
    };

    let mut prompt = format!(
        "Write a structured, professional credit memo on {} (ticker: {}).\n\n\
         Use the following quantitative metrics ({}):\n\n",
        q.company_name, q.ticker, year
    );
    for (label, value) in facts {
        prompt.push_str(&format!("- {}: {}\n", label, value));
    }

    prompt.push_str("\nWrite the memo in concise UK English with these section headings:\n\n");
    for (i, heading) in MEMO_SECTIONS.iter().enumerate() {
        prompt.push_str(&format!("{}. {}\n", i + 1, heading));
    }
    prompt.push_str(
        "\nFocus strictly on the metrics above. Where information is missing, \
         say so explicitly rather than inventing details.",
    );
    prompt
}
