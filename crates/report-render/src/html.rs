//! Server-rendered pages for the web front end.

use std::fmt::Write;

use chrono::Utc;
use credit_core::{CreditMetrics, Narrative};

use crate::format::{
    coverage_reading, dscr_reading, fcf_to_debt_reading, format_ratio, human_readable,
    leverage_reading, RatioFormat,
};

const STYLE: &str = r#"
* { margin: 0; padding: 0; box-sizing: border-box; }
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
       background: linear-gradient(135deg, #1e3c72 0%, #2a5298 100%); min-height: 100vh;
       padding: 20px; color: #333; }
.container { max-width: 1100px; margin: 0 auto; }
.header { text-align: center; color: white; margin: 40px 0; }
.header h1 { font-size: 2.6em; margin-bottom: 10px; }
.search-card, .report-card { background: white; border-radius: 16px;
       box-shadow: 0 20px 60px rgba(0,0,0,0.3); overflow: hidden; }
.search-card { padding: 40px; }
.search-form { display: flex; gap: 12px; }
.search-input { flex: 1; padding: 16px 20px; font-size: 16px; border: 2px solid #e0e0e0;
       border-radius: 10px; }
.search-btn, .btn { padding: 14px 28px; border: none; border-radius: 10px; font-weight: 600;
       cursor: pointer; text-decoration: none; display: inline-block; }
.search-btn, .btn-primary { background: #2a5298; color: white; }
.btn-secondary { background: #eef2f7; color: #2a5298; }
.search-hint { margin-top: 14px; color: #777; font-size: 14px; }
.back-link { color: white; display: inline-block; margin-bottom: 16px; text-decoration: none; }
.report-header { background: #1e3c72; color: white; padding: 32px 40px; }
.company-name { font-size: 2em; font-weight: 700; }
.ticker { opacity: 0.85; margin-top: 4px; }
.score-section { display: flex; align-items: center; gap: 24px; margin-top: 24px; }
.score-circle { width: 110px; height: 110px; border-radius: 50%; background: white; color: #1e3c72;
       display: flex; flex-direction: column; align-items: center; justify-content: center; }
.score-value { font-size: 2.4em; font-weight: 700; }
.score-max { font-size: 0.9em; color: #888; }
.risk-badge { padding: 10px 20px; border-radius: 24px; font-weight: 600; }
.risk-low { background: #d4edda; color: #155724; }
.risk-moderate { background: #fff3cd; color: #856404; }
.risk-elevated { background: #ffe5d0; color: #8a4b08; }
.risk-high { background: #f8d7da; color: #721c24; }
.report-content { padding: 32px 40px; }
.section { margin-bottom: 32px; }
.section-title { font-size: 1.3em; color: #1e3c72; margin-bottom: 16px;
       border-bottom: 2px solid #eef2f7; padding-bottom: 8px; }
.metrics-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 16px; }
.metric-card { background: #f7f9fc; border-radius: 10px; padding: 18px; }
.metric-label { color: #777; font-size: 13px; text-transform: uppercase; }
.metric-value { font-size: 1.5em; font-weight: 700; margin-top: 6px; }
.ratios-table { width: 100%; border-collapse: collapse; }
.ratios-table th, .ratios-table td { padding: 12px; text-align: left; border-bottom: 1px solid #eee; }
.interpretation { background: #f7f9fc; border-left: 4px solid #2a5298; padding: 16px; border-radius: 6px; }
.memo-section p { line-height: 1.7; margin-bottom: 12px; }
.memo-heading { color: #1e3c72; margin: 20px 0 8px; }
.memo-note { background: #fff8e1; border-left: 4px solid #f0ad4e; padding: 16px; border-radius: 6px; }
.actions { display: flex; gap: 12px; }
.error-card { background: #fdecea; border-left: 4px solid #d9534f; padding: 20px; border-radius: 6px; }
.error-title { font-weight: 700; color: #a94442; margin-bottom: 6px; }
.footer { text-align: center; color: rgba(255,255,255,0.7); margin-top: 24px; font-size: 13px; }
"#;

/// Minimal escaping for text placed in element bodies and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
         <title>{}</title>\n<style>{}</style>\n</head>\n<body>\n<div class=\"container\">\n{}\n\
         <div class=\"footer\">Generated {}</div>\n</div>\n</body>\n</html>\n",
        escape(title),
        STYLE,
        body,
        Utc::now().format("%Y-%m-%d %H:%M UTC")
    )
}

/// `1. Business overview` style heading, split into number and title.
fn numbered_heading(line: &str) -> Option<(&str, &str)> {
    let digits = line.len() - line.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return None;
    }
    let rest = line[digits..].strip_prefix('.')?;
    let title = rest.trim_start();
    if title.len() == rest.len() || title.is_empty() {
        return None;
    }
    Some((&line[..digits], title))
}

/// Turns plain memo text into headings and paragraphs.
///
/// Numbered lines become `<h3 class="memo-heading">`; consecutive other lines
/// are joined into one `<p>` until a blank line or the next heading.
pub fn format_memo_html(memo: &str) -> String {
    let mut blocks: Vec<String> = Vec::new();
    let mut paragraph: Vec<&str> = Vec::new();

    fn flush(paragraph: &mut Vec<&str>, blocks: &mut Vec<String>) {
        if !paragraph.is_empty() {
            blocks.push(format!("<p>{}</p>", escape(&paragraph.join(" "))));
            paragraph.clear();
        }
    }

    for line in memo.lines().map(str::trim) {
        if let Some((number, title)) = numbered_heading(line) {
            flush(&mut paragraph, &mut blocks);
            blocks.push(format!(
                "<h3 class=\"memo-heading\">{}. {}</h3>",
                number,
                escape(title)
            ));
        } else if line.is_empty() {
            flush(&mut paragraph, &mut blocks);
        } else {
            paragraph.push(line);
        }
    }
    flush(&mut paragraph, &mut blocks);

    blocks.join("\n")
}

pub fn index_page() -> String {
    let body = r#"<div class="header">
<h1>Credit Analysis Platform</h1>
<p>Creditworthiness snapshots from public financial statements</p>
</div>
<div class="search-card">
<form method="get" action="/report" class="search-form">
<input type="text" name="query" class="search-input" placeholder="Enter ticker or company name (e.g. AAPL, Microsoft)" required autofocus>
<button type="submit" class="search-btn">Analyze</button>
</form>
<p class="search-hint">Scores leverage, interest coverage, debt service and free cash flow on a 20-point scale.</p>
</div>"#;
    page("Credit Analysis Platform", body)
}

pub fn error_page(query: &str, message: &str) -> String {
    let mut body = String::from("<a href=\"/\" class=\"back-link\">&larr; Back to search</a>\n");
    let _ = write!(
        body,
        "<div class=\"report-card\"><div class=\"report-content\"><div class=\"error-card\">\
         <div class=\"error-title\">Error</div><div>{}</div></div></div></div>",
        escape(message)
    );
    let title = if query.is_empty() {
        "Credit Report".to_string()
    } else {
        format!("Credit Report - {}", query)
    };
    page(&title, &body)
}

fn metric_card(label: &str, value: f64) -> String {
    format!(
        "<div class=\"metric-card\"><div class=\"metric-label\">{}</div>\
         <div class=\"metric-value\">{}</div></div>",
        label,
        escape(&human_readable(value))
    )
}

fn ratio_row(label: &str, value: String, reading: &str) -> String {
    format!(
        "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
        label,
        escape(&value),
        reading
    )
}

pub fn report_page(metrics: &CreditMetrics, narrative: &Narrative) -> String {
    let q = &metrics.quantities;
    let r = &metrics.ratios;
    let mut body = String::from("<a href=\"/\" class=\"back-link\">&larr; Back to search</a>\n");

    body.push_str("<div class=\"report-card\">\n<div class=\"report-header\">\n");
    let _ = writeln!(body, "<div class=\"company-name\">{}</div>", escape(&q.company_name));
    let fiscal = if q.fiscal_year.is_empty() {
        String::new()
    } else {
        format!(" &bull; FY {}", escape(&q.fiscal_year))
    };
    let _ = writeln!(body, "<div class=\"ticker\">{}{}</div>", escape(&q.ticker), fiscal);
    let _ = writeln!(
        body,
        "<div class=\"score-section\"><div class=\"score-circle\">\
         <div class=\"score-value\">{}</div><div class=\"score-max\">/20</div></div>\
         <div class=\"risk-badge risk-{}\">{}</div></div>",
        metrics.score,
        metrics.rating_bucket.slug(),
        metrics.rating_bucket.label()
    );
    body.push_str("</div>\n<div class=\"report-content\">\n");

    body.push_str("<div class=\"section\"><h2 class=\"section-title\">Core Financials</h2>\n<div class=\"metrics-grid\">\n");
    for (label, value) in [
        ("Revenue", q.revenue),
        ("EBITDA", q.ebitda),
        ("EBIT", q.ebit),
        ("Operating Cash Flow", q.operating_cash_flow),
        ("Total Debt", q.total_debt),
        ("Free Cash Flow", r.fcf),
    ] {
        body.push_str(&metric_card(label, value));
        body.push('\n');
    }
    body.push_str("</div></div>\n");

    body.push_str(
        "<div class=\"section\"><h2 class=\"section-title\">Credit Ratios &amp; Coverage</h2>\n\
         <table class=\"ratios-table\"><thead><tr><th>Metric</th><th>Value</th>\
         <th>Interpretation</th></tr></thead><tbody>\n",
    );
    let rows = [
        ratio_row(
            "Debt / EBITDA",
            format_ratio(r.debt_to_ebitda, RatioFormat::Multiple),
            leverage_reading(r.debt_to_ebitda),
        ),
        ratio_row(
            "Interest Coverage",
            format_ratio(r.interest_coverage, RatioFormat::Multiple),
            coverage_reading(r.interest_coverage),
        ),
        ratio_row("DSCR", format_ratio(r.dscr, RatioFormat::Multiple), dscr_reading(r.dscr)),
        ratio_row(
            "FCF / Debt",
            format_ratio(r.fcf_to_debt, RatioFormat::Percent),
            fcf_to_debt_reading(r.fcf_to_debt),
        ),
    ];
    body.push_str(&rows.join("\n"));
    body.push_str("\n</tbody></table>\n");
    let _ = writeln!(
        body,
        "<p class=\"interpretation\" style=\"margin-top:16px\">{}</p></div>",
        metrics.rating_bucket.interpretation()
    );

    body.push_str("<div class=\"section\"><h2 class=\"section-title\">AI-Generated Credit Analysis</h2>\n");
    match narrative {
        Narrative::Memo(text) => {
            let _ = writeln!(body, "<div class=\"memo-section\">\n{}\n</div>", format_memo_html(text));
        }
        Narrative::Note(text) => {
            let _ = writeln!(
                body,
                "<div class=\"memo-note\"><strong>Note:</strong> {}</div>",
                escape(text)
            );
        }
    }
    body.push_str("</div>\n");

    let _ = write!(
        body,
        "<div class=\"actions\">\
         <a href=\"/download-pdf?symbol={}\" class=\"btn btn-primary\">Download PDF Report</a>\
         <a href=\"/\" class=\"btn btn-secondary\">New Analysis</a></div>\n</div>\n</div>",
        urlencoding::encode(&q.ticker)
    );

    page(&format!("Credit Report - {}", q.ticker), &body)
}
