use chrono::Utc;
use credit_core::CreditMetrics;
use printpdf::{
    BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference, Pt,
};

use crate::format::{format_ratio, human_readable, RatioFormat};
use crate::RenderError;

// A4 in points
const PAGE_WIDTH: f32 = 595.28;
const PAGE_HEIGHT: f32 = 841.89;
const MARGIN: f32 = 50.0;
const LINE_HEIGHT: f32 = 14.0;
// Average Helvetica glyph width as a fraction of the font size
const AVG_CHAR_WIDTH: f32 = 0.5;

const FOOTER: &str = "Note: This report is generated automatically using public financial data. \
                      It should be supplemented with full financial statements and disclosures.";

/// Download name for a ticker's report; `/` is not allowed in file names.
pub fn report_filename(ticker: &str) -> String {
    format!("credit_report_{}.pdf", ticker.replace('/', "_"))
}

/// The built-in PDF fonts only cover Latin-1, so typographic punctuation is
/// folded to ASCII and anything else is replaced.
fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{2013}' | '\u{2014}' | '\u{2212}' => out.push('-'),
            '\u{2018}' | '\u{2019}' => out.push('\''),
            '\u{201C}' | '\u{201D}' => out.push('"'),
            '\u{2022}' => out.push('*'),
            '\u{2026}' => out.push_str("..."),
            '\u{221E}' => out.push_str("inf"),
            '\t' => out.push(' '),
            c if c.is_ascii() && !c.is_ascii_control() => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

/// Greedy word wrap against an estimated line width.
fn wrap(text: &str, font_size: f32, max_width: f32) -> Vec<String> {
    let max_chars = ((max_width / (font_size * AVG_CHAR_WIDTH)) as usize).max(1);
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        if line.is_empty() {
            line.push_str(word);
        } else if line.len() + 1 + word.len() <= max_chars {
            line.push(' ');
            line.push_str(word);
        } else {
            lines.push(std::mem::take(&mut line));
            line.push_str(word);
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

#[derive(Clone, Copy)]
enum Face {
    Regular,
    Bold,
    Italic,
}

struct PdfWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
    // Baseline of the next line, in points from the bottom edge
    y: f32,
}

impl PdfWriter {
    fn new(title: &str) -> Result<Self, RenderError> {
        let (doc, page, layer) = PdfDocument::new(
            title,
            Mm::from(Pt(PAGE_WIDTH)),
            Mm::from(Pt(PAGE_HEIGHT)),
            "Layer 1",
        );
        let font = |f: BuiltinFont| {
            doc.add_builtin_font(f)
                .map_err(|e| RenderError::Pdf(e.to_string()))
        };
        let regular = font(BuiltinFont::Helvetica)?;
        let bold = font(BuiltinFont::HelveticaBold)?;
        let italic = font(BuiltinFont::HelveticaOblique)?;
        let layer = doc.get_page(page).get_layer(layer);

        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            italic,
            y: PAGE_HEIGHT - MARGIN,
        })
    }

    fn new_page_if_full(&mut self) {
        if self.y < MARGIN {
            let (page, layer) = self.doc.add_page(
                Mm::from(Pt(PAGE_WIDTH)),
                Mm::from(Pt(PAGE_HEIGHT)),
                "Layer 1",
            );
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT - MARGIN;
        }
    }

    fn text(&mut self, text: &str, face: Face, size: f32, advance: f32) {
        self.new_page_if_full();
        let font = match face {
            Face::Regular => &self.regular,
            Face::Bold => &self.bold,
            Face::Italic => &self.italic,
        };
        self.layer.use_text(
            sanitize(text),
            size,
            Mm::from(Pt(MARGIN)),
            Mm::from(Pt(self.y)),
            font,
        );
        self.y -= advance;
    }

    fn section(&mut self, title: &str, lines: &[String]) {
        self.text(title, Face::Bold, 12.0, 18.0);
        for line in lines {
            self.text(line, Face::Regular, 10.0, LINE_HEIGHT);
        }
    }

    fn wrapped(&mut self, text: &str, face: Face, size: f32) {
        for line in wrap(&sanitize(text), size, PAGE_WIDTH - 2.0 * MARGIN) {
            self.text(&line, face, size, LINE_HEIGHT);
        }
    }

    fn gap(&mut self, points: f32) {
        self.y -= points;
    }

    fn finish(self) -> Result<Vec<u8>, RenderError> {
        self.doc
            .save_to_bytes()
            .map_err(|e| RenderError::Pdf(e.to_string()))
    }
}

fn labelled(label: &str, value: String) -> String {
    format!("{:<24}{}", label, value)
}

/// A4 credit report: numeric snapshot, interpretation and, when given, the
/// generated memo.
pub fn render_pdf(
    metrics: &CreditMetrics,
    memo: Option<&str>,
    source_name: &str,
) -> Result<Vec<u8>, RenderError> {
    let q = &metrics.quantities;
    let r = &metrics.ratios;
    let title = format!("Credit Report - {} ({})", q.company_name, q.ticker);
    let mut w = PdfWriter::new(&title)?;

    w.text(&title, Face::Bold, 16.0, 24.0);
    if !q.fiscal_year.is_empty() {
        w.text(&format!("Fiscal year: {}", q.fiscal_year), Face::Regular, 10.0, 14.0);
    }
    w.text(
        &format!(
            "Data source: {} | Generated {}",
            source_name,
            Utc::now().format("%Y-%m-%d")
        ),
        Face::Regular,
        9.0,
        18.0,
    );

    w.section(
        "1. Core Financials",
        &[
            labelled("Revenue:", human_readable(q.revenue)),
            labelled("EBITDA:", human_readable(q.ebitda)),
            labelled("EBIT:", human_readable(q.ebit)),
            labelled("Operating Cash Flow:", human_readable(q.operating_cash_flow)),
            labelled("Capex:", human_readable(q.capex)),
            labelled("Change in Working Cap.:", human_readable(q.change_in_working_capital)),
            labelled("Total Debt:", human_readable(q.total_debt)),
            labelled("Interest Expense:", human_readable(q.interest_expense)),
        ],
    );

    w.section(
        "2. Cash Flow & Coverage",
        &[
            labelled("Free Cash Flow (FCF):", human_readable(r.fcf)),
            labelled("FCF / Debt:", format_ratio(r.fcf_to_debt, RatioFormat::Percent)),
            labelled("Debt / EBITDA:", format_ratio(r.debt_to_ebitda, RatioFormat::Multiple)),
            labelled(
                "Interest Coverage:",
                format_ratio(r.interest_coverage, RatioFormat::Multiple),
            ),
            labelled("DSCR:", format_ratio(r.dscr, RatioFormat::Multiple)),
        ],
    );

    w.section(
        "3. Internal Credit View",
        &[
            format!("Score (0-20): {}", metrics.score),
            format!("Risk bucket:  {}", metrics.rating_bucket),
        ],
    );
    w.wrapped(
        &format!("Interpretation: {}", metrics.rating_bucket.interpretation()),
        Face::Regular,
        10.0,
    );

    if let Some(memo) = memo.filter(|m| !m.trim().is_empty()) {
        w.gap(10.0);
        w.text(
            "4. Analyst-style Credit Memo (LLM-generated)",
            Face::Bold,
            12.0,
            18.0,
        );
        for paragraph in memo.lines() {
            if paragraph.trim().is_empty() {
                w.gap(6.0);
            } else {
                w.wrapped(paragraph, Face::Regular, 10.0);
            }
        }
    }

    w.gap(10.0);
    w.wrapped(FOOTER, Face::Italic, 8.0);

    w.finish()
}
