//! Presentation of scored credit metrics: console snapshot, HTML pages,
//! PDF report and the memo prompt handed to a language model.

pub mod console;
pub mod format;
pub mod html;
pub mod pdf;
pub mod prompt;

pub use console::render_console;
pub use format::{format_ratio, human_readable, RatioFormat};
pub use html::{error_page, format_memo_html, index_page, report_page};
pub use pdf::{render_pdf, report_filename};
pub use prompt::{memo_prompt, MEMO_SECTIONS, SYSTEM_PROMPT};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("PDF error: {0}")]
    Pdf(String),
}
