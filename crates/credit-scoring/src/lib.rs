//! Credit scoring pipeline: statement bundle -> quantities -> ratios -> score.

pub mod engine;
pub mod extractor;
pub mod ratios;
pub mod scorer;

pub use engine::{fetch_bundle, CreditScoringEngine};
pub use extractor::extract_quantities;
pub use ratios::compute_ratios;
pub use scorer::{score_metrics, score_ratios};
