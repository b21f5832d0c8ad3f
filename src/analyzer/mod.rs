//! Project analysis pipeline: scan, classify, extract, summarize.
//!
//! Data flows strictly forward: the scanner emits file records, the
//! classifier annotates them, the extractor reads them plus the raw
//! filesystem, and the summarizer renders everything into one bounded text
//! block. No stage calls back into an earlier one.

pub mod extractor;
pub mod language;
pub mod scanner;
pub mod summarizer;

pub use summarizer::analyze_project;
