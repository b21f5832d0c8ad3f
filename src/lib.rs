pub mod analyzer;
pub mod models;

pub use analyzer::analyze_project;
pub use models::{CodeSnippet, FileRecord, Language, ProjectAnalysis, ProjectType};
