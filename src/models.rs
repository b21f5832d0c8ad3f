use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Programming language assigned to a scanned file.
///
/// The derived `Ord` gives language tallies a stable iteration order, which
/// keeps repeated analysis runs over the same tree byte-identical. Callers
/// must not rely on which language wins an exact tie for primary language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Language {
    Python,
    JavaScript,
    TypeScript,
    Java,
    Go,
    Rust,
    Cpp,
    C,
    CSharp,
    Ruby,
    Php,
    Swift,
    Kotlin,
    Scala,
    Dart,
    Lua,
    Shell,
    Html,
    Css,
    Sql,
    Other,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Language::Python => "Python",
            Language::JavaScript => "JavaScript",
            Language::TypeScript => "TypeScript",
            Language::Java => "Java",
            Language::Go => "Go",
            Language::Rust => "Rust",
            Language::Cpp => "C++",
            Language::C => "C",
            Language::CSharp => "C#",
            Language::Ruby => "Ruby",
            Language::Php => "PHP",
            Language::Swift => "Swift",
            Language::Kotlin => "Kotlin",
            Language::Scala => "Scala",
            Language::Dart => "Dart",
            Language::Lua => "Lua",
            Language::Shell => "Shell",
            Language::Html => "HTML",
            Language::Css => "CSS",
            Language::Sql => "SQL",
            Language::Other => "Other",
        };
        write!(f, "{name}")
    }
}

/// Kind of project inferred from marker files and manifest content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProjectType {
    WebFrontend,
    WebBackend,
    Fullstack,
    Mobile,
    Cli,
    Library,
    ApiService,
    DataScience,
    DevOps,
    Game,
    Embedded,
    Other,
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProjectType::WebFrontend => "Web Frontend",
            ProjectType::WebBackend => "Web Backend",
            ProjectType::Fullstack => "Full-Stack Web",
            ProjectType::Mobile => "Mobile App",
            ProjectType::Cli => "CLI Tool",
            ProjectType::Library => "Library/Package",
            ProjectType::ApiService => "API Service",
            ProjectType::DataScience => "Data Science",
            ProjectType::DevOps => "DevOps/Infrastructure",
            ProjectType::Game => "Game",
            ProjectType::Embedded => "Embedded/IoT",
            ProjectType::Other => "Other",
        };
        write!(f, "{name}")
    }
}

/// One surviving file from the tree scan.
///
/// `relative_path` is the stable identity key throughout the pipeline; two
/// records refer to the same file iff their relative paths are equal.
/// `line_count` and `size_bytes` are computed once at scan time and never
/// change afterward. The classifier fills in `language` in place; everything
/// else is read-only after the scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    /// Absolute path on disk
    pub path: PathBuf,
    /// Path relative to the project root, forward-slash separated
    pub relative_path: String,
    /// Lowercase extension without the leading dot; empty if none
    pub extension: String,
    /// Detected language; None until the classifier runs or if unrecognized
    pub language: Option<Language>,
    pub line_count: usize,
    pub size_bytes: u64,
}

/// Bounded excerpt of a file selected for inclusion in the summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeSnippet {
    pub file_path: String,
    pub language: Language,
    pub content: String,
    pub description: String,
}

/// Aggregate result of one analysis run.
///
/// Constructed once by the summarizer after all sub-results are available;
/// immutable thereafter. `total_files` always equals `files.len()` and
/// `total_lines` the sum of per-file line counts. `snippets` holds config
/// snippets followed by code snippets, in that order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectAnalysis {
    /// Resolved project root
    pub root_path: PathBuf,
    /// Display name (base name of the root directory)
    pub name: String,
    /// Scanned files in sorted relative-path order
    pub files: Vec<FileRecord>,
    /// Language -> classified file count
    pub languages: BTreeMap<Language, usize>,
    /// Language with the highest file count; None iff `languages` is empty
    pub primary_language: Option<Language>,
    /// Detected project types, sorted by display name
    pub project_types: Vec<ProjectType>,
    /// Detected framework names, first-seen order, deduplicated
    pub frameworks: Vec<String>,
    /// Dependency names, deduplicated and capped at 50
    pub dependencies: Vec<String>,
    /// README excerpt, at most 3000 characters; empty if no README
    pub readme_content: String,
    /// Config snippets followed by code snippets
    pub snippets: Vec<CodeSnippet>,
    pub total_files: usize,
    pub total_lines: usize,
    /// Rendered text summary for downstream generation
    pub summary: String,
}
