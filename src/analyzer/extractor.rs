//! Extract the material that anchors the summary: README text, dependency
//! names, config file content, interesting code snippets, and import lines.
//!
//! Every sub-extraction is best-effort: a read failure on any individual
//! file drops that file's contribution and nothing else.

use std::cmp::Reverse;
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::Path;

use regex::Regex;
use tracing::debug;

use crate::models::{CodeSnippet, FileRecord, Language};

/// README candidates, checked in order at the project root
const README_NAMES: &[&str] = &["README.md", "README.rst", "README.txt", "README"];

/// Config file base names worth quoting verbatim
const CONFIG_FILES: &[&str] = &[
    "package.json",
    "tsconfig.json",
    "pyproject.toml",
    "setup.cfg",
    "setup.py",
    "Cargo.toml",
    "go.mod",
    "build.gradle",
    "pom.xml",
    "Gemfile",
    "composer.json",
    "pubspec.yaml",
    ".eslintrc.json",
    "webpack.config.js",
    "vite.config.ts",
    "vite.config.js",
    "next.config.js",
    "next.config.mjs",
];

/// Entry-point base names that earn the large snippet-score bonus
const ENTRY_POINT_NAMES: &[&str] = &[
    "main.py", "app.py", "index.ts", "index.js", "main.go", "main.rs", "server.py", "server.ts",
];

/// Role keywords in a file name worth a one-time snippet-score bonus
const ROLE_KEYWORDS: &[&str] = &[
    "handler", "service", "controller", "router", "model", "schema", "api", "core", "engine",
];

/// Conventional source-root prefixes
const SOURCE_PREFIXES: &[&str] = &["src/", "lib/", "app/", "pkg/", "cmd/"];

pub const MAX_SNIPPET_LINES: usize = 60;
pub const MAX_README_CHARS: usize = 3000;
pub const MAX_CONFIG_CHARS: usize = 2000;
pub const MAX_CODE_SNIPPETS: usize = 8;
pub const MAX_IMPORT_FILES: usize = 20;
pub const MAX_IMPORT_SCAN_LINES: usize = 100;
pub const MAX_IMPORTS: usize = 100;
const IMPORT_COLLECTION_CEILING: usize = 200;

fn read_lossy(path: &Path) -> Option<String> {
    fs::read(path)
        .ok()
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
}

/// Truncate to at most `max` characters, respecting char boundaries.
fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

/// Read up to `max_lines` from a file; empty string on any failure.
fn read_head(path: &Path, max_lines: usize) -> String {
    match read_lossy(path) {
        Some(content) => content.lines().take(max_lines).collect::<Vec<_>>().join("\n"),
        None => String::new(),
    }
}

fn base_name(relative_path: &str) -> &str {
    relative_path.rsplit('/').next().unwrap_or(relative_path)
}

/// Return the first README found at the root, capped at 3000 characters.
pub fn extract_readme(root: &Path) -> String {
    for name in README_NAMES {
        let path = root.join(name);
        if path.exists() {
            if let Some(content) = read_lossy(&path) {
                return truncate_chars(&content, MAX_README_CHARS);
            }
        }
    }
    String::new()
}

fn strip_version_specifier(requirement: &str) -> &str {
    requirement
        .split(['>', '=', '<', '!', '[', ';'])
        .next()
        .unwrap_or("")
        .trim()
}

/// Extract top-level dependency names from the common manifest files.
///
/// The three passes are independent and their results are concatenated;
/// deduplication and the 50-item cap are applied downstream.
pub fn extract_dependencies(root: &Path) -> Vec<String> {
    let mut deps: Vec<String> = Vec::new();

    // package.json: regex out the keys of dependency blocks
    if let Some(content) = read_lossy(&root.join("package.json")) {
        let block_re = Regex::new(r#""(dependencies|devDependencies)"\s*:\s*\{([^}]*)\}"#)
            .expect("Invalid regex pattern");
        let key_re = Regex::new(r#""([^"]+)"\s*:"#).expect("Invalid regex pattern");
        for block in block_re.captures_iter(&content) {
            for key in key_re.captures_iter(&block[2]) {
                deps.push(key[1].to_string());
            }
        }
    }

    // requirements.txt: one name per line, version specifiers stripped
    if let Some(content) = read_lossy(&root.join("requirements.txt")) {
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('-') {
                continue;
            }
            let name = strip_version_specifier(line);
            if !name.is_empty() {
                deps.push(name.to_string());
            }
        }
    }

    // pyproject.toml: line-oriented scan of the dependencies array
    if let Some(content) = read_lossy(&root.join("pyproject.toml")) {
        let opener_re = Regex::new(r"^\s*dependencies\s*=\s*\[").expect("Invalid regex pattern");
        let quoted_re = Regex::new(r#""([^"]+)""#).expect("Invalid regex pattern");
        let mut in_deps = false;
        for line in content.lines() {
            if opener_re.is_match(line) {
                in_deps = true;
                continue;
            }
            if in_deps {
                if line.contains(']') {
                    in_deps = false;
                    continue;
                }
                if let Some(caps) = quoted_re.captures(line) {
                    let name = strip_version_specifier(&caps[1]);
                    if !name.is_empty() {
                        deps.push(name.to_string());
                    }
                }
            }
        }
    }

    debug!(count = deps.len(), "dependency extraction complete");
    deps
}

/// Extract the head of every recognized config file.
///
/// One snippet per distinct base name; when the same config name appears at
/// several paths, the first in scan order wins.
pub fn extract_config_snippets(files: &[FileRecord]) -> Vec<CodeSnippet> {
    let mut snippets: Vec<CodeSnippet> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for file in files {
        let name = base_name(&file.relative_path);
        if !CONFIG_FILES.contains(&name) || !seen.insert(name) {
            continue;
        }
        let content = read_head(&file.path, MAX_SNIPPET_LINES);
        if content.is_empty() {
            continue;
        }
        snippets.push(CodeSnippet {
            file_path: file.relative_path.clone(),
            language: file.language.unwrap_or(Language::Other),
            content: truncate_chars(&content, MAX_CONFIG_CHARS),
            description: format!("Config file: {name}"),
        });
    }
    snippets
}

/// Score a file for "interestingness": higher means a better snippet
/// candidate. Additive bonuses; the role-keyword bonus applies at most once.
pub fn score_file(file: &FileRecord) -> i32 {
    let mut score = 0;

    // Medium-sized files make the most quotable snippets
    if (20..=300).contains(&file.line_count) {
        score += 10;
    } else if file.line_count > 300 {
        score += 3;
    }

    let rel = file.relative_path.to_lowercase();
    if SOURCE_PREFIXES.iter().any(|prefix| rel.starts_with(prefix)) {
        score += 5;
    }

    let name = base_name(&file.relative_path).to_lowercase();
    if ENTRY_POINT_NAMES.contains(&name.as_str()) {
        score += 15;
    }
    if ROLE_KEYWORDS.iter().any(|kw| name.contains(kw)) {
        score += 8;
    }

    score
}

/// Select the most interesting source files and excerpt them.
///
/// Markup, style, and query files never qualify. The sort is stable, so
/// equal scores keep scan order.
pub fn extract_interesting_snippets(files: &[FileRecord], max_snippets: usize) -> Vec<CodeSnippet> {
    let mut candidates: Vec<&FileRecord> = files
        .iter()
        .filter(|f| {
            matches!(
                f.language,
                Some(lang) if !matches!(lang, Language::Html | Language::Css | Language::Sql)
            )
        })
        .collect();
    candidates.sort_by_key(|f| Reverse(score_file(f)));

    let mut snippets: Vec<CodeSnippet> = Vec::new();
    for file in candidates.into_iter().take(max_snippets) {
        let content = read_head(&file.path, MAX_SNIPPET_LINES);
        if content.trim().is_empty() {
            continue;
        }
        snippets.push(CodeSnippet {
            file_path: file.relative_path.clone(),
            language: file.language.unwrap_or(Language::Other),
            content,
            description: format!("Source: {} ({} lines)", file.relative_path, file.line_count),
        });
    }
    snippets
}

fn looks_like_import(line: &str, language: Option<Language>) -> bool {
    line.starts_with("import ")
        || line.starts_with("from ")
        || line.contains("require(")
        || line.starts_with("import (")
        || (line.starts_with('"') && language == Some(Language::Go))
        || line.starts_with("use ")
}

/// Collect unique import/require-style lines across the largest files.
///
/// Scans the first 100 lines of up to 20 files (longest first) and stops
/// visiting further files once more than 200 unique lines are collected.
/// Returns the set sorted lexicographically, capped at 100 entries.
pub fn extract_imports(files: &[FileRecord]) -> Vec<String> {
    let mut imports: BTreeSet<String> = BTreeSet::new();

    let mut sources: Vec<&FileRecord> = files
        .iter()
        .filter(|f| f.language.is_some() && f.line_count > 5)
        .collect();
    sources.sort_by_key(|f| Reverse(f.line_count));

    for file in sources.into_iter().take(MAX_IMPORT_FILES) {
        let Some(content) = read_lossy(&file.path) else {
            continue;
        };
        for line in content.lines().take(MAX_IMPORT_SCAN_LINES) {
            let line = line.trim();
            if looks_like_import(line, file.language) {
                imports.insert(line.to_string());
            }
        }
        if imports.len() > IMPORT_COLLECTION_CEILING {
            break;
        }
    }

    imports.into_iter().take(MAX_IMPORTS).collect()
}
