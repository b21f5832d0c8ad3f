//! Run the full pipeline and render the prompt-ready summary.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::analyzer::extractor::{
    extract_config_snippets, extract_dependencies, extract_imports, extract_interesting_snippets,
    extract_readme, MAX_CODE_SNIPPETS,
};
use crate::analyzer::language::{assign_languages, detect_project_types, primary_language};
use crate::analyzer::scanner::scan_project;
use crate::models::ProjectAnalysis;

/// Dependency names kept after deduplication
pub const MAX_DEPENDENCIES: usize = 50;

/// Dependencies shown in the rendered summary
const SUMMARY_DEPENDENCIES: usize = 30;

/// Languages shown in the breakdown line
const SUMMARY_LANGUAGES: usize = 6;

/// Import lines shown in the rendered summary
const SUMMARY_IMPORTS: usize = 40;

/// Files listed in the summary's file tree
const SUMMARY_TREE_FILES: usize = 80;

fn dedup_capped(items: Vec<String>, cap: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .take(cap)
        .collect()
}

/// Run the full analysis pipeline over a project root.
///
/// The root must exist and be a directory; validating that is the caller's
/// job. Per-file failures inside the pipeline are always recovered by
/// skipping the file, so the only error here is failing to resolve the root
/// path itself.
pub fn analyze_project(root: &Path) -> Result<ProjectAnalysis> {
    let root = root
        .canonicalize()
        .with_context(|| format!("Failed to resolve project root: {}", root.display()))?;
    let name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.display().to_string());

    let mut files = scan_project(&root);
    let languages = assign_languages(&mut files);
    let primary = primary_language(&languages);
    let (project_types, frameworks) = detect_project_types(&root, &files);

    let readme_content = extract_readme(&root);
    let dependencies = dedup_capped(extract_dependencies(&root), MAX_DEPENDENCIES);
    let mut snippets = extract_config_snippets(&files);
    snippets.extend(extract_interesting_snippets(&files, MAX_CODE_SNIPPETS));
    let imports = extract_imports(&files);

    let total_files = files.len();
    let total_lines = files.iter().map(|f| f.line_count).sum();
    debug!(total_files, total_lines, "analysis complete");

    let mut analysis = ProjectAnalysis {
        root_path: root,
        name,
        files,
        languages,
        primary_language: primary,
        project_types,
        frameworks,
        dependencies,
        readme_content,
        snippets,
        total_files,
        total_lines,
        summary: String::new(),
    };
    analysis.summary = build_summary(&analysis, &imports);
    Ok(analysis)
}

/// Render the analysis into one bounded text block for downstream
/// generation. Deliberately plain text: the only consumer is a language
/// model, not a renderer.
pub fn build_summary(analysis: &ProjectAnalysis, imports: &[String]) -> String {
    let mut parts: Vec<String> = Vec::new();

    parts.push(format!("# Project: {}", analysis.name));
    parts.push(format!(
        "Total files: {} | Total lines: {}",
        analysis.total_files, analysis.total_lines
    ));

    if !analysis.project_types.is_empty() {
        let types: Vec<String> = analysis.project_types.iter().map(|t| t.to_string()).collect();
        parts.push(format!("Project types: {}", types.join(", ")));
    }

    if let Some(primary) = analysis.primary_language {
        let mut tallies: Vec<_> = analysis.languages.iter().collect();
        tallies.sort_by_key(|(_, count)| std::cmp::Reverse(**count));
        let breakdown: Vec<String> = tallies
            .iter()
            .take(SUMMARY_LANGUAGES)
            .map(|(lang, count)| format!("{lang}: {count}"))
            .collect();
        parts.push(format!("Primary language: {primary}"));
        parts.push(format!("Language breakdown: {}", breakdown.join(", ")));
    }

    if !analysis.frameworks.is_empty() {
        parts.push(format!("Frameworks/Tools: {}", analysis.frameworks.join(", ")));
    }

    if !analysis.dependencies.is_empty() {
        let shown: Vec<&str> = analysis
            .dependencies
            .iter()
            .take(SUMMARY_DEPENDENCIES)
            .map(String::as_str)
            .collect();
        parts.push(format!("Dependencies: {}", shown.join(", ")));
    }

    if !analysis.readme_content.is_empty() {
        parts.push(format!("\n## README (excerpt)\n{}", analysis.readme_content));
    }

    if !imports.is_empty() {
        let shown: Vec<&str> = imports.iter().take(SUMMARY_IMPORTS).map(String::as_str).collect();
        parts.push(format!(
            "\n## Import statements (sample)\n{}",
            shown.join("\n")
        ));
    }

    if !analysis.snippets.is_empty() {
        parts.push("\n## Key code snippets".to_string());
        for snippet in &analysis.snippets {
            parts.push(format!("\n### {}", snippet.file_path));
            parts.push(format!("```{}", snippet.language.to_string().to_lowercase()));
            parts.push(snippet.content.clone());
            parts.push("```".to_string());
        }
    }

    parts.push("\n## File tree".to_string());
    for file in analysis.files.iter().take(SUMMARY_TREE_FILES) {
        parts.push(format!("  {}", file.relative_path));
    }
    if analysis.files.len() > SUMMARY_TREE_FILES {
        parts.push(format!(
            "  ... and {} more files",
            analysis.files.len() - SUMMARY_TREE_FILES
        ));
    }

    parts.join("\n")
}
