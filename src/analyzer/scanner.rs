//! Scan a project directory tree, respecting the root .gitignore.

use std::fs;
use std::path::Path;

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use tracing::debug;
use walkdir::WalkDir;

use crate::models::FileRecord;

/// Directories never descended into, regardless of .gitignore
pub const ALWAYS_SKIP_DIRS: &[&str] = &[
    ".git",
    ".hg",
    ".svn",
    "node_modules",
    "__pycache__",
    ".tox",
    ".mypy_cache",
    ".pytest_cache",
    ".ruff_cache",
    "venv",
    ".venv",
    "env",
    ".env",
    "dist",
    "build",
    ".next",
    ".nuxt",
    "target",
    ".gradle",
    ".idea",
    ".vscode",
    "vendor",
    "Pods",
    ".eggs",
];

/// Binary / non-text extensions to skip (lowercase, without the dot)
pub const BINARY_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "bmp", "ico", "svg", "webp", "mp3", "mp4", "avi", "mov", "wav",
    "flac", "zip", "tar", "gz", "bz2", "rar", "7z", "exe", "dll", "so", "dylib", "bin", "pdf",
    "doc", "docx", "xls", "xlsx", "ppt", "pptx", "woff", "woff2", "ttf", "eot", "otf", "pyc",
    "pyo", "class", "o", "obj", "db", "sqlite", "sqlite3", "lock",
];

/// Files larger than this are skipped outright
pub const MAX_FILE_SIZE: u64 = 512 * 1024;

/// Load the root-level .gitignore if present.
///
/// Only the root ignore file is consulted; nested ignore files are not
/// merged. A malformed file degrades to "no patterns" rather than failing.
fn load_gitignore(root: &Path) -> Option<Gitignore> {
    let path = root.join(".gitignore");
    if !path.exists() {
        return None;
    }
    let mut builder = GitignoreBuilder::new(root);
    let _ = builder.add(&path);
    builder.build().ok()
}

fn should_skip_dir(name: &str) -> bool {
    name.starts_with('.') || name.ends_with(".egg-info") || ALWAYS_SKIP_DIRS.contains(&name)
}

/// Walk the project tree and return records for every text source file.
///
/// Exclusion rules, first match wins: hidden or always-skip directory
/// components, binary extension, root .gitignore match, oversized or empty
/// file. Hidden files themselves are not excluded, only hidden directories.
/// Any per-file read failure silently skips that file.
///
/// Records come back sorted by relative path, a deterministic order that
/// size-capped selections downstream rely on.
pub fn scan_project(root: &Path) -> Vec<FileRecord> {
    let gitignore = load_gitignore(root);
    let mut records: Vec<FileRecord> = Vec::new();

    let walker = WalkDir::new(root).into_iter().filter_entry(|entry| {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return true;
        }
        match entry.file_name().to_str() {
            Some(name) => !should_skip_dir(name),
            None => false,
        }
    });

    for entry in walker {
        let Ok(entry) = entry else { continue };
        if entry.depth() == 0 || !entry.file_type().is_file() {
            continue;
        }

        let Ok(rel) = entry.path().strip_prefix(root) else {
            continue;
        };
        let relative_path = rel.to_string_lossy().replace('\\', "/");

        let extension = entry
            .path()
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if BINARY_EXTENSIONS.contains(&extension.as_str()) {
            continue;
        }

        if let Some(gi) = &gitignore {
            if gi.matched_path_or_any_parents(rel, false).is_ignore() {
                continue;
            }
        }

        let Ok(metadata) = entry.metadata() else {
            continue;
        };
        let size_bytes = metadata.len();
        if size_bytes > MAX_FILE_SIZE || size_bytes == 0 {
            continue;
        }

        // Lossy decode so invalid byte sequences never abort the scan
        let Ok(bytes) = fs::read(entry.path()) else {
            continue;
        };
        let content = String::from_utf8_lossy(&bytes);
        let line_count =
            content.matches('\n').count() + usize::from(!content.is_empty() && !content.ends_with('\n'));

        records.push(FileRecord {
            path: entry.into_path(),
            relative_path,
            extension,
            language: None,
            line_count,
            size_bytes,
        });
    }

    records.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    debug!(files = records.len(), "scan complete");
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn rel_paths(records: &[FileRecord]) -> Vec<&str> {
        records.iter().map(|r| r.relative_path.as_str()).collect()
    }

    #[test]
    fn test_scan_basic_tree() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("main.py"), "print('hi')\n").unwrap();
        fs::create_dir(temp.path().join("src")).unwrap();
        fs::write(temp.path().join("src/app.py"), "x = 1\ny = 2\n").unwrap();

        let records = scan_project(temp.path());

        assert_eq!(rel_paths(&records), vec!["main.py", "src/app.py"]);
        assert_eq!(records[0].line_count, 1);
        assert_eq!(records[1].line_count, 2);
    }

    #[test]
    fn test_skips_hidden_and_skip_directories() {
        let temp = TempDir::new().unwrap();
        for dir in [".git", "node_modules", "target", "my.egg-info"] {
            fs::create_dir(temp.path().join(dir)).unwrap();
            fs::write(temp.path().join(dir).join("buried.py"), "x = 1\n").unwrap();
        }
        fs::write(temp.path().join("kept.py"), "x = 1\n").unwrap();

        let records = scan_project(temp.path());

        assert_eq!(rel_paths(&records), vec!["kept.py"]);
    }

    #[test]
    fn test_hidden_files_are_kept() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".eslintrc.json"), "{}\n").unwrap();

        let records = scan_project(temp.path());

        assert_eq!(rel_paths(&records), vec![".eslintrc.json"]);
    }

    #[test]
    fn test_skips_binary_extensions() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("logo.PNG"), [0u8, 1, 2]).unwrap();
        fs::write(temp.path().join("deps.lock"), "locked\n").unwrap();
        fs::write(temp.path().join("code.py"), "x = 1\n").unwrap();

        let records = scan_project(temp.path());

        assert_eq!(rel_paths(&records), vec!["code.py"]);
    }

    #[test]
    fn test_respects_root_gitignore() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".gitignore"), "out/\n*.generated.js\n").unwrap();
        fs::create_dir(temp.path().join("out")).unwrap();
        fs::write(temp.path().join("out/bundle.js"), "var x;\n").unwrap();
        fs::write(temp.path().join("api.generated.js"), "var y;\n").unwrap();
        fs::write(temp.path().join("index.js"), "var z;\n").unwrap();

        let records = scan_project(temp.path());

        // The .gitignore itself survives: it is a hidden file, not a directory
        assert_eq!(rel_paths(&records), vec![".gitignore", "index.js"]);
    }

    #[test]
    fn test_skips_empty_and_oversized_files() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("empty.py"), "").unwrap();
        fs::write(temp.path().join("huge.py"), "x".repeat(MAX_FILE_SIZE as usize + 1)).unwrap();
        fs::write(temp.path().join("ok.py"), "x = 1\n").unwrap();

        let records = scan_project(temp.path());

        assert_eq!(rel_paths(&records), vec!["ok.py"]);
    }

    #[test]
    fn test_line_count_without_trailing_newline() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.py"), "one\ntwo\nthree").unwrap();
        fs::write(temp.path().join("b.py"), "one\ntwo\nthree\n").unwrap();

        let records = scan_project(temp.path());

        assert_eq!(records[0].line_count, 3);
        assert_eq!(records[1].line_count, 3);
    }

    #[test]
    fn test_extension_is_lowercased() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("Main.PY"), "x = 1\n").unwrap();

        let records = scan_project(temp.path());

        assert_eq!(records[0].extension, "py");
    }

    #[test]
    fn test_invalid_utf8_is_decoded_lossily() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("weird.py"), b"line one\n\xff\xfe broken\n").unwrap();

        let records = scan_project(temp.path());

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].line_count, 2);
    }
}
