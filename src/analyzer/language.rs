//! Language classification and project-type / framework detection.
//!
//! All detection tables are plain data so that adding a language or
//! framework is an additive edit, not a new code path.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fs;
use std::path::Path;

use crate::models::{FileRecord, Language, ProjectType};

/// Extension (lowercase, no dot) -> language
const EXTENSION_MAP: &[(&str, Language)] = &[
    ("py", Language::Python),
    ("pyw", Language::Python),
    ("pyi", Language::Python),
    ("js", Language::JavaScript),
    ("mjs", Language::JavaScript),
    ("cjs", Language::JavaScript),
    ("jsx", Language::JavaScript),
    ("ts", Language::TypeScript),
    ("tsx", Language::TypeScript),
    ("java", Language::Java),
    ("go", Language::Go),
    ("rs", Language::Rust),
    ("cpp", Language::Cpp),
    ("cc", Language::Cpp),
    ("cxx", Language::Cpp),
    ("hpp", Language::Cpp),
    ("h", Language::C),
    ("c", Language::C),
    ("cs", Language::CSharp),
    ("rb", Language::Ruby),
    ("php", Language::Php),
    ("swift", Language::Swift),
    ("kt", Language::Kotlin),
    ("kts", Language::Kotlin),
    ("scala", Language::Scala),
    ("dart", Language::Dart),
    ("lua", Language::Lua),
    ("sh", Language::Shell),
    ("bash", Language::Shell),
    ("zsh", Language::Shell),
    ("html", Language::Html),
    ("htm", Language::Html),
    ("css", Language::Css),
    ("scss", Language::Css),
    ("less", Language::Css),
    ("sql", Language::Sql),
];

/// Marker file name -> (optional project type, framework names).
///
/// The dependency manifests themselves carry no tag here; the content
/// passes below decide what they imply.
const MARKER_FILES: &[(&str, Option<ProjectType>, &[&str])] = &[
    ("package.json", None, &[]),
    ("requirements.txt", None, &[]),
    ("pyproject.toml", None, &[]),
    ("setup.py", None, &[]),
    ("Cargo.toml", None, &["Rust/Cargo"]),
    ("go.mod", None, &["Go Modules"]),
    ("pom.xml", None, &["Maven"]),
    ("build.gradle", None, &["Gradle"]),
    ("Gemfile", None, &["Ruby/Bundler"]),
    ("composer.json", None, &["PHP/Composer"]),
    ("Dockerfile", Some(ProjectType::DevOps), &["Docker"]),
    ("docker-compose.yml", Some(ProjectType::DevOps), &["Docker Compose"]),
    ("docker-compose.yaml", Some(ProjectType::DevOps), &["Docker Compose"]),
    ("Makefile", None, &["Make"]),
    ("CMakeLists.txt", None, &["CMake"]),
    ("terraform.tf", Some(ProjectType::DevOps), &["Terraform"]),
    ("serverless.yml", Some(ProjectType::ApiService), &["Serverless Framework"]),
    ("Podfile", Some(ProjectType::Mobile), &["CocoaPods"]),
    ("pubspec.yaml", Some(ProjectType::Mobile), &["Flutter"]),
];

/// package.json keyword (matched as a quoted key) -> (project type, display name)
const PACKAGE_JSON_FRAMEWORKS: &[(&str, ProjectType, &str)] = &[
    ("react", ProjectType::WebFrontend, "React"),
    ("next", ProjectType::Fullstack, "Next.js"),
    ("vue", ProjectType::WebFrontend, "Vue.js"),
    ("nuxt", ProjectType::Fullstack, "Nuxt.js"),
    ("angular", ProjectType::WebFrontend, "Angular"),
    ("svelte", ProjectType::WebFrontend, "Svelte"),
    ("express", ProjectType::WebBackend, "Express.js"),
    ("fastify", ProjectType::WebBackend, "Fastify"),
    ("nestjs", ProjectType::WebBackend, "NestJS"),
    ("electron", ProjectType::Other, "Electron"),
    ("react-native", ProjectType::Mobile, "React Native"),
    ("expo", ProjectType::Mobile, "Expo"),
];

/// Python manifest keyword (bare substring) -> (project type, display name)
const PYTHON_FRAMEWORKS: &[(&str, ProjectType, &str)] = &[
    ("django", ProjectType::WebBackend, "Django"),
    ("flask", ProjectType::WebBackend, "Flask"),
    ("fastapi", ProjectType::ApiService, "FastAPI"),
    ("starlette", ProjectType::ApiService, "Starlette"),
    ("celery", ProjectType::WebBackend, "Celery"),
    ("pandas", ProjectType::DataScience, "Pandas"),
    ("numpy", ProjectType::DataScience, "NumPy"),
    ("tensorflow", ProjectType::DataScience, "TensorFlow"),
    ("pytorch", ProjectType::DataScience, "PyTorch"),
    ("torch", ProjectType::DataScience, "PyTorch"),
    ("scikit-learn", ProjectType::DataScience, "scikit-learn"),
    ("click", ProjectType::Cli, "Click"),
    ("typer", ProjectType::Cli, "Typer"),
    ("argparse", ProjectType::Cli, "argparse"),
];

/// Manifest files inspected by the Python keyword pass
const PYTHON_DEP_FILES: &[&str] = &["requirements.txt", "pyproject.toml", "setup.py", "Pipfile"];

/// Look up the language for a lowercase extension.
pub fn language_for_extension(extension: &str) -> Option<Language> {
    EXTENSION_MAP
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, lang)| *lang)
}

/// Assign a language to every record in place and tally per-language counts.
///
/// Files with an unrecognized extension keep `language: None` and do not
/// contribute to the tally.
pub fn assign_languages(files: &mut [FileRecord]) -> BTreeMap<Language, usize> {
    let mut counts = BTreeMap::new();
    for file in files.iter_mut() {
        file.language = language_for_extension(&file.extension);
        if let Some(lang) = file.language {
            *counts.entry(lang).or_insert(0) += 1;
        }
    }
    counts
}

/// The language with the highest file count, or None for an empty tally.
pub fn primary_language(counts: &BTreeMap<Language, usize>) -> Option<Language> {
    counts.iter().max_by_key(|(_, count)| **count).map(|(lang, _)| *lang)
}

fn read_lowercase(path: &Path) -> Option<String> {
    fs::read(path)
        .ok()
        .map(|bytes| String::from_utf8_lossy(&bytes).to_lowercase())
}

/// Detect project types and frameworks from marker files and manifests.
///
/// A marker counts as present if it appears among the scanned records or
/// directly on disk at the root (the scanner may have excluded it).
/// Returns types sorted by display name and frameworks deduplicated in
/// first-seen order.
pub fn detect_project_types(
    root: &Path,
    files: &[FileRecord],
) -> (Vec<ProjectType>, Vec<String>) {
    let mut types: BTreeSet<ProjectType> = BTreeSet::new();
    let mut frameworks: Vec<String> = Vec::new();
    let rel_paths: HashSet<&str> = files.iter().map(|f| f.relative_path.as_str()).collect();

    for (marker, ptype, fws) in MARKER_FILES {
        if rel_paths.contains(marker) || root.join(marker).exists() {
            if let Some(t) = ptype {
                types.insert(*t);
            }
            frameworks.extend(fws.iter().map(|fw| (*fw).to_string()));
        }
    }

    // package.json keys signal JS/TS frameworks
    if let Some(content) = read_lowercase(&root.join("package.json")) {
        for (key, ptype, name) in PACKAGE_JSON_FRAMEWORKS {
            if content.contains(&format!("\"{key}\"")) {
                types.insert(*ptype);
                frameworks.push((*name).to_string());
            }
        }
    }

    // Python manifests are scanned for bare keyword mentions
    for dep_file in PYTHON_DEP_FILES {
        if let Some(content) = read_lowercase(&root.join(dep_file)) {
            for (key, ptype, name) in PYTHON_FRAMEWORKS {
                if content.contains(key) {
                    types.insert(*ptype);
                    frameworks.push((*name).to_string());
                }
            }
        }
    }

    let mut seen = HashSet::new();
    frameworks.retain(|fw| seen.insert(fw.clone()));

    let mut types: Vec<ProjectType> = types.into_iter().collect();
    types.sort_by_key(|t| t.to_string());
    (types, frameworks)
}
