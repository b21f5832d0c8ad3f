//! End-to-end tests for the project analysis pipeline

use codescope::analyzer::analyze_project;
use codescope::models::{Language, ProjectType};
use std::fs;
use tempfile::TempDir;

/// Lay out a small full-stack-ish project with a bit of everything the
/// pipeline looks at: manifests, ignored output, a skip directory, source
/// files at conventional paths.
fn build_fixture() -> TempDir {
    let temp = TempDir::new().expect("Should create temp dir");
    let root = temp.path();

    fs::write(
        root.join("README.md"),
        "# Fixture Service\nA small API used for pipeline tests.\n",
    )
    .expect("Should write README");

    fs::write(
        root.join("package.json"),
        r#"{
  "name": "fixture-service",
  "dependencies": {"express": "^4.18.0", "axios": "^1.0.0"},
  "devDependencies": {"jest": "^29.0.0"}
}"#,
    )
    .expect("Should write package.json");

    fs::write(root.join("requirements.txt"), "fastapi>=0.100\nuvicorn\n")
        .expect("Should write requirements.txt");

    fs::write(root.join(".gitignore"), "generated/\n").expect("Should write .gitignore");
    fs::create_dir(root.join("generated")).expect("Should create generated/");
    fs::write(root.join("generated/api.js"), "var stale;\n").expect("Should write generated file");

    fs::create_dir(root.join("node_modules")).expect("Should create node_modules");
    fs::write(root.join("node_modules/dep.js"), "module.exports = {};\n")
        .expect("Should write vendored file");

    fs::create_dir(root.join("src")).expect("Should create src/");
    fs::write(
        root.join("src/server.py"),
        "import fastapi\nfrom fastapi import FastAPI\n\napp = FastAPI()\n\n\ndef run():\n    pass\n"
            .repeat(4),
    )
    .expect("Should write server.py");
    fs::write(
        root.join("src/util.py"),
        "import os\n\n\ndef helper():\n    return os.name\n".repeat(6),
    )
    .expect("Should write util.py");

    fs::write(root.join("logo.png"), [0x89, 0x50, 0x4e, 0x47]).expect("Should write binary file");

    temp
}

#[test]
fn test_full_pipeline_on_fixture() {
    let temp = build_fixture();
    let analysis = analyze_project(temp.path()).expect("Should analyze fixture");

    // Exclusions: ignored, vendored, and binary files never surface
    let rels: Vec<&str> = analysis
        .files
        .iter()
        .map(|f| f.relative_path.as_str())
        .collect();
    assert!(!rels.contains(&"generated/api.js"));
    assert!(!rels.contains(&"node_modules/dep.js"));
    assert!(!rels.contains(&"logo.png"));
    assert!(rels.contains(&"src/server.py"));

    // Totals always reconcile with the record list
    assert_eq!(analysis.total_files, analysis.files.len());
    assert_eq!(
        analysis.total_lines,
        analysis.files.iter().map(|f| f.line_count).sum::<usize>()
    );

    // Classification: two Python sources dominate
    assert_eq!(analysis.primary_language, Some(Language::Python));
    assert_eq!(analysis.languages.get(&Language::Python), Some(&2));

    // Detection from both manifest passes
    assert!(analysis.frameworks.contains(&"Express.js".to_string()));
    assert!(analysis.frameworks.contains(&"FastAPI".to_string()));
    assert!(analysis.project_types.contains(&ProjectType::WebBackend));
    assert!(analysis.project_types.contains(&ProjectType::ApiService));

    // Dependencies from all three extractors, deduplicated
    for dep in ["express", "axios", "jest", "fastapi", "uvicorn"] {
        assert!(
            analysis.dependencies.contains(&dep.to_string()),
            "missing dependency {dep}"
        );
    }
    assert!(analysis.dependencies.len() <= 50);

    // README excerpt carried through verbatim (it is under the cap)
    assert!(analysis.readme_content.starts_with("# Fixture Service"));

    // Config snippets precede code snippets
    let first_code = analysis
        .snippets
        .iter()
        .position(|s| s.description.starts_with("Source:"));
    let last_config = analysis
        .snippets
        .iter()
        .rposition(|s| s.description.starts_with("Config file:"));
    if let (Some(code), Some(config)) = (first_code, last_config) {
        assert!(config < code);
    }

    // The entry-point bonus puts server.py ahead of util.py
    let code_paths: Vec<&str> = analysis
        .snippets
        .iter()
        .filter(|s| s.description.starts_with("Source:"))
        .map(|s| s.file_path.as_str())
        .collect();
    let server = code_paths.iter().position(|p| *p == "src/server.py");
    let util = code_paths.iter().position(|p| *p == "src/util.py");
    assert!(server.unwrap() < util.unwrap());

    // Rendered summary carries the fixed section order
    let summary = &analysis.summary;
    assert!(summary.starts_with("# Project: "));
    assert!(summary.contains("## README (excerpt)"));
    assert!(summary.contains("## Import statements (sample)"));
    assert!(summary.contains("## Key code snippets"));
    assert!(summary.contains("## File tree"));
    assert!(summary.contains("import fastapi"));
}

#[test]
fn test_pipeline_is_pure_function_of_disk_state() {
    let temp = build_fixture();

    let first = analyze_project(temp.path()).expect("Should analyze");
    let second = analyze_project(temp.path()).expect("Should analyze again");

    assert_eq!(first.summary, second.summary);
    assert_eq!(first.dependencies, second.dependencies);
    assert_eq!(first.frameworks, second.frameworks);
    assert_eq!(first.project_types, second.project_types);
}

#[test]
fn test_json_serialization_round_trip() {
    let temp = build_fixture();
    let analysis = analyze_project(temp.path()).expect("Should analyze");

    let json = serde_json::to_string(&analysis).expect("Should serialize");
    let back: codescope::models::ProjectAnalysis =
        serde_json::from_str(&json).expect("Should deserialize");

    assert_eq!(back.total_files, analysis.total_files);
    assert_eq!(back.primary_language, analysis.primary_language);
    assert_eq!(back.summary, analysis.summary);
}
