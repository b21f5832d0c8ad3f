use anyhow::{bail, Result};
use clap::Parser;
use codescope::analyzer::analyze_project;
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "codescope")]
#[command(about = "Distill a source tree into prompt-ready context", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the project root to analyze
    path: PathBuf,

    /// Emit the structured analysis record as JSON instead of the text summary
    #[arg(long)]
    json: bool,

    /// Suppress the status line on stderr
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // The pipeline assumes a valid root; validate before invoking it
    if !cli.path.is_dir() {
        bail!("{} is not a directory", cli.path.display());
    }

    let analysis = analyze_project(&cli.path)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    if !cli.quiet {
        eprintln!(
            "{} {} ({} files, {} lines)",
            "Analyzed".bold().green(),
            analysis.name,
            analysis.total_files,
            analysis.total_lines
        );
    }
    println!("{}", analysis.summary);

    Ok(())
}
