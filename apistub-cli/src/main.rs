//! apistub CLI - Generate API review stubs for Python packages

use apistub_core::{discover_sources, render_plain, Config, DiagnosticSet, StubGenerator};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "apistub")]
#[command(version, about = "Generate API review stubs for Python packages", long_about = None)]
struct Cli {
    /// Package directory (or a single module) to generate the stub for
    path: PathBuf,

    /// Pylint JSON output (`pylint -f json`) to attach as diagnostics
    #[arg(long)]
    pylint_output: Option<PathBuf>,

    /// Package name recorded in the stub (default: directory name)
    #[arg(long)]
    package_name: Option<String>,

    /// Configuration file (TOML)
    #[arg(long, env = "APISTUB_CONFIG")]
    config: Option<PathBuf>,

    /// Write output to this file instead of stdout
    #[arg(long)]
    out: Option<PathBuf>,

    /// Render plain text instead of JSON
    #[arg(long)]
    text: bool,

    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> apistub_core::Result<()> {
    use colored::Colorize;

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let root_name = package_root_name(&cli.path);
    let package_name = cli.package_name.clone().unwrap_or_else(|| root_name.clone());

    let diagnostics = match &cli.pylint_output {
        Some(path) => {
            let output = std::fs::read_to_string(path)
                .map_err(|_| apistub_core::StubError::FileNotFound(path.clone()))?;
            DiagnosticSet::load(&output, &root_name, &config.checker.family)?
        }
        None => DiagnosticSet::default(),
    };
    let diagnostic_count = diagnostics.len();

    let files = discover_sources(&cli.path, &config)?;
    info!(
        package = %package_name,
        files = files.len(),
        diagnostics = diagnostic_count,
        "Loaded package sources"
    );
    let generator = StubGenerator::new(&config, diagnostics);
    let stub = generator.generate(&package_name, &cli.path, &files)?;

    let rendered = if cli.text {
        render_plain(&stub.tokens)
    } else {
        serde_json::to_string_pretty(&stub)?
    };

    match &cli.out {
        Some(out) => {
            std::fs::write(out, rendered)?;
            println!(
                "{} {} ({} files, {} tokens, {}/{} diagnostics attached)",
                "Wrote".green(),
                out.display(),
                files.len(),
                stub.tokens.len(),
                stub.diagnostics.len(),
                diagnostic_count
            );
        }
        None => println!("{}", rendered),
    }

    Ok(())
}

/// Last path component; checker paths are reported relative to its parent
fn package_root_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default()
}
