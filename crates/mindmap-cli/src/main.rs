//! Mindmap CLI - process conversation exports into staged knowledge items.

use clap::Parser;
use mindmap_cli::error::{EXIT_FATAL, EXIT_FILE_FAILURES};
use mindmap_cli::{config, logging, Cli, Formatter};
use mindmap_pipeline::{anthropic_extractor, Pipeline, Scope};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[tokio::main]
async fn main() {
    match run().await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(EXIT_FATAL);
        }
    }
}

async fn run() -> mindmap_cli::Result<i32> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = config::load(&cli)?;
    let formatter = Formatter::new(!cli.no_color);

    let scope = match &cli.file {
        Some(path) => Scope::SingleFile(absolute(path)?),
        None => Scope::All,
    };

    // The credential is only needed when the service will be called
    let extractor = if cli.dry_run {
        None
    } else {
        Some(anthropic_extractor(&config)?)
    };

    let mut pipeline = Pipeline::open(config)?;
    let vault = pipeline.vault_root().to_path_buf();
    info!(
        vault = %vault.display(),
        dry_run = cli.dry_run,
        single_file = cli.file.is_some(),
        "starting run"
    );
    println!("{}", formatter.header(cli.dry_run, &vault));

    let report = match &extractor {
        Some(extractor) => pipeline.run(extractor, &scope).await?,
        None => pipeline.dry_run(&scope)?,
    };

    println!("{}", formatter.format_report(&report, &vault));

    if report.has_failures() {
        warn!(
            run_id = %report.run_id,
            failed = report.failed(),
            "run finished with file failures"
        );
        Ok(EXIT_FILE_FAILURES)
    } else {
        Ok(0)
    }
}

/// Resolve a user-supplied path against the working directory
fn absolute(path: &Path) -> mindmap_cli::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}
