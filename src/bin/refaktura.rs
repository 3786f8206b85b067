//! Re-issue invoices from JSON fragment-stream files.
//!
//! Each input file holds a JSON array of rows, each row an array of text
//! fragments. The parameter set of each document is written as JSON, either
//! to `<output-dir>/<stem>.json` or as one object on stdout keyed by stem.
//! Inputs whose stems collide are rejected before any work starts.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing::{Level, debug, error, info};
use tracing_subscriber::EnvFilter;

use refaktura::core::FragmentStream;
use refaktura::reissue::{Batch, Document, FailurePolicy, ParameterSet, ReissueConfig, Reissuer};

/// Re-issue fixed-layout invoices with reconciled VAT totals
#[derive(Parser)]
#[command(name = "refaktura")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to a JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Fragment-stream JSON files
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Write one parameter file per document into this directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Number of worker threads
    #[arg(short = 'j', long, default_value = "1")]
    jobs: usize,

    /// Stop at the first document that fails
    #[arg(long)]
    abort_on_error: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str())),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => ReissueConfig::from_file(path)?,
        None => ReissueConfig::default(),
    };

    let documents = load_documents(&cli.inputs)?;
    info!(documents = documents.len(), jobs = cli.jobs, "loaded inputs");

    let policy = if cli.abort_on_error {
        FailurePolicy::Abort
    } else {
        FailurePolicy::Skip
    };
    let batch = Batch::new(Reissuer::from_config(&config), policy);
    let report = batch.run_parallel(&documents, cli.jobs)?;

    let outputs: BTreeMap<&str, &ParameterSet> = report
        .reissued
        .iter()
        .map(|(name, reissued)| (name.as_str(), &reissued.parameters))
        .collect();

    match &cli.output_dir {
        Some(dir) => {
            fs::create_dir_all(dir)
                .with_context(|| format!("creating output directory {}", dir.display()))?;
            for (name, parameters) in &outputs {
                let path = dir.join(format!("{name}.json"));
                fs::write(&path, serde_json::to_string_pretty(parameters)?)
                    .with_context(|| format!("writing {}", path.display()))?;
                debug!("wrote {}", path.display());
            }
        }
        None => println!("{}", serde_json::to_string_pretty(&outputs)?),
    }

    for (name, e) in &report.failed {
        error!(document = %name, "{e}");
    }
    if !report.failed.is_empty() {
        anyhow::bail!(
            "{} of {} documents failed",
            report.failed.len(),
            report.total()
        );
    }
    Ok(())
}

/// Load every input; two inputs with the same file stem would write the same
/// output, so they are rejected.
fn load_documents(paths: &[PathBuf]) -> anyhow::Result<Vec<Document>> {
    let mut seen: BTreeMap<String, &Path> = BTreeMap::new();
    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        let document = load_document(path)?;
        if let Some(first) = seen.insert(document.name.clone(), path) {
            anyhow::bail!(
                "inputs {} and {} share the document name {:?}",
                first.display(),
                path.display(),
                document.name
            );
        }
        documents.push(document);
    }
    Ok(documents)
}

fn load_document(path: &Path) -> anyhow::Result<Document> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let stream: FragmentStream = serde_json::from_str(&content)
        .with_context(|| format!("parsing fragment stream {}", path.display()))?;
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("invoice");
    Ok(Document::new(name, stream))
}
