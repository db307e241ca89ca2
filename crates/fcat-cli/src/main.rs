//! fcat - Font Catalog Metadata Tool

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use fcat_meta::{Pipeline, PipelineConfig, RawFontBuffer};
use fcat_store::{SweepMode, UploadHandler};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "fcat", version, about = "Extract and manage font catalog metadata")]
struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Pipeline configuration (JSON)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the metadata record of each font as JSON
    Inspect {
        #[arg(required = true, value_name = "FILES")]
        files: Vec<PathBuf>,

        /// One record per line instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },

    /// Store fonts and their metadata in a library directory
    Ingest {
        #[arg(required = true, value_name = "FILES")]
        files: Vec<PathBuf>,

        #[arg(long, value_name = "DIR")]
        library: PathBuf,
    },

    /// Re-process library fonts whose records need repair
    Sweep {
        #[arg(long, value_name = "DIR")]
        library: PathBuf,

        /// Re-process every font, not only those with warnings or stale records
        #[arg(long)]
        all: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let pipeline = Pipeline::new(load_config(cli.config.as_deref())?);
    match cli.command {
        Command::Inspect { files, compact } => inspect(&pipeline, &files, compact),
        Command::Ingest { files, library } => ingest(pipeline, &files, &library),
        Command::Sweep { library, all } => sweep(pipeline, &library, all),
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    let Some(path) = path else {
        return Ok(PipelineConfig::default());
    };
    let json = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    PipelineConfig::from_json(&json).with_context(|| format!("loading config {}", path.display()))
}

fn upload_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn read_upload(path: &Path) -> Result<RawFontBuffer> {
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(RawFontBuffer::from_bytes(data, upload_name(path)))
}

fn inspect(pipeline: &Pipeline, files: &[PathBuf], compact: bool) -> Result<()> {
    let buffers = files
        .iter()
        .map(|path| read_upload(path))
        .collect::<Result<Vec<_>>>()?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut rejected = 0;
    for (buffer, result) in buffers.iter().zip(pipeline.process_batch(&buffers)) {
        match result {
            Ok(record) => {
                if compact {
                    serde_json::to_writer(&mut out, &record)?;
                } else {
                    serde_json::to_writer_pretty(&mut out, &record)?;
                }
                writeln!(out)?;
            }
            Err(e) => {
                tracing::error!("{}: {}", buffer.filename(), e);
                rejected += 1;
            }
        }
    }

    if rejected > 0 {
        bail!("{rejected} of {} files rejected", files.len());
    }
    Ok(())
}

fn ingest(pipeline: Pipeline, files: &[PathBuf], library: &Path) -> Result<()> {
    let handler = UploadHandler::open_library(library, pipeline)
        .with_context(|| format!("opening library {}", library.display()))?;

    let mut rejected = 0;
    for path in files {
        let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        match handler.ingest(&upload_name(path), data) {
            Ok(ingested) => println!(
                "{}\t{} {}\t{} warnings",
                ingested.id,
                ingested.record.family,
                ingested.record.style,
                ingested.record.warnings.len()
            ),
            Err(e) => {
                tracing::error!("{}: {}", path.display(), e);
                rejected += 1;
            }
        }
    }

    if rejected > 0 {
        bail!("{rejected} of {} files rejected", files.len());
    }
    Ok(())
}

fn sweep(pipeline: Pipeline, library: &Path, all: bool) -> Result<()> {
    let handler = UploadHandler::open_library(library, pipeline)
        .with_context(|| format!("opening library {}", library.display()))?;
    let mode = if all { SweepMode::All } else { SweepMode::NeedsRepair };

    let report = handler.sweep(mode)?;
    println!(
        "{} re-processed, {} skipped, {} failed",
        report.reprocessed.len(),
        report.skipped.len(),
        report.failed.len()
    );
    for (id, reason) in &report.failed {
        println!("failed\t{id}\t{reason}");
    }
    Ok(())
}
