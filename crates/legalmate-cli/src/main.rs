mod config;
mod display;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::builder::RangedU64ValueParser;
use clap::{Parser, Subcommand, ValueEnum};
use legalmate_ai::{EntityAnalyzer, Summarizer};
use legalmate_core::normalize;
use legalmate_store::{DocumentId, DocumentStore, NewDocument};
use tracing_subscriber::EnvFilter;

use config::Settings;

/// Sample inputs for `probe`.
const ENTITY_SAMPLE: &str = "This agreement between Google LLC (123 Main St) and Acme Corp, \
    effective January 2025, shall be governed by California law.";
const SUMMARY_SAMPLE: &str = "The licensor grants a non-exclusive, worldwide license to use the \
    software. Termination occurs upon 30 days notice. Liability is capped at $1M.";

#[derive(Parser)]
#[command(name = "legalmate", version, about = "Legal document analysis")]
struct Cli {
    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyse a PDF or DOCX file.
    Analyze {
        file: PathBuf,
        /// Also extract structured clauses with Document AI.
        #[arg(long)]
        clauses: bool,
        /// Print JSON instead of a card.
        #[arg(long)]
        json: bool,
        /// Do not keep the result in the store.
        #[arg(long)]
        no_store: bool,
    },
    /// List stored analyses, oldest first.
    List {
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long, default_value_t = 10, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
        limit: usize,
    },
    /// Show one stored analysis.
    Show {
        id: DocumentId,
        #[arg(long)]
        json: bool,
    },
    /// Write the stored original file of an analysis.
    Download {
        id: DocumentId,
        /// Destination; defaults to the original filename.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Delete a stored analysis and its file.
    Delete { id: DocumentId },
    /// Run one analyser against a built-in sample.
    Probe { target: ProbeTarget },
}

#[derive(Clone, Copy, ValueEnum)]
enum ProbeTarget {
    Entities,
    Summary,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!("legalmate v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let settings = &cli.settings;

    match cli.command {
        Command::Analyze {
            file,
            clauses,
            json,
            no_store,
        } => analyze(settings, &file, clauses, json, no_store).await,
        Command::List { page, limit } => {
            let store = settings.open_store().await?;
            let page = store.list(page, limit).await?;
            display::print_page(&page);
            Ok(())
        }
        Command::Show { id, json } => {
            let store = settings.open_store().await?;
            let record = store.get(id).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                display::print_record_card(&record);
            }
            Ok(())
        }
        Command::Download { id, output } => {
            let store = settings.open_store().await?;
            let record = store.get(id).await?;
            let bytes = store.source(id).await?;
            let output = output.unwrap_or_else(|| PathBuf::from(&record.filename));
            tokio::fs::write(&output, bytes)
                .await
                .with_context(|| format!("writing {}", output.display()))?;
            println!("Wrote {}", output.display());
            Ok(())
        }
        Command::Delete { id } => {
            let store = settings.open_store().await?;
            store.delete(id).await?;
            println!("Deleted {id}");
            Ok(())
        }
        Command::Probe { target } => probe(settings, target).await,
    }
}

async fn analyze(
    settings: &Settings,
    file: &Path,
    clauses: bool,
    json: bool,
    no_store: bool,
) -> anyhow::Result<()> {
    let services = settings.services()?;
    let pipeline = services.pipeline(settings.pipeline_config(), clauses)?;
    let result = pipeline
        .analyze_file(file)
        .await
        .with_context(|| format!("analysing {}", file.display()))?;

    let filename = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string());

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        display::print_analysis_card(&filename, &result);
    }

    if !no_store {
        let source = tokio::fs::read(file)
            .await
            .with_context(|| format!("reading {}", file.display()))?;
        let store = settings.open_store().await?;
        let id = store
            .insert(NewDocument::now(filename, result).with_source(source))
            .await?;
        eprintln!("Stored as {id}");
    }
    Ok(())
}

async fn probe(settings: &Settings, target: ProbeTarget) -> anyhow::Result<()> {
    let services = settings.services()?;
    let timeout = settings.pipeline_config().call_timeout;
    match target {
        ProbeTarget::Entities => {
            let analyzer = EntityAnalyzer::new(services.entities.clone()).with_timeout(timeout);
            let entities = analyzer.analyze(&normalize(ENTITY_SAMPLE)).await;
            println!("{}", serde_json::to_string_pretty(&entities)?);
        }
        ProbeTarget::Summary => {
            let config = settings.pipeline_config();
            let summarizer = Summarizer::new(services.summary.clone())
                .with_params(config.summary)
                .with_retry(config.retry)
                .with_timeout(timeout);
            println!("{}", summarizer.summarize(&normalize(SUMMARY_SAMPLE)).await);
        }
    }
    Ok(())
}
