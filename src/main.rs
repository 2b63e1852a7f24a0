use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use biomuta_ingest::{load_data_with_summary, write_documents, LoaderConfig, OutputFormat};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Convert the BioMuta CSV export into HGVS-keyed documents",
    long_about = None
)]
struct Cli {
    /// Folder containing biomuta-master.csv
    #[arg(long, value_name = "DIR")]
    data_folder: PathBuf,

    /// Optional TOML file overriding loader settings
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output file, omit for stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Jsonl)]
    format: OutputFormat,

    /// Pretty-print JSON array output
    #[arg(long)]
    pretty: bool,

    /// Print the load summary as JSON on stderr when done
    #[arg(long)]
    summary: bool,
}

fn main() -> Result<()> {
    // Logs go to stderr, stdout is reserved for documents
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("biomuta_ingest=info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => LoaderConfig::from_toml_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => LoaderConfig::default(),
    };

    let (documents, summary) =
        load_data_with_summary(&cli.data_folder, &config).with_context(|| {
            format!(
                "Failed to load BioMuta data from {}",
                cli.data_folder.display()
            )
        })?;

    let writer: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let written = write_documents(documents, writer, cli.format, cli.pretty)
        .context("Failed to write documents")?;
    info!(documents = written, "done");

    if cli.summary {
        eprintln!("{}", serde_json::to_string_pretty(&summary)?);
    }

    Ok(())
}
