use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use taxon_scraper::config::load_config_or_default;
use taxon_scraper::logger::{self, ConsoleLogger, LogLevel};
use taxon_scraper::scrapers::collection::list_publications;
use taxon_scraper::scrapers::fetcher::RetrievalContext;
use taxon_scraper::scrapers::pipeline::{extract_collection, Summary};
use taxon_scraper::scrapers::taxa::extract_taxa;

#[derive(Parser)]
#[command(name = "taxon-scraper")]
#[command(about = "List a journal collection and extract genus/species names", long_about = None)]
struct Cli {
    /// Path to a JSON configuration file (defaults to ./config.json when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug messages
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the publications of a collection
    List {
        /// Collection address, e.g. https://riojournal.com/topical_collection/280/
        collection_url: String,
    },
    /// List a collection and extract taxa from every publication
    Extract {
        collection_url: String,
        /// Write the JSON results here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Extract taxa from a local XML file
    Taxa { path: PathBuf },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };
    logger::init_logger(ConsoleLogger::stderr(level));

    let config = load_config_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::List { collection_url } => {
            let ctx = RetrievalContext::new(config)?;
            let records = list_publications(&ctx, &collection_url).await?;
            write_json(&records, None)?;
        }
        Commands::Extract {
            collection_url,
            output,
        } => {
            let ctx = RetrievalContext::new(config)?;
            let results = extract_collection(&ctx, &collection_url).await?;
            write_json(&results, output.as_deref())?;
            Summary::from_results(&results).log();
            if let Some(path) = output {
                logger::info(&format!("Results saved to: {}", path.display()));
            }
        }
        Commands::Taxa { path } => {
            let xml = fs::read_to_string(&path)?;
            let taxa = extract_taxa(&xml)?;
            write_json(&taxa, None)?;
        }
    }

    logger::flush();
    Ok(())
}

fn write_json<T: Serialize>(
    value: &T,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    match output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(&mut writer, value)?;
            writeln!(writer)?;
            writer.flush()?;
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            serde_json::to_writer_pretty(&mut writer, value)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}
