use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing::info;

use reldist::config::Config;
use reldist::db::VectorStore;
use reldist::output::csv_dump::CsvDumpObserver;
use reldist::output::terminal;
use reldist::pipeline::observer::{NullObserver, RecordObserver};

/// reldist: rank documents against a prompt by weighted term overlap.
///
/// Turns per-document token frequency maps into normalized weight vectors,
/// stores them in SQLite next to document metadata, and scores prompts
/// against them.
#[derive(Parser)]
#[command(name = "reldist", version, about)]
struct Cli {
    /// Show progress bars for long runs
    #[arg(long, global = true)]
    progress: bool,

    /// Write CSV diagnostic dumps to the processed data directory
    #[arg(long, global = true)]
    dump: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database tables
    Init,

    /// Compute and store document vectors from the frequency maps
    Ingest {
        /// Keep existing rows instead of rebuilding the vector tables
        #[arg(long)]
        keep: bool,
    },

    /// Resolve and store metadata for every source document
    UpdateInfo {
        /// Keep existing rows instead of rebuilding the info table
        #[arg(long)]
        keep: bool,
    },

    /// Rank stored documents against a prompt's frequency map
    Prompt {
        /// Prompt frequency map (default: buffer.json under the data root)
        #[arg(long)]
        file: Option<PathBuf>,

        /// Number of results to show (default: RELDIST_TOP_N or 100)
        #[arg(long)]
        top: Option<usize>,

        /// Print the ranking as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Rebuild the global term table from the corpus frequency map
    GlobalTerms {
        /// Corpus frequency map (default: global_word_freq.json under the data root)
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Show database location and table sizes
    Status,
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("reldist=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;
    let store = VectorStore::new(&config.db_path);

    let mut observer: Box<dyn RecordObserver> = if cli.dump {
        Box::new(CsvDumpObserver::new(&config.processed_data_dir))
    } else {
        Box::new(NullObserver)
    };

    match cli.command {
        Commands::Init => {
            info!("Initializing reldist database...");
            let table_count = store.initialize()?;
            println!("Database initialized at: {}", store.path().display());
            println!("Tables: {table_count}");
            println!("\nNext: put frequency maps in {}", config.token_json_dir.display());
            println!("Then run: reldist ingest && reldist update-info");
        }

        Commands::Ingest { keep } => {
            config.require_token_json()?;
            let report = reldist::pipeline::ingest::run(
                &config,
                &store,
                observer.as_mut(),
                !keep,
                cli.progress,
            )?;
            terminal::display_ingest_report(&report);
        }

        Commands::UpdateInfo { keep } => {
            config.require_resources()?;
            let report = reldist::pipeline::resources::run(
                &config,
                &store,
                observer.as_mut(),
                !keep,
                cli.progress,
            )?;
            terminal::display_resource_report(&report);
        }

        Commands::Prompt { file, top, json } => {
            let path = file.unwrap_or_else(|| config.buffer_json_path.clone());
            let query = reldist::vector::frequency::load_frequency_map(&path)
                .with_context(|| format!("Couldn't read prompt map {}", path.display()))?;
            let top_n = top.unwrap_or(config.top_n);

            let matcher = reldist::ranking::QueryMatcher::new(&store, config.query_filter);
            let ranking = matcher.rank(&query, top_n)?;
            if json {
                println!("{}", reldist::ranking::ranking_json(&ranking)?);
            } else {
                terminal::display_ranking(&ranking, top_n);
            }
        }

        Commands::GlobalTerms { file } => {
            let path = file.unwrap_or_else(|| config.global_terms_path.clone());
            let written =
                reldist::pipeline::global_terms::rebuild_from_file(&config, &store, &path)?;
            println!("Global terms written: {}", written.to_string().bold());
            terminal::display_global_terms(&store.top_global_terms(10)?);
        }

        Commands::Status => {
            reldist::status::show(&config, &store)?;
        }
    }

    Ok(())
}
