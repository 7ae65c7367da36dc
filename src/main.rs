//! Song Vocab CLI - lyrics retrieval and vocabulary extraction
//!
//! The application logic is contained in lib.rs, and this file is responsible
//! for parsing arguments and handling top-level errors.

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use song_vocab::lyrics::LyricsExtractor;
use song_vocab::scraper::{HttpFetcher, PageFetcher};
use song_vocab::search::DuckDuckGo;
use song_vocab::server::{self, AppState, LyricsResponse};
use song_vocab::vocab::VocabularyExtractor;
use song_vocab::{ArtifactStore, Config, SongAgent, VocabularyItem};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "song-vocab")]
#[command(author, version, about = "Find song lyrics and build a vocabulary list", long_about = None)]
struct Cli {
    /// Path to a song-vocab.toml config file
    #[arg(long, global = true, env = "SONG_VOCAB_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Find lyrics for a free-form request and list their vocabulary
    Find {
        /// e.g. "find lyrics for Lemon by Kenshi Yonezu in Japanese"
        #[arg(required = true, num_args = 1..)]
        request: Vec<String>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Fetch one page and show the lyrics extracted from it
    Extract {
        /// URL of a lyrics page
        url: String,
    },
    /// Build a vocabulary list from a local lyrics file
    Vocab {
        /// Text file with lyrics
        file: PathBuf,
    },
    /// Run the HTTP API
    Serve {
        /// Address to listen on, overrides the config file
        #[arg(long)]
        bind: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "song_vocab=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::load()?,
    };

    match cli.command {
        Some(Commands::Find { request, json }) => {
            let agent = build_agent(&config)?;
            let record = agent.process_request(&request.join(" ")).await?;

            if json {
                let response = LyricsResponse::from(&record);
                println!("{}", serde_json::to_string_pretty(&response)?);
                return Ok(());
            }

            let result = &record.result;
            if !result.found {
                println!("{}", result.lyrics.red());
                return Ok(());
            }

            println!(
                "\n=== {} - {} ===\n",
                result.song_title.bold(),
                result.artist.bold()
            );
            println!("{}", result.lyrics);

            if result.has_romanized() {
                println!("\n{}\n", "--- Romanized ---".cyan());
                println!("{}", result.romanized_lyrics);
            }

            print_vocabulary(&record.vocabulary);
            println!("\nSaved to {}", record.artifact_path.display());
            if let Some(path) = &record.romanized_path {
                println!("Romanized saved to {}", path.display());
            }
            println!("Handler ID: {}", record.id);
        }
        Some(Commands::Extract { url }) => {
            let fetcher = HttpFetcher::new(&config.fetch.user_agent)?;
            let page = fetcher.fetch(&url, config.fetch.timeout()).await;
            if !page.success {
                anyhow::bail!(page.error.unwrap_or_else(|| format!("failed to fetch {}", url)));
            }

            let lyrics = LyricsExtractor::default().extract(&page);
            println!("\n=== {} ===\n", page.title);
            if lyrics.is_empty() {
                println!("{}", "No lyrics found on this page.".yellow());
            } else {
                println!("{}", lyrics);
                println!("\n--- Extracted {} characters ---", lyrics.chars().count());
            }
        }
        Some(Commands::Vocab { file }) => {
            let lyrics = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            print_vocabulary(&VocabularyExtractor::default().extract(&lyrics));
        }
        Some(Commands::Serve { bind }) => {
            let bind = bind.unwrap_or_else(|| config.server.bind.clone());
            run_server(&config, &bind).await?;
        }
        None => {
            // Default: run the HTTP API
            run_server(&config, &config.server.bind).await?;
        }
    }

    Ok(())
}

fn build_agent(config: &Config) -> anyhow::Result<SongAgent> {
    let search = DuckDuckGo::new(config.search.endpoint.clone(), &config.fetch.user_agent)?;
    let fetcher = HttpFetcher::new(&config.fetch.user_agent)?;
    Ok(SongAgent::new(
        Arc::new(search),
        Arc::new(fetcher),
        ArtifactStore::new(&config.storage.path),
    )
    .with_max_results(config.search.max_results)
    .with_fetch_timeout(config.fetch.timeout()))
}

async fn run_server(config: &Config, bind: &str) -> anyhow::Result<()> {
    info!("Lyrics directory: {}", config.storage.path.display());
    let state = AppState::new(build_agent(config)?);
    server::serve(state, bind)
        .await
        .with_context(|| format!("server on {} failed", bind))
}

fn print_vocabulary(vocabulary: &[VocabularyItem]) {
    if vocabulary.is_empty() {
        println!("\n{}", "No vocabulary extracted.".yellow());
        return;
    }
    println!("\n{} ({}):", "Vocabulary".green().bold(), vocabulary.len());
    for item in vocabulary {
        match &item.reading {
            Some(reading) => println!(
                "  • {} [{}] ×{} ({})",
                item.term, reading, item.frequency, item.part_of_speech
            ),
            None => println!("  • {} ×{} ({})", item.term, item.frequency, item.part_of_speech),
        }
    }
}
