use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use garimpo_client::{ChromiumRenderer, ReqwestFetcher};
use garimpo_core::models::{MAX_PER_SOURCE_LIMIT, SearchRequest};
use garimpo_core::{Normalizer, SearchConfig, SearchService, TimestampIdSource, standard_extractors};

#[derive(Parser)]
#[command(name = "garimpo", version, about = "Multi-source vehicle listing search")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search all listing sources and print the merged, ranked result set
    Search {
        /// Search query, e.g. "Civic 2018"
        query: String,

        /// City filter forwarded to each source
        #[arg(short, long)]
        location: Option<String>,

        /// Listings requested per source (clamped to [1, 50])
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,

        /// Merged output is capped at this multiple of --limit
        #[arg(long, default_value_t = 3)]
        cap_multiplier: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("garimpo=info".parse()?))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Search {
            query,
            location,
            limit,
            cap_multiplier,
        } => cmd_search(query, location, limit, cap_multiplier).await,
    }
}

async fn cmd_search(
    query: String,
    location: Option<String>,
    limit: usize,
    cap_multiplier: usize,
) -> Result<()> {
    // Boundary-contract clamp; the core assumes a well-formed request.
    let limit = limit.clamp(1, MAX_PER_SOURCE_LIMIT);

    let fetcher = ReqwestFetcher::new().context("failed to create HTTP client")?;
    let renderer = ChromiumRenderer::new();
    let normalizer = Normalizer::new(TimestampIdSource::new());

    let service = SearchService::with_config(
        standard_extractors(fetcher, renderer, normalizer),
        SearchConfig {
            merge_multiplier: cap_multiplier,
        },
    );

    let mut request = SearchRequest::new(query).with_limit(limit);
    if let Some(location) = location {
        request = request.with_location(location);
    }

    tracing::info!(query = %request.query_text, limit, "searching all sources");
    let response = service.search(&request).await;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
