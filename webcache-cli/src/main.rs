//! webcache CLI
//!
//! Command-line interface for counted, TTL-cached URL fetching.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use webcache_core::constants::DEFAULT_TTL_SECONDS;
use webcache_core::traits::KeyValueStore;
use webcache_fetcher::{CachedFetcher, FetcherConfig, HttpFetcher};
use webcache_store::{MemoryStore, RedisStore};

/// webcache - counted, TTL-cached URL fetching
#[derive(Parser)]
#[command(name = "webcache")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a URL through the cache
    Fetch {
        /// URL to fetch
        url: String,

        /// Seconds fetched content stays cached
        #[arg(long, default_value_t = DEFAULT_TTL_SECONDS)]
        ttl_seconds: u64,

        /// Redis server URL (in-memory store when omitted)
        #[arg(long, env = "REDIS_URL")]
        redis_url: Option<String>,

        /// Fetch this many times in a row
        #[arg(long, default_value = "1")]
        repeat: u32,

        /// Seconds to wait between repeated fetches
        #[arg(long, default_value = "0")]
        interval_seconds: u64,

        /// Print stats only, not the body
        #[arg(long)]
        no_body: bool,
    },

    /// Show how many times a URL has been fetched
    Count {
        /// URL to look up
        url: String,

        /// Redis server URL (counters only persist across runs in Redis)
        #[arg(long, env = "REDIS_URL")]
        redis_url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "webcache_fetcher=debug,webcache_store=debug,info"
    } else {
        "webcache_fetcher=info,webcache_store=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Fetch {
            url,
            ttl_seconds,
            redis_url,
            repeat,
            interval_seconds,
            no_body,
        } => cmd_fetch(&url, ttl_seconds, redis_url, repeat, interval_seconds, no_body).await,
        Commands::Count { url, redis_url } => cmd_count(&url, redis_url).await,
    }
}

/// Picks the store backend: Redis when a URL is given, in-memory otherwise.
fn open_store(redis_url: Option<String>) -> Result<Arc<dyn KeyValueStore>> {
    match redis_url {
        Some(url) => {
            let store = RedisStore::connect(&url).context("Failed to open Redis store")?;
            println!("   {} redis ({})", "Store:".dimmed(), store.address());
            Ok(Arc::new(store))
        }
        None => {
            println!(
                "   {} in-memory (cache and counters reset every run)",
                "Store:".dimmed()
            );
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

/// Fetch a URL through the cache, once or on a loop
async fn cmd_fetch(
    url: &str,
    ttl_seconds: u64,
    redis_url: Option<String>,
    repeat: u32,
    interval_seconds: u64,
    no_body: bool,
) -> Result<()> {
    println!("{} {}", "🌐 Fetching:".cyan().bold(), url);

    let store = open_store(redis_url)?;
    let config = FetcherConfig::default().with_ttl_seconds(ttl_seconds);
    let cached = CachedFetcher::with_config(store, Arc::new(HttpFetcher::new()), config)
        .context("Invalid fetcher configuration")?;

    println!("   {} {}s\n", "TTL:".dimmed(), ttl_seconds);

    for round in 0..repeat {
        if round > 0 {
            if interval_seconds > 0 {
                tokio::time::sleep(Duration::from_secs(interval_seconds)).await;
            }
            println!("{}", format!("request {}/{}", round + 1, repeat).dimmed());
        }

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
        spinner.set_message("fetching...");
        spinner.enable_steady_tick(Duration::from_millis(80));

        let outcome = cached.fetch_with_stats(url).await;
        spinner.finish_and_clear();

        let outcome = outcome.context("Fetch failed")?;

        let source = if outcome.from_cache {
            "cache".green()
        } else {
            "upstream".yellow()
        };
        println!(
            "{} {} bytes from {} {}",
            "✅".green(),
            outcome.body.len(),
            source,
            format!("(access #{})", outcome.access_count).dimmed()
        );

        if !no_body {
            println!("{}", String::from_utf8_lossy(&outcome.body));
        }
    }

    Ok(())
}

/// Report a URL's access count
async fn cmd_count(url: &str, redis_url: Option<String>) -> Result<()> {
    println!("{} {}", "🔢 Access count for:".cyan().bold(), url);

    let store = open_store(redis_url)?;
    let cached = CachedFetcher::new(store, Arc::new(HttpFetcher::new()));

    let count = cached
        .access_count(url)
        .await
        .context("Failed to read access count")?;

    if count == 0 {
        println!("   {}", "Never fetched through this store.".yellow());
    } else {
        println!("   {} {}", "Count:".green().bold(), count);
    }

    Ok(())
}
