//! Verseweave main entry point
//!
//! Command-line interface for the bilingual verse corpus crawler.

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use verseweave::config::{load_config_with_hash, load_documents, Config};
use verseweave::crawler::crawl;
use verseweave::lang::LanguagePair;

/// Verseweave: a bilingual verse corpus crawler
///
/// Fetches bilingual verse tables for every language pair drawn from the
/// configured set, aligns the verse streams, and appends tab-separated
/// sentence pairs to one corpus file per pair and partition.
#[derive(Parser, Debug)]
#[command(name = "verseweave")]
#[command(version)]
#[command(about = "A bilingual verse corpus crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show the work plan without fetching
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config)?;
    } else {
        handle_crawl(config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("verseweave=info,warn"),
            1 => EnvFilter::new("verseweave=debug,info"),
            2 => EnvFilter::new("verseweave=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles --dry-run: validates config and prints the work plan
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    println!("=== Verseweave Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Worker pool size: {}", config.crawler.worker_pool_size);
    println!(
        "  Politeness delay: {}ms",
        config.crawler.politeness_delay_ms
    );
    println!(
        "  Continuation marker: {}",
        config.crawler.continuation_marker
    );

    println!("\nOutput:");
    println!("  Directory: {}", config.output.directory);

    println!("\nLanguages ({}):", config.languages.len());
    for language in &config.languages {
        println!(
            "  - {} (token: {}, cells: td.{}{})",
            language.code,
            language.url_token,
            language.cell_class,
            if language.space_insignificant {
                ", space-insignificant"
            } else {
                ""
            }
        );
    }

    let pairs = LanguagePair::enumerate(&config.languages);
    println!("\nLanguage pairs ({}):", pairs.len());
    for pair in &pairs {
        println!("  - {}", pair);
    }

    let mut total_units = 0usize;
    println!("\nPartitions ({}):", config.partitions.len());
    for partition in &config.partitions {
        let documents = load_documents(Path::new(&partition.documents))
            .with_context(|| format!("failed to load {}", partition.documents))?;
        println!(
            "  - {} ({} documents from {})",
            partition.name,
            documents.len(),
            partition.documents
        );
        total_units += documents.len() * pairs.len();
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would dispatch {} work units", total_units);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    let cancel = CancellationToken::new();

    // Ctrl-C stops dispatch; in-flight units are drained and reported
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, finishing in-flight units");
            signal_token.cancel();
        }
    });

    match crawl(config, cancel).await {
        Ok(report) => {
            report.log_summary();
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
