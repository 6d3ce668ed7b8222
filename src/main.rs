//! Catalog-Sweep main entry point
//!
//! This is the command-line interface for running paginated marketplace
//! searches and review extractions and exporting the results.

use anyhow::Context;
use catalog_sweep::config::{load_config_with_hash, resolve_token, validate, Config};
use catalog_sweep::export::{ExportFormat, RunSummary};
use catalog_sweep::{
    Country, ReviewRequest, ReviewSort, SearchRequest, SearchSort, Session, SessionOutcome,
};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tokio::signal;
use tracing_subscriber::EnvFilter;

/// Catalog-Sweep: paginated marketplace search aggregation
///
/// Catalog-Sweep requests a fixed number of result pages from the backend,
/// one page at a time with a delay between pages, accumulates the records
/// and exports them as a spreadsheet-compatible file.
#[derive(Parser, Debug)]
#[command(name = "catalog-sweep")]
#[command(version)]
#[command(about = "Paginated marketplace search aggregation", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search products by keyword
    Search(SearchArgs),

    /// Extract the reviews of one product
    Reviews(ReviewArgs),

    /// Validate the configuration and show what a run would do
    Check,
}

#[derive(Args, Debug)]
struct SearchArgs {
    /// Search keywords
    #[arg(long)]
    query: String,

    /// Marketplace country code
    #[arg(long, default_value = "BR")]
    country: String,

    #[arg(long, value_enum, default_value_t = SearchSort::Relevance)]
    sort: SearchSort,

    /// Lower price bound
    #[arg(long)]
    min_price: Option<f64>,

    /// Upper price bound
    #[arg(long)]
    max_price: Option<f64>,

    /// Only products of this brand
    #[arg(long)]
    brand: Option<String>,

    /// Only Prime-eligible products
    #[arg(long)]
    prime_only: bool,

    #[command(flatten)]
    run: RunArgs,
}

#[derive(Args, Debug)]
struct ReviewArgs {
    /// Product ASIN
    #[arg(long)]
    asin: String,

    /// Marketplace country code
    #[arg(long, default_value = "BR")]
    country: String,

    #[arg(long, value_enum, default_value_t = ReviewSort::Recent)]
    sort: ReviewSort,

    #[command(flatten)]
    run: RunArgs,
}

/// Options shared by every run
#[derive(Args, Debug)]
struct RunArgs {
    /// Pages to request (overrides the config)
    #[arg(long)]
    pages: Option<u32>,

    /// Delay between pages in milliseconds (overrides the config)
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Export format (overrides the config)
    #[arg(long, value_enum)]
    format: Option<ExportFormat>,

    /// Write a markdown run report next to the export
    #[arg(long)]
    report: bool,

    /// Bearer token (defaults to the variable named by `token-env`)
    #[arg(long)]
    token: Option<String>,

    /// Validate the request and show what would run without requesting anything
    #[arg(long)]
    dry_run: bool,
}

impl RunArgs {
    fn apply(&self, config: &mut Config) {
        if let Some(pages) = self.pages {
            config.run.pages = pages;
        }
        if let Some(delay_ms) = self.delay_ms {
            config.run.delay_ms = delay_ms;
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }
        if self.report {
            config.output.report = true;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::debug!("Configuration loaded (hash: {})", config_hash);

    match cli.command {
        Command::Check => handle_check(&config),
        Command::Search(args) => {
            args.run.apply(&mut config);
            validate(&config).context("Invalid run options")?;

            let request = SearchRequest::new(args.query, Country::parse(&args.country)?)
                .with_sort(args.sort)
                .with_price_range(args.min_price, args.max_price)
                .with_brand(args.brand)
                .with_prime_only(args.prime_only);
            request.validate()?;

            if args.run.dry_run {
                let title = format!("search \"{}\" ({})", request.query, request.country);
                print_plan(&config, &title);
                return Ok(());
            }

            let session = open_session(config, config_hash, args.run.token)?;
            let today = chrono::Local::now().date_naive();
            let outcome =
                run_with_shutdown(&session, cli.quiet, session.search(request, today)).await?;
            report_outcome(&outcome, "products");
            Ok(())
        }
        Command::Reviews(args) => {
            args.run.apply(&mut config);
            validate(&config).context("Invalid run options")?;

            let request =
                ReviewRequest::new(args.asin, Country::parse(&args.country)?).with_sort(args.sort);
            request.validate()?;

            if args.run.dry_run {
                let title = format!("reviews {} ({})", request.asin, request.country);
                print_plan(&config, &title);
                return Ok(());
            }

            let session = open_session(config, config_hash, args.run.token)?;
            let today = chrono::Local::now().date_naive();
            let outcome =
                run_with_shutdown(&session, cli.quiet, session.reviews(request, today)).await?;
            report_outcome(&outcome, "reviews");
            Ok(())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("catalog_sweep=info,warn"),
            1 => EnvFilter::new("catalog_sweep=debug,info"),
            2 => EnvFilter::new("catalog_sweep=trace,debug"),
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

fn open_session(
    config: Config,
    config_hash: String,
    token: Option<String>,
) -> anyhow::Result<Session> {
    let token = resolve_token(&config.api, token);
    if token.is_none() {
        tracing::warn!("No API token configured, requests will be sent unauthenticated");
    }

    let session = Session::new(config, token)
        .context("Failed to create API client")?
        .with_config_hash(config_hash);
    Ok(session)
}

/// Drives a run to completion while Ctrl-C requests a stop and progress is
/// printed as pages resolve
async fn run_with_shutdown<F, T>(session: &Session, quiet: bool, run: F) -> anyhow::Result<T>
where
    F: std::future::Future<Output = catalog_sweep::Result<T>>,
{
    let stop = session.stop_signal();
    let mut progress = session.subscribe();

    let printer = tokio::spawn(async move {
        while progress.changed().await.is_ok() {
            let current = *progress.borrow_and_update();
            if !quiet && current.current_page > 0 {
                eprintln!("[{}] {}", current.phase, current);
            }
        }
    });

    tokio::pin!(run);
    let result = tokio::select! {
        result = &mut run => result,
        _ = shutdown_signal() => {
            tracing::info!("Shutdown signal received, stopping after the current page");
            stop.stop();
            run.await
        }
    };

    printer.abort();
    Ok(result?)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

/// Handles `check`: validates config and shows what a run would use
fn handle_check(config: &Config) -> anyhow::Result<()> {
    println!("=== Catalog-Sweep Configuration ===\n");

    println!("API:");
    println!("  Base URL: {}", config.api.base_url);
    println!("  Search path: {}", config.api.search_path);
    println!("  Reviews path: {}", config.api.reviews_path);
    match &config.api.token_env {
        Some(name) => {
            let present = resolve_token(&config.api, None).is_some();
            println!(
                "  Token env: {} ({})",
                name,
                if present { "set" } else { "not set" }
            );
        }
        None => println!("  Token env: none"),
    }
    println!(
        "  Timeouts: {}s total, {}s connect",
        config.api.timeout_secs, config.api.connect_timeout_secs
    );

    println!("\nUser Agent:");
    println!("  {}/{}", config.user_agent.name, config.user_agent.version);

    println!("\nRun:");
    println!("  Pages: {}", config.run.pages);
    println!("  Delay: {}ms", config.run.delay_ms);

    println!("\nOutput:");
    println!("  Directory: {}", config.output.directory);
    println!("  Format: {}", config.output.format.extension());
    println!("  Report: {}", if config.output.report { "yes" } else { "no" });

    println!("\n✓ Configuration is valid");

    Ok(())
}

fn print_plan(config: &Config, title: &str) {
    println!("=== Catalog-Sweep Dry Run ===\n");
    println!("Run: {}", title);
    println!(
        "Would request {} pages from {}{} with {}ms between pages",
        config.run.pages,
        config.api.base_url.trim_end_matches('/'),
        if title.starts_with("reviews") {
            &config.api.reviews_path
        } else {
            &config.api.search_path
        },
        config.run.delay_ms
    );
    println!(
        "Export: {} file in {}",
        config.output.format.extension(),
        config.output.directory
    );
    println!("\n✓ Request is valid");
}

fn report_outcome<T>(outcome: &SessionOutcome<T>, noun: &str) {
    let summary: &RunSummary = &outcome.summary;

    println!();
    println!("=== {} ===", summary.title);
    println!("Status: {}", summary.phase);
    println!(
        "Pages: {}/{} ({:.0}%)",
        summary.pages_completed, summary.total_pages, summary.percent
    );

    if outcome.is_empty() {
        println!("No {} found.", noun);
    } else {
        println!("Found {} {}", summary.record_count, noun);
    }

    if let Some(path) = &outcome.export_path {
        println!("✓ Exported to: {}", path.display());
    }
    if let Some(path) = &outcome.report_path {
        println!("✓ Report written to: {}", path.display());
    }

    if !outcome.errors().is_empty() {
        println!("\nPage errors ({}):", outcome.errors().len());
        for error in outcome.errors() {
            println!("  - {}", error);
        }
    }
}
