//! Listharvest main entry point
//!
//! Command-line interface for the recipe-driven list crawler.

use anyhow::Context;
use clap::Parser;
use listharvest::crawler::{run_list_crawl, RunOptions};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Listharvest: a recipe-driven paginated list crawler
///
/// Listharvest walks paginated list pages described by a TOML recipe,
/// extracts item links, deduplicates them against persisted state, and
/// resumes incrementally across runs.
#[derive(Parser, Debug)]
#[command(name = "listharvest")]
#[command(version)]
#[command(about = "A recipe-driven paginated list crawler", long_about = None)]
struct Cli {
    /// Path to TOML recipe file
    #[arg(value_name = "RECIPE")]
    recipe: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Print discovered links without saving any state
    #[arg(long)]
    dry_run: bool,

    /// Reprocess list pages even if already seen
    #[arg(long, conflicts_with = "fresh")]
    force: bool,

    /// Discard all previous state and start over
    #[arg(long, conflicts_with = "force")]
    fresh: bool,

    /// Log how many elements each recipe selector matches per page
    #[arg(long)]
    verbose_selectors: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let options = RunOptions {
        dry_run: cli.dry_run,
        force: cli.force,
        fresh: cli.fresh,
        verbose_selectors: cli.verbose_selectors,
    };

    run_list_crawl(&cli.recipe, options)
        .await
        .with_context(|| format!("crawl failed for recipe {}", cli.recipe.display()))?;

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("listharvest=info,warn"),
            1 => EnvFilter::new("listharvest=debug,info"),
            2 => EnvFilter::new("listharvest=trace,debug"),
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
