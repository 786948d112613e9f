//! Bilan CLI binary.
//!
//! Provides a command-line interface to the bilan company dashboard.

mod cmd;
mod data;
mod format;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::{path::PathBuf, process};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bilan")]
#[command(about = "Financial statement metrics and company dashboards", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Output format of report commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable tables
    Text,
    /// Pretty-printed JSON
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// List available metrics
    Metrics {
        /// Filter by category
        #[arg(short, long)]
        category: Option<String>,

        /// Show detailed information
        #[arg(short, long)]
        verbose: bool,
    },

    /// Build the dashboard for a company
    Analyze {
        /// Ticker symbol
        symbol: String,

        /// Evaluation date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        as_of: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// JSON file with metric configuration overrides
        #[arg(long)]
        config: Option<PathBuf>,

        /// Read company data from a JSON file instead of FMP
        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// Compute a single metric for a company
    Score {
        /// Metric key (see `bilan metrics`)
        metric: String,

        /// Ticker symbol
        symbol: String,

        /// Evaluation date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        as_of: Option<String>,

        /// JSON file with metric configuration overrides
        #[arg(long)]
        config: Option<PathBuf>,

        /// Read company data from a JSON file instead of FMP
        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// Classify a value against thresholds
    Classify {
        /// Value to classify
        #[arg(allow_hyphen_values = true)]
        value: f64,

        /// Lower threshold
        #[arg(long, allow_hyphen_values = true)]
        low: f64,

        /// Upper threshold
        #[arg(long, allow_hyphen_values = true)]
        high: f64,

        /// Classification mode (higher, lower, range)
        #[arg(short, long, default_value = "higher")]
        mode: String,
    },

    /// Compound annual growth rate between two values
    Cagr {
        /// Starting value
        #[arg(allow_hyphen_values = true)]
        start: f64,

        /// Ending value
        #[arg(allow_hyphen_values = true)]
        end: f64,

        /// Number of periods between them
        periods: f64,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Metrics { category, verbose } => {
            cmd::metrics::list_metrics(category.as_deref(), verbose)?;
        }
        Commands::Analyze {
            symbol,
            as_of,
            format,
            config,
            input,
        } => {
            cmd::analyze::analyze(
                &symbol,
                as_of.as_deref(),
                format,
                config.as_deref(),
                input.as_deref(),
            )
            .await?;
        }
        Commands::Score {
            metric,
            symbol,
            as_of,
            config,
            input,
        } => {
            cmd::score::show_score(
                &metric,
                &symbol,
                as_of.as_deref(),
                config.as_deref(),
                input.as_deref(),
            )
            .await?;
        }
        Commands::Classify {
            value,
            low,
            high,
            mode,
        } => {
            cmd::classify::classify_value(value, low, high, &mode)?;
        }
        Commands::Cagr {
            start,
            end,
            periods,
        } => {
            cmd::cagr::show_cagr(start, end, periods);
        }
    }

    Ok(())
}
