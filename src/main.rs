//! # SEC Filings CLI (`sec`)
//!
//! The `sec` binary initializes the filings database, runs one-off queries,
//! and starts the HTTP server.
//!
//! ## Usage
//!
//! ```bash
//! sec --config ./config/sec.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `sec init` | Create the SQLite database and run schema migrations |
//! | `sec serve` | Start the HTTP server |
//! | `sec tickers` | Print the supported tickers |
//! | `sec ticker <SYMBOL>` | Print one ticker |
//! | `sec sub <ADSH>` | Print one submission |
//! | `sec subs --ticker T [--year Y] [--qtr Q]` | Print matching submissions |
//! | `sec num <ID>` | Print one fact |
//! | `sec nums --ticker T [--year Y] [--qtr Q] [--tag P]` | Print matching facts |
//!
//! ## Examples
//!
//! ```bash
//! # Initialize the database
//! sec init --config ./config/sec.toml
//!
//! # Apple's 10-Q for the second fiscal quarter of 2023
//! sec subs --ticker AAPL --year 2023 --qtr Q2
//!
//! # Every Assets* fact from Apple's 10-K filings
//! sec nums --ticker AAPL --tag Assets
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use sec_filings::query::{self, QueryCommand};
use sec_filings::{config, logging, migrate, server};
use sec_filings_core::service::FilingsRequest;

/// SEC filings query service.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/sec.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "sec",
    about = "SEC filings query service: tickers, 10-K/10-Q submissions, and reported facts",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/sec.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Creates the SQLite database file with the `submissions` and `facts`
    /// tables. Safe to run repeatedly.
    Init,

    /// Start the HTTP server on `[server].bind`.
    Serve,

    /// Print the configured tickers that resolve in the dataset.
    Tickers,

    /// Print one ticker. Unknown tickers print an empty `data` object.
    Ticker {
        /// Ticker symbol (any case).
        symbol: String,
    },

    /// Print one submission by accession number.
    Sub {
        /// Accession number, e.g. `0000320193-23-000106`.
        adsh: String,
    },

    /// Print a filer's submissions.
    ///
    /// Without `--qtr`, lists annual reports (10-K); with `--qtr`, lists
    /// quarterly reports (10-Q) and `--year` is required.
    Subs {
        #[command(flatten)]
        filter: FilingsArgs,
    },

    /// Print one fact by id.
    Num {
        id: String,
    },

    /// Print the facts reported in a filer's submissions.
    Nums {
        #[command(flatten)]
        filter: FilingsArgs,

        /// Only facts whose tag starts with this prefix (case-sensitive).
        #[arg(long)]
        tag: Option<String>,
    },
}

#[derive(clap::Args)]
struct FilingsArgs {
    /// Ticker symbol (any case).
    #[arg(long)]
    ticker: String,

    /// Fiscal year.
    #[arg(long)]
    year: Option<i32>,

    /// Fiscal quarter, `Q1`..`Q4`.
    #[arg(long)]
    qtr: Option<String>,
}

impl FilingsArgs {
    fn into_request(self, tag: Option<String>) -> FilingsRequest {
        FilingsRequest {
            ticker: Some(self.ticker),
            year: self.year,
            qtr: self.qtr,
            tag,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;
    logging::init_logging(&cfg.logging);

    let command = match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized successfully.");
            return Ok(());
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
            return Ok(());
        }
        Commands::Tickers => QueryCommand::Tickers,
        Commands::Ticker { symbol } => QueryCommand::Ticker(symbol),
        Commands::Sub { adsh } => QueryCommand::Submission(adsh),
        Commands::Subs { filter } => QueryCommand::Submissions(filter.into_request(None)),
        Commands::Num { id } => QueryCommand::Fact(id),
        Commands::Nums { filter, tag } => QueryCommand::Facts(filter.into_request(tag)),
    };

    query::run_query(&cfg, command).await
}
