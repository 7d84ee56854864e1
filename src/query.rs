//! Query commands for the CLI.
//!
//! Each command runs the same [`QueryService`] operation as the matching
//! HTTP route and prints the resulting document as pretty JSON. Client-side
//! failures (unknown ids, bad parameters) print `Error: <message>` to
//! stderr and exit with status 1.

use anyhow::Result;
use serde::Serialize;
use serde_json::Value;

use sec_filings_core::service::{FilingsRequest, QueryService};
use sec_filings_core::QueryError;

use crate::app;
use crate::config::Config;

/// One query against the filings service.
#[derive(Debug, Clone)]
pub enum QueryCommand {
    Tickers,
    Ticker(String),
    Submission(String),
    Submissions(FilingsRequest),
    Fact(String),
    Facts(FilingsRequest),
}

fn to_value<T: Serialize>(doc: T) -> std::result::Result<Value, QueryError> {
    serde_json::to_value(doc)
        .map_err(|e| QueryError::internal(format!("failed to encode response: {}", e)))
}

/// Run `command` and return the response document.
pub async fn execute(
    service: &QueryService,
    command: &QueryCommand,
) -> std::result::Result<Value, QueryError> {
    match command {
        QueryCommand::Tickers => to_value(service.supported_tickers(Some("Y"))?),
        QueryCommand::Ticker(symbol) => to_value(service.ticker(symbol)),
        QueryCommand::Submission(adsh) => to_value(service.submission(adsh).await?),
        QueryCommand::Submissions(request) => to_value(service.submissions(request).await?),
        QueryCommand::Fact(id) => to_value(service.fact(id).await?),
        QueryCommand::Facts(request) => to_value(service.facts(request).await?),
    }
}

/// CLI entry point: run the query and print the document to stdout.
pub async fn run_query(config: &Config, command: QueryCommand) -> Result<()> {
    let service = app::open_service(config).await?;

    let doc = match execute(&service, &command).await {
        Ok(doc) => doc,
        Err(e) if e.is_client_error() => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}
