//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and sets up logging
//! - loads the Socrata configuration
//! - serves the HTTP API, or runs a one-shot summary/export

use std::sync::Arc;

use clap::Parser;
use tracing::info;

use crate::cli::{Command, ExportArgs, ServeArgs, SummaryArgs};
use crate::config::ServerConfig;
use crate::error::AppError;
use crate::query::YearBounds;

pub mod pipeline;

/// Entry point for the `credits` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();
    crate::logging::init(cli.verbose)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| AppError::Server(format!("Failed to start async runtime: {e}")))?;

    runtime.block_on(async move {
        match cli.command {
            Command::Serve(args) => handle_serve(args).await,
            Command::Summary(args) => handle_summary(args).await,
            Command::Export(args) => handle_export(args).await,
        }
    })
}

async fn handle_serve(args: ServeArgs) -> Result<(), AppError> {
    let client = pipeline::client_from_env()?;
    info!(
        base_url = client.base_url(),
        authenticated = crate::data::CreditsSource::authenticated(&client),
        "Loaded Socrata configuration"
    );

    let config = ServerConfig {
        bind: args.bind,
        revalidate_secs: args.revalidate_secs,
    };
    crate::server::serve(&config, Arc::new(client)).await
}

async fn handle_summary(args: SummaryArgs) -> Result<(), AppError> {
    let client = pipeline::client_from_env()?;
    let run = pipeline::run_summary(&client, &args.filters.to_raw(), YearBounds::current()).await?;

    if args.json {
        let json = serde_json::to_string_pretty(&run.response)
            .map_err(|e| AppError::Server(format!("Failed to encode response: {e}")))?;
        println!("{json}");
        return Ok(());
    }

    println!("{}", crate::report::format_summary(&run.response, &run.filters));

    if !args.no_plot {
        println!(
            "{}",
            crate::plot::render_year_bars(&run.response.facets.tax_year, args.width)
        );
    }

    if args.rows {
        println!("{}", crate::report::format_rows(&run.response.rows));
    }

    Ok(())
}

async fn handle_export(args: ExportArgs) -> Result<(), AppError> {
    let client = pipeline::client_from_env()?;
    let run = pipeline::run_export(&client, &args.filters.to_raw(), YearBounds::current()).await?;

    crate::io::write_rows_csv_file(&args.out, &run.rows)?;
    info!(
        rows = run.rows.len(),
        year_from = run.filters.year_from,
        year_to = run.filters.year_to,
        limit = run.filters.limit,
        offset = run.filters.offset,
        path = %args.out.display(),
        "Exported credits CSV"
    );
    Ok(())
}
