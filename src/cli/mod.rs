//! Command-line parsing for the tax-credit dashboard service.
//!
//! The goal of this module is to keep **argument parsing** separate from
//! querying and formatting. Filter flags mirror the HTTP query parameters and
//! go through the same clamping rules.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::DEFAULT_REVALIDATE_SECS;
use crate::query::RawFilters;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "credits", version, about = "NY economic incentive tax credits (Socrata-backed)")]
pub struct Cli {
    /// Enable debug logging (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the dashboard API over HTTP.
    Serve(ServeArgs),
    /// Fetch totals, facets and insights and print a report.
    Summary(SummaryArgs),
    /// Write the filtered detail rows to a CSV file.
    Export(ExportArgs),
}

#[derive(Debug, Args, Clone)]
pub struct ServeArgs {
    /// Address to listen on.
    #[arg(long, env = "CREDITS_BIND", default_value = "127.0.0.1:3000")]
    pub bind: SocketAddr,

    /// Seconds shared caches may reuse a successful response.
    #[arg(long, default_value_t = DEFAULT_REVALIDATE_SECS)]
    pub revalidate_secs: u64,
}

/// Filters shared by `summary` and `export`.
#[derive(Debug, Args, Clone, Default)]
pub struct FilterArgs {
    /// First tax year (clamped to 2000..=current year).
    #[arg(long, allow_hyphen_values = true)]
    pub year_from: Option<i64>,

    /// Last tax year (defaults to --year-from).
    #[arg(long, allow_hyphen_values = true)]
    pub year_to: Option<i64>,

    /// Program name to include; repeat for several (first 25 are used).
    #[arg(short, long = "program")]
    pub program: Vec<String>,

    /// Taxpayer type to include.
    #[arg(long)]
    pub taxpayer_type: Option<String>,

    /// Detail rows per page (clamped to 1..=5000).
    #[arg(long, allow_hyphen_values = true)]
    pub limit: Option<i64>,

    /// Rows to skip.
    #[arg(long, allow_hyphen_values = true)]
    pub offset: Option<i64>,

    /// Sort order, e.g. "utilized_amount desc".
    #[arg(long)]
    pub sort: Option<String>,
}

impl FilterArgs {
    pub fn to_raw(&self) -> RawFilters {
        RawFilters {
            year_from: self.year_from,
            year_to: self.year_to,
            program: self.program.clone(),
            taxpayer_type: self.taxpayer_type.clone(),
            limit: self.limit,
            offset: self.offset,
            sort: self.sort.clone(),
            format: None,
        }
    }
}

#[derive(Debug, Args, Clone)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub filters: FilterArgs,

    /// Print the raw JSON payload instead of the report.
    #[arg(long)]
    pub json: bool,

    /// Print the detail rows table.
    #[arg(long)]
    pub rows: bool,

    /// Skip the per-year bar chart.
    #[arg(long)]
    pub no_plot: bool,

    /// Bar chart width (columns).
    #[arg(long, default_value_t = 50)]
    pub width: usize,
}

#[derive(Debug, Args, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub filters: FilterArgs,

    /// Destination CSV file.
    #[arg(short, long, value_name = "CSV")]
    pub out: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_filters_parse_and_repeat() {
        let cli = Cli::parse_from([
            "credits",
            "summary",
            "--year-from",
            "2018",
            "-p",
            "Excelsior",
            "--program",
            "Brownfield",
            "--limit",
            "-3",
        ]);
        let Command::Summary(args) = cli.command else {
            panic!("expected summary");
        };
        let raw = args.filters.to_raw();
        assert_eq!(raw.year_from, Some(2018));
        assert_eq!(raw.program, vec!["Excelsior".to_string(), "Brownfield".to_string()]);
        assert_eq!(raw.limit, Some(-3));
        assert_eq!(args.width, 50);
    }

    #[test]
    fn serve_defaults() {
        let cli = Cli::parse_from(["credits", "serve", "--bind", "0.0.0.0:8080"]);
        let Command::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.bind.port(), 8080);
        assert_eq!(args.revalidate_secs, 600);
    }

    #[test]
    fn export_requires_out() {
        assert!(Cli::try_parse_from(["credits", "export"]).is_err());
        assert!(Cli::try_parse_from(["credits", "export", "--out", "x.csv"]).is_ok());
    }
}
