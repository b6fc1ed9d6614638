//! Shared fetch pipeline used by the CLI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! caller filters -> clamped `FilterState` -> Socrata fan-out -> view model
//!
//! The subcommands can then focus on presentation (report, JSON, CSV file).

use crate::config::SocrataConfig;
use crate::data::{CreditsSource, SocrataClient, fetch_credits, fetch_rows};
use crate::domain::{CreditRecord, CreditsResponse, FilterState};
use crate::error::AppError;
use crate::query::{RawFilters, YearBounds};

/// Outputs of a single `credits summary` run.
#[derive(Debug, Clone)]
pub struct SummaryOutput {
    pub filters: FilterState,
    pub response: CreditsResponse,
}

/// Outputs of a single `credits export` run.
#[derive(Debug, Clone)]
pub struct ExportOutput {
    pub filters: FilterState,
    pub rows: Vec<CreditRecord>,
}

/// Build the live Socrata client from the environment (`.env` included).
pub fn client_from_env() -> Result<SocrataClient, AppError> {
    let config = SocrataConfig::from_env()?;
    Ok(SocrataClient::new(config))
}

pub async fn run_summary(
    source: &dyn CreditsSource,
    raw: &RawFilters,
    bounds: YearBounds,
) -> Result<SummaryOutput, AppError> {
    let filters = raw.resolve(bounds);
    let response = fetch_credits(source, &filters).await?;
    Ok(SummaryOutput { filters, response })
}

pub async fn run_export(
    source: &dyn CreditsSource,
    raw: &RawFilters,
    bounds: YearBounds,
) -> Result<ExportOutput, AppError> {
    let filters = raw.resolve(bounds);
    let rows = fetch_rows(source, &filters).await?;
    Ok(ExportOutput { filters, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::testing::StubSource;

    #[tokio::test]
    async fn summary_resolves_filters_before_fetching() {
        let source = StubSource::sample(false);
        let raw = RawFilters {
            year_from: Some(1999),
            year_to: Some(2050),
            ..RawFilters::default()
        };

        let out = run_summary(&source, &raw, YearBounds::ending(2024)).await.unwrap();
        assert_eq!((out.filters.year_from, out.filters.year_to), (2000, 2024));
        assert_eq!(out.response.rows.len(), 2);
        assert_eq!(source.calls(), 6);
    }

    #[tokio::test]
    async fn export_fetches_rows_only() {
        let source = StubSource::sample(false);
        let out = run_export(&source, &RawFilters::default(), YearBounds::ending(2024))
            .await
            .unwrap();
        assert_eq!(out.rows.len(), 2);
        assert_eq!(out.filters.limit, 25);
        assert_eq!(source.calls(), 1);
    }
}
