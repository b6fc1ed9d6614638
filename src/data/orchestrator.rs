//! Fan-out of the dashboard queries and assembly of the response.
//!
//! One filter set produces six independent reads (rows, totals, three facets,
//! trend). They share nothing, so they are awaited together; the first failure
//! aborts the whole request. There is no retry and no partial result.

use serde_json::Value;
use tracing::info;

use crate::data::normalize::{
    RawRow, normalize_category_facet, normalize_row, normalize_totals, normalize_trend,
    normalize_year_facet,
};
use crate::data::socrata::CreditsSource;
use crate::domain::{
    CreditRecord, CreditsResponse, Facets, FilterState, ResponseMeta, UNKNOWN_PROGRAM,
    UNSPECIFIED_TAXPAYER,
};
use crate::error::AppError;
use crate::query::{SELECT_COLUMNS, SoqlQuery};

/// Cap on buckets returned by the program facet.
pub const PROGRAM_FACET_LIMIT: u32 = 50;

const TOTALS_SELECT: &str =
    "sum(allowed_amount) as allowed,sum(utilized_amount) as utilized,sum(claimed_amount) as claimed";
const PROGRAM_FACET_SELECT: &str = "program_name,count(*) as count,sum(utilized_amount) as utilized";
const TAXPAYER_FACET_SELECT: &str = "taxpayer_type,count(*) as count,sum(utilized_amount) as utilized";
const YEAR_FACET_SELECT: &str = "tax_year,sum(utilized_amount) as utilized,sum(allowed_amount) as allowed";
const TREND_SELECT: &str = "tax_year,program_name,sum(utilized_amount) as utilized";

/// Paginated detail rows.
pub fn rows_query(filters: &FilterState) -> SoqlQuery {
    SoqlQuery::new()
        .select(SELECT_COLUMNS.join(", "))
        .order(filters.sort.clone())
        .filter(&filters.where_clause())
        .with_limit_offset(filters.limit, filters.offset)
}

pub fn totals_query(where_clause: &str) -> SoqlQuery {
    SoqlQuery::new().select(TOTALS_SELECT).filter(where_clause)
}

pub fn program_facet_query(where_clause: &str) -> SoqlQuery {
    SoqlQuery::new()
        .select(PROGRAM_FACET_SELECT)
        .group("program_name")
        .order("utilized desc")
        .limit(PROGRAM_FACET_LIMIT)
        .filter(where_clause)
}

pub fn taxpayer_facet_query(where_clause: &str) -> SoqlQuery {
    SoqlQuery::new()
        .select(TAXPAYER_FACET_SELECT)
        .group("taxpayer_type")
        .filter(where_clause)
}

pub fn year_facet_query(where_clause: &str) -> SoqlQuery {
    SoqlQuery::new()
        .select(YEAR_FACET_SELECT)
        .group("tax_year")
        .order("tax_year asc")
        .filter(where_clause)
}

pub fn trend_query(where_clause: &str) -> SoqlQuery {
    SoqlQuery::new()
        .select(TREND_SELECT)
        .group("tax_year,program_name")
        .order("tax_year asc")
        .filter(where_clause)
}

/// Fetch and normalize only the detail rows (CSV export path).
pub async fn fetch_rows(source: &dyn CreditsSource, filters: &FilterState) -> Result<Vec<CreditRecord>, AppError> {
    let raw = fetch_objects(source, &rows_query(filters)).await?;
    Ok(raw.iter().map(normalize_row).collect())
}

/// Run every dashboard query for `filters` and assemble the view model.
pub async fn fetch_credits(source: &dyn CreditsSource, filters: &FilterState) -> Result<CreditsResponse, AppError> {
    let where_clause = filters.where_clause();

    let totals_q = totals_query(&where_clause);
    let program_q = program_facet_query(&where_clause);
    let taxpayer_q = taxpayer_facet_query(&where_clause);
    let year_q = year_facet_query(&where_clause);
    let trend_q = trend_query(&where_clause);

    let (rows, totals, programs, taxpayers, years, trend) = tokio::try_join!(
        fetch_rows(source, filters),
        fetch_objects(source, &totals_q),
        fetch_objects(source, &program_q),
        fetch_objects(source, &taxpayer_q),
        fetch_objects(source, &year_q),
        fetch_objects(source, &trend_q),
    )?;

    info!(
        rows = rows.len(),
        programs = programs.len(),
        years = years.len(),
        "Assembled credits response"
    );

    Ok(CreditsResponse {
        rows,
        totals: normalize_totals(&totals),
        facets: Facets {
            program_name: programs
                .iter()
                .map(|raw| normalize_category_facet(raw, "program_name", UNKNOWN_PROGRAM))
                .collect(),
            taxpayer_type: taxpayers
                .iter()
                .map(|raw| normalize_category_facet(raw, "taxpayer_type", UNSPECIFIED_TAXPAYER))
                .collect(),
            tax_year: years.iter().map(normalize_year_facet).collect(),
        },
        meta: ResponseMeta {
            authenticated: source.authenticated(),
            limit: filters.limit,
            offset: filters.offset,
            sort: filters.sort.clone(),
            trend_by_program: trend.iter().map(normalize_trend).collect(),
        },
    })
}

/// Every Socrata resource query answers with a JSON array of objects.
async fn fetch_objects(source: &dyn CreditsSource, query: &SoqlQuery) -> Result<Vec<RawRow>, AppError> {
    match source.fetch(query).await? {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(map) => Ok(map),
                other => Err(AppError::Decode(format!("expected a JSON object, got {other}"))),
            })
            .collect(),
        other => Err(AppError::Decode(format!("expected a JSON array, got {other}"))),
    }
}
