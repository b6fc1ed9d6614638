//! Shared domain types.
//!
//! These types are deliberately plain data so they can be:
//!
//! - built per request from Socrata responses
//! - serialized as the JSON payload consumed by the dashboard
//! - rendered on the terminal or exported to CSV

use serde::{Deserialize, Serialize};

/// Earliest tax year the dashboard exposes.
pub const MIN_YEAR: i32 = 2000;

/// Default first year when the caller does not specify one.
pub const DEFAULT_YEAR_FROM: i32 = 2013;

pub const DEFAULT_LIMIT: u32 = 25;
pub const MAX_LIMIT: u32 = 5000;

/// Maximum number of `program` values honoured per request.
pub const MAX_PROGRAMS: usize = 25;

/// Placeholder for a row without a program name.
pub const UNKNOWN_PROGRAM: &str = "Unknown";

/// Placeholder for a row without a taxpayer type.
pub const UNSPECIFIED_TAXPAYER: &str = "Unspecified";

/// Resolved, clamped filter set for one request.
///
/// `year_from <= year_to` is *not* enforced; each bound is clamped on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub year_from: i32,
    pub year_to: i32,
    pub program: Vec<String>,
    pub taxpayer_type: Option<String>,
    pub limit: u32,
    pub offset: u64,
    /// Always of the form `<field> <asc|desc>` with an allow-listed field.
    pub sort: String,
}

/// One normalized detail row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditRecord {
    pub tax_year: i32,
    pub program_name: String,
    pub allowed_amount: f64,
    pub utilized_amount: f64,
    pub claimed_amount: f64,
    pub taxpayer_type: String,
}

/// A grouped aggregate over one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetBucket<T> {
    pub value: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    pub utilized: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreditsTotals {
    pub allowed: f64,
    pub utilized: f64,
    pub claimed: f64,
    /// `utilized / allowed`, or `None` when nothing was allowed.
    pub utilization_rate: Option<f64>,
}

/// Utilized amount for one (year, program) cell of the trend matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendByProgram {
    pub tax_year: i32,
    pub program_name: String,
    pub utilized: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Facets {
    pub program_name: Vec<FacetBucket<String>>,
    pub taxpayer_type: Vec<FacetBucket<String>>,
    pub tax_year: Vec<FacetBucket<i32>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseMeta {
    /// Whether upstream requests carried an app token.
    pub authenticated: bool,
    pub limit: u32,
    pub offset: u64,
    pub sort: String,
    pub trend_by_program: Vec<TrendByProgram>,
}

/// The full view model served to the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditsResponse {
    pub rows: Vec<CreditRecord>,
    pub totals: CreditsTotals,
    pub facets: Facets,
    pub meta: ResponseMeta,
}

/// Body format requested by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
}

impl OutputFormat {
    /// `csv` selects CSV; anything else (including nothing) is JSON.
    pub fn from_param(raw: Option<&str>) -> Self {
        match raw {
            Some("csv") => OutputFormat::Csv,
            _ => OutputFormat::Json,
        }
    }
}
