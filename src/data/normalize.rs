//! Socrata JSON -> domain values.
//!
//! Socrata returns every column as text (`"1234.5"`), and aggregate columns
//! may be missing entirely when a group is empty. Each helper here picks a
//! safe default instead of failing: numbers fall back to 0, categories to a
//! fixed placeholder.

use serde_json::{Map, Value};

use crate::domain::{
    CreditRecord, CreditsTotals, FacetBucket, TrendByProgram, UNKNOWN_PROGRAM, UNSPECIFIED_TAXPAYER,
};

/// One upstream object as returned by Socrata.
pub type RawRow = Map<String, Value>;

/// Coerce a text or numeric field to a finite number, else 0.
pub fn normalize_number(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Text fields pass through, numbers are stringified, anything else gets the placeholder.
pub fn normalize_text(value: Option<&Value>, placeholder: &str) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => placeholder.to_string(),
    }
}

/// Tax years are whole numbers; unparsable years become 0.
pub fn normalize_year(value: Option<&Value>) -> i32 {
    let year = normalize_number(value).trunc();
    if year >= f64::from(i32::MIN) && year <= f64::from(i32::MAX) {
        year as i32
    } else {
        0
    }
}

fn normalize_count(value: Option<&Value>) -> u64 {
    let count = normalize_number(value);
    if count > 0.0 { count.trunc() as u64 } else { 0 }
}

/// `utilized / allowed` when anything was allowed.
pub fn utilization_rate(utilized: f64, allowed: f64) -> Option<f64> {
    if allowed > 0.0 {
        let rate = utilized / allowed;
        rate.is_finite().then_some(rate)
    } else {
        None
    }
}

pub fn normalize_row(raw: &RawRow) -> CreditRecord {
    CreditRecord {
        tax_year: normalize_year(raw.get("tax_year")),
        program_name: normalize_text(raw.get("program_name"), UNKNOWN_PROGRAM),
        allowed_amount: normalize_number(raw.get("allowed_amount")),
        utilized_amount: normalize_number(raw.get("utilized_amount")),
        claimed_amount: normalize_number(raw.get("claimed_amount")),
        taxpayer_type: normalize_text(raw.get("taxpayer_type"), UNSPECIFIED_TAXPAYER),
    }
}

/// Totals come back as a single aggregate row; no row means all zeros.
pub fn normalize_totals(rows: &[RawRow]) -> CreditsTotals {
    let Some(raw) = rows.first() else {
        return CreditsTotals::default();
    };
    let allowed = normalize_number(raw.get("allowed"));
    let utilized = normalize_number(raw.get("utilized"));
    let claimed = normalize_number(raw.get("claimed"));

    CreditsTotals {
        allowed,
        utilized,
        claimed,
        utilization_rate: utilization_rate(utilized, allowed),
    }
}

/// Program or taxpayer-type facet: `{<column>, count, utilized}`.
pub fn normalize_category_facet(raw: &RawRow, column: &str, placeholder: &str) -> FacetBucket<String> {
    FacetBucket {
        value: normalize_text(raw.get(column), placeholder),
        count: Some(normalize_count(raw.get("count"))),
        utilized: normalize_number(raw.get("utilized")),
        allowed: None,
    }
}

/// Year facet: `{tax_year, utilized, allowed}`.
pub fn normalize_year_facet(raw: &RawRow) -> FacetBucket<i32> {
    FacetBucket {
        value: normalize_year(raw.get("tax_year")),
        count: None,
        utilized: normalize_number(raw.get("utilized")),
        allowed: Some(normalize_number(raw.get("allowed"))),
    }
}

pub fn normalize_trend(raw: &RawRow) -> TrendByProgram {
    TrendByProgram {
        tax_year: normalize_year(raw.get("tax_year")),
        program_name: normalize_text(raw.get("program_name"), UNKNOWN_PROGRAM),
        utilized: normalize_number(raw.get("utilized")),
    }
}
