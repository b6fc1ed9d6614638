//! Caller input -> `FilterState`.
//!
//! Input is never rejected. Unparsable numbers count as absent and every
//! numeric field is clamped into its valid range.

use chrono::Datelike;

use crate::domain::{
    DEFAULT_LIMIT, DEFAULT_YEAR_FROM, FilterState, MAX_LIMIT, MAX_PROGRAMS, MIN_YEAR, OutputFormat,
};
use crate::query::soql::{build_between, build_in, combine_wheres, sanitize_sort};

/// Inclusive year range filters are clamped into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearBounds {
    pub min: i32,
    pub max: i32,
}

impl YearBounds {
    /// `[2000, current local year]`.
    pub fn current() -> Self {
        Self::ending(chrono::Local::now().year())
    }

    pub fn ending(max: i32) -> Self {
        Self {
            min: MIN_YEAR,
            max: max.max(MIN_YEAR),
        }
    }

    pub fn clamp(&self, year: i64) -> i32 {
        year.clamp(i64::from(self.min), i64::from(self.max)) as i32
    }
}

/// Filters as supplied by the caller, before defaults and clamping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFilters {
    pub year_from: Option<i64>,
    pub year_to: Option<i64>,
    pub program: Vec<String>,
    pub taxpayer_type: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub sort: Option<String>,
    pub format: Option<String>,
}

impl RawFilters {
    /// Read filters from decoded URL query pairs. `program` may repeat; for
    /// every other key the first occurrence wins.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut raw = RawFilters::default();
        let mut seen_year_from = false;
        let mut seen_year_to = false;
        let mut seen_limit = false;
        let mut seen_offset = false;

        for (key, value) in pairs {
            let value = value.as_ref();
            match key.as_ref() {
                "year_from" if !seen_year_from => {
                    seen_year_from = true;
                    raw.year_from = parse_lenient(value);
                }
                "year_to" if !seen_year_to => {
                    seen_year_to = true;
                    raw.year_to = parse_lenient(value);
                }
                "program" => raw.program.push(value.to_string()),
                "taxpayer_type" if raw.taxpayer_type.is_none() => {
                    raw.taxpayer_type = Some(value.to_string());
                }
                "limit" if !seen_limit => {
                    seen_limit = true;
                    raw.limit = parse_lenient(value);
                }
                "offset" if !seen_offset => {
                    seen_offset = true;
                    raw.offset = parse_lenient(value);
                }
                "sort" if raw.sort.is_none() => raw.sort = Some(value.to_string()),
                "format" if raw.format.is_none() => raw.format = Some(value.to_string()),
                _ => {}
            }
        }

        raw
    }

    pub fn output_format(&self) -> OutputFormat {
        OutputFormat::from_param(self.format.as_deref())
    }

    /// Apply defaults and clamp every field.
    pub fn resolve(&self, bounds: YearBounds) -> FilterState {
        let year_from = bounds.clamp(self.year_from.unwrap_or(i64::from(DEFAULT_YEAR_FROM)));
        let year_to = bounds.clamp(self.year_to.unwrap_or(i64::from(year_from)));
        let limit = self
            .limit
            .unwrap_or(i64::from(DEFAULT_LIMIT))
            .clamp(1, i64::from(MAX_LIMIT)) as u32;
        let offset = self.offset.unwrap_or(0).max(0) as u64;

        FilterState {
            year_from,
            year_to,
            program: self.program.iter().take(MAX_PROGRAMS).cloned().collect(),
            taxpayer_type: self.taxpayer_type.clone().filter(|t| !t.is_empty()),
            limit,
            offset,
            sort: sanitize_sort(self.sort.as_deref()),
        }
    }
}

impl FilterState {
    /// The `$where` clause shared by every query for this filter set.
    pub fn where_clause(&self) -> String {
        let taxpayer: Vec<&str> = self.taxpayer_type.as_deref().into_iter().collect();
        combine_wheres(&[
            build_between("tax_year", Some(self.year_from), Some(self.year_to)),
            build_in("program_name", self.program.as_slice()),
            build_in("taxpayer_type", taxpayer.as_slice()),
        ])
    }
}

/// Integer, or a finite float truncated toward zero.
fn parse_lenient(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(v) = trimmed.parse::<i64>() {
        return Some(v);
    }
    let v = trimmed.parse::<f64>().ok()?;
    if v.is_finite() {
        Some(v.trunc().clamp(i64::MIN as f64, i64::MAX as f64) as i64)
    } else {
        None
    }
}
