//! SoQL clause builders.
//!
//! Field names are interpolated into query strings, so every builder routes
//! them through `sanitize_field` first. Values are either integers (ranges) or
//! quote-escaped string literals (set membership).

use crate::domain::MAX_LIMIT;

/// The dataset schema, in the order rows are selected and exported.
pub const SELECT_COLUMNS: [&str; 6] = [
    "tax_year",
    "program_name",
    "allowed_amount",
    "utilized_amount",
    "claimed_amount",
    "taxpayer_type",
];

pub const DEFAULT_FIELD: &str = "tax_year";
pub const DEFAULT_SORT: &str = "tax_year asc";

/// Sort direction accepted in `$order`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Return `field` when it is a known column, else the default column.
pub fn sanitize_field(field: &str) -> &str {
    if SELECT_COLUMNS.contains(&field) {
        field
    } else {
        DEFAULT_FIELD
    }
}

/// Normalize a `<field> <direction>` sort string.
///
/// Blank input falls back to `tax_year asc`; an unknown field falls back to
/// `tax_year`; any direction other than `desc` becomes `asc`.
pub fn sanitize_sort(sort: Option<&str>) -> String {
    let Some(sort) = sort.filter(|s| !s.is_empty()) else {
        return DEFAULT_SORT.to_string();
    };

    let mut parts = sort.split_whitespace();
    let field = sanitize_field(parts.next().unwrap_or_default());
    let direction = match parts.next() {
        Some("desc") => SortDirection::Desc,
        _ => SortDirection::Asc,
    };
    format!("{field} {}", direction.as_str())
}

/// `<field> between <from> and <to>`, or empty when a bound is missing.
pub fn build_between(field: &str, from: Option<i32>, to: Option<i32>) -> String {
    let field = sanitize_field(field);
    match (from, to) {
        (Some(from), Some(to)) => format!("{field} between {from} and {to}"),
        _ => String::new(),
    }
}

/// `<field> in ('a', 'b')` with embedded quotes doubled.
///
/// Empty strings are dropped; if nothing is left the clause is empty.
pub fn build_in<S: AsRef<str>>(field: &str, values: &[S]) -> String {
    let field = sanitize_field(field);
    let escaped: Vec<String> = values
        .iter()
        .map(AsRef::as_ref)
        .filter(|v| !v.is_empty())
        .map(|v| format!("'{}'", v.replace('\'', "''")))
        .collect();

    if escaped.is_empty() {
        return String::new();
    }
    format!("{field} in ({})", escaped.join(", "))
}

/// Join non-empty fragments with `AND`.
pub fn combine_wheres<S: AsRef<str>>(parts: &[S]) -> String {
    parts
        .iter()
        .map(AsRef::as_ref)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" AND ")
}

/// One SoQL request against the dataset endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SoqlQuery {
    pub select: Option<String>,
    pub where_clause: Option<String>,
    pub group: Option<String>,
    pub order: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u64>,
}

impl SoqlQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(mut self, select: impl Into<String>) -> Self {
        self.select = Some(select.into());
        self
    }

    /// Set `$where`; an empty clause leaves the parameter unset.
    pub fn filter(mut self, where_clause: &str) -> Self {
        self.where_clause = (!where_clause.is_empty()).then(|| where_clause.to_string());
        self
    }

    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn order(mut self, order: impl Into<String>) -> Self {
        self.order = Some(order.into());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Pagination: `$limit` only when positive (capped), `$offset` only when positive.
    pub fn with_limit_offset(mut self, limit: u32, offset: u64) -> Self {
        if limit > 0 {
            self.limit = Some(limit.min(MAX_LIMIT));
        }
        if offset > 0 {
            self.offset = Some(offset);
        }
        self
    }

    /// Query-string pairs in a stable order.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        if let Some(select) = &self.select {
            out.push(("$select", select.clone()));
        }
        if let Some(where_clause) = &self.where_clause {
            out.push(("$where", where_clause.clone()));
        }
        if let Some(group) = &self.group {
            out.push(("$group", group.clone()));
        }
        if let Some(order) = &self.order {
            out.push(("$order", order.clone()));
        }
        if let Some(limit) = self.limit {
            out.push(("$limit", limit.to_string()));
        }
        if let Some(offset) = self.offset {
            out.push(("$offset", offset.to_string()));
        }
        out
    }
}
