//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the query/normalization code stays free of presentation concerns
//! - output changes are localized (and covered by golden-string tests)

use crate::domain::{CreditRecord, CreditsResponse, FacetBucket, FilterState};
use crate::report::{insight_lines, top_program_share, yoy_change};

const MISSING: &str = "—";

/// Compact dollar amount: `$1.2B`, `$3.4M`, `$5.6K`, else whole dollars.
pub fn format_currency(value: Option<f64>) -> String {
    let Some(v) = value.filter(|v| !v.is_nan()) else {
        return MISSING.to_string();
    };
    let abs = v.abs();
    if abs >= 1_000_000_000.0 {
        format!("${:.1}B", v / 1_000_000_000.0)
    } else if abs >= 1_000_000.0 {
        format!("${:.1}M", v / 1_000_000.0)
    } else if abs >= 1_000.0 {
        format!("${:.1}K", v / 1_000.0)
    } else {
        format!("${}", group_thousands(v))
    }
}

/// Ratio as a percentage with one decimal.
pub fn format_percent(value: Option<f64>) -> String {
    match value.filter(|v| !v.is_nan()) {
        Some(v) => format!("{:.1}%", v * 100.0),
        None => MISSING.to_string(),
    }
}

/// Rounded whole number with `,` thousands separators.
pub fn group_thousands(v: f64) -> String {
    let rounded = format!("{:.0}", v.abs());
    let digits = rounded.as_bytes();
    let mut out = String::with_capacity(rounded.len() + rounded.len() / 3 + 1);
    if v < 0.0 && rounded != "0" {
        out.push('-');
    }
    for (i, ch) in rounded.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Filters, totals, facets and insights for one response.
pub fn format_summary(response: &CreditsResponse, filters: &FilterState) -> String {
    let mut out = String::new();

    out.push_str("=== NY Economic Incentive Tax Credits ===\n");
    out.push_str(&format!(
        "Years: {}-{} | Programs: {} | Taxpayer: {}\n",
        filters.year_from,
        filters.year_to,
        if filters.program.is_empty() { "all".to_string() } else { filters.program.join(", ") },
        filters.taxpayer_type.as_deref().unwrap_or("all"),
    ));
    out.push_str(&format!(
        "Rows: {} (limit={} offset={} sort={}) | App token: {}\n",
        response.rows.len(),
        response.meta.limit,
        response.meta.offset,
        response.meta.sort,
        if response.meta.authenticated { "yes" } else { "no" },
    ));

    out.push_str("\nTotals:\n");
    out.push_str(&format!("- allowed          : {}\n", format_currency(Some(response.totals.allowed))));
    out.push_str(&format!("- utilized         : {}\n", format_currency(Some(response.totals.utilized))));
    out.push_str(&format!("- claimed          : {}\n", format_currency(Some(response.totals.claimed))));
    out.push_str(&format!("- utilization rate : {}\n", format_percent(response.totals.utilization_rate)));
    out.push_str(&format!(
        "- yoy change       : {}\n",
        format_percent(yoy_change(&response.facets.tax_year))
    ));
    out.push_str(&format!(
        "- top program share: {}\n",
        format_percent(top_program_share(response))
    ));

    out.push_str("\nPrograms (by utilized):\n");
    out.push_str(&format_facet(&response.facets.program_name));
    out.push_str("\nTaxpayer types:\n");
    out.push_str(&format_facet(&response.facets.taxpayer_type));

    out.push_str("\nInsights:\n");
    let insights = insight_lines(response);
    if insights.is_empty() {
        out.push_str("- No notable changes detected.\n");
    }
    for line in insights {
        out.push_str(&format!("- {line}\n"));
    }

    out
}

fn format_facet(buckets: &[FacetBucket<String>]) -> String {
    if buckets.is_empty() {
        return "  (none)\n".to_string();
    }
    let mut out = String::new();
    for b in buckets {
        out.push_str(
            format!(
                "  {:<32} {:>8} {:>10}",
                truncate(&b.value, 32),
                b.count.map(|c| c.to_string()).unwrap_or_default(),
                format_currency(Some(b.utilized)),
            )
            .trim_end(),
        );
        out.push('\n');
    }
    out
}

/// Detail rows as a fixed-width table.
pub fn format_rows(rows: &[CreditRecord]) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:<6} {:<32} {:>14} {:>14} {:>14} {:<16}",
            "year", "program", "allowed", "utilized", "claimed", "taxpayer"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:-<6} {:-<32} {:-<14} {:-<14} {:-<14} {:-<16}",
            "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for r in rows {
        out.push_str(
            format!(
                "{:<6} {:<32} {:>14} {:>14} {:>14} {:<16}",
                r.tax_year,
                truncate(&r.program_name, 32),
                group_thousands(r.allowed_amount),
                group_thousands(r.utilized_amount),
                group_thousands(r.claimed_amount),
                truncate(&r.taxpayer_type, 16),
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
