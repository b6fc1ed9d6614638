//! ASCII bar chart for terminal output.
//!
//! This is intentionally "dumb" (fixed-width bars), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! One row per tax year; bar length is proportional to utilized credits,
//! and the year with the most utilization spans the full width.

use crate::domain::FacetBucket;
use crate::report::format_currency;

const BAR: char = '#';

/// Render utilized credits per year as horizontal bars.
pub fn render_year_bars(years: &[FacetBucket<i32>], width: usize) -> String {
    let width = width.max(10);
    if years.is_empty() {
        return "Utilized credits by tax year: (no data)\n".to_string();
    }

    let max = years.iter().map(|b| b.utilized).fold(0.0_f64, f64::max);

    let mut sorted: Vec<&FacetBucket<i32>> = years.iter().collect();
    sorted.sort_by_key(|b| b.value);

    let mut out = String::new();
    out.push_str(&format!(
        "Utilized credits by tax year (max {})\n",
        format_currency(Some(max))
    ));

    for b in sorted {
        let bar: String = std::iter::repeat_n(BAR, bar_len(b.utilized, max, width)).collect();
        out.push_str(&format!(
            "{:>4} |{:<width$} {}\n",
            b.value,
            bar,
            format_currency(Some(b.utilized)),
        ));
    }

    out
}

fn bar_len(value: f64, max: f64, width: usize) -> usize {
    if !(value.is_finite() && max.is_finite()) || max <= 0.0 || value <= 0.0 {
        return 0;
    }
    let u = (value / max).clamp(0.0, 1.0);
    (u * width as f64).round() as usize
}
