//! Derived metrics and plain-language insights over a `CreditsResponse`.
//!
//! These mirror the KPI cards shown on the dashboard so the terminal report
//! and the browser tell the same story.

use std::collections::HashMap;

use crate::data::normalize::utilization_rate;
use crate::domain::{CreditsResponse, FacetBucket, TrendByProgram};

pub mod format;

pub use format::*;

/// Consecutive year-over-year increases needed to count as a growth program.
pub const GROWTH_STREAK: usize = 3;

/// Utilization rate per year facet, in facet order.
pub fn utilization_rate_by_year(years: &[FacetBucket<i32>]) -> Vec<(i32, Option<f64>)> {
    years
        .iter()
        .map(|b| (b.value, utilization_rate(b.utilized, b.allowed.unwrap_or(0.0))))
        .collect()
}

/// Relative change in utilized credits between the two latest tax years.
///
/// `None` with fewer than two years or when the earlier year is zero.
pub fn yoy_change(years: &[FacetBucket<i32>]) -> Option<f64> {
    if years.len() < 2 {
        return None;
    }
    let mut sorted: Vec<&FacetBucket<i32>> = years.iter().collect();
    sorted.sort_by_key(|b| b.value);

    let current = sorted[sorted.len() - 1];
    let previous = sorted[sorted.len() - 2];
    if previous.utilized == 0.0 {
        return None;
    }
    Some((current.utilized - previous.utilized) / previous.utilized)
}

/// Share of all utilized credits taken by the largest program.
pub fn top_program_share(response: &CreditsResponse) -> Option<f64> {
    if response.totals.utilized == 0.0 {
        return None;
    }
    let top = response.facets.program_name.first()?;
    Some(top.utilized / response.totals.utilized)
}

/// Programs whose utilized amount increased across at least `GROWTH_STREAK`
/// successive years. Returned in order of first appearance.
pub fn growth_programs(trend: &[TrendByProgram]) -> Vec<String> {
    let mut order: Vec<&str> = Vec::new();
    let mut grouped: HashMap<&str, Vec<&TrendByProgram>> = HashMap::new();
    for item in trend {
        let entry = grouped.entry(item.program_name.as_str()).or_default();
        if entry.is_empty() {
            order.push(item.program_name.as_str());
        }
        entry.push(item);
    }

    order
        .into_iter()
        .filter(|name| {
            let mut values = grouped[name].clone();
            values.sort_by_key(|t| t.tax_year);
            has_growth_streak(&values)
        })
        .map(str::to_string)
        .collect()
}

fn has_growth_streak(sorted: &[&TrendByProgram]) -> bool {
    let mut streak = 1;
    for pair in sorted.windows(2) {
        if pair[1].utilized > pair[0].utilized {
            streak += 1;
            if streak >= GROWTH_STREAK {
                return true;
            }
        } else {
            streak = 1;
        }
    }
    false
}

/// Sentences for the "Insights" panel.
pub fn insight_lines(response: &CreditsResponse) -> Vec<String> {
    let mut items = Vec::new();

    if let Some(change) = yoy_change(&response.facets.tax_year) {
        let direction = if change >= 0.0 { "rose" } else { "fell" };
        items.push(format!(
            "Utilized credits {direction} {} versus last year.",
            format_percent(Some(change.abs()))
        ));
    }

    if let (Some(share), Some(top)) = (top_program_share(response), response.facets.program_name.first()) {
        items.push(format!(
            "{} accounts for {} of all utilized credits.",
            top.value,
            format_percent(Some(share))
        ));
    }

    let growth = growth_programs(&response.meta.trend_by_program);
    if !growth.is_empty() {
        items.push(format!(
            "{} program(s) increased utilization for {GROWTH_STREAK} or more consecutive years ({}).",
            growth.len(),
            growth.join(", ")
        ));
    }

    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CreditsTotals, Facets, ResponseMeta};

    fn year(value: i32, utilized: f64, allowed: f64) -> FacetBucket<i32> {
        FacetBucket { value, count: None, utilized, allowed: Some(allowed) }
    }

    fn trend(tax_year: i32, program: &str, utilized: f64) -> TrendByProgram {
        TrendByProgram { tax_year, program_name: program.to_string(), utilized }
    }

    fn response(total_utilized: f64, programs: &[(&str, f64)], years: Vec<FacetBucket<i32>>) -> CreditsResponse {
        CreditsResponse {
            rows: Vec::new(),
            totals: CreditsTotals { utilized: total_utilized, ..CreditsTotals::default() },
            facets: Facets {
                program_name: programs
                    .iter()
                    .map(|(name, utilized)| FacetBucket {
                        value: name.to_string(),
                        count: Some(1),
                        utilized: *utilized,
                        allowed: None,
                    })
                    .collect(),
                taxpayer_type: Vec::new(),
                tax_year: years,
            },
            meta: ResponseMeta {
                authenticated: false,
                limit: 25,
                offset: 0,
                sort: "tax_year asc".to_string(),
                trend_by_program: Vec::new(),
            },
        }
    }

    #[test]
    fn yoy_uses_latest_two_years_regardless_of_order() {
        let years = vec![year(2021, 150.0, 0.0), year(2019, 10.0, 0.0), year(2020, 100.0, 0.0)];
        assert_eq!(yoy_change(&years), Some(0.5));
    }

    #[test]
    fn yoy_needs_two_years_and_nonzero_base() {
        assert_eq!(yoy_change(&[year(2020, 1.0, 1.0)]), None);
        assert_eq!(yoy_change(&[year(2019, 0.0, 1.0), year(2020, 5.0, 1.0)]), None);
    }

    #[test]
    fn rate_by_year_never_divides_by_zero() {
        let rates = utilization_rate_by_year(&[year(2019, 5.0, 0.0), year(2020, 5.0, 10.0)]);
        assert_eq!(rates, vec![(2019, None), (2020, Some(0.5))]);
    }

    #[test]
    fn top_share_requires_utilized_total() {
        assert_eq!(top_program_share(&response(0.0, &[("A", 1.0)], Vec::new())), None);
        assert_eq!(top_program_share(&response(10.0, &[], Vec::new())), None);
        assert_eq!(top_program_share(&response(10.0, &[("A", 4.0)], Vec::new())), Some(0.4));
    }

    #[test]
    fn growth_requires_three_rising_entries() {
        let items = vec![
            trend(2018, "Rising", 1.0),
            trend(2018, "Flat", 5.0),
            trend(2020, "Rising", 3.0),
            trend(2019, "Rising", 2.0),
            trend(2019, "Flat", 5.0),
            trend(2020, "Flat", 6.0),
            trend(2018, "Broken", 1.0),
            trend(2019, "Broken", 2.0),
            trend(2020, "Broken", 1.0),
            trend(2021, "Broken", 2.0),
        ];
        assert_eq!(growth_programs(&items), vec!["Rising".to_string()]);
    }

    #[test]
    fn insight_sentences() {
        let mut resp = response(
            400.0,
            &[("Excelsior", 300.0), ("Brownfield", 100.0)],
            vec![year(2019, 200.0, 400.0), year(2020, 150.0, 600.0)],
        );
        resp.meta.trend_by_program = vec![
            trend(2018, "Excelsior", 1.0),
            trend(2019, "Excelsior", 2.0),
            trend(2020, "Excelsior", 3.0),
        ];

        assert_eq!(
            insight_lines(&resp),
            vec![
                "Utilized credits fell 25.0% versus last year.".to_string(),
                "Excelsior accounts for 75.0% of all utilized credits.".to_string(),
                "1 program(s) increased utilization for 3 or more consecutive years (Excelsior).".to_string(),
            ]
        );
    }

    #[test]
    fn no_insights_without_data() {
        assert!(insight_lines(&response(0.0, &[], Vec::new())).is_empty());
    }
}
