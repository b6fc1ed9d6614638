//! Canned `CreditsSource` for orchestrator and handler tests.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::data::socrata::CreditsSource;
use crate::error::AppError;
use crate::query::SoqlQuery;

pub struct StubSource {
    authenticated: bool,
    rows: Value,
    totals: Value,
    programs: Value,
    taxpayers: Value,
    years: Value,
    trend: Value,
    fail_group: Option<String>,
    seen: Mutex<Vec<SoqlQuery>>,
}

impl StubSource {
    /// Two years, two programs, one row missing its program name.
    pub fn sample(authenticated: bool) -> Self {
        Self {
            authenticated,
            rows: json!([
                {
                    "tax_year": "2019",
                    "program_name": "Excelsior",
                    "allowed_amount": "400",
                    "utilized_amount": "150",
                    "claimed_amount": "200",
                    "taxpayer_type": "Corporation"
                },
                {
                    "tax_year": "2020",
                    "allowed_amount": "600",
                    "utilized_amount": "250.5",
                    "claimed_amount": "n/a",
                    "taxpayer_type": "Individual \"sole\""
                }
            ]),
            totals: json!([{ "allowed": "1000", "utilized": "400", "claimed": "500" }]),
            programs: json!([
                { "program_name": "Excelsior", "count": "3", "utilized": "300" },
                { "program_name": "Brownfield", "count": "1", "utilized": "100" }
            ]),
            taxpayers: json!([
                { "count": "2", "utilized": "250" },
                { "taxpayer_type": "Corporation", "count": "2", "utilized": "150" }
            ]),
            years: json!([
                { "tax_year": "2019", "utilized": "150", "allowed": "400" },
                { "tax_year": "2020", "utilized": "250", "allowed": "600" }
            ]),
            trend: json!([
                { "tax_year": "2019", "program_name": "Excelsior", "utilized": "150" },
                { "tax_year": "2020", "program_name": "Excelsior", "utilized": "150" },
                { "tax_year": "2020", "program_name": "Brownfield", "utilized": "100" }
            ]),
            fail_group: None,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn with_rows(mut self, rows: Value) -> Self {
        self.rows = rows;
        self
    }

    pub fn with_totals(mut self, totals: Value) -> Self {
        self.totals = totals;
        self
    }

    /// Answer 500 for the grouped query on `group`.
    pub fn failing_on(mut self, group: &str) -> Self {
        self.fail_group = Some(group.to_string());
        self
    }

    pub fn seen(&self) -> Vec<SoqlQuery> {
        self.seen.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

#[async_trait]
impl CreditsSource for StubSource {
    async fn fetch(&self, query: &SoqlQuery) -> Result<Value, AppError> {
        self.seen.lock().unwrap().push(query.clone());

        let group = query.group.as_deref();
        if group.is_some() && group == self.fail_group.as_deref() {
            return Err(AppError::UpstreamStatus {
                status: 500,
                body: "stub failure".to_string(),
            });
        }

        let body = match group {
            Some("program_name") => &self.programs,
            Some("taxpayer_type") => &self.taxpayers,
            Some("tax_year") => &self.years,
            Some("tax_year,program_name") => &self.trend,
            _ if query.select.as_deref().is_some_and(|s| s.starts_with("sum(")) => &self.totals,
            _ => &self.rows,
        };
        Ok(body.clone())
    }

    fn authenticated(&self) -> bool {
        self.authenticated
    }
}
