//! Dashboard HTTP routes

use axum::{
    extract::{Query, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use tracing::{error, info};

use super::SharedState;
use crate::config::cache_control;
use crate::data::{fetch_credits, fetch_rows};
use crate::domain::OutputFormat;
use crate::error::AppError;
use crate::io::rows_to_csv;
use crate::query::RawFilters;

pub const AUTHENTICATED_HEADER: &str = "x-authenticated";
pub const FAILURE_MESSAGE: &str = "Failed to load credits data";

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    "OK"
}

/// GET /api/credits
///
/// Query pairs are taken as a list so `program` can repeat.
pub async fn credits(State(state): State<SharedState>, Query(pairs): Query<Vec<(String, String)>>) -> Response {
    match load_credits(&state, pairs).await {
        Ok(response) => response,
        Err(e) => {
            error!(error = %e, "Credits request failed");
            failure_response()
        }
    }
}

async fn load_credits(state: &SharedState, pairs: Vec<(String, String)>) -> Result<Response, AppError> {
    let raw = RawFilters::from_pairs(pairs);
    let filters = raw.resolve(state.year_bounds());
    let authenticated = state.source.authenticated();

    let (content_type, body) = match raw.output_format() {
        OutputFormat::Csv => {
            let rows = fetch_rows(state.source.as_ref(), &filters).await?;
            info!(rows = rows.len(), "Serving credits CSV");
            ("text/csv", rows_to_csv(&rows)?)
        }
        OutputFormat::Json => {
            let response = fetch_credits(state.source.as_ref(), &filters).await?;
            let body = serde_json::to_string(&response)
                .map_err(|e| AppError::Server(format!("Failed to encode response: {e}")))?;
            ("application/json", body)
        }
    };

    let cache_control = cache_control(state.revalidate_secs);
    let mut resp = (StatusCode::OK, body).into_response();
    let headers = resp.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_str(&cache_control).map_err(|e| AppError::Server(e.to_string()))?,
    );
    headers.insert(
        AUTHENTICATED_HEADER,
        HeaderValue::from_static(if authenticated { "true" } else { "false" }),
    );
    Ok(resp)
}

/// Uniform failure: no detail leaks to the caller and nothing is cached.
fn failure_response() -> Response {
    let mut resp = (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": FAILURE_MESSAGE })),
    )
        .into_response();
    resp.headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    resp
}
