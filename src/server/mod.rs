//! HTTP delivery for the dashboard.
//!
//! Provides:
//! - `GET /api/credits`: filtered rows, totals, facets and trend (JSON or CSV)
//! - `GET /health`: liveness probe

pub mod routes;

use std::sync::Arc;

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tracing::info;

use crate::config::ServerConfig;
use crate::data::CreditsSource;
use crate::error::AppError;
use crate::query::YearBounds;

/// State shared across handlers. Read-only after startup.
pub struct ServerState {
    pub source: Arc<dyn CreditsSource>,
    pub revalidate_secs: u64,
    /// Fixed upper year bound; `None` means "current year at request time".
    pub max_year: Option<i32>,
}

impl ServerState {
    pub fn new(source: Arc<dyn CreditsSource>, revalidate_secs: u64) -> Self {
        Self {
            source,
            revalidate_secs,
            max_year: None,
        }
    }

    pub fn year_bounds(&self) -> YearBounds {
        match self.max_year {
            Some(max) => YearBounds::ending(max),
            None => YearBounds::current(),
        }
    }
}

pub type SharedState = Arc<ServerState>;

/// Create the dashboard router
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/api/credits", get(routes::credits))
        .route("/health", get(routes::health))
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(config: &ServerConfig, source: Arc<dyn CreditsSource>) -> Result<(), AppError> {
    let state = Arc::new(ServerState::new(source, config.revalidate_secs));
    let app = create_router(state);

    let listener = TcpListener::bind(config.bind)
        .await
        .map_err(|e| AppError::Server(format!("Failed to bind {}: {e}", config.bind)))?;
    info!(addr = %config.bind, cache_control = %config.cache_control(), "Dashboard API listening");

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Server(format!("Server stopped: {e}")))
}

#[cfg(test)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::data::testing::StubSource;

    const EXPECTED_WHERE: &str =
        "tax_year between 2020 and 2020 AND program_name in ('Excelsior', 'O''Brien')";

    fn router_with(source: Arc<StubSource>) -> Router {
        create_router(Arc::new(ServerState {
            source,
            revalidate_secs: 600,
            max_year: Some(2024),
        }))
    }

    async fn get(router: Router, uri: &str) -> (StatusCode, String) {
        let resp = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn query_string_repeats_programs_and_decodes_values() {
        let source = Arc::new(StubSource::sample(false));
        let (status, body) = get(
            router_with(source.clone()),
            "/api/credits?year_from=2020&year_to=2020&program=Excelsior&program=O%27Brien&taxpayer_type=&format=csv",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.starts_with("tax_year,program_name,"), "{body}");

        let seen = source.seen();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].where_clause.as_deref(), Some(EXPECTED_WHERE));
    }

    #[tokio::test]
    async fn json_request_applies_one_where_clause_to_every_query() {
        let source = Arc::new(StubSource::sample(true));
        let (status, _) = get(
            router_with(source.clone()),
            "/api/credits?year_from=2020&year_to=2020&program=Excelsior&program=O%27Brien&taxpayer_type=",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let seen = source.seen();
        assert_eq!(seen.len(), 6);
        assert!(seen.iter().all(|q| q.where_clause.as_deref() == Some(EXPECTED_WHERE)));
    }

    #[tokio::test]
    async fn health_route_is_mounted() {
        let (status, body) = get(router_with(Arc::new(StubSource::sample(false))), "/health").await;
        assert_eq!((status, body.as_str()), (StatusCode::OK, "OK"));
    }
}
