//! Socrata (SODA) integration for the NY tax-credit dataset.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::config::SocrataConfig;
use crate::error::AppError;
use crate::query::SoqlQuery;

/// Header carrying the optional Socrata app token.
pub const APP_TOKEN_HEADER: &str = "X-App-Token";

/// Anything that can answer a SoQL query with a JSON document.
///
/// The orchestrator and the HTTP handlers only see this trait, so tests can
/// substitute canned responses for the live API.
#[async_trait]
pub trait CreditsSource: Send + Sync {
    async fn fetch(&self, query: &SoqlQuery) -> Result<Value, AppError>;

    /// Whether requests carry a credential.
    fn authenticated(&self) -> bool;
}

pub struct SocrataClient {
    client: Client,
    base_url: String,
    app_token: Option<String>,
}

impl SocrataClient {
    pub fn new(config: SocrataConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url,
            app_token: config.app_token,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl CreditsSource for SocrataClient {
    async fn fetch(&self, query: &SoqlQuery) -> Result<Value, AppError> {
        let params = query.params();
        debug!(url = %self.base_url, ?params, "Socrata query");

        let mut req = self.client.get(&self.base_url).query(&params);
        if let Some(token) = &self.app_token {
            req = req.header(APP_TOKEN_HEADER, token);
        }

        let resp = req.send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AppError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.json::<Value>().await?;
        Ok(body)
    }

    fn authenticated(&self) -> bool {
        self.app_token.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, token: Option<&str>) -> SocrataClient {
        SocrataClient::new(SocrataConfig {
            base_url: format!("{}/resource/4skq-w2i6.json", server.uri()),
            app_token: token.map(str::to_string),
        })
    }

    #[tokio::test]
    async fn sends_soql_params_and_app_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/resource/4skq-w2i6.json"))
            .and(query_param("$group", "program_name"))
            .and(query_param("$limit", "50"))
            .and(header(APP_TOKEN_HEADER, "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "program_name": "Excelsior" }])))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, Some("secret"));
        assert!(client.authenticated());

        let query = SoqlQuery::new().select("program_name").group("program_name").limit(50);
        let body = client.fetch(&query).await.unwrap();
        assert_eq!(body, json!([{ "program_name": "Excelsior" }]));
    }

    #[tokio::test]
    async fn omits_app_token_when_none_is_configured() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        client.fetch(&SoqlQuery::new()).await.unwrap();

        let received = server.received_requests().await.unwrap();
        assert_eq!(received.len(), 1);
        assert!(received[0].headers.get(APP_TOKEN_HEADER).is_none());
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(400).set_body_string("query.soql.no-such-column"))
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        assert!(!client.authenticated());

        let err = client.fetch(&SoqlQuery::new()).await.unwrap_err();
        match err {
            AppError::UpstreamStatus { status, body } => {
                assert_eq!(status, 400);
                assert_eq!(body, "query.soql.no-such-column");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_json_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = client_for(&server, None).fetch(&SoqlQuery::new()).await.unwrap_err();
        assert!(matches!(err, AppError::Decode(_)), "{err:?}");
    }
}
