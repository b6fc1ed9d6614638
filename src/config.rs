//! Runtime configuration.
//!
//! The Socrata credential is read once at startup and handed to the client
//! explicitly; nothing below `app` touches the environment.

use std::net::SocketAddr;

use crate::error::AppError;

pub const DEFAULT_BASE_URL: &str = "https://data.ny.gov/resource/4skq-w2i6.json";

/// Seconds a successful response may be served from a shared cache.
pub const DEFAULT_REVALIDATE_SECS: u64 = 600;

/// How long a stale response may still be served while revalidating.
pub const STALE_WHILE_REVALIDATE_SECS: u64 = 86_400;

const APP_TOKEN_VAR: &str = "SOCRATA_APP_TOKEN";
const BASE_URL_VAR: &str = "SOCRATA_BASE_URL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocrataConfig {
    pub base_url: String,
    pub app_token: Option<String>,
}

impl SocrataConfig {
    /// Load from the process environment, after reading `.env` if present.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_vars(
            std::env::var(BASE_URL_VAR).ok(),
            std::env::var(APP_TOKEN_VAR).ok(),
        )
    }

    /// Blank values count as unset.
    pub fn from_vars(base_url: Option<String>, app_token: Option<String>) -> Result<Self, AppError> {
        let base_url = base_url
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
            return Err(AppError::Config(format!(
                "{BASE_URL_VAR} must be an http(s) URL, got '{base_url}'."
            )));
        }

        let app_token = app_token
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Ok(Self { base_url, app_token })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub revalidate_secs: u64,
}

impl ServerConfig {
    pub fn cache_control(&self) -> String {
        cache_control(self.revalidate_secs)
    }
}

/// `Cache-Control` value for a successful response.
pub fn cache_control(revalidate_secs: u64) -> String {
    format!("s-maxage={revalidate_secs}, stale-while-revalidate={STALE_WHILE_REVALIDATE_SECS}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_for_missing_or_blank_vars() {
        let config = SocrataConfig::from_vars(None, Some("   ".to_string())).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.app_token, None);
    }

    #[test]
    fn token_is_trimmed() {
        let config = SocrataConfig::from_vars(Some("http://localhost:9000/x.json".into()), Some(" abc \n".into()))
            .unwrap();
        assert_eq!(config.base_url, "http://localhost:9000/x.json");
        assert_eq!(config.app_token.as_deref(), Some("abc"));
    }

    #[test]
    fn non_http_base_url_is_rejected() {
        let err = SocrataConfig::from_vars(Some("ftp://data.ny.gov".into()), None).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn cache_control_uses_revalidate_window() {
        let config = ServerConfig {
            bind: "127.0.0.1:3000".parse().unwrap(),
            revalidate_secs: 600,
        };
        assert_eq!(config.cache_control(), "s-maxage=600, stale-while-revalidate=86400");
    }
}
