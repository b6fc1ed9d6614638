//! Tracing subscriber setup.
//!
//! Logs go to stderr so `credits summary --json` and `credits export` can be
//! piped safely. `RUST_LOG` overrides the default filter.

use tracing_subscriber::EnvFilter;

use crate::error::AppError;

pub const DEFAULT_FILTER: &str = "ny_credits=info";

pub fn init(verbose: bool) -> Result<(), AppError> {
    let default = if verbose { "ny_credits=debug" } else { DEFAULT_FILTER };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default))
        .map_err(|e| AppError::Config(format!("Invalid log filter: {e}")))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| AppError::Config(format!("Failed to initialise logging: {e}")))
}
