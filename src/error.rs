//! Crate-wide error type.
//!
//! Every fallible operation returns `AppError`. The binary maps it to an exit
//! code; the HTTP layer collapses it into a uniform 500 response.

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Bad or missing configuration (bind address, base URL, ...).
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Socrata answered with a non-success status.
    #[error("Socrata request failed ({status}): {body}")]
    UpstreamStatus { status: u16, body: String },

    /// The request never produced a response.
    #[error("Socrata request failed: {0}")]
    Transport(String),

    /// The response body was not the JSON shape we expected.
    #[error("Failed to parse Socrata response: {0}")]
    Decode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Server error: {0}")]
    Server(String),
}

impl AppError {
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Config(_) | AppError::Io(_) | AppError::Csv(_) => 2,
            AppError::UpstreamStatus { .. } | AppError::Transport(_) | AppError::Decode(_) => 4,
            AppError::Server(_) => 1,
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AppError::Decode(err.to_string())
        } else {
            AppError::Transport(err.to_string())
        }
    }
}
