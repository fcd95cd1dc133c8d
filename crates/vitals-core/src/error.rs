//! Error types for Vitals

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Snapshot for {0} has no expenses")]
    EmptyExpenses(String),

    #[error("Explanation backend error: {0}")]
    Explanation(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Prompt error: {0}")]
    Prompt(String),
}

impl Error {
    /// True for errors caused by the caller's snapshot data
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::InvalidInput(_) | Error::EmptyExpenses(_))
    }

    /// True when the text-generation collaborator failed or was unreachable
    pub fn is_backend_error(&self) -> bool {
        matches!(self, Error::Explanation(_) | Error::Http(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
