use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    #[error("dateStart ({start}) is after dateEnd ({end})")]
    DateStartAfterDateEnd { start: String, end: String },

    #[error("Too many intervals: {count} exceeds the maximum of {max}")]
    TooManyIntervals { count: usize, max: usize },

    #[error("Invalid threshold: {0}")]
    InvalidThreshold(String),

    #[error("Search failed ({status}): {message}")]
    Search { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
