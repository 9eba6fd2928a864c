use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConsolidationError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad report: {0}")]
    BadReport(String),

    #[error("Unknown state: {0}")]
    UnknownState(String),

    #[error("Unrecognized date: {0}")]
    InvalidDate(String),
}

pub type Result<T> = std::result::Result<T, ConsolidationError>;
