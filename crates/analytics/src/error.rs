use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Failed to write or read CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error while exporting analytics: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed analytics CSV: {0}")]
    Parse(String),
}
