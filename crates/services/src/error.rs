use analytics::AnalyticsError;
use core_types::CoreError;
use database::DbError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Invalid transaction: {0}")]
    Validation(#[from] CoreError),

    #[error("Invalid transaction id: '{0}'")]
    InvalidId(String),

    #[error("'from' date cannot be after 'to'")]
    InvalidRange,

    #[error("Transaction not found")]
    NotFound,

    #[error("Store error: {0}")]
    Store(DbError),

    #[error("CSV export failed: {0}")]
    Export(#[from] AnalyticsError),
}

impl From<csv::Error> for ServiceError {
    fn from(err: csv::Error) -> Self {
        ServiceError::Export(AnalyticsError::Csv(err))
    }
}

impl From<DbError> for ServiceError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound => ServiceError::NotFound,
            other => ServiceError::Store(other),
        }
    }
}

impl ServiceError {
    /// Whether the caller sent something unacceptable (as opposed to a server fault).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ServiceError::Validation(_) | ServiceError::InvalidId(_) | ServiceError::InvalidRange
        )
    }
}
