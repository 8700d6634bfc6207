use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid transaction type: '{0}' (expected 'income' or 'expense')")]
    InvalidType(String),

    #[error("category cannot be empty")]
    EmptyCategory,

    #[error("amount must be positive, got {0}")]
    NonPositiveAmount(String),

    #[error("amount cannot have more than 2 decimal places, got {0}")]
    TooManyDecimals(String),
}
