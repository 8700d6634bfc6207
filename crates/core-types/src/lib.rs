pub mod enums;
pub mod error;
pub mod structs;

#[cfg(test)]
mod tests;

// Re-export the core types to provide a clean public API.
pub use enums::{SortDir, TransactionType};
pub use error::CoreError;
pub use structs::{Transaction, TransactionDraft};
