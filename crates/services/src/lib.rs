//! # Tally Services
//!
//! The validation boundary between the HTTP layer and the store.
//!
//! - `TransactionService`: id and field validation, then CRUD and CSV export.
//! - `AnalyticsService`: date-range validation and option defaults, then
//!   aggregation through `analytics::AnalyticsEngine`.
//!
//! Each service sees persistence only through a narrow capability trait
//! (`TransactionStore`, `AnalyticsSource`), implemented for `DbRepository` and
//! for the process-local `InMemoryStore`.

pub mod analytics_service;
pub mod error;
pub mod memory;
pub mod store;
pub mod transaction_service;


pub use analytics_service::{AnalyticsParams, AnalyticsService};
pub use error::ServiceError;
pub use memory::InMemoryStore;
pub use store::{AnalyticsSource, TransactionStore};
pub use transaction_service::TransactionService;

pub use database::{TransactionFilter, TransactionSortBy};
