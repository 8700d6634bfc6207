//! # Tally Analytics Engine
//!
//! This crate turns raw income/expense transactions into grouped statistical
//! summaries and renders them as CSV.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of external systems.
//!   It depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** The `AnalyticsEngine` is a stateless calculator. It takes
//!   transactions and an `AnalyticsQuery` as input and produces an `Analytics` report.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: Buckets, splits, aggregates and sorts.
//! - `AnalyticsQuery`, `GroupBy`, `SplitBy`, `SortBy`, `SortDir`: The request options,
//!   each with a lenient `parse` that falls back to the documented default.
//! - `Analytics`, `AnalyticGroup`, `AnalyticByType`, `Analytic`: The report structs.
//! - `write_analytics_csv` / `read_analytics_csv`: The CSV export format.
//! - `AnalyticsError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod csv_export;
pub mod engine;
pub mod error;
pub mod query;
pub mod report;
pub mod stats;

#[cfg(test)]
mod tests;

// Re-export the key components to create a clean, public-facing API.
pub use csv_export::{read_analytics_csv, write_analytics_csv, AnalyticsCsvRow};
pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use query::{AnalyticsQuery, GroupBy, SortBy, SortDir, SplitBy};
pub use report::{Analytic, AnalyticByType, AnalyticGroup, Analytics};
