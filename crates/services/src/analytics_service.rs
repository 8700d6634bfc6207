use crate::error::ServiceError;
use crate::store::AnalyticsSource;
use analytics::{
    write_analytics_csv, Analytics, AnalyticsEngine, AnalyticsQuery, GroupBy, SortBy, SortDir,
    SplitBy,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// The raw, optional grouping and ordering options of an analytics request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalyticsParams {
    pub group_by: String,
    pub split_by: String,
    pub sort_by: String,
    pub sort_dir: String,
}

impl AnalyticsParams {
    /// Applies the defaults (`day`, `type`) and parses every option leniently.
    pub fn resolve(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> AnalyticsQuery {
        let group_by = if self.group_by.is_empty() { "day" } else { self.group_by.as_str() };
        let split_by = if self.split_by.is_empty() { "type" } else { self.split_by.as_str() };

        AnalyticsQuery {
            from,
            to,
            group_by: GroupBy::parse(group_by),
            split_by: SplitBy::parse(split_by),
            sort_by: SortBy::parse(&self.sort_by),
            sort_dir: SortDir::parse(&self.sort_dir),
        }
    }
}

/// Validates analytics requests and delegates the math to `AnalyticsEngine`.
#[derive(Clone)]
pub struct AnalyticsService {
    source: Arc<dyn AnalyticsSource>,
    engine: Arc<AnalyticsEngine>,
}

impl AnalyticsService {
    pub fn new(source: Arc<dyn AnalyticsSource>) -> Self {
        Self {
            source,
            engine: Arc::new(AnalyticsEngine::new()),
        }
    }

    /// Builds the grouped report for `[from, to]`.
    ///
    /// An inverted range fails with `ServiceError::InvalidRange` before the
    /// store is queried.
    pub async fn get_analytics(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        params: &AnalyticsParams,
    ) -> Result<Analytics, ServiceError> {
        if from > to {
            tracing::warn!(%from, %to, "Invalid date range in analytics request.");
            return Err(ServiceError::InvalidRange);
        }

        let query = params.resolve(from, to);
        let rows = self.source.transactions_in_range(from, to).await.map_err(|e| {
            tracing::error!(error = %e, "Analytics repository error.");
            e
        })?;

        Ok(self.engine.aggregate(&rows, &query))
    }

    /// Same report as [`AnalyticsService::get_analytics`], rendered as CSV.
    pub async fn export_csv(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        params: &AnalyticsParams,
    ) -> Result<Vec<u8>, ServiceError> {
        let report = self.get_analytics(from, to, params).await?;

        let mut body = Vec::new();
        write_analytics_csv(&report, &mut body).map_err(|e| {
            tracing::error!(error = %e, "Error writing analytics CSV.");
            e
        })?;
        Ok(body)
    }
}
