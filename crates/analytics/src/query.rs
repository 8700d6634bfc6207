use chrono::{DateTime, Datelike, NaiveDate, Utc};
pub use core_types::SortDir;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Time granularity used to bucket transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupBy {
    #[default]
    Day,
    Month,
    Year,
}

impl GroupBy {
    /// Lenient parse: anything that is not `month` or `year` means `day`.
    pub fn parse(s: &str) -> Self {
        match s {
            "month" => GroupBy::Month,
            "year" => GroupBy::Year,
            _ => GroupBy::Day,
        }
    }

    /// Truncates a calendar day to the first day of its bucket.
    pub fn truncate(&self, date: NaiveDate) -> NaiveDate {
        let truncated = match self {
            GroupBy::Day => Some(date),
            GroupBy::Month => date.with_day(1),
            GroupBy::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1),
        };
        // Day 1 and January 1st exist for every representable year.
        truncated.unwrap_or(date)
    }

    /// The `YYYY-MM-DD` label of the bucket a timestamp falls into.
    pub fn group_key(&self, at: DateTime<Utc>) -> String {
        self.truncate(at.date_naive()).format("%Y-%m-%d").to_string()
    }
}

/// Secondary axis used to partition amounts inside a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitBy {
    Category,
    #[default]
    Type,
}

impl SplitBy {
    /// Only `category` selects the category split; everything else splits by type.
    pub fn parse(s: &str) -> Self {
        match s {
            "category" => SplitBy::Category,
            _ => SplitBy::Type,
        }
    }
}

/// The statistic groups are ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    Sum,
    Avg,
    Count,
    Median,
    Percentile90,
    #[default]
    GroupKey,
}

impl SortBy {
    /// Unknown or empty values sort by group key.
    pub fn parse(s: &str) -> Self {
        match s {
            "sum" => SortBy::Sum,
            "avg" => SortBy::Avg,
            "count" => SortBy::Count,
            "median" => SortBy::Median,
            "percentile90" => SortBy::Percentile90,
            _ => SortBy::GroupKey,
        }
    }
}

impl fmt::Display for GroupBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GroupBy::Day => "day",
            GroupBy::Month => "month",
            GroupBy::Year => "year",
        };
        f.write_str(s)
    }
}

/// A fully resolved analytics request over the closed interval `[from, to]`.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsQuery {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub group_by: GroupBy,
    pub split_by: SplitBy,
    pub sort_by: SortBy,
    pub sort_dir: SortDir,
}

impl AnalyticsQuery {
    /// A query with the default grouping (day), split (type) and ordering.
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self {
            from,
            to,
            group_by: GroupBy::default(),
            split_by: SplitBy::default(),
            sort_by: SortBy::default(),
            sort_dir: SortDir::default(),
        }
    }
}
