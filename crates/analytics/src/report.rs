use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A statistical summary over a set of amounts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Analytic {
    pub sum: Decimal,
    pub avg: Decimal,
    pub count: u64,
    pub median: Decimal,
    pub percentile90: Decimal,
}

/// Income, expense and combined statistics for one bucket (or the whole range),
/// plus one entry per value of the split dimension.
///
/// `splits` is a `BTreeMap` so that serialization iterates keys in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AnalyticByType {
    pub income: Analytic,
    pub expense: Analytic,
    pub all: Analytic,
    #[serde(default)]
    pub splits: BTreeMap<String, Analytic>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AnalyticGroup {
    pub group_key: String,
    pub data: AnalyticByType,
}

/// The final output of the `AnalyticsEngine`.
///
/// An empty date range yields a zeroed `summary` and no groups; the value is
/// never absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Analytics {
    pub summary: AnalyticByType,
    pub groups: Vec<AnalyticGroup>,
}
