use crate::error::AppError;
use chrono::{DateTime, NaiveDate, Utc};
use core_types::{SortDir, TransactionDraft, TransactionType};
use rust_decimal::Decimal;
use serde::Deserialize;
use services::{AnalyticsParams, TransactionFilter, TransactionSortBy};

/// Body of `POST /api/items` and `PUT /api/items/:id`.
#[derive(Debug, Deserialize)]
pub struct SaveTransactionReq {
    #[serde(rename = "type")]
    pub kind: String,
    pub category: String,
    pub amount: Decimal,
    /// `YYYY-MM-DD`; empty or missing means now.
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub description: String,
}

impl SaveTransactionReq {
    pub fn into_draft(self) -> Result<TransactionDraft, AppError> {
        let date = match non_empty(self.date) {
            Some(raw) => Some(parse_timestamp(&raw)?),
            None => None,
        };
        Ok(TransactionDraft {
            kind: self.kind,
            category: self.category,
            amount: self.amount,
            date,
            description: self.description,
        })
    }
}

/// Query string of `GET /api/items` and `GET /api/items/export`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemsQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub category: Option<String>,
    pub sort_by: Option<String>,
    pub sort_dir: Option<String>,
}

impl ItemsQuery {
    pub fn into_filter(self) -> Result<TransactionFilter, AppError> {
        let from = non_empty(self.from).map(|d| start_of_day(&d)).transpose()?;
        let to = non_empty(self.to).map(|d| end_of_day(&d)).transpose()?;

        // "all" is what the listing UI sends for "no type filter".
        let kind = match non_empty(self.kind) {
            Some(k) if k == "all" => None,
            Some(k) => Some(k.parse::<TransactionType>()?),
            None => None,
        };

        Ok(TransactionFilter {
            from,
            to,
            kind,
            category: non_empty(self.category),
            sort_by: TransactionSortBy::parse(self.sort_by.as_deref().unwrap_or_default()),
            sort_dir: SortDir::parse(self.sort_dir.as_deref().unwrap_or_default()),
        })
    }
}

/// Query string of `GET /api/analytics` and `GET /api/analytics/export`.
#[derive(Debug, Default, Deserialize)]
pub struct AnalyticsQueryParams {
    pub from: Option<String>,
    pub to: Option<String>,
    #[serde(rename = "groupby")]
    pub group_by: Option<String>,
    #[serde(rename = "splitby")]
    pub split_by: Option<String>,
    #[serde(rename = "sortby")]
    pub sort_by: Option<String>,
    #[serde(rename = "sortdir")]
    pub sort_dir: Option<String>,
}

impl AnalyticsQueryParams {
    /// Splits the query into the required date range and the optional options.
    pub fn into_parts(self) -> Result<(DateTime<Utc>, DateTime<Utc>, AnalyticsParams), AppError> {
        let from = non_empty(self.from)
            .ok_or_else(|| AppError::BadRequest("'from' is required".to_string()))?;
        let to = non_empty(self.to)
            .ok_or_else(|| AppError::BadRequest("'to' is required".to_string()))?;

        let params = AnalyticsParams {
            group_by: self.group_by.unwrap_or_default(),
            split_by: self.split_by.unwrap_or_default(),
            sort_by: self.sort_by.unwrap_or_default(),
            sort_dir: self.sort_dir.unwrap_or_default(),
        };
        Ok((start_of_day(&from)?, end_of_day(&to)?, params))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_day(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest(format!("invalid date '{}', expected YYYY-MM-DD", raw)))
}

/// Midnight UTC of the given calendar day.
pub fn start_of_day(raw: &str) -> Result<DateTime<Utc>, AppError> {
    let day = parse_day(raw)?;
    Ok(day.and_time(chrono::NaiveTime::MIN).and_utc())
}

/// The last representable instant of the given calendar day, so that `to` is inclusive.
pub fn end_of_day(raw: &str) -> Result<DateTime<Utc>, AppError> {
    let day = parse_day(raw)?;
    day.and_hms_nano_opt(23, 59, 59, 999_999_999)
        .map(|dt| dt.and_utc())
        .ok_or_else(|| AppError::BadRequest(format!("invalid date '{}'", raw)))
}

/// A transaction date: a calendar day, or a full RFC 3339 timestamp.
fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, AppError> {
    if let Ok(at) = DateTime::parse_from_rfc3339(raw.trim()) {
        return Ok(at.with_timezone(&Utc));
    }
    start_of_day(raw)
}
