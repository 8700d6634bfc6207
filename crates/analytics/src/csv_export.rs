use crate::error::AnalyticsError;
use crate::report::{Analytic, Analytics};
use rust_decimal::Decimal;
use std::io::{Read, Write};
use std::str::FromStr;

pub const ANALYTICS_CSV_HEADER: [&str; 7] =
    ["GroupKey", "Type", "Sum", "Avg", "Count", "Median", "Percentile90"];

/// One parsed line of an analytics CSV export.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsCsvRow {
    pub group_key: String,
    pub kind: String,
    pub sum: Decimal,
    pub avg: Decimal,
    pub count: u64,
    pub median: Decimal,
    pub percentile90: Decimal,
}

fn money(value: Decimal) -> String {
    format!("{:.2}", value.round_dp(2))
}

/// Writes the header and three rows per group, always in the order
/// Income, Expense, All.
///
/// The writer is flushed before returning; any error aborts the export.
pub fn write_analytics_csv<W: Write>(analytics: &Analytics, output: W) -> Result<(), AnalyticsError> {
    let mut writer = csv::Writer::from_writer(output);
    writer.write_record(ANALYTICS_CSV_HEADER)?;

    for group in &analytics.groups {
        let rows: [(&str, &Analytic); 3] = [
            ("Income", &group.data.income),
            ("Expense", &group.data.expense),
            ("All", &group.data.all),
        ];

        for (kind, data) in rows {
            writer.write_record([
                group.group_key.clone(),
                kind.to_string(),
                money(data.sum),
                money(data.avg),
                data.count.to_string(),
                money(data.median),
                money(data.percentile90),
            ])?;
        }
    }

    writer.flush()?;
    tracing::info!(groups = analytics.groups.len(), "CSV report generation completed.");
    Ok(())
}

fn decimal_field(record: &csv::StringRecord, index: usize, name: &str) -> Result<Decimal, AnalyticsError> {
    let raw = record
        .get(index)
        .ok_or_else(|| AnalyticsError::Parse(format!("missing column '{}'", name)))?;
    Decimal::from_str(raw).map_err(|e| AnalyticsError::Parse(format!("bad {} '{}': {}", name, raw, e)))
}

/// Parses a CSV produced by [`write_analytics_csv`] back into rows.
pub fn read_analytics_csv<R: Read>(input: R) -> Result<Vec<AnalyticsCsvRow>, AnalyticsError> {
    let mut reader = csv::Reader::from_reader(input);

    let headers = reader.headers()?.clone();
    if headers.iter().ne(ANALYTICS_CSV_HEADER.iter().copied()) {
        return Err(AnalyticsError::Parse(format!("unexpected header: {:?}", headers)));
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let count_raw = record.get(4).unwrap_or_default();
        let count = count_raw
            .parse::<u64>()
            .map_err(|e| AnalyticsError::Parse(format!("bad Count '{}': {}", count_raw, e)))?;

        rows.push(AnalyticsCsvRow {
            group_key: record.get(0).unwrap_or_default().to_string(),
            kind: record.get(1).unwrap_or_default().to_string(),
            sum: decimal_field(&record, 2, "Sum")?,
            avg: decimal_field(&record, 3, "Avg")?,
            count,
            median: decimal_field(&record, 5, "Median")?,
            percentile90: decimal_field(&record, 6, "Percentile90")?,
        });
    }

    Ok(rows)
}
