use super::*;

use anyhow::Result;
use chrono::{DateTime, TimeZone, Utc};
use core_types::{Transaction, TransactionType};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
}

fn tr(kind: TransactionType, category: &str, amount: Decimal, date: DateTime<Utc>) -> Transaction {
    Transaction::from_parts(Uuid::new_v4(), kind, category.to_string(), amount, date, String::new())
}

fn query(from: DateTime<Utc>, to: DateTime<Utc>) -> AnalyticsQuery {
    AnalyticsQuery::new(from, to)
}

fn november_sample() -> Vec<Transaction> {
    vec![
        tr(TransactionType::Income, "salary", dec!(100), at(2025, 11, 27)),
        tr(TransactionType::Expense, "food", dec!(40), at(2025, 11, 27)),
        tr(TransactionType::Income, "gift", dec!(20), at(2025, 11, 27)),
    ]
}

#[test]
fn test_percentile_interpolates_between_ranks() {
    let sample = [dec!(1), dec!(2), dec!(3), dec!(4)];

    assert_eq!(stats::percentile(&sample, dec!(0.5)), dec!(2.5));
    assert_eq!(stats::percentile(&sample, dec!(0.9)), dec!(3.7));
    assert_eq!(stats::percentile(&[dec!(7)], dec!(0.9)), dec!(7));
    assert_eq!(stats::percentile(&[], dec!(0.5)), Decimal::ZERO);
}

#[test]
fn test_from_amounts_sorts_before_ranking() {
    let a = Analytic::from_amounts(&[dec!(30), dec!(10), dec!(20)]);

    assert_eq!(a.sum, dec!(60));
    assert_eq!(a.avg, dec!(20));
    assert_eq!(a.count, 3);
    assert_eq!(a.median, dec!(20));
    assert_eq!(a.percentile90, dec!(28));
}

#[test]
fn test_daily_split_by_type_scenario() {
    let engine = AnalyticsEngine::new();
    let result = engine.aggregate(&november_sample(), &query(at(2025, 11, 1), at(2025, 11, 30)));

    assert_eq!(result.groups.len(), 1);
    let group = &result.groups[0];
    assert_eq!(group.group_key, "2025-11-27");

    let data = &group.data;
    assert_eq!(data.income.sum, dec!(120));
    assert_eq!(data.income.count, 2);
    assert_eq!(data.income.median, dec!(60));
    assert_eq!(data.income.percentile90, dec!(92));
    assert_eq!(data.expense.sum, dec!(40));
    assert_eq!(data.expense.count, 1);

    assert_eq!(data.all.sum, dec!(80));
    assert_eq!(data.all.count, 3);
    assert_eq!(data.all.avg, dec!(80) / dec!(3));
    assert_eq!(data.all.median, dec!(10));
    assert_eq!(data.all.percentile90, dec!(66));

    assert_eq!(data.splits.keys().collect::<Vec<_>>(), vec!["expense", "income"]);
    assert_eq!(data.splits["income"], data.income);
}

#[test]
fn test_summary_matches_single_bucket_totals() {
    let engine = AnalyticsEngine::new();
    let result = engine.aggregate(&november_sample(), &query(at(2025, 11, 1), at(2025, 11, 30)));

    assert_eq!(result.summary.income.sum, dec!(120));
    assert_eq!(result.summary.expense.sum, dec!(40));
    assert_eq!(result.summary.all.sum, dec!(80));
    assert_eq!(result.summary.all.count, 3);
    assert!(result.summary.splits.is_empty());
}

#[test]
fn test_empty_range_yields_zero_summary_and_no_groups() {
    let engine = AnalyticsEngine::new();
    let result = engine.aggregate(&november_sample(), &query(at(2024, 1, 1), at(2024, 12, 31)));

    assert_eq!(result, Analytics::default());
    assert_eq!(result.summary.all, Analytic::default());
    assert!(result.groups.is_empty());
}

#[test]
fn test_rows_outside_range_are_ignored() {
    let mut rows = november_sample();
    rows.push(tr(TransactionType::Income, "salary", dec!(999), at(2025, 12, 1)));

    let result = AnalyticsEngine::new().aggregate(&rows, &query(at(2025, 11, 1), at(2025, 11, 30)));

    assert_eq!(result.summary.income.sum, dec!(120));
    assert_eq!(result.groups.len(), 1);
}

#[test]
fn test_month_and_year_buckets_collapse_to_first_day() {
    let rows = vec![
        tr(TransactionType::Income, "salary", dec!(10), at(2025, 11, 3)),
        tr(TransactionType::Income, "salary", dec!(20), at(2025, 11, 27)),
        tr(TransactionType::Expense, "rent", dec!(5), at(2025, 12, 2)),
    ];
    let engine = AnalyticsEngine::new();

    let mut q = query(at(2025, 1, 1), at(2025, 12, 31));
    q.group_by = GroupBy::Month;
    q.sort_dir = SortDir::Asc;
    let monthly = engine.aggregate(&rows, &q);
    let keys: Vec<&str> = monthly.groups.iter().map(|g| g.group_key.as_str()).collect();
    assert_eq!(keys, vec!["2025-11-01", "2025-12-01"]);
    assert_eq!(monthly.groups[0].data.income.count, 2);

    q.group_by = GroupBy::Year;
    let yearly = engine.aggregate(&rows, &q);
    assert_eq!(yearly.groups.len(), 1);
    assert_eq!(yearly.groups[0].group_key, "2025-01-01");
    assert_eq!(yearly.groups[0].data.all.sum, dec!(25));
}

#[test]
fn test_split_by_category_leaves_type_fields_zero() {
    let mut q = query(at(2025, 11, 1), at(2025, 11, 30));
    q.split_by = SplitBy::Category;

    let result = AnalyticsEngine::new().aggregate(&november_sample(), &q);
    let data = &result.groups[0].data;

    assert_eq!(data.income, Analytic::default());
    assert_eq!(data.expense, Analytic::default());
    assert_eq!(data.all.sum, dec!(80));
    assert_eq!(data.splits.keys().collect::<Vec<_>>(), vec!["food", "gift", "salary"]);
    assert_eq!(data.splits["salary"].sum, dec!(100));
}

#[test]
fn test_unknown_sort_key_orders_by_group_key_descending() {
    let rows = vec![
        tr(TransactionType::Income, "a", dec!(1), at(2025, 11, 1)),
        tr(TransactionType::Income, "a", dec!(1), at(2025, 11, 3)),
        tr(TransactionType::Income, "a", dec!(1), at(2025, 11, 2)),
    ];
    let mut q = query(at(2025, 11, 1), at(2025, 11, 30));
    q.sort_by = SortBy::parse("bogus");
    q.sort_dir = SortDir::parse("");

    let result = AnalyticsEngine::new().aggregate(&rows, &q);
    let keys: Vec<&str> = result.groups.iter().map(|g| g.group_key.as_str()).collect();

    assert_eq!(keys, vec!["2025-11-03", "2025-11-02", "2025-11-01"]);
}

#[test]
fn test_sort_by_sum_breaks_ties_by_key_ascending() {
    let rows = vec![
        tr(TransactionType::Income, "a", dec!(50), at(2025, 11, 3)),
        tr(TransactionType::Income, "a", dec!(10), at(2025, 11, 2)),
        tr(TransactionType::Income, "a", dec!(50), at(2025, 11, 1)),
    ];
    let engine = AnalyticsEngine::new();

    let mut q = query(at(2025, 11, 1), at(2025, 11, 30));
    q.sort_by = SortBy::Sum;
    q.sort_dir = SortDir::Desc;
    let desc = engine.aggregate(&rows, &q);
    let keys: Vec<&str> = desc.groups.iter().map(|g| g.group_key.as_str()).collect();
    assert_eq!(keys, vec!["2025-11-01", "2025-11-03", "2025-11-02"]);

    q.sort_dir = SortDir::Asc;
    let asc = engine.aggregate(&rows, &q);
    let keys: Vec<&str> = asc.groups.iter().map(|g| g.group_key.as_str()).collect();
    assert_eq!(keys, vec!["2025-11-02", "2025-11-01", "2025-11-03"]);
}

#[test]
fn test_combined_invariants_hold_for_every_group() {
    let rows = vec![
        tr(TransactionType::Income, "salary", dec!(1000), at(2025, 1, 5)),
        tr(TransactionType::Expense, "rent", dec!(700), at(2025, 1, 5)),
        tr(TransactionType::Expense, "food", dec!(35.40), at(2025, 1, 6)),
        tr(TransactionType::Expense, "food", dec!(12.15), at(2025, 1, 6)),
        tr(TransactionType::Income, "refund", dec!(8.99), at(2025, 1, 7)),
    ];

    let result = AnalyticsEngine::new().aggregate(&rows, &query(at(2025, 1, 1), at(2025, 1, 31)));

    assert_eq!(result.groups.len(), 3);
    for group in &result.groups {
        let d = &group.data;
        assert_eq!(d.all.count, d.income.count + d.expense.count);
        assert_eq!(d.all.sum, d.income.sum - d.expense.sum);
    }
    let s = &result.summary;
    assert_eq!(s.all.count, 5);
    assert_eq!(s.all.sum, dec!(1008.99) - dec!(747.55));
}

#[test]
fn test_lenient_option_parsing() {
    assert_eq!(GroupBy::parse("week"), GroupBy::Day);
    assert_eq!(GroupBy::parse("month"), GroupBy::Month);
    assert_eq!(SplitBy::parse(""), SplitBy::Type);
    assert_eq!(SplitBy::parse("transtype"), SplitBy::Type);
    assert_eq!(SplitBy::parse("category"), SplitBy::Category);
    assert_eq!(SortBy::parse("percentile90"), SortBy::Percentile90);
    assert_eq!(SortDir::parse("ASC"), SortDir::Desc);
}

#[test]
fn test_csv_rows_follow_income_expense_all_order() -> Result<()> {
    let result = AnalyticsEngine::new().aggregate(&november_sample(), &query(at(2025, 11, 1), at(2025, 11, 30)));

    let mut buf = Vec::new();
    write_analytics_csv(&result, &mut buf)?;
    let text = String::from_utf8(buf)?;
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], "GroupKey,Type,Sum,Avg,Count,Median,Percentile90");
    assert_eq!(lines[1], "2025-11-27,Income,120.00,60.00,2,60.00,92.00");
    assert_eq!(lines[2], "2025-11-27,Expense,40.00,40.00,1,40.00,40.00");
    assert_eq!(lines[3], "2025-11-27,All,80.00,26.67,3,10.00,66.00");
    assert_eq!(lines.len(), 4);

    Ok(())
}

#[test]
fn test_csv_round_trip_preserves_values_to_two_places() -> Result<()> {
    let rows = vec![
        tr(TransactionType::Income, "salary", dec!(1000.10), at(2025, 3, 1)),
        tr(TransactionType::Expense, "food", dec!(33.333), at(2025, 3, 1)),
        tr(TransactionType::Expense, "food", dec!(12.5), at(2025, 3, 2)),
    ];
    let result = AnalyticsEngine::new().aggregate(&rows, &query(at(2025, 3, 1), at(2025, 3, 31)));

    let mut buf = Vec::new();
    write_analytics_csv(&result, &mut buf)?;
    let parsed = read_analytics_csv(buf.as_slice())?;

    assert_eq!(parsed.len(), result.groups.len() * 3);
    for (chunk, group) in parsed.chunks(3).zip(&result.groups) {
        let expected = [
            ("Income", &group.data.income),
            ("Expense", &group.data.expense),
            ("All", &group.data.all),
        ];
        for (row, (kind, data)) in chunk.iter().zip(expected) {
            assert_eq!(row.group_key, group.group_key);
            assert_eq!(row.kind, kind);
            assert_eq!(row.sum, data.sum.round_dp(2));
            assert_eq!(row.avg, data.avg.round_dp(2));
            assert_eq!(row.count, data.count);
            assert_eq!(row.median, data.median.round_dp(2));
            assert_eq!(row.percentile90, data.percentile90.round_dp(2));
        }
    }

    Ok(())
}

#[test]
fn test_read_rejects_foreign_header() {
    let input = "Key,Kind\n2025-01-01,Income\n";
    assert!(matches!(read_analytics_csv(input.as_bytes()), Err(AnalyticsError::Parse(_))));
}

#[test]
fn test_json_uses_pascal_case_fields() -> Result<()> {
    let result = AnalyticsEngine::new().aggregate(&november_sample(), &query(at(2025, 11, 1), at(2025, 11, 30)));
    let json = serde_json::to_value(&result)?;

    assert_eq!(json["Groups"][0]["GroupKey"], "2025-11-27");
    assert_eq!(json["Groups"][0]["Data"]["All"]["Count"], 3);
    assert_eq!(json["Summary"]["Income"]["Sum"], 120.0);
    assert!(json["Groups"][0]["Data"]["Splits"]["income"].is_object());

    Ok(())
}
