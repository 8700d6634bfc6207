use crate::query::{AnalyticsQuery, SortBy, SortDir, SplitBy};
use crate::report::{Analytic, AnalyticByType, AnalyticGroup, Analytics};
use core_types::{Transaction, TransactionType};
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// The raw amounts collected for one bucket before any statistics are computed.
#[derive(Debug, Default)]
struct Bucket {
    income: Vec<Decimal>,
    expense: Vec<Decimal>,
    splits: BTreeMap<String, Vec<Decimal>>,
}

impl Bucket {
    fn push(&mut self, tr: &Transaction, split_by: SplitBy) {
        match tr.kind {
            TransactionType::Income => self.income.push(tr.amount),
            TransactionType::Expense => self.expense.push(tr.amount),
        }

        let split_key = match split_by {
            SplitBy::Type => tr.kind.as_str().to_string(),
            SplitBy::Category => tr.category.clone(),
        };
        self.splits.entry(split_key).or_default().push(tr.amount);
    }

    fn into_analytic(self, split_by: SplitBy) -> AnalyticByType {
        let income = Analytic::from_amounts(&self.income);
        let expense = Analytic::from_amounts(&self.expense);
        let all = Analytic::combined(&income, &expense);

        let splits: BTreeMap<String, Analytic> = self
            .splits
            .into_iter()
            .map(|(key, amounts)| (key, Analytic::from_amounts(&amounts)))
            .collect();

        // Explicit income/expense fields are only meaningful when the split
        // dimension is the transaction type.
        let (income, expense) = match split_by {
            SplitBy::Type => (income, expense),
            SplitBy::Category => (Analytic::default(), Analytic::default()),
        };

        AnalyticByType {
            income,
            expense,
            all,
            splits,
        }
    }
}

/// A stateless calculator that turns raw transactions into grouped statistics.
#[derive(Debug, Default)]
pub struct AnalyticsEngine {}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The main entry point for building an `Analytics` report.
    ///
    /// # Arguments
    ///
    /// * `transactions` - Every transaction to consider. Rows dated outside
    ///   `[query.from, query.to]` are ignored.
    /// * `query` - Grouping, split and ordering options.
    ///
    /// The caller is responsible for checking `from <= to`; an inverted range
    /// simply matches nothing.
    pub fn aggregate(&self, transactions: &[Transaction], query: &AnalyticsQuery) -> Analytics {
        let in_range: Vec<&Transaction> = transactions
            .iter()
            .filter(|tr| tr.date >= query.from && tr.date <= query.to)
            .collect();

        if in_range.is_empty() {
            return Analytics::default();
        }

        let summary = self.summarize(&in_range);

        let mut buckets: BTreeMap<String, Bucket> = BTreeMap::new();
        for tr in &in_range {
            buckets
                .entry(query.group_by.group_key(tr.date))
                .or_default()
                .push(tr, query.split_by);
        }

        let mut groups: Vec<AnalyticGroup> = buckets
            .into_iter()
            .map(|(group_key, bucket)| AnalyticGroup {
                group_key,
                data: bucket.into_analytic(query.split_by),
            })
            .collect();

        sort_groups(&mut groups, query.sort_by, query.sort_dir);

        tracing::debug!(
            groups = groups.len(),
            transactions = in_range.len(),
            group_by = %query.group_by,
            "Aggregated analytics."
        );

        Analytics { summary, groups }
    }

    /// Whole-range totals, using the same combined formula as the buckets.
    fn summarize(&self, transactions: &[&Transaction]) -> AnalyticByType {
        let (income, expense): (Vec<&Transaction>, Vec<&Transaction>) = transactions
            .iter()
            .partition(|tr| tr.kind == TransactionType::Income);

        let income_amounts: Vec<Decimal> = income.iter().map(|tr| tr.amount).collect();
        let expense_amounts: Vec<Decimal> = expense.iter().map(|tr| tr.amount).collect();

        let income = Analytic::from_amounts(&income_amounts);
        let expense = Analytic::from_amounts(&expense_amounts);
        let all = Analytic::combined(&income, &expense);

        AnalyticByType {
            income,
            expense,
            all,
            splits: BTreeMap::new(),
        }
    }
}

/// Reads the statistic a group is ranked by, taken from its combined aggregate.
fn sort_value(group: &AnalyticGroup, sort_by: SortBy) -> Option<Decimal> {
    let all = &group.data.all;
    match sort_by {
        SortBy::Sum => Some(all.sum),
        SortBy::Avg => Some(all.avg),
        SortBy::Count => Some(Decimal::from(all.count)),
        SortBy::Median => Some(all.median),
        SortBy::Percentile90 => Some(all.percentile90),
        SortBy::GroupKey => None,
    }
}

/// Orders groups by the requested statistic; equal values fall back to the
/// group key in ascending order regardless of direction.
fn sort_groups(groups: &mut [AnalyticGroup], sort_by: SortBy, sort_dir: SortDir) {
    groups.sort_by(|a, b| {
        let primary = match (sort_value(a, sort_by), sort_value(b, sort_by)) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => a.group_key.cmp(&b.group_key),
        };
        let primary = match sort_dir {
            SortDir::Asc => primary,
            SortDir::Desc => primary.reverse(),
        };
        match primary {
            Ordering::Equal => a.group_key.cmp(&b.group_key),
            other => other,
        }
    });
}
