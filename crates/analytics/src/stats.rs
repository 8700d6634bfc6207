use crate::report::Analytic;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Continuous percentile over an ascending slice, interpolating linearly
/// between the two closest ranks at position `p * (n - 1)`.
///
/// Returns zero for an empty sample.
pub fn percentile(sorted: &[Decimal], p: Decimal) -> Decimal {
    match sorted.len() {
        0 => Decimal::ZERO,
        1 => sorted[0],
        n => {
            let position = p * Decimal::from(n - 1);
            let lower = position.floor();
            let fraction = position - lower;
            let lo = lower.to_usize().unwrap_or(0).min(n - 1);
            let hi = (lo + 1).min(n - 1);
            sorted[lo] + (sorted[hi] - sorted[lo]) * fraction
        }
    }
}

impl Analytic {
    /// Computes sum, mean, count, median and 90th percentile of a sample.
    pub fn from_amounts(amounts: &[Decimal]) -> Self {
        if amounts.is_empty() {
            return Self::default();
        }

        let mut sorted = amounts.to_vec();
        sorted.sort();

        let sum: Decimal = sorted.iter().sum();
        let count = sorted.len() as u64;

        Self {
            sum,
            avg: sum / Decimal::from(count),
            count,
            median: percentile(&sorted, Decimal::new(5, 1)),
            percentile90: percentile(&sorted, Decimal::new(9, 1)),
        }
    }

    /// The net "all" aggregate derived from the per-type statistics.
    ///
    /// Sum and count are exact. Median and 90th percentile are averaged from
    /// the two per-type values instead of being recomputed over the merged
    /// sample; existing reports depend on these numbers.
    pub fn combined(income: &Analytic, expense: &Analytic) -> Self {
        let sum = income.sum - expense.sum;
        let count = income.count + expense.count;
        let avg = if count == 0 {
            Decimal::ZERO
        } else {
            sum / Decimal::from(count)
        };

        Self {
            sum,
            avg,
            count,
            median: (income.median - expense.median) / Decimal::from(2),
            percentile90: (income.percentile90 + expense.percentile90) / Decimal::from(2),
        }
    }
}
