//! Aggregation engine: fold a transaction list into per-category buckets and
//! income/expense/balance statistics for one period window.
//!
//! Aggregation never fails: transactions whose `category_id` resolves to no
//! registered category are silently excluded from totals and buckets. A
//! corrupt or partially-imported reference must not take down the view.

use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::{
    categories::{category_by_id, Category, TransactionType},
    ledger::Transaction,
    period::TimePeriod,
};

/// Derived, never stored; recomputed on every read.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PeriodStats {
    pub income: f64,
    pub expense: f64,
    pub balance: f64,
}

/// Per-category aggregation result.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBucket {
    pub category: &'static Category,
    pub total: f64,
    pub count: usize,
}

/// Category buckets partitioned by transaction type, each side sorted by
/// total descending. Feeds the dual-ring chart.
#[derive(Debug, Clone, Default)]
pub struct TypeBreakdown {
    pub expense_buckets: Vec<CategoryBucket>,
    pub income_buckets: Vec<CategoryBucket>,
    pub expense_total: f64,
    pub income_total: f64,
}

/// Keeps only transactions inside the window containing `reference`,
/// preserving relative order. Non-destructive.
pub fn filter_by_period(
    transactions: &[Transaction],
    reference: NaiveDate,
    period: TimePeriod,
) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|t| period.contains(t.date, reference))
        .cloned()
        .collect()
}

/// Sums amounts into income/expense totals by resolved category type.
/// `balance = income - expense` always holds.
pub fn compute_stats(transactions: &[Transaction]) -> PeriodStats {
    let mut income = 0.0;
    let mut expense = 0.0;
    for transaction in transactions {
        match category_by_id(&transaction.category_id).map(|c| c.kind) {
            Some(TransactionType::Income) => income += transaction.amount,
            Some(TransactionType::Expense) => expense += transaction.amount,
            None => {}
        }
    }
    PeriodStats {
        income,
        expense,
        balance: income - expense,
    }
}

/// One bucket per distinct resolvable category, sorted by total descending.
/// Ties keep first-encounter order (the sort is stable).
pub fn group_by_category(transactions: &[Transaction]) -> Vec<CategoryBucket> {
    let mut buckets: Vec<CategoryBucket> = Vec::new();
    for transaction in transactions {
        let Some(category) = category_by_id(&transaction.category_id) else {
            continue;
        };
        match buckets.iter_mut().find(|b| b.category.id == category.id) {
            Some(bucket) => {
                bucket.total += transaction.amount;
                bucket.count += 1;
            }
            None => buckets.push(CategoryBucket {
                category,
                total: transaction.amount,
                count: 1,
            }),
        }
    }
    sort_by_total_desc(&mut buckets);
    buckets
}

/// Same grouping as [`group_by_category`], partitioned by category type with
/// each partition sorted independently.
pub fn split_by_type(transactions: &[Transaction]) -> TypeBreakdown {
    let mut breakdown = TypeBreakdown::default();
    for bucket in group_by_category(transactions) {
        match bucket.category.kind {
            TransactionType::Expense => {
                breakdown.expense_total += bucket.total;
                breakdown.expense_buckets.push(bucket);
            }
            TransactionType::Income => {
                breakdown.income_total += bucket.total;
                breakdown.income_buckets.push(bucket);
            }
        }
    }
    breakdown
}

fn sort_by_total_desc(buckets: &mut [CategoryBucket]) {
    buckets.sort_by(|a, b| b.total.partial_cmp(&a.total).unwrap_or(Ordering::Equal));
}
