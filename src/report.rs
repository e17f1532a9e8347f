// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Spending summaries derived from a snapshot of transactions.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::Transaction;

/// Number of categories the insights view shows.
pub const INSIGHT_LIMIT: usize = 3;

/// Sums expense amounts per key, largest first. Ties keep key order.
/// Sums saturate at the `Decimal` bounds instead of overflowing.
fn expenses_by<F>(items: &[Transaction], key: F) -> Vec<(String, Decimal)>
where
    F: Fn(&Transaction) -> String,
{
    let mut groups: BTreeMap<String, Decimal> = BTreeMap::new();
    for t in items.iter().filter(|t| t.is_expense()) {
        let sum = groups.entry(key(t)).or_insert(Decimal::ZERO);
        *sum = sum.saturating_add(t.amount);
    }
    let mut out: Vec<_> = groups.into_iter().collect();
    out.sort_by(|a, b| b.1.cmp(&a.1));
    out
}

/// Expense totals per `YYYY-MM`.
pub fn monthly_spending(items: &[Transaction]) -> Vec<(String, Decimal)> {
    expenses_by(items, Transaction::month)
}

/// The `limit` categories with the highest expense totals.
pub fn top_categories(items: &[Transaction], limit: usize) -> Vec<(String, Decimal)> {
    let mut out = expenses_by(items, |t| t.category.clone());
    out.truncate(limit);
    out
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub income: Decimal,
    pub expense: Decimal,
    /// Records whose type is neither income nor expense.
    pub other: Decimal,
}

impl Totals {
    pub fn net(&self) -> Decimal {
        self.income.saturating_sub(self.expense)
    }
}

pub fn totals_by_kind(items: &[Transaction]) -> Totals {
    let mut totals = Totals::default();
    for t in items {
        let slot = if t.is_expense() {
            &mut totals.expense
        } else if t.is_income() {
            &mut totals.income
        } else {
            &mut totals.other
        };
        *slot = slot.saturating_add(t.amount);
    }
    totals
}
