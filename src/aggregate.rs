// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Derived figures over already-loaded collections. Nothing here touches
//! the store and no function mutates its input.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::StoreError;
use crate::models::{Budget, Goal, Transaction, TransactionType};

pub const DEFAULT_SERIES_MONTHS: u32 = 12;

/// Longest series `monthly_series` builds; larger requests are clamped.
pub const MAX_SERIES_MONTHS: u32 = 1200;

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub income: Decimal,
    pub expenses: Decimal,
    pub balance: Decimal,
}

pub fn summary(txns: &[Transaction]) -> Summary {
    let mut income = Decimal::ZERO;
    let mut expenses = Decimal::ZERO;
    for t in txns {
        match t.r#type {
            TransactionType::Income => income = income.saturating_add(t.amount),
            TransactionType::Expense => expenses = expenses.saturating_add(t.amount),
        }
    }
    Summary {
        income,
        expenses,
        balance: income.saturating_sub(expenses),
    }
}

/// Total expense amount for `category`, compared case-insensitively.
pub fn category_spend(txns: &[Transaction], category: &str) -> Decimal {
    let wanted = category.to_lowercase();
    txns.iter()
        .filter(|t| t.is_expense() && t.category.to_lowercase() == wanted)
        .fold(Decimal::ZERO, |acc, t| acc.saturating_add(t.amount))
}

/// `part / whole * 100`, capped at 100. A zero whole reads as fully used
/// once anything has been spent.
fn capped_percentage(part: Decimal, whole: Decimal) -> Decimal {
    if part <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    if whole <= Decimal::ZERO {
        return Decimal::ONE_HUNDRED;
    }
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map_or(Decimal::ONE_HUNDRED, |p| p.min(Decimal::ONE_HUNDRED))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BudgetStatus {
    pub spent: Decimal,
    pub percentage: Decimal,
    pub over_budget: bool,
}

pub fn budget_status(budget: &Budget, txns: &[Transaction]) -> BudgetStatus {
    let spent = category_spend(txns, &budget.category);
    BudgetStatus {
        spent,
        percentage: capped_percentage(spent, budget.limit),
        over_budget: spent > budget.limit,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryShare {
    pub category: String,
    pub spent: Decimal,
    pub limit: Decimal,
    /// Share of all budgeted spending, in percent.
    pub share: Decimal,
}

/// Spend per budgeted category for the pie chart. Categories without any
/// spend are left out; when two budgets name the same category the first
/// one wins.
pub fn budget_breakdown(budgets: &[Budget], txns: &[Transaction]) -> Vec<CategoryShare> {
    let mut seen = Vec::new();
    let mut rows = Vec::new();
    for b in budgets {
        let folded = b.category.to_lowercase();
        if seen.contains(&folded) {
            continue;
        }
        seen.push(folded);
        let spent = category_spend(txns, &b.category);
        if spent > Decimal::ZERO {
            rows.push((b.category.clone(), spent, b.limit));
        }
    }

    let total = rows
        .iter()
        .fold(Decimal::ZERO, |acc, (_, spent, _)| acc.saturating_add(*spent));
    rows.into_iter()
        .map(|(category, spent, limit)| CategoryShare {
            share: capped_percentage(spent, total),
            category,
            spent,
            limit,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthBucket {
    /// `YYYY-MM`
    pub month: String,
    pub label: &'static str,
    pub income: Decimal,
    pub expense: Decimal,
    pub savings: Decimal,
}

/// One bucket per calendar month, oldest first, ending with the month that
/// contains `reference`. Months without transactions report zeros.
/// `months` is clamped to [`MAX_SERIES_MONTHS`].
pub fn monthly_series(txns: &[Transaction], months: u32, reference: NaiveDate) -> Vec<MonthBucket> {
    let mut totals: HashMap<&str, (Decimal, Decimal)> = HashMap::new();
    for t in txns {
        let entry = totals.entry(t.month_key()).or_default();
        match t.r#type {
            TransactionType::Income => entry.0 = entry.0.saturating_add(t.amount),
            TransactionType::Expense => entry.1 = entry.1.saturating_add(t.amount),
        }
    }

    let months = months.min(MAX_SERIES_MONTHS) as i32;
    let anchor = reference.year() * 12 + reference.month0() as i32;
    (0..months)
        .rev()
        .map(|back| {
            let index = anchor - back;
            let (year, month0) = (index.div_euclid(12), index.rem_euclid(12));
            let month = format!("{:04}-{:02}", year, month0 + 1);
            let (income, expense) = totals.get(month.as_str()).copied().unwrap_or_default();
            MonthBucket {
                label: MONTH_LABELS[month0 as usize],
                month,
                income,
                expense,
                savings: income.saturating_sub(expense),
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GoalProgress {
    pub percentage: Decimal,
    pub remaining: Decimal,
    pub reached: bool,
}

pub fn goal_progress(goal: &Goal) -> GoalProgress {
    let percentage = capped_percentage(goal.current_amount, goal.target_amount);
    GoalProgress {
        percentage,
        remaining: goal
            .target_amount
            .saturating_sub(goal.current_amount)
            .max(Decimal::ZERO),
        reached: percentage >= Decimal::ONE_HUNDRED,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    DateDesc,
    DateAsc,
    AmountDesc,
    AmountAsc,
}

impl FromStr for SortOrder {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "date-desc" => Ok(SortOrder::DateDesc),
            "date-asc" => Ok(SortOrder::DateAsc),
            "amount-desc" => Ok(SortOrder::AmountDesc),
            "amount-asc" => Ok(SortOrder::AmountAsc),
            other => Err(StoreError::invalid("sort", format!("unknown order '{}'", other))),
        }
    }
}

pub(crate) fn by_date(a: &Transaction, b: &Transaction) -> Ordering {
    a.timestamp()
        .cmp(&b.timestamp())
        .then_with(|| a.date.cmp(&b.date))
        .then_with(|| a.id.cmp(&b.id))
}

/// Transactions of `kind`, or all of them when `kind` is `None`.
pub fn filter_by_type(txns: &[Transaction], kind: Option<TransactionType>) -> Vec<&Transaction> {
    txns.iter()
        .filter(|t| kind.is_none_or(|k| t.r#type == k))
        .collect()
}

pub fn sorted<'a, I>(txns: I, order: SortOrder) -> Vec<&'a Transaction>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut out: Vec<&Transaction> = txns.into_iter().collect();
    match order {
        SortOrder::DateDesc => out.sort_by(|a, b| by_date(b, a)),
        SortOrder::DateAsc => out.sort_by(|a, b| by_date(a, b)),
        SortOrder::AmountDesc => out.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| by_date(b, a))),
        SortOrder::AmountAsc => out.sort_by(|a, b| a.amount.cmp(&b.amount).then_with(|| by_date(a, b))),
    }
    out
}

/// The `n` newest transactions.
pub fn recent(txns: &[Transaction], n: usize) -> Vec<&Transaction> {
    let mut out = sorted(txns, SortOrder::DateDesc);
    out.truncate(n);
    out
}

/// Earliest and latest transaction instants, as stored.
pub fn date_range(txns: &[Transaction]) -> Option<(String, String)> {
    let oldest = txns.iter().min_by(|a, b| by_date(a, b))?;
    let newest = txns.iter().max_by(|a, b| by_date(a, b))?;
    Some((oldest.date.clone(), newest.date.clone()))
}
