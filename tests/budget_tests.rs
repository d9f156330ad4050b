// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rasid::aggregate::{budget_breakdown, budget_status};
use rasid::models::{Budget, BudgetPatch, NewTransaction, Transaction, TransactionType};
use rasid::{Collection, Finance, Store, StoreError};
use rust_decimal_macros::dec;

fn expense(id: &str, category: &str, amount: rust_decimal::Decimal) -> Transaction {
    Transaction {
        id: id.to_string(),
        r#type: TransactionType::Expense,
        amount,
        category: category.to_string(),
        date: "2025-03-01".to_string(),
        description: None,
    }
}

fn budget(id: &str, category: &str, limit: rust_decimal::Decimal) -> Budget {
    Budget {
        id: id.to_string(),
        category: category.to_string(),
        limit,
    }
}

#[test]
fn overspent_budget_is_capped_at_hundred() {
    let txns = vec![
        expense("a", "Food", dec!(200)),
        expense("b", "food", dec!(50)),
        expense("c", "Rent", dec!(900)),
    ];
    let status = budget_status(&budget("b1", "Food", dec!(200)), &txns);
    assert_eq!(status.spent, dec!(250));
    assert_eq!(status.percentage, dec!(100));
    assert!(status.over_budget);
}

#[test]
fn partial_and_untouched_budgets() {
    let txns = vec![expense("a", "Food", dec!(50))];
    let half = budget_status(&budget("b1", "Food", dec!(200)), &txns);
    assert_eq!(half.percentage, dec!(25));
    assert!(!half.over_budget);

    let idle = budget_status(&budget("b2", "Travel", dec!(300)), &txns);
    assert_eq!(idle.spent, dec!(0));
    assert_eq!(idle.percentage, dec!(0));
    assert!(!idle.over_budget);
}

#[test]
fn spending_exactly_the_limit_is_not_over() {
    let txns = vec![expense("a", "Food", dec!(200))];
    let status = budget_status(&budget("b1", "Food", dec!(200)), &txns);
    assert_eq!(status.percentage, dec!(100));
    assert!(!status.over_budget);
}

#[test]
fn income_never_counts_as_spend() {
    let mut refund = expense("a", "Food", dec!(80));
    refund.r#type = TransactionType::Income;
    let status = budget_status(&budget("b1", "Food", dec!(200)), &[refund]);
    assert_eq!(status.spent, dec!(0));
}

#[test]
fn breakdown_skips_idle_and_repeated_categories() {
    let budgets = vec![
        budget("b1", "Food", dec!(200)),
        budget("b2", "FOOD", dec!(999)),
        budget("b3", "Rent", dec!(1000)),
        budget("b4", "Travel", dec!(500)),
    ];
    let txns = vec![expense("a", "Food", dec!(250)), expense("b", "Rent", dec!(750))];
    let rows = budget_breakdown(&budgets, &txns);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].category, "Food");
    assert_eq!(rows[0].limit, dec!(200));
    assert_eq!(rows[0].share, dec!(25));
    assert_eq!(rows[1].category, "Rent");
    assert_eq!(rows[1].share, dec!(75));
}

#[tokio::test]
async fn one_budget_per_category() {
    let store = Store::open_in_memory().await.unwrap();
    let mut finance = Finance::load(store.clone()).await.unwrap();
    finance.add_budget("Food", dec!(200)).await.unwrap();
    let err = finance.add_budget(" food ", dec!(300)).await.unwrap_err();
    assert!(matches!(err, StoreError::DuplicateBudget(_)));
    assert_eq!(store.count(Collection::Budgets).await.unwrap(), 1);
}

#[tokio::test]
async fn budget_limit_must_be_positive() {
    let store = Store::open_in_memory().await.unwrap();
    let mut finance = Finance::load(store).await.unwrap();
    let err = finance.add_budget("Food", dec!(-5)).await.unwrap_err();
    assert!(matches!(err, StoreError::Validation { field: "limit", .. }));
}

#[tokio::test]
async fn update_merges_patch_and_persists() {
    let store = Store::open_in_memory().await.unwrap();
    let mut finance = Finance::load(store.clone()).await.unwrap();
    let food = finance.add_budget("Food", dec!(200)).await.unwrap();
    let rent = finance.add_budget("Rent", dec!(900)).await.unwrap();

    let raised = finance
        .update_budget(
            &food.id,
            BudgetPatch {
                limit: Some(dec!(400)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(raised.category, "Food");
    assert_eq!(raised.limit, dec!(400));

    let clash = finance
        .update_budget(
            &rent.id,
            BudgetPatch {
                category: Some("FOOD".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(clash, StoreError::DuplicateBudget(_)));

    let missing = finance
        .update_budget("nope", BudgetPatch::default())
        .await
        .unwrap_err();
    assert!(matches!(missing, StoreError::NotFound { .. }));

    let reloaded = Finance::load(store).await.unwrap();
    assert_eq!(
        reloaded.budget_repo().for_category("food").unwrap().limit,
        dec!(400)
    );
}

#[tokio::test]
async fn statuses_follow_recorded_spend() {
    let store = Store::open_in_memory().await.unwrap();
    let mut finance = Finance::load(store).await.unwrap();
    finance.add_budget("Food", dec!(200)).await.unwrap();
    finance
        .add_transaction(NewTransaction::new(TransactionType::Expense, dec!(150), "food"))
        .await
        .unwrap();
    let statuses = finance.budget_statuses();
    assert_eq!(statuses.len(), 1);
    assert_eq!(statuses[0].1.percentage, dec!(75));

    let id = statuses[0].0.id.clone();
    assert!(finance.delete_budget(&id).await.unwrap());
    assert!(finance.budget_statuses().is_empty());
    assert_eq!(finance.transactions().len(), 1);
}

#[tokio::test]
async fn category_index_lookup() {
    let store = Store::open_in_memory().await.unwrap();
    let mut finance = Finance::load(store).await.unwrap();
    finance.add_budget("Food", dec!(200)).await.unwrap();
    finance.add_budget("Rent", dec!(900)).await.unwrap();
    let found = finance.budget_repo().query_category("Rent").await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].limit, dec!(900));
}
