// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::info;

use crate::aggregate::{
    self, BudgetStatus, CategoryShare, GoalProgress, MonthBucket, Summary,
};
use crate::backup::{self, ImportSummary};
use crate::db::{Batch, Store};
use crate::error::StoreError;
use crate::migration::{LegacyStore, MigrationReport, migrate_legacy};
use crate::models::{Budget, BudgetPatch, Goal, GoalPatch, NewGoal, NewTransaction, Transaction};
use crate::repos::{BudgetRepository, GoalRepository, SettingsRepository, TransactionRepository};
use crate::schema::Collection;

/// The session's finance state: one store handle plus the repositories
/// caching it. Built once at start-up and handed to whoever needs it.
pub struct Finance {
    store: Store,
    transactions: TransactionRepository,
    budgets: BudgetRepository,
    goals: GoalRepository,
    settings: SettingsRepository,
}

impl Finance {
    /// Runs the legacy migration, then loads every repository.
    pub async fn start(
        store: Store,
        legacy: &mut dyn LegacyStore,
    ) -> Result<(Finance, MigrationReport), StoreError> {
        let report = migrate_legacy(&store, legacy).await?;
        let finance = Finance::load(store).await?;
        Ok((finance, report))
    }

    pub async fn load(store: Store) -> Result<Finance, StoreError> {
        let finance = Finance {
            transactions: TransactionRepository::load(store.clone()).await?,
            budgets: BudgetRepository::load(store.clone()).await?,
            goals: GoalRepository::load(store.clone()).await?,
            settings: SettingsRepository::load(store.clone()).await?,
            store,
        };
        info!(
            transactions = finance.transactions.all().len(),
            budgets = finance.budgets.all().len(),
            goals = finance.goals.all().len(),
            "finance data loaded"
        );
        Ok(finance)
    }

    pub async fn reload(&mut self) -> Result<(), StoreError> {
        self.transactions.reload().await?;
        self.budgets.reload().await?;
        self.goals.reload().await?;
        self.settings = SettingsRepository::load(self.store.clone()).await?;
        Ok(())
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Newest first.
    pub fn transactions(&self) -> &[Transaction] {
        self.transactions.all()
    }

    pub fn budgets(&self) -> &[Budget] {
        self.budgets.all()
    }

    pub fn goals(&self) -> &[Goal] {
        self.goals.all()
    }

    pub fn transaction_repo(&self) -> &TransactionRepository {
        &self.transactions
    }

    pub fn budget_repo(&self) -> &BudgetRepository {
        &self.budgets
    }

    pub fn settings(&self) -> &SettingsRepository {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut SettingsRepository {
        &mut self.settings
    }

    pub async fn add_transaction(&mut self, input: NewTransaction) -> Result<Transaction, StoreError> {
        self.transactions.add(input).await
    }

    pub async fn delete_transaction(&mut self, id: &str) -> Result<bool, StoreError> {
        self.transactions.delete(id).await
    }

    pub async fn add_budget(&mut self, category: &str, limit: Decimal) -> Result<Budget, StoreError> {
        self.budgets.add(category, limit).await
    }

    pub async fn update_budget(&mut self, id: &str, patch: BudgetPatch) -> Result<Budget, StoreError> {
        self.budgets.update(id, patch).await
    }

    pub async fn delete_budget(&mut self, id: &str) -> Result<bool, StoreError> {
        self.budgets.delete(id).await
    }

    pub async fn add_goal(&mut self, input: NewGoal) -> Result<Goal, StoreError> {
        self.goals.add(input).await
    }

    pub async fn update_goal(&mut self, id: &str, patch: GoalPatch) -> Result<Goal, StoreError> {
        self.goals.update(id, patch).await
    }

    pub async fn delete_goal(&mut self, id: &str) -> Result<bool, StoreError> {
        self.goals.delete(id).await
    }

    pub async fn deposit_to_goal(&mut self, id: &str, amount: Decimal) -> Result<Goal, StoreError> {
        self.goals.deposit(id, amount).await
    }

    pub async fn withdraw_from_goal(&mut self, id: &str, amount: Decimal) -> Result<Goal, StoreError> {
        self.goals.withdraw(id, amount).await
    }

    pub fn summary(&self) -> Summary {
        aggregate::summary(self.transactions())
    }

    pub fn recent_transactions(&self, n: usize) -> Vec<&Transaction> {
        aggregate::recent(self.transactions(), n)
    }

    pub fn category_spend(&self, category: &str) -> Decimal {
        aggregate::category_spend(self.transactions(), category)
    }

    pub fn budget_statuses(&self) -> Vec<(&Budget, BudgetStatus)> {
        self.budgets()
            .iter()
            .map(|b| (b, aggregate::budget_status(b, self.transactions())))
            .collect()
    }

    pub fn budget_breakdown(&self) -> Vec<CategoryShare> {
        aggregate::budget_breakdown(self.budgets(), self.transactions())
    }

    pub fn monthly_series(&self, months: u32, reference: NaiveDate) -> Vec<MonthBucket> {
        aggregate::monthly_series(self.transactions(), months, reference)
    }

    pub fn goal_progress(&self) -> Vec<(&Goal, GoalProgress)> {
        self.goals()
            .iter()
            .map(|g| (g, aggregate::goal_progress(g)))
            .collect()
    }

    /// Removes transactions, budgets and goals in one step. Settings stay.
    pub async fn clear_all_data(&mut self) -> Result<(), StoreError> {
        let mut batch = Batch::new();
        batch
            .clear(Collection::Transactions)
            .clear(Collection::Budgets)
            .clear(Collection::Goals);
        self.store.commit(batch).await?;
        self.transactions.forget_all();
        self.budgets.forget_all();
        self.goals.forget_all();
        info!("all finance data cleared");
        Ok(())
    }

    /// Imports a backup document and refreshes every cache from the store.
    pub async fn import(&mut self, doc: &Value, clear_existing: bool) -> Result<ImportSummary, StoreError> {
        let summary = backup::import_data(&self.store, doc, clear_existing).await?;
        self.reload().await?;
        Ok(summary)
    }
}
