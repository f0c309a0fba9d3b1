//! Budget categories, transactions and the monthly overview

pub mod tags;
mod types;

use crate::error::Result;
use crate::fetch::Fetch;

pub use types::*;

/// Client for `/budget`
#[derive(Clone)]
pub struct BudgetClient {
    fetch: Fetch,
}

impl BudgetClient {
    pub(crate) fn new(fetch: Fetch) -> Self {
        Self { fetch }
    }

    /// List budget categories
    pub async fn categories(&self) -> Result<Vec<BudgetCategory>> {
        self.fetch.get("budget/categories").execute().await
    }

    /// Get one category
    pub async fn category(&self, category_id: i64) -> Result<BudgetCategory> {
        self.fetch
            .get(&format!("budget/categories/{}", category_id))
            .execute()
            .await
    }

    /// Create a category
    pub async fn create_category(&self, category: &NewBudgetCategory) -> Result<BudgetCategory> {
        self.fetch
            .post("budget/categories")
            .json(category)
            .execute()
            .await
    }

    /// Update the fields set on `update`
    pub async fn update_category(
        &self,
        category_id: i64,
        update: &BudgetCategoryUpdate,
    ) -> Result<BudgetCategory> {
        self.fetch
            .put(&format!("budget/categories/{}", category_id))
            .json(update)
            .execute()
            .await
    }

    /// Delete a category and its transactions
    pub async fn delete_category(&self, category_id: i64) -> Result<()> {
        self.fetch
            .delete(&format!("budget/categories/{}", category_id))
            .execute_empty()
            .await
    }

    /// List transactions matching `filter`, newest first
    pub async fn transactions(&self, filter: &TransactionFilter) -> Result<Vec<BudgetTransaction>> {
        self.fetch
            .get("budget/transactions")
            .query(filter)
            .execute()
            .await
    }

    /// Record a transaction
    pub async fn create_transaction(
        &self,
        transaction: &NewBudgetTransaction,
    ) -> Result<BudgetTransaction> {
        self.fetch
            .post("budget/transactions")
            .json(transaction)
            .execute()
            .await
    }

    /// Update the fields set on `update`
    pub async fn update_transaction(
        &self,
        transaction_id: i64,
        update: &BudgetTransactionUpdate,
    ) -> Result<BudgetTransaction> {
        self.fetch
            .put(&format!("budget/transactions/{}", transaction_id))
            .json(update)
            .execute()
            .await
    }

    /// Delete a transaction
    pub async fn delete_transaction(&self, transaction_id: i64) -> Result<()> {
        self.fetch
            .delete(&format!("budget/transactions/{}", transaction_id))
            .execute_empty()
            .await
    }

    /// Totals for the current month
    pub async fn overview(&self) -> Result<BudgetOverview> {
        self.fetch.get("budget/overview").execute().await
    }
}
