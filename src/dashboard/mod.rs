//! Cached reads and notified writes for the dashboard screens
//!
//! Every read goes through a shared [`QueryClient`], so widgets asking for
//! the same data at the same time share one request and fresh data is
//! served without touching the network. Every write invalidates the
//! affected family on success and reports its outcome to a [`Notifier`].
//! A write that fails only leaves the cache as it was, unless the server
//! rejected the session: then the whole cache goes with it.

pub mod keys;
mod notify;
mod stats;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use lifehub_query::{Family, QueryClient, QueryKey, QueryOptions, QuerySnapshot};
use log::{debug, error, warn};

use crate::auth::LoginResponse;
use crate::budget::{
    BudgetCategory, BudgetCategoryUpdate, BudgetOverview, BudgetTransaction,
    BudgetTransactionUpdate, NewBudgetCategory, NewBudgetTransaction, TransactionFilter,
};
use crate::config::StaleTimes;
use crate::error::{Error, Result};
use crate::shopping::{NewShoppingItem, ShoppingFilter, ShoppingItem, ShoppingItemUpdate, ShoppingSummary};
use crate::tasks::{NewTask, Task, TaskFilter, TaskUpdate};
use crate::users::{NewUser, User, UserUpdate};
use crate::LifeHub;

use self::keys::{BUDGET, SHOPPING, TASKS, USER};
use self::notify::Outcome;

pub use notify::{Level, LogNotifier, Notification, Notifier};
pub use stats::QuickStats;

/// Cached view of the LifeHub API
#[derive(Clone)]
pub struct Dashboard {
    hub: LifeHub,
    queries: QueryClient,
    notifier: Arc<dyn Notifier>,
    stale_times: StaleTimes,
}

impl Dashboard {
    /// Create a dashboard that reports write outcomes to the log
    pub fn new(hub: LifeHub) -> Self {
        Self::with_notifier(hub, Arc::new(LogNotifier))
    }

    /// Create a dashboard that reports write outcomes to `notifier`
    pub fn with_notifier(hub: LifeHub, notifier: Arc<dyn Notifier>) -> Self {
        let stale_times = hub.options().stale_times;
        Self {
            hub,
            queries: QueryClient::new(),
            notifier,
            stale_times,
        }
    }

    /// The underlying cache, for inspecting query state
    pub fn queries(&self) -> &QueryClient {
        &self.queries
    }

    /// State of a cached query without fetching it
    pub fn snapshot<T: Clone + 'static>(&self, key: &QueryKey) -> QuerySnapshot<T, Error> {
        self.queries.snapshot(key)
    }

    /// Sign in and start from an empty cache
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<LoginResponse> {
        let response = self.hub.auth().login(email, password).await?;
        self.queries.clear();
        Ok(response)
    }

    /// Create an account, sign in with it and start from an empty cache
    pub async fn sign_up(&self, user: &NewUser) -> Result<LoginResponse> {
        let response = self.hub.auth().sign_up(user).await?;
        self.queries.clear();
        Ok(response)
    }

    /// Sign out and forget everything cached for the previous user
    pub fn sign_out(&self) -> Result<()> {
        self.queries.clear();
        self.hub.auth().logout()
    }

    // Reads

    pub async fn tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
        let client = self.hub.tasks();
        let filter = filter.clone();
        self.read(keys::task_list(&filter)?, self.stale_times.tasks, move || async move {
            client.list(&filter).await
        })
        .await
    }

    pub async fn task(&self, task_id: i64) -> Result<Task> {
        let client = self.hub.tasks();
        self.read(keys::task(task_id), self.stale_times.tasks, move || async move {
            client.get(task_id).await
        })
        .await
    }

    pub async fn shopping_items(&self, filter: &ShoppingFilter) -> Result<Vec<ShoppingItem>> {
        let client = self.hub.shopping();
        let filter = filter.clone();
        self.read(
            keys::shopping_list(&filter)?,
            self.stale_times.shopping_items,
            move || async move { client.list(&filter).await },
        )
        .await
    }

    pub async fn shopping_summary(&self) -> Result<ShoppingSummary> {
        let client = self.hub.shopping();
        self.read(
            keys::shopping_summary(),
            self.stale_times.shopping_summary,
            move || async move { client.summary().await },
        )
        .await
    }

    pub async fn budget_categories(&self) -> Result<Vec<BudgetCategory>> {
        let client = self.hub.budget();
        self.read(
            keys::budget_categories(),
            self.stale_times.budget_categories,
            move || async move { client.categories().await },
        )
        .await
    }

    pub async fn budget_transactions(
        &self,
        filter: &TransactionFilter,
    ) -> Result<Vec<BudgetTransaction>> {
        let client = self.hub.budget();
        let filter = filter.clone();
        self.read(
            keys::budget_transactions(&filter)?,
            self.stale_times.budget_transactions,
            move || async move { client.transactions(&filter).await },
        )
        .await
    }

    pub async fn budget_overview(&self) -> Result<BudgetOverview> {
        let client = self.hub.budget();
        self.read(
            keys::budget_overview(),
            self.stale_times.budget_overview,
            move || async move { client.overview().await },
        )
        .await
    }

    pub async fn current_user(&self) -> Result<User> {
        let client = self.hub.users();
        self.read(
            keys::current_user(),
            self.stale_times.current_user,
            move || async move { client.me().await },
        )
        .await
    }

    /// Headline figures, built from the unfiltered task list, the shopping
    /// summary and the budget overview
    pub async fn quick_stats(&self) -> Result<QuickStats> {
        let all_tasks = TaskFilter::default();
        let (tasks, shopping, budget) = tokio::try_join!(
            self.tasks(&all_tasks),
            self.shopping_summary(),
            self.budget_overview()
        )?;
        Ok(QuickStats::from_parts(&tasks, &shopping, &budget))
    }

    // Task writes

    pub async fn create_task(&self, task: &NewTask) -> Result<Task> {
        self.mutate(TASKS, notify::CREATE_TASK, self.hub.tasks().create(task))
            .await
    }

    pub async fn update_task(&self, task_id: i64, update: &TaskUpdate) -> Result<Task> {
        self.mutate(TASKS, notify::UPDATE_TASK, self.hub.tasks().update(task_id, update))
            .await
    }

    pub async fn toggle_task(&self, task_id: i64) -> Result<Task> {
        self.mutate(TASKS, notify::TOGGLE_TASK, self.hub.tasks().toggle(task_id))
            .await
    }

    pub async fn delete_task(&self, task_id: i64) -> Result<()> {
        self.mutate(TASKS, notify::DELETE_TASK, self.hub.tasks().delete(task_id))
            .await
    }

    // Shopping writes

    pub async fn create_shopping_item(&self, item: &NewShoppingItem) -> Result<ShoppingItem> {
        self.mutate(SHOPPING, notify::CREATE_ITEM, self.hub.shopping().create(item))
            .await
    }

    pub async fn update_shopping_item(
        &self,
        item_id: i64,
        update: &ShoppingItemUpdate,
    ) -> Result<ShoppingItem> {
        self.mutate(
            SHOPPING,
            notify::UPDATE_ITEM,
            self.hub.shopping().update(item_id, update),
        )
        .await
    }

    /// Mark an item bought or not; `actual_price` records what it cost
    pub async fn toggle_shopping_item(
        &self,
        item_id: i64,
        actual_price: Option<f64>,
    ) -> Result<ShoppingItem> {
        self.mutate(
            SHOPPING,
            notify::TOGGLE_ITEM,
            self.hub.shopping().toggle(item_id, actual_price),
        )
        .await
    }

    pub async fn delete_shopping_item(&self, item_id: i64) -> Result<()> {
        self.mutate(SHOPPING, notify::DELETE_ITEM, self.hub.shopping().delete(item_id))
            .await
    }

    // Budget writes

    pub async fn create_budget_category(
        &self,
        category: &NewBudgetCategory,
    ) -> Result<BudgetCategory> {
        self.mutate(
            BUDGET,
            notify::CREATE_CATEGORY,
            self.hub.budget().create_category(category),
        )
        .await
    }

    pub async fn update_budget_category(
        &self,
        category_id: i64,
        update: &BudgetCategoryUpdate,
    ) -> Result<BudgetCategory> {
        self.mutate(
            BUDGET,
            notify::UPDATE_CATEGORY,
            self.hub.budget().update_category(category_id, update),
        )
        .await
    }

    pub async fn delete_budget_category(&self, category_id: i64) -> Result<()> {
        self.mutate(
            BUDGET,
            notify::DELETE_CATEGORY,
            self.hub.budget().delete_category(category_id),
        )
        .await
    }

    pub async fn create_budget_transaction(
        &self,
        transaction: &NewBudgetTransaction,
    ) -> Result<BudgetTransaction> {
        self.mutate(
            BUDGET,
            notify::CREATE_TRANSACTION,
            self.hub.budget().create_transaction(transaction),
        )
        .await
    }

    pub async fn update_budget_transaction(
        &self,
        transaction_id: i64,
        update: &BudgetTransactionUpdate,
    ) -> Result<BudgetTransaction> {
        self.mutate(
            BUDGET,
            notify::UPDATE_TRANSACTION,
            self.hub.budget().update_transaction(transaction_id, update),
        )
        .await
    }

    pub async fn delete_budget_transaction(&self, transaction_id: i64) -> Result<()> {
        self.mutate(
            BUDGET,
            notify::DELETE_TRANSACTION,
            self.hub.budget().delete_transaction(transaction_id),
        )
        .await
    }

    // Profile writes

    pub async fn update_current_user(&self, update: &UserUpdate) -> Result<User> {
        self.mutate(USER, notify::UPDATE_PROFILE, self.hub.users().update_me(update))
            .await
    }

    async fn read<T, F, Fut>(&self, key: QueryKey, stale_time: Duration, fetcher: F) -> Result<T>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let label = key.to_string();
        let result = self
            .queries
            .fetch(key, QueryOptions::stale_time(stale_time), fetcher)
            .await;

        if let Err(err) = &result {
            warn!("Query {} failed: {}", label, err);
            self.forget_expired_session(err);
        }
        result
    }

    async fn mutate<T, Fut>(&self, family: Family, outcome: Outcome, request: Fut) -> Result<T>
    where
        Fut: Future<Output = Result<T>>,
    {
        match request.await {
            Ok(value) => {
                let hit = self.queries.invalidate_family(family);
                debug!("Invalidated {} {} queries", hit, family);
                if let Some(message) = outcome.success {
                    self.notifier.notify(Notification::success(message));
                }
                Ok(value)
            }
            Err(err) => {
                error!("{}: {}", outcome.failure, err);
                self.notifier.notify(Notification::error(outcome.failure));
                self.forget_expired_session(&err);
                Err(err)
            }
        }
    }

    /// Everything cached belonged to the session the server just rejected
    fn forget_expired_session(&self, err: &Error) {
        if let Error::AuthExpired(_) = err {
            debug!("Session expired, dropping cached queries");
            self.queries.clear();
        }
    }
}
