//! Cache keys for dashboard reads
//!
//! Widgets use these to look at a query's state without triggering a fetch.

use lifehub_query::{Family, QueryKey};

use crate::budget::TransactionFilter;
use crate::error::Result;
use crate::shopping::ShoppingFilter;
use crate::tasks::TaskFilter;

pub const TASKS: Family = Family::new("tasks");
pub const SHOPPING: Family = Family::new("shopping");
/// Categories, transactions and the overview share one family: any
/// transaction changes the categories' spending figures.
pub const BUDGET: Family = Family::new("budget");
pub const USER: Family = Family::new("user");

pub fn task_list(filter: &TaskFilter) -> Result<QueryKey> {
    Ok(QueryKey::new(TASKS).with("list").with_params(filter)?)
}

pub fn task(task_id: i64) -> QueryKey {
    QueryKey::new(TASKS).with("detail").with(task_id.to_string())
}

pub fn shopping_list(filter: &ShoppingFilter) -> Result<QueryKey> {
    Ok(QueryKey::new(SHOPPING).with("list").with_params(filter)?)
}

pub fn shopping_summary() -> QueryKey {
    QueryKey::new(SHOPPING).with("summary")
}

pub fn budget_categories() -> QueryKey {
    QueryKey::new(BUDGET).with("categories")
}

pub fn budget_transactions(filter: &TransactionFilter) -> Result<QueryKey> {
    Ok(QueryKey::new(BUDGET).with("transactions").with_params(filter)?)
}

pub fn budget_overview() -> QueryKey {
    QueryKey::new(BUDGET).with("overview")
}

pub fn current_user() -> QueryKey {
    QueryKey::new(USER).with("me")
}
