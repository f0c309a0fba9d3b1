//! Shopping list operations

mod types;

use crate::error::Result;
use crate::fetch::Fetch;

pub use types::*;

/// Client for `/shopping`
#[derive(Clone)]
pub struct ShoppingClient {
    fetch: Fetch,
}

impl ShoppingClient {
    pub(crate) fn new(fetch: Fetch) -> Self {
        Self { fetch }
    }

    /// List items matching `filter`
    pub async fn list(&self, filter: &ShoppingFilter) -> Result<Vec<ShoppingItem>> {
        self.fetch.get("shopping").query(filter).execute().await
    }

    /// Get one item
    pub async fn get(&self, item_id: i64) -> Result<ShoppingItem> {
        self.fetch
            .get(&format!("shopping/{}", item_id))
            .execute()
            .await
    }

    /// Add an item
    pub async fn create(&self, item: &NewShoppingItem) -> Result<ShoppingItem> {
        self.fetch.post("shopping").json(item).execute().await
    }

    /// Update the fields set on `update`
    pub async fn update(&self, item_id: i64, update: &ShoppingItemUpdate) -> Result<ShoppingItem> {
        self.fetch
            .put(&format!("shopping/{}", item_id))
            .json(update)
            .execute()
            .await
    }

    /// Remove an item
    pub async fn delete(&self, item_id: i64) -> Result<()> {
        self.fetch
            .delete(&format!("shopping/{}", item_id))
            .execute_empty()
            .await
    }

    /// Flip the item's completed flag, recording the price paid if given
    pub async fn toggle(&self, item_id: i64, actual_price: Option<f64>) -> Result<ShoppingItem> {
        self.fetch
            .patch(&format!("shopping/{}/toggle", item_id))
            .query(&ToggleParams { actual_price })
            .execute()
            .await
    }

    /// Counts of pending and purchased items
    pub async fn summary(&self) -> Result<ShoppingSummary> {
        self.fetch.get("shopping/stats/summary").execute().await
    }
}
