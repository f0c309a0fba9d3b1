//! Task operations

mod types;

use crate::error::Result;
use crate::fetch::Fetch;

pub use types::*;

/// Client for `/tasks`
#[derive(Clone)]
pub struct TasksClient {
    fetch: Fetch,
}

impl TasksClient {
    pub(crate) fn new(fetch: Fetch) -> Self {
        Self { fetch }
    }

    /// List tasks matching `filter`
    pub async fn list(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
        self.fetch.get("tasks").query(filter).execute().await
    }

    /// Get one task
    pub async fn get(&self, task_id: i64) -> Result<Task> {
        self.fetch
            .get(&format!("tasks/{}", task_id))
            .execute()
            .await
    }

    /// Create a task
    pub async fn create(&self, task: &NewTask) -> Result<Task> {
        self.fetch.post("tasks").json(task).execute().await
    }

    /// Update the fields set on `update`
    pub async fn update(&self, task_id: i64, update: &TaskUpdate) -> Result<Task> {
        self.fetch
            .put(&format!("tasks/{}", task_id))
            .json(update)
            .execute()
            .await
    }

    /// Delete a task
    pub async fn delete(&self, task_id: i64) -> Result<()> {
        self.fetch
            .delete(&format!("tasks/{}", task_id))
            .execute_empty()
            .await
    }

    /// Flip the task's completed flag on the server
    pub async fn toggle(&self, task_id: i64) -> Result<Task> {
        self.fetch
            .patch(&format!("tasks/{}/toggle", task_id))
            .execute()
            .await
    }
}
