//! Keyed query cache for Rust
//!
//! This crate caches the results of async reads under a [`QueryKey`], serves
//! them until their staleness window runs out, collapses concurrent reads of
//! the same key into one request and invalidates whole resource
//! [`Family`]s after writes.
//!
//! # Example
//!
//! ```no_run
//! use lifehub_query::{Family, QueryClient, QueryKey, QueryOptions};
//! use std::time::Duration;
//!
//! const TASKS: Family = Family::new("tasks");
//!
//! # async fn run() -> Result<(), String> {
//! let queries = QueryClient::new();
//! let key = QueryKey::new(TASKS).with("list");
//! let options = QueryOptions::stale_time(Duration::from_secs(300));
//!
//! let titles: Vec<String> = queries
//!     .fetch(key, options, || async { Ok::<_, String>(vec!["Buy milk".to_string()]) })
//!     .await?;
//!
//! // After a write, every cached task query refetches on next read.
//! queries.invalidate_family(TASKS);
//! # Ok(())
//! # }
//! ```

mod client;
mod key;
mod state;

pub use client::{QueryClient, DEFAULT_RETENTION};
pub use key::{Family, QueryKey};
pub use state::{QueryOptions, QuerySnapshot, QueryStatus};
