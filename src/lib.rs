//! LifeHub Rust Client Library
//!
//! A Rust client for the LifeHub personal dashboard API, providing typed
//! access to tasks, shopping lists and budgets, plus a cached
//! [`Dashboard`](dashboard::Dashboard) layer for screens that read the
//! same data from several places.

pub mod auth;
pub mod budget;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod fetch;
pub mod session;
pub mod shopping;
pub mod tasks;
pub mod timestamp;
pub mod users;

use std::sync::Arc;

use crate::auth::Auth;
use crate::budget::BudgetClient;
use crate::config::ClientOptions;
use crate::dashboard::Dashboard;
use crate::error::Result;
use crate::fetch::Fetch;
use crate::session::{CredentialStore, SessionContext};
use crate::shopping::ShoppingClient;
use crate::tasks::TasksClient;
use crate::users::UsersClient;

/// The main entry point for the LifeHub client
#[derive(Clone)]
pub struct LifeHub {
    fetch: Fetch,
    options: ClientOptions,
}

impl LifeHub {
    /// Create a client whose session lives in memory only
    ///
    /// # Example
    ///
    /// ```
    /// use lifehub_client::{LifeHub, config::ClientOptions};
    ///
    /// let options = ClientOptions::default().with_base_url("http://localhost:8000/api");
    /// let hub = LifeHub::new(options).unwrap();
    /// assert!(!hub.session().is_authenticated());
    /// ```
    pub fn new(options: ClientOptions) -> Result<Self> {
        Self::with_session(options, SessionContext::in_memory())
    }

    /// Create a client that persists its session in `store`
    pub fn with_store(options: ClientOptions, store: Arc<dyn CredentialStore>) -> Result<Self> {
        Self::with_session(options, SessionContext::new(store))
    }

    fn with_session(options: ClientOptions, session: SessionContext) -> Result<Self> {
        let fetch = Fetch::new(&options, session)?;
        Ok(Self { fetch, options })
    }

    /// The options this client was built with
    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Session state shared by every client created from this one
    pub fn session(&self) -> &SessionContext {
        self.fetch.session()
    }

    /// Login, registration and session restore
    pub fn auth(&self) -> Auth {
        Auth::new(self.fetch.clone())
    }

    /// The signed-in user's profile
    pub fn users(&self) -> UsersClient {
        UsersClient::new(self.fetch.clone())
    }

    /// Tasks
    pub fn tasks(&self) -> TasksClient {
        TasksClient::new(self.fetch.clone())
    }

    /// Shopping list
    pub fn shopping(&self) -> ShoppingClient {
        ShoppingClient::new(self.fetch.clone())
    }

    /// Budget categories and transactions
    pub fn budget(&self) -> BudgetClient {
        BudgetClient::new(self.fetch.clone())
    }

    /// A cached dashboard over this client, reporting to the log
    pub fn dashboard(&self) -> Dashboard {
        Dashboard::new(self.clone())
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::config::ClientOptions;
    pub use crate::dashboard::{Dashboard, Notification, Notifier};
    pub use crate::error::{Error, Result};
    pub use crate::session::{FileCredentialStore, MemoryCredentialStore, SessionEvent};
    pub use crate::LifeHub;
}
