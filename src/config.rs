//! Configuration options for the LifeHub client

use std::time::Duration;

use crate::error::{Error, Result};

/// Default API location when nothing else is configured
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Environment variable holding the API base URL
pub const API_URL_ENV: &str = "LIFEHUB_API_URL";

/// Environment variable holding the request timeout in seconds
pub const TIMEOUT_ENV: &str = "LIFEHUB_TIMEOUT_SECS";

/// Staleness windows per read, after which cached data is refetched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaleTimes {
    pub tasks: Duration,
    pub shopping_items: Duration,
    pub shopping_summary: Duration,
    pub budget_categories: Duration,
    pub budget_transactions: Duration,
    pub budget_overview: Duration,
    pub current_user: Duration,
}

impl Default for StaleTimes {
    fn default() -> Self {
        const MINUTE: u64 = 60;
        Self {
            tasks: Duration::from_secs(5 * MINUTE),
            shopping_items: Duration::from_secs(5 * MINUTE),
            shopping_summary: Duration::from_secs(2 * MINUTE),
            budget_categories: Duration::from_secs(10 * MINUTE),
            budget_transactions: Duration::from_secs(5 * MINUTE),
            budget_overview: Duration::from_secs(5 * MINUTE),
            current_user: Duration::from_secs(5 * MINUTE),
        }
    }
}

impl StaleTimes {
    /// Every read refetches; handy in tests
    pub fn none() -> Self {
        Self {
            tasks: Duration::ZERO,
            shopping_items: Duration::ZERO,
            shopping_summary: Duration::ZERO,
            budget_categories: Duration::ZERO,
            budget_transactions: Duration::ZERO,
            budget_overview: Duration::ZERO,
            current_user: Duration::ZERO,
        }
    }
}

/// Configuration options for the LifeHub client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Base URL of the API, e.g. `http://localhost:8000/api`
    pub base_url: String,

    /// The request timeout
    pub request_timeout: Duration,

    /// Value of the `User-Agent` header
    pub user_agent: String,

    /// Cache staleness windows
    pub stale_times: StaleTimes,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(10),
            user_agent: format!("lifehub-client/{}", env!("CARGO_PKG_VERSION")),
            stale_times: StaleTimes::default(),
        }
    }
}

impl ClientOptions {
    /// Read options from `LIFEHUB_API_URL` and `LIFEHUB_TIMEOUT_SECS`,
    /// falling back to the defaults for anything unset.
    pub fn from_env() -> Result<Self> {
        let mut options = Self::default();

        if let Ok(url) = std::env::var(API_URL_ENV) {
            options.base_url = url;
        }

        if let Ok(raw) = std::env::var(TIMEOUT_ENV) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                Error::invalid_input(format!("{} must be a whole number of seconds, got {:?}", TIMEOUT_ENV, raw))
            })?;
            options.request_timeout = Duration::from_secs(secs);
        }

        Ok(options)
    }

    /// Set the API base URL
    pub fn with_base_url(mut self, value: &str) -> Self {
        self.base_url = value.to_string();
        self
    }

    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Duration) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set the user agent
    pub fn with_user_agent(mut self, value: &str) -> Self {
        self.user_agent = value.to_string();
        self
    }

    /// Set the cache staleness windows
    pub fn with_stale_times(mut self, value: StaleTimes) -> Self {
        self.stale_times = value;
        self
    }
}
