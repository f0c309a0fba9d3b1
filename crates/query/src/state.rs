//! Per-key query state

use futures_util::future::{BoxFuture, Shared};
use std::any::Any;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub(crate) type Erased = Arc<dyn Any + Send + Sync>;
pub(crate) type SharedFetch = Shared<BoxFuture<'static, Result<Erased, Erased>>>;

/// Lifecycle of a query key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    /// Never fetched
    Idle,
    /// A request is in flight. Data from an earlier success stays
    /// available in [`QuerySnapshot::data`] meanwhile.
    Loading,
    /// The last request succeeded
    Success,
    /// The last request failed
    Error,
}

/// Options for a single read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QueryOptions {
    /// How long a successful result is served without refetching
    pub stale_time: Duration,
}

impl QueryOptions {
    /// Options with the given staleness window
    pub fn stale_time(stale_time: Duration) -> Self {
        Self { stale_time }
    }
}

/// Point-in-time view of a query key, as a widget would render it
#[derive(Debug, Clone)]
pub struct QuerySnapshot<T, E> {
    pub status: QueryStatus,
    /// Latest successful data, kept while reloading or after a failure
    pub data: Option<T>,
    pub error: Option<E>,
    pub fetched_at: Option<Instant>,
    /// A request for this key is currently in flight
    pub is_fetching: bool,
    /// The data is older than the staleness window or was invalidated
    pub is_stale: bool,
}

impl<T, E> QuerySnapshot<T, E> {
    pub(crate) fn idle() -> Self {
        Self {
            status: QueryStatus::Idle,
            data: None,
            error: None,
            fetched_at: None,
            is_fetching: false,
            is_stale: true,
        }
    }
}

pub(crate) struct Entry {
    pub(crate) status: QueryStatus,
    pub(crate) data: Option<Erased>,
    pub(crate) error: Option<Erased>,
    pub(crate) fetched_at: Option<Instant>,
    pub(crate) stale_time: Duration,
    pub(crate) invalidated: bool,
    pub(crate) in_flight: Option<SharedFetch>,
    pub(crate) last_read: Instant,
    /// Bumped on every new request and every invalidation; a completing
    /// request only writes back when its generation is still current.
    pub(crate) generation: u64,
}

impl Entry {
    pub(crate) fn new(stale_time: Duration) -> Self {
        Self {
            status: QueryStatus::Idle,
            data: None,
            error: None,
            fetched_at: None,
            stale_time,
            invalidated: false,
            in_flight: None,
            last_read: Instant::now(),
            generation: 0,
        }
    }

    /// Nobody has read the entry within `retention` and nothing is pending
    pub(crate) fn is_unused(&self, now: Instant, retention: Duration) -> bool {
        self.in_flight.is_none() && now.saturating_duration_since(self.last_read) >= retention
    }

    pub(crate) fn is_stale(&self, now: Instant) -> bool {
        if self.invalidated || self.status != QueryStatus::Success {
            return true;
        }
        match self.fetched_at {
            Some(fetched_at) => now.saturating_duration_since(fetched_at) >= self.stale_time,
            None => true,
        }
    }

    /// Mark the entry stale and detach any in-flight request so its result
    /// is discarded when it lands.
    pub(crate) fn invalidate(&mut self, generation: u64) {
        self.invalidated = true;
        self.generation = generation;
        if self.in_flight.take().is_some() {
            self.status = self.settled_status();
        }
    }

    fn settled_status(&self) -> QueryStatus {
        if self.data.is_some() {
            QueryStatus::Success
        } else if self.error.is_some() {
            QueryStatus::Error
        } else {
            QueryStatus::Idle
        }
    }

    pub(crate) fn snapshot<T, E>(&self, now: Instant) -> QuerySnapshot<T, E>
    where
        T: Clone + 'static,
        E: Clone + 'static,
    {
        QuerySnapshot {
            status: self.status,
            data: self.data.as_ref().and_then(|d| d.downcast_ref::<T>()).cloned(),
            error: self.error.as_ref().and_then(|e| e.downcast_ref::<E>()).cloned(),
            fetched_at: self.fetched_at,
            is_fetching: self.in_flight.is_some(),
            is_stale: self.is_stale(now),
        }
    }
}
