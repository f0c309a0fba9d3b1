//! Keyed read cache with request deduplication

use futures_util::future::FutureExt;
use log::{debug, trace, warn};
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::{Duration, Instant};

use crate::key::{Family, QueryKey};
use crate::state::{Entry, Erased, QueryOptions, QuerySnapshot, QueryStatus, SharedFetch};

/// How long an entry nobody reads is kept around
pub const DEFAULT_RETENTION: Duration = Duration::from_secs(5 * 60);

struct Registry {
    entries: HashMap<QueryKey, Entry>,
    /// Every cached key, grouped by family
    families: HashMap<Family, HashSet<QueryKey>>,
    generations: u64,
    retention: Duration,
}

impl Registry {
    fn new(retention: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            families: HashMap::new(),
            generations: 0,
            retention,
        }
    }

    /// Drop entries that have gone unread for the retention period
    fn collect_garbage(&mut self, now: Instant) -> usize {
        let retention = self.retention;
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| !entry.is_unused(now, retention));

        let entries = &self.entries;
        self.families.retain(|_, keys| {
            keys.retain(|key| entries.contains_key(key));
            !keys.is_empty()
        });

        let dropped = before - self.entries.len();
        if dropped > 0 {
            debug!("Dropped {} unused queries", dropped);
        }
        dropped
    }

    fn next_generation(&mut self) -> u64 {
        self.generations += 1;
        self.generations
    }

    fn entry(&mut self, key: &QueryKey, stale_time: Duration) -> &mut Entry {
        self.families
            .entry(key.family())
            .or_default()
            .insert(key.clone());
        let entry = self
            .entries
            .entry(key.clone())
            .or_insert_with(|| Entry::new(stale_time));
        entry.stale_time = stale_time;
        entry.last_read = Instant::now();
        entry
    }

    fn complete(&mut self, key: &QueryKey, generation: u64, outcome: &Result<Erased, Erased>) {
        let Some(entry) = self.entries.get_mut(key) else {
            trace!("Discarding result for dropped query {}", key);
            return;
        };
        if entry.generation != generation {
            debug!("Discarding superseded result for query {}", key);
            return;
        }

        entry.in_flight = None;
        match outcome {
            Ok(data) => {
                entry.status = QueryStatus::Success;
                entry.data = Some(Arc::clone(data));
                entry.error = None;
                entry.fetched_at = Some(Instant::now());
                entry.invalidated = false;
            }
            Err(error) => {
                entry.status = QueryStatus::Error;
                entry.error = Some(Arc::clone(error));
            }
        }
    }
}

fn lock(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Shared cache of read results.
///
/// Cloning is cheap; clones share the same cache. Reads must run inside a
/// tokio runtime because every request is spawned so it finishes even when
/// all callers have gone away.
///
/// Entries that have not been read for the retention period
/// ([`DEFAULT_RETENTION`] unless set with [`QueryClient::with_retention`])
/// and have no request in flight are dropped on the next read.
#[derive(Clone)]
pub struct QueryClient {
    registry: Arc<Mutex<Registry>>,
}

impl Default for QueryClient {
    fn default() -> Self {
        Self::with_retention(DEFAULT_RETENTION)
    }
}

impl QueryClient {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty cache that forgets entries unread for `retention`
    pub fn with_retention(retention: Duration) -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry::new(retention))),
        }
    }

    /// Drop unused entries now. Returns how many went.
    pub fn collect_garbage(&self) -> usize {
        self.registry().collect_garbage(Instant::now())
    }

    /// Read `key`, going to the network only when needed.
    ///
    /// Fresh data is returned straight from the cache. When a request for
    /// the key is already in flight the caller awaits that request instead
    /// of issuing another one. Otherwise `fetcher` is called exactly once.
    /// Failures are handed to the caller but never served from the cache.
    ///
    /// Every reader of a key is expected to use the same `T` and `E`.
    pub async fn fetch<T, E, F, Fut>(
        &self,
        key: QueryKey,
        options: QueryOptions,
        fetcher: F,
    ) -> Result<T, E>
    where
        T: Clone + Send + Sync + 'static,
        E: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let (pending, unused_fetcher) = {
            let mut registry = self.registry();
            let now = Instant::now();
            registry.collect_garbage(now);
            let generation = registry.next_generation();
            let entry = registry.entry(&key, options.stale_time);

            if !entry.is_stale(now) {
                if let Some(data) = entry.data.as_ref().and_then(|d| d.downcast_ref::<T>()) {
                    trace!("Query {} served from cache", key);
                    return Ok(data.clone());
                }
            }

            match entry.in_flight.clone() {
                Some(pending) => {
                    debug!("Query {} joined the request in flight", key);
                    (pending, Some(fetcher))
                }
                None => {
                    debug!("Query {} fetching", key);
                    let pending = start(
                        Arc::downgrade(&self.registry),
                        key.clone(),
                        entry,
                        generation,
                        fetcher(),
                    );
                    (pending, None)
                }
            }
        };

        let outcome = pending.await;
        let typed = match &outcome {
            Ok(data) => data.downcast_ref::<T>().cloned().map(Ok),
            Err(error) => error.downcast_ref::<E>().cloned().map(Err),
        };

        match (typed, unused_fetcher) {
            (Some(result), _) => result,
            (None, Some(fetcher)) => {
                warn!("Query {} is shared by readers of different types; fetching uncached", key);
                fetcher().await
            }
            (None, None) => unreachable!("query {} resolved with a foreign type", key),
        }
    }

    /// Mark every query of `family` stale. Returns how many keys were hit.
    ///
    /// Requests in flight for those keys are detached: their callers still
    /// get the result, but it is not written to the cache.
    pub fn invalidate_family(&self, family: Family) -> usize {
        let mut guard = self.registry();
        let Registry {
            entries,
            families,
            generations,
            ..
        } = &mut *guard;

        let Some(keys) = families.get(&family) else {
            return 0;
        };

        let mut count = 0;
        for key in keys {
            if let Some(entry) = entries.get_mut(key) {
                *generations += 1;
                entry.invalidate(*generations);
                count += 1;
            }
        }
        debug!("Invalidated {} {} queries", count, family);
        count
    }

    /// Mark a single query stale
    pub fn invalidate(&self, key: &QueryKey) -> bool {
        let mut registry = self.registry();
        let generation = registry.next_generation();
        match registry.entries.get_mut(key) {
            Some(entry) => {
                entry.invalidate(generation);
                true
            }
            None => false,
        }
    }

    /// Current state of `key`
    pub fn snapshot<T, E>(&self, key: &QueryKey) -> QuerySnapshot<T, E>
    where
        T: Clone + 'static,
        E: Clone + 'static,
    {
        let registry = self.registry();
        match registry.entries.get(key) {
            Some(entry) => entry.snapshot(Instant::now()),
            None => QuerySnapshot::idle(),
        }
    }

    /// Latest successful data for `key`, stale or not
    pub fn get_data<T: Clone + 'static>(&self, key: &QueryKey) -> Option<T> {
        let registry = self.registry();
        registry
            .entries
            .get(key)
            .and_then(|entry| entry.data.as_ref())
            .and_then(|data| data.downcast_ref::<T>())
            .cloned()
    }

    /// Drop every entry and family registration
    pub fn clear(&self) {
        let mut registry = self.registry();
        let dropped = registry.entries.len();
        registry.entries.clear();
        registry.families.clear();
        debug!("Cleared {} cached queries", dropped);
    }

    fn registry(&self) -> MutexGuard<'_, Registry> {
        lock(&self.registry)
    }
}

fn start<T, E, Fut>(
    registry: Weak<Mutex<Registry>>,
    key: QueryKey,
    entry: &mut Entry,
    generation: u64,
    request: Fut,
) -> SharedFetch
where
    T: Send + Sync + 'static,
    E: Send + Sync + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
{
    entry.generation = generation;
    entry.status = QueryStatus::Loading;

    let pending = async move {
        let outcome = match request.await {
            Ok(data) => Ok(Arc::new(data) as Erased),
            Err(error) => Err(Arc::new(error) as Erased),
        };
        if let Some(registry) = registry.upgrade() {
            lock(&registry).complete(&key, generation, &outcome);
        }
        outcome
    }
    .boxed()
    .shared();

    entry.in_flight = Some(pending.clone());
    tokio::spawn(pending.clone());
    pending
}
