//! Keyed query cache with request de-duplication and prefix invalidation.
//!
//! # Design
//! Each `QueryKey` owns one entry: a `watch` channel carrying its
//! `QueryState`, the last fetcher registered for it, and at most one
//! in-flight request. The in-flight request is a `Shared` future that is also
//! spawned onto the runtime, so it completes whether or not anybody awaits it
//! and every caller that joins it receives the same result.
//!
//! The entry map sits behind a `std::sync::Mutex` that is never held across
//! an `.await`. Results are written back by the request itself, tagged with
//! the entry's generation; invalidation bumps the generation so a superseded
//! request's result is dropped instead of overwriting fresher state.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::ApiError;

/// Ordered segments identifying a cached read, e.g. `["blogs", "42"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// This key with one more segment appended.
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}

/// Produces the request future for a key. Called once per fetch.
pub type Fetcher<V> = Arc<dyn Fn() -> BoxFuture<'static, Result<V, ApiError>> + Send + Sync>;

type InFlight<V> = Shared<BoxFuture<'static, Result<V, ApiError>>>;
type Entries<V> = Mutex<HashMap<QueryKey, Entry<V>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    Idle,
    Loading,
    Success,
    Error,
}

/// Observable state of one key.
///
/// `data` survives refetches and failed refetches; only a successful fetch
/// replaces it.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState<V> {
    pub status: QueryStatus,
    pub data: Option<V>,
    pub error: Option<ApiError>,
    pub is_stale: bool,
}

impl<V> QueryState<V> {
    pub fn idle() -> Self {
        Self {
            status: QueryStatus::Idle,
            data: None,
            error: None,
            is_stale: false,
        }
    }

    /// First load: a request is outstanding and there is nothing to show yet.
    pub fn is_loading(&self) -> bool {
        self.status == QueryStatus::Loading && self.data.is_none()
    }

    pub fn is_fetching(&self) -> bool {
        self.status == QueryStatus::Loading
    }

    pub fn is_error(&self) -> bool {
        self.status == QueryStatus::Error
    }

    pub fn is_success(&self) -> bool {
        self.status == QueryStatus::Success
    }

    fn is_fresh(&self) -> bool {
        self.status == QueryStatus::Success && !self.is_stale
    }
}

impl<V> Default for QueryState<V> {
    fn default() -> Self {
        Self::idle()
    }
}

struct Entry<V> {
    state: watch::Sender<QueryState<V>>,
    fetcher: Option<Fetcher<V>>,
    in_flight: Option<InFlight<V>>,
    generation: u64,
}

impl<V> Entry<V> {
    fn new() -> Self {
        let (state, _) = watch::channel(QueryState::idle());
        Self {
            state,
            fetcher: None,
            in_flight: None,
            generation: 0,
        }
    }

    fn needs_fetch(&self) -> bool {
        self.in_flight.is_none() && !self.state.borrow().is_fresh()
    }
}

/// Cache of `V` values keyed by `QueryKey`. Cloning shares the cache.
pub struct QueryCache<V> {
    entries: Arc<Entries<V>>,
}

impl<V> Clone for QueryCache<V> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<V> fmt::Debug for QueryCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys = lock(&self.entries, "debug").len();
        f.debug_struct("QueryCache").field("keys", &keys).finish()
    }
}

impl<V: Clone + Send + Sync + 'static> Default for QueryCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone + Send + Sync + 'static> QueryCache<V> {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Subscribe to `key`, fetching it unless a fresh result is cached or a
    /// request is already in flight.
    ///
    /// Must be called from within a tokio runtime.
    pub fn observe(&self, key: QueryKey, fetcher: Fetcher<V>) -> QueryObserver<V> {
        let mut entries = lock(&self.entries, "observe");
        let entry = entries.entry(key.clone()).or_insert_with(Entry::new);
        entry.fetcher = Some(Arc::clone(&fetcher));
        let receiver = entry.state.subscribe();

        if entry.in_flight.is_some() {
            debug!(%key, "joining in-flight query");
        } else if entry.needs_fetch() {
            let _in_flight = start_fetch(&self.entries, &key, entry, fetcher);
        } else {
            debug!(%key, "serving cached query");
        }

        QueryObserver {
            key: Some(key),
            receiver,
        }
    }

    /// Resolve `key` once, sharing any in-flight request and serving a fresh
    /// cached result without a request.
    pub async fn fetch(&self, key: QueryKey, fetcher: Fetcher<V>) -> Result<V, ApiError> {
        let in_flight = {
            let mut entries = lock(&self.entries, "fetch");
            let entry = entries.entry(key.clone()).or_insert_with(Entry::new);
            entry.fetcher = Some(Arc::clone(&fetcher));

            if let Some(in_flight) = &entry.in_flight {
                debug!(%key, "joining in-flight query");
                in_flight.clone()
            } else if entry.needs_fetch() {
                start_fetch(&self.entries, &key, entry, fetcher)
            } else {
                let cached = entry.state.borrow().data.clone();
                match cached {
                    Some(data) => {
                        debug!(%key, "serving cached query");
                        return Ok(data);
                    }
                    None => start_fetch(&self.entries, &key, entry, fetcher),
                }
            }
        };
        in_flight.await
    }

    /// Mark every key starting with `prefix` stale and supersede its
    /// in-flight request. Keys with live observers refetch right away; the
    /// rest refetch when next observed. Returns the number of keys touched.
    pub fn invalidate(&self, prefix: &QueryKey) -> usize {
        let mut entries = lock(&self.entries, "invalidate");
        let mut touched = 0;

        for (key, entry) in entries.iter_mut().filter(|(key, _)| key.starts_with(prefix)) {
            touched += 1;
            entry.in_flight = None;
            entry.generation += 1;
            entry.state.send_modify(|state| state.is_stale = true);

            let observed = entry.state.receiver_count() > 0;
            match entry.fetcher.clone() {
                Some(fetcher) if observed => {
                    let _in_flight = start_fetch(&self.entries, key, entry, fetcher);
                }
                _ => entry.state.send_modify(|state| {
                    if state.status == QueryStatus::Loading {
                        state.status = if state.data.is_some() {
                            QueryStatus::Success
                        } else {
                            QueryStatus::Idle
                        };
                    }
                }),
            }
        }

        debug!(%prefix, touched, "invalidated queries");
        touched
    }

    pub fn state(&self, key: &QueryKey) -> Option<QueryState<V>> {
        let entries = lock(&self.entries, "state");
        entries.get(key).map(|entry| entry.state.borrow().clone())
    }

    pub fn data(&self, key: &QueryKey) -> Option<V> {
        self.state(key).and_then(|state| state.data)
    }
}

fn start_fetch<V: Clone + Send + Sync + 'static>(
    entries: &Arc<Entries<V>>,
    key: &QueryKey,
    entry: &mut Entry<V>,
    fetcher: Fetcher<V>,
) -> InFlight<V> {
    entry.generation += 1;
    let generation = entry.generation;
    entry.state.send_modify(|state| {
        state.status = QueryStatus::Loading;
        state.error = None;
    });
    debug!(%key, generation, "starting query fetch");

    let owner = Arc::downgrade(entries);
    let settle_key = key.clone();
    let request = async move {
        let result = fetcher().await;
        if let Some(entries) = owner.upgrade() {
            settle(&entries, &settle_key, generation, &result);
        }
        result
    }
    .boxed()
    .shared();

    entry.in_flight = Some(request.clone());
    tokio::spawn(request.clone());
    request
}

fn settle<V: Clone>(entries: &Entries<V>, key: &QueryKey, generation: u64, result: &Result<V, ApiError>) {
    let mut entries = lock(entries, "settle");
    let Some(entry) = entries.get_mut(key) else {
        return;
    };
    if entry.generation != generation {
        debug!(%key, generation, "discarding superseded query result");
        return;
    }

    entry.in_flight = None;
    entry.state.send_modify(|state| {
        match result {
            Ok(data) => {
                state.status = QueryStatus::Success;
                state.data = Some(data.clone());
                state.error = None;
            }
            Err(err) => {
                state.status = QueryStatus::Error;
                state.error = Some(err.clone());
            }
        }
        state.is_stale = false;
    });
}

fn lock<'a, V>(
    entries: &'a Entries<V>,
    op: &'static str,
) -> MutexGuard<'a, HashMap<QueryKey, Entry<V>>> {
    match entries.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            warn!(op, "recovered from poisoned query cache lock");
            poisoned.into_inner()
        }
    }
}

/// A subscription to one key's state.
///
/// Holding an observer keeps the key "observed": invalidation refetches it
/// immediately instead of waiting for the next observation.
pub struct QueryObserver<V> {
    key: Option<QueryKey>,
    receiver: watch::Receiver<QueryState<V>>,
}

impl<V: Clone> QueryObserver<V> {
    /// An observer that never fetches and stays `Idle`.
    pub fn disabled() -> Self {
        let (_, receiver) = watch::channel(QueryState::idle());
        Self { key: None, receiver }
    }

    pub fn key(&self) -> Option<&QueryKey> {
        self.key.as_ref()
    }

    pub fn is_enabled(&self) -> bool {
        self.key.is_some()
    }

    pub fn state(&self) -> QueryState<V> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next state change. `None` for a disabled observer.
    pub async fn changed(&mut self) -> Option<QueryState<V>> {
        self.receiver.changed().await.ok()?;
        Some(self.state())
    }

    /// Wait until no request is outstanding for this key.
    pub async fn settled(&mut self) -> QueryState<V> {
        if let Ok(state) = self.receiver.wait_for(|state| !state.is_fetching()).await {
            return (*state).clone();
        }
        self.state()
    }
}

impl<V> fmt::Debug for QueryObserver<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryObserver").field("key", &self.key).finish_non_exhaustive()
    }
}
