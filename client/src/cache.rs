use dashmap::DashMap;
use std::{
    any::Any,
    future::Future,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};
use tokio::sync::{watch, Mutex};

use crate::Error;

/// Identifies a cached server resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Events of the logged-in staff member.
    Events,
    Event(u64),
    /// Public listing, optionally scoped to a campus.
    PublicEvents(Option<u64>),
    /// Public event detail by unique link.
    PublicEvent(String),
    /// Authorizations of an event.
    Authorizations(u64),
    /// Pre-registered students of an event.
    Preregistered(u64),
    Campuses,
    Users,
}

impl CacheKey {
    /// Whether this key holds data derived from the given event.
    pub fn concerns_event(&self, event_id: u64) -> bool {
        match self {
            CacheKey::Events | CacheKey::PublicEvents(_) | CacheKey::PublicEvent(_) => true,
            CacheKey::Event(id) | CacheKey::Authorizations(id) | CacheKey::Preregistered(id) => {
                *id == event_id
            }
            CacheKey::Campuses | CacheKey::Users => false,
        }
    }
}

type Value = Arc<dyn Any + Send + Sync>;

#[derive(Default)]
struct Entry {
    value: Option<Value>,
    /// Invalidation epoch of the slot when the value's fetch started.
    epoch: u64,
    fetched_at: Option<Instant>,
    /// Error of the latest failed fetch, handed to callers that waited on it.
    error: Option<Error>,
}

struct Slot {
    /// Held for the whole duration of a fetch, so at most one fetch per key
    /// is in flight.
    entry: Mutex<Entry>,
    /// Bumped by every invalidation.
    epoch: AtomicU64,
    /// Count of completed fetches.
    fetches: AtomicU64,
    version: watch::Sender<u64>,
}

impl Slot {
    fn new() -> Self {
        let (version, _) = watch::channel(0);
        Self {
            entry: Mutex::new(Entry::default()),
            epoch: AtomicU64::new(0),
            fetches: AtomicU64::new(0),
            version,
        }
    }

    fn notify(&self) {
        self.version.send_modify(|version| *version += 1);
    }
}

/// A keyed, invalidation-driven cache of server resources.
///
/// Reads return the cached value while it is fresh and fetch it otherwise.
/// Writes go to the backend first and then invalidate the keys they affect.
/// A fetch that started before an invalidation of its key is handed to its
/// caller but never marked fresh.
pub struct Cache {
    slots: DashMap<CacheKey, Arc<Slot>>,
    /// Values older than this are refetched even if never invalidated.
    max_age: Option<Duration>,
}

impl Default for Cache {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Cache {
    pub fn new(max_age: Option<Duration>) -> Self {
        Self {
            slots: DashMap::new(),
            max_age,
        }
    }

    fn slot(&self, key: &CacheKey) -> Arc<Slot> {
        self.slots
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Slot::new()))
            .value()
            .clone()
    }

    fn fresh<T: Any + Send + Sync>(&self, slot: &Slot, entry: &Entry) -> Option<Arc<T>> {
        if entry.epoch != slot.epoch.load(Ordering::Acquire) {
            return None;
        }

        if let (Some(max_age), Some(fetched_at)) = (self.max_age, entry.fetched_at) {
            if fetched_at.elapsed() >= max_age {
                return None;
            }
        }

        entry.value.clone()?.downcast::<T>().ok()
    }

    /// Reads `key`, calling `fetch` if no fresh value is cached.
    ///
    /// Concurrent reads of the same key wait for a single fetch and share its
    /// outcome, including its error.
    pub async fn get<T, F, Fut>(&self, key: &CacheKey, fetch: F) -> Result<Arc<T>, Error>
    where
        T: Any + Send + Sync,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, Error>>,
    {
        let slot = self.slot(key);
        let seen = slot.fetches.load(Ordering::Acquire);
        let mut entry = slot.entry.lock().await;

        if let Some(value) = self.fresh::<T>(&slot, &entry) {
            tracing::debug!("cache hit: {key:?}");
            return Ok(value);
        }

        if slot.fetches.load(Ordering::Acquire) != seen {
            if let Some(ref err) = entry.error {
                return Err(err.clone());
            }
        }

        tracing::debug!("cache miss: {key:?}");
        let epoch = slot.epoch.load(Ordering::Acquire);
        let result = fetch().await;
        slot.fetches.fetch_add(1, Ordering::AcqRel);

        match result {
            Ok(value) => {
                let value = Arc::new(value);
                entry.value = Some(value.clone() as Value);
                entry.epoch = epoch;
                entry.fetched_at = Some(Instant::now());
                entry.error = None;
                drop(entry);

                slot.notify();
                Ok(value)
            }
            Err(err) => {
                tracing::debug!("fetching {key:?} failed: {err}");
                entry.error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Marks `key` stale, so the next read refetches it.
    pub fn invalidate(&self, key: &CacheKey) {
        if let Some(slot) = self.slots.get(key) {
            tracing::debug!("invalidating {key:?}");
            slot.epoch.fetch_add(1, Ordering::AcqRel);
            slot.notify();
        }
    }

    /// Marks every key matching `predicate` stale.
    pub fn invalidate_where(&self, mut predicate: impl FnMut(&CacheKey) -> bool) {
        for slot in self.slots.iter() {
            if predicate(slot.key()) {
                tracing::debug!("invalidating {:?}", slot.key());
                slot.epoch.fetch_add(1, Ordering::AcqRel);
                slot.notify();
            }
        }
    }

    /// Edits the fresh value of `key` in place.
    ///
    /// Returns `false`, leaving the cache untouched, if no fresh value of
    /// type `T` is cached or `edit` returns `false`.
    pub async fn update<T, F>(&self, key: &CacheKey, edit: F) -> bool
    where
        T: Any + Clone + Send + Sync,
        F: FnOnce(&mut T) -> bool,
    {
        let Some(slot) = self.slots.get(key).map(|slot| slot.value().clone()) else {
            return false;
        };
        let mut entry = slot.entry.lock().await;

        let Some(current) = self.fresh::<T>(&slot, &entry) else {
            return false;
        };

        let mut value = T::clone(&current);
        if !edit(&mut value) {
            return false;
        }

        entry.value = Some(Arc::new(value) as Value);
        drop(entry);

        slot.notify();
        true
    }

    /// Subscribes to changes of `key`: fetches, updates and invalidations.
    pub fn subscribe(&self, key: &CacheKey) -> watch::Receiver<u64> {
        self.slot(key).version.subscribe()
    }

    /// Whether a fresh value is cached for `key`.
    pub fn is_fresh(&self, key: &CacheKey) -> bool {
        let Some(slot) = self.slots.get(key).map(|slot| slot.value().clone()) else {
            return false;
        };
        let Ok(entry) = slot.entry.try_lock() else {
            return false;
        };

        entry.value.is_some()
            && entry.epoch == slot.epoch.load(Ordering::Acquire)
            && self
                .max_age
                .zip(entry.fetched_at)
                .map_or(true, |(max_age, at)| at.elapsed() < max_age)
    }
}
