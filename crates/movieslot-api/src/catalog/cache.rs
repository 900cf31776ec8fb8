//! Keyed response cache with tagged-result publishing.
#![allow(clippy::future_not_send)]

use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Mutex, PoisonError};

use anyhow::Result;

use crate::resource::Resource;

/// Last successful payload per key.
///
/// Entries are written only on success and never evicted. Concurrent
/// fetches of the same key are not deduplicated; the last writer wins.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct ResponseCache<K, T> {
    entries: Mutex<HashMap<K, T>>,
}

impl<K, T> Default for ResponseCache<K, T> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<K: Eq + Hash + Debug, T: Clone> ResponseCache<K, T> {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached payload for `key`.
    pub fn get(&self, key: &K) -> Option<T> {
        self.lock().get(key).cloned()
    }

    /// Stores `value` under `key`, replacing any previous payload.
    pub fn insert(&self, key: K, value: T) {
        self.lock().insert(key, value);
    }

    /// Number of cached keys.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Serves `key` from the cache or runs `request`.
    ///
    /// On a cache hit without `force_reload`, publishes `Success` and never
    /// polls `request`. Otherwise publishes `Loading`, awaits `request`, and
    /// publishes `Success` after caching the payload, or `Error` carrying the
    /// previously cached payload for `key`.
    pub async fn fetch<Fut>(
        &self,
        key: K,
        force_reload: bool,
        publish: impl Fn(Resource<T>),
        request: Fut,
    ) -> Resource<T>
    where
        Fut: Future<Output = Result<T>>,
    {
        let cached = self.get(&key);
        if !force_reload && let Some(value) = cached {
            tracing::debug!(?key, "serving cached payload");
            let resource = Resource::Success(value);
            publish(resource.clone());
            return resource;
        }

        publish(Resource::Loading);
        let resource = match request.await {
            Ok(value) => {
                self.insert(key, value.clone());
                Resource::Success(value)
            }
            Err(err) => {
                tracing::warn!(?key, error = %format!("{err:#}"), "fetch failed");
                Resource::error(&err, cached)
            }
        };
        publish(resource.clone());
        resource
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<K, T>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
