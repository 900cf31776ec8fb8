//! Observable per-key resource state.

use std::collections::HashMap;
use std::hash::Hash;

use tokio::sync::watch;

use crate::resource::Resource;

/// Map of key to tagged result, published on a `watch` channel.
///
/// Every update replaces the entry for one key and notifies all receivers
/// with the whole map.
#[derive(Debug)]
pub struct KeyedState<K, T> {
    tx: watch::Sender<HashMap<K, Resource<T>>>,
}

impl<K, T> Default for KeyedState<K, T> {
    fn default() -> Self {
        let (tx, _rx) = watch::channel(HashMap::new());
        Self { tx }
    }
}

impl<K: Eq + Hash + Clone, T: Clone> KeyedState<K, T> {
    /// Creates an empty state map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to map updates.
    pub fn subscribe(&self) -> watch::Receiver<HashMap<K, Resource<T>>> {
        self.tx.subscribe()
    }

    /// Current result for `key`.
    pub fn get(&self, key: &K) -> Option<Resource<T>> {
        self.tx.borrow().get(key).cloned()
    }

    /// Replaces the result for `key`.
    pub fn publish(&self, key: K, resource: Resource<T>) {
        self.tx.send_modify(|map| {
            map.insert(key, resource);
        });
    }
}
