// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node listener storage.
//!
//! The registry maps a node key to a [`ListenerList`]. Lists are installed
//! lazily on first registration and are not removed when they become empty;
//! use [`ListenerRegistry::forget_node`] when the node itself goes away.
//!
//! The registry performs no locking of its own. The dispatcher owns it and
//! serializes every access onto the UI thread.

use std::hash::Hash;
use std::sync::Arc;

use hashbrown::HashMap;

use crate::listener::SharedListener;

/// Ordered listeners registered on a single node.
///
/// Insertion order is preserved and duplicates are permitted.
#[derive(Debug, Default)]
pub struct ListenerList {
    listeners: Vec<SharedListener>,
}

impl ListenerList {
    /// Append a listener.
    pub fn add(&mut self, listener: SharedListener) {
        self.listeners.push(listener);
    }

    /// Remove the first occurrence of `listener`, compared by identity.
    ///
    /// Returns `true` if a listener was removed.
    pub fn remove(&mut self, listener: &SharedListener) -> bool {
        match self.listeners.iter().position(|l| Arc::ptr_eq(l, listener)) {
            Some(i) => {
                self.listeners.remove(i);
                true
            }
            None => false,
        }
    }

    /// Remove every listener.
    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Whether no listener is registered.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// An ordered, immutable copy of the current listeners.
    pub fn snapshot(&self) -> Arc<[SharedListener]> {
        self.listeners.iter().cloned().collect()
    }
}

/// Listener lists keyed by node identity.
#[derive(Debug)]
pub struct ListenerRegistry<K> {
    lists: HashMap<K, ListenerList>,
}

impl<K> Default for ListenerRegistry<K> {
    fn default() -> Self {
        Self {
            lists: HashMap::new(),
        }
    }
}

impl<K: Copy + Eq + Hash> ListenerRegistry<K> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the list for `node`, installing an empty one if absent.
    pub fn install_if_absent(&mut self, node: K) -> &mut ListenerList {
        self.lists.entry(node).or_default()
    }

    /// Return the list for `node`, if one was installed.
    pub fn lookup(&self, node: &K) -> Option<&ListenerList> {
        self.lists.get(node)
    }

    /// Mutable variant of [`lookup`](Self::lookup). Never installs.
    pub fn lookup_mut(&mut self, node: &K) -> Option<&mut ListenerList> {
        self.lists.get_mut(node)
    }

    /// Drop the list installed on `node`, if any.
    pub fn forget_node(&mut self, node: &K) -> Option<ListenerList> {
        self.lists.remove(node)
    }

    /// Snapshot the listeners of `node` if it carries a non-empty list.
    pub fn interested(&self, node: &K) -> Option<Arc<[SharedListener]>> {
        self.lookup(node)
            .filter(|list| !list.is_empty())
            .map(ListenerList::snapshot)
    }
}
