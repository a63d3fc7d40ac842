// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Observer registry with explicit disposal.
//!
//! `subscribe` hands back a [`Subscription`]; the listener stays registered
//! until the subscription is unsubscribed or dropped.

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

/// Receives events of type `E`.
///
/// Called synchronously from the emitter; implementations should hand work
/// off (e.g. to a channel) rather than block.
pub trait Listener<E>: Send + Sync {
    fn notify(&self, event: &E);
}

impl<E, F> Listener<E> for F
where
    F: Fn(&E) + Send + Sync,
{
    fn notify(&self, event: &E) {
        self(event)
    }
}

type ListenerMap<E> = DashMap<u64, Arc<dyn Listener<E>>>;

/// Set of listeners for one event type. Clones share the same set.
pub struct ListenerRegistry<E> {
    listeners: Arc<ListenerMap<E>>,
    next_id: Arc<AtomicU64>,
}

impl<E: 'static> Clone for ListenerRegistry<E> {
    fn clone(&self) -> Self {
        Self {
            listeners: self.listeners.clone(),
            next_id: self.next_id.clone(),
        }
    }
}

impl<E: 'static> Default for ListenerRegistry<E> {
    fn default() -> Self {
        Self {
            listeners: Arc::new(DashMap::new()),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }
}

impl<E: 'static> ListenerRegistry<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. Dropping the returned subscription unregisters it.
    pub fn subscribe(&self, listener: Arc<dyn Listener<E>>) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.listeners.insert(id, listener);

        let weak: Weak<ListenerMap<E>> = Arc::downgrade(&self.listeners);
        Subscription {
            dispose: Some(Box::new(move || {
                if let Some(listeners) = weak.upgrade() {
                    listeners.remove(&id);
                }
            })),
        }
    }

    /// Deliver an event to every registered listener.
    pub fn emit(&self, event: &E) {
        // Snapshot first so listeners may unsubscribe while being notified.
        let listeners: Vec<Arc<dyn Listener<E>>> = self
            .listeners
            .iter()
            .map(|entry| entry.value().clone())
            .collect();

        for listener in listeners {
            listener.notify(event);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

/// Disposer for a registered listener.
#[must_use = "dropping a Subscription unregisters the listener"]
pub struct Subscription {
    dispose: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Unregister the listener now.
    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(dispose) = self.dispose.take() {
            dispose();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.dispose.is_some())
            .finish()
    }
}
