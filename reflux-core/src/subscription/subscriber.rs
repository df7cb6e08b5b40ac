//! Subscriber types for the store.
//!
//! A subscriber is anything that wants to receive state values from a store.
//! It is identified by the allocation it lives in, so subscribing the same
//! `Arc` twice refers to the same subscriber.

use std::sync::Arc;

/// Unique identifier for a subscriber.
///
/// Derived from the address of the subscriber's `Arc` allocation. The store
/// keeps the `Arc` alive while the subscriber is registered, so the address
/// cannot be reused by another subscriber in the meantime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(usize);

impl SubscriberId {
    /// Identity of the subscriber behind `subscriber`.
    pub fn of<T: ?Sized>(subscriber: &Arc<T>) -> Self {
        Self(Arc::as_ptr(subscriber).cast::<()>() as usize)
    }
}

/// A subscriber to store updates.
///
/// `new_state` is called once with the current value right after
/// subscribing, then again for every state change that makes it through the
/// subscription's filters.
pub trait StoreSubscriber<T>: Send + Sync {
    fn new_state(&self, state: &T);
}

impl<T, F> StoreSubscriber<T> for F
where
    F: Fn(&T) + Send + Sync,
{
    fn new_state(&self, state: &T) {
        self(state)
    }
}
