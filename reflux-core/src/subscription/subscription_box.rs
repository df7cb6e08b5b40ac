//! Subscription boxes.
//!
//! A box binds one subscriber to one subscription chain. The subscriber may
//! want a narrowed view of the state (`T`), but the store can only hold
//! values that accept its full state (`S`). The box hides `T` inside the
//! closures of the chain: all it keeps is the observer installed at the root
//! of the chain, which takes `(old, new)` pairs of the full state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::subscription::{Observer, Subscription};
use super::subscriber::{StoreSubscriber, SubscriberId};

pub(crate) struct SubscriptionBox<S> {
    subscriber_id: SubscriberId,

    /// The composed chain. `None` only if the chain was never observed.
    observer: Option<Observer<S>>,

    /// Cleared when the box is removed from its store. A fan-out pass that
    /// already took a snapshot of the box list checks this before delivering.
    active: AtomicBool,
}

impl<S: 'static> SubscriptionBox<S> {
    /// Build a fresh root, run `transform` on it and wire the resulting head
    /// to `subscriber`.
    pub(crate) fn new<T, Sub, F>(subscriber: &Arc<Sub>, transform: F) -> Self
    where
        T: 'static,
        Sub: StoreSubscriber<T> + ?Sized + 'static,
        F: FnOnce(Subscription<S>) -> Subscription<T>,
    {
        let (root, link) = Subscription::root();
        let head = transform(root);

        let target = Arc::clone(subscriber);
        head.observe(move |_, new: &T| target.new_state(new));

        Self {
            subscriber_id: SubscriberId::of(subscriber),
            observer: link.into_observer(),
            active: AtomicBool::new(true),
        }
    }

    pub(crate) fn subscriber_id(&self) -> SubscriberId {
        self.subscriber_id
    }

    /// Push a state change into the chain.
    pub(crate) fn new_values(&self, old: Option<&S>, new: &S) {
        if !self.is_active() {
            return;
        }
        if let Some(observer) = &self.observer {
            observer(old, new);
        }
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    pub(crate) fn deactivate(&self) {
        self.active.store(false, Ordering::Release);
    }
}
