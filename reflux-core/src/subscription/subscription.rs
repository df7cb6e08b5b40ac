//! Subscription Implementation
//!
//! A subscription carries `(old, new)` state pairs from the store to a single
//! observer. Derived subscriptions are built by composition:
//!
//! - `select` narrows the state to a projection.
//! - `skip_repeats` / `skip` drop updates a predicate considers repeats.
//! - `only` forwards updates a predicate accepts.
//!
//! # How the Chain Is Built
//!
//! A subscription does not hold an observer slot per stage. It holds a
//! `connect` closure that, given the observer of this stage, wires a
//! translated observer into its parent. Each combinator consumes its parent
//! and wraps `connect` once more, so when the head is finally observed the
//! whole chain collapses into one closure sitting at the root.
//!
//! Consuming the parent means a subscription can back at most one derived
//! chain, and a chain has exactly one observer.
//!
//! # Old Values
//!
//! The first event a chain sees has no old value. Repeat filters always let it
//! through, which is how new subscribers get their initial snapshot.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

/// Receives `(old, new)` pairs.
pub(crate) type Observer<S> = Box<dyn Fn(Option<&S>, &S) + Send + Sync>;

/// Pins a closure to the observer signature.
fn observer<S, F>(f: F) -> Observer<S>
where
    F: Fn(Option<&S>, &S) + Send + Sync + 'static,
{
    Box::new(f)
}

/// A composable stream of state updates.
///
/// # Example
///
/// ```rust,ignore
/// store.subscribe_with(&subscriber, |subscription| {
///     subscription
///         .select(|state: &AppState| state.user.name.clone())
///         .skip_repeats()
/// });
/// ```
pub struct Subscription<S> {
    connect: Box<dyn FnOnce(Observer<S>) + Send>,
}

/// The store-facing end of a root subscription.
///
/// Holds whatever observer the chain installed at the root.
pub(crate) struct RootLink<S> {
    slot: Arc<Mutex<Option<Observer<S>>>>,
}

impl<S> RootLink<S> {
    /// Take the composed observer out of the root, if the chain was observed.
    pub(crate) fn into_observer(self) -> Option<Observer<S>> {
        self.slot.lock().take()
    }
}

impl<S: 'static> Subscription<S> {
    /// Create a root subscription and the link the store feeds it through.
    pub(crate) fn root() -> (Self, RootLink<S>) {
        let slot = Arc::new(Mutex::new(None));
        let target = Arc::clone(&slot);
        let subscription = Self {
            connect: Box::new(move |observer| {
                *target.lock() = Some(observer);
            }),
        };

        (subscription, RootLink { slot })
    }

    fn derive<T, F>(self, adapt: F) -> Subscription<T>
    where
        T: 'static,
        F: FnOnce(Observer<T>) -> Observer<S> + Send + 'static,
    {
        let parent = self.connect;
        Subscription {
            connect: Box::new(move |sink| parent(adapt(sink))),
        }
    }

    /// Install the single observer of this subscription.
    pub(crate) fn observe<F>(self, f: F)
    where
        F: Fn(Option<&S>, &S) + Send + Sync + 'static,
    {
        (self.connect)(observer(f));
    }

    /// Provides a subscription that selects a substate of this one.
    ///
    /// The selector is applied to both the old and the new state; the
    /// result is forwarded unconditionally.
    pub fn select<T, F>(self, selector: F) -> Subscription<T>
    where
        T: 'static,
        F: Fn(&S) -> T + Send + Sync + 'static,
    {
        self.derive(move |sink: Observer<T>| {
            observer(move |old: Option<&S>, new: &S| {
                let old = old.map(&selector);
                let new = selector(new);
                sink(old.as_ref(), &new);
            })
        })
    }

    /// Provides a subscription that skips updates `is_repeat` flags.
    ///
    /// The first update (no old value) is always forwarded.
    pub fn skip_repeats_by<F>(self, is_repeat: F) -> Subscription<S>
    where
        F: Fn(&S, &S) -> bool + Send + Sync + 'static,
    {
        self.derive(move |sink: Observer<S>| {
            observer(move |old: Option<&S>, new: &S| match old {
                Some(old) if is_repeat(old, new) => {}
                _ => sink(old, new),
            })
        })
    }

    /// Provides a subscription that skips updates equal to the previous value.
    pub fn skip_repeats(self) -> Subscription<S>
    where
        S: PartialEq,
    {
        self.skip_repeats_by(|old, new| old == new)
    }

    /// Same as [`skip_repeats_by`](Self::skip_repeats_by).
    pub fn skip<F>(self, when: F) -> Subscription<S>
    where
        F: Fn(&S, &S) -> bool + Send + Sync + 'static,
    {
        self.skip_repeats_by(when)
    }

    /// Provides a subscription that only forwards updates `when` accepts.
    ///
    /// The inverse of [`skip`](Self::skip).
    pub fn only<F>(self, when: F) -> Subscription<S>
    where
        F: Fn(&S, &S) -> bool + Send + Sync + 'static,
    {
        self.skip_repeats_by(move |old, new| !when(old, new))
    }
}

impl<S> fmt::Debug for Subscription<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}
