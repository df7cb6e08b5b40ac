//! Asynchronous action creators.
//!
//! An async action creator is handed a [`Resolver`] instead of returning an
//! action. It can start any out-of-band work (a thread, a timer, an I/O
//! request) and call [`Resolver::resolve`] when that work is done. Resolving
//! evaluates a regular action creator against the state at that moment and
//! dispatches its action on the resolving thread. The store stays locked
//! from that state read until the callback has run, so the callback sees the
//! state its own action produced.
//!
//! There is no timeout and no cancellation. A resolver that is dropped
//! without being resolved simply never dispatches, and the callback attached
//! to it never runs.

use std::fmt;

use tracing::debug;

use super::store::Store;
use crate::action::Action;
use crate::error::Result;

/// Invoked with the post-dispatch state once a resolved action was dispatched.
pub type DispatchCallback<S> = Box<dyn FnOnce(&S) + Send>;

/// Completes an async action creator.
pub struct Resolver<S> {
    store: Store<S>,
    callback: Option<DispatchCallback<S>>,
    resolved: bool,
}

impl<S> Resolver<S>
where
    S: Send + Sync + 'static,
{
    pub(crate) fn new(store: Store<S>, callback: Option<DispatchCallback<S>>) -> Self {
        Self {
            store,
            callback,
            resolved: false,
        }
    }

    /// Evaluate `creator` against the current state and dispatch what it
    /// produces.
    ///
    /// If an action was dispatched, the callback (if any) runs afterwards with
    /// the store's new state. If `creator` yields nothing, nothing is
    /// dispatched and the callback does not run.
    pub fn resolve<A, F>(mut self, creator: F) -> Result<()>
    where
        A: Action,
        F: FnOnce(&S, &Store<S>) -> Option<A>,
    {
        self.resolved = true;

        let _serial = self.store.serialized();
        let state = self.store.state();
        let Some(action) = creator(&*state, &self.store) else {
            return Ok(());
        };

        self.store.dispatch(action)?;

        if let Some(callback) = self.callback.take() {
            callback(self.store.state().as_ref());
        }

        Ok(())
    }
}

impl<S> Drop for Resolver<S> {
    fn drop(&mut self) {
        if !self.resolved {
            debug!(
                has_callback = self.callback.is_some(),
                "async action creator dropped its resolver without resolving"
            );
        }
    }
}

impl<S> fmt::Debug for Resolver<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("has_callback", &self.callback.is_some())
            .field("resolved", &self.resolved)
            .finish()
    }
}
