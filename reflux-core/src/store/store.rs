//! Store Implementation
//!
//! The store owns the current state, the reducer, the composed dispatch
//! function and the ordered list of subscription boxes.
//!
//! # Dispatch
//!
//! 1. `dispatch` hands the action to the composed dispatch function, which
//!    runs the middleware chain.
//!
//! 2. The innermost function (the default dispatch) marks the store as
//!    reducing, calls the reducer with the action and the current state, and
//!    clears the mark.
//!
//! 3. The reducer's result replaces the current state, and every subscription
//!    box is handed `(old, new)` in subscription order.
//!
//! All of this happens on the calling thread before `dispatch` returns.
//!
//! # Thread Safety
//!
//! A store handle is `Send + Sync` and cheap to clone. Every dispatch and
//! every change to the subscription list runs inside a per-store re-entrant
//! lock, so calls from different threads are serialized. The same thread may
//! re-enter (a middleware re-dispatching, a subscriber dispatching a follow-up
//! action); only a reducer dispatching into its own store is rejected.
//!
//! Action creators hold the same lock from reading the state until their
//! action is dispatched, so a read-modify-write creator cannot interleave
//! with another thread's dispatch.
//!
//! A subscriber that dispatches while being notified sees its nested update
//! delivered to every subscriber first. Subscribers after it in the outer pass
//! then receive the outer, older update last, so their latest delivered value
//! can lag behind [`Store::state`].

use std::fmt;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Weak};

use indexmap::IndexMap;
use parking_lot::{Mutex, ReentrantMutex, ReentrantMutexGuard, RwLock};
use tracing::{debug, trace, warn};

use super::creator::{DispatchCallback, Resolver};
use super::guard::DispatchGuard;
use super::middleware::{compose, DispatchFunction, GetState, Middleware};
use crate::action::Action;
use crate::error::{Result, StoreError};
use crate::subscription::{StoreSubscriber, SubscriberId, Subscription, SubscriptionBox};

/// Computes the next state from an action and the current state.
///
/// The state is `None` only for the very first call of a store that was
/// created without an initial state; the reducer is expected to return a
/// default state then.
pub type Reducer<S> = Box<dyn Fn(&dyn Action, Option<&S>) -> S + Send + Sync>;

/// Dispatched once by stores created without an initial state.
///
/// Private, so reducers and middleware can only see it as an action they
/// don't know.
#[derive(Debug)]
struct Bootstrap;

/// The dispatch-only view of a store.
pub trait DispatchingStore {
    /// Dispatch an already boxed action.
    fn dispatch_boxed(&self, action: Box<dyn Action>) -> Result<()>;
}

struct StoreInner<S> {
    state: RwLock<Option<Arc<S>>>,
    reducer: Reducer<S>,
    dispatch_function: RwLock<DispatchFunction>,
    subscriptions: Mutex<IndexMap<SubscriberId, Arc<SubscriptionBox<S>>>>,

    /// Set only while the reducer runs.
    is_dispatching: AtomicBool,

    /// Serializes dispatch and subscription changes across threads.
    serial: ReentrantMutex<()>,

    automatically_skip_repeats: bool,
}

impl<S> StoreInner<S>
where
    S: Send + Sync + 'static,
{
    fn current_state(&self) -> Option<Arc<S>> {
        self.state.read().clone()
    }

    fn default_dispatch(&self, action: Box<dyn Action>) -> Result<()> {
        let _serial = self.serial.lock();
        let action: &dyn Action = &*action;

        let new_state = {
            let Some(_guard) = DispatchGuard::enter(&self.is_dispatching) else {
                warn!(
                    action = action.type_name(),
                    "action dispatched while a reducer is running"
                );
                return Err(StoreError::ConcurrentMutation);
            };
            let current = self.current_state();
            (self.reducer)(action, current.as_deref())
        };

        self.set_state(Arc::new(new_state));
        Ok(())
    }

    fn set_state(&self, new_state: Arc<S>) {
        let old_state = self.state.write().replace(Arc::clone(&new_state));
        self.notify(old_state.as_deref(), &new_state);
    }

    /// Hand `(old, new)` to every active box, in subscription order.
    ///
    /// A subscriber that dispatches from here runs a complete nested pass
    /// first, so boxes after it in this pass receive the nested state before
    /// this pass's older pair.
    fn notify(&self, old_state: Option<&S>, new_state: &S) {
        // Snapshot so subscribers can (un)subscribe while being notified.
        let boxes: Vec<_> = self.subscriptions.lock().values().cloned().collect();
        trace!(subscribers = boxes.len(), "notifying subscribers");

        for subscription in boxes {
            subscription.new_values(old_state, new_state);
        }
    }
}

/// A handle to a state container.
///
/// Cloning the handle is cheap; all clones refer to the same store.
///
/// # Example
///
/// ```rust
/// use reflux_core::{Action, Store};
///
/// #[derive(Debug, Clone, Default, PartialEq)]
/// struct Counter {
///     count: i32,
/// }
///
/// #[derive(Debug)]
/// struct SetCount(i32);
///
/// fn reducer(action: &dyn Action, state: Option<&Counter>) -> Counter {
///     let mut state = state.cloned().unwrap_or_default();
///     if let Some(SetCount(count)) = action.downcast_ref::<SetCount>() {
///         state.count = *count;
///     }
///     state
/// }
///
/// let store = Store::new(reducer, None).unwrap();
/// store.dispatch(SetCount(5)).unwrap();
/// store
///     .dispatch_creator(|state: &Counter, _| Some(SetCount(state.count * 2)))
///     .unwrap();
///
/// assert_eq!(store.state().count, 10);
/// ```
pub struct Store<S> {
    inner: Arc<StoreInner<S>>,
}

impl<S> Clone for Store<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S> Store<S>
where
    S: Send + Sync + 'static,
{
    /// Create a store with default options.
    ///
    /// Without an initial state, the reducer is run once to produce one.
    pub fn new<R>(reducer: R, initial_state: Option<S>) -> Result<Self>
    where
        R: Fn(&dyn Action, Option<&S>) -> S + Send + Sync + 'static,
    {
        let mut builder = Self::builder(reducer);
        builder.initial_state = initial_state;
        builder.build()
    }

    /// Start configuring a store.
    pub fn builder<R>(reducer: R) -> StoreBuilder<S>
    where
        R: Fn(&dyn Action, Option<&S>) -> S + Send + Sync + 'static,
    {
        StoreBuilder {
            reducer: Box::new(reducer),
            initial_state: None,
            middleware: Vec::new(),
            automatically_skip_repeats: true,
        }
    }

    /// Hold the store's serialization lock. Re-entrant on the same thread.
    pub(crate) fn serialized(&self) -> ReentrantMutexGuard<'_, ()> {
        self.inner.serial.lock()
    }

    /// The current state.
    pub fn state(&self) -> Arc<S> {
        self.inner
            .current_state()
            .expect("store state is populated during construction")
    }

    /// Dispatch an action through the middleware chain to the reducer.
    ///
    /// Pass already boxed actions to [`dispatch_boxed`](Self::dispatch_boxed)
    /// instead.
    pub fn dispatch<A: Action>(&self, action: A) -> Result<()> {
        self.dispatch_boxed(Box::new(action))
    }

    /// Dispatch a boxed action through the middleware chain to the reducer.
    pub fn dispatch_boxed(&self, action: Box<dyn Action>) -> Result<()> {
        let _serial = self.serialized();
        trace!(action = action.type_name(), "dispatching action");

        let dispatch = Arc::clone(&*self.inner.dispatch_function.read());
        dispatch(action)
    }

    /// Run an action creator against the current state and dispatch its
    /// action, if it produces one.
    pub fn dispatch_creator<A, F>(&self, creator: F) -> Result<()>
    where
        A: Action,
        F: FnOnce(&S, &Store<S>) -> Option<A>,
    {
        let _serial = self.serialized();
        let state = self.state();
        match creator(&*state, self) {
            Some(action) => self.dispatch(action),
            None => Ok(()),
        }
    }

    /// Run an async action creator.
    ///
    /// The creator gets the current state, the store and a [`Resolver`] it
    /// completes later, possibly from another thread.
    pub fn dispatch_async<F>(&self, creator: F)
    where
        F: FnOnce(&S, &Store<S>, Resolver<S>),
    {
        self.run_async(creator, None);
    }

    /// Run an async action creator, calling `callback` with the new state
    /// once the action it resolves to has been dispatched.
    ///
    /// If the creator never resolves, or resolves to no action, the callback
    /// never runs.
    pub fn dispatch_async_with_callback<F, C>(&self, creator: F, callback: C)
    where
        F: FnOnce(&S, &Store<S>, Resolver<S>),
        C: FnOnce(&S) + Send + 'static,
    {
        self.run_async(creator, Some(Box::new(callback)));
    }

    fn run_async<F>(&self, creator: F, callback: Option<DispatchCallback<S>>)
    where
        F: FnOnce(&S, &Store<S>, Resolver<S>),
    {
        // Not serialized: the creator may wait on work that resolves on
        // another thread, and `resolve` re-reads the state under the lock.
        let state = self.state();
        creator(&*state, self, Resolver::new(self.clone(), callback));
    }

    /// Subscribe to every state change.
    ///
    /// Unless the store was built with `automatically_skip_repeats(false)`,
    /// updates equal to the previous state are skipped. The subscriber
    /// immediately receives the current state.
    pub fn subscribe<Sub>(&self, subscriber: &Arc<Sub>)
    where
        S: PartialEq,
        Sub: StoreSubscriber<S> + ?Sized + 'static,
    {
        if self.inner.automatically_skip_repeats {
            self.subscribe_with(subscriber, |subscription| subscription.skip_repeats());
        } else {
            self.subscribe_with(subscriber, |subscription| subscription);
        }
    }

    /// Subscribe through a transformed subscription.
    ///
    /// `transform` receives a subscription to the full state and returns the
    /// subscription the subscriber should observe, e.g. a `select`ion of a
    /// substate. A subscriber that is already subscribed is replaced.
    pub fn subscribe_with<T, Sub, F>(&self, subscriber: &Arc<Sub>, transform: F)
    where
        T: 'static,
        Sub: StoreSubscriber<T> + ?Sized + 'static,
        F: FnOnce(Subscription<S>) -> Subscription<T>,
    {
        let _serial = self.serialized();

        let subscription = Arc::new(SubscriptionBox::new(subscriber, transform));
        let id = subscription.subscriber_id();
        {
            let mut subscriptions = self.inner.subscriptions.lock();
            if let Some(previous) = subscriptions.shift_remove(&id) {
                previous.deactivate();
                debug!(subscriber = ?id, "replacing existing subscription");
            }
            subscriptions.insert(id, Arc::clone(&subscription));
            debug!(
                subscriber = ?id,
                subscriptions = subscriptions.len(),
                "subscriber added"
            );
        }

        if let Some(state) = self.inner.current_state() {
            subscription.new_values(None, &state);
        }
    }

    /// Remove a subscriber. Returns `false` if it was not subscribed.
    pub fn unsubscribe<Sub>(&self, subscriber: &Arc<Sub>) -> bool
    where
        Sub: ?Sized,
    {
        let _serial = self.serialized();

        let id = SubscriberId::of(subscriber);
        let removed = self.inner.subscriptions.lock().shift_remove(&id);
        match removed {
            Some(subscription) => {
                subscription.deactivate();
                debug!(subscriber = ?id, "subscriber removed");
                true
            }
            None => false,
        }
    }

    /// Number of active subscriptions.
    pub fn subscription_count(&self) -> usize {
        self.inner.subscriptions.lock().len()
    }

    /// Whether `subscribe` skips repeated states by default.
    pub fn subscribers_automatically_skip_repeats(&self) -> bool {
        self.inner.automatically_skip_repeats
    }

    /// The composed dispatch function.
    pub fn dispatch_function(&self) -> DispatchFunction {
        Arc::clone(&*self.inner.dispatch_function.read())
    }

    /// Replace the composed dispatch function.
    ///
    /// All subsequent dispatches go through `dispatch_function`. Use
    /// [`WeakStore`] inside it to reach the store without keeping it alive.
    pub fn set_dispatch_function(&self, dispatch_function: DispatchFunction) {
        *self.inner.dispatch_function.write() = dispatch_function;
    }

    /// A handle that does not keep the store alive.
    pub fn downgrade(&self) -> WeakStore<S> {
        WeakStore {
            inner: Arc::downgrade(&self.inner),
        }
    }
}

impl<S> DispatchingStore for Store<S>
where
    S: Send + Sync + 'static,
{
    fn dispatch_boxed(&self, action: Box<dyn Action>) -> Result<()> {
        Store::dispatch_boxed(self, action)
    }
}

impl<S> fmt::Debug for Store<S>
where
    S: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.inner.state.read())
            .field("subscriptions", &self.inner.subscriptions.lock().len())
            .field(
                "automatically_skip_repeats",
                &self.inner.automatically_skip_repeats,
            )
            .finish()
    }
}

/// A non-owning store handle.
///
/// Subscribers and middleware that need to dispatch should hold one of these
/// rather than a [`Store`], which would keep the store alive through its own
/// subscription list.
pub struct WeakStore<S> {
    inner: Weak<StoreInner<S>>,
}

impl<S> Clone for WeakStore<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<S> WeakStore<S> {
    /// The store, if it is still alive.
    pub fn upgrade(&self) -> Option<Store<S>> {
        self.inner.upgrade().map(|inner| Store { inner })
    }
}

impl<S> DispatchingStore for WeakStore<S>
where
    S: Send + Sync + 'static,
{
    fn dispatch_boxed(&self, action: Box<dyn Action>) -> Result<()> {
        match self.upgrade() {
            Some(store) => store.dispatch_boxed(action),
            None => Err(StoreError::StoreDropped),
        }
    }
}

impl<S> fmt::Debug for WeakStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakStore")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

/// Options for creating a [`Store`].
pub struct StoreBuilder<S> {
    reducer: Reducer<S>,
    initial_state: Option<S>,
    middleware: Vec<Box<dyn Middleware<S>>>,
    automatically_skip_repeats: bool,
}

impl<S> StoreBuilder<S>
where
    S: Send + Sync + 'static,
{
    /// Start from `state` instead of running the reducer.
    pub fn initial_state(mut self, state: S) -> Self {
        self.initial_state = Some(state);
        self
    }

    /// Append a middleware. Middleware added first sees actions first.
    pub fn middleware<M>(mut self, middleware: M) -> Self
    where
        M: Middleware<S> + 'static,
    {
        self.middleware.push(Box::new(middleware));
        self
    }

    /// Whether `subscribe` skips repeated states. Defaults to `true`.
    pub fn automatically_skip_repeats(mut self, skip: bool) -> Self {
        self.automatically_skip_repeats = skip;
        self
    }

    /// Create the store.
    ///
    /// Without an initial state, a bootstrap action is dispatched through the
    /// middleware chain so the reducer can produce one. Fails with
    /// [`StoreError::NotInitialized`] if no state results.
    pub fn build(self) -> Result<Store<S>> {
        let Self {
            reducer,
            initial_state,
            middleware,
            automatically_skip_repeats,
        } = self;

        let inner = Arc::new_cyclic(|weak: &Weak<StoreInner<S>>| {
            let redispatch: DispatchFunction = {
                let store = WeakStore {
                    inner: Weak::clone(weak),
                };
                Arc::new(move |action: Box<dyn Action>| store.dispatch_boxed(action))
            };
            let get_state: GetState<S> = {
                let weak = Weak::clone(weak);
                Arc::new(move || weak.upgrade().and_then(|inner| inner.current_state()))
            };
            let default_dispatch: DispatchFunction = {
                let weak = Weak::clone(weak);
                Arc::new(move |action: Box<dyn Action>| match weak.upgrade() {
                    Some(inner) => inner.default_dispatch(action),
                    None => Err(StoreError::StoreDropped),
                })
            };

            StoreInner {
                state: RwLock::new(initial_state.map(Arc::new)),
                reducer,
                dispatch_function: RwLock::new(compose(
                    &middleware,
                    &redispatch,
                    &get_state,
                    default_dispatch,
                )),
                subscriptions: Mutex::new(IndexMap::new()),
                is_dispatching: AtomicBool::new(false),
                serial: ReentrantMutex::new(()),
                automatically_skip_repeats,
            }
        });
        let store = Store { inner };

        if store.inner.current_state().is_none() {
            debug!("no initial state, dispatching bootstrap action");
            store.dispatch(Bootstrap)?;
            if store.inner.current_state().is_none() {
                return Err(StoreError::NotInitialized);
            }
        }

        Ok(store)
    }
}

impl<S> fmt::Debug for StoreBuilder<S>
where
    S: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreBuilder")
            .field("initial_state", &self.initial_state)
            .field("middleware", &self.middleware.len())
            .field(
                "automatically_skip_repeats",
                &self.automatically_skip_repeats,
            )
            .finish()
    }
}
