//! The Store
//!
//! This module implements the dispatch side of the container: the store
//! itself, middleware composition, action creators and the reducer guard.
//!
//! # Concepts
//!
//! ## Reducers
//!
//! A reducer is a pure function from an action and the current state to the
//! next state. The store calls it for every action that makes it through the
//! middleware chain and replaces its state with the result.
//!
//! ## Middleware
//!
//! Middleware wraps the dispatch function. It can rewrite actions, swallow
//! them, dispatch other actions, and read the state, before deciding whether
//! to pass the action on.
//!
//! ## Action Creators
//!
//! An action creator looks at the current state and decides which action, if
//! any, to dispatch. An async action creator makes that decision later and
//! reports it through a [`Resolver`].
//!
//! # Implementation Notes
//!
//! A reducer must not dispatch into its own store. The store detects this
//! with a per-store flag that is set only while the reducer runs; the nested
//! dispatch fails with [`StoreError::ConcurrentMutation`](crate::StoreError)
//! and the outer dispatch is unaffected.

mod creator;
mod guard;
mod middleware;
#[allow(clippy::module_inception)]
mod store;

pub use creator::{DispatchCallback, Resolver};
pub use middleware::{DispatchFunction, GetState, Middleware};
pub use store::{DispatchingStore, Reducer, Store, StoreBuilder, WeakStore};
