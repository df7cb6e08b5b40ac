//! Reflux Core
//!
//! This crate provides a unidirectional-data-flow state container. It
//! implements:
//!
//! - A store holding a single state value, replaced wholesale on every action
//! - Reducers that compute the next state from an action
//! - Middleware wrapping the dispatch pipeline
//! - Subscriptions that narrow and filter state updates per subscriber
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `action`: The action trait and its type inspection helpers
//! - `store`: The store, dispatch pipeline, middleware and action creators
//! - `subscription`: Subscription chains and subscriber registration
//! - `error`: Error types
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use reflux_core::{Action, Store};
//!
//! #[derive(Debug, Clone, Default, PartialEq)]
//! struct AppState {
//!     count: i32,
//!     name: String,
//! }
//!
//! #[derive(Debug)]
//! struct Increment;
//!
//! fn reducer(action: &dyn Action, state: Option<&AppState>) -> AppState {
//!     let mut state = state.cloned().unwrap_or_default();
//!     if action.is::<Increment>() {
//!         state.count += 1;
//!     }
//!     state
//! }
//!
//! let store = Store::new(reducer, None).unwrap();
//!
//! // Only interested in the count
//! let subscriber = Arc::new(|count: &i32| println!("Count: {}", count));
//! store.subscribe_with(&subscriber, |s| s.select(|state: &AppState| state.count).skip_repeats());
//! // Prints "Count: 0" immediately
//!
//! store.dispatch(Increment).unwrap();
//! // Prints "Count: 1"
//! ```

pub mod action;
pub mod error;
pub mod store;
pub mod subscription;

pub use action::Action;
pub use error::{Result, StoreError};
pub use store::{
    DispatchCallback, DispatchFunction, DispatchingStore, GetState, Middleware, Reducer,
    Resolver, Store, StoreBuilder, WeakStore,
};
pub use subscription::{StoreSubscriber, SubscriberId, Subscription};
