//! Middleware
//!
//! Middleware wraps the store's dispatch function. Each middleware receives
//!
//! - `dispatch`: re-enters the full chain from the outermost middleware,
//! - `get_state`: reads the store's current state,
//! - `next`: the next-inner dispatch function,
//!
//! and returns a new dispatch function. Whether (and with which action) the
//! returned function calls `next` decides how the action propagates: a
//! middleware may rewrite the action, swallow it, or dispatch other actions
//! first.
//!
//! The store composes the list right to left, so the first middleware in the
//! list is the outermost one and sees every action first.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use reflux_core::{Action, DispatchFunction, GetState};
//!
//! #[derive(Debug)]
//! struct Rename(String);
//!
//! fn shout<S>(_dispatch: DispatchFunction, _get_state: GetState<S>, next: DispatchFunction) -> DispatchFunction {
//!     Arc::new(move |mut action: Box<dyn Action>| {
//!         if let Some(rename) = action.downcast_mut::<Rename>() {
//!             rename.0 = rename.0.to_uppercase();
//!         }
//!         next(action)
//!     })
//! }
//! ```

use std::sync::Arc;

use crate::action::Action;
use crate::error::Result;

/// A dispatch function: takes an action and runs it through (part of) the
/// pipeline.
pub type DispatchFunction = Arc<dyn Fn(Box<dyn Action>) -> Result<()> + Send + Sync>;

/// Reads the store's current state.
///
/// Returns `None` while the store is bootstrapping its initial state, or
/// once the store has been dropped.
pub type GetState<S> = Arc<dyn Fn() -> Option<Arc<S>> + Send + Sync>;

/// A function that wraps the dispatch pipeline.
///
/// Any function or closure with the signature
/// `Fn(DispatchFunction, GetState<S>, DispatchFunction) -> DispatchFunction`
/// is a middleware.
pub trait Middleware<S> {
    fn apply(
        &self,
        dispatch: DispatchFunction,
        get_state: GetState<S>,
        next: DispatchFunction,
    ) -> DispatchFunction;
}

impl<S, F> Middleware<S> for F
where
    F: Fn(DispatchFunction, GetState<S>, DispatchFunction) -> DispatchFunction,
{
    fn apply(
        &self,
        dispatch: DispatchFunction,
        get_state: GetState<S>,
        next: DispatchFunction,
    ) -> DispatchFunction {
        self(dispatch, get_state, next)
    }
}

/// Fold `middleware` around `innermost`, first middleware outermost.
pub(crate) fn compose<S>(
    middleware: &[Box<dyn Middleware<S>>],
    dispatch: &DispatchFunction,
    get_state: &GetState<S>,
    innermost: DispatchFunction,
) -> DispatchFunction {
    middleware.iter().rev().fold(innermost, |next, middleware| {
        middleware.apply(Arc::clone(dispatch), Arc::clone(get_state), next)
    })
}
