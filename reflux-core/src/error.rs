//! Error types for store operations.

use thiserror::Error;

/// Main error type for store operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// An action was dispatched while a reducer of the same store was running.
    ///
    /// Either a reducer is dispatching an action, or the store is being
    /// driven from several places without serialization.
    #[error(
        "concurrent mutation: action dispatched while a previous action is being reduced \
         (a reducer is dispatching an action)"
    )]
    ConcurrentMutation,

    /// Construction ended without a state, e.g. because a middleware swallowed
    /// the bootstrap action.
    #[error("store has no state after construction (was the bootstrap action swallowed?)")]
    NotInitialized,

    /// A weak handle dispatched after its store was dropped.
    #[error("store was dropped")]
    StoreDropped,
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
