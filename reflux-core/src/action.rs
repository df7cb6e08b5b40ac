//! Actions
//!
//! An action is an immutable value describing something that happened. The
//! store never looks inside an action; it hands it to the middleware chain and
//! then to the reducer, which branch on its concrete type.
//!
//! Any `'static` type that is `Debug + Send` is an action, so plain structs and
//! enums can be dispatched directly:
//!
//! ```rust
//! use reflux_core::Action;
//!
//! #[derive(Debug)]
//! struct SetCount(i32);
//!
//! let action: Box<dyn Action> = Box::new(SetCount(5));
//! assert_eq!(action.downcast_ref::<SetCount>().map(|a| a.0), Some(5));
//! ```
//!
//! # Boxed actions
//!
//! `Box<dyn Action>` is itself `Debug + Send`, so passing an already boxed
//! action to [`Store::dispatch`](crate::Store::dispatch) would wrap it a second
//! time. Use [`Store::dispatch_boxed`](crate::Store::dispatch_boxed) for boxed
//! actions. For the same reason, call the inspection helpers (`is`,
//! `downcast_ref`, `type_name`) rather than `as_any` on a `Box<dyn Action>`:
//! method resolution picks the box's own implementation for trait methods.

use std::any::Any;
use std::fmt::Debug;

/// An opaque value that can be dispatched to a store.
pub trait Action: Any + Debug + Send + 'static {
    /// Upcast for type inspection.
    fn as_any(&self) -> &dyn Any;

    /// Upcast for in-place modification (used by middleware).
    fn as_any_mut(&mut self) -> &mut dyn Any;

    #[doc(hidden)]
    fn action_type_name(&self) -> &'static str;
}

impl<T> Action for T
where
    T: Any + Debug + Send,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn action_type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

impl dyn Action {
    /// Name of the concrete action type, for logging.
    pub fn type_name(&self) -> &'static str {
        self.action_type_name()
    }

    /// Returns `true` if the action is of type `T`.
    pub fn is<T: Action>(&self) -> bool {
        self.as_any().is::<T>()
    }

    /// Returns a reference to the action if it is of type `T`.
    pub fn downcast_ref<T: Action>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Returns a mutable reference to the action if it is of type `T`.
    pub fn downcast_mut<T: Action>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct SetValue(i32);

    #[derive(Debug)]
    struct Noop;

    #[test]
    fn downcast_matches_concrete_type() {
        let action: Box<dyn Action> = Box::new(SetValue(3));

        assert!(action.is::<SetValue>());
        assert!(!action.is::<Noop>());
        assert_eq!(action.downcast_ref::<SetValue>(), Some(&SetValue(3)));
        assert!(action.downcast_ref::<Noop>().is_none());
    }

    #[test]
    fn downcast_mut_allows_rewriting() {
        let mut action: Box<dyn Action> = Box::new(SetValue(3));

        if let Some(set) = action.downcast_mut::<SetValue>() {
            set.0 *= 2;
        }

        assert_eq!(action.downcast_ref::<SetValue>(), Some(&SetValue(6)));
    }

    #[test]
    fn type_name_reports_concrete_type() {
        let action: Box<dyn Action> = Box::new(Noop);
        assert!(action.type_name().ends_with("Noop"));
    }
}
