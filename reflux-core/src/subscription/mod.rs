//! Subscriptions
//!
//! This module implements the path from a state change to a subscriber.
//!
//! # Concepts
//!
//! ## Subscribers
//!
//! A subscriber receives state values through [`StoreSubscriber::new_state`].
//! Its identity is the `Arc` it lives in: subscribing the same `Arc` again
//! replaces the earlier subscription instead of adding a second one.
//!
//! ## Subscriptions
//!
//! A [`Subscription`] is a chain of stages between the store and one
//! subscriber. Stages narrow the state (`select`) or filter updates
//! (`skip_repeats`, `skip`, `only`). The chain is assembled once, when the
//! subscriber registers, and never changes afterwards.
//!
//! ## Boxes
//!
//! The store holds one box per subscriber. A box erases the subscriber's
//! selected type so that subscribers with different views of the state can
//! live in the same list.

mod subscriber;
mod subscription;
mod subscription_box;

pub use subscriber::{StoreSubscriber, SubscriberId};
pub use subscription::Subscription;
pub(crate) use subscription_box::SubscriptionBox;
