//! Property-based tests for dispatch and notification.
//!
//! These tests verify invariants that must hold for any action sequence:
//!
//! 1. Without repeat skipping, a subscriber sees every state, in order.
//! 2. With repeat skipping, a subscriber sees exactly the changes.
//! 3. A skip-repeats selection sees exactly the changes of the selection.
//! 4. The final state is the last dispatched value.

mod common;

use proptest::prelude::*;
use reflux_core::Store;

use common::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn values_strategy() -> impl Strategy<Value = Vec<Option<i32>>> {
    prop::collection::vec(prop::option::of(0i32..4), 0..40)
}

/// Drop consecutive duplicates.
fn changes<T: PartialEq + Clone>(values: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut out: Vec<T> = Vec::new();
    for value in values {
        if out.last() != Some(&value) {
            out.push(value);
        }
    }
    out
}

proptest! {
    #[test]
    fn every_state_is_delivered_in_order(values in values_strategy()) {
        let store = Store::builder(test_reducer)
            .initial_state(TestAppState::default())
            .automatically_skip_repeats(false)
            .build()
            .unwrap();
        let subscriber = TestSubscriber::new();
        store.subscribe(&subscriber);

        for value in &values {
            store.dispatch(SetValueAction(*value)).unwrap();
        }

        let received: Vec<_> = subscriber.received().into_iter().map(|s| s.test_value).collect();
        let expected: Vec<_> = std::iter::once(None).chain(values.iter().copied()).collect();
        prop_assert_eq!(received, expected);
    }

    #[test]
    fn skip_repeats_delivers_only_changes(values in values_strategy()) {
        let store = test_store();
        let subscriber = TestSubscriber::new();
        store.subscribe(&subscriber);

        for value in &values {
            store.dispatch(SetValueAction(*value)).unwrap();
        }

        let received: Vec<_> = subscriber.received().into_iter().map(|s| s.test_value).collect();
        let expected = changes(std::iter::once(None).chain(values.iter().copied()));
        prop_assert_eq!(received, expected);
    }

    #[test]
    fn selection_delivers_only_selected_changes(values in values_strategy()) {
        let store = test_store();
        let subscriber = TestStoreSubscriber::<bool>::new();
        store.subscribe_with(&subscriber, |subscription| {
            subscription
                .select(|state: &TestAppState| state.test_value.is_some_and(|v| v % 2 == 0))
                .skip_repeats()
        });

        for value in &values {
            store.dispatch(SetValueAction(*value)).unwrap();
        }

        let parity = |value: Option<i32>| value.is_some_and(|v| v % 2 == 0);
        let expected = changes(
            std::iter::once(parity(None)).chain(values.iter().copied().map(parity)),
        );
        prop_assert_eq!(subscriber.received(), expected);
    }

    #[test]
    fn final_state_is_last_value(values in values_strategy()) {
        let store = test_store();

        for value in &values {
            store.dispatch(SetValueAction(*value)).unwrap();
        }

        let expected = values.last().copied().flatten();
        prop_assert_eq!(store.state().test_value, expected);
    }
}
