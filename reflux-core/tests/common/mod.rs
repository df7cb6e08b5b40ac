//! Shared fixtures for the store integration tests.

#![allow(dead_code)]

use std::fmt::Debug;
use std::sync::Arc;

use parking_lot::Mutex;
use reflux_core::{Action, Store, StoreSubscriber, WeakStore};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestAppState {
    pub test_value: Option<i32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TestStringAppState {
    pub test_value: String,
}

impl Default for TestStringAppState {
    fn default() -> Self {
        Self {
            test_value: "Initial".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TestCustomSubstate {
    pub value: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TestCustomAppState {
    pub substate: TestCustomSubstate,
}

impl TestCustomAppState {
    pub fn new(value: i32) -> Self {
        Self {
            substate: TestCustomSubstate { value },
        }
    }
}

#[derive(Debug)]
pub struct NoOpAction;

#[derive(Debug)]
pub struct SetValueAction(pub Option<i32>);

#[derive(Debug)]
pub struct IncrementAction;

#[derive(Debug)]
pub struct SetValueStringAction(pub String);

#[derive(Debug)]
pub struct SetCustomSubstateAction(pub i32);

pub fn test_reducer(action: &dyn Action, state: Option<&TestAppState>) -> TestAppState {
    let mut state = state.cloned().unwrap_or_default();

    if let Some(SetValueAction(value)) = action.downcast_ref::<SetValueAction>() {
        state.test_value = *value;
    } else if action.is::<IncrementAction>() {
        state.test_value = Some(state.test_value.unwrap_or(0) + 1);
    }

    state
}

pub fn test_value_string_reducer(
    action: &dyn Action,
    state: Option<&TestStringAppState>,
) -> TestStringAppState {
    let mut state = state.cloned().unwrap_or_default();

    if let Some(SetValueStringAction(value)) = action.downcast_ref::<SetValueStringAction>() {
        state.test_value = value.clone();
    }

    state
}

pub fn test_custom_app_state_reducer(
    action: &dyn Action,
    state: Option<&TestCustomAppState>,
) -> TestCustomAppState {
    let mut state = state.cloned().unwrap_or_else(|| TestCustomAppState::new(0));

    if let Some(SetCustomSubstateAction(value)) = action.downcast_ref::<SetCustomSubstateAction>()
    {
        state.substate.value = *value;
    }

    state
}

/// Route store logs to the test harness. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

pub fn test_store() -> Store<TestAppState> {
    Store::new(test_reducer, Some(TestAppState::default())).expect("store builds")
}

/// Records every value it receives.
pub struct TestStoreSubscriber<T> {
    received: Mutex<Vec<T>>,
}

impl<T: Clone> TestStoreSubscriber<T> {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            received: Mutex::new(Vec::new()),
        })
    }

    pub fn received(&self) -> Vec<T> {
        self.received.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.received.lock().len()
    }

    pub fn last(&self) -> Option<T> {
        self.received.lock().last().cloned()
    }
}

impl<T: Clone + Debug + Send> StoreSubscriber<T> for TestStoreSubscriber<T> {
    fn new_state(&self, state: &T) {
        self.received.lock().push(state.clone());
    }
}

pub type TestSubscriber = TestStoreSubscriber<TestAppState>;

/// Dispatches `SetValueAction(Some(5))` whenever it sees any other value.
pub struct DispatchingSubscriber {
    store: WeakStore<TestAppState>,
}

impl DispatchingSubscriber {
    pub fn new(store: &Store<TestAppState>) -> Arc<Self> {
        Arc::new(Self {
            store: store.downgrade(),
        })
    }
}

impl StoreSubscriber<TestAppState> for DispatchingSubscriber {
    fn new_state(&self, state: &TestAppState) {
        // Avoid endless recursion once the value is in place
        if state.test_value != Some(5) {
            if let Some(store) = self.store.upgrade() {
                store
                    .dispatch(SetValueAction(Some(5)))
                    .expect("dispatch from subscriber succeeds");
            }
        }
    }
}
