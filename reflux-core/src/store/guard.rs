//! Reducer guard
//!
//! Marks a store as "reducing" for as long as the guard lives. Entering fails
//! if the store is already reducing, which is how a reducer that dispatches
//! into its own store is caught.
//!
//! The flag is cleared when the guard is dropped, so a panicking reducer does
//! not leave the store locked.

use std::sync::atomic::{AtomicBool, Ordering};

pub(crate) struct DispatchGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> DispatchGuard<'a> {
    /// Set `flag`, or return `None` if it is already set.
    pub(crate) fn enter(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
