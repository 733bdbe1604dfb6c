//! Scoped ownership for timers, listeners, and observers.

use std::fmt;

/// Guard over one registered resource (timer, DOM listener, observer).
///
/// The cancel step runs at most once: on the first [`Subscription::cancel`] call or when the
/// guard is dropped, whichever happens first. [`Subscription::release`] discards the guard
/// without cancelling, for resources that already completed on their own (a fired one-shot
/// timer).
#[must_use = "dropping a subscription cancels it immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Wraps the cancel step for a freshly registered resource.
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Returns a subscription with nothing to cancel.
    pub fn noop() -> Self {
        Self { cancel: None }
    }

    /// Returns whether the cancel step has not run yet.
    pub fn is_active(&self) -> bool {
        self.cancel.is_some()
    }

    /// Runs the cancel step if it has not run yet.
    pub fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }

    /// Drops the guard without running its cancel step.
    pub fn release(mut self) {
        self.cancel = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}
