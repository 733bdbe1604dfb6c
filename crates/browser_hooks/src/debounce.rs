use std::{fmt, time::Duration};

use browser_hooks_core::{DebounceMode, Debouncer};
use leptos::{on_cleanup, store_value, StoredValue};

use crate::platform::HookHost;

/// `Copy` handle to a debounced callback owned by the current reactive scope.
///
/// Calls after the scope is disposed are ignored.
pub struct DebouncedFn<A: 'static> {
    inner: StoredValue<Debouncer<A>>,
}

impl<A: 'static> DebouncedFn<A> {
    fn debouncer(&self) -> Option<Debouncer<A>> {
        self.inner.try_get_value()
    }

    /// Invokes or schedules the callback with `args`.
    pub fn call(&self, args: A) {
        if let Some(debouncer) = self.debouncer() {
            debouncer.call(args);
        }
    }

    /// Replaces the callback; a pending invocation will use the new one.
    pub fn set_callback(&self, callback: impl Fn(A) + 'static) {
        if let Some(debouncer) = self.debouncer() {
            debouncer.set_callback(callback);
        }
    }

    /// Returns whether a timer is pending.
    pub fn is_pending(&self) -> bool {
        self.debouncer()
            .map(|debouncer| debouncer.is_pending())
            .unwrap_or(false)
    }

    /// Cancels any pending invocation and ignores every later call.
    pub fn cancel(&self) {
        if let Some(debouncer) = self.debouncer() {
            debouncer.dispose();
        }
    }
}

impl<A: 'static> Clone for DebouncedFn<A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<A: 'static> Copy for DebouncedFn<A> {}

impl<A: 'static> fmt::Debug for DebouncedFn<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebouncedFn")
            .field("pending", &self.is_pending())
            .finish()
    }
}

/// Debounces `callback` by `delay`.
///
/// With `immediate` the first call of a quiet period runs synchronously and later calls inside
/// the window are dropped; otherwise only the last call of a burst runs, `delay` after it. The
/// pending timer is cancelled when the owning scope is cleaned up.
pub fn use_debounce<A, F>(callback: F, delay: Duration, immediate: bool) -> DebouncedFn<A>
where
    A: 'static,
    F: Fn(A) + 'static,
{
    debounce_with(&HookHost::browser(), callback, delay, immediate)
}

pub(crate) fn debounce_with<A: 'static>(
    host: &HookHost,
    callback: impl Fn(A) + 'static,
    delay: Duration,
    immediate: bool,
) -> DebouncedFn<A> {
    let debouncer = Debouncer::new(
        host.scheduler.clone(),
        callback,
        delay,
        DebounceMode::from_immediate(immediate),
    );
    let owned = debouncer.clone();
    on_cleanup(move || owned.dispose());
    DebouncedFn {
        inner: store_value(debouncer),
    }
}
