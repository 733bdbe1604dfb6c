use std::{rc::Rc, time::Duration};

use browser_hooks_core::{HookError, NoopScheduler, Scheduler, Subscription};
use browser_hooks_web::browser_available;
use leptos::{request_animation_frame_with_handle, set_timeout_with_handle};

/// Window timers and animation frames through the leptos helpers.
///
/// Cancelling a subscription clears the timeout or cancels the frame request.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct LeptosScheduler;

impl Scheduler for LeptosScheduler {
    fn set_timeout(
        &self,
        delay: Duration,
        callback: Box<dyn FnOnce()>,
    ) -> Result<Subscription, HookError> {
        let handle = set_timeout_with_handle(callback, delay)
            .map_err(|err| HookError::Js(format!("{err:?}")))?;
        Ok(Subscription::new(move || handle.clear()))
    }

    fn request_frame(&self, callback: Box<dyn FnOnce()>) -> Result<Subscription, HookError> {
        let handle = request_animation_frame_with_handle(callback)
            .map_err(|err| HookError::Js(format!("{err:?}")))?;
        Ok(Subscription::new(move || handle.cancel()))
    }
}

/// Leptos timers when a window is reachable, otherwise a scheduler that never fires.
pub(crate) fn host_scheduler() -> Rc<dyn Scheduler> {
    if browser_available() {
        Rc::new(LeptosScheduler)
    } else {
        Rc::new(NoopScheduler)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn headless_host_schedules_nothing() {
        let scheduler = host_scheduler();
        let ran = Rc::new(Cell::new(false));
        let flag = ran.clone();
        let timer = scheduler
            .set_timeout(Duration::ZERO, Box::new(move || flag.set(true)))
            .expect("noop timer");
        let frame = scheduler.request_frame(Box::new(|| {})).expect("noop frame");

        assert!(!timer.is_active());
        assert!(!frame.is_active());
        assert!(!ran.get());
    }
}
