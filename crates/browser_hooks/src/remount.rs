use std::time::Duration;

use browser_hooks_core::{IdleRemount, RemountOptions};
use leptos::{create_rw_signal, on_cleanup, ReadSignal, SignalSet};

use crate::platform::HookHost;

/// Counter that increments once `threshold` after mount, for keying a subtree remount.
///
/// The timer is one-shot; it is not re-armed after firing. With
/// [`RemountOptions::pause_when_hidden`] hiding the document cancels the timer and showing it
/// again arms a fresh full-length one.
pub fn use_remount_key(threshold: Duration, options: RemountOptions) -> ReadSignal<u32> {
    remount_key_with(&HookHost::browser(), threshold, options)
}

pub(crate) fn remount_key_with(
    host: &HookHost,
    threshold: Duration,
    options: RemountOptions,
) -> ReadSignal<u32> {
    let key = create_rw_signal(0_u32);
    let remount = IdleRemount::new(host.scheduler.clone(), threshold, options);
    remount.on_change(move |count| key.set(count));

    let listener = if options.pause_when_hidden {
        if !host.is_document_visible() {
            remount.visibility_changed(false);
        }
        let observed = remount.clone();
        host.visibility_listener("use_remount_key", move |visible| {
            observed.visibility_changed(visible)
        })
    } else {
        None
    };

    on_cleanup(move || {
        drop(listener);
        remount.dispose();
    });
    key.read_only()
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use leptos::{create_rw_signal, SignalGetUntracked};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::platform::{
        testing::{mount_while, TestHost},
        VISIBILITY_EVENT,
    };

    const THRESHOLD: Duration = Duration::from_secs(60);

    fn mounted_key(
        test: &TestHost,
        mounted: leptos::RwSignal<bool>,
        options: RemountOptions,
    ) -> Rc<Cell<Option<ReadSignal<u32>>>> {
        let key: Rc<Cell<Option<ReadSignal<u32>>>> = Rc::default();
        let slot = key.clone();
        let host = test.host();
        mount_while(mounted, move || {
            slot.set(Some(remount_key_with(&host, THRESHOLD, options)))
        });
        key
    }

    #[test]
    fn key_increments_once_after_the_threshold() {
        let runtime = leptos::create_runtime();
        let test = TestHost::new();
        let key = mounted_key(&test, create_rw_signal(true), RemountOptions::default());
        let key = key.get().expect("mounted");

        test.scheduler.advance(THRESHOLD - Duration::from_millis(1));
        assert_eq!(key.get_untracked(), 0);
        test.scheduler.advance(Duration::from_millis(1));
        assert_eq!(key.get_untracked(), 1);
        test.scheduler.advance(THRESHOLD * 3);
        assert_eq!(key.get_untracked(), 1);
        runtime.dispose();
    }

    #[test]
    fn hidden_document_at_mount_holds_the_timer() {
        let runtime = leptos::create_runtime();
        let test = TestHost::new();
        test.visible.set(false);
        let options = RemountOptions {
            pause_when_hidden: true,
        };
        let key = mounted_key(&test, create_rw_signal(true), options);
        let key = key.get().expect("mounted");

        assert_eq!(test.scheduler.pending_timers(), 0);
        test.scheduler.advance(THRESHOLD * 2);
        assert_eq!(key.get_untracked(), 0);

        test.set_visible(true);
        test.scheduler.advance(THRESHOLD);
        assert_eq!(key.get_untracked(), 1);
        runtime.dispose();
    }

    #[test]
    fn unmount_cancels_the_timer_and_visibility_listener() {
        let runtime = leptos::create_runtime();
        let test = TestHost::new();
        let mounted = create_rw_signal(true);
        let options = RemountOptions {
            pause_when_hidden: true,
        };
        let _key = mounted_key(&test, mounted, options);
        assert_eq!(test.scheduler.pending_timers(), 1);
        assert_eq!(test.visibility.listener_count(VISIBILITY_EVENT), 1);

        mounted.set(false);
        assert_eq!(test.scheduler.pending_timers(), 0);
        assert_eq!(test.visibility.removals(), 1);
        runtime.dispose();
    }
}
