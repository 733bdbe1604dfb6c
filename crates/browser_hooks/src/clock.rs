use browser_hooks_core::{ClockOptions, ClockSnapshot, ClockTicker};
use leptos::{create_rw_signal, on_cleanup, ReadSignal, SignalSet};

use crate::platform::HookHost;

/// Local wall clock refreshed every [`ClockOptions::interval`].
pub fn use_clock(options: ClockOptions) -> ReadSignal<ClockSnapshot> {
    clock_with(&HookHost::browser(), options)
}

pub(crate) fn clock_with(host: &HookHost, options: ClockOptions) -> ReadSignal<ClockSnapshot> {
    let read_clock = host.clock.clone();
    let now = create_rw_signal(read_clock());
    let ticker = ClockTicker::new(host.scheduler.clone(), options, move || {
        now.set(read_clock())
    });

    let listener = if options.pause_when_hidden {
        if !host.is_document_visible() {
            ticker.visibility_changed(false);
        }
        let observed = ticker.clone();
        host.visibility_listener("use_clock", move |visible| {
            observed.visibility_changed(visible)
        })
    } else {
        None
    };

    on_cleanup(move || {
        drop(listener);
        ticker.dispose();
    });
    now.read_only()
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc, time::Duration};

    use leptos::{create_rw_signal, RwSignal, SignalGetUntracked};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::platform::testing::{mount_while, TestHost};

    fn at_second(second: u32) -> ClockSnapshot {
        ClockSnapshot {
            second,
            ..ClockSnapshot::default()
        }
    }

    fn mounted_clock(
        test: &TestHost,
        mounted: RwSignal<bool>,
        options: ClockOptions,
    ) -> ReadSignal<ClockSnapshot> {
        let clock: Rc<Cell<Option<ReadSignal<ClockSnapshot>>>> = Rc::default();
        let slot = clock.clone();
        let host = test.host();
        mount_while(mounted, move || slot.set(Some(clock_with(&host, options))));
        clock.get().expect("mounted")
    }

    #[test]
    fn ticks_refresh_the_snapshot_each_interval() {
        let runtime = leptos::create_runtime();
        let test = TestHost::new();
        let now = mounted_clock(&test, create_rw_signal(true), ClockOptions::default());

        test.clock.set(at_second(1));
        assert_eq!(now.get_untracked(), ClockSnapshot::default());
        test.scheduler.advance(Duration::from_secs(1));
        assert_eq!(now.get_untracked(), at_second(1));
        runtime.dispose();
    }

    #[test]
    fn hidden_document_at_mount_pauses_until_shown() {
        let runtime = leptos::create_runtime();
        let test = TestHost::new();
        test.visible.set(false);
        let now = mounted_clock(&test, create_rw_signal(true), ClockOptions::default());

        test.clock.set(at_second(5));
        test.scheduler.advance(Duration::from_secs(10));
        assert_eq!(now.get_untracked(), ClockSnapshot::default());

        test.set_visible(true);
        test.scheduler.advance(Duration::from_secs(1));
        assert_eq!(now.get_untracked(), at_second(5));
        runtime.dispose();
    }

    #[test]
    fn unmount_stops_ticking() {
        let runtime = leptos::create_runtime();
        let test = TestHost::new();
        let mounted = create_rw_signal(true);
        let _now = mounted_clock(&test, mounted, ClockOptions::default());
        assert_eq!(test.scheduler.pending_timers(), 1);

        mounted.set(false);
        assert_eq!(test.scheduler.pending_timers(), 0);
        assert_eq!(test.visibility.removals(), 1);
        runtime.dispose();
    }
}
