use leptos::{create_rw_signal, RwSignal, Signal, SignalGet, SignalSet, SignalUpdate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Open/closed state for a modal surface.
pub struct ModalState {
    open: RwSignal<bool>,
}

impl ModalState {
    /// Returns whether the modal is open, tracking the read.
    pub fn is_open(&self) -> bool {
        self.open.get()
    }

    /// Reactive view of the open flag.
    pub fn open_signal(&self) -> Signal<bool> {
        self.open.into()
    }

    /// Opens the modal.
    pub fn open(&self) {
        self.open.set(true);
    }

    /// Closes the modal.
    pub fn close(&self) {
        self.open.set(false);
    }

    /// Flips the open flag.
    pub fn toggle(&self) {
        self.open.update(|open| *open = !*open);
    }
}

/// Creates modal state starting at `initial`.
pub fn use_modal_state(initial: bool) -> ModalState {
    ModalState {
        open: create_rw_signal(initial),
    }
}

#[cfg(test)]
mod tests {
    use leptos::SignalGetUntracked;

    use super::*;

    #[test]
    fn open_close_and_toggle_update_shared_state() {
        let runtime = leptos::create_runtime();
        let modal = use_modal_state(false);
        let copy = modal;

        modal.open();
        assert!(copy.open_signal().get_untracked());
        copy.toggle();
        assert!(!modal.open_signal().get_untracked());
        modal.toggle();
        modal.close();
        assert!(!modal.open_signal().get_untracked());
        runtime.dispose();
    }
}
