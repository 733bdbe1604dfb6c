//! Outside-interaction detection over document-level events.

use std::{
    borrow::Cow,
    cell::{Cell, RefCell},
    fmt,
    rc::{Rc, Weak},
};

use crate::{HookError, Subscription};

/// Event type observed when no other is configured.
pub const DEFAULT_OUTSIDE_EVENT: &str = "pointerdown";

/// Tree containment check used to decide whether an event started inside the watched element.
pub trait ContainsNode {
    /// Returns `true` when `other` is `self` or one of its descendants.
    fn contains_node(&self, other: &Self) -> bool;
}

/// Returns whether an event originating at `origin` counts as outside `target`.
///
/// Nothing counts as outside a missing target, and an event without an origin node is ignored.
pub fn is_outside<N: ContainsNode>(target: Option<&N>, origin: Option<&N>) -> bool {
    match (target, origin) {
        (Some(target), Some(origin)) => !target.contains_node(origin),
        _ => false,
    }
}

/// Listener callback receiving the origin node of a document event, when it has one.
pub type DocumentListener<N> = Rc<dyn Fn(Option<N>)>;

/// Host service registering document-level event listeners.
pub trait DocumentEvents<N> {
    /// Registers `listener` for `event_type`; dropping the subscription unregisters it.
    ///
    /// # Errors
    ///
    /// Returns an error when the document is unavailable or rejects the registration.
    fn listen(
        &self,
        event_type: &str,
        capture: bool,
        listener: DocumentListener<N>,
    ) -> Result<Subscription, HookError>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Document event source for contexts without a document; nothing is ever delivered.
pub struct NoopDocumentEvents;

impl<N> DocumentEvents<N> for NoopDocumentEvents {
    fn listen(
        &self,
        _event_type: &str,
        _capture: bool,
        _listener: DocumentListener<N>,
    ) -> Result<Subscription, HookError> {
        Ok(Subscription::noop())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Listener settings for [`OutsideInteraction`].
pub struct OutsideClickConfig {
    /// DOM event type to observe.
    pub event_type: Cow<'static, str>,
    /// Whether the listener starts attached.
    pub enabled: bool,
}

impl Default for OutsideClickConfig {
    fn default() -> Self {
        Self {
            event_type: Cow::Borrowed(DEFAULT_OUTSIDE_EVENT),
            enabled: true,
        }
    }
}

struct OutsideInner<N> {
    events: Rc<dyn DocumentEvents<N>>,
    event_type: Cow<'static, str>,
    target: RefCell<Rc<dyn Fn() -> Option<N>>>,
    handler: RefCell<Option<Rc<dyn Fn()>>>,
    enabled: Cell<bool>,
    listener: RefCell<Option<Subscription>>,
    disposed: Cell<bool>,
}

/// Detector firing a handler for document events that start outside a target node.
///
/// The target is read through a resolver at event time, and the handler can be swapped, so
/// neither change touches the single capture-phase document listener.
pub struct OutsideInteraction<N: ContainsNode + 'static> {
    inner: Rc<OutsideInner<N>>,
}

impl<N: ContainsNode + 'static> OutsideInteraction<N> {
    /// Creates a detector and attaches its listener when `config.enabled` is set.
    ///
    /// # Errors
    ///
    /// Returns an error when the initial listener registration fails.
    pub fn new(
        events: Rc<dyn DocumentEvents<N>>,
        target: impl Fn() -> Option<N> + 'static,
        handler: impl Fn() + 'static,
        config: OutsideClickConfig,
    ) -> Result<Self, HookError> {
        let detector = Self {
            inner: Rc::new(OutsideInner {
                events,
                event_type: config.event_type,
                target: RefCell::new(Rc::new(target)),
                handler: RefCell::new(Some(Rc::new(handler))),
                enabled: Cell::new(false),
                listener: RefCell::new(None),
                disposed: Cell::new(false),
            }),
        };
        detector.set_enabled(config.enabled)?;
        Ok(detector)
    }

    /// Returns the observed event type.
    pub fn event_type(&self) -> &str {
        &self.inner.event_type
    }

    /// Returns whether the document listener is currently attached.
    pub fn is_listening(&self) -> bool {
        self.inner.listener.borrow().is_some()
    }

    /// Returns whether the detector is enabled.
    pub fn is_enabled(&self) -> bool {
        self.inner.enabled.get()
    }

    /// Replaces the target resolver without re-registering the listener.
    pub fn set_target(&self, target: impl Fn() -> Option<N> + 'static) {
        *self.inner.target.borrow_mut() = Rc::new(target);
    }

    /// Replaces the handler without re-registering the listener.
    pub fn set_handler(&self, handler: impl Fn() + 'static) {
        *self.inner.handler.borrow_mut() = Some(Rc::new(handler));
    }

    /// Removes the handler; events are still observed but nothing fires.
    pub fn clear_handler(&self) {
        *self.inner.handler.borrow_mut() = None;
    }

    /// Attaches or detaches the document listener. Repeating the current state is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error when attaching fails; the detector then stays detached.
    pub fn set_enabled(&self, enabled: bool) -> Result<(), HookError> {
        let inner = &self.inner;
        if inner.disposed.get() {
            return Ok(());
        }
        inner.enabled.set(enabled);

        if !enabled {
            let listener = inner.listener.borrow_mut().take();
            drop(listener);
            return Ok(());
        }
        if inner.listener.borrow().is_some() {
            return Ok(());
        }

        let weak: Weak<OutsideInner<N>> = Rc::downgrade(inner);
        let listener: DocumentListener<N> = Rc::new(move |origin: Option<N>| {
            if let Some(inner) = weak.upgrade() {
                Self::dispatch(&inner, origin.as_ref());
            }
        });
        match inner.events.listen(&inner.event_type, true, listener) {
            Ok(subscription) => {
                *inner.listener.borrow_mut() = Some(subscription);
                Ok(())
            }
            Err(err) => {
                inner.enabled.set(false);
                Err(err)
            }
        }
    }

    /// Evaluates one event and fires the handler when it started outside the target.
    ///
    /// Returns whether the handler fired.
    pub fn handle_event(&self, origin: Option<&N>) -> bool {
        Self::dispatch(&self.inner, origin)
    }

    fn dispatch(inner: &OutsideInner<N>, origin: Option<&N>) -> bool {
        if inner.disposed.get() || !inner.enabled.get() {
            return false;
        }
        let resolve = inner.target.borrow().clone();
        let target = resolve();
        if !is_outside(target.as_ref(), origin) {
            return false;
        }
        let handler = inner.handler.borrow().clone();
        match handler {
            Some(handler) => {
                handler();
                true
            }
            None => false,
        }
    }

    /// Detaches the listener for good. Safe to repeat.
    pub fn dispose(&self) {
        self.inner.disposed.set(true);
        self.inner.enabled.set(false);
        let listener = self.inner.listener.borrow_mut().take();
        drop(listener);
    }
}

impl<N: ContainsNode + 'static> Clone for OutsideInteraction<N> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<N: ContainsNode + 'static> fmt::Debug for OutsideInteraction<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutsideInteraction")
            .field("event_type", &self.inner.event_type)
            .field("enabled", &self.inner.enabled.get())
            .field("listening", &self.is_listening())
            .finish()
    }
}

struct MemoryListener<N> {
    id: u64,
    event_type: String,
    capture: bool,
    callback: DocumentListener<N>,
}

struct MemoryDocumentState<N> {
    next_id: u64,
    listeners: Vec<MemoryListener<N>>,
    removals: u64,
}

impl<N> Default for MemoryDocumentState<N> {
    fn default() -> Self {
        Self {
            next_id: 0,
            listeners: Vec::new(),
            removals: 0,
        }
    }
}

/// In-memory document event target for headless tests.
pub struct MemoryDocument<N> {
    inner: Rc<RefCell<MemoryDocumentState<N>>>,
}

impl<N> Default for MemoryDocument<N> {
    fn default() -> Self {
        Self {
            inner: Rc::default(),
        }
    }
}

impl<N> Clone for MemoryDocument<N> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<N: Clone + 'static> MemoryDocument<N> {
    /// Returns how many listeners are registered for `event_type`.
    pub fn listener_count(&self, event_type: &str) -> usize {
        self.inner
            .borrow()
            .listeners
            .iter()
            .filter(|listener| listener.event_type == event_type)
            .count()
    }

    /// Returns whether every listener for `event_type` uses capture-phase delivery.
    pub fn all_capture(&self, event_type: &str) -> bool {
        self.inner
            .borrow()
            .listeners
            .iter()
            .filter(|listener| listener.event_type == event_type)
            .all(|listener| listener.capture)
    }

    /// Returns how many listeners have been unregistered so far.
    pub fn removals(&self) -> u64 {
        self.inner.borrow().removals
    }

    /// Delivers one event to every listener registered for `event_type`.
    pub fn dispatch(&self, event_type: &str, origin: Option<N>) {
        let callbacks: Vec<DocumentListener<N>> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .filter(|listener| listener.event_type == event_type)
            .map(|listener| listener.callback.clone())
            .collect();
        for callback in callbacks {
            callback(origin.clone());
        }
    }
}

impl<N: Clone + 'static> DocumentEvents<N> for MemoryDocument<N> {
    fn listen(
        &self,
        event_type: &str,
        capture: bool,
        listener: DocumentListener<N>,
    ) -> Result<Subscription, HookError> {
        let id = {
            let mut state = self.inner.borrow_mut();
            let id = state.next_id;
            state.next_id += 1;
            state.listeners.push(MemoryListener {
                id,
                event_type: event_type.to_string(),
                capture,
                callback: listener,
            });
            id
        };
        let state = Rc::downgrade(&self.inner);
        Ok(Subscription::new(move || {
            let Some(state) = state.upgrade() else {
                return;
            };
            let removed = {
                let mut state = state.borrow_mut();
                let removed = state
                    .listeners
                    .iter()
                    .position(|listener| listener.id == id)
                    .map(|index| state.listeners.remove(index));
                if removed.is_some() {
                    state.removals += 1;
                }
                removed
            };
            drop(removed);
        }))
    }
}
