//! The shared "current event" slot.
//!
//! Listeners run synchronously and may themselves dispatch events, so the
//! slot is re-entrant: each listener invocation activates its event through
//! [`EventSlot::activate`], and the returned [`ActiveEvent`] guard restores
//! whatever was current before when it drops.
//!
//! # Invariants
//!
//! 1. After an [`ActiveEvent`] drops, [`EventSlot::current`] returns exactly
//!    what it returned before the matching `activate` call.
//! 2. Restoration happens on every exit path: normal return, `?`, and panic
//!    unwinding.
//! 3. Clones of an [`EventSlot`] share one slot.

use std::cell::RefCell;
use std::rc::Rc;

/// Parameters for building an event.
#[derive(Debug, Clone, PartialEq)]
pub struct EventInit<D> {
    /// Whether the event propagates to ancestors after the target.
    pub bubbles: bool,
    /// Whether the event can be cancelled.
    pub cancelable: bool,
    /// Payload carried by the event.
    pub detail: Option<D>,
}

impl<D> Default for EventInit<D> {
    fn default() -> Self {
        Self {
            bubbles: false,
            cancelable: false,
            detail: None,
        }
    }
}

/// Single-threaded shared slot holding the event being handled.
pub struct EventSlot<E> {
    current: Rc<RefCell<Option<E>>>,
}

impl<E> Clone for EventSlot<E> {
    fn clone(&self) -> Self {
        Self {
            current: Rc::clone(&self.current),
        }
    }
}

impl<E> Default for EventSlot<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for EventSlot<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSlot")
            .field("active", &self.is_active())
            .finish()
    }
}

impl<E> EventSlot<E> {
    /// Create an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self {
            current: Rc::new(RefCell::new(None)),
        }
    }

    /// Whether an event is currently active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.current.borrow().is_some()
    }

    /// Run `f` against the current event without cloning it.
    ///
    /// `f` must not activate events on this slot.
    pub fn with<R>(&self, f: impl FnOnce(Option<&E>) -> R) -> R {
        f(self.current.borrow().as_ref())
    }

    /// Make `event` current until the returned guard drops.
    #[must_use = "dropping the guard immediately restores the previous event"]
    pub fn activate(&self, event: E) -> ActiveEvent<E> {
        let previous = self.current.replace(Some(event));
        ActiveEvent {
            slot: Rc::clone(&self.current),
            previous,
        }
    }
}

impl<E: Clone> EventSlot<E> {
    /// Clone of the current event, if any.
    #[must_use]
    pub fn current(&self) -> Option<E> {
        self.current.borrow().clone()
    }
}

/// RAII guard restoring the previously current event on drop.
#[must_use = "dropping the guard immediately restores the previous event"]
pub struct ActiveEvent<E> {
    slot: Rc<RefCell<Option<E>>>,
    previous: Option<E>,
}

impl<E> std::fmt::Debug for ActiveEvent<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActiveEvent")
            .field("restores_event", &self.previous.is_some())
            .finish()
    }
}

impl<E> Drop for ActiveEvent<E> {
    fn drop(&mut self) {
        *self.slot.borrow_mut() = self.previous.take();
    }
}
