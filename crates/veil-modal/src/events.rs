#![forbid(unsafe_code)]

//! Typed lifecycle notifications.
//!
//! Glue code subscribes to [`LifecycleEvents`] instead of listening for
//! ad-hoc events on DOM nodes.
//!
//! # Invariants
//!
//! 1. Observers are called in registration order.
//! 2. Dropping a [`Subscription`] removes the callback before the next emit.
//! 3. An observer may subscribe new observers while being called; they first
//!    receive the *next* event.
//!
//! # Failure Modes
//!
//! - Observer panic: propagates to the caller of the manager operation.
//! - Subscription leaked with `mem::forget`: the observer lives forever.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use veil_core::Reason;

use crate::registry::ModalHandle;

/// What happened to a modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleKind {
    Opening,
    Opened,
    Closing,
    Closed,
    /// A confirm action fired (before any close it triggers).
    Confirmation,
    /// A cancel action fired (before any close it triggers).
    Cancellation,
}

impl LifecycleKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Opening => "opening",
            Self::Opened => "opened",
            Self::Closing => "closing",
            Self::Closed => "closed",
            Self::Confirmation => "confirmation",
            Self::Cancellation => "cancellation",
        }
    }
}

impl fmt::Display for LifecycleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lifecycle notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleEvent {
    pub handle: ModalHandle,
    pub kind: LifecycleKind,
    /// Set for closes caused by a confirm/cancel action.
    pub reason: Option<Reason>,
}

type Callback = dyn Fn(&LifecycleEvent);

/// RAII guard; the observer is removed when this is dropped.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    _callback: Rc<Callback>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

/// Observer list for lifecycle events.
#[derive(Default)]
pub struct LifecycleEvents {
    observers: RefCell<Vec<Weak<Callback>>>,
}

impl fmt::Debug for LifecycleEvents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleEvents")
            .field("observers", &self.observers.borrow().len())
            .finish()
    }
}

impl LifecycleEvents {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe every event.
    pub fn subscribe(&self, f: impl Fn(&LifecycleEvent) + 'static) -> Subscription {
        let callback: Rc<Callback> = Rc::new(f);
        self.observers.borrow_mut().push(Rc::downgrade(&callback));
        Subscription {
            _callback: callback,
        }
    }

    /// Observe only events of `kind`.
    pub fn subscribe_kind(
        &self,
        kind: LifecycleKind,
        f: impl Fn(&LifecycleEvent) + 'static,
    ) -> Subscription {
        self.subscribe(move |ev| {
            if ev.kind == kind {
                f(ev);
            }
        })
    }

    pub fn on_opening(&self, f: impl Fn(&LifecycleEvent) + 'static) -> Subscription {
        self.subscribe_kind(LifecycleKind::Opening, f)
    }

    pub fn on_opened(&self, f: impl Fn(&LifecycleEvent) + 'static) -> Subscription {
        self.subscribe_kind(LifecycleKind::Opened, f)
    }

    pub fn on_closing(&self, f: impl Fn(&LifecycleEvent) + 'static) -> Subscription {
        self.subscribe_kind(LifecycleKind::Closing, f)
    }

    pub fn on_closed(&self, f: impl Fn(&LifecycleEvent) + 'static) -> Subscription {
        self.subscribe_kind(LifecycleKind::Closed, f)
    }

    /// Number of live observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers
            .borrow()
            .iter()
            .filter(|w| w.strong_count() > 0)
            .count()
    }

    pub(crate) fn emit(&self, event: LifecycleEvent) {
        // Snapshot first so observers can subscribe while being called.
        let live: Vec<Rc<Callback>> = {
            let mut observers = self.observers.borrow_mut();
            observers.retain(|w| w.strong_count() > 0);
            observers.iter().filter_map(Weak::upgrade).collect()
        };
        for callback in live {
            callback(&event);
        }
    }
}
