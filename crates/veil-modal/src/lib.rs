#![forbid(unsafe_code)]

//! Modal lifecycle engine for veil.
//!
//! [`ModalManager`] owns every modal of a page: it drives the
//! open/close state machine, waits for CSS animations through the host's
//! notifications, locks page scrolling while a modal is focused, and keeps
//! the location hash in step with hash-tracked modals.
//!
//! # Stacking
//!
//! Only one modal is ever active. Opening a second one halts the first
//! synchronously (no animation, no events), then opens the new one.
//!
//! # Events
//!
//! Subscribe through [`ModalManager::events`]; see [`LifecycleEvents`].

pub mod events;
mod instance;
pub mod lock;
pub mod manager;
pub mod registry;
mod sync;

pub use events::{LifecycleEvent, LifecycleEvents, LifecycleKind, Subscription};
pub use lock::measure_scrollbar_width;
pub use manager::{ModalAction, ModalManager};
pub use registry::{ModalHandle, Registry, RegistryError};
