#![forbid(unsafe_code)]

//! veil: a headless modal dialog lifecycle controller.
//!
//! This crate re-exports the stable surface of `veil-core` (vocabulary and
//! host traits) and `veil-modal` (the engine). Most users want the
//! [`prelude`].
//!
//! # Quick Start
//!
//! ```
//! use veil::prelude::*;
//! use veil_harness::{MemoryHost, MemorySurface};
//!
//! let mut modals = ModalManager::new(MemoryHost::new(), VeilConfig::default());
//! let promo = modals
//!     .register(MemorySurface::new("promo"), &ModalOptionsPatch::default(), Some("promo"))
//!     .expect("valid deep link");
//!
//! modals.open(promo);
//! assert_eq!(modals.state(promo), Some(ModalState::Opened));
//! assert_eq!(modals.host().hash, "promo");
//!
//! modals.dispatch(promo, ModalAction::Confirm);
//! assert_eq!(modals.state(promo), Some(ModalState::Closed));
//! ```

pub use veil_core::{
    AnimationBoundary, AnimationTiming, DeepLinkError, DeepLinkId, EventTarget, Host,
    ModalOptions, ModalOptionsPatch, ModalState, Namespace, OptionsError, Platform, Reason,
    ScrollProbe, Surface, SurfaceKind, SurfaceSet, TimingError, VeilConfig, VendorTiming,
};
#[cfg(feature = "policy-config")]
pub use veil_core::ConfigError;
#[cfg(feature = "tracing-json")]
pub use veil_core::logging;

pub use veil_modal::{
    LifecycleEvent, LifecycleEvents, LifecycleKind, ModalAction, ModalHandle, ModalManager,
    RegistryError, Subscription, measure_scrollbar_width,
};

/// Everything needed to wire veil into a page.
pub mod prelude {
    pub use veil_core::{
        AnimationBoundary, EventTarget, Host, ModalOptions, ModalOptionsPatch, ModalState,
        Reason, Surface, SurfaceKind, VeilConfig,
    };
    pub use veil_modal::{
        LifecycleEvent, LifecycleKind, ModalAction, ModalHandle, ModalManager, Subscription,
    };
}
