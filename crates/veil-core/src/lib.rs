#![forbid(unsafe_code)]

//! Core vocabulary for veil: modal states, CSS animation timing, class
//! naming, option records, and the traits a host environment implements.
//!
//! Nothing in this crate owns modal lifecycle; see `veil-modal` for the
//! engine that drives these types.

pub mod deep_link;
pub mod host;
#[cfg(feature = "tracing-json")]
pub mod logging;
pub mod namespace;
pub mod options;
pub mod state;
pub mod surface;
pub mod timing;

pub use deep_link::{DeepLinkError, DeepLinkId};
pub use host::{Host, Platform, ScrollProbe};
pub use namespace::Namespace;
pub use options::{ModalOptions, ModalOptionsPatch, OptionsError, VeilConfig};
#[cfg(feature = "policy-config")]
pub use options::ConfigError;
pub use state::{ModalState, Reason};
pub use surface::{AnimationBoundary, EventTarget, Surface, SurfaceKind, SurfaceSet};
pub use timing::{AnimationTiming, TimingError, VendorTiming};
#[cfg(feature = "tracing-json")]
pub use logging::LoggingError;
