#![forbid(unsafe_code)]

//! The environment a modal manager runs against.
//!
//! A browser binding implements [`Host`] over the DOM; tests use the
//! in-memory host from `veil-harness`. Everything here is single-threaded:
//! the manager holds the host by value and calls it synchronously.

use crate::surface::Surface;

/// Input platform class, used to skip scroll locking where no scrollbar is
/// rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Platform {
    #[default]
    Desktop,
    /// Touch-only mobile platform with overlay scrollbars.
    TouchOnly,
}

/// A detached-but-measurable probe element used to measure scrollbar width.
///
/// The probe starts as a fixed-width, hidden block with an inner child
/// stretched to full width.
pub trait ScrollProbe {
    /// Offset width of the probe before overflow is forced.
    fn outer_width(&self) -> f64;

    /// Force the probe to always render a scrollbar.
    fn force_overflow(&mut self);

    /// Offset width of the inner child after overflow is forced.
    fn inner_width(&self) -> f64;
}

/// Page-level capabilities the engine needs.
pub trait Host {
    type Surface: Surface;
    type Probe: ScrollProbe;

    fn platform(&self) -> Platform {
        Platform::Desktop
    }

    /// Whether the platform supports CSS animations at all.
    fn animations_supported(&self) -> bool {
        true
    }

    /// Current location-hash fragment, with or without the leading `#`.
    fn location_hash(&self) -> String;

    /// Set the location hash; an empty string clears it.
    fn set_location_hash(&mut self, fragment: &str);

    fn scroll_top(&self) -> f64;

    fn set_scroll_top(&mut self, y: f64);

    /// Whether the document is taller than the viewport.
    fn document_overflows(&self) -> bool;

    fn open_probe(&mut self) -> Self::Probe;

    fn discard_probe(&mut self, probe: Self::Probe);

    fn body_padding_right(&self) -> f64;

    fn set_body_padding_right(&mut self, px: f64);

    /// Add (`on`) or remove a class on the document root element.
    fn set_root_class(&mut self, class: &str, on: bool);

    /// Find the page's background surface (the content behind modals).
    /// Pages without one return `None`.
    fn find_background(&mut self, class: &str) -> Option<Self::Surface>;

    /// Create the shared overlay under `mount` (the body when `None`).
    fn create_overlay(&mut self, mount: Option<&str>) -> Self::Surface;

    /// Create a wrapper under `mount` and move `content` into it.
    fn create_wrapper(&mut self, mount: Option<&str>, content: &mut Self::Surface)
    -> Self::Surface;
}
