#![forbid(unsafe_code)]

//! Page scroll lock while a modal is focused.
//!
//! Locking hides the page scrollbar (via the root `ns-is-locked` class the
//! stylesheet targets) and pads the body by the scrollbar's width so content
//! does not shift. Unlocking removes exactly the padding that was added.
//!
//! # Invariants
//!
//! - `lock()` while locked and `unlock()` while unlocked are no-ops.
//! - Touch-only platforms render no scrollbar and are never locked.

use veil_core::{Host, Namespace, Platform, ScrollProbe};

/// Measure the page scrollbar width with a throwaway probe.
///
/// Returns `0.0` when the document does not overflow the viewport (no
/// scrollbar is shown, so there is nothing to compensate for).
pub fn measure_scrollbar_width<H: Host>(host: &mut H) -> f64 {
    if !host.document_overflows() {
        return 0.0;
    }

    let mut probe = host.open_probe();
    let without_scroll = probe.outer_width();
    probe.force_overflow();
    let with_scroll = probe.inner_width();
    host.discard_probe(probe);

    (without_scroll - with_scroll).max(0.0)
}

#[derive(Debug, Default)]
pub(crate) struct ScreenLock {
    /// Padding added by the current lock; `None` while unlocked.
    applied: Option<f64>,
}

impl ScreenLock {
    #[inline]
    pub fn is_locked(&self) -> bool {
        self.applied.is_some()
    }

    pub fn lock<H: Host>(&mut self, host: &mut H, ns: &Namespace) {
        if host.platform() == Platform::TouchOnly || self.is_locked() {
            return;
        }

        let width = measure_scrollbar_width(host);
        let padding = host.body_padding_right() + width;
        host.set_body_padding_right(padding);
        host.set_root_class(&ns.locked(), true);
        self.applied = Some(width);
        tracing::trace!(scrollbar_px = width, "screen locked");
    }

    pub fn unlock<H: Host>(&mut self, host: &mut H, ns: &Namespace) {
        if host.platform() == Platform::TouchOnly {
            return;
        }
        let Some(width) = self.applied.take() else {
            return;
        };

        let padding = (host.body_padding_right() - width).max(0.0);
        host.set_body_padding_right(padding);
        host.set_root_class(&ns.locked(), false);
        tracing::trace!(scrollbar_px = width, "screen unlocked");
    }
}
