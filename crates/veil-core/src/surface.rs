#![forbid(unsafe_code)]

//! Visual surfaces a modal instance manipulates.
//!
//! A modal binds four surfaces: the shared page background, the shared
//! overlay, its own wrapper, and its content node. The engine never renders
//! anything; it only asks surfaces to change classes and visibility, and
//! reads their animation timing.

use bitflags::bitflags;

use crate::namespace::{Namespace, modifier_classes};
use crate::state::ModalState;
use crate::timing::AnimationTiming;

/// Which of the four bound surfaces a notification concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceKind {
    Background,
    Overlay,
    Wrapper,
    Content,
}

impl SurfaceKind {
    pub const ALL: [SurfaceKind; 4] = [
        SurfaceKind::Background,
        SurfaceKind::Overlay,
        SurfaceKind::Wrapper,
        SurfaceKind::Content,
    ];

    #[must_use]
    pub const fn flag(self) -> SurfaceSet {
        match self {
            Self::Background => SurfaceSet::BACKGROUND,
            Self::Overlay => SurfaceSet::OVERLAY,
            Self::Wrapper => SurfaceSet::WRAPPER,
            Self::Content => SurfaceSet::CONTENT,
        }
    }
}

bitflags! {
    /// Set of surfaces, used to track which ones are listened to.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SurfaceSet: u8 {
        const BACKGROUND = 0b0001;
        const OVERLAY    = 0b0010;
        const WRAPPER    = 0b0100;
        const CONTENT    = 0b1000;
    }
}

/// Edge of a CSS animation reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationBoundary {
    Start,
    End,
}

/// Where an animation event originated relative to the surface it was
/// delivered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventTarget {
    /// The surface itself is animating.
    Surface,
    /// The event bubbled up from a descendant element.
    Descendant,
}

/// Capability interface of one visual surface.
pub trait Surface {
    fn add_class(&mut self, class: &str);

    fn remove_class(&mut self, class: &str);

    fn has_class(&self, class: &str) -> bool;

    fn set_visible(&mut self, visible: bool);

    /// Computed animation timing as of now.
    fn animation_timing(&self) -> AnimationTiming;

    /// Reset the surface's own scroll offset.
    fn scroll_to_top(&mut self) {}

    /// Move input focus to this surface.
    fn focus(&mut self) {}

    /// Allow this surface to receive programmatic focus.
    fn make_focusable(&mut self) {}

    /// Remove the surface from the render tree.
    fn detach(&mut self);

    /// Replace whatever state class is present with the one for `state`.
    fn apply_state_class(&mut self, ns: &Namespace, state: ModalState) {
        for class in ns.all_state_classes() {
            self.remove_class(&class);
        }
        self.add_class(&ns.state_class(state));
    }

    fn clear_state_classes(&mut self, ns: &Namespace) {
        for class in ns.all_state_classes() {
            self.remove_class(&class);
        }
    }

    fn add_modifier(&mut self, modifier: &str) {
        for class in modifier_classes(modifier) {
            self.add_class(class);
        }
    }

    fn remove_modifier(&mut self, modifier: &str) {
        for class in modifier_classes(modifier) {
            self.remove_class(class);
        }
    }
}
