//! Modal lifecycle states and state-change reasons.

use core::fmt;

/// Lifecycle state of a single modal instance.
///
/// `Closed` is the initial and stable resting state. `Opening` and `Closing`
/// only last while an animation wait is pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ModalState {
    #[default]
    Closed,
    Opening,
    Opened,
    Closing,
}

impl ModalState {
    /// All states, in the order their classes are stripped from surfaces.
    pub const ALL: [ModalState; 4] = [
        ModalState::Closing,
        ModalState::Opening,
        ModalState::Closed,
        ModalState::Opened,
    ];

    /// Lowercase name used in class names and event kinds.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Opening => "opening",
            Self::Opened => "opened",
            Self::Closing => "closing",
        }
    }

    /// Whether an animation wait may be pending in this state.
    #[inline]
    #[must_use]
    pub const fn is_transitioning(self) -> bool {
        matches!(self, Self::Opening | Self::Closing)
    }
}

impl fmt::Display for ModalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a modal is being closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reason {
    /// The user confirmed the dialog.
    Confirmation,
    /// The user cancelled the dialog.
    Cancellation,
}

impl Reason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Confirmation => "confirmation",
            Self::Cancellation => "cancellation",
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
