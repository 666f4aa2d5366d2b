//! Class-name construction under a configurable namespace.

use crate::state::ModalState;

/// Default namespace, matching the class names storefront stylesheets ship.
pub const DEFAULT_NAMESPACE: &str = "remodal";

/// Prefix for every class the engine puts on a surface.
///
/// `Namespace::new("remodal").class(&["is", "opened"])` is
/// `"remodal-is-opened"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace(String);

impl Default for Namespace {
    fn default() -> Self {
        Self(DEFAULT_NAMESPACE.to_owned())
    }
}

impl Namespace {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self(prefix.into())
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Join `parts` onto the namespace with dashes.
    #[must_use]
    pub fn class(&self, parts: &[&str]) -> String {
        let extra: usize = parts.iter().map(|p| p.len() + 1).sum();
        let mut out = String::with_capacity(self.0.len() + extra);
        out.push_str(&self.0);
        for part in parts {
            out.push('-');
            out.push_str(part);
        }
        out
    }

    #[must_use]
    pub fn state_class(&self, state: ModalState) -> String {
        self.class(&["is", state.as_str()])
    }

    /// The four state classes, in the order they are stripped.
    #[must_use]
    pub fn all_state_classes(&self) -> [String; 4] {
        ModalState::ALL.map(|s| self.state_class(s))
    }

    #[must_use]
    pub fn wrapper(&self) -> String {
        self.class(&["wrapper"])
    }

    #[must_use]
    pub fn overlay(&self) -> String {
        self.class(&["overlay"])
    }

    #[must_use]
    pub fn background(&self) -> String {
        self.class(&["bg"])
    }

    #[must_use]
    pub fn initialized(&self) -> String {
        self.class(&["is", "initialized"])
    }

    #[must_use]
    pub fn locked(&self) -> String {
        self.class(&["is", "locked"])
    }
}

/// Split a space-separated modifier into its class tokens.
pub fn modifier_classes(modifier: &str) -> impl Iterator<Item = &str> {
    modifier.split_ascii_whitespace()
}
