#![forbid(unsafe_code)]

//! Instance registry with stable, never-reused handles.
//!
//! # Invariants
//!
//! - A handle is the slot index assigned at insertion; slots only grow, so a
//!   handle is never reused for the life of the registry.
//! - Removal leaves a hole; `live_count()` counts occupied slots only.
//! - A deep-link id maps to at most one live entry.
//!
//! # Failure Modes
//!
//! - `get()` / `remove()` on a removed or foreign handle returns `None`.
//! - Inserting a second entry with a live entry's deep-link id is rejected.

use ahash::AHashMap;
use core::fmt;

use veil_core::{DeepLinkError, DeepLinkId, OptionsError};

/// Stable identity of a registered modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModalHandle(u32);

impl ModalHandle {
    /// Raw slot index.
    #[inline]
    pub const fn id(self) -> u32 {
        self.0
    }

    #[cfg(test)]
    pub(crate) const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ModalHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "modal#{}", self.0)
    }
}

/// Error from registering a modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The deep-link id cannot be used as a lookup key.
    InvalidDeepLink(DeepLinkError),
    /// Another live modal already uses this deep-link id.
    DuplicateDeepLink(DeepLinkId),
    /// The declarative option string was rejected.
    InvalidOptions(OptionsError),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDeepLink(e) => write!(f, "invalid deep-link id: {e}"),
            Self::DuplicateDeepLink(id) => write!(f, "deep-link id {id:?} is already registered"),
            Self::InvalidOptions(e) => write!(f, "invalid modal options: {e}"),
        }
    }
}

impl std::error::Error for RegistryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidDeepLink(e) => Some(e),
            Self::InvalidOptions(e) => Some(e),
            Self::DuplicateDeepLink(_) => None,
        }
    }
}

impl From<DeepLinkError> for RegistryError {
    fn from(e: DeepLinkError) -> Self {
        Self::InvalidDeepLink(e)
    }
}

impl From<OptionsError> for RegistryError {
    fn from(e: OptionsError) -> Self {
        Self::InvalidOptions(e)
    }
}

/// Append-only slot table indexed by [`ModalHandle`].
pub struct Registry<T> {
    slots: Vec<Option<T>>,
    live: usize,
    by_link: AHashMap<DeepLinkId, ModalHandle>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("slots", &self.slots.len())
            .field("live", &self.live)
            .field("links", &self.by_link.len())
            .finish()
    }
}

impl<T> Registry<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            live: 0,
            by_link: AHashMap::new(),
        }
    }

    /// Check that `link` could be inserted.
    pub fn check_link(&self, link: Option<&DeepLinkId>) -> Result<(), RegistryError> {
        match link {
            Some(id) if self.by_link.contains_key(id) => {
                Err(RegistryError::DuplicateDeepLink(id.clone()))
            }
            _ => Ok(()),
        }
    }

    /// Append an entry, optionally indexed by a deep-link id.
    pub fn insert(&mut self, item: T, link: Option<DeepLinkId>) -> Result<ModalHandle, RegistryError> {
        self.check_link(link.as_ref())?;
        // u32 handles: a page registering four billion modals is not a case.
        let handle = ModalHandle(self.slots.len() as u32);
        self.slots.push(Some(item));
        self.live += 1;
        if let Some(id) = link {
            self.by_link.insert(id, handle);
        }
        Ok(handle)
    }

    /// Remove an entry, leaving its slot empty.
    pub fn remove(&mut self, handle: ModalHandle) -> Option<T> {
        let item = self.slots.get_mut(handle.0 as usize)?.take()?;
        self.live -= 1;
        self.by_link.retain(|_, h| *h != handle);
        Some(item)
    }

    #[must_use]
    pub fn get(&self, handle: ModalHandle) -> Option<&T> {
        self.slots.get(handle.0 as usize)?.as_ref()
    }

    pub fn get_mut(&mut self, handle: ModalHandle) -> Option<&mut T> {
        self.slots.get_mut(handle.0 as usize)?.as_mut()
    }

    #[must_use]
    pub fn contains(&self, handle: ModalHandle) -> bool {
        self.get(handle).is_some()
    }

    /// Resolve a deep-link id to a live handle.
    #[must_use]
    pub fn lookup(&self, id: &DeepLinkId) -> Option<ModalHandle> {
        self.by_link.get(id).copied()
    }

    /// Number of live (non-removed) entries.
    #[inline]
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Live entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (ModalHandle, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|item| (ModalHandle(i as u32), item)))
    }
}
