#![forbid(unsafe_code)]

//! Per-instance modal record.

use veil_core::{DeepLinkId, ModalOptions, ModalState};

use crate::sync::AnimationSync;

/// One registered modal and the surfaces it owns.
///
/// The background and overlay are shared across instances and owned by the
/// manager; the wrapper and content belong to this instance alone.
#[derive(Debug)]
pub(crate) struct ModalInstance<S> {
    pub state: ModalState,
    pub options: ModalOptions,
    pub deep_link: Option<DeepLinkId>,
    pub wrapper: S,
    pub content: S,
    pub sync: AnimationSync,
}

impl<S> ModalInstance<S> {
    pub fn new(options: ModalOptions, deep_link: Option<DeepLinkId>, wrapper: S, content: S) -> Self {
        Self {
            state: ModalState::Closed,
            options,
            deep_link,
            wrapper,
            content,
            sync: AnimationSync::default(),
        }
    }

    /// The deep-link id, if hash tracking applies to this instance.
    pub fn tracked_link(&self) -> Option<&DeepLinkId> {
        if self.options.hash_tracking {
            self.deep_link.as_ref()
        } else {
            None
        }
    }
}
