#![forbid(unsafe_code)]

//! Animation-completion bookkeeping for one pending transition.
//!
//! While armed, every animation start on a listened surface increments a
//! counter and every matching end decrements it. When the counter returns to
//! zero the transition completes and the tracker disarms itself, so late or
//! duplicated notifications cannot complete it twice.
//!
//! Events whose target is a descendant of the surface are ignored: only the
//! surface's own animations gate the transition.

use veil_core::{AnimationBoundary, EventTarget, ModalState, Reason, SurfaceKind, SurfaceSet};
use web_time::Instant;

/// A transition waiting on animations.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Pending {
    /// State entered once animations finish.
    pub target: ModalState,
    pub reason: Option<Reason>,
    listening: SurfaceSet,
    running: u32,
    started_at: Instant,
}

impl Pending {
    pub fn elapsed_ms(&self) -> u128 {
        self.started_at.elapsed().as_millis()
    }
}

/// Outcome of feeding one notification to the tracker.
#[derive(Debug, Clone, Copy)]
pub(crate) enum SyncStep {
    /// Not armed, not a listened surface, or a descendant's event.
    Ignored,
    /// An end arrived with no matching start.
    Unmatched,
    /// Counted; this many animations are still running.
    Running(u32),
    /// The last running animation ended.
    Completed(Pending),
}

#[derive(Debug, Default)]
pub(crate) struct AnimationSync {
    pending: Option<Pending>,
}

impl AnimationSync {
    /// Start listening on `listening` for a transition to `target`.
    pub fn arm(&mut self, listening: SurfaceSet, target: ModalState, reason: Option<Reason>) {
        self.pending = Some(Pending {
            target,
            reason,
            listening,
            running: 0,
            started_at: Instant::now(),
        });
    }

    /// Stop listening, returning the abandoned transition if there was one.
    pub fn disarm(&mut self) -> Option<Pending> {
        self.pending.take()
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    pub fn on_boundary(
        &mut self,
        surface: SurfaceKind,
        boundary: AnimationBoundary,
        target: EventTarget,
    ) -> SyncStep {
        let Some(pending) = self.pending.as_mut() else {
            return SyncStep::Ignored;
        };
        if target != EventTarget::Surface || !pending.listening.contains(surface.flag()) {
            return SyncStep::Ignored;
        }

        match boundary {
            AnimationBoundary::Start => {
                pending.running += 1;
                SyncStep::Running(pending.running)
            }
            AnimationBoundary::End => {
                if pending.running == 0 {
                    return SyncStep::Unmatched;
                }
                pending.running -= 1;
                if pending.running > 0 {
                    return SyncStep::Running(pending.running);
                }
                match self.pending.take() {
                    Some(done) => SyncStep::Completed(done),
                    None => SyncStep::Ignored,
                }
            }
        }
    }
}
