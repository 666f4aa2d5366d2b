#![forbid(unsafe_code)]

//! Property tests: random operation sequences keep the manager consistent,
//! plus a check on what gets logged.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use proptest::prelude::*;
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use veil_core::{
    AnimationBoundary, EventTarget, ModalOptionsPatch, ModalState, Reason, SurfaceKind,
    VeilConfig,
};
use veil_harness::{MemoryHost, MemorySurface, animated};
use veil_modal::{ModalAction, ModalHandle, ModalManager};

#[derive(Debug, Clone)]
enum Op {
    Open(usize),
    Close(usize),
    Confirm(usize),
    Destroy(usize),
    Escape,
    Start(usize, SurfaceKind),
    End(usize, SurfaceKind),
    Hash(usize),
}

fn surface_kind() -> impl Strategy<Value = SurfaceKind> {
    prop::sample::select(SurfaceKind::ALL.to_vec())
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..3usize).prop_map(Op::Open),
        (0..3usize).prop_map(Op::Close),
        (0..3usize).prop_map(Op::Confirm),
        (0..3usize).prop_map(Op::Destroy),
        Just(Op::Escape),
        (0..3usize, surface_kind()).prop_map(|(i, k)| Op::Start(i, k)),
        (0..3usize, surface_kind()).prop_map(|(i, k)| Op::End(i, k)),
        (0..4usize).prop_map(Op::Hash),
    ]
}

fn apply(modals: &mut ModalManager<MemoryHost>, handles: &[ModalHandle], op: &Op) {
    let ids = ["a", "b", "c", ""];
    match *op {
        Op::Open(i) => modals.open(handles[i]),
        Op::Close(i) => modals.close(handles[i], Some(Reason::Cancellation)),
        Op::Confirm(i) => modals.dispatch(handles[i], ModalAction::Confirm),
        Op::Destroy(i) => modals.destroy(handles[i]),
        Op::Escape => modals.handle_escape(),
        Op::Start(i, kind) => {
            modals.notify_animation(handles[i], kind, AnimationBoundary::Start, EventTarget::Surface);
        }
        Op::End(i, kind) => {
            modals.notify_animation(handles[i], kind, AnimationBoundary::End, EventTarget::Surface);
        }
        Op::Hash(i) => {
            modals.host_mut().navigate(ids[i]);
            modals.handle_hash_change();
        }
    }
}

proptest! {
    #[test]
    fn manager_stays_consistent(animate in any::<bool>(), ops in prop::collection::vec(op(), 0..40)) {
        let timing = if animate { animated(0.25) } else { veil_core::AnimationTiming::none() };
        let mut modals = ModalManager::new(
            MemoryHost::new().with_created_timing(timing),
            VeilConfig::default(),
        );
        let handles: Vec<ModalHandle> = ["a", "b", "c"]
            .iter()
            .map(|id| {
                modals
                    .register(MemorySurface::new(*id), &ModalOptionsPatch::default(), Some(*id))
                    .expect("register")
            })
            .collect();

        for op in &ops {
            apply(&mut modals, &handles, op);

            let active: Vec<ModalHandle> = handles
                .iter()
                .copied()
                .filter(|&h| modals.state(h).is_some_and(|s| s != ModalState::Closed))
                .collect();
            prop_assert!(active.len() <= 1, "several active modals: {:?}", active);
            if let Some(&h) = active.first() {
                prop_assert_eq!(modals.focused(), Some(h));
            }
            prop_assert_eq!(modals.is_locked(), modals.focused().is_some());
            prop_assert!(modals.host().body_padding_right >= 0.0);
            if !modals.is_locked() {
                prop_assert_eq!(modals.host().body_padding_right, 0.0);
            }
            prop_assert_eq!(modals.has_shared_surfaces(), modals.live_count() > 0);
        }
    }
}

struct WarnCounter(Arc<AtomicUsize>);

impl<S: tracing::Subscriber> Layer<S> for WarnCounter {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == tracing::Level::WARN {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[test]
fn stray_animation_end_is_logged_as_warning() {
    let warnings = Arc::new(AtomicUsize::new(0));
    let subscriber = tracing_subscriber::registry().with(WarnCounter(Arc::clone(&warnings)));

    tracing::subscriber::with_default(subscriber, || {
        let mut modals = ModalManager::new(
            MemoryHost::new().with_created_timing(animated(0.3)),
            VeilConfig::default(),
        );
        let h = modals
            .register(MemorySurface::new("dialog"), &ModalOptionsPatch::default(), None)
            .expect("register");
        modals.open(h);
        modals.notify_animation(h, SurfaceKind::Wrapper, AnimationBoundary::End, EventTarget::Surface);
        modals.open(h);
    });

    assert_eq!(warnings.load(Ordering::SeqCst), 1);
}
