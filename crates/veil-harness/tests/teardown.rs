#![forbid(unsafe_code)]

//! Integration tests: destroy, shared-surface lifetime, handle stability.

use std::cell::Cell;
use std::rc::Rc;

use veil_core::{ModalOptionsPatch, ModalState, VeilConfig};
use veil_harness::{MemoryHost, MemorySurface, animated};
use veil_modal::{ModalHandle, ModalManager};

fn manager() -> ModalManager<MemoryHost> {
    ModalManager::new(MemoryHost::new(), VeilConfig::default())
}

fn register(modals: &mut ModalManager<MemoryHost>, name: &str) -> ModalHandle {
    modals
        .register(MemorySurface::new(name), &ModalOptionsPatch::default(), None)
        .expect("register")
}

#[test]
fn destroying_the_last_modal_removes_shared_surfaces() {
    let mut modals = manager();
    let h = register(&mut modals, "only");
    modals.open(h);
    let overlay = modals.host().overlay().expect("overlay").clone();
    let page = modals.host().background.clone().expect("page");

    modals.destroy(h);

    assert!(overlay.is_detached());
    assert!(!modals.has_shared_surfaces());
    assert!(modals.host().wrapper(0).expect("wrapper").is_detached());
    assert!(
        page.classes()
            .iter()
            .all(|c| !c.starts_with("remodal-is-")),
        "background kept state classes: {:?}",
        page.classes()
    );
    assert_eq!(modals.live_count(), 0);
}

#[test]
fn destroying_one_of_two_keeps_shared_surfaces() {
    let mut modals = manager();
    let a = register(&mut modals, "a");
    let b = register(&mut modals, "b");
    let overlay = modals.host().overlay().expect("overlay").clone();

    modals.destroy(a);

    assert!(!overlay.is_detached());
    assert!(modals.has_shared_surfaces());
    assert!(modals.host().wrapper(0).expect("a wrapper").is_detached());
    assert!(!modals.host().wrapper(1).expect("b wrapper").is_detached());
    assert_eq!(modals.state(b), Some(ModalState::Closed));

    modals.open(b);
    assert_eq!(modals.state(b), Some(ModalState::Opened));
}

#[test]
fn handles_are_never_reused() {
    let mut modals = manager();
    let a = register(&mut modals, "a");
    let b = register(&mut modals, "b");
    modals.destroy(a);
    modals.destroy(b);

    let c = register(&mut modals, "c");

    assert_ne!(c, a);
    assert_ne!(c, b);
    assert!(c.id() > b.id());
    assert_eq!(modals.handles().collect::<Vec<_>>(), vec![c]);
}

#[test]
fn destroy_is_idempotent() {
    let mut modals = manager();
    let keep = register(&mut modals, "keep");
    let h = register(&mut modals, "gone");

    modals.destroy(h);
    modals.destroy(h);

    assert_eq!(modals.live_count(), 1);
    assert_eq!(modals.state(h), None);
    assert!(modals.has_shared_surfaces());
    assert_eq!(modals.state(keep), Some(ModalState::Closed));
}

#[test]
fn operations_on_a_destroyed_handle_are_ignored() {
    let mut modals = manager();
    let h = register(&mut modals, "gone");
    modals.destroy(h);

    modals.open(h);
    modals.close(h, None);
    modals.handle_outside_click(h);

    assert_eq!(modals.state(h), None);
    assert!(!modals.is_locked());
    assert_eq!(modals.focused(), None);
}

#[test]
fn destroying_an_open_modal_releases_everything_silently() {
    let mut modals = manager();
    let h = register(&mut modals, "open");
    modals.open(h);
    let fired = Rc::new(Cell::new(0));
    let counter = Rc::clone(&fired);
    let _sub = modals.events().subscribe(move |_| counter.set(counter.get() + 1));

    modals.destroy(h);

    assert_eq!(fired.get(), 0);
    assert!(!modals.is_locked());
    assert_eq!(modals.focused(), None);
    assert_eq!(modals.host().body_padding_right, 0.0);
}

#[test]
fn destroying_mid_animation_skips_the_wait() {
    let mut modals = ModalManager::new(
        MemoryHost::new().with_created_timing(animated(0.4)),
        VeilConfig::default(),
    );
    let h = register(&mut modals, "busy");
    modals.open(h);
    assert_eq!(modals.state(h), Some(ModalState::Opening));

    modals.destroy(h);

    assert_eq!(modals.state(h), None);
    assert!(!modals.is_locked());
}

#[test]
fn registering_after_full_teardown_creates_fresh_shared_surfaces() {
    let mut modals = manager();
    let first = register(&mut modals, "first");
    modals.destroy(first);

    let second = register(&mut modals, "second");
    modals.open(second);

    let host = modals.host();
    assert_eq!(host.overlays.len(), 2);
    assert!(host.overlays[0].surface.is_detached());
    let fresh = host.overlay().expect("overlay");
    assert!(!fresh.is_detached() && fresh.is_visible());
    let page = host.background.as_ref().expect("page");
    assert!(page.has_class("remodal-is-opened"));
}
