#![forbid(unsafe_code)]

//! Integration tests: declarative triggers, escape, outside clicks.

use std::cell::RefCell;
use std::rc::Rc;

use veil_core::{ModalOptions, ModalOptionsPatch, ModalState, OptionsError, Reason, VeilConfig};
use veil_harness::{MemoryHost, MemorySurface};
use veil_modal::{LifecycleKind, ModalAction, ModalHandle, ModalManager, RegistryError};

fn manager() -> ModalManager<MemoryHost> {
    ModalManager::new(MemoryHost::new(), VeilConfig::default())
}

fn register_with(modals: &mut ModalManager<MemoryHost>, attr: &str) -> ModalHandle {
    modals
        .register_with_attribute(MemorySurface::new("dialog"), attr, Some("dialog"))
        .expect("register")
}

fn opened(modals: &mut ModalManager<MemoryHost>, attr: &str) -> ModalHandle {
    let h = register_with(modals, attr);
    modals.open(h);
    h
}

// ============================================================================
// Confirm / cancel
// ============================================================================

#[test]
fn confirm_announces_then_closes_with_reason() {
    let mut modals = manager();
    let h = opened(&mut modals, "");
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    let _sub = modals
        .events()
        .subscribe(move |ev| sink.borrow_mut().push((ev.kind, ev.reason)));

    modals.dispatch(h, ModalAction::Confirm);

    assert_eq!(
        *log.borrow(),
        vec![
            (LifecycleKind::Confirmation, None),
            (LifecycleKind::Closing, Some(Reason::Confirmation)),
            (LifecycleKind::Closed, Some(Reason::Confirmation)),
        ]
    );
    assert_eq!(modals.state(h), Some(ModalState::Closed));
}

#[test]
fn confirm_without_close_on_confirm_only_announces() {
    let mut modals = manager();
    let h = opened(&mut modals, "closeOnConfirm: false");
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    let _sub = modals.events().subscribe(move |ev| sink.borrow_mut().push(ev.kind));

    modals.dispatch(h, ModalAction::Confirm);

    assert_eq!(*log.borrow(), vec![LifecycleKind::Confirmation]);
    assert_eq!(modals.state(h), Some(ModalState::Opened));
}

#[test]
fn cancel_closes_with_cancellation_reason() {
    let mut modals = manager();
    let h = opened(&mut modals, "");
    let closed = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&closed);
    let _sub = modals.events().on_closed(move |ev| *sink.borrow_mut() = ev.reason);

    modals.dispatch(h, ModalAction::Cancel);

    assert_eq!(*closed.borrow(), Some(Reason::Cancellation));
}

#[test]
fn cancel_respects_close_on_cancel() {
    let mut modals = manager();
    let h = opened(&mut modals, "close_on_cancel: false");

    modals.dispatch(h, ModalAction::Cancel);

    assert_eq!(modals.state(h), Some(ModalState::Opened));
}

#[test]
fn close_action_closes_without_reason() {
    let mut modals = manager();
    let h = opened(&mut modals, "closeOnConfirm: false, closeOnCancel: false");
    let closed = Rc::new(RefCell::new(Some(Reason::Confirmation)));
    let sink = Rc::clone(&closed);
    let _sub = modals.events().on_closed(move |ev| *sink.borrow_mut() = ev.reason);

    modals.dispatch(h, ModalAction::Close);

    assert_eq!(modals.state(h), Some(ModalState::Closed));
    assert_eq!(*closed.borrow(), None);
}

// ============================================================================
// Escape and outside clicks
// ============================================================================

#[test]
fn escape_closes_the_focused_modal() {
    let mut modals = manager();
    let h = opened(&mut modals, "");

    modals.handle_escape();

    assert_eq!(modals.state(h), Some(ModalState::Closed));
}

#[test]
fn escape_is_ignored_when_disabled_or_nothing_is_open() {
    let mut modals = manager();
    modals.handle_escape();

    let h = opened(&mut modals, "closeOnEscape: false");
    modals.handle_escape();

    assert_eq!(modals.state(h), Some(ModalState::Opened));
}

#[test]
fn outside_click_closes_unless_disabled() {
    let mut modals = manager();
    let h = opened(&mut modals, "");
    modals.handle_outside_click(h);
    assert_eq!(modals.state(h), Some(ModalState::Closed));

    let mut modals = manager();
    let h = opened(&mut modals, "closeOnOutsideClick: false");
    modals.handle_outside_click(h);
    assert_eq!(modals.state(h), Some(ModalState::Opened));
}

// ============================================================================
// Targets and options
// ============================================================================

#[test]
fn open_target_resolves_ids() {
    let mut modals = manager();
    let h = register_with(&mut modals, "");

    modals.open_target("missing");
    modals.open_target("not an id");
    assert_eq!(modals.state(h), Some(ModalState::Closed));

    modals.open_target("dialog");
    assert_eq!(modals.state(h), Some(ModalState::Opened));
}

#[test]
fn attribute_overrides_merge_over_config_defaults() {
    let defaults = ModalOptions::default().close_on_escape(false).modifier("base");
    let mut modals = ModalManager::new(
        MemoryHost::new(),
        VeilConfig::default().defaults(defaults),
    );
    let h = register_with(&mut modals, "hashTracking: false, modifier: promo wide");

    let options = modals.options(h).expect("options");
    assert!(!options.hash_tracking);
    assert!(!options.close_on_escape);
    assert!(options.close_on_confirm);
    assert_eq!(options.modifier, "promo wide");
}

#[test]
fn bad_attribute_fails_registration() {
    let mut modals = manager();

    let err = modals
        .register_with_attribute(MemorySurface::new("x"), "closeOnEscape: nope", None)
        .expect_err("invalid bool");
    assert!(matches!(
        err,
        RegistryError::InvalidOptions(OptionsError::InvalidBool { .. })
    ));

    let err = modals
        .register_with_attribute(MemorySurface::new("x"), "closeOnScroll: true", None)
        .expect_err("unknown key");
    assert!(matches!(
        err,
        RegistryError::InvalidOptions(OptionsError::UnknownKey(ref k)) if k == "closeOnScroll"
    ));
    assert_eq!(modals.live_count(), 0);
}

#[test]
fn empty_patch_keeps_defaults() {
    let patch = ModalOptionsPatch::parse_attribute("  ").expect("empty attribute");
    assert!(patch.is_empty());
    assert_eq!(ModalOptions::default().merged(&patch), ModalOptions::default());
}
