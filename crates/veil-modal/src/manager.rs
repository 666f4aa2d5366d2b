#![forbid(unsafe_code)]

//! Modal manager: the application-level context that owns every modal.
//!
//! The manager replaces process-wide globals with one explicit object: the
//! instance registry, the focused-instance pointer, the scroll-lock flag, the
//! saved scroll position, and the shared background/overlay surfaces all live
//! here, and are created and dropped with it.
//!
//! # State Machine
//!
//! | From | Trigger | To |
//! |------|---------|----|
//! | Closed | `open()` | Opening |
//! | Opening | animations finish | Opened |
//! | Opened | `close()` | Closing |
//! | Closing | animations finish | Closed |
//! | any other | `open()` / `close()` | unchanged (ignored) |
//! | non-Closed | halt (stacking, destroy) | Closed, silently |
//!
//! # Invariants
//!
//! - At most one instance is outside `Closed` at any time: opening a second
//!   instance halts the focused one first, without animation or events.
//! - A transition completes exactly once: either when the last running
//!   animation ends, or synchronously when no bound surface animates.
//! - The screen is locked iff some instance is focused and not yet closed.
//! - Handles are never reused; operations on a destroyed handle are no-ops.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Request in wrong state | `open()` while open, `close()` mid-animation | Ignored, logged at debug |
//! | Unknown handle | Destroyed or foreign | Ignored |
//! | Malformed hash | Fragment is not a valid id | Treated as no match |
//! | Stray `animationend` | End without start | Ignored, logged at warn |
//!
//! # Example
//!
//! ```ignore
//! let mut modals = ModalManager::new(host, VeilConfig::default());
//! let promo = modals.register(content, &ModalOptionsPatch::default(), Some("promo"))?;
//! let _sub = modals.events().on_closed(|ev| println!("{} closed", ev.handle));
//!
//! modals.open(promo);
//! // ...host forwards animation events...
//! modals.notify_animation(promo, SurfaceKind::Content, AnimationBoundary::End, EventTarget::Surface);
//! ```

use core::fmt;

use veil_core::{
    AnimationBoundary, DeepLinkId, EventTarget, Host, ModalOptions, ModalOptionsPatch, ModalState,
    Namespace, Reason, Surface, SurfaceKind, SurfaceSet, VeilConfig,
};

use crate::events::{LifecycleEvent, LifecycleEvents, LifecycleKind};
use crate::instance::ModalInstance;
use crate::lock::ScreenLock;
use crate::registry::{ModalHandle, Registry, RegistryError};
use crate::sync::SyncStep;

/// User intent routed to a modal by declarative triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalAction {
    /// Close without a reason.
    Close,
    /// Confirm; closes with [`Reason::Confirmation`] if `close_on_confirm`.
    Confirm,
    /// Cancel; closes with [`Reason::Cancellation`] if `close_on_cancel`.
    Cancel,
}

fn lifecycle_kind(state: ModalState) -> LifecycleKind {
    match state {
        ModalState::Opening => LifecycleKind::Opening,
        ModalState::Opened => LifecycleKind::Opened,
        ModalState::Closing => LifecycleKind::Closing,
        ModalState::Closed => LifecycleKind::Closed,
    }
}

fn fragment_id(fragment: &str) -> &str {
    fragment.strip_prefix('#').unwrap_or(fragment)
}

/// Put every bound surface in `state` and record it on the instance.
fn apply_state<S: Surface>(
    inst: &mut ModalInstance<S>,
    background: Option<&mut S>,
    overlay: Option<&mut S>,
    ns: &Namespace,
    state: ModalState,
) {
    if let Some(bg) = background {
        bg.apply_state_class(ns, state);
    }
    if let Some(ov) = overlay {
        ov.apply_state_class(ns, state);
    }
    inst.wrapper.apply_state_class(ns, state);
    inst.content.apply_state_class(ns, state);
    inst.state = state;
}

/// Owner of all modal instances of one page/session.
pub struct ModalManager<H: Host> {
    host: H,
    config: VeilConfig,
    registry: Registry<ModalInstance<H::Surface>>,
    background: Option<H::Surface>,
    overlay: Option<H::Surface>,
    focused: Option<ModalHandle>,
    lock: ScreenLock,
    saved_scroll: Option<f64>,
    events: LifecycleEvents,
}

impl<H: Host> fmt::Debug for ModalManager<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModalManager")
            .field("namespace", &self.config.namespace.as_str())
            .field("registry", &self.registry)
            .field("focused", &self.focused)
            .field("locked", &self.lock.is_locked())
            .field("saved_scroll", &self.saved_scroll)
            .finish_non_exhaustive()
    }
}

impl<H: Host> ModalManager<H> {
    pub fn new(host: H, config: VeilConfig) -> Self {
        Self {
            host,
            config,
            registry: Registry::new(),
            background: None,
            overlay: None,
            focused: None,
            lock: ScreenLock::default(),
            saved_scroll: None,
            events: LifecycleEvents::new(),
        }
    }

    // --- Accessors ---

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &VeilConfig {
        &self.config
    }

    /// Lifecycle event subscriptions.
    pub fn events(&self) -> &LifecycleEvents {
        &self.events
    }

    /// Current state, or `None` for an unknown handle.
    #[must_use]
    pub fn state(&self, handle: ModalHandle) -> Option<ModalState> {
        self.registry.get(handle).map(|i| i.state)
    }

    #[must_use]
    pub fn options(&self, handle: ModalHandle) -> Option<&ModalOptions> {
        self.registry.get(handle).map(|i| &i.options)
    }

    #[must_use]
    pub fn deep_link(&self, handle: ModalHandle) -> Option<&DeepLinkId> {
        self.registry.get(handle).and_then(|i| i.deep_link.as_ref())
    }

    /// The instance that currently owns escape handling and the screen lock.
    #[must_use]
    pub fn focused(&self) -> Option<ModalHandle> {
        self.focused
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.lock.is_locked()
    }

    /// Scroll position saved by the last hash-tracked open, if not yet restored.
    #[must_use]
    pub fn saved_scroll(&self) -> Option<f64> {
        self.saved_scroll
    }

    #[must_use]
    pub fn live_count(&self) -> usize {
        self.registry.live_count()
    }

    /// Resolve a deep-link id; malformed ids resolve to nothing.
    #[must_use]
    pub fn lookup(&self, id: &str) -> Option<ModalHandle> {
        let id = DeepLinkId::parse(id).ok()?;
        self.registry.lookup(&id)
    }

    /// Live handles in registration order.
    pub fn handles(&self) -> impl Iterator<Item = ModalHandle> + '_ {
        self.registry.iter().map(|(h, _)| h)
    }

    /// Whether the manager still holds the shared overlay surface.
    #[must_use]
    pub fn has_shared_surfaces(&self) -> bool {
        self.overlay.is_some()
    }

    // --- Registration ---

    /// Register a content surface as a modal.
    ///
    /// Creates the shared overlay on first use, wraps `content` in a fresh
    /// wrapper, and opens the modal right away when hash tracking is on and
    /// the location hash already names `deep_link`.
    pub fn register(
        &mut self,
        mut content: H::Surface,
        patch: &ModalOptionsPatch,
        deep_link: Option<&str>,
    ) -> Result<ModalHandle, RegistryError> {
        let options = self.config.defaults.merged(patch);
        let link = deep_link.map(DeepLinkId::parse).transpose()?;
        self.registry.check_link(link.as_ref())?;

        let ns = &self.config.namespace;
        let closed = ns.state_class(ModalState::Closed);
        let mount = options.append_to.as_deref();

        if self.overlay.is_none() {
            let mut overlay = self.host.create_overlay(mount);
            overlay.add_class(&ns.overlay());
            overlay.add_class(&closed);
            overlay.set_visible(false);
            self.overlay = Some(overlay);
        }
        if self.background.is_none() {
            self.background = self.host.find_background(&ns.background());
            if let Some(bg) = self.background.as_mut() {
                bg.add_class(&closed);
            }
        }

        content.add_class(ns.as_str());
        content.add_class(&ns.initialized());
        content.add_modifier(&options.modifier);
        content.add_class(&closed);
        content.make_focusable();

        let mut wrapper = self.host.create_wrapper(mount, &mut content);
        wrapper.add_class(&ns.wrapper());
        wrapper.add_modifier(&options.modifier);
        wrapper.add_class(&closed);
        wrapper.set_visible(false);

        let auto_open = options.hash_tracking
            && link
                .as_ref()
                .is_some_and(|l| fragment_id(&self.host.location_hash()) == l.as_str());

        let instance = ModalInstance::new(options, link.clone(), wrapper, content);
        let handle = self.registry.insert(instance, link)?;
        tracing::debug!(modal = %handle, auto_open, "modal registered");

        if auto_open {
            self.open(handle);
        }
        Ok(handle)
    }

    /// Register with options given in the declarative `key: value` form.
    pub fn register_with_attribute(
        &mut self,
        content: H::Surface,
        options_attr: &str,
        deep_link: Option<&str>,
    ) -> Result<ModalHandle, RegistryError> {
        let patch = ModalOptionsPatch::parse_attribute(options_attr)?;
        self.register(content, &patch, deep_link)
    }

    // --- Lifecycle ---

    /// Open a closed modal. Ignored in any other state.
    pub fn open(&mut self, handle: ModalHandle) {
        let Some(inst) = self.registry.get(handle) else {
            tracing::debug!(modal = %handle, "open ignored: unknown modal");
            return;
        };
        if inst.state != ModalState::Closed {
            tracing::debug!(modal = %handle, state = %inst.state, "open ignored");
            return;
        }

        if let Some(link) = inst.tracked_link() {
            self.saved_scroll = Some(self.host.scroll_top());
            self.host.set_location_hash(link.as_str());
        }

        if let Some(prev) = self.focused
            && prev != handle
        {
            self.halt(prev);
        }

        self.focused = Some(handle);
        self.lock.lock(&mut self.host, &self.config.namespace);

        let Some(inst) = self.registry.get_mut(handle) else {
            return;
        };
        let modifier = &inst.options.modifier;
        if let Some(bg) = self.background.as_mut() {
            bg.add_modifier(modifier);
        }
        if let Some(ov) = self.overlay.as_mut() {
            ov.add_modifier(modifier);
            ov.set_visible(true);
        }
        inst.wrapper.set_visible(true);
        inst.wrapper.scroll_to_top();
        inst.content.focus();

        self.begin_transition(handle, ModalState::Opening, ModalState::Opened, None);
    }

    /// Close an opened modal. Ignored unless the modal is `Opened`.
    pub fn close(&mut self, handle: ModalHandle, reason: Option<Reason>) {
        let Some(inst) = self.registry.get(handle) else {
            tracing::debug!(modal = %handle, "close ignored: unknown modal");
            return;
        };
        if inst.state != ModalState::Opened {
            tracing::debug!(modal = %handle, state = %inst.state, "close ignored");
            return;
        }

        let owns_hash = inst
            .tracked_link()
            .is_some_and(|l| fragment_id(&self.host.location_hash()) == l.as_str());
        if owns_hash {
            self.host.set_location_hash("");
            if let Some(y) = self.saved_scroll.take() {
                self.host.set_scroll_top(y);
            }
        }

        self.begin_transition(handle, ModalState::Closing, ModalState::Closed, reason);
    }

    /// Halt and remove a modal. Safe to call repeatedly and from any state.
    ///
    /// When the last live modal goes, the shared overlay is detached and the
    /// background loses its state classes.
    pub fn destroy(&mut self, handle: ModalHandle) {
        if !self.registry.contains(handle) {
            tracing::debug!(modal = %handle, "destroy ignored: unknown modal");
            return;
        }

        self.halt(handle);
        if let Some(mut inst) = self.registry.remove(handle) {
            inst.wrapper.detach();
        }
        tracing::debug!(modal = %handle, live = self.registry.live_count(), "modal destroyed");

        if self.registry.is_empty() {
            if let Some(mut overlay) = self.overlay.take() {
                overlay.detach();
            }
            if let Some(mut bg) = self.background.take() {
                bg.clear_state_classes(&self.config.namespace);
            }
        }
    }

    /// Force a modal closed: synchronous, no animation wait, no events.
    fn halt(&mut self, handle: ModalHandle) {
        let Some(inst) = self.registry.get_mut(handle) else {
            return;
        };
        if inst.state == ModalState::Closed {
            return;
        }
        let from = inst.state;
        if inst.sync.disarm().is_some() {
            tracing::trace!(modal = %handle, "pending animation wait abandoned");
        }

        self.release_surfaces(handle);
        if let Some(inst) = self.registry.get_mut(handle) {
            apply_state(
                inst,
                self.background.as_mut(),
                self.overlay.as_mut(),
                &self.config.namespace,
                ModalState::Closed,
            );
        }
        tracing::debug!(modal = %handle, from = %from, "modal halted");
    }

    // --- Animation synchronization ---

    fn listening_set(&self) -> SurfaceSet {
        let mut set = SurfaceSet::WRAPPER | SurfaceSet::CONTENT;
        if self.background.is_some() {
            set |= SurfaceSet::BACKGROUND;
        }
        if self.overlay.is_some() {
            set |= SurfaceSet::OVERLAY;
        }
        set
    }

    /// Whether no bound surface of `handle` has a running animation declared.
    fn all_instant(&self, handle: ModalHandle) -> bool {
        if !self.host.animations_supported() {
            return true;
        }
        let Some(inst) = self.registry.get(handle) else {
            return true;
        };
        self.background
            .iter()
            .chain(self.overlay.iter())
            .chain([&inst.wrapper, &inst.content])
            .all(|s| s.animation_timing().is_instant())
    }

    /// Apply `before` now, then apply `after` once animations finish.
    fn begin_transition(
        &mut self,
        handle: ModalHandle,
        before: ModalState,
        after: ModalState,
        reason: Option<Reason>,
    ) {
        let listening = self.listening_set();
        let Some(inst) = self.registry.get_mut(handle) else {
            return;
        };
        let from = inst.state;
        inst.sync.arm(listening, after, reason);
        apply_state(
            inst,
            self.background.as_mut(),
            self.overlay.as_mut(),
            &self.config.namespace,
            before,
        );
        tracing::debug!(modal = %handle, from = %from, to = %before, reason = ?reason, "modal state changed");
        self.events.emit(LifecycleEvent {
            handle,
            kind: lifecycle_kind(before),
            reason,
        });

        if self.all_instant(handle) {
            if let Some(inst) = self.registry.get_mut(handle) {
                inst.sync.disarm();
            }
            self.finish_transition(handle, after, reason);
        }
    }

    fn finish_transition(&mut self, handle: ModalHandle, after: ModalState, reason: Option<Reason>) {
        if after == ModalState::Closed {
            self.release_surfaces(handle);
        }
        let Some(inst) = self.registry.get_mut(handle) else {
            return;
        };
        let from = inst.state;
        apply_state(
            inst,
            self.background.as_mut(),
            self.overlay.as_mut(),
            &self.config.namespace,
            after,
        );
        tracing::debug!(modal = %handle, from = %from, to = %after, reason = ?reason, "modal state changed");
        self.events.emit(LifecycleEvent {
            handle,
            kind: lifecycle_kind(after),
            reason,
        });
    }

    /// Undo the open side effects: modifiers, visibility, lock, focus.
    fn release_surfaces(&mut self, handle: ModalHandle) {
        let Some(inst) = self.registry.get_mut(handle) else {
            return;
        };
        let modifier = &inst.options.modifier;
        if let Some(bg) = self.background.as_mut() {
            bg.remove_modifier(modifier);
        }
        if let Some(ov) = self.overlay.as_mut() {
            ov.remove_modifier(modifier);
            ov.set_visible(false);
        }
        inst.wrapper.set_visible(false);
        self.lock.unlock(&mut self.host, &self.config.namespace);
        if self.focused == Some(handle) {
            self.focused = None;
        }
    }

    /// Feed an animation notification from one of `handle`'s own surfaces.
    pub fn notify_animation(
        &mut self,
        handle: ModalHandle,
        surface: SurfaceKind,
        boundary: AnimationBoundary,
        target: EventTarget,
    ) {
        let Some(inst) = self.registry.get_mut(handle) else {
            return;
        };
        match inst.sync.on_boundary(surface, boundary, target) {
            SyncStep::Ignored => {}
            SyncStep::Unmatched => {
                tracing::warn!(modal = %handle, ?surface, "animation end without matching start");
            }
            SyncStep::Running(n) => {
                tracing::trace!(modal = %handle, ?surface, ?boundary, running = n, "animation counted");
            }
            SyncStep::Completed(pending) => {
                tracing::debug!(
                    modal = %handle,
                    elapsed_ms = pending.elapsed_ms() as u64,
                    "animations finished"
                );
                self.finish_transition(handle, pending.target, pending.reason);
            }
        }
    }

    /// Feed a notification from the shared background or overlay to every
    /// modal waiting on animations.
    pub fn notify_shared_animation(
        &mut self,
        surface: SurfaceKind,
        boundary: AnimationBoundary,
        target: EventTarget,
    ) {
        let waiting: Vec<ModalHandle> = self
            .registry
            .iter()
            .filter(|(_, inst)| inst.sync.is_armed())
            .map(|(h, _)| h)
            .collect();
        for handle in waiting {
            self.notify_animation(handle, surface, boundary, target);
        }
    }

    // --- Glue entry points ---

    /// React to a location-hash change.
    ///
    /// A cleared hash closes the focused modal (if opened and hash-tracked).
    /// A hash naming a hash-tracked modal opens it. A hash that names nothing,
    /// or cannot be an id at all, closes the focused modal only if that modal
    /// is itself correlated with the hash.
    pub fn handle_hash_change(&mut self) {
        let fragment = self.host.location_hash();
        match DeepLinkId::from_fragment(&fragment) {
            Ok(None) => {
                let target = self.focused.filter(|&f| {
                    self.registry.get(f).is_some_and(|i| {
                        i.state == ModalState::Opened && i.options.hash_tracking
                    })
                });
                if let Some(f) = target {
                    self.close(f, None);
                }
            }
            Ok(Some(id)) => {
                let tracked = self
                    .registry
                    .lookup(&id)
                    .filter(|&h| self.registry.get(h).is_some_and(|i| i.options.hash_tracking));
                match tracked {
                    Some(h) => self.open(h),
                    None => self.close_focused_linked_elsewhere(),
                }
            }
            Err(err) => {
                tracing::debug!(%err, fragment = %fragment, "hash does not resolve to a modal");
                self.close_focused_linked_elsewhere();
            }
        }
    }

    fn close_focused_linked_elsewhere(&mut self) {
        let target = self.focused.filter(|&f| {
            self.registry
                .get(f)
                .is_some_and(|i| i.state == ModalState::Opened && i.tracked_link().is_some())
        });
        if let Some(f) = target {
            self.close(f, None);
        }
    }

    /// Escape key: closes the focused modal if it allows it.
    pub fn handle_escape(&mut self) {
        let target = self.focused.filter(|&f| {
            self.registry
                .get(f)
                .is_some_and(|i| i.state == ModalState::Opened && i.options.close_on_escape)
        });
        if let Some(f) = target {
            self.close(f, None);
        }
    }

    /// A click landed on the wrapper itself, outside the content.
    pub fn handle_outside_click(&mut self, handle: ModalHandle) {
        if self
            .registry
            .get(handle)
            .is_some_and(|i| i.options.close_on_outside_click)
        {
            self.close(handle, None);
        }
    }

    /// Route a declarative close/confirm/cancel trigger.
    pub fn dispatch(&mut self, handle: ModalHandle, action: ModalAction) {
        let Some(inst) = self.registry.get(handle) else {
            return;
        };
        let (kind, reason, closes) = match action {
            ModalAction::Close => {
                self.close(handle, None);
                return;
            }
            ModalAction::Confirm => (
                LifecycleKind::Confirmation,
                Reason::Confirmation,
                inst.options.close_on_confirm,
            ),
            ModalAction::Cancel => (
                LifecycleKind::Cancellation,
                Reason::Cancellation,
                inst.options.close_on_cancel,
            ),
        };

        self.events.emit(LifecycleEvent {
            handle,
            kind,
            reason: None,
        });
        if closes {
            self.close(handle, Some(reason));
        }
    }

    /// Open the modal a `…-target` trigger names. Unknown or malformed ids
    /// are ignored.
    pub fn open_target(&mut self, id: &str) {
        match self.lookup(id) {
            Some(handle) => self.open(handle),
            None => tracing::debug!(id, "open target does not name a modal"),
        }
    }
}
