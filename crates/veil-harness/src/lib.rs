#![forbid(unsafe_code)]

//! In-memory [`Host`] and [`Surface`] doubles for exercising veil without a
//! browser.
//!
//! Surfaces behave like DOM node handles: cloning a [`MemorySurface`] yields
//! another handle to the same node, so a test keeps a clone and inspects it
//! after the original has moved into a `ModalManager`.
//!
//! ```
//! use veil_core::{ModalOptionsPatch, VeilConfig};
//! use veil_harness::{MemoryHost, MemorySurface};
//! use veil_modal::ModalManager;
//!
//! let content = MemorySurface::new("content");
//! let mut modals = ModalManager::new(MemoryHost::new(), VeilConfig::default());
//! let h = modals
//!     .register(content.clone(), &ModalOptionsPatch::default(), None)
//!     .expect("registered");
//! modals.open(h);
//! assert!(content.has_class("remodal-is-opened"));
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use veil_core::{AnimationTiming, Host, Platform, ScrollProbe, Surface};

#[derive(Debug, Default)]
struct SurfaceRecord {
    name: String,
    classes: Vec<String>,
    visible: bool,
    detached: bool,
    focusable: bool,
    focus_count: u32,
    scroll_resets: u32,
    parent: Option<String>,
    timing: AnimationTiming,
}

/// A recording surface; clones share the same node.
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    record: Rc<RefCell<SurfaceRecord>>,
}

impl MemorySurface {
    /// A visible, unanimated surface.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            record: Rc::new(RefCell::new(SurfaceRecord {
                name: name.into(),
                visible: true,
                ..Default::default()
            })),
        }
    }

    #[must_use]
    pub fn with_timing(self, timing: AnimationTiming) -> Self {
        self.set_timing(timing);
        self
    }

    /// Change the animation timing the surface reports from now on.
    pub fn set_timing(&self, timing: AnimationTiming) {
        self.record.borrow_mut().timing = timing;
    }

    #[must_use]
    pub fn name(&self) -> String {
        self.record.borrow().name.clone()
    }

    #[must_use]
    pub fn classes(&self) -> Vec<String> {
        self.record.borrow().classes.clone()
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.record.borrow().classes.iter().any(|c| c == class)
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.record.borrow().visible
    }

    #[must_use]
    pub fn is_detached(&self) -> bool {
        self.record.borrow().detached
    }

    #[must_use]
    pub fn is_focusable(&self) -> bool {
        self.record.borrow().focusable
    }

    #[must_use]
    pub fn focus_count(&self) -> u32 {
        self.record.borrow().focus_count
    }

    #[must_use]
    pub fn scroll_resets(&self) -> u32 {
        self.record.borrow().scroll_resets
    }

    /// Name of the surface this one was moved into, if any.
    #[must_use]
    pub fn parent(&self) -> Option<String> {
        self.record.borrow().parent.clone()
    }

    /// Whether both handles point at the same node.
    #[must_use]
    pub fn same_node(&self, other: &MemorySurface) -> bool {
        Rc::ptr_eq(&self.record, &other.record)
    }
}

impl Surface for MemorySurface {
    fn add_class(&mut self, class: &str) {
        let mut rec = self.record.borrow_mut();
        if !rec.classes.iter().any(|c| c == class) {
            rec.classes.push(class.to_owned());
        }
    }

    fn remove_class(&mut self, class: &str) {
        self.record.borrow_mut().classes.retain(|c| c != class);
    }

    fn has_class(&self, class: &str) -> bool {
        MemorySurface::has_class(self, class)
    }

    fn set_visible(&mut self, visible: bool) {
        self.record.borrow_mut().visible = visible;
    }

    fn animation_timing(&self) -> AnimationTiming {
        self.record.borrow().timing.clone()
    }

    fn scroll_to_top(&mut self) {
        self.record.borrow_mut().scroll_resets += 1;
    }

    fn focus(&mut self) {
        self.record.borrow_mut().focus_count += 1;
    }

    fn make_focusable(&mut self) {
        self.record.borrow_mut().focusable = true;
    }

    fn detach(&mut self) {
        let mut rec = self.record.borrow_mut();
        rec.detached = true;
        rec.visible = false;
    }
}

/// Probe whose widths come from the host's configured scrollbar.
#[derive(Debug)]
pub struct MemoryProbe {
    outer: f64,
    scrollbar: f64,
    overflow: bool,
}

impl ScrollProbe for MemoryProbe {
    fn outer_width(&self) -> f64 {
        self.outer
    }

    fn force_overflow(&mut self) {
        self.overflow = true;
    }

    fn inner_width(&self) -> f64 {
        if self.overflow {
            self.outer - self.scrollbar
        } else {
            self.outer
        }
    }
}

/// One surface the host created on request.
#[derive(Debug, Clone)]
pub struct CreatedSurface {
    pub surface: MemorySurface,
    pub mount: Option<String>,
}

/// Recording page environment.
#[derive(Debug)]
pub struct MemoryHost {
    pub platform: Platform,
    pub animations_supported: bool,
    pub hash: String,
    /// Every value written through `set_location_hash`.
    pub hash_writes: Vec<String>,
    pub scroll_top: f64,
    pub document_overflows: bool,
    pub scrollbar_width: f64,
    pub body_padding_right: f64,
    pub root_classes: Vec<String>,
    /// Background returned by `find_background`, if the page has one.
    pub background: Option<MemorySurface>,
    /// Timing given to overlays and wrappers the host creates.
    pub created_timing: AnimationTiming,
    pub overlays: Vec<CreatedSurface>,
    pub wrappers: Vec<CreatedSurface>,
    pub open_probes: usize,
    pub probes_discarded: usize,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHost {
    /// Desktop page with a 15px scrollbar, a background surface, and no
    /// animations.
    pub fn new() -> Self {
        Self {
            platform: Platform::Desktop,
            animations_supported: true,
            hash: String::new(),
            hash_writes: Vec::new(),
            scroll_top: 0.0,
            document_overflows: true,
            scrollbar_width: 15.0,
            body_padding_right: 0.0,
            root_classes: Vec::new(),
            background: Some(MemorySurface::new("page")),
            created_timing: AnimationTiming::none(),
            overlays: Vec::new(),
            wrappers: Vec::new(),
            open_probes: 0,
            probes_discarded: 0,
        }
    }

    #[must_use]
    pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = hash.into();
        self
    }

    #[must_use]
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    #[must_use]
    pub fn without_background(mut self) -> Self {
        self.background = None;
        self
    }

    #[must_use]
    pub fn with_created_timing(mut self, timing: AnimationTiming) -> Self {
        self.created_timing = timing;
        self
    }

    /// Simulate the user navigating to `hash` (no write is recorded).
    pub fn navigate(&mut self, hash: impl Into<String>) {
        self.hash = hash.into();
    }

    #[must_use]
    pub fn root_has_class(&self, class: &str) -> bool {
        self.root_classes.iter().any(|c| c == class)
    }

    /// The most recently created overlay.
    #[must_use]
    pub fn overlay(&self) -> Option<&MemorySurface> {
        self.overlays.last().map(|c| &c.surface)
    }

    #[must_use]
    pub fn wrapper(&self, index: usize) -> Option<&MemorySurface> {
        self.wrappers.get(index).map(|c| &c.surface)
    }
}

impl Host for MemoryHost {
    type Surface = MemorySurface;
    type Probe = MemoryProbe;

    fn platform(&self) -> Platform {
        self.platform
    }

    fn animations_supported(&self) -> bool {
        self.animations_supported
    }

    fn location_hash(&self) -> String {
        self.hash.clone()
    }

    fn set_location_hash(&mut self, fragment: &str) {
        self.hash = fragment.to_owned();
        self.hash_writes.push(fragment.to_owned());
    }

    fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    fn set_scroll_top(&mut self, y: f64) {
        self.scroll_top = y;
    }

    fn document_overflows(&self) -> bool {
        self.document_overflows
    }

    fn open_probe(&mut self) -> MemoryProbe {
        self.open_probes += 1;
        MemoryProbe {
            outer: 100.0,
            scrollbar: self.scrollbar_width,
            overflow: false,
        }
    }

    fn discard_probe(&mut self, _probe: MemoryProbe) {
        self.open_probes -= 1;
        self.probes_discarded += 1;
    }

    fn body_padding_right(&self) -> f64 {
        self.body_padding_right
    }

    fn set_body_padding_right(&mut self, px: f64) {
        self.body_padding_right = px;
    }

    fn set_root_class(&mut self, class: &str, on: bool) {
        self.root_classes.retain(|c| c != class);
        if on {
            self.root_classes.push(class.to_owned());
        }
    }

    fn find_background(&mut self, class: &str) -> Option<MemorySurface> {
        let mut bg = self.background.clone()?;
        bg.add_class(class);
        Some(bg)
    }

    fn create_overlay(&mut self, mount: Option<&str>) -> MemorySurface {
        let overlay = MemorySurface::new(format!("overlay-{}", self.overlays.len()))
            .with_timing(self.created_timing.clone());
        self.overlays.push(CreatedSurface {
            surface: overlay.clone(),
            mount: mount.map(str::to_owned),
        });
        overlay
    }

    fn create_wrapper(&mut self, mount: Option<&str>, content: &mut MemorySurface) -> MemorySurface {
        let wrapper = MemorySurface::new(format!("wrapper-{}", self.wrappers.len()))
            .with_timing(self.created_timing.clone());
        content.record.borrow_mut().parent = Some(wrapper.name());
        self.wrappers.push(CreatedSurface {
            surface: wrapper.clone(),
            mount: mount.map(str::to_owned),
        });
        wrapper
    }
}

/// Timing of a single `duration_s` animation with no delay.
#[must_use]
pub fn animated(duration_s: f64) -> AnimationTiming {
    AnimationTiming::from_lists(vec![duration_s], vec![0.0], vec![1.0])
}
