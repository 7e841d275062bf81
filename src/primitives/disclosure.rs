//! Disclosure - A trigger that reveals supplementary content beside or
//! below the text it annotates.
//!
//! # Modes
//!
//! ```text
//! Closed ──activate──► OpenInline     (not enough room beside the content region)
//!        ──activate──► OpenFloating   (room for a side panel)
//! Open*  ──activate / outside pointer-down──► Closed
//! OpenFloating ──scroll──► Closed
//! ```
//!
//! The rendered mode is always derived from `(is_open, can_float)`. A resize
//! that flips `can_float` while open moves the content between the two modes
//! rather than closing it.
//!
//! # Subscriptions
//!
//! | Subscription           | Held while       |
//! |------------------------|------------------|
//! | space watch (resize)   | mounted          |
//! | outside pointer-down   | open, any mode   |
//! | scroll dismiss         | `OpenFloating`   |
//! | position tracking      | `OpenFloating`   |
//! | portal mount           | `OpenFloating`   |
//!
//! Each one is a [`Subscription`] guard, acquired on entering the mode that
//! needs it and released on every way out, including unmount.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use spark_signals::{signal, Signal};

use crate::config::{self, DisclosureConfig};
use crate::engine::{self, is_allocated, on_destroy, ElementSpec};
use crate::layout;
use crate::pipeline::portal::{self, PortalKey};
use crate::state::{pointer, viewport};
use crate::types::{Dimension, ElementStyle, Point, Rect, Role};

use super::types::{DisclosureContent, DisclosureProps, Subscription};

// =============================================================================
// State
// =============================================================================

/// Rendered mode of a disclosure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisclosureMode {
    Closed,
    OpenInline,
    OpenFloating,
}

impl DisclosureMode {
    pub fn from_flags(is_open: bool, can_float: bool) -> Self {
        match (is_open, can_float) {
            (false, _) => Self::Closed,
            (true, false) => Self::OpenInline,
            (true, true) => Self::OpenFloating,
        }
    }
}

/// Snapshot of a disclosure's state.
///
/// `position` is `Some` exactly when the mode is `OpenFloating`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisclosureState {
    pub is_open: bool,
    pub can_float: bool,
    pub position: Option<Point>,
}

impl DisclosureState {
    pub fn mode(&self) -> DisclosureMode {
        DisclosureMode::from_flags(self.is_open, self.can_float)
    }
}

// =============================================================================
// Pure helpers
// =============================================================================

/// Whether a side panel fits in `available_space`.
pub fn can_float(available_space: f32, min_margin_space: f32) -> bool {
    available_space >= min_margin_space
}

/// Document position of a floating panel.
///
/// `paragraph` and `container` are viewport-relative boxes; the top edge
/// follows the paragraph when there is one, else the container.
pub fn floating_position(paragraph: Option<Rect>, container: Rect, scroll: Point, gap: f32) -> Point {
    let anchor = paragraph.unwrap_or(container);
    Point::new(container.right() + scroll.x + gap, anchor.top() + scroll.y)
}

/// Horizontal space between the right edge of the trigger's content region
/// and the right edge of the viewport. `None` without a content region.
fn available_space(trigger: usize) -> Option<f32> {
    let region = engine::content_region(trigger)?;
    let rect = layout::bounds(region)?;
    Some(viewport::width() - rect.right())
}

// =============================================================================
// Instance
// =============================================================================

#[derive(Default)]
struct ModeSubscriptions {
    outside_click: Subscription,
    scroll_dismiss: Subscription,
    position_tracking: Subscription,
    floating_mount: Subscription,
}

struct DisclosureInner {
    trigger: usize,
    key: PortalKey,
    content: DisclosureContent,
    config: DisclosureConfig,
    is_open: Signal<bool>,
    can_float: Signal<bool>,
    position: Signal<Option<Point>>,
    rendered: Cell<DisclosureMode>,
    inline_panel: Cell<Option<usize>>,
    subscriptions: RefCell<ModeSubscriptions>,
    space_watch: RefCell<Subscription>,
    alive: Cell<bool>,
}

impl DisclosureInner {
    fn mode(&self) -> DisclosureMode {
        DisclosureMode::from_flags(self.is_open.get(), self.can_float.get())
    }

    fn state(&self) -> DisclosureState {
        DisclosureState {
            is_open: self.is_open.get(),
            can_float: self.can_float.get(),
            position: self.position.get(),
        }
    }

    /// Current content element: the inline panel or the portal root.
    fn content_element(&self) -> Option<usize> {
        self.inline_panel
            .get()
            .or_else(|| portal::get(self.key).map(|m| m.root))
    }

    fn measure_can_float(&self) -> bool {
        available_space(self.trigger)
            .is_some_and(|space| can_float(space, self.config.min_margin_space))
    }

    fn compute_position(&self) -> Option<Point> {
        let region = engine::content_region(self.trigger)?;
        let container = layout::bounds(region)?;
        let paragraph = engine::closest(self.trigger, Role::PARAGRAPH).and_then(layout::bounds);
        Some(floating_position(
            paragraph,
            container,
            viewport::scroll(),
            self.config.panel_gap,
        ))
    }

    fn panel_children(&self, panel: usize) {
        engine::create_element(Some(panel), ElementSpec::text(self.content.quoted_body()));
        if let Some(line) = self.content.attribution_line() {
            engine::create_element(Some(panel), ElementSpec::text(line));
        }
    }

    // -------------------------------------------------------------------------
    // Events
    // -------------------------------------------------------------------------

    fn toggle(self: &Rc<Self>) {
        if !self.alive.get() {
            return;
        }
        self.is_open.set(!self.is_open.get());
        self.reconcile();
    }

    fn close(self: &Rc<Self>) {
        if self.alive.get() && self.is_open.get() {
            self.is_open.set(false);
            self.reconcile();
        }
    }

    fn on_viewport_resize(self: &Rc<Self>) {
        if !self.alive.get() {
            return;
        }
        let can_float = self.measure_can_float();
        if can_float != self.can_float.get() {
            log::debug!("disclosure {}: can_float -> {}", self.trigger, can_float);
            self.can_float.set(can_float);
        }
        if self.is_open.get() {
            self.reconcile();
        }
    }

    fn on_outside_pointer_down(self: &Rc<Self>, event: &pointer::PointerEvent) {
        let inside = event.target.is_some_and(|target| {
            engine::contains(self.trigger, target)
                || self
                    .content_element()
                    .is_some_and(|content| engine::contains(content, target))
        });
        if !inside {
            self.close();
        }
    }

    fn track_position(&self) {
        if self.mode() != DisclosureMode::OpenFloating {
            return;
        }
        if let Some(position) = self.compute_position() {
            portal::set_position(self.key, position);
            self.position.set(Some(position));
        }
    }

    // -------------------------------------------------------------------------
    // Reconciliation
    // -------------------------------------------------------------------------

    /// Bring rendered content and subscriptions in line with the mode.
    fn reconcile(self: &Rc<Self>) {
        let mode = self.mode();

        match mode {
            DisclosureMode::Closed => {
                let mut subs = self.subscriptions.borrow_mut();
                subs.outside_click.release();
                subs.scroll_dismiss.release();
                subs.position_tracking.release();
                drop(subs);
                self.remove_inline_panel();
                self.remove_floating_panel();
                self.position.set(None);
            }
            DisclosureMode::OpenInline => {
                self.acquire_outside_click();
                let mut subs = self.subscriptions.borrow_mut();
                subs.scroll_dismiss.release();
                subs.position_tracking.release();
                drop(subs);
                self.remove_floating_panel();
                self.position.set(None);
                if self.inline_panel.get().is_none() {
                    self.mount_inline_panel();
                }
            }
            DisclosureMode::OpenFloating => {
                self.acquire_outside_click();
                self.acquire_floating_listeners();
                self.remove_inline_panel();
                if portal::get(self.key).is_none() {
                    self.mount_floating_panel();
                }
            }
        }

        let previous = self.rendered.replace(mode);
        if previous != mode {
            log::debug!("disclosure {}: {:?} -> {:?}", self.trigger, previous, mode);
        }
    }

    fn acquire_outside_click(self: &Rc<Self>) {
        if self.subscriptions.borrow().outside_click.is_active() {
            return;
        }
        let weak = Rc::downgrade(self);
        let cleanup = pointer::on_pointer_down_capture(move |event| {
            if let Some(inner) = weak.upgrade() {
                inner.on_outside_pointer_down(event);
            }
        });
        self.subscriptions.borrow_mut().outside_click = Subscription::new(cleanup);
    }

    fn acquire_floating_listeners(self: &Rc<Self>) {
        if !self.subscriptions.borrow().scroll_dismiss.is_active() {
            let weak = Rc::downgrade(self);
            let cleanup = viewport::on_scroll(move |_| {
                if let Some(inner) = weak.upgrade() {
                    inner.close();
                }
            });
            self.subscriptions.borrow_mut().scroll_dismiss = Subscription::new(cleanup);
        }

        if !self.subscriptions.borrow().position_tracking.is_active() {
            let weak = Rc::downgrade(self);
            let cleanup = viewport::on_resize(move |_| {
                if let Some(inner) = weak.upgrade() {
                    inner.track_position();
                }
            });
            self.subscriptions.borrow_mut().position_tracking = Subscription::new(cleanup);
        }
    }

    fn mount_inline_panel(&self) {
        let panel = engine::create_element_after(
            self.trigger,
            ElementSpec::new(Role::PANEL).with_style(ElementStyle {
                margin_block: 1.0,
                ..Default::default()
            }),
        );
        self.panel_children(panel);
        self.inline_panel.set(Some(panel));
    }

    fn remove_inline_panel(&self) {
        if let Some(panel) = self.inline_panel.take() {
            if is_allocated(panel) {
                engine::destroy_element(panel);
            }
        }
    }

    fn mount_floating_panel(&self) {
        let Some(position) = self.compute_position() else {
            // No region to anchor to; can_float should have been false
            self.position.set(None);
            return;
        };
        // A stale guard must go before the new root can reuse its index
        self.remove_floating_panel();

        let root = engine::create_element(
            None,
            ElementSpec::new(Role::PANEL).with_style(ElementStyle {
                width: Dimension::Length(self.config.panel_width),
                padding: 1.0,
                ..Default::default()
            }),
        );
        self.panel_children(root);

        let mount = Subscription::new(portal::mount(self.key, root, self.trigger, position));
        self.subscriptions.borrow_mut().floating_mount = mount;
        self.position.set(Some(position));
    }

    /// Release the portal mount, destroying its root. The guard is moved out
    /// first so no borrow is held while elements are released.
    fn remove_floating_panel(&self) {
        let mount = std::mem::take(&mut self.subscriptions.borrow_mut().floating_mount);
        drop(mount);
    }

    /// Release everything. Safe to call more than once.
    fn teardown(&self) {
        self.alive.set(false);
        self.space_watch.borrow_mut().release();
        {
            let mut subs = self.subscriptions.borrow_mut();
            subs.outside_click.release();
            subs.scroll_dismiss.release();
            subs.position_tracking.release();
        }
        self.remove_inline_panel();
        self.remove_floating_panel();
        self.is_open.set(false);
        self.position.set(None);
        self.rendered.set(DisclosureMode::Closed);
    }
}

// =============================================================================
// Handle
// =============================================================================

/// A mounted disclosure.
///
/// The only way to open or close it is through its trigger; the handle
/// exposes state read-only. Dropping the handle unmounts it.
pub struct Disclosure {
    inner: Rc<DisclosureInner>,
    click: Subscription,
}

/// Mount a disclosure.
pub fn disclosure(props: DisclosureProps) -> Disclosure {
    let config = props.config.unwrap_or_else(|| config::current().disclosure);

    let trigger = engine::create_element(
        props.parent,
        ElementSpec::text(props.trigger).with_role(Role::BUTTON),
    );

    let inner = Rc::new(DisclosureInner {
        trigger,
        key: PortalKey::new(),
        content: props.content,
        config,
        is_open: signal(false),
        can_float: signal(false),
        position: signal(None),
        rendered: Cell::new(DisclosureMode::Closed),
        inline_panel: Cell::new(None),
        subscriptions: RefCell::new(ModeSubscriptions::default()),
        space_watch: RefCell::new(Subscription::none()),
        alive: Cell::new(true),
    });

    let weak: Weak<DisclosureInner> = Rc::downgrade(&inner);
    let click = Subscription::new(pointer::on_element(
        trigger,
        pointer::PointerHandlers {
            on_click: Some(Rc::new(move |_: &pointer::PointerEvent| {
                if let Some(inner) = weak.upgrade() {
                    inner.toggle();
                }
            })),
            ..Default::default()
        },
    ));

    let weak: Weak<DisclosureInner> = Rc::downgrade(&inner);
    *inner.space_watch.borrow_mut() = Subscription::new(viewport::on_resize(move |_| {
        if let Some(inner) = weak.upgrade() {
            inner.on_viewport_resize();
        }
    }));

    let weak: Weak<DisclosureInner> = Rc::downgrade(&inner);
    on_destroy(trigger, move || {
        if let Some(inner) = weak.upgrade() {
            inner.teardown();
        }
    });

    inner.can_float.set(inner.measure_can_float());

    Disclosure { inner, click }
}

impl Disclosure {
    /// The trigger element.
    pub fn trigger(&self) -> usize {
        self.inner.trigger
    }

    /// Key of the floating render target.
    pub fn portal_key(&self) -> PortalKey {
        self.inner.key
    }

    pub fn state(&self) -> DisclosureState {
        self.inner.state()
    }

    pub fn mode(&self) -> DisclosureMode {
        self.inner.mode()
    }

    pub fn is_open(&self) -> bool {
        self.inner.is_open.get()
    }

    pub fn can_float(&self) -> bool {
        self.inner.can_float.get()
    }

    pub fn position(&self) -> Option<Point> {
        self.inner.position.get()
    }

    /// The rendered content element, if open.
    pub fn content_element(&self) -> Option<usize> {
        self.inner.content_element()
    }

    pub fn content(&self) -> &DisclosureContent {
        &self.inner.content
    }

    pub fn config(&self) -> DisclosureConfig {
        self.inner.config
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.alive.get()
    }

    /// Release every subscription and destroy the trigger and content.
    pub fn unmount(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        self.click.release();
        if self.inner.alive.get() {
            self.inner.teardown();
            if is_allocated(self.inner.trigger) {
                engine::destroy_element(self.inner.trigger);
            }
        }
    }
}

impl Drop for Disclosure {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl std::fmt::Debug for Disclosure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Disclosure")
            .field("trigger", &self.inner.trigger)
            .field("state", &self.state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{create_element, reset_registry};
    use crate::state::pointer::PointerEvent;
    use crate::state::resize_observer;

    fn setup() {
        reset_registry();
        config::reset_config();
        viewport::reset_viewport_state();
        pointer::reset_pointer_state();
        resize_observer::reset_resize_observers();
        portal::reset_portals();
    }

    /// A page whose article is 100 wide, inside a viewport of `viewport_width`.
    fn page(viewport_width: f32) -> (usize, usize, usize) {
        viewport::dispatch_resize(viewport_width, 30.0);
        let main = create_element(None, ElementSpec::new(Role::MAIN));
        let article = create_element(
            Some(main),
            ElementSpec::new(Role::ARTICLE).with_style(ElementStyle {
                width: Dimension::Length(100.0),
                ..Default::default()
            }),
        );
        create_element(Some(article), ElementSpec::text("Opening line."));
        let paragraph = create_element(Some(article), ElementSpec::new(Role::PARAGRAPH));
        create_element(Some(paragraph), ElementSpec::text("Some words."));
        (main, article, paragraph)
    }

    fn quote() -> DisclosureContent {
        DisclosureContent::new("Fast and clear").with_attribution("A Client")
    }

    fn mount(paragraph: usize) -> Disclosure {
        disclosure(DisclosureProps {
            parent: Some(paragraph),
            trigger: "[1]".into(),
            content: quote(),
            config: None,
        })
    }

    fn click(index: usize) {
        pointer::dispatch(PointerEvent::down(0.0, 0.0).on(index));
        pointer::dispatch(PointerEvent::up(0.0, 0.0).on(index));
    }

    #[test]
    fn test_pure_helpers() {
        assert!(can_float(500.0, 420.0));
        assert!(can_float(420.0, 420.0));
        assert!(!can_float(419.9, 420.0));

        let container = Rect::new(10.0, 5.0, 100.0, 50.0);
        let paragraph = Rect::new(10.0, 20.0, 100.0, 3.0);
        let pos = floating_position(Some(paragraph), container, Point::new(0.0, 7.0), 24.0);
        assert_eq!(pos, Point::new(134.0, 27.0));

        let pos = floating_position(None, container, Point::ZERO, 24.0);
        assert_eq!(pos, Point::new(134.0, 5.0));
    }

    #[test]
    fn test_mode_from_flags() {
        assert_eq!(DisclosureMode::from_flags(false, true), DisclosureMode::Closed);
        assert_eq!(DisclosureMode::from_flags(true, false), DisclosureMode::OpenInline);
        assert_eq!(DisclosureMode::from_flags(true, true), DisclosureMode::OpenFloating);
    }

    #[test]
    fn test_opens_inline_without_room() {
        setup();
        let (_, _, paragraph) = page(300.0);
        let d = mount(paragraph);
        assert!(!d.can_float());

        click(d.trigger());
        assert_eq!(d.mode(), DisclosureMode::OpenInline);
        assert_eq!(d.position(), None);

        let panel = d.content_element().unwrap();
        let children = engine::children(paragraph);
        let trigger_at = children.iter().position(|&c| c == d.trigger()).unwrap();
        assert_eq!(children[trigger_at + 1], panel);
        assert!(portal::mounted_keys().is_empty());
    }

    #[test]
    fn test_opens_floating_with_room() {
        setup();
        let (_, article, paragraph) = page(600.0);
        let d = mount(paragraph);
        assert!(d.can_float());

        click(d.trigger());
        assert_eq!(d.mode(), DisclosureMode::OpenFloating);

        let region = layout::bounds(article).unwrap();
        let para = layout::bounds(paragraph).unwrap();
        let position = d.position().unwrap();
        assert_eq!(position.x, region.right() + 24.0);
        assert_eq!(position.y, para.top());

        let root = d.content_element().unwrap();
        assert_eq!(portal::get(d.portal_key()).map(|m| m.root), Some(root));
        assert_eq!(layout::document_bounds(root).map(|r| r.width), Some(380.0));
        assert_eq!(engine::parent(root), None);
    }

    #[test]
    fn test_toggle_closes_and_releases() {
        setup();
        let (_, _, paragraph) = page(600.0);
        let d = mount(paragraph);

        click(d.trigger());
        assert_eq!(pointer::capture_listener_count(), 1);
        assert_eq!(viewport::scroll_listener_count(), 1);
        assert_eq!(viewport::resize_listener_count(), 2);

        click(d.trigger());
        assert_eq!(d.mode(), DisclosureMode::Closed);
        assert_eq!(d.content_element(), None);
        assert_eq!(pointer::capture_listener_count(), 0);
        assert_eq!(viewport::scroll_listener_count(), 0);
        assert_eq!(viewport::resize_listener_count(), 1);
        assert!(portal::mounted_keys().is_empty());
    }

    #[test]
    fn test_scroll_closes_floating() {
        setup();
        let (_, _, paragraph) = page(600.0);
        let d = mount(paragraph);
        click(d.trigger());

        viewport::dispatch_scroll_to(0.0, 1.0);
        assert_eq!(d.mode(), DisclosureMode::Closed);
        assert_eq!(viewport::scroll_listener_count(), 0);
    }

    #[test]
    fn test_scroll_keeps_inline_open() {
        setup();
        let (_, _, paragraph) = page(300.0);
        let d = mount(paragraph);
        click(d.trigger());

        viewport::dispatch_scroll_to(0.0, 1.0);
        assert_eq!(d.mode(), DisclosureMode::OpenInline);
        assert_eq!(viewport::scroll_listener_count(), 0);
    }

    #[test]
    fn test_outside_pointer_down_closes() {
        setup();
        let (main, _, paragraph) = page(300.0);
        let d = mount(paragraph);
        click(d.trigger());

        // Inside the content: stays open
        let panel = d.content_element().unwrap();
        let body = engine::children(panel)[0];
        pointer::dispatch(PointerEvent::down(0.0, 0.0).on(body));
        assert!(d.is_open());

        pointer::dispatch(PointerEvent::down(0.0, 0.0).on(main));
        assert_eq!(d.mode(), DisclosureMode::Closed);
        assert_eq!(pointer::capture_listener_count(), 0);
    }

    #[test]
    fn test_resize_moves_open_panel_between_modes() {
        setup();
        let (_, _, paragraph) = page(600.0);
        let d = mount(paragraph);
        click(d.trigger());
        assert_eq!(d.mode(), DisclosureMode::OpenFloating);

        viewport::dispatch_resize(300.0, 30.0);
        assert!(!d.can_float());
        assert_eq!(d.mode(), DisclosureMode::OpenInline);
        assert_eq!(d.position(), None);
        assert!(portal::mounted_keys().is_empty());
        assert_eq!(viewport::scroll_listener_count(), 0);

        viewport::dispatch_resize(700.0, 30.0);
        assert_eq!(d.mode(), DisclosureMode::OpenFloating);
        assert!(d.position().is_some());
    }

    #[test]
    fn test_missing_content_region_stays_inline() {
        setup();
        viewport::dispatch_resize(1000.0, 30.0);
        let block = create_element(
            None,
            ElementSpec::new(Role::BLOCK).with_style(ElementStyle::sized(10.0, 5.0)),
        );
        let d = disclosure(DisclosureProps {
            parent: Some(block),
            trigger: "?".into(),
            content: quote(),
            config: None,
        });
        assert!(!d.can_float());
        pointer::activate(d.trigger());
        assert_eq!(d.mode(), DisclosureMode::OpenInline);
    }

    #[test]
    fn test_config_override() {
        setup();
        let (_, _, paragraph) = page(300.0);
        let d = disclosure(DisclosureProps {
            parent: Some(paragraph),
            trigger: "[2]".into(),
            content: quote(),
            config: Some(DisclosureConfig {
                min_margin_space: 150.0,
                panel_gap: 2.0,
                panel_width: 40.0,
            }),
        });
        assert!(d.can_float());
        pointer::activate(d.trigger());
        assert_eq!(d.position().map(|p| p.x), Some(102.0));
    }

    #[test]
    fn test_unmount_while_floating_releases_everything() {
        setup();
        let (_, _, paragraph) = page(600.0);
        let d = mount(paragraph);
        let trigger = d.trigger();
        click(trigger);

        d.unmount();
        assert!(!is_allocated(trigger));
        assert!(portal::mounted_keys().is_empty());
        assert_eq!(pointer::capture_listener_count(), 0);
        assert_eq!(viewport::scroll_listener_count(), 0);
        assert_eq!(viewport::resize_listener_count(), 0);
    }

    #[test]
    fn test_floating_mount_released_with_mode() {
        setup();
        let (_, _, paragraph) = page(600.0);
        let d = mount(paragraph);

        click(d.trigger());
        let first = d.content_element().unwrap();
        click(d.trigger());
        assert!(!is_allocated(first));
        assert!(portal::mounted_keys().is_empty());

        // Mount dropped behind the disclosure's back; the next resize remounts,
        // possibly reusing the old root's index
        click(d.trigger());
        let second = d.content_element().unwrap();
        portal::unmount(d.portal_key());
        assert!(!is_allocated(second));

        viewport::dispatch_resize(600.0, 31.0);
        let third = d.content_element().unwrap();
        assert!(is_allocated(third));
        assert_eq!(portal::get(d.portal_key()).map(|m| m.root), Some(third));
        assert_eq!(d.mode(), DisclosureMode::OpenFloating);

        d.unmount();
        assert!(!is_allocated(third));
        assert!(portal::mounted_keys().is_empty());
    }

    #[test]
    fn test_destroying_ancestor_tears_down() {
        setup();
        let (main, _, paragraph) = page(300.0);
        let d = mount(paragraph);
        click(d.trigger());

        engine::destroy_element(main);
        assert!(!d.is_mounted());
        assert!(!d.is_open());
        assert_eq!(pointer::capture_listener_count(), 0);
        assert_eq!(viewport::resize_listener_count(), 0);
    }
}
