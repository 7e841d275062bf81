//! Viewport Module - Window size, scroll offset and their listeners.
//!
//! The host's stand-in for `window`: the viewport size drives layout width,
//! the scroll offset maps document coordinates to viewport coordinates.
//!
//! # API
//!
//! - `width`, `height`, `scroll_x`, `scroll_y` - Current state
//! - `on_resize(fn)` - Global resize listener
//! - `on_scroll(fn)` - Global scroll listener
//! - `dispatch_resize(w, h)` - Resize the viewport
//! - `dispatch_scroll_to(x, y)` / `scroll_by(dx, dy)` - Scroll the document
//!
//! # Example
//!
//! ```ignore
//! use spark_aside::state::viewport;
//!
//! let cleanup = viewport::on_resize(|size| {
//!     println!("viewport is now {}x{}", size.width, size.height);
//! });
//!
//! viewport::dispatch_resize(120.0, 40.0);
//! cleanup();
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use spark_signals::{signal, Signal};

use crate::engine::arrays::mark_layout_dirty;
use crate::types::{Point, Size};

// =============================================================================
// REACTIVE STATE
// =============================================================================

const DEFAULT_WIDTH: f32 = 80.0;
const DEFAULT_HEIGHT: f32 = 24.0;

thread_local! {
    static WIDTH: Signal<f32> = signal(DEFAULT_WIDTH);
    static HEIGHT: Signal<f32> = signal(DEFAULT_HEIGHT);
    static SCROLL_X: Signal<f32> = signal(0.0);
    static SCROLL_Y: Signal<f32> = signal(0.0);
}

/// Current viewport width.
pub fn width() -> f32 {
    WIDTH.with(|s| s.get())
}

/// Current viewport height.
pub fn height() -> f32 {
    HEIGHT.with(|s| s.get())
}

pub fn size() -> Size {
    Size::new(width(), height())
}

/// Horizontal document scroll offset.
pub fn scroll_x() -> f32 {
    SCROLL_X.with(|s| s.get())
}

/// Vertical document scroll offset.
pub fn scroll_y() -> f32 {
    SCROLL_Y.with(|s| s.get())
}

pub fn scroll() -> Point {
    Point::new(scroll_x(), scroll_y())
}

// =============================================================================
// HANDLER REGISTRY
// =============================================================================

/// Resize listener; receives the new viewport size.
pub type ResizeHandler = Rc<dyn Fn(Size)>;

/// Scroll listener; receives the new scroll offset.
pub type ScrollHandler = Rc<dyn Fn(Point)>;

struct HandlerRegistry {
    resize_handlers: Vec<(usize, ResizeHandler)>,
    scroll_handlers: Vec<(usize, ScrollHandler)>,
    next_id: usize,
}

impl HandlerRegistry {
    fn new() -> Self {
        Self {
            resize_handlers: Vec::new(),
            scroll_handlers: Vec::new(),
            next_id: 0,
        }
    }

    fn next_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

thread_local! {
    static REGISTRY: RefCell<HandlerRegistry> = RefCell::new(HandlerRegistry::new());
}

// =============================================================================
// PUBLIC API - REGISTRATION
// =============================================================================

/// Register a global resize listener. Returns cleanup function.
pub fn on_resize<F>(handler: F) -> impl FnOnce()
where
    F: Fn(Size) + 'static,
{
    let id = REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        let id = reg.next_id();
        reg.resize_handlers.push((id, Rc::new(handler)));
        id
    });

    move || {
        REGISTRY.with(|reg| {
            reg.borrow_mut().resize_handlers.retain(|(handler_id, _)| *handler_id != id);
        });
    }
}

/// Register a global scroll listener. Returns cleanup function.
pub fn on_scroll<F>(handler: F) -> impl FnOnce()
where
    F: Fn(Point) + 'static,
{
    let id = REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        let id = reg.next_id();
        reg.scroll_handlers.push((id, Rc::new(handler)));
        id
    });

    move || {
        REGISTRY.with(|reg| {
            reg.borrow_mut().scroll_handlers.retain(|(handler_id, _)| *handler_id != id);
        });
    }
}

/// Number of registered resize listeners.
pub fn resize_listener_count() -> usize {
    REGISTRY.with(|reg| reg.borrow().resize_handlers.len())
}

/// Number of registered scroll listeners.
pub fn scroll_listener_count() -> usize {
    REGISTRY.with(|reg| reg.borrow().scroll_handlers.len())
}

// =============================================================================
// DISPATCH
// =============================================================================

/// Resize the viewport and notify resize listeners.
///
/// Listeners run in registration order against a snapshot of the registry; a
/// listener removed by an earlier one is skipped. Pending resize observations
/// are flushed afterwards.
pub fn dispatch_resize(width: f32, height: f32) {
    WIDTH.with(|s| s.set(width.max(0.0)));
    HEIGHT.with(|s| s.set(height.max(0.0)));
    mark_layout_dirty();

    let new_size = size();
    let snapshot: Vec<(usize, ResizeHandler)> =
        REGISTRY.with(|reg| reg.borrow().resize_handlers.clone());
    for (id, handler) in snapshot {
        let live = REGISTRY.with(|reg| reg.borrow().resize_handlers.iter().any(|(h, _)| *h == id));
        if live {
            handler(new_size);
        }
    }

    crate::pipeline::flush();
}

/// Scroll the document to an offset (clamped at zero) and notify scroll
/// listeners.
///
/// The event fires even if the offset is unchanged, the way a programmatic
/// scroll event would.
pub fn dispatch_scroll_to(x: f32, y: f32) {
    SCROLL_X.with(|s| s.set(x.max(0.0)));
    SCROLL_Y.with(|s| s.set(y.max(0.0)));

    let offset = scroll();
    let snapshot: Vec<(usize, ScrollHandler)> =
        REGISTRY.with(|reg| reg.borrow().scroll_handlers.clone());
    for (id, handler) in snapshot {
        let live = REGISTRY.with(|reg| reg.borrow().scroll_handlers.iter().any(|(h, _)| *h == id));
        if live {
            handler(offset);
        }
    }

    crate::pipeline::flush();
}

/// Scroll by a delta, clamped to the document extent.
///
/// Returns false (and fires nothing) when the offset would not change.
pub fn scroll_by(dx: f32, dy: f32) -> bool {
    let doc = crate::layout::document_size();
    let max_x = (doc.width - width()).max(0.0);
    let max_y = (doc.height - height()).max(0.0);

    let x = (scroll_x() + dx).clamp(0.0, max_x);
    let y = (scroll_y() + dy).clamp(0.0, max_y);
    if x == scroll_x() && y == scroll_y() {
        return false;
    }

    dispatch_scroll_to(x, y);
    true
}

// =============================================================================
// CLEANUP
// =============================================================================

/// Reset viewport state and drop all listeners (for testing).
pub fn reset_viewport_state() {
    REGISTRY.with(|reg| *reg.borrow_mut() = HandlerRegistry::new());
    WIDTH.with(|s| s.set(DEFAULT_WIDTH));
    HEIGHT.with(|s| s.set(DEFAULT_HEIGHT));
    SCROLL_X.with(|s| s.set(0.0));
    SCROLL_Y.with(|s| s.set(0.0));
    mark_layout_dirty();
}

// =============================================================================
// TESTS
// =============================================================================
