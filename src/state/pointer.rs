//! Pointer Module - Pointer input, capture-phase listeners and click.
//!
//! # Dispatch order
//!
//! 1. Target resolution via `layout::hit_test` (unless the event carries one)
//! 2. Capture listeners (`on_pointer_down_capture`), before anything else
//! 3. Element `on_pointer_down` on the target
//! 4. On release over the pressed element, `on_click` bubbling up the parents
//!
//! # Example
//!
//! ```ignore
//! use spark_aside::state::pointer::{self, PointerHandlers};
//! use std::rc::Rc;
//!
//! let cleanup = pointer::on_element(button, PointerHandlers {
//!     on_click: Some(Rc::new(|_| println!("clicked"))),
//!     ..Default::default()
//! });
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use spark_signals::{signal, Signal};

use crate::engine::arrays::core;
use crate::layout;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerAction {
    Down,
    Up,
}

/// A pointer event in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub action: PointerAction,
    pub x: f32,
    pub y: f32,
    /// Element under the pointer. Filled by dispatch when `None`.
    pub target: Option<usize>,
}

impl PointerEvent {
    pub fn down(x: f32, y: f32) -> Self {
        Self { action: PointerAction::Down, x, y, target: None }
    }

    pub fn up(x: f32, y: f32) -> Self {
        Self { action: PointerAction::Up, x, y, target: None }
    }

    /// Same event, aimed at a known element.
    pub fn on(mut self, target: usize) -> Self {
        self.target = Some(target);
        self
    }
}

pub type PointerHandler = Rc<dyn Fn(&PointerEvent)>;

/// Element-level handlers.
#[derive(Default, Clone)]
pub struct PointerHandlers {
    pub on_pointer_down: Option<PointerHandler>,
    pub on_click: Option<PointerHandler>,
}

// =============================================================================
// STATE
// =============================================================================

thread_local! {
    static PRESSED: Signal<Option<usize>> = signal(None);
}

/// Element that received the last unreleased pointer-down.
pub fn pressed_element() -> Option<usize> {
    PRESSED.with(|s| s.get())
}

// =============================================================================
// HANDLER REGISTRY
// =============================================================================

struct HandlerRegistry {
    element_handlers: HashMap<usize, (usize, PointerHandlers)>,
    capture_down_handlers: Vec<(usize, PointerHandler)>,
    next_id: usize,
}

impl HandlerRegistry {
    fn new() -> Self {
        Self {
            element_handlers: HashMap::new(),
            capture_down_handlers: Vec::new(),
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

/// Register handlers for an element, replacing any previous set.
/// Returns cleanup function.
pub fn on_element(index: usize, handlers: PointerHandlers) -> impl FnOnce() {
    let id = REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        let id = reg.next_id();
        reg.element_handlers.insert(index, (id, handlers));
        id
    });

    move || {
        REGISTRY.with(|reg| {
            let mut reg = reg.borrow_mut();
            // A later registration on the same index is not ours to remove
            if reg.element_handlers.get(&index).is_some_and(|(h, _)| *h == id) {
                reg.element_handlers.remove(&index);
            }
        });
    }
}

/// Register a capture-phase pointer-down listener. Returns cleanup function.
pub fn on_pointer_down_capture<F>(handler: F) -> impl FnOnce()
where
    F: Fn(&PointerEvent) + 'static,
{
    let id = REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        let id = reg.next_id();
        reg.capture_down_handlers.push((id, Rc::new(handler)));
        id
    });

    move || {
        REGISTRY.with(|reg| {
            reg.borrow_mut().capture_down_handlers.retain(|(handler_id, _)| *handler_id != id);
        });
    }
}

pub fn capture_listener_count() -> usize {
    REGISTRY.with(|reg| reg.borrow().capture_down_handlers.len())
}

pub fn has_element_handlers(index: usize) -> bool {
    REGISTRY.with(|reg| reg.borrow().element_handlers.contains_key(&index))
}

// =============================================================================
// DISPATCH
// =============================================================================

/// Dispatch a pointer event. Returns true if a click handler fired.
pub fn dispatch(mut event: PointerEvent) -> bool {
    if event.target.is_none() {
        event.target = layout::hit_test(event.x, event.y);
    }

    let clicked = match event.action {
        PointerAction::Down => {
            dispatch_down(&event);
            false
        }
        PointerAction::Up => dispatch_up(&event),
    };

    crate::pipeline::flush();
    clicked
}

fn dispatch_down(event: &PointerEvent) {
    PRESSED.with(|s| s.set(event.target));

    let snapshot: Vec<(usize, PointerHandler)> =
        REGISTRY.with(|reg| reg.borrow().capture_down_handlers.clone());
    for (id, handler) in snapshot {
        let live = REGISTRY.with(|reg| {
            reg.borrow().capture_down_handlers.iter().any(|(h, _)| *h == id)
        });
        if live {
            handler(event);
        }
    }

    // A capture listener may have destroyed the target
    let Some(target) = event.target else { return };
    let on_down = REGISTRY.with(|reg| {
        reg.borrow()
            .element_handlers
            .get(&target)
            .and_then(|(_, handlers)| handlers.on_pointer_down.clone())
    });
    if let Some(on_down) = on_down {
        on_down(event);
    }
}

fn dispatch_up(event: &PointerEvent) -> bool {
    let pressed = PRESSED.with(|s| s.get());
    PRESSED.with(|s| s.set(None));

    match (pressed, event.target) {
        (Some(pressed), Some(target)) if pressed == target => bubble_click(target, event),
        _ => false,
    }
}

/// Fire `on_click` on the first element up the parent chain that has one.
fn bubble_click(start: usize, event: &PointerEvent) -> bool {
    let mut current = Some(start);
    while let Some(idx) = current {
        let on_click = REGISTRY.with(|reg| {
            reg.borrow()
                .element_handlers
                .get(&idx)
                .and_then(|(_, handlers)| handlers.on_click.clone())
        });

        if let Some(on_click) = on_click {
            on_click(event);
            return true;
        }

        current = core::get_parent_index(idx);
    }
    false
}

/// Activate an element the way a keyboard press would: fire its click
/// handler directly, with bubbling, without a pointer-down.
pub fn activate(index: usize) -> bool {
    if !crate::engine::is_allocated(index) {
        return false;
    }
    let event = PointerEvent {
        action: PointerAction::Up,
        x: 0.0,
        y: 0.0,
        target: Some(index),
    };
    let clicked = bubble_click(index, &event);
    crate::pipeline::flush();
    clicked
}

// =============================================================================
// CLEANUP
// =============================================================================

/// Drop handlers registered for an element index.
pub fn cleanup_index(index: usize) {
    REGISTRY.with(|reg| {
        reg.borrow_mut().element_handlers.remove(&index);
    });

    if PRESSED.with(|s| s.get()) == Some(index) {
        PRESSED.with(|s| s.set(None));
    }
}

/// Reset pointer state (for testing).
pub fn reset_pointer_state() {
    REGISTRY.with(|reg| *reg.borrow_mut() = HandlerRegistry::new());
    PRESSED.with(|s| s.set(None));
}

// =============================================================================
// TESTS
// =============================================================================
