//! Input Module - Terminal event conversion and routing.
//!
//! Bridges crossterm's event system with the viewport and pointer modules.
//!
//! # API
//!
//! - `convert_mouse_event` - Convert a crossterm MouseEvent to a host event
//! - `poll_event` - Non-blocking event check with timeout
//! - `read_event` - Blocking event read
//! - `route_event` - Dispatch an event to the host
//! - `enable_mouse` / `disable_mouse` - Control mouse capture
//!
//! # Example
//!
//! ```ignore
//! use spark_aside::state::input::{poll_event, route_event};
//! use std::time::Duration;
//!
//! loop {
//!     if let Ok(Some(event)) = poll_event(Duration::from_millis(16)) {
//!         route_event(event);
//!     }
//! }
//! ```

use std::io::stdout;
use std::time::Duration;

use crossterm::event::{
    poll, read, DisableMouseCapture, EnableMouseCapture, Event as CrosstermEvent,
    KeyEvent as CrosstermKeyEvent, MouseButton as CrosstermMouseButton,
    MouseEvent as CrosstermMouseEvent, MouseEventKind,
};
use crossterm::execute;

use super::pointer::{self, PointerEvent};
use super::viewport;
use crate::config;
use crate::error::Result;

// =============================================================================
// INPUT EVENT ENUM
// =============================================================================

/// Host-level event produced from terminal input.
#[derive(Debug, Clone)]
pub enum InputEvent {
    /// Primary-button press or release.
    Pointer(PointerEvent),
    /// Wheel scroll, in steps (positive is down / right).
    Scroll { dx: i32, dy: i32 },
    /// Terminal resize (new width, height).
    Resize(u16, u16),
    /// Key press, passed through for the application loop.
    Key(CrosstermKeyEvent),
    /// No event or unhandled event type.
    None,
}

// =============================================================================
// MOUSE EVENT CONVERSION
// =============================================================================

/// Convert a crossterm MouseEvent.
///
/// Only the left button produces pointer events; moves, drags and other
/// buttons map to `InputEvent::None`.
pub fn convert_mouse_event(event: CrosstermMouseEvent) -> InputEvent {
    let x = event.column as f32;
    let y = event.row as f32;

    match event.kind {
        MouseEventKind::Down(CrosstermMouseButton::Left) => InputEvent::Pointer(PointerEvent::down(x, y)),
        MouseEventKind::Up(CrosstermMouseButton::Left) => InputEvent::Pointer(PointerEvent::up(x, y)),
        MouseEventKind::ScrollUp => InputEvent::Scroll { dx: 0, dy: -1 },
        MouseEventKind::ScrollDown => InputEvent::Scroll { dx: 0, dy: 1 },
        MouseEventKind::ScrollLeft => InputEvent::Scroll { dx: -1, dy: 0 },
        MouseEventKind::ScrollRight => InputEvent::Scroll { dx: 1, dy: 0 },
        _ => InputEvent::None,
    }
}

/// Convert any crossterm event.
pub fn convert_event(event: CrosstermEvent) -> InputEvent {
    match event {
        CrosstermEvent::Mouse(mouse) => convert_mouse_event(mouse),
        CrosstermEvent::Key(key) => InputEvent::Key(key),
        CrosstermEvent::Resize(w, h) => InputEvent::Resize(w, h),
        _ => InputEvent::None,
    }
}

// =============================================================================
// EVENT POLLING
// =============================================================================

/// Poll for an event with timeout.
/// Returns None if no event within timeout.
pub fn poll_event(timeout: Duration) -> Result<Option<InputEvent>> {
    if poll(timeout)? {
        Ok(Some(read_event()?))
    } else {
        Ok(None)
    }
}

/// Read the next event (blocking).
pub fn read_event() -> Result<InputEvent> {
    Ok(convert_event(read()?))
}

// =============================================================================
// EVENT ROUTING
// =============================================================================

/// Route an event to the host.
/// Returns true if the event changed host state.
pub fn route_event(event: InputEvent) -> bool {
    match event {
        InputEvent::Pointer(pointer_event) => {
            pointer::dispatch(pointer_event);
            true
        }
        InputEvent::Scroll { dx, dy } => {
            let step = config::current().host.scroll_step;
            viewport::scroll_by(dx as f32 * step, dy as f32 * step)
        }
        InputEvent::Resize(w, h) => {
            viewport::dispatch_resize(w as f32, h as f32);
            true
        }
        InputEvent::Key(_) | InputEvent::None => false,
    }
}

// =============================================================================
// MOUSE CAPTURE
// =============================================================================

/// Enable mouse capture.
pub fn enable_mouse() -> Result<()> {
    execute!(stdout(), EnableMouseCapture)?;
    Ok(())
}

/// Disable mouse capture.
pub fn disable_mouse() -> Result<()> {
    execute!(stdout(), DisableMouseCapture)?;
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    use crate::engine::{create_element, reset_registry, ElementSpec};
    use crate::state::pointer::PointerAction;
    use crate::types::{ElementStyle, Role};

    fn setup() {
        reset_registry();
        config::reset_config();
        viewport::reset_viewport_state();
        pointer::reset_pointer_state();
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> CrosstermMouseEvent {
        CrosstermMouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::empty(),
        }
    }

    #[test]
    fn test_convert_left_down_and_up() {
        let event = convert_mouse_event(mouse(MouseEventKind::Down(CrosstermMouseButton::Left), 10, 5));
        match event {
            InputEvent::Pointer(p) => {
                assert_eq!(p.action, PointerAction::Down);
                assert_eq!((p.x, p.y), (10.0, 5.0));
                assert_eq!(p.target, None);
            }
            other => panic!("expected pointer event, got {:?}", other),
        }

        let event = convert_mouse_event(mouse(MouseEventKind::Up(CrosstermMouseButton::Left), 1, 2));
        assert!(matches!(event, InputEvent::Pointer(p) if p.action == PointerAction::Up));
    }

    #[test]
    fn test_other_buttons_and_moves_ignored() {
        let right = convert_mouse_event(mouse(MouseEventKind::Down(CrosstermMouseButton::Right), 0, 0));
        assert!(matches!(right, InputEvent::None));

        let moved = convert_mouse_event(mouse(MouseEventKind::Moved, 0, 0));
        assert!(matches!(moved, InputEvent::None));
    }

    #[test]
    fn test_convert_scroll_directions() {
        let cases = [
            (MouseEventKind::ScrollUp, (0, -1)),
            (MouseEventKind::ScrollDown, (0, 1)),
            (MouseEventKind::ScrollLeft, (-1, 0)),
            (MouseEventKind::ScrollRight, (1, 0)),
        ];

        for (kind, expected) in cases {
            match convert_mouse_event(mouse(kind, 0, 0)) {
                InputEvent::Scroll { dx, dy } => assert_eq!((dx, dy), expected),
                other => panic!("expected scroll, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_convert_resize() {
        assert!(matches!(convert_event(CrosstermEvent::Resize(100, 30)), InputEvent::Resize(100, 30)));
    }

    #[test]
    fn test_route_resize_updates_viewport() {
        setup();

        assert!(route_event(InputEvent::Resize(132, 43)));
        assert_eq!(viewport::width(), 132.0);
        assert_eq!(viewport::height(), 43.0);
    }

    #[test]
    fn test_route_scroll_uses_step() {
        setup();
        let mut cfg = config::current();
        cfg.host.scroll_step = 3.0;
        config::set_config(cfg);

        viewport::dispatch_resize(40.0, 10.0);
        create_element(
            None,
            ElementSpec::new(Role::BLOCK).with_style(ElementStyle::sized(40.0, 100.0)),
        );

        assert!(route_event(InputEvent::Scroll { dx: 0, dy: 2 }));
        assert_eq!(viewport::scroll_y(), 6.0);
        assert!(route_event(InputEvent::Scroll { dx: 0, dy: -5 }));
        assert_eq!(viewport::scroll_y(), 0.0);
        assert!(!route_event(InputEvent::Scroll { dx: 0, dy: -1 }));
    }

    #[test]
    fn test_route_pointer_reaches_pointer_module() {
        setup();
        viewport::dispatch_resize(40.0, 10.0);
        let el = create_element(
            None,
            ElementSpec::new(Role::BUTTON).with_style(ElementStyle::sized(4.0, 1.0)),
        );

        route_event(InputEvent::Pointer(PointerEvent::down(1.0, 0.0)));
        assert_eq!(pointer::pressed_element(), Some(el));
    }
}
