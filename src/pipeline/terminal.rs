//! Terminal detection and session setup.
//!
//! In a terminal host the viewport is the terminal: one length unit is one
//! cell.

use std::io::{stdout, Write};

use crossterm::{
    cursor,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
    execute,
};

use crate::error::Result;
use crate::state::{input, viewport};

/// Read the terminal size and dispatch it as a viewport resize.
///
/// Returns the detected size, or `None` when stdout is not a terminal.
pub fn detect_viewport() -> Option<(u16, u16)> {
    match terminal::size() {
        Ok((width, height)) => {
            viewport::dispatch_resize(width as f32, height as f32);
            Some((width, height))
        }
        Err(e) => {
            log::debug!("terminal size unavailable: {}", e);
            None
        }
    }
}

/// Raw-mode, alternate-screen, mouse-capture session.
///
/// Restores the terminal on drop.
pub struct TerminalSession {
    active: bool,
}

impl TerminalSession {
    pub fn enter() -> Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), EnterAlternateScreen, cursor::Hide)?;
        input::enable_mouse()?;
        detect_viewport();
        Ok(Self { active: true })
    }

    /// Restore the terminal.
    pub fn leave(mut self) -> Result<()> {
        self.restore()
    }

    fn restore(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        input::disable_mouse()?;
        execute!(stdout(), cursor::Show, LeaveAlternateScreen)?;
        terminal::disable_raw_mode()?;
        stdout().flush()?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        // Best effort
        let _ = self.restore();
    }
}
