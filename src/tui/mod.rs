//! Terminal UI module
//!
//! This module owns the terminal while a prompt is running. Prompts render into
//! an inline viewport below the cursor, so the answered line stays in the
//! scrollback once the prompt finishes.

pub mod application;
pub mod keys;
pub mod line_buffer;
pub mod theme;

pub use application::{Application, RenderContext};
pub use keys::{KeyBindings, KeyPress};
pub use line_buffer::LineBuffer;
pub use theme::{parse_style, Theme};

use crossterm::{
    event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture},
    terminal::{disable_raw_mode, enable_raw_mode},
    ExecutableCommand,
};
use ratatui::prelude::*;
use ratatui::{TerminalOptions, Viewport};
use std::io::{self, stdout, Write};

use crate::error::Result;

/// Terminal session for one prompt run
///
/// Handles raw mode, the inline viewport and restoring the terminal.
pub struct Tui {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    /// Whether raw mode is currently enabled
    raw_mode_enabled: bool,
    /// Whether bracketed paste mode is enabled
    bracketed_paste_enabled: bool,
    /// Whether mouse capture is enabled
    mouse_capture_enabled: bool,
}

/// Error handler for terminal cleanup operations
/// Used during both normal exit and panic/drop scenarios
enum ErrorHandler {
    /// Log errors via tracing (normal exit)
    Tracing,
    /// Print errors to stderr (panic/drop, tracing may be unavailable)
    Stderr,
}

impl ErrorHandler {
    fn handle(&self, context: &str, error: impl std::fmt::Display) {
        match self {
            ErrorHandler::Tracing => tracing::warn!("{}: {}", context, error),
            ErrorHandler::Stderr => eprintln!("prompt teardown: {}: {}", context, error),
        }
    }
}

impl Tui {
    /// Create a terminal with an inline viewport of `height` rows
    pub fn new(height: u16) -> Result<Self> {
        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::with_options(
            backend,
            TerminalOptions {
                viewport: Viewport::Inline(height.max(1)),
            },
        )?;
        Ok(Self {
            terminal,
            raw_mode_enabled: false,
            bracketed_paste_enabled: false,
            mouse_capture_enabled: false,
        })
    }

    /// Enter prompt mode (raw mode, paste detection and optional mouse capture)
    pub fn enter(&mut self, mouse: bool) -> Result<()> {
        enable_raw_mode()?;
        self.raw_mode_enabled = true;

        // Enable bracketed paste mode so pasted text arrives as one event
        if stdout().execute(EnableBracketedPaste).is_ok() {
            self.bracketed_paste_enabled = true;
        }

        if mouse && stdout().execute(EnableMouseCapture).is_ok() {
            self.mouse_capture_enabled = true;
        }

        tracing::debug!(
            mouse = self.mouse_capture_enabled,
            paste = self.bracketed_paste_enabled,
            "Prompt terminal session started"
        );
        Ok(())
    }

    /// Leave prompt mode, keeping the first `kept_lines` rows of the viewport
    ///
    /// The cursor is moved to the line below the kept rows so that following
    /// output continues underneath the answered prompt.
    pub fn finish(&mut self, kept_lines: u16) -> Result<()> {
        let area = self.terminal.get_frame().size();
        let last_line = area.y + kept_lines.clamp(1, area.height.max(1)) - 1;
        self.terminal.set_cursor(0, last_line)?;
        self.terminal.show_cursor()?;

        self.restore(ErrorHandler::Tracing);

        let mut out = stdout();
        out.write_all(b"\r\n")?;
        out.flush()?;

        tracing::debug!("Prompt terminal session finished");
        Ok(())
    }

    fn restore(&mut self, handler: ErrorHandler) {
        if self.bracketed_paste_enabled {
            if let Err(e) = stdout().execute(DisableBracketedPaste) {
                handler.handle("failed to disable bracketed paste", e);
            }
            self.bracketed_paste_enabled = false;
        }

        if self.mouse_capture_enabled {
            if let Err(e) = stdout().execute(DisableMouseCapture) {
                handler.handle("failed to disable mouse capture", e);
            }
            self.mouse_capture_enabled = false;
        }

        if self.raw_mode_enabled {
            if let Err(e) = disable_raw_mode() {
                handler.handle("failed to disable raw mode", e);
            }
            self.raw_mode_enabled = false;
        }
    }

    /// Whether mouse events are being reported
    pub fn mouse_enabled(&self) -> bool {
        self.mouse_capture_enabled
    }

    /// Rendering surface
    pub fn terminal_mut(&mut self) -> &mut Terminal<CrosstermBackend<io::Stdout>> {
        &mut self.terminal
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        // During drop, tracing may not be available, so errors go to stderr
        if self.raw_mode_enabled {
            if let Err(e) = self.terminal.show_cursor() {
                ErrorHandler::Stderr.handle("failed to show cursor", e);
            }
        }
        self.restore(ErrorHandler::Stderr);
    }
}

/// Current terminal height, falling back to 24 rows when it cannot be queried
pub fn terminal_rows() -> u16 {
    match crossterm::terminal::size() {
        Ok((_, rows)) if rows > 0 => rows,
        _ => 24,
    }
}
