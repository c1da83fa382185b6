//! Prompt application runner
//!
//! Builds the key bindings and theme of a prompt, drives the terminal event
//! loop and performs the final "done" render once the prompt is answered or
//! cancelled.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent};
use ratatui::backend::Backend;
use ratatui::prelude::*;

use crate::error::{PromptError, Result};
use crate::prompts::{Flow, Prompt, PromptOptions};
use crate::tui::keys::KeyBindings;
use crate::tui::theme::Theme;
use crate::tui::{terminal_rows, Tui};

/// Poll interval of the event loop
const TICK_RATE: Duration = Duration::from_millis(50);

/// What a prompt needs to know while rendering
pub struct RenderContext<'a> {
    /// Resolved theme (prompt defaults + user overrides)
    pub theme: &'a Theme,
    /// Strip all colors and attributes
    pub no_ansi: bool,
    /// The prompt has been answered or cancelled
    pub done: bool,
}

impl RenderContext<'_> {
    /// Style of a class, honoring the no-ANSI flag
    pub fn style(&self, class: &str) -> Style {
        if self.no_ansi {
            Style::default()
        } else {
            self.theme.resolve(class)
        }
    }

    /// A span styled with a class
    pub fn span<'s>(&self, class: &str, content: impl Into<std::borrow::Cow<'s, str>>) -> Span<'s> {
        Span::styled(content, self.style(class))
    }
}

/// One run of a prompt against a terminal
pub struct Application<'a, P: Prompt> {
    prompt: &'a P,
    options: &'a PromptOptions,
    keybindings: KeyBindings<P>,
    theme: Theme,
}

impl<'a, P: Prompt> Application<'a, P> {
    pub fn new(prompt: &'a P, options: &'a PromptOptions) -> Self {
        Self {
            prompt,
            options,
            keybindings: prompt.build_keybindings(),
            theme: prompt.build_theme(&options.theme),
        }
    }

    pub fn keybindings(&self) -> &KeyBindings<P> {
        &self.keybindings
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Run the prompt on the real terminal
    ///
    /// Returns the answered value, or [`PromptError::Cancelled`] when the user
    /// aborted.
    pub fn run(&self) -> Result<P::Output> {
        let mut state = self.prompt.init_state(terminal_rows());
        let height = self.prompt.height(&state);

        let mut tui = Tui::new(height)?;
        tui.enter(self.options.mouse)?;

        let mouse = tui.mouse_enabled();
        let outcome = self.drive(tui.terminal_mut(), &mut state, || {
            if event::poll(TICK_RATE)? {
                let event = event::read()?;
                if !mouse && matches!(event, Event::Mouse(_)) {
                    return Ok(None);
                }
                Ok(Some(event))
            } else {
                Ok(None)
            }
        });

        // The done layout is always a single line
        let finished = tui.finish(1);
        let value = outcome?;
        finished?;
        Ok(value)
    }

    /// Drive the prompt on any backend with any event source
    ///
    /// `next_event` returns `Ok(None)` when no event arrived within a tick.
    pub fn drive<B, F>(
        &self,
        terminal: &mut Terminal<B>,
        state: &mut P::State,
        mut next_event: F,
    ) -> Result<P::Output>
    where
        B: Backend,
        F: FnMut() -> Result<Option<Event>>,
    {
        let mut area = self.draw(terminal, state, false)?;
        let mut needs_render = false;

        let outcome = loop {
            if needs_render {
                area = self.draw(terminal, state, false)?;
                needs_render = false;
            }

            let flow = match next_event()? {
                Some(Event::Key(key)) => dispatch_key(self.prompt, &self.keybindings, state, key),
                Some(Event::Mouse(mouse)) => dispatch_mouse(self.prompt, state, mouse, area),
                Some(Event::Paste(text)) => dispatch_paste(self.prompt, state, &text),
                Some(Event::Resize(_, _)) => {
                    needs_render = true;
                    continue;
                }
                Some(_) | None => continue,
            };

            match flow {
                Flow::Continue => needs_render = true,
                Flow::Submit(value) => {
                    tracing::debug!(question = self.prompt.question(), "Prompt answered");
                    break Ok(value);
                }
                Flow::Cancel => {
                    tracing::info!(question = self.prompt.question(), "Prompt cancelled");
                    break Err(PromptError::Cancelled);
                }
            }
        };

        self.draw(terminal, state, true)?;
        outcome
    }

    fn draw<B: Backend>(
        &self,
        terminal: &mut Terminal<B>,
        state: &P::State,
        done: bool,
    ) -> Result<Rect> {
        let context = RenderContext {
            theme: &self.theme,
            no_ansi: self.options.no_ansi,
            done,
        };
        let completed = terminal.draw(|frame| {
            let area = frame.size();
            self.prompt.render(state, &context, frame, area);
        })?;
        Ok(completed.area)
    }
}

/// Route a key event to the prompt's bindings
///
/// Only key presses are handled. Unbound printable characters go to
/// [`Prompt::handle_char`].
pub fn dispatch_key<P: Prompt>(
    prompt: &P,
    bindings: &KeyBindings<P>,
    state: &mut P::State,
    key: KeyEvent,
) -> Flow<P::Output> {
    if key.kind != KeyEventKind::Press {
        return Flow::Continue;
    }
    if let Some(handler) = bindings.lookup(&key) {
        return handler(prompt, state);
    }
    match key.code {
        KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            prompt.handle_char(state, c)
        }
        _ => Flow::Continue,
    }
}

/// Route a mouse event to the prompt, with the row relative to the viewport
pub fn dispatch_mouse<P: Prompt>(
    prompt: &P,
    state: &mut P::State,
    mouse: MouseEvent,
    area: Rect,
) -> Flow<P::Output> {
    if mouse.row < area.y || mouse.row >= area.bottom() {
        return Flow::Continue;
    }
    prompt.handle_mouse(state, mouse.kind, mouse.row - area.y)
}

/// Feed pasted text to the prompt char by char, stopping at the first
/// non-continuing outcome
pub fn dispatch_paste<P: Prompt>(prompt: &P, state: &mut P::State, text: &str) -> Flow<P::Output> {
    for c in text.chars().filter(|c| !c.is_control()) {
        match prompt.handle_char(state, c) {
            Flow::Continue => {}
            other => return other,
        }
    }
    Flow::Continue
}

#[cfg(test)]
pub(crate) mod testing {
    //! Headless runner used by the prompt tests

    use std::collections::VecDeque;

    use crossterm::event::{KeyEventState, MouseButton, MouseEventKind};
    use ratatui::backend::TestBackend;

    use super::*;

    pub fn key(code: KeyCode) -> Event {
        key_with(code, KeyModifiers::NONE)
    }

    pub fn key_with(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    pub fn ctrl(c: char) -> Event {
        key_with(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    pub fn typed(text: &str) -> Vec<Event> {
        text.chars().map(|c| key(KeyCode::Char(c))).collect()
    }

    pub fn click(row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Up(MouseButton::Left),
            column: 0,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    /// Run a prompt on a `TestBackend` with scripted events
    ///
    /// Returns the outcome and the rendered lines of the final (done) frame.
    pub fn run_scripted<P: Prompt>(
        prompt: &P,
        options: &PromptOptions,
        rows: u16,
        events: Vec<Event>,
    ) -> (Result<P::Output>, Vec<String>) {
        let app = Application::new(prompt, options);
        let mut terminal = Terminal::new(TestBackend::new(60, rows)).unwrap();
        let mut state = prompt.init_state(rows);
        let mut events: VecDeque<Event> = events.into();

        let outcome = app.drive(&mut terminal, &mut state, || match events.pop_front() {
            Some(event) => Ok(Some(event)),
            None => Err(PromptError::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "script exhausted",
            ))),
        });

        (outcome, buffer_lines(terminal.backend().buffer()))
    }

    /// Render one frame of a prompt state into text lines
    pub fn render_lines<P: Prompt>(
        prompt: &P,
        state: &P::State,
        done: bool,
        rows: u16,
    ) -> Vec<String> {
        let theme = prompt.build_theme(&Theme::new());
        let context = RenderContext {
            theme: &theme,
            no_ansi: false,
            done,
        };
        let mut terminal = Terminal::new(TestBackend::new(60, rows)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.size();
                prompt.render(state, &context, frame, area);
            })
            .unwrap();
        buffer_lines(terminal.backend().buffer())
    }

    fn buffer_lines(buffer: &ratatui::buffer::Buffer) -> Vec<String> {
        let area = buffer.area;
        (area.y..area.bottom())
            .map(|y| {
                let line: String = (area.x..area.right())
                    .map(|x| buffer.get(x, y).symbol())
                    .collect();
                line.trim_end().to_string()
            })
            .collect()
    }
}
