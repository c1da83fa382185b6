//! Single-line text input prompt
//!
//! Style classes:
//!
//! ```text
//! [?] What's your name? answer
//! └┬┘ └───────┬───────┘ └──┬─┘
//! questionmark question  input/answer
//!
//! Invalid input
//! └─────┬─────┘
//!     error
//! ```

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use super::{base_theme, error_style, question_spans, render_error_line, Flow, Prompt};
use crate::tui::line_buffer::{add_editing_bindings, insert_char, EditableState};
use crate::tui::{KeyBindings, KeyPress, LineBuffer, RenderContext, Theme};

/// Default message shown when the validator rejects the text
pub const DEFAULT_INPUT_ERROR: &str = "Invalid input";

type TextValidator = Box<dyn Fn(&str) -> bool + Send + Sync>;

/// Prompt for a line of text
pub struct InputPrompt {
    question: String,
    default_text: Option<String>,
    password: bool,
    question_mark: String,
    validator: Option<TextValidator>,
    error_message: String,
}

impl InputPrompt {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            default_text: None,
            password: false,
            question_mark: super::DEFAULT_QUESTION_MARK.to_string(),
            validator: None,
            error_message: DEFAULT_INPUT_ERROR.to_string(),
        }
    }

    /// Text placed in the buffer when the prompt starts
    pub fn default_text(mut self, text: impl Into<String>) -> Self {
        self.default_text = Some(text.into());
        self
    }

    /// Mask the typed text with `*`
    pub fn password(mut self, password: bool) -> Self {
        self.password = password;
        self
    }

    /// Mark shown before the question; empty hides it
    pub fn question_mark(mut self, mark: impl Into<String>) -> Self {
        self.question_mark = mark.into();
        self
    }

    /// Accept the text only when `validator` returns true
    pub fn validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.validator = Some(Box::new(validator));
        self
    }

    pub fn error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = message.into();
        self
    }

    fn display_text(&self, text: &str) -> String {
        if self.password {
            "*".repeat(text.chars().count())
        } else {
            text.to_string()
        }
    }

    fn submit(&self, state: &mut InputState) -> Flow<String> {
        let text = state.buffer.text();
        if let Some(validator) = &self.validator {
            if !validator(text) {
                tracing::debug!("Input rejected by validator");
                state.invalid = true;
                return Flow::Continue;
            }
        }
        state.answered = true;
        Flow::Submit(text.to_string())
    }

    fn cancel(&self, _state: &mut InputState) -> Flow<String> {
        Flow::Cancel
    }
}

/// Per-run state of [`InputPrompt`]
#[derive(Debug, Clone, Default)]
pub struct InputState {
    buffer: LineBuffer,
    answered: bool,
    invalid: bool,
}

impl InputState {
    pub fn text(&self) -> &str {
        self.buffer.text()
    }

    pub fn is_invalid(&self) -> bool {
        self.invalid
    }

    pub fn is_answered(&self) -> bool {
        self.answered
    }
}

impl EditableState for InputState {
    fn buffer(&mut self) -> &mut LineBuffer {
        &mut self.buffer
    }

    fn on_text_changed(&mut self) {
        self.invalid = false;
    }
}

impl Prompt for InputPrompt {
    type Output = String;
    type State = InputState;

    fn question(&self) -> &str {
        &self.question
    }

    fn init_state(&self, _terminal_rows: u16) -> InputState {
        InputState {
            buffer: LineBuffer::with_text(self.default_text.clone().unwrap_or_default()),
            answered: false,
            invalid: false,
        }
    }

    fn build_keybindings(&self) -> KeyBindings<Self> {
        let mut kb = KeyBindings::<Self>::new()
            .bind(&[KeyPress::ENTER], Self::submit)
            .bind(&[KeyPress::CTRL_C, KeyPress::CTRL_Q], Self::cancel);
        add_editing_bindings(&mut kb);
        kb
    }

    fn default_theme(&self) -> Theme {
        let mut theme = base_theme();
        theme.push("error", error_style());
        theme
    }

    fn handle_char(&self, state: &mut InputState, c: char) -> Flow<String> {
        insert_char(state, c);
        Flow::Continue
    }

    fn height(&self, _state: &InputState) -> u16 {
        2
    }

    fn render(&self, state: &InputState, context: &RenderContext<'_>, frame: &mut Frame, area: Rect) {
        let mut spans = question_spans(context, &self.question_mark, &self.question);
        let prefix_width = Line::from(spans.clone()).width() as u16;

        let class = if state.answered { "answer" } else { "input" };
        spans.push(context.span(class, self.display_text(state.buffer.text())));

        let line_area = Rect::new(area.x, area.y, area.width, area.height.min(1));
        frame.render_widget(Paragraph::new(Line::from(spans)), line_area);

        if context.done {
            return;
        }

        let typed = self.display_text(state.buffer.before_cursor());
        let cursor_x = area.x + prefix_width + Span::raw(typed).width() as u16;
        frame.set_cursor(cursor_x.min(area.right().saturating_sub(1)), area.y);

        if state.invalid && area.height > 1 {
            let error_area = Rect::new(area.x, area.y + 1, area.width, 1);
            render_error_line(context, &self.error_message, frame, error_area);
        }
    }
}
