//! Yes/no confirmation prompt
//!
//! Style classes:
//!
//! ```text
//! [?] Choose a choice and return? (Y/n)
//! └┬┘ └──────────────┬──────────┘ └─┬─┘
//! questionmark    question      annotation
//! ```

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use super::{annotation_style, base_theme, question_spans, Flow, Prompt};
use crate::tui::line_buffer::{add_editing_bindings, insert_char, EditableState};
use crate::tui::{KeyBindings, KeyPress, LineBuffer, RenderContext, Theme};

const TRUE_STRINGS: &[&str] = &["yes", "y", "true", "t", "1"];
const FALSE_STRINGS: &[&str] = &["no", "n", "false", "f", "0"];

/// Parse a yes/no answer (`yes y true t 1` / `no n false f 0`, any case)
///
/// The whole text must match; surrounding whitespace is not accepted.
pub fn parse_bool(value: &str) -> Option<bool> {
    let lower = value.to_ascii_lowercase();
    if TRUE_STRINGS.contains(&lower.as_str()) {
        Some(true)
    } else if FALSE_STRINGS.contains(&lower.as_str()) {
        Some(false)
    } else {
        None
    }
}

/// Prompt for a yes/no answer
pub struct ConfirmPrompt {
    question: String,
    default_choice: Option<bool>,
    question_mark: String,
}

impl ConfirmPrompt {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            default_choice: None,
            question_mark: super::DEFAULT_QUESTION_MARK.to_string(),
        }
    }

    /// Answer used when Enter is pressed on an empty line
    pub fn default_choice(mut self, choice: Option<bool>) -> Self {
        self.default_choice = choice;
        self
    }

    pub fn question_mark(mut self, mark: impl Into<String>) -> Self {
        self.question_mark = mark.into();
        self
    }

    fn annotation(&self) -> &'static str {
        match self.default_choice {
            None => "(y/n)",
            Some(true) => "(Y/n)",
            Some(false) => "(y/N)",
        }
    }

    fn submit(&self, state: &mut ConfirmState) -> Flow<bool> {
        let text = state.buffer.text();
        if text.is_empty() {
            let Some(default) = self.default_choice else {
                return Flow::Continue;
            };
            state.answered = true;
            state.buffer.set_text(if default { "Yes" } else { "No" });
            return Flow::Submit(default);
        }

        match parse_bool(text) {
            Some(value) => {
                state.answered = true;
                Flow::Submit(value)
            }
            None => {
                tracing::debug!(input = text, "Rejected confirmation input");
                Flow::Continue
            }
        }
    }

    fn cancel(&self, _state: &mut ConfirmState) -> Flow<bool> {
        Flow::Cancel
    }
}

/// Per-run state of [`ConfirmPrompt`]
#[derive(Debug, Clone, Default)]
pub struct ConfirmState {
    buffer: LineBuffer,
    answered: bool,
}

impl ConfirmState {
    pub fn text(&self) -> &str {
        self.buffer.text()
    }

    pub fn is_answered(&self) -> bool {
        self.answered
    }
}

impl EditableState for ConfirmState {
    fn buffer(&mut self) -> &mut LineBuffer {
        &mut self.buffer
    }
}

impl Prompt for ConfirmPrompt {
    type Output = bool;
    type State = ConfirmState;

    fn question(&self) -> &str {
        &self.question
    }

    fn init_state(&self, _terminal_rows: u16) -> ConfirmState {
        ConfirmState::default()
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
        theme.push("annotation", annotation_style());
        theme
    }

    fn handle_char(&self, state: &mut ConfirmState, c: char) -> Flow<bool> {
        insert_char(state, c);
        Flow::Continue
    }

    fn height(&self, _state: &ConfirmState) -> u16 {
        1
    }

    fn render(&self, state: &ConfirmState, context: &RenderContext<'_>, frame: &mut Frame, area: Rect) {
        let mut spans = question_spans(context, &self.question_mark, &self.question);
        if !state.answered {
            spans.push(context.span("annotation", self.annotation()));
            spans.push(Span::raw(" "));
        }
        let prefix_width = Line::from(spans.clone()).width() as u16;
        spans.push(context.span("answer", state.buffer.text().to_string()));

        frame.render_widget(Paragraph::new(Line::from(spans)), area);

        if !context.done {
            let typed = Span::raw(state.buffer.before_cursor()).width() as u16;
            let cursor_x = (area.x + prefix_width + typed).min(area.right().saturating_sub(1));
            frame.set_cursor(cursor_x, area.y);
        }
    }
}
