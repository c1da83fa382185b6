//! Multi-choice checkbox prompt with auto scrolling
//!
//! Style classes:
//!
//! ```text
//! [?] Choose a choice and return? (Use ↑ and ↓ to move, Space to select, Enter to submit)
//! └┬┘ └──────────────┬──────────┘ └───────────────────────┬─────────────────────────────┘
//! questionmark    question                            annotation
//!
//!  ❯  ●  choice selected
//! └┬┘└┬┘ └───────┬─────┘
//! pointer sign selected
//!
//!     ○  choice unselected
//!    └┬┘ └───────┬───────┘
//!   unsign   unselected
//! ```

use std::collections::BTreeSet;

use crossterm::event::{MouseButton, MouseEventKind};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use super::scroll::ScrollWindow;
use super::{
    annotation_style, base_theme, error_style, highlight_style, question_spans,
    render_error_line, Flow, Prompt,
};
use crate::choice::{Choice, Selected};
use crate::tui::{KeyBindings, KeyPress, RenderContext, Theme};

pub const DEFAULT_CHECKBOX_ANNOTATION: &str =
    "(Use ↑ and ↓ to move, Space to select, Enter to submit)";
pub const DEFAULT_SELECTED_SIGN: &str = "●";
pub const DEFAULT_UNSELECTED_SIGN: &str = "○";

type SelectionValidator<T> = Box<dyn Fn(&[Selected<T>]) -> bool + Send + Sync>;

/// Pick any number of choices from a list
pub struct CheckboxPrompt<T = ()> {
    question: String,
    choices: Vec<Choice<T>>,
    default_select: BTreeSet<usize>,
    question_mark: String,
    pointer: String,
    selected_sign: String,
    unselected_sign: String,
    annotation: String,
    max_height: Option<usize>,
    validator: Option<SelectionValidator<T>>,
    error_message: String,
}

impl<T> CheckboxPrompt<T> {
    pub fn new(question: impl Into<String>, choices: Vec<Choice<T>>) -> Self {
        Self {
            question: question.into(),
            choices,
            default_select: BTreeSet::new(),
            question_mark: super::DEFAULT_QUESTION_MARK.to_string(),
            pointer: super::DEFAULT_POINTER.to_string(),
            selected_sign: DEFAULT_SELECTED_SIGN.to_string(),
            unselected_sign: DEFAULT_UNSELECTED_SIGN.to_string(),
            annotation: DEFAULT_CHECKBOX_ANNOTATION.to_string(),
            max_height: None,
            validator: None,
            error_message: super::DEFAULT_SELECTION_ERROR.to_string(),
        }
    }

    /// Choices checked when the prompt starts; each index is taken modulo
    /// the number of choices
    pub fn default_select(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        let len = self.choices.len();
        self.default_select = if len == 0 {
            BTreeSet::new()
        } else {
            indices.into_iter().map(|index| index % len).collect()
        };
        self
    }

    pub fn question_mark(mut self, mark: impl Into<String>) -> Self {
        self.question_mark = mark.into();
        self
    }

    pub fn pointer(mut self, pointer: impl Into<String>) -> Self {
        self.pointer = pointer.into();
        self
    }

    pub fn selected_sign(mut self, sign: impl Into<String>) -> Self {
        self.selected_sign = sign.into();
        self
    }

    pub fn unselected_sign(mut self, sign: impl Into<String>) -> Self {
        self.unselected_sign = sign.into();
        self
    }

    pub fn annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotation = annotation.into();
        self
    }

    pub fn max_height(mut self, rows: usize) -> Self {
        self.max_height = Some(rows);
        self
    }

    /// Accept the selection only when `validator` returns true
    pub fn validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&[Selected<T>]) -> bool + Send + Sync + 'static,
    {
        self.validator = Some(Box::new(validator));
        self
    }

    pub fn error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = message.into();
        self
    }

    pub fn choices(&self) -> &[Choice<T>] {
        &self.choices
    }
}

impl<T: Clone> CheckboxPrompt<T> {
    /// Checked choices in offered order
    fn result(&self, state: &CheckboxState) -> Vec<Selected<T>> {
        state
            .selected
            .iter()
            .filter_map(|&index| {
                self.choices
                    .get(index)
                    .map(|choice| Selected::new(index, choice.clone()))
            })
            .collect()
    }

    fn move_up(&self, state: &mut CheckboxState) -> Flow<Vec<Selected<T>>> {
        state.invalid = false;
        state.window.up(self.choices.len());
        Flow::Continue
    }

    fn move_down(&self, state: &mut CheckboxState) -> Flow<Vec<Selected<T>>> {
        state.invalid = false;
        state.window.down(self.choices.len());
        Flow::Continue
    }

    fn toggle(&self, state: &mut CheckboxState) -> Flow<Vec<Selected<T>>> {
        state.invalid = false;
        if !self.choices.is_empty() {
            state.toggle(state.window.index);
        }
        Flow::Continue
    }

    fn submit(&self, state: &mut CheckboxState) -> Flow<Vec<Selected<T>>> {
        state.invalid = false;
        let result = self.result(state);
        if let Some(validator) = &self.validator {
            if !validator(&result) {
                tracing::debug!(selected = result.len(), "Selection rejected by validator");
                state.invalid = true;
                return Flow::Continue;
            }
        }
        state.answered = true;
        Flow::Submit(result)
    }

    fn cancel(&self, state: &mut CheckboxState) -> Flow<Vec<Selected<T>>> {
        state.invalid = false;
        Flow::Cancel
    }
}

/// Per-run state of [`CheckboxPrompt`]
#[derive(Debug, Clone)]
pub struct CheckboxState {
    window: ScrollWindow,
    selected: BTreeSet<usize>,
    invalid: bool,
    answered: bool,
}

impl CheckboxState {
    pub fn index(&self) -> usize {
        self.window.index
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    pub fn is_invalid(&self) -> bool {
        self.invalid
    }

    fn toggle(&mut self, index: usize) {
        if !self.selected.remove(&index) {
            self.selected.insert(index);
        }
    }
}

impl<T: Clone> Prompt for CheckboxPrompt<T> {
    type Output = Vec<Selected<T>>;
    type State = CheckboxState;

    fn question(&self) -> &str {
        &self.question
    }

    fn init_state(&self, terminal_rows: u16) -> CheckboxState {
        CheckboxState {
            window: ScrollWindow::new(self.max_height.unwrap_or(terminal_rows as usize)),
            selected: self.default_select.clone(),
            invalid: false,
            answered: false,
        }
    }

    fn build_keybindings(&self) -> KeyBindings<Self> {
        KeyBindings::<Self>::new()
            .bind(&[KeyPress::UP], Self::move_up)
            .bind(&[KeyPress::DOWN], Self::move_down)
            .bind(&[KeyPress::SPACE], Self::toggle)
            .bind(&[KeyPress::ENTER], Self::submit)
            .bind(&[KeyPress::CTRL_C, KeyPress::CTRL_Q], Self::cancel)
    }

    fn default_theme(&self) -> Theme {
        let mut theme = base_theme();
        theme.push("annotation", annotation_style());
        theme.push("sign", highlight_style());
        theme.push("selected", highlight_style());
        theme.push("error", error_style());
        theme
    }

    fn handle_mouse(
        &self,
        state: &mut CheckboxState,
        kind: MouseEventKind,
        row: u16,
    ) -> Flow<Vec<Selected<T>>> {
        state.invalid = false;
        let len = self.choices.len();
        match kind {
            MouseEventKind::Up(MouseButton::Left) => {
                if let Some(index) = state.window.index_at_row(row, len) {
                    state.window.jump_to(index, len);
                    state.toggle(index);
                }
            }
            MouseEventKind::ScrollUp => state.window.up(len),
            MouseEventKind::ScrollDown => state.window.down(len),
            _ => {}
        }
        Flow::Continue
    }

    fn height(&self, state: &CheckboxState) -> u16 {
        let rows = (self.choices.len() + 1).min(state.window.max_height);
        rows.min(u16::MAX as usize) as u16
    }

    fn render(&self, state: &CheckboxState, context: &RenderContext<'_>, frame: &mut Frame, area: Rect) {
        if area.height == 0 {
            return;
        }

        let mut spans = question_spans(context, &self.question_mark, &self.question);
        if state.answered {
            let names = self
                .result(state)
                .iter()
                .map(|selected| selected.choice.label().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            spans.push(context.span("answer", names));
        } else {
            spans.push(context.span("annotation", self.annotation.as_str()));
        }
        let prompt_area = Rect::new(area.x, area.y, area.width, 1);
        frame.render_widget(Paragraph::new(Line::from(spans)), prompt_area);

        if context.done {
            return;
        }

        let padding = " ".repeat(Span::raw(self.pointer.as_str()).width());
        let lines: Vec<Line> = state
            .window
            .visible_range(self.choices.len())
            .map(|index| {
                let pointer = if index == state.window.index {
                    context.span("pointer", self.pointer.as_str())
                } else {
                    Span::raw(padding.clone())
                };
                let (sign, name_class) = if state.is_selected(index) {
                    (context.span("sign", self.selected_sign.as_str()), "selected")
                } else {
                    (context.span("unsign", self.unselected_sign.as_str()), "unselected")
                };
                Line::from(vec![
                    pointer,
                    Span::raw(" "),
                    sign,
                    Span::raw(" "),
                    context.span(name_class, self.choices[index].label()),
                ])
            })
            .collect();

        let choices_area = Rect::new(area.x, area.y + 1, area.width, area.height - 1);
        frame.render_widget(Paragraph::new(lines), choices_area);

        if state.invalid {
            render_error_line(context, &self.error_message, frame, area);
        }
    }
}
