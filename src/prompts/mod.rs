//! Prompt types and the shared prompt contract
//!
//! Every prompt maps its options onto three toolkit configurations: a key-binding
//! table, a theme and a layout. [`Application`] runs those against the terminal.

pub mod checkbox;
pub mod confirm;
pub mod input;
pub mod list;
pub mod scroll;

pub use checkbox::CheckboxPrompt;
pub use confirm::{parse_bool, ConfirmPrompt};
pub use input::InputPrompt;
pub use list::ListPrompt;

use std::future::Future;

use crossterm::event::MouseEventKind;
use ratatui::prelude::*;
use ratatui::widgets::{Clear, Paragraph};

use crate::choice::Answer;
use crate::error::{PromptError, Result};
use crate::tui::{Application, KeyBindings, RenderContext, Theme};

/// Default question mark shown before the question
pub const DEFAULT_QUESTION_MARK: &str = "[?]";
/// Default pointer marking the current choice
pub const DEFAULT_POINTER: &str = "❯";
/// Default message shown when a selection is rejected by a validator
pub const DEFAULT_SELECTION_ERROR: &str = "Invalid selection";

/// Outcome of handling one input event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow<T> {
    /// Keep the prompt running
    Continue,
    /// Finish with an answer
    Submit(T),
    /// Abort without an answer
    Cancel,
}

/// Per-invocation options
#[derive(Debug, Clone)]
pub struct PromptOptions {
    /// Disable all colors and text attributes
    pub no_ansi: bool,
    /// Style overrides, applied after the prompt's default theme
    pub theme: Theme,
    /// Report mouse clicks and scrolling to the prompt
    pub mouse: bool,
}

impl Default for PromptOptions {
    fn default() -> Self {
        Self {
            no_ansi: false,
            theme: Theme::new(),
            mouse: true,
        }
    }
}

impl PromptOptions {
    pub fn with_no_ansi(mut self, no_ansi: bool) -> Self {
        self.no_ansi = no_ansi;
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_mouse(mut self, mouse: bool) -> Self {
        self.mouse = mouse;
        self
    }
}

/// An interactive prompt
///
/// Implementors describe state, key bindings, theme and layout; the provided
/// methods run them. Once done, a prompt's layout must fit in a single line.
pub trait Prompt: Sized {
    /// Answered value
    type Output;
    /// Per-run mutable state, rebuilt for every run
    type State;

    fn question(&self) -> &str;

    /// Fresh state for a run on a terminal with `terminal_rows` rows
    fn init_state(&self, terminal_rows: u16) -> Self::State;

    fn build_keybindings(&self) -> KeyBindings<Self>;

    /// Default class styles of this prompt
    fn default_theme(&self) -> Theme;

    /// Default theme with the caller's overrides applied
    fn build_theme(&self, overrides: &Theme) -> Theme {
        self.default_theme().merge(overrides)
    }

    /// Handle a printable character with no key binding
    fn handle_char(&self, _state: &mut Self::State, _c: char) -> Flow<Self::Output> {
        Flow::Continue
    }

    /// Handle a mouse event at `row` rows below the top of the viewport
    fn handle_mouse(
        &self,
        _state: &mut Self::State,
        _kind: MouseEventKind,
        _row: u16,
    ) -> Flow<Self::Output> {
        Flow::Continue
    }

    /// Rows needed by the layout while the prompt is active
    fn height(&self, state: &Self::State) -> u16;

    fn render(&self, state: &Self::State, context: &RenderContext<'_>, frame: &mut Frame, area: Rect);

    /// Run the prompt, blocking until it is answered or cancelled
    fn prompt(&self, options: &PromptOptions) -> Result<Answer<Self::Output>> {
        let value = Application::new(self, options).run()?;
        Ok(Answer::new(self.question(), value))
    }

    /// Run the prompt and fall back to `default` when the user cancels
    fn prompt_or(
        &self,
        options: &PromptOptions,
        default: Self::Output,
    ) -> Result<Answer<Self::Output>> {
        answer_or(self.prompt(options), self.question(), default)
    }

    /// Run the prompt from async code
    ///
    /// The terminal session runs on the blocking thread pool; the returned
    /// future resolves once the prompt is answered or cancelled.
    fn prompt_async(
        self,
        options: PromptOptions,
    ) -> impl Future<Output = Result<Answer<Self::Output>>> + Send
    where
        Self: Send + 'static,
        Self::Output: Send + 'static,
    {
        async move { tokio::task::spawn_blocking(move || self.prompt(&options)).await? }
    }
}

/// Replace a cancellation with `default`, passing every other outcome through
pub(crate) fn answer_or<V>(result: Result<Answer<V>>, question: &str, default: V) -> Result<Answer<V>> {
    match result {
        Err(PromptError::Cancelled) => Ok(Answer::new(question, default)),
        other => other,
    }
}

/// Styles shared by every prompt
pub(crate) fn base_theme() -> Theme {
    let mut theme = Theme::new();
    theme.push(
        "questionmark",
        Style::default()
            .fg(Color::Rgb(0x67, 0x3A, 0xB7))
            .add_modifier(Modifier::BOLD),
    );
    theme.push("question", Style::default().add_modifier(Modifier::BOLD));
    theme.push("answer", Style::default().fg(Color::Rgb(0xFF, 0x9D, 0x00)));
    theme
}

pub(crate) fn annotation_style() -> Style {
    Style::default().fg(Color::Rgb(0x7F, 0x8C, 0x8D))
}

pub(crate) fn highlight_style() -> Style {
    Style::default()
        .fg(Color::Green)
        .remove_modifier(Modifier::REVERSED)
}

pub(crate) fn error_style() -> Style {
    Style::default().bg(Color::Rgb(0xFF, 0x00, 0x00))
}

/// `questionmark question ` spans that open every prompt line
pub(crate) fn question_spans<'a>(
    context: &RenderContext<'_>,
    question_mark: &'a str,
    question: &'a str,
) -> Vec<Span<'a>> {
    let mut spans = Vec::with_capacity(4);
    if !question_mark.is_empty() {
        spans.push(context.span("questionmark", question_mark));
        spans.push(Span::raw(" "));
    }
    spans.push(context.span("question", question.trim()));
    spans.push(Span::raw(" "));
    spans
}

/// Render an error message over the bottom line of `area`
pub(crate) fn render_error_line(
    context: &RenderContext<'_>,
    message: &str,
    frame: &mut Frame,
    area: Rect,
) {
    if area.height == 0 {
        return;
    }
    let line_area = Rect::new(area.x, area.bottom() - 1, area.width, 1);
    frame.render_widget(Clear, line_area);
    frame.render_widget(
        Paragraph::new(Line::from(context.span("error", message.to_string()))),
        line_area,
    );
}

/// Predicate deciding whether a selection may be submitted
pub(crate) type Validator<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;

    /// Prompt whose run fails before the terminal is touched
    struct Broken;

    impl Prompt for Broken {
        type Output = String;
        type State = ();

        fn question(&self) -> &str {
            "Broken?"
        }

        fn init_state(&self, _terminal_rows: u16) {
            panic!("state could not be built");
        }

        fn build_keybindings(&self) -> KeyBindings<Self> {
            KeyBindings::new()
        }

        fn default_theme(&self) -> Theme {
            Theme::new()
        }

        fn height(&self, _state: &()) -> u16 {
            1
        }

        fn render(&self, _state: &(), _context: &RenderContext<'_>, _frame: &mut Frame, _area: Rect) {}
    }

    #[test]
    fn test_answer_or_replaces_cancellation() {
        let answer = answer_or(Err(PromptError::Cancelled), "Name?", "anon".to_string()).unwrap();
        assert_eq!(answer.question, "Name?");
        assert_eq!(answer.value, "anon");
    }

    #[test]
    fn test_answer_or_keeps_answers_and_other_errors() {
        let answered = Ok(Answer::new("Name?", "ada".to_string()));
        assert_eq!(answer_or(answered, "Name?", "anon".to_string()).unwrap().value, "ada");

        let failed = Err(PromptError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            "no tty",
        )));
        let err = answer_or(failed, "Name?", "anon".to_string()).unwrap_err();
        assert!(matches!(err, PromptError::Io(_)));
    }

    #[tokio::test]
    async fn test_prompt_async_reports_task_failure() {
        let err = Broken
            .prompt_async(PromptOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, PromptError::Task(_)));
        assert!(!err.is_cancelled());
    }

    #[test]
    fn test_base_theme_classes() {
        let theme = base_theme();
        assert!(theme.has_class("questionmark"));
        assert!(theme.has_class("question"));
        assert_eq!(
            theme.resolve("answer").fg,
            Some(Color::Rgb(0xFF, 0x9D, 0x00))
        );
    }

    #[test]
    fn test_prompt_options_builder() {
        let options = PromptOptions::default().with_no_ansi(true).with_mouse(false);
        assert!(options.no_ansi);
        assert!(!options.mouse);
        assert!(options.theme.is_empty());
    }

    #[test]
    fn test_question_spans_hide_empty_mark() {
        let theme = base_theme();
        let context = RenderContext {
            theme: &theme,
            no_ansi: false,
            done: false,
        };
        let spans = question_spans(&context, "", "  Ready? ");
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].content, "Ready?");

        let spans = question_spans(&context, "[?]", "Ready?");
        assert_eq!(spans.len(), 4);
        assert_eq!(spans[0].content, "[?]");
    }
}
