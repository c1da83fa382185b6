//! Single-choice list prompt with filtering and auto scrolling
//!
//! Style classes:
//!
//! ```text
//! [?] Choose a choice and return? (Use ↑ and ↓ to choose, Enter to submit) input
//! └┬┘ └──────────────┬──────────┘ └────────────────────┬─────────────────┘ └─┬─┘
//! questionmark    question                         annotation              filter
//!
//!  ❯  choice selected
//! └┬┘ └───────┬─────┘
//! pointer  selected
//!
//!     choice unselected
//!     └───────┬───────┘
//!         unselected
//! ```

use std::time::{Duration, Instant};

use crossterm::event::{MouseButton, MouseEventKind};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use super::scroll::ScrollWindow;
use super::{
    annotation_style, base_theme, error_style, highlight_style, question_spans,
    render_error_line, Flow, Prompt, Validator,
};
use crate::choice::{Choice, Selected};
use crate::tui::line_buffer::{add_editing_bindings, insert_char, EditableState};
use crate::tui::{KeyBindings, KeyPress, LineBuffer, RenderContext, Theme};

/// Default annotation shown next to the question
pub const DEFAULT_LIST_ANNOTATION: &str = "(Use ↑ and ↓ to choose, Enter to submit)";

/// Two releases on the same row within this window finish the prompt
const DOUBLE_CLICK: Duration = Duration::from_millis(300);

type ChoiceFilter<T> = Box<dyn Fn(&str, &Choice<T>) -> bool + Send + Sync>;

/// Pick one choice from a list
pub struct ListPrompt<T = ()> {
    question: String,
    choices: Vec<Choice<T>>,
    allow_filter: bool,
    default_select: Option<usize>,
    question_mark: String,
    pointer: String,
    annotation: String,
    max_height: Option<usize>,
    filter: ChoiceFilter<T>,
    validator: Option<Validator<Choice<T>>>,
    error_message: String,
}

impl<T> ListPrompt<T> {
    pub fn new(question: impl Into<String>, choices: Vec<Choice<T>>) -> Self {
        Self {
            question: question.into(),
            choices,
            allow_filter: true,
            default_select: None,
            question_mark: super::DEFAULT_QUESTION_MARK.to_string(),
            pointer: super::DEFAULT_POINTER.to_string(),
            annotation: DEFAULT_LIST_ANNOTATION.to_string(),
            max_height: None,
            filter: Box::new(|text, choice| {
                choice.name.to_lowercase().contains(&text.to_lowercase())
            }),
            validator: None,
            error_message: super::DEFAULT_SELECTION_ERROR.to_string(),
        }
    }

    /// Let typed text narrow down the choices
    pub fn allow_filter(mut self, allow: bool) -> Self {
        self.allow_filter = allow;
        self
    }

    /// Initially pointed-at choice, taken modulo the number of choices
    pub fn default_select(mut self, index: Option<usize>) -> Self {
        self.default_select = index;
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

    pub fn annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotation = annotation.into();
        self
    }

    /// Rows used by the prompt, including the question line.
    /// Defaults to the terminal height.
    pub fn max_height(mut self, rows: usize) -> Self {
        self.max_height = Some(rows);
        self
    }

    /// Replace the default case-insensitive substring filter
    pub fn filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&str, &Choice<T>) -> bool + Send + Sync + 'static,
    {
        self.filter = Box::new(filter);
        self
    }

    pub fn validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&Choice<T>) -> bool + Send + Sync + 'static,
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

    /// Positions (in the offered list) of the choices passing the filter
    ///
    /// The filter also runs when typing is disabled, with empty text.
    fn filtered(&self, state: &ListState) -> Vec<usize> {
        let text = state.buffer.text();
        self.choices
            .iter()
            .enumerate()
            .filter(|(_, choice)| (self.filter)(text, choice))
            .map(|(index, _)| index)
            .collect()
    }

    fn pointer_width(&self) -> usize {
        Span::raw(self.pointer.as_str()).width()
    }
}

impl<T: Clone> ListPrompt<T> {
    fn move_up(&self, state: &mut ListState) -> Flow<Selected<T>> {
        state.invalid = false;
        let len = self.filtered(state).len();
        state.window.up(len);
        Flow::Continue
    }

    fn move_down(&self, state: &mut ListState) -> Flow<Selected<T>> {
        state.invalid = false;
        let len = self.filtered(state).len();
        state.window.down(len);
        Flow::Continue
    }

    fn submit(&self, state: &mut ListState) -> Flow<Selected<T>> {
        state.invalid = false;
        self.finish(state)
    }

    fn cancel(&self, state: &mut ListState) -> Flow<Selected<T>> {
        state.invalid = false;
        Flow::Cancel
    }

    fn finish(&self, state: &mut ListState) -> Flow<Selected<T>> {
        let filtered = self.filtered(state);
        let Some(&index) = filtered.get(state.window.index) else {
            return Flow::Continue;
        };
        let choice = &self.choices[index];

        if let Some(validator) = &self.validator {
            if !validator(choice) {
                tracing::debug!(choice = %choice.label(), "Selection rejected by validator");
                state.invalid = true;
                return Flow::Continue;
            }
        }

        state.answered = Some(choice.label().to_string());
        state.buffer.clear();
        Flow::Submit(Selected::new(index, choice.clone()))
    }
}

/// Per-run state of [`ListPrompt`]
#[derive(Debug, Clone)]
pub struct ListState {
    buffer: LineBuffer,
    window: ScrollWindow,
    invalid: bool,
    answered: Option<String>,
    last_click: Option<(Instant, usize)>,
}

impl ListState {
    /// Position of the pointer within the filtered choices
    pub fn index(&self) -> usize {
        self.window.index
    }

    pub fn filter_text(&self) -> &str {
        self.buffer.text()
    }

    pub fn is_invalid(&self) -> bool {
        self.invalid
    }
}

impl EditableState for ListState {
    fn buffer(&mut self) -> &mut LineBuffer {
        &mut self.buffer
    }

    fn on_text_changed(&mut self) {
        self.window.reset();
        self.invalid = false;
    }
}

impl<T: Clone> Prompt for ListPrompt<T> {
    type Output = Selected<T>;
    type State = ListState;

    fn question(&self) -> &str {
        &self.question
    }

    fn init_state(&self, terminal_rows: u16) -> ListState {
        let len = self.choices.len();
        let mut window = ScrollWindow::new(self.max_height.unwrap_or(terminal_rows as usize));
        if let Some(index) = self.default_select.filter(|_| len > 0) {
            window.show(index % len, len);
        }
        ListState {
            buffer: LineBuffer::new(),
            window,
            invalid: false,
            answered: None,
            last_click: None,
        }
    }

    fn build_keybindings(&self) -> KeyBindings<Self> {
        let mut kb = KeyBindings::<Self>::new()
            .bind(&[KeyPress::UP], Self::move_up)
            .bind(&[KeyPress::DOWN], Self::move_down)
            .bind(&[KeyPress::ENTER], Self::submit)
            .bind(&[KeyPress::CTRL_C, KeyPress::CTRL_Q], Self::cancel);
        if self.allow_filter {
            add_editing_bindings(&mut kb);
        }
        kb
    }

    fn default_theme(&self) -> Theme {
        let mut theme = base_theme();
        theme.push("annotation", annotation_style());
        theme.push("selected", highlight_style());
        theme.push("error", error_style());
        theme
    }

    fn handle_char(&self, state: &mut ListState, c: char) -> Flow<Selected<T>> {
        if self.allow_filter {
            insert_char(state, c);
        }
        Flow::Continue
    }

    fn handle_mouse(&self, state: &mut ListState, kind: MouseEventKind, row: u16) -> Flow<Selected<T>> {
        state.invalid = false;
        let len = self.filtered(state).len();
        match kind {
            MouseEventKind::Up(MouseButton::Left) => {
                let Some(index) = state.window.index_at_row(row, len) else {
                    return Flow::Continue;
                };
                state.window.jump_to(index, len);

                let now = Instant::now();
                let double = matches!(
                    state.last_click,
                    Some((at, last)) if last == index && now.duration_since(at) < DOUBLE_CLICK
                );
                if double {
                    state.last_click = None;
                    return self.finish(state);
                }
                state.last_click = Some((now, index));
                Flow::Continue
            }
            MouseEventKind::ScrollUp => {
                state.window.up(len);
                Flow::Continue
            }
            MouseEventKind::ScrollDown => {
                state.window.down(len);
                Flow::Continue
            }
            _ => Flow::Continue,
        }
    }

    fn height(&self, state: &ListState) -> u16 {
        let rows = (self.choices.len() + 1).min(state.window.max_height);
        rows.min(u16::MAX as usize) as u16
    }

    fn render(&self, state: &ListState, context: &RenderContext<'_>, frame: &mut Frame, area: Rect) {
        if area.height == 0 {
            return;
        }

        let mut spans = question_spans(context, &self.question_mark, &self.question);
        match &state.answered {
            Some(name) => spans.push(context.span("answer", name.as_str())),
            None => {
                spans.push(context.span("annotation", self.annotation.as_str()));
                spans.push(Span::raw(" "));
            }
        }
        let prefix_width = Line::from(spans.clone()).width() as u16;
        if self.allow_filter {
            spans.push(context.span("filter", state.buffer.text().to_string()));
        }
        let prompt_area = Rect::new(area.x, area.y, area.width, 1);
        frame.render_widget(Paragraph::new(Line::from(spans)), prompt_area);

        if context.done {
            return;
        }

        if self.allow_filter {
            let typed = Span::raw(state.buffer.before_cursor()).width() as u16;
            let cursor_x = (area.x + prefix_width + typed).min(area.right().saturating_sub(1));
            frame.set_cursor(cursor_x, area.y);
        }

        let filtered = self.filtered(state);
        let padding = " ".repeat(self.pointer_width());
        let lines: Vec<Line> = state
            .window
            .visible_range(filtered.len())
            .map(|position| {
                let name = self.choices[filtered[position]].label();
                if position == state.window.index {
                    Line::from(vec![
                        context.span("pointer", self.pointer.as_str()),
                        Span::raw(" "),
                        context.span("selected", name),
                    ])
                } else {
                    Line::from(vec![
                        Span::raw(padding.clone()),
                        Span::raw(" "),
                        context.span("unselected", name),
                    ])
                }
            })
            .collect();

        let choices_area = Rect::new(area.x, area.y + 1, area.width, area.height - 1);
        frame.render_widget(Paragraph::new(lines), choices_area);

        if state.invalid {
            render_error_line(context, &self.error_message, frame, area);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PromptError;
    use crate::prompts::PromptOptions;
    use crate::tui::application::testing::*;
    use crossterm::event::KeyCode;

    fn fruits() -> Vec<Choice> {
        ["Apple", "Banana", "Cherry", "Durian", "Elderberry"]
            .into_iter()
            .map(Choice::from)
            .collect()
    }

    #[test]
    fn test_render_active() {
        let prompt = ListPrompt::new("Pick?", fruits()).max_height(4);
        let state = prompt.init_state(24);
        let lines = render_lines(&prompt, &state, false, 4);
        assert_eq!(
            lines[0],
            "[?] Pick? (Use ↑ and ↓ to choose, Enter to submit)"
        );
        assert_eq!(lines[1], "❯ Apple");
        assert_eq!(lines[2], "  Banana");
        assert_eq!(lines[3], "  Cherry");
    }

    #[test]
    fn test_height_is_capped() {
        let prompt = ListPrompt::new("Pick?", fruits());
        assert_eq!(prompt.height(&prompt.init_state(24)), 6);
        assert_eq!(prompt.height(&prompt.init_state(3)), 3);
    }

    #[test]
    fn test_move_and_submit() {
        let prompt = ListPrompt::new("Pick?", fruits());
        let events = vec![
            key(KeyCode::Down),
            key(KeyCode::Down),
            key(KeyCode::Up),
            key(KeyCode::Enter),
        ];
        let (outcome, lines) = run_scripted(&prompt, &PromptOptions::default(), 6, events);
        let selected = outcome.unwrap();
        assert_eq!(selected.index, 1);
        assert_eq!(selected.name(), "Banana");
        // Done layout is a single line
        assert_eq!(lines[0], "[?] Pick? Banana");
        assert!(lines[1..].iter().all(|line| line.is_empty()));
    }

    #[test]
    fn test_up_wraps_to_last() {
        let prompt = ListPrompt::new("Pick?", fruits());
        let (outcome, _) = run_scripted(
            &prompt,
            &PromptOptions::default(),
            6,
            vec![key(KeyCode::Up), key(KeyCode::Enter)],
        );
        assert_eq!(outcome.unwrap().name(), "Elderberry");
    }

    #[test]
    fn test_filter_reports_original_index() {
        let prompt = ListPrompt::new("Pick?", fruits());
        let mut events = typed("ERR");
        events.push(key(KeyCode::Enter));
        let (outcome, lines) = run_scripted(&prompt, &PromptOptions::default(), 6, events);
        let selected = outcome.unwrap();
        assert_eq!(selected.index, 2);
        assert_eq!(selected.name(), "Cherry");
        // Filter text is cleared on submit
        assert_eq!(lines[0], "[?] Pick? Cherry");
    }

    #[test]
    fn test_filter_change_resets_pointer() {
        let prompt = ListPrompt::new("Pick?", fruits());
        let mut state = prompt.init_state(24);
        prompt.move_down(&mut state);
        prompt.move_down(&mut state);
        assert_eq!(state.index(), 2);

        insert_char(&mut state, 'e');
        assert_eq!(state.index(), 0);
        assert_eq!(state.filter_text(), "e");
    }

    #[test]
    fn test_enter_without_matches_does_nothing() {
        let prompt = ListPrompt::new("Pick?", fruits());
        let mut state = prompt.init_state(24);
        for c in "zzz".chars() {
            insert_char(&mut state, c);
        }
        assert_eq!(prompt.submit(&mut state), Flow::Continue);
        assert!(!state.is_invalid());
    }

    #[test]
    fn test_filter_disabled_ignores_typing() {
        let prompt = ListPrompt::new("Pick?", fruits()).allow_filter(false);
        assert!(!prompt.build_keybindings().contains(&KeyPress::BACKSPACE));
        let mut events = typed("dur");
        events.push(key(KeyCode::Enter));
        let (outcome, _) = run_scripted(&prompt, &PromptOptions::default(), 6, events);
        assert_eq!(outcome.unwrap().name(), "Apple");
    }

    #[test]
    fn test_default_select_positions_pointer() {
        let prompt = ListPrompt::new("Pick?", fruits()).default_select(Some(8));
        let (outcome, _) = run_scripted(
            &prompt,
            &PromptOptions::default(),
            6,
            vec![key(KeyCode::Enter)],
        );
        assert_eq!(outcome.unwrap().index, 3);
    }

    #[test]
    fn test_default_select_past_first_page_is_visible() {
        let prompt = ListPrompt::new("Pick?", fruits())
            .max_height(3)
            .default_select(Some(3));
        let state = prompt.init_state(24);
        assert_eq!(state.index(), 3);
        let lines = render_lines(&prompt, &state, false, 3);
        assert_eq!(lines[1], "  Cherry");
        assert_eq!(lines[2], "❯ Durian");
    }

    #[test]
    fn test_custom_filter_applies_without_typing() {
        let choices = vec![Choice::new("_hidden"), Choice::new("shown")];
        let prompt = ListPrompt::new("Pick?", choices)
            .allow_filter(false)
            .filter(|_, choice| !choice.name.starts_with('_'));
        let mut state = prompt.init_state(24);
        let lines = render_lines(&prompt, &state, false, 3);
        assert_eq!(lines[1], "❯ shown");

        let Flow::Submit(selected) = prompt.submit(&mut state) else {
            panic!("expected a submission");
        };
        assert_eq!(selected.name(), "shown");
        assert_eq!(selected.index, 1);
    }

    #[test]
    fn test_validator_sets_error_until_moved() {
        let prompt = ListPrompt::new("Pick?", fruits())
            .validator(|choice| choice.name != "Apple")
            .error_message("Not that one");
        let mut state = prompt.init_state(6);

        assert_eq!(prompt.submit(&mut state), Flow::Continue);
        assert!(state.is_invalid());
        let lines = render_lines(&prompt, &state, false, 6);
        assert_eq!(lines[5], "Not that one");

        prompt.move_down(&mut state);
        assert!(!state.is_invalid());
        let Flow::Submit(selected) = prompt.submit(&mut state) else {
            panic!("expected a submission");
        };
        assert_eq!(selected.name(), "Banana");
    }

    #[test]
    fn test_window_scrolls_with_pointer() {
        let prompt = ListPrompt::new("Pick?", fruits()).max_height(3);
        let mut state = prompt.init_state(24);
        prompt.move_down(&mut state);
        let lines = render_lines(&prompt, &state, false, 3);
        // Window scrolled by one row as the pointer reached its last row
        assert_eq!(lines[1], "❯ Banana");
        assert_eq!(lines[2], "  Cherry");
    }

    #[test]
    fn test_click_then_double_click_finishes() {
        let prompt = ListPrompt::new("Pick?", fruits());
        let events = vec![click(3), click(3)];
        let (outcome, _) = run_scripted(&prompt, &PromptOptions::default(), 6, events);
        assert_eq!(outcome.unwrap().name(), "Cherry");
    }

    #[test]
    fn test_click_on_prompt_line_is_ignored() {
        let prompt = ListPrompt::new("Pick?", fruits());
        let mut state = prompt.init_state(6);
        let flow = prompt.handle_mouse(&mut state, MouseEventKind::Up(MouseButton::Left), 0);
        assert_eq!(flow, Flow::Continue);
        assert_eq!(state.index(), 0);

        prompt.handle_mouse(&mut state, MouseEventKind::ScrollDown, 0);
        assert_eq!(state.index(), 1);
    }

    #[test]
    fn test_empty_choices() {
        let prompt: ListPrompt = ListPrompt::new("Pick?", Vec::new());
        let mut state = prompt.init_state(24);
        assert_eq!(prompt.height(&state), 1);
        assert_eq!(prompt.move_down(&mut state), Flow::Continue);
        assert_eq!(prompt.submit(&mut state), Flow::Continue);

        let (outcome, _) = run_scripted(
            &prompt,
            &PromptOptions::default(),
            2,
            vec![key(KeyCode::Enter), ctrl('q')],
        );
        assert!(matches!(outcome, Err(PromptError::Cancelled)));
    }
}
