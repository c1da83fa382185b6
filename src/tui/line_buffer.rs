//! Single-line editable text buffer
//!
//! Backs the input line of [`InputPrompt`](crate::prompts::InputPrompt), the
//! answer line of the confirm prompt and the list filter.

use crate::prompts::{Flow, Prompt};
use crate::tui::keys::{KeyBindings, KeyPress};

/// Editable text with a cursor (measured in chars)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineBuffer {
    text: String,
    cursor: usize,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer pre-filled with text, cursor at the end
    pub fn with_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.chars().count();
        Self { text, cursor }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Cursor position in chars
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Text left of the cursor
    pub fn before_cursor(&self) -> &str {
        &self.text[..self.byte_offset(self.cursor)]
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map(|(offset, _)| offset)
            .unwrap_or(self.text.len())
    }

    pub fn insert_char(&mut self, c: char) {
        let offset = self.byte_offset(self.cursor);
        self.text.insert(offset, c);
        self.cursor += 1;
    }

    /// Insert text at the cursor; line breaks are dropped
    pub fn insert_str(&mut self, s: &str) {
        for c in s.chars().filter(|c| *c != '\n' && *c != '\r') {
            self.insert_char(c);
        }
    }

    /// Delete the char before the cursor; returns whether the text changed
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let offset = self.byte_offset(self.cursor);
        self.text.remove(offset);
        true
    }

    /// Delete the char under the cursor; returns whether the text changed
    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.text.chars().count() {
            return false;
        }
        let offset = self.byte_offset(self.cursor);
        self.text.remove(offset);
        true
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.text.chars().count());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text.chars().count();
    }

    /// Replace the whole text, cursor at the end
    pub fn set_text(&mut self, text: impl Into<String>) {
        *self = Self::with_text(text);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Prompt state that owns an editable line
pub trait EditableState {
    fn buffer(&mut self) -> &mut LineBuffer;

    /// Called after every change to the buffer text
    fn on_text_changed(&mut self) {}
}

/// Bind the editing keys (backspace, delete, cursor movement) for a prompt
/// whose state owns a [`LineBuffer`]
pub fn add_editing_bindings<P>(bindings: &mut KeyBindings<P>)
where
    P: Prompt,
    P::State: EditableState,
{
    bindings.add(&[KeyPress::BACKSPACE], backspace::<P>);
    bindings.add(&[KeyPress::DELETE], delete::<P>);
    bindings.add(&[KeyPress::LEFT], move_left::<P>);
    bindings.add(&[KeyPress::RIGHT], move_right::<P>);
    bindings.add(&[KeyPress::HOME], move_home::<P>);
    bindings.add(&[KeyPress::END], move_end::<P>);
}

/// Insert a typed char into the state's buffer
pub fn insert_char<S: EditableState>(state: &mut S, c: char) {
    state.buffer().insert_char(c);
    state.on_text_changed();
}

fn backspace<P>(_: &P, state: &mut P::State) -> Flow<P::Output>
where
    P: Prompt,
    P::State: EditableState,
{
    if state.buffer().backspace() {
        state.on_text_changed();
    }
    Flow::Continue
}

fn delete<P>(_: &P, state: &mut P::State) -> Flow<P::Output>
where
    P: Prompt,
    P::State: EditableState,
{
    if state.buffer().delete() {
        state.on_text_changed();
    }
    Flow::Continue
}

fn move_left<P>(_: &P, state: &mut P::State) -> Flow<P::Output>
where
    P: Prompt,
    P::State: EditableState,
{
    state.buffer().move_left();
    Flow::Continue
}

fn move_right<P>(_: &P, state: &mut P::State) -> Flow<P::Output>
where
    P: Prompt,
    P::State: EditableState,
{
    state.buffer().move_right();
    Flow::Continue
}

fn move_home<P>(_: &P, state: &mut P::State) -> Flow<P::Output>
where
    P: Prompt,
    P::State: EditableState,
{
    state.buffer().move_home();
    Flow::Continue
}

fn move_end<P>(_: &P, state: &mut P::State) -> Flow<P::Output>
where
    P: Prompt,
    P::State: EditableState,
{
    state.buffer().move_end();
    Flow::Continue
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_backspace() {
        let mut buffer = LineBuffer::new();
        buffer.insert_str("héllo");
        assert_eq!(buffer.text(), "héllo");
        assert_eq!(buffer.cursor(), 5);

        assert!(buffer.backspace());
        assert_eq!(buffer.text(), "héll");
    }

    #[test]
    fn test_backspace_at_start_is_noop() {
        let mut buffer = LineBuffer::with_text("ab");
        buffer.move_home();
        assert!(!buffer.backspace());
        assert_eq!(buffer.text(), "ab");
    }

    #[test]
    fn test_edit_in_middle() {
        let mut buffer = LineBuffer::with_text("ac");
        buffer.move_left();
        buffer.insert_char('b');
        assert_eq!(buffer.text(), "abc");
        assert_eq!(buffer.before_cursor(), "ab");

        assert!(buffer.delete());
        assert_eq!(buffer.text(), "ab");
        assert!(!buffer.delete());
    }

    #[test]
    fn test_cursor_is_clamped() {
        let mut buffer = LineBuffer::with_text("é");
        buffer.move_right();
        assert_eq!(buffer.cursor(), 1);
        buffer.move_left();
        buffer.move_left();
        assert_eq!(buffer.cursor(), 0);
        buffer.move_end();
        assert_eq!(buffer.before_cursor(), "é");
    }

    #[test]
    fn test_insert_str_drops_newlines() {
        let mut buffer = LineBuffer::new();
        buffer.insert_str("one\r\ntwo\n");
        assert_eq!(buffer.text(), "onetwo");
    }

    #[test]
    fn test_set_text_and_clear() {
        let mut buffer = LineBuffer::new();
        buffer.set_text("Yes");
        assert_eq!(buffer.cursor(), 3);
        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.cursor(), 0);
    }
}
