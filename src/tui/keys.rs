//! Key-binding tables
//!
//! Each prompt registers its keys in a [`KeyBindings`] table. Lookups walk the
//! table in registration order and the first matching binding wins.

use std::fmt;
use std::str::FromStr;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::prompts::{Flow, Prompt};

/// A key plus the modifiers that must be held
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyPress {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyPress {
    pub const ENTER: KeyPress = KeyPress::plain(KeyCode::Enter);
    pub const UP: KeyPress = KeyPress::plain(KeyCode::Up);
    pub const DOWN: KeyPress = KeyPress::plain(KeyCode::Down);
    pub const LEFT: KeyPress = KeyPress::plain(KeyCode::Left);
    pub const RIGHT: KeyPress = KeyPress::plain(KeyCode::Right);
    pub const HOME: KeyPress = KeyPress::plain(KeyCode::Home);
    pub const END: KeyPress = KeyPress::plain(KeyCode::End);
    pub const SPACE: KeyPress = KeyPress::plain(KeyCode::Char(' '));
    pub const BACKSPACE: KeyPress = KeyPress::plain(KeyCode::Backspace);
    pub const DELETE: KeyPress = KeyPress::plain(KeyCode::Delete);
    pub const CTRL_C: KeyPress = KeyPress::ctrl('c');
    pub const CTRL_Q: KeyPress = KeyPress::ctrl('q');

    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// A key without modifiers
    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    /// Ctrl + character
    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    /// Check whether a terminal key event triggers this binding
    ///
    /// Shift is ignored (it is already folded into the character), and
    /// control chords compare characters case-insensitively.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        let relevant = KeyModifiers::CONTROL | KeyModifiers::ALT;
        if (event.modifiers & relevant) != (self.modifiers & relevant) {
            return false;
        }
        match (self.code, event.code) {
            (KeyCode::Char(expected), KeyCode::Char(actual))
                if self.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                expected.eq_ignore_ascii_case(&actual)
            }
            (expected, actual) => expected == actual,
        }
    }
}

impl FromStr for KeyPress {
    type Err = String;

    /// Parse key names such as `enter`, `up`, `space`, `c-c` or a single character
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        if let Some(rest) = lower.strip_prefix("c-") {
            let mut chars = rest.chars();
            return match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(KeyPress::ctrl(c)),
                _ => Err(format!("invalid control key: {}", s)),
            };
        }

        let code = match lower.as_str() {
            "enter" => KeyCode::Enter,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "space" => KeyCode::Char(' '),
            "tab" => KeyCode::Tab,
            "backspace" => KeyCode::Backspace,
            "delete" => KeyCode::Delete,
            "escape" | "esc" => KeyCode::Esc,
            _ => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c),
                    _ => return Err(format!("unknown key: {}", s)),
                }
            }
        };
        Ok(KeyPress::plain(code))
    }
}

impl fmt::Display for KeyPress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            write!(f, "c-")?;
        }
        match self.code {
            KeyCode::Enter => write!(f, "enter"),
            KeyCode::Up => write!(f, "up"),
            KeyCode::Down => write!(f, "down"),
            KeyCode::Left => write!(f, "left"),
            KeyCode::Right => write!(f, "right"),
            KeyCode::Home => write!(f, "home"),
            KeyCode::End => write!(f, "end"),
            KeyCode::Tab => write!(f, "tab"),
            KeyCode::Backspace => write!(f, "backspace"),
            KeyCode::Delete => write!(f, "delete"),
            KeyCode::Esc => write!(f, "escape"),
            KeyCode::Char(' ') => write!(f, "space"),
            KeyCode::Char(c) => write!(f, "{}", c),
            other => write!(f, "{:?}", other),
        }
    }
}

/// Handler invoked when a bound key is pressed
pub type Handler<P> = fn(&P, &mut <P as Prompt>::State) -> Flow<<P as Prompt>::Output>;

/// Ordered key -> handler table for one prompt type
pub struct KeyBindings<P: Prompt> {
    bindings: Vec<(KeyPress, Handler<P>)>,
}

impl<P: Prompt> Default for KeyBindings<P> {
    fn default() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }
}

impl<P: Prompt> KeyBindings<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for one or more keys
    pub fn add(&mut self, keys: &[KeyPress], handler: Handler<P>) {
        for key in keys {
            self.bindings.push((*key, handler));
        }
    }

    /// Builder form of [`KeyBindings::add`]
    pub fn bind(mut self, keys: &[KeyPress], handler: Handler<P>) -> Self {
        self.add(keys, handler);
        self
    }

    /// Find the handler for a key event
    pub fn lookup(&self, event: &KeyEvent) -> Option<Handler<P>> {
        self.bindings
            .iter()
            .find(|(key, _)| key.matches(event))
            .map(|(_, handler)| *handler)
    }

    /// Bound keys in registration order
    pub fn keys(&self) -> impl Iterator<Item = &KeyPress> {
        self.bindings.iter().map(|(key, _)| key)
    }

    /// Whether a key is bound
    pub fn contains(&self, key: &KeyPress) -> bool {
        self.bindings.iter().any(|(bound, _)| bound == key)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
