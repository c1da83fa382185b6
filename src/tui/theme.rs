//! Class-based styling for prompt layouts
//!
//! Prompts tag every span with a class name (`question`, `pointer`, `answer`, ...).
//! A [`Theme`] is an ordered list of class rules; later rules are patched over
//! earlier ones, so user overrides simply follow the prompt defaults.

use std::str::FromStr;

use ratatui::style::{Color, Modifier, Style};

use crate::error::{PromptError, Result};

/// Ordered class -> style rules
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Theme {
    rules: Vec<(String, Style)>,
}

impl Theme {
    /// Empty theme (every class resolves to the terminal default)
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a theme from `(class, style description)` pairs
    pub fn from_rules<I, K, V>(rules: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let mut theme = Self::new();
        for (class, spec) in rules {
            theme.push(class, parse_style(spec.as_ref())?);
        }
        Ok(theme)
    }

    /// Append a rule parsed from a style description
    pub fn with_rule(mut self, class: impl Into<String>, spec: &str) -> Result<Self> {
        self.push(class, parse_style(spec)?);
        Ok(self)
    }

    /// Append a rule
    pub fn push(&mut self, class: impl Into<String>, style: Style) {
        self.rules.push((class.into(), style));
    }

    /// Return a theme with `overrides` applied after this theme's rules
    pub fn merge(&self, overrides: &Theme) -> Theme {
        let mut rules = self.rules.clone();
        rules.extend(overrides.rules.iter().cloned());
        Theme { rules }
    }

    /// Resolve the effective style of a class
    pub fn resolve(&self, class: &str) -> Style {
        self.rules
            .iter()
            .filter(|(name, _)| name == class)
            .fold(Style::default(), |acc, (_, style)| acc.patch(*style))
    }

    /// Whether any rule targets the class
    pub fn has_class(&self, class: &str) -> bool {
        self.rules.iter().any(|(name, _)| name == class)
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Parse a style description such as `"fg:#673AB7 bold"` or `"fg:ansigreen noreverse"`
pub fn parse_style(spec: &str) -> Result<Style> {
    let mut style = Style::default();

    for token in spec.split_whitespace() {
        let lower = token.to_ascii_lowercase();

        if let Some(color) = lower.strip_prefix("fg:") {
            style = style.fg(parse_color(color, token)?);
        } else if let Some(color) = lower.strip_prefix("bg:") {
            style = style.bg(parse_color(color, token)?);
        } else if let Some(modifier) = modifier_for(&lower) {
            style = style.add_modifier(modifier);
        } else if let Some(modifier) = lower.strip_prefix("no").and_then(modifier_for) {
            style = style.remove_modifier(modifier);
        } else if let Ok(color) = parse_color(&lower, token) {
            // A bare color is a foreground color
            style = style.fg(color);
        } else {
            return Err(PromptError::Style {
                token: token.to_string(),
                reason: "unknown attribute".to_string(),
            });
        }
    }

    Ok(style)
}

fn modifier_for(name: &str) -> Option<Modifier> {
    match name {
        "bold" => Some(Modifier::BOLD),
        "dim" => Some(Modifier::DIM),
        "italic" => Some(Modifier::ITALIC),
        "underline" => Some(Modifier::UNDERLINED),
        "blink" => Some(Modifier::SLOW_BLINK),
        "reverse" => Some(Modifier::REVERSED),
        "hidden" => Some(Modifier::HIDDEN),
        "strike" => Some(Modifier::CROSSED_OUT),
        _ => None,
    }
}

fn parse_color(value: &str, token: &str) -> Result<Color> {
    let name = value.strip_prefix("ansi").unwrap_or(value);
    let color = match name {
        "default" | "" => Some(Color::Reset),
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "gray" | "grey" => Some(Color::Gray),
        "brightblack" => Some(Color::DarkGray),
        "brightred" => Some(Color::LightRed),
        "brightgreen" => Some(Color::LightGreen),
        "brightyellow" => Some(Color::LightYellow),
        "brightblue" => Some(Color::LightBlue),
        "brightmagenta" => Some(Color::LightMagenta),
        "brightcyan" => Some(Color::LightCyan),
        "white" => Some(Color::White),
        _ => None,
    };

    match color {
        Some(color) => Ok(color),
        None => Color::from_str(value).map_err(|_| PromptError::Style {
            token: token.to_string(),
            reason: format!("unknown color '{}'", value),
        }),
    }
}
