//! Configuration management for noneprompt

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::prompts::PromptOptions;
use crate::tui::Theme;

/// Environment variable that disables colors when set to any non-empty value
pub const NO_COLOR_ENV: &str = "NO_COLOR";

/// User configuration, read from `~/.noneprompt/config.toml`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Disable all colors and text attributes
    #[serde(default)]
    pub no_ansi: bool,

    /// Let list and checkbox prompts react to mouse clicks and scrolling
    #[serde(default = "default_mouse")]
    pub mouse: bool,

    /// Question mark used instead of `[?]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_mark: Option<String>,

    /// Pointer used instead of `❯`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pointer: Option<String>,

    /// Style overrides by class name, e.g. `answer = "fg:#00FF00 bold"`
    #[serde(default)]
    pub styles: BTreeMap<String, String>,
}

fn default_mouse() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            no_ansi: false,
            mouse: default_mouse(),
            question_mark: None,
            pointer: None,
            styles: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Load configuration from file, or return default if not found
    pub fn load() -> Result<Self> {
        Self::load_from(&config_file_path())
    }

    /// Load configuration from a specific path, or return default if not found
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path).context("Failed to read config file")?;
            toml::from_str(&content).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        std::fs::create_dir_all(config_dir()).context("Failed to create config directory")?;
        self.save_to(&config_file_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")?;
        Ok(())
    }

    /// Whether colors should be disabled, honoring `NO_COLOR`
    pub fn no_ansi_with_env(&self) -> bool {
        self.no_ansi || std::env::var_os(NO_COLOR_ENV).is_some_and(|v| !v.is_empty())
    }

    /// Style overrides as a theme
    pub fn theme(&self) -> Result<Theme> {
        Theme::from_rules(&self.styles).context("Invalid style in config file")
    }

    /// Convert to per-invocation prompt options
    pub fn to_prompt_options(&self) -> Result<PromptOptions> {
        Ok(PromptOptions::default()
            .with_no_ansi(self.no_ansi)
            .with_mouse(self.mouse)
            .with_theme(self.theme()?))
    }
}

/// Get the base configuration directory (~/.noneprompt)
/// Falls back to ./.noneprompt if home directory cannot be determined
pub fn config_dir() -> PathBuf {
    try_config_dir().unwrap_or_else(|| {
        tracing::warn!("Could not determine home directory, using current directory for config");
        PathBuf::from(".noneprompt")
    })
}

/// Try to get the base configuration directory, returning None if home dir is unavailable
pub fn try_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".noneprompt"))
}

/// Get the path to the config file
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Get the path to the logs directory
pub fn logs_dir() -> PathBuf {
    config_dir().join("logs")
}

/// Ensure the config and logs directories exist
pub fn ensure_directories() -> Result<()> {
    std::fs::create_dir_all(config_dir()).context("Failed to create config directory")?;
    std::fs::create_dir_all(logs_dir()).context("Failed to create logs directory")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::{Color, Modifier};
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.no_ansi);
        assert!(config.mouse);
        assert!(config.styles.is_empty());
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_parse_styles_table() {
        let config: Config = toml::from_str(
            r##"
no_ansi = true
question_mark = "?"

[styles]
answer = "fg:#00FF00 bold"
pointer = "fg:ansired"
"##,
        )
        .unwrap();
        assert!(config.no_ansi);
        assert!(config.mouse);
        assert_eq!(config.question_mark.as_deref(), Some("?"));

        let options = config.to_prompt_options().unwrap();
        assert!(options.no_ansi);
        let answer = options.theme.resolve("answer");
        assert_eq!(answer.fg, Some(Color::Rgb(0, 0xFF, 0)));
        assert!(answer.add_modifier.contains(Modifier::BOLD));
        assert_eq!(options.theme.resolve("pointer").fg, Some(Color::Red));
    }

    #[test]
    fn test_invalid_style_is_reported() {
        let mut config = Config::default();
        config.styles.insert("answer".into(), "fg:nocolor".into());
        let err = config.to_prompt_options().unwrap_err();
        assert!(err.to_string().contains("Invalid style"));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        let mut config = Config::default();
        config.mouse = false;
        config.pointer = Some(">".into());
        config.styles.insert("question".into(), "italic".into());
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file_is_default() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::load_from(&temp_dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_config_dir_does_not_panic() {
        let dir = config_dir();
        assert!(dir.ends_with(".noneprompt"));
        assert!(logs_dir().ends_with("logs"));
    }
}
