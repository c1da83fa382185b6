//! noneprompt - interactive console prompts on top of ratatui and crossterm
//!
//! Four prompt types are provided: [`InputPrompt`], [`ConfirmPrompt`],
//! [`ListPrompt`] and [`CheckboxPrompt`]. Each one runs in an inline viewport
//! below the cursor and leaves a single answered line behind.
//!
//! ```no_run
//! use noneprompt::{Choice, ListPrompt, Prompt, PromptOptions};
//!
//! let prompt = ListPrompt::new("Pick a fruit", vec![Choice::new("Apple"), Choice::new("Banana")]);
//! let answer = prompt.prompt(&PromptOptions::default())?;
//! println!("{}", answer.value.name());
//! # Ok::<(), noneprompt::PromptError>(())
//! ```

pub mod choice;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod prompts;
pub mod tui;

pub use choice::{Answer, Choice, Selected};
pub use error::{PromptError, Result};
pub use prompts::{
    CheckboxPrompt, ConfirmPrompt, Flow, InputPrompt, ListPrompt, Prompt, PromptOptions,
};
pub use tui::{parse_style, Theme};
