//! Command-line interface
//!
//! Each subcommand runs one prompt. Style flags are collected into theme
//! rules and applied over the styles from the config file.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use crate::choice::{Choice, Selected};
use crate::config::Config;
use crate::prompts::{
    parse_bool, CheckboxPrompt, ConfirmPrompt, InputPrompt, ListPrompt, Prompt, PromptOptions,
};
use crate::tui::Theme;

/// A simple prompt toolkit.
#[derive(Parser, Debug)]
#[command(name = "noneprompt", author, version, about, long_about = None)]
pub struct Cli {
    /// Disable ANSI colors
    #[arg(long)]
    pub no_ansi: bool,

    /// Default answer when cancelled
    #[arg(short = 'd', long = "default", value_name = "TEXT")]
    pub default: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Prompt type
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Input prompt.
    Input(InputArgs),
    /// Confirm prompt.
    Confirm(ConfirmArgs),
    /// List prompt.
    List(ListArgs),
    /// Checkbox prompt.
    Checkbox(CheckboxArgs),
}

/// Options shared by every prompt type
#[derive(Args, Debug, Default)]
pub struct CommonArgs {
    /// Question mark
    #[arg(long)]
    pub question_mark: Option<String>,

    /// Question mark style
    #[arg(long, value_name = "STYLE")]
    pub question_mark_style: Option<String>,

    /// Question style
    #[arg(long, value_name = "STYLE")]
    pub question_style: Option<String>,

    /// Answer style
    #[arg(long, value_name = "STYLE")]
    pub answer_style: Option<String>,
}

/// Pointer and annotation options of the list-like prompts
#[derive(Args, Debug, Default)]
pub struct ChoiceArgs {
    /// Annotation text
    #[arg(long)]
    pub annotation: Option<String>,

    /// Annotation style
    #[arg(long, value_name = "STYLE")]
    pub annotation_style: Option<String>,

    /// Pointer mark
    #[arg(short = 'p', long)]
    pub pointer: Option<String>,

    /// Pointer mark style
    #[arg(long, value_name = "STYLE")]
    pub pointer_style: Option<String>,

    /// Selected choice style
    #[arg(long, value_name = "STYLE")]
    pub select_style: Option<String>,

    /// Unselected choice style
    #[arg(long, value_name = "STYLE")]
    pub unselect_style: Option<String>,
}

#[derive(Args, Debug)]
pub struct InputArgs {
    /// Prompt question
    pub question: String,

    /// Default text
    #[arg(short = 'd', long)]
    pub default_text: Option<String>,

    /// Mask the typed text
    #[arg(long)]
    pub password: bool,

    /// Input text style
    #[arg(long, value_name = "STYLE")]
    pub input_style: Option<String>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Args, Debug)]
pub struct ConfirmArgs {
    /// Prompt question
    pub question: String,

    /// Default choice
    #[arg(short = 'd', long, value_name = "BOOL", value_parser = parse_bool_arg)]
    pub default_choice: Option<bool>,

    /// Annotation style
    #[arg(long, value_name = "STYLE")]
    pub annotation_style: Option<String>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Prompt question
    pub question: String,

    /// Choices
    #[arg(required = true)]
    pub choices: Vec<String>,

    /// Default select
    #[arg(short = 'd', long, value_name = "INDEX")]
    pub default_select: Option<usize>,

    /// Filter text style
    #[arg(long, value_name = "STYLE")]
    pub filter_style: Option<String>,

    #[command(flatten)]
    pub choice: ChoiceArgs,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Args, Debug)]
pub struct CheckboxArgs {
    /// Prompt question
    pub question: String,

    /// Choices
    #[arg(required = true)]
    pub choices: Vec<String>,

    /// Default select (repeatable)
    #[arg(short = 'd', long, value_name = "INDEX")]
    pub default_select: Vec<usize>,

    /// Sign mark
    #[arg(short = 's', long)]
    pub sign: Option<String>,

    /// Sign mark style
    #[arg(long, value_name = "STYLE")]
    pub sign_style: Option<String>,

    /// Unsign mark
    #[arg(short = 'u', long)]
    pub unsign: Option<String>,

    /// Unsign mark style
    #[arg(long, value_name = "STYLE")]
    pub unsign_style: Option<String>,

    #[command(flatten)]
    pub choice: ChoiceArgs,

    #[command(flatten)]
    pub common: CommonArgs,
}

fn parse_bool_arg(value: &str) -> std::result::Result<bool, String> {
    parse_bool(value.trim()).ok_or_else(|| format!("'{}' is not a boolean (yes/no)", value))
}

/// Collect the `(class, style)` pairs that were given on the command line
fn style_rules<'a>(rules: &[(&'static str, &'a Option<String>)]) -> Vec<(&'static str, &'a str)> {
    rules
        .iter()
        .filter_map(|(class, style)| style.as_deref().map(|s| (*class, s)))
        .collect()
}

impl CommonArgs {
    fn rules(&self) -> Vec<(&'static str, &str)> {
        style_rules(&[
            ("questionmark", &self.question_mark_style),
            ("question", &self.question_style),
            ("answer", &self.answer_style),
        ])
    }
}

impl ChoiceArgs {
    fn rules(&self) -> Vec<(&'static str, &str)> {
        style_rules(&[
            ("annotation", &self.annotation_style),
            ("pointer", &self.pointer_style),
            ("selected", &self.select_style),
            ("unselected", &self.unselect_style),
        ])
    }
}

impl Command {
    /// Style rules given for this subcommand
    pub fn style_rules(&self) -> Vec<(&'static str, &str)> {
        match self {
            Command::Input(args) => {
                let mut rules = args.common.rules();
                rules.extend(style_rules(&[("input", &args.input_style)]));
                rules
            }
            Command::Confirm(args) => {
                let mut rules = args.common.rules();
                rules.extend(style_rules(&[("annotation", &args.annotation_style)]));
                rules
            }
            Command::List(args) => {
                let mut rules = args.common.rules();
                rules.extend(args.choice.rules());
                rules.extend(style_rules(&[("filter", &args.filter_style)]));
                rules
            }
            Command::Checkbox(args) => {
                let mut rules = args.common.rules();
                rules.extend(args.choice.rules());
                rules.extend(style_rules(&[
                    ("sign", &args.sign_style),
                    ("unsign", &args.unsign_style),
                ]));
                rules
            }
        }
    }

    fn common(&self) -> &CommonArgs {
        match self {
            Command::Input(args) => &args.common,
            Command::Confirm(args) => &args.common,
            Command::List(args) => &args.common,
            Command::Checkbox(args) => &args.common,
        }
    }
}

impl Cli {
    /// Prompt options from the config file, the environment and the flags
    pub fn prompt_options(&self, config: &Config) -> Result<PromptOptions> {
        let flags = Theme::from_rules(self.command.style_rules())
            .context("Invalid style option")?;
        let theme = config.theme()?.merge(&flags);

        Ok(PromptOptions::default()
            .with_no_ansi(self.no_ansi || config.no_ansi_with_env())
            .with_mouse(config.mouse)
            .with_theme(theme))
    }

    fn question_mark(&self, config: &Config) -> Option<String> {
        self.command
            .common()
            .question_mark
            .clone()
            .or_else(|| config.question_mark.clone())
    }
}

fn pointer(choice: &ChoiceArgs, config: &Config) -> Option<String> {
    choice.pointer.clone().or_else(|| config.pointer.clone())
}

/// Run the prompt selected on the command line
///
/// Returns an error wrapping [`PromptError::Cancelled`](crate::PromptError::Cancelled)
/// when the user cancels and no `--default` was given.
pub fn run(cli: &Cli, config: &Config) -> Result<()> {
    let options = cli.prompt_options(config)?;
    let question_mark = cli.question_mark(config);
    let default = cli.default.as_deref();

    match &cli.command {
        Command::Input(args) => {
            let mut prompt = InputPrompt::new(&args.question).password(args.password);
            if let Some(text) = &args.default_text {
                prompt = prompt.default_text(text);
            }
            if let Some(mark) = question_mark {
                prompt = prompt.question_mark(mark);
            }
            finish(&prompt, &options, default.map(str::to_string))
        }
        Command::Confirm(args) => {
            let fallback = default
                .map(|text| {
                    parse_bool(text.trim())
                        .with_context(|| format!("Default answer '{}' is not a boolean", text))
                })
                .transpose()?;
            let mut prompt = ConfirmPrompt::new(&args.question).default_choice(args.default_choice);
            if let Some(mark) = question_mark {
                prompt = prompt.question_mark(mark);
            }
            finish(&prompt, &options, fallback)
        }
        Command::List(args) => {
            let choices: Vec<Choice> = args.choices.iter().map(|name| Choice::new(name.as_str())).collect();
            let fallback = default.map(|name| default_selection(&choices, name));
            let mut prompt = ListPrompt::new(&args.question, choices)
                .default_select(args.default_select);
            if let Some(mark) = question_mark {
                prompt = prompt.question_mark(mark);
            }
            if let Some(pointer) = pointer(&args.choice, config) {
                prompt = prompt.pointer(pointer);
            }
            if let Some(annotation) = &args.choice.annotation {
                prompt = prompt.annotation(annotation);
            }
            finish(&prompt, &options, fallback)
        }
        Command::Checkbox(args) => {
            let choices: Vec<Choice> = args.choices.iter().map(|name| Choice::new(name.as_str())).collect();
            let fallback = default.map(|names| {
                names
                    .split(',')
                    .map(|name| default_selection(&choices, name))
                    .filter(|selected| selected.index < choices.len())
                    .collect::<Vec<_>>()
            });
            let mut prompt = CheckboxPrompt::new(&args.question, choices)
                .default_select(args.default_select.iter().copied());
            if let Some(mark) = question_mark {
                prompt = prompt.question_mark(mark);
            }
            if let Some(pointer) = pointer(&args.choice, config) {
                prompt = prompt.pointer(pointer);
            }
            if let Some(annotation) = &args.choice.annotation {
                prompt = prompt.annotation(annotation);
            }
            if let Some(sign) = &args.sign {
                prompt = prompt.selected_sign(sign);
            }
            if let Some(unsign) = &args.unsign {
                prompt = prompt.unselected_sign(unsign);
            }
            finish(&prompt, &options, fallback)
        }
    }
}

/// The offered choice named `name`, or a detached choice positioned after
/// the last offered one
fn default_selection(choices: &[Choice], name: &str) -> Selected {
    let name = name.trim();
    choices
        .iter()
        .position(|choice| choice.label() == name)
        .map(|index| Selected::new(index, choices[index].clone()))
        .unwrap_or_else(|| Selected::new(choices.len(), Choice::new(name)))
}

fn finish<P: Prompt>(prompt: &P, options: &PromptOptions, fallback: Option<P::Output>) -> Result<()> {
    let answer = match fallback {
        Some(value) => prompt.prompt_or(options, value)?,
        None => prompt.prompt(options)?,
    };
    tracing::info!(question = %answer.question, "Prompt finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use ratatui::style::{Color, Modifier};

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_input() {
        let cli = Cli::try_parse_from([
            "noneprompt",
            "input",
            "-d",
            "bob",
            "--password",
            "--input-style",
            "fg:ansiblue",
            "What's your name?",
        ])
        .unwrap();
        let Command::Input(args) = &cli.command else {
            panic!("expected input subcommand");
        };
        assert_eq!(args.question, "What's your name?");
        assert_eq!(args.default_text.as_deref(), Some("bob"));
        assert!(args.password);
        assert_eq!(cli.command.style_rules(), [("input", "fg:ansiblue")]);
    }

    #[test]
    fn test_global_default_before_subcommand() {
        let cli = Cli::try_parse_from([
            "noneprompt",
            "--no-ansi",
            "-d",
            "yes",
            "confirm",
            "-d",
            "n",
            "Continue?",
        ])
        .unwrap();
        assert!(cli.no_ansi);
        assert_eq!(cli.default.as_deref(), Some("yes"));
        let Command::Confirm(args) = &cli.command else {
            panic!("expected confirm subcommand");
        };
        assert_eq!(args.default_choice, Some(false));
    }

    #[test]
    fn test_confirm_rejects_non_boolean_default() {
        let result = Cli::try_parse_from(["noneprompt", "confirm", "-d", "maybe", "Continue?"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_list() {
        let cli = Cli::try_parse_from([
            "noneprompt",
            "list",
            "--pointer",
            ">",
            "--select-style",
            "bold",
            "-d",
            "1",
            "Pick one",
            "apple",
            "banana",
        ])
        .unwrap();
        let Command::List(args) = &cli.command else {
            panic!("expected list subcommand");
        };
        assert_eq!(args.choices, ["apple", "banana"]);
        assert_eq!(args.default_select, Some(1));
        assert_eq!(args.choice.pointer.as_deref(), Some(">"));
        assert_eq!(cli.command.style_rules(), [("selected", "bold")]);
    }

    #[test]
    fn test_single_letter_mark_flags() {
        let cli = Cli::try_parse_from([
            "noneprompt",
            "checkbox",
            "-p",
            ">",
            "-s",
            "x",
            "-u",
            "o",
            "Toppings",
            "ham",
        ])
        .unwrap();
        let Command::Checkbox(args) = &cli.command else {
            panic!("expected checkbox subcommand");
        };
        assert_eq!(args.choice.pointer.as_deref(), Some(">"));
        assert_eq!(args.sign.as_deref(), Some("x"));
        assert_eq!(args.unsign.as_deref(), Some("o"));

        let cli = Cli::try_parse_from(["noneprompt", "list", "-p", "*", "Pick", "a"]).unwrap();
        let Command::List(args) = &cli.command else {
            panic!("expected list subcommand");
        };
        assert_eq!(args.choice.pointer.as_deref(), Some("*"));
    }

    #[test]
    fn test_confirm_default_tolerates_padding() {
        let cli = Cli::try_parse_from(["noneprompt", "confirm", "-d", " yes ", "Continue?"]).unwrap();
        let Command::Confirm(args) = &cli.command else {
            panic!("expected confirm subcommand");
        };
        assert_eq!(args.default_choice, Some(true));
    }

    #[test]
    fn test_list_requires_choices() {
        assert!(Cli::try_parse_from(["noneprompt", "list", "Pick one"]).is_err());
    }

    #[test]
    fn test_parse_checkbox_repeated_default() {
        let cli = Cli::try_parse_from([
            "noneprompt",
            "checkbox",
            "-d",
            "0",
            "--default-select",
            "2",
            "--sign",
            "x",
            "--unsign-style",
            "dim",
            "Toppings",
            "ham",
            "cheese",
            "olives",
        ])
        .unwrap();
        let Command::Checkbox(args) = &cli.command else {
            panic!("expected checkbox subcommand");
        };
        assert_eq!(args.default_select, [0, 2]);
        assert_eq!(args.sign.as_deref(), Some("x"));
        assert_eq!(cli.command.style_rules(), [("unsign", "dim")]);
    }

    #[test]
    fn test_flags_override_config_styles() {
        let mut config = Config::default();
        config.styles.insert("answer".into(), "fg:red italic".into());
        config.question_mark = Some("?".into());

        let cli = Cli::try_parse_from([
            "noneprompt",
            "input",
            "--answer-style",
            "fg:green",
            "Name?",
        ])
        .unwrap();
        let options = cli.prompt_options(&config).unwrap();
        let answer = options.theme.resolve("answer");
        assert_eq!(answer.fg, Some(Color::Green));
        assert!(answer.add_modifier.contains(Modifier::ITALIC));
        assert_eq!(cli.question_mark(&config).as_deref(), Some("?"));

        let cli = Cli::try_parse_from(["noneprompt", "input", "--question-mark", "»", "Name?"])
            .unwrap();
        assert_eq!(cli.question_mark(&config).as_deref(), Some("»"));
    }

    #[test]
    fn test_invalid_style_flag() {
        let cli = Cli::try_parse_from(["noneprompt", "input", "--question-style", "glow", "Name?"])
            .unwrap();
        assert!(cli.prompt_options(&Config::default()).is_err());
    }

    #[test]
    fn test_default_selection_by_name() {
        let choices: Vec<Choice> = ["apple", "banana"].into_iter().map(Choice::from).collect();
        let selected = default_selection(&choices, " banana ");
        assert_eq!(selected.index, 1);

        let detached = default_selection(&choices, "cherry");
        assert_eq!(detached.index, 2);
        assert_eq!(detached.name(), "cherry");
    }
}
