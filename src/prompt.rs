//! Interactive input, injected into the command handlers.
//!
//! The store never prompts. Handlers receive a [`Prompter`] and only call it
//! when the user left out an argument; on a non-interactive stdin the
//! [`NonInteractive`] provider turns every prompt into an error.

use anyhow::{Context, Result, bail};
use inquire::{Confirm, Select, Text};
use std::io::IsTerminal;

pub trait Prompter {
    fn text(&self, message: &str) -> Result<String>;
    fn confirm(&self, message: &str, default: bool) -> Result<bool>;
    fn select(&self, message: &str, options: Vec<String>) -> Result<String>;
}

/// Terminal prompts backed by `inquire`
pub struct InquirePrompter;

impl Prompter for InquirePrompter {
    fn text(&self, message: &str) -> Result<String> {
        Text::new(message).prompt().context("Input cancelled")
    }

    fn confirm(&self, message: &str, default: bool) -> Result<bool> {
        Confirm::new(message)
            .with_default(default)
            .prompt()
            .context("Confirmation cancelled")
    }

    fn select(&self, message: &str, options: Vec<String>) -> Result<String> {
        Select::new(message, options)
            .prompt()
            .context("Selection cancelled")
    }
}

/// Used when stdin is not a terminal (pipes, CI)
pub struct NonInteractive;

impl NonInteractive {
    fn refuse(message: &str) -> anyhow::Error {
        anyhow::anyhow!(
            "Cannot prompt for '{}' without an interactive terminal.\nHint: Pass the value as an argument or flag instead.",
            message.trim_end_matches(':')
        )
    }
}

impl Prompter for NonInteractive {
    fn text(&self, message: &str) -> Result<String> {
        Err(Self::refuse(message))
    }

    fn confirm(&self, message: &str, _default: bool) -> Result<bool> {
        Err(Self::refuse(message))
    }

    fn select(&self, message: &str, options: Vec<String>) -> Result<String> {
        if options.is_empty() {
            bail!("Nothing to choose from for '{}'", message.trim_end_matches(':'));
        }
        Err(Self::refuse(message))
    }
}

/// Pick the prompter that fits the current stdin
pub fn for_stdin() -> Box<dyn Prompter> {
    if std::io::stdin().is_terminal() {
        Box::new(InquirePrompter)
    } else {
        Box::new(NonInteractive)
    }
}
