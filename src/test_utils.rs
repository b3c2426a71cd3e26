//! Test utilities shared across test modules

use anyhow::{Result, bail};
use std::cell::RefCell;
use std::collections::VecDeque;
use tempfile::TempDir;

use crate::paths::ConfigLocation;
use crate::prompt::Prompter;

/// Default-style location inside the temp dir; the file is created on open
pub fn default_location(temp_dir: &TempDir) -> ConfigLocation {
    ConfigLocation {
        path: temp_dir.path().join(".pingcli").join("config.yaml"),
        explicit: false,
    }
}

/// User-supplied location inside the temp dir; must exist before open
pub fn explicit_location(temp_dir: &TempDir) -> ConfigLocation {
    ConfigLocation::explicit(temp_dir.path().join("config.yaml"))
}

/// Prompter that replays canned answers in order and records every question
#[derive(Default)]
pub struct ScriptedPrompter {
    answers: RefCell<VecDeque<String>>,
    pub asked: RefCell<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: RefCell::new(answers.iter().map(|a| a.to_string()).collect()),
            asked: RefCell::new(Vec::new()),
        }
    }

    fn next(&self, message: &str) -> Result<String> {
        self.asked.borrow_mut().push(message.to_string());
        match self.answers.borrow_mut().pop_front() {
            Some(answer) => Ok(answer),
            None => bail!("no scripted answer for prompt '{message}'"),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn text(&self, message: &str) -> Result<String> {
        self.next(message)
    }

    fn confirm(&self, message: &str, _default: bool) -> Result<bool> {
        Ok(self.next(message)? == "y")
    }

    fn select(&self, message: &str, options: Vec<String>) -> Result<String> {
        let answer = self.next(message)?;
        if !options.contains(&answer) {
            bail!("scripted answer '{answer}' is not one of {options:?}");
        }
        Ok(answer)
    }
}
