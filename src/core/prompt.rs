//! User prompts.
//!
//! [`Terminal`] asks on the controlling terminal through dialoguer.
//! [`Unattended`] answers for a non-interactive session.
//! [`Scripted`] replays canned answers and records what was asked.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;

use dialoguer::{Confirm, Input, Password};

use crate::error::Result;

/// Source of interactive answers.
pub trait Prompter {
    /// Ask for a visible string.
    fn ask_string(&self, prompt: &str, default: &str) -> Result<String>;

    /// Ask for a password for `name` without echo.
    fn ask_password(&self, name: &str) -> Result<String>;

    /// Ask a yes/no question. Defaults to no.
    fn confirm(&self, prompt: &str) -> Result<bool>;
}

/// Prompts on the terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct Terminal;

impl Prompter for Terminal {
    fn ask_string(&self, prompt: &str, default: &str) -> Result<String> {
        let mut input = Input::<String>::new().with_prompt(prompt).allow_empty(true);
        if !default.is_empty() {
            input = input.default(default.to_string());
        }
        Ok(input.interact_text()?)
    }

    fn ask_password(&self, name: &str) -> Result<String> {
        Ok(Password::new()
            .with_prompt(format!("Enter password for {}", name))
            .with_confirmation(
                format!("Retype password for {}", name),
                "the entered passwords do not match",
            )
            .interact()?)
    }

    fn confirm(&self, prompt: &str) -> Result<bool> {
        Ok(Confirm::new().with_prompt(prompt).default(false).interact()?)
    }
}

/// Stands in for a terminal when the session is not interactive.
///
/// Confirmations take their default answer (no); questions fail.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unattended;

impl Prompter for Unattended {
    fn ask_string(&self, prompt: &str, _default: &str) -> Result<String> {
        Err(not_interactive(prompt))
    }

    fn ask_password(&self, name: &str) -> Result<String> {
        Err(not_interactive(&format!("password for {}", name)))
    }

    fn confirm(&self, _prompt: &str) -> Result<bool> {
        Ok(false)
    }
}

fn not_interactive(what: &str) -> crate::error::Error {
    io::Error::new(
        io::ErrorKind::Unsupported,
        format!("cannot ask for {} in a non-interactive session", what),
    )
    .into()
}

/// Replays scripted answers in order.
///
/// Running out of answers is an I/O error, the same as a closed terminal.
#[derive(Debug, Default)]
pub struct Scripted {
    strings: RefCell<VecDeque<String>>,
    passwords: RefCell<VecDeque<String>>,
    confirms: RefCell<VecDeque<bool>>,
    asked: RefCell<Vec<String>>,
}

impl Scripted {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an answer for `ask_string`.
    pub fn string(self, answer: impl Into<String>) -> Self {
        self.strings.borrow_mut().push_back(answer.into());
        self
    }

    /// Queue an answer for `ask_password`.
    pub fn password(self, answer: impl Into<String>) -> Self {
        self.passwords.borrow_mut().push_back(answer.into());
        self
    }

    /// Queue an answer for `confirm`.
    pub fn confirm(self, answer: bool) -> Self {
        self.confirms.borrow_mut().push_back(answer);
        self
    }

    /// Every prompt shown so far, prefixed with its kind.
    pub fn asked(&self) -> Vec<String> {
        self.asked.borrow().clone()
    }

    fn record(&self, kind: &str, prompt: &str) {
        self.asked.borrow_mut().push(format!("{}: {}", kind, prompt));
    }
}

fn exhausted(kind: &str) -> crate::error::Error {
    io::Error::new(
        io::ErrorKind::UnexpectedEof,
        format!("no scripted {} answer left", kind),
    )
    .into()
}

impl Prompter for Scripted {
    fn ask_string(&self, prompt: &str, _default: &str) -> Result<String> {
        self.record("string", prompt);
        self.strings
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| exhausted("string"))
    }

    fn ask_password(&self, name: &str) -> Result<String> {
        self.record("password", name);
        self.passwords
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| exhausted("password"))
    }

    fn confirm(&self, prompt: &str) -> Result<bool> {
        self.record("confirm", prompt);
        self.confirms
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| exhausted("confirm"))
    }
}
