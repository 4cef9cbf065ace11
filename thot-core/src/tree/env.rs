//! Document-scoped variables
//!
//! Raw lines are reduced before dispatch: every `@(NAME)` is replaced by the value of
//! `NAME`. Reduction is a single pass over the text, and `get` reduces the stored value
//! once, so a variable referring to itself terminates.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashMap;

static VAR_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@\(([a-zA-Z_0-9]+)\)").expect("variable reference pattern"));

/// Variable lookup used by the manager before line dispatch.
pub trait Environment {
    /// Raw value of a variable, without reduction.
    fn raw(&self, name: &str) -> Option<String>;

    fn set(&mut self, name: &str, value: &str);

    /// Value of a variable with its own references replaced.
    fn get(&self, name: &str) -> Option<String> {
        self.raw(name).map(|value| self.reduce(&value))
    }

    /// Replace `@(NAME)` references in `text`. Unknown names become empty.
    fn reduce(&self, text: &str) -> String {
        if !text.contains("@(") {
            return text.to_string();
        }
        VAR_REF
            .replace_all(text, |caps: &Captures<'_>| {
                self.raw(&caps[1]).unwrap_or_default()
            })
            .into_owned()
    }
}

/// Plain map of variables.
#[derive(Debug, Clone, Default)]
pub struct Variables {
    values: HashMap<String, String>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Environment for Variables {
    fn raw(&self, name: &str) -> Option<String> {
        self.values.get(name).cloned()
    }

    fn set(&mut self, name: &str, value: &str) {
        self.values.insert(name.to_string(), value.to_string());
    }
}
