//! Syntax modules and pattern sets
//!
//! A syntax module contributes ordered `(pattern, handler)` pairs recognizing whole
//! lines and in-line words, optionally a [`Factory`] override and an `init` hook. The
//! manager merges them with the built-in baseline into a [`SyntaxRegistry`]. Handlers
//! receive the manager and the named captures of their pattern, and emit events.
//!
//! File structure:
//!
//! - `registry.rs`: the ordered pattern set and its combined word matcher
//! - `catalog.rs`: modules available to `@use` and extension detection
//! - `baseline.rs`: comments, variables, `@use`, `@label`, `@caption`, references
//! - `textile.rs`: textile-flavoured front-end

pub mod baseline;
pub mod catalog;
pub mod registry;
pub mod textile;

pub use catalog::ModuleCatalog;
pub use registry::{SyntaxRegistry, WordMatcher};

use crate::error::{ParseError, ProtocolError};
use crate::factory::Factory;
use crate::manager::Manager;
use regex::{Captures, Regex};
use std::fmt;
use std::rc::Rc;

/// Callback run on a pattern match.
pub type Handler = Rc<dyn Fn(&mut Manager, &Captures<'_>) -> Result<(), ParseError>>;

/// Pattern recognizing a whole line. It only matches from the start of the line.
#[derive(Clone)]
pub struct LinePattern {
    regex: Regex,
    handler: Handler,
}

impl LinePattern {
    pub fn new<F>(pattern: &str, handler: F) -> Result<Self, ProtocolError>
    where
        F: Fn(&mut Manager, &Captures<'_>) -> Result<(), ParseError> + 'static,
    {
        Ok(Self::from_regex(Regex::new(pattern)?, handler))
    }

    pub fn from_regex<F>(regex: Regex, handler: F) -> Self
    where
        F: Fn(&mut Manager, &Captures<'_>) -> Result<(), ParseError> + 'static,
    {
        LinePattern {
            regex,
            handler: Rc::new(handler),
        }
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Captures when the pattern matches at the start of `line`.
    pub fn captures<'t>(&self, line: &'t str) -> Option<Captures<'t>> {
        self.regex
            .captures(line)
            .filter(|caps| caps.get(0).is_some_and(|whole| whole.start() == 0))
    }

    pub fn handler(&self) -> Handler {
        Rc::clone(&self.handler)
    }
}

impl fmt::Debug for LinePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LinePattern").field(&self.regex.as_str()).finish()
    }
}

/// Pattern recognizing a word inside a line. Word patterns are merged into one
/// alternation, so their named groups must be unique across the registry.
#[derive(Clone)]
pub struct WordPattern {
    source: String,
    handler: Handler,
}

impl WordPattern {
    pub fn new<F>(pattern: &str, handler: F) -> Result<Self, ProtocolError>
    where
        F: Fn(&mut Manager, &Captures<'_>) -> Result<(), ParseError> + 'static,
    {
        Regex::new(pattern)?;
        Ok(WordPattern {
            source: pattern.to_string(),
            handler: Rc::new(handler),
        })
    }

    pub fn from_regex<F>(regex: &Regex, handler: F) -> Self
    where
        F: Fn(&mut Manager, &Captures<'_>) -> Result<(), ParseError> + 'static,
    {
        WordPattern {
            source: regex.as_str().to_string(),
            handler: Rc::new(handler),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn handler(&self) -> Handler {
        Rc::clone(&self.handler)
    }
}

impl fmt::Debug for WordPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("WordPattern").field(&self.source).finish()
    }
}

/// A pluggable front-end.
pub trait SyntaxModule {
    /// Name used by `@use` and the catalog.
    fn name(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    /// File extensions, without the dot, selecting this module automatically.
    fn file_extensions(&self) -> &[&str] {
        &[]
    }

    /// Whether the module replaces the current main syntax instead of extending it.
    fn replaces_syntax(&self) -> bool {
        false
    }

    fn lines(&self) -> Result<Vec<LinePattern>, ProtocolError> {
        Ok(Vec::new())
    }

    fn words(&self) -> Result<Vec<WordPattern>, ProtocolError> {
        Ok(Vec::new())
    }

    fn factory(&self) -> Option<Box<dyn Factory>> {
        None
    }

    fn init(&self, _man: &mut Manager) -> Result<(), ParseError> {
        Ok(())
    }
}
