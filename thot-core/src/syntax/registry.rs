//! Ordered pattern set used by the manager
//!
//! Patterns are kept in three layers, always consulted in this order: the built-in
//! baseline, extensions added one by one, and the main syntax (which a syntax module
//! may replace as a whole). Registration order is the only tie-break; nothing is sorted
//! by specificity.

use super::{Handler, LinePattern, WordPattern};
use crate::error::ProtocolError;
use regex::{Captures, Regex};
use std::fmt;
use std::rc::Rc;

/// All word patterns compiled into one alternation, with the handler of each branch.
pub struct WordMatcher {
    regex: Option<Regex>,
    groups: Vec<String>,
    handlers: Vec<Handler>,
}

impl WordMatcher {
    fn build(words: &[&WordPattern]) -> Result<Self, ProtocolError> {
        let groups: Vec<String> = (0..words.len()).map(|i| format!("thot_w{i}")).collect();
        let alternation = words
            .iter()
            .zip(&groups)
            .map(|(word, group)| format!("(?P<{group}>{})", word.as_str()))
            .collect::<Vec<_>>()
            .join("|");
        let regex = if words.is_empty() {
            None
        } else {
            Some(Regex::new(&alternation)?)
        };
        Ok(WordMatcher {
            regex,
            groups,
            handlers: words.iter().map(|word| word.handler()).collect(),
        })
    }

    /// Leftmost word match in `text`.
    pub fn captures<'t>(&self, text: &'t str) -> Option<Captures<'t>> {
        self.regex.as_ref().and_then(|regex| regex.captures(text))
    }

    /// Handler of the branch that produced `caps`.
    pub fn handler_for(&self, caps: &Captures<'_>) -> Option<Handler> {
        self.groups
            .iter()
            .position(|group| caps.name(group).is_some())
            .map(|index| Rc::clone(&self.handlers[index]))
    }
}

impl fmt::Debug for WordMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WordMatcher")
            .field("regex", &self.regex.as_ref().map(Regex::as_str))
            .finish()
    }
}

#[derive(Debug, Default)]
pub struct SyntaxRegistry {
    baseline_lines: Vec<LinePattern>,
    baseline_words: Vec<WordPattern>,
    extra_lines: Vec<LinePattern>,
    extra_words: Vec<WordPattern>,
    syntax_lines: Vec<LinePattern>,
    syntax_words: Vec<WordPattern>,
    matcher: Option<Rc<WordMatcher>>,
}

impl SyntaxRegistry {
    pub fn new(baseline_lines: Vec<LinePattern>, baseline_words: Vec<WordPattern>) -> Self {
        SyntaxRegistry {
            baseline_lines,
            baseline_words,
            ..Default::default()
        }
    }

    pub fn add_line(&mut self, pattern: LinePattern) {
        self.extra_lines.push(pattern);
    }

    pub fn add_word(&mut self, pattern: WordPattern) {
        self.extra_words.push(pattern);
        self.matcher = None;
    }

    /// Replace the main syntax, keeping the baseline and extensions.
    pub fn set_syntax(&mut self, lines: Vec<LinePattern>, words: Vec<WordPattern>) {
        self.syntax_lines = lines;
        self.syntax_words = words;
        self.matcher = None;
    }

    pub fn lines(&self) -> impl Iterator<Item = &LinePattern> {
        self.baseline_lines
            .iter()
            .chain(&self.extra_lines)
            .chain(&self.syntax_lines)
    }

    pub fn words(&self) -> impl Iterator<Item = &WordPattern> {
        self.baseline_words
            .iter()
            .chain(&self.extra_words)
            .chain(&self.syntax_words)
    }

    /// First line pattern matching `line`, in registration order.
    pub fn match_line<'t>(&self, line: &'t str) -> Option<(Handler, Captures<'t>)> {
        self.lines()
            .find_map(|pattern| pattern.captures(line).map(|caps| (pattern.handler(), caps)))
    }

    /// Combined word matcher, rebuilt after the word set changed.
    pub fn word_matcher(&mut self) -> Result<Rc<WordMatcher>, ProtocolError> {
        if let Some(matcher) = &self.matcher {
            return Ok(Rc::clone(matcher));
        }
        let words: Vec<&WordPattern> = self.words().collect();
        let matcher = Rc::new(WordMatcher::build(&words)?);
        self.matcher = Some(Rc::clone(&matcher));
        Ok(matcher)
    }
}
