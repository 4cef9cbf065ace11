//! Error types for parsing and format operations
//!
//! Three families live here:
//!
//! - [`ParseError`]: fatal protocol failures. They abort the current parse and carry the
//!   location where the offending event was sent.
//! - [`Diagnostic`]: recoverable problems (unknown module, unresolved reference, malformed
//!   construct). They are collected by the manager and returned in batch.
//! - [`FormatError`]: failures of the format registry and back-ends.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// A position in the source: file name and 1-based line number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Location {
    pub file: Option<String>,
    pub line: Option<usize>,
}

impl Location {
    pub fn new(file: Option<String>, line: Option<usize>) -> Self {
        Location { file, line }
    }

    pub fn is_known(&self) -> bool {
        self.file.is_some() || self.line.is_some()
    }
}

/// Renders as the `file:line: ` prefix used in messages, or nothing when unknown.
impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.file, self.line) {
            (Some(file), Some(line)) => write!(f, "{file}:{line}: "),
            (Some(file), None) => write!(f, "{file}: "),
            (None, Some(line)) => write!(f, "{line}: "),
            (None, None) => Ok(()),
        }
    }
}

/// Failures of the event protocol. These are never recovered from.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// An event was forwarded up to the document root and nobody claimed it.
    #[error("{event} reached the document root without an acceptor")]
    NoAcceptor { event: String },

    /// A closing event was turned into a node, meaning no open node matched it.
    #[error("{what} closed but not opened")]
    ClosedNotOpened { what: String },

    /// An explicit style was closed by a different style.
    #[error("closing {found} style while {open} is open")]
    StyleMismatch { open: String, found: String },

    /// Attempt to pop the document root off the stack.
    #[error("cannot pop the document root")]
    PopRoot,

    /// A syntax module contributed a pattern that does not compile.
    #[error("invalid syntax pattern: {0}")]
    Pattern(String),

    /// The input could not be read.
    #[error("cannot read input: {0}")]
    Input(String),
}

/// A protocol failure together with the place it happened.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{location}{kind}")]
pub struct ParseError {
    pub location: Location,
    #[source]
    pub kind: ProtocolError,
}

impl ParseError {
    pub fn new(kind: ProtocolError, location: Location) -> Self {
        ParseError { location, kind }
    }
}

impl From<regex::Error> for ProtocolError {
    fn from(err: regex::Error) -> Self {
        ProtocolError::Pattern(err.to_string())
    }
}

/// How bad a recorded diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        f.write_str(label)
    }
}

/// A recoverable problem found while parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub location: Location,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}: {}", self.location, self.severity, self.message)
    }
}

/// Errors that can occur during format operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    /// Format not found in registry
    #[error("Format '{0}' not found")]
    FormatNotFound(String),
    /// Error during parsing
    #[error("Parse error: {0}")]
    ParseError(String),
    /// Error during serialization
    #[error("Serialization error: {0}")]
    SerializationError(String),
    /// Format does not support the operation
    #[error("Operation not supported: {0}")]
    NotSupported(String),
}

impl From<ParseError> for FormatError {
    fn from(err: ParseError) -> Self {
        FormatError::ParseError(err.to_string())
    }
}

impl From<serde_json::Error> for FormatError {
    fn from(err: serde_json::Error) -> Self {
        FormatError::SerializationError(err.to_string())
    }
}
