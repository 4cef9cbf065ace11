//! Format trait definition
//!
//! A format is either a front-end (text in, [`ParseOutput`] out) or a back-end (closed
//! [`Document`] in, text out), or both. Back-ends are built on the
//! [`Generator`](crate::generator::Generator) walk.

use crate::error::FormatError;
use crate::manager::ParseOutput;
use crate::tree::Document;
use std::collections::HashMap;

/// Trait for document formats
///
/// # Examples
///
/// ```ignore
/// struct MyFormat;
///
/// impl Format for MyFormat {
///     fn name(&self) -> &str {
///         "my-format"
///     }
///
///     fn supports_serialization(&self) -> bool {
///         true
///     }
///
///     fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
///         let mut out = MyGenerator::default();
///         generate(doc, &mut out)?;
///         Ok(out.finish())
///     }
/// }
/// ```
pub trait Format: Send + Sync {
    /// The name of this format (e.g., "textile", "treeviz")
    fn name(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    /// File extensions associated with this format, without the leading dot.
    fn file_extensions(&self) -> &[&str] {
        &[]
    }

    fn supports_parsing(&self) -> bool {
        false
    }

    fn supports_serialization(&self) -> bool {
        false
    }

    /// Parse source text into a document and its diagnostics.
    ///
    /// Default implementation returns NotSupported error.
    fn parse(&self, _source: &str) -> Result<ParseOutput, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' does not support parsing",
            self.name()
        )))
    }

    /// Default implementation returns NotSupported error.
    fn serialize(&self, _doc: &Document) -> Result<String, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' does not support serialization",
            self.name()
        )))
    }

    /// Serialize a document, optionally using extra parameters.
    ///
    /// Formats without parameters rely on the default implementation, which delegates
    /// to [`Format::serialize`] and rejects any option.
    fn serialize_with_options(
        &self,
        doc: &Document,
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        if options.is_empty() {
            self.serialize(doc)
        } else {
            Err(FormatError::NotSupported(format!(
                "Format '{}' does not support extra parameters",
                self.name()
            )))
        }
    }
}

/// Reads a boolean option; accepts `true`/`false`, `yes`/`no` and `1`/`0`.
pub(crate) fn bool_option(
    options: &HashMap<String, String>,
    key: &str,
) -> Result<Option<bool>, FormatError> {
    match options.get(key).map(|value| value.to_ascii_lowercase()) {
        None => Ok(None),
        Some(value) => match value.as_str() {
            "true" | "yes" | "1" => Ok(Some(true)),
            "false" | "no" | "0" => Ok(Some(false)),
            _ => Err(FormatError::SerializationError(format!(
                "option '{key}' expects a boolean, got '{value}'"
            ))),
        },
    }
}
