//! Textile front-end
//!
//! Parses text with the textile syntax module active. Serialization back to textile is
//! not provided.

use crate::error::FormatError;
use crate::format::Format;
use crate::manager::{parse_with, ParseOptions, ParseOutput};

#[derive(Default)]
pub struct TextileFormat {
    options: ParseOptions,
}

impl TextileFormat {
    pub fn new(options: ParseOptions) -> Self {
        Self { options }
    }
}

impl Format for TextileFormat {
    fn name(&self) -> &str {
        "textile"
    }

    fn description(&self) -> &str {
        "Textile-flavoured markup"
    }

    fn file_extensions(&self) -> &[&str] {
        &["textile"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<ParseOutput, FormatError> {
        Ok(parse_with(source, "", "textile", self.options.clone())?)
    }
}
