//! Shared configuration loader for the thot toolchain.
//!
//! `defaults/thot.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`ThotConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;
use thot_core::error::ParseError;
use thot_core::formats::TreevizOptions;
use thot_core::manager::{Manager, ParseOptions};

const DEFAULT_TOML: &str = include_str!("../defaults/thot.default.toml");

/// Top-level configuration consumed by thot applications.
#[derive(Debug, Clone, Deserialize)]
pub struct ThotConfig {
    pub parse: ParseConfig,
    pub output: OutputConfig,
}

/// Knobs of the recognition loop.
#[derive(Debug, Clone, Deserialize)]
pub struct ParseConfig {
    pub line_suffix: String,
    pub literal_unterminated_styles: bool,
    pub default_syntax: String,
}

impl From<ParseConfig> for ParseOptions {
    fn from(config: ParseConfig) -> Self {
        ParseOptions {
            line_suffix: config.line_suffix,
            literal_unterminated_styles: config.literal_unterminated_styles,
        }
    }
}

impl From<&ParseConfig> for ParseOptions {
    fn from(config: &ParseConfig) -> Self {
        ParseOptions {
            line_suffix: config.line_suffix.clone(),
            literal_unterminated_styles: config.literal_unterminated_styles,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub default_format: String,
    pub treeviz: TreevizConfig,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TreevizConfig {
    pub show_line_numbers: bool,
    pub show_info: bool,
}

impl From<TreevizConfig> for TreevizOptions {
    fn from(config: TreevizConfig) -> Self {
        TreevizOptions {
            show_line_numbers: config.show_line_numbers,
            show_info: config.show_info,
        }
    }
}

impl From<&TreevizConfig> for TreevizOptions {
    fn from(config: &TreevizConfig) -> Self {
        TreevizOptions::from(*config)
    }
}

impl ThotConfig {
    /// A manager set up from this configuration: parse options applied and the
    /// default syntax module, if any, in use.
    pub fn manager(&self) -> Result<Manager, ParseError> {
        let mut man = Manager::with_options((&self.parse).into());
        if !self.parse.default_syntax.is_empty() {
            man.use_named(&self.parse.default_syntax)?;
        }
        Ok(man)
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<ThotConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<ThotConfig, ConfigError> {
    Loader::new().build()
}
