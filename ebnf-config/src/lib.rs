//! Configuration loader shared by the EBNF binaries.
//!
//! `defaults/ebnf.default.toml` is compiled in, so every binary starts from the same values.
//! [`Loader`] layers user files and single-key overrides on top before deserializing into
//! [`EbnfConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use ebnf_analysis::AnalyzerOptions;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub use config::ConfigError;

const DEFAULT_TOML: &str = include_str!("../defaults/ebnf.default.toml");

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EbnfConfig {
    pub analysis: AnalysisConfig,
    pub live: LiveConfig,
}

/// Limits applied to one diagnostic pass.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AnalysisConfig {
    pub max_source_chars: usize,
    pub time_budget_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LiveConfig {
    pub debounce_ms: u64,
}

impl EbnfConfig {
    pub fn analyzer_options(&self) -> AnalyzerOptions {
        AnalyzerOptions {
            max_source_chars: self.analysis.max_source_chars,
            time_budget: Duration::from_millis(self.analysis.time_budget_ms),
        }
    }

    /// Delay before unmatched segments of a sample are shown.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.live.debounce_ms)
    }
}

/// Layers user settings over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a TOML file that must exist.
    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        self.with_source(path.as_ref(), true)
    }

    /// Layer a TOML file if it exists.
    pub fn with_optional_file(self, path: impl AsRef<Path>) -> Self {
        self.with_source(path.as_ref(), false)
    }

    /// Override one dotted key, e.g. `live.debounce_ms`.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<EbnfConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }

    fn with_source(mut self, path: &Path, required: bool) -> Self {
        let source = File::from(path)
            .format(FileFormat::Toml)
            .required(required);
        self.builder = self.builder.add_source(source);
        self
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

pub fn load_defaults() -> Result<EbnfConfig, ConfigError> {
    Loader::new().build()
}
