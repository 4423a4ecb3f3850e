//! Configuration loader for docbook-babel.
//!
//! `defaults/docbook.default.toml` is embedded so that the documented defaults
//! and runtime behavior stay in sync. Applications layer project or user files
//! on top of those defaults via [`Loader`] before deserializing into
//! [`DocbookConfig`], then hand the pieces to the library through the `From`
//! conversions below.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use docbook_babel::diagnostics::Severity;
use docbook_babel::settings::{ConverterSettings, Dialect};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/docbook.default.toml");

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DocbookConfig {
    pub convert: ConvertConfig,
    pub diagnostics: DiagnosticsConfig,
}

/// Knobs of the dispatch engine.
#[derive(Debug, Clone, Deserialize)]
pub struct ConvertConfig {
    pub dialect: DialectConfig,
    pub bridge_namespace: String,
    pub generic_bullet: String,
    #[serde(default)]
    pub api_descriptions: bool,
    #[serde(default)]
    pub extensions: Vec<ExtensionConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialectConfig {
    Auto,
    Legacy,
    Namespaced,
}

impl From<DialectConfig> for Dialect {
    fn from(config: DialectConfig) -> Self {
        match config {
            DialectConfig::Auto => Dialect::Auto,
            DialectConfig::Legacy => Dialect::Legacy,
            DialectConfig::Namespaced => Dialect::Namespaced,
        }
    }
}

/// An extension namespace and the alias its handlers are registered under.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExtensionConfig {
    pub namespace: String,
    pub alias: String,
}

impl From<&ConvertConfig> for ConverterSettings {
    fn from(config: &ConvertConfig) -> Self {
        ConverterSettings {
            dialect: config.dialect.into(),
            bridge_namespace: config.bridge_namespace.clone(),
            extension_namespaces: config
                .extensions
                .iter()
                .map(|ext| (ext.namespace.clone(), ext.alias.clone()))
                .collect(),
            generic_bullet: config.generic_bullet.clone(),
            api_descriptions: config.api_descriptions,
        }
    }
}

impl From<ConvertConfig> for ConverterSettings {
    fn from(config: ConvertConfig) -> Self {
        ConverterSettings::from(&config)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiagnosticsConfig {
    pub threshold: SeverityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityConfig {
    Info,
    Warning,
    Error,
}

impl From<SeverityConfig> for Severity {
    fn from(config: SeverityConfig) -> Self {
        match config {
            SeverityConfig::Info => Severity::Info,
            SeverityConfig::Warning => Severity::Warning,
            SeverityConfig::Error => Severity::Error,
        }
    }
}

/// Layers project and user TOML files, then key overrides, over the embedded
/// defaults. Later layers win.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    pub fn new() -> Self {
        let defaults = File::from_str(DEFAULT_TOML, FileFormat::Toml);
        Self {
            builder: Config::builder().add_source(defaults),
        }
    }

    /// Add `path` as a layer; building fails if it does not exist.
    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        self.layer(path.as_ref(), true)
    }

    /// Add `path` as a layer if it exists.
    pub fn with_optional_file(self, path: impl AsRef<Path>) -> Self {
        self.layer(path.as_ref(), false)
    }

    fn layer(mut self, path: &Path, required: bool) -> Self {
        let source = File::from(path).format(FileFormat::Toml).required(required);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Override a single dotted key, e.g. `convert.dialect`.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<DocbookConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// The embedded defaults alone.
pub fn load_defaults() -> Result<DocbookConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn embedded_defaults_deserialize() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.convert.dialect, DialectConfig::Auto);
        assert_eq!(config.convert.generic_bullet, "bullet");
        assert!(config.convert.extensions.is_empty());
        assert_eq!(config.diagnostics.threshold, SeverityConfig::Info);
    }

    #[test]
    fn defaults_match_library_defaults() {
        let config = load_defaults().expect("defaults to deserialize");
        let settings: ConverterSettings = config.convert.into();
        assert_eq!(settings, ConverterSettings::default());
    }

    #[test]
    fn key_overrides_win() {
        let config = Loader::new()
            .set_override("convert.dialect", "legacy")
            .expect("override to apply")
            .set_override("diagnostics.threshold", "warning")
            .expect("override to apply")
            .set_override("convert.api_descriptions", true)
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(Dialect::from(config.convert.dialect), Dialect::Legacy);
        assert_eq!(Severity::from(config.diagnostics.threshold), Severity::Warning);
        assert!(ConverterSettings::from(&config.convert).api_descriptions);
    }

    #[test]
    fn file_layers_extensions() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        writeln!(
            file,
            "[convert]\ngeneric_bullet = \"-\"\nextensions = [{{ namespace = \"urn:example:ext\", alias = \"ext\" }}]"
        )
        .expect("write config");

        let config = Loader::new()
            .with_file(file.path())
            .build()
            .expect("config to build");
        let settings = ConverterSettings::from(&config.convert);
        assert_eq!(settings.generic_bullet, "-");
        assert_eq!(settings.extension_alias("urn:example:ext"), Some("ext"));
        assert_eq!(settings.dialect, Dialect::Auto);
    }

    #[test]
    fn missing_optional_file_is_ignored() {
        let dir = tempfile::tempdir().expect("temp dir");
        let config = Loader::new()
            .with_optional_file(dir.path().join("absent.toml"))
            .build()
            .expect("config to build");
        assert_eq!(config.diagnostics.threshold, SeverityConfig::Info);
    }
}
