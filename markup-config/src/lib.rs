//! Shared configuration loader for the markup toolchain.
//!
//! `defaults/markup.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`MarkupConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use markup_babel::{ConvertOptions, Extensions, MarkKind, NodeKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/markup.default.toml");

/// Top-level configuration consumed by markup applications.
#[derive(Debug, Clone, Deserialize)]
pub struct MarkupConfig {
    pub urls: UrlsConfig,
    pub extensions: ExtensionsConfig,
    pub serializer: SerializerConfig,
    pub inspect: InspectConfig,
    pub logging: LoggingConfig,
}

/// URL prefixes recognized by the Markdown converter.
#[derive(Debug, Clone, Deserialize)]
pub struct UrlsConfig {
    pub reference: String,
    pub image: String,
}

/// Kinds removed from the default extension set.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtensionsConfig {
    pub disabled_nodes: Vec<String>,
    pub disabled_marks: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SerializerConfig {
    pub tight_lists: bool,
    pub bullet: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InspectConfig {
    pub treeviz: TreevizConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TreevizConfig {
    pub show_attrs: bool,
    pub show_marks: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl MarkupConfig {
    /// Build converter options. Unknown kind names are rejected.
    pub fn convert_options(&self) -> Result<ConvertOptions, ConfigError> {
        let mut extensions = Extensions::default();
        for name in &self.extensions.disabled_nodes {
            let kind = NodeKind::from_name(name);
            if !kind.is_builtin() {
                return Err(ConfigError::Message(format!("Unknown node kind '{name}'")));
            }
            extensions = extensions.without_node(&kind);
        }
        for name in &self.extensions.disabled_marks {
            let kind = MarkKind::from_name(name);
            if !kind.is_builtin() {
                return Err(ConfigError::Message(format!("Unknown mark kind '{name}'")));
            }
            extensions = extensions.without_mark(&kind);
        }

        Ok(
            ConvertOptions::new(self.urls.reference.clone(), self.urls.image.clone())
                .with_extensions(extensions)
                .with_tight_lists(self.serializer.tight_lists)
                .with_bullet(self.serializer.bullet.clone()),
        )
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
    pub fn build(self) -> Result<MarkupConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<MarkupConfig, ConfigError> {
    Loader::new().build()
}
