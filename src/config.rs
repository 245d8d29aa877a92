// config.rs
//! Layered settings for the `java-syntax` tool.
//!
//! `defaults/java_syntax.default.toml` is embedded into the binary. On top
//! of it go an optional `java-syntax.toml` in the working directory, an
//! explicit `--config` file, and finally command-line overrides.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

use crate::mirror::is_nested_destination;
use crate::render::RenderOptions;
use crate::report::Verbosity;

const DEFAULT_TOML: &str = include_str!("../defaults/java_syntax.default.toml");

/// Picked up from the working directory when present.
pub const LOCAL_CONFIG_FILE: &str = "java-syntax.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub render: RenderSettings,
    pub mirror: MirrorSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderSettings {
    pub tab_width: usize,
    pub keep_comments: bool,
    pub tabify: bool,
}

impl RenderSettings {
    pub fn options(&self) -> RenderOptions {
        RenderOptions::default()
            .keep_comments(self.keep_comments)
            .tabify(self.tabify)
            .tab_width(self.tab_width)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MirrorSettings {
    /// Mirror directory, relative to the tree being mirrored.
    pub destination: String,
    /// Extension of the files to copy, without the dot.
    pub extension: String,
    pub skip_hidden: bool,
    pub follow_links: bool,
    pub continue_on_error: bool,
    pub verbosity: Verbosity,
}

#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
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

    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<Settings, ConfigError> {
        let settings: Settings = self.builder.build()?.try_deserialize()?;
        if settings.render.tab_width == 0 {
            return Err(ConfigError::Message(
                "render.tab_width must be at least 1".to_string(),
            ));
        }
        if !is_nested_destination(Path::new(&settings.mirror.destination)) {
            return Err(ConfigError::Message(format!(
                "mirror.destination {:?} must be a relative path inside the mirrored tree",
                settings.mirror.destination
            )));
        }
        Ok(settings)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

pub fn load_defaults() -> Result<Settings, ConfigError> {
    Loader::new().build()
}
