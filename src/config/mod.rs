//! Project configuration management for `svgcase.toml`.
//!
//! # Sections
//!
//! | Section     | Purpose                                           |
//! |-------------|---------------------------------------------------|
//! | `[paths]`   | Source directory, target module, preview directory|
//! | `[options]` | Pipeline switches (force_replace, tint, demo, …)  |
//! | `[serve]`   | Preview server port                               |

mod error;

pub use error::ConfigError;

use crate::cli::{Cli, Commands};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing svgcase.toml
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Input/output paths
    pub paths: PathsConfig,

    /// Pipeline option flags
    pub options: OptionsConfig,

    /// Preview server settings
    pub serve: ServeConfig,
}

/// `[paths]` section: where sources live and where output goes.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    /// Directory containing .svg source documents
    pub source: PathBuf,

    /// Existing generated module the case statements are spliced into
    pub target: PathBuf,

    /// Directory receiving the preview module and preview index
    pub preview: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from("svg"),
            target: PathBuf::from("src/svg.js"),
            preview: PathBuf::from("public"),
        }
    }
}

/// `[options]` section: pipeline switches.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OptionsConfig {
    /// Permit overwriting an existing case label in the target module
    pub force_replace: bool,

    /// Rewrite fixed color properties into a `${color}` placeholder
    pub tint: bool,

    /// Skip writing the real target, produce only the preview module
    pub demo: bool,

    /// Select the in-place normalization pipeline instead of merging
    pub direct: bool,

    /// Strip an existing root class (and its stylesheet selector) before
    /// normalizing, instead of treating it as the already-normalized guard
    pub strip_legacy_class: bool,
}

/// `[serve]` section: preview server settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServeConfig {
    /// Port the preview server listens on
    pub port: u16,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self { port: 3000 }
    }
}

impl Config {
    /// Load configuration from CLI arguments.
    ///
    /// Reads the config file named by `-C/--config`, resolves paths
    /// relative to its parent directory, applies CLI overrides, then
    /// validates the parts the selected command needs.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let config_path = &cli.config;
        let content = fs::read_to_string(config_path)
            .map_err(|err| ConfigError::Io(config_path.clone(), err))?;

        let mut config = Self::from_str(&content)?;
        let root = config_path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        config.finalize(root, cli);
        config.validate(cli)?;
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Resolve paths against the project root and fold in CLI overrides.
    fn finalize(&mut self, root: PathBuf, cli: &Cli) {
        self.paths.source = root.join(&self.paths.source);
        self.paths.target = root.join(&self.paths.target);
        self.paths.preview = root.join(&self.paths.preview);
        self.root = root;

        if let Commands::Merge {
            force_replace,
            tint,
            demo,
            port,
            ..
        } = &cli.command
        {
            self.options.force_replace |= *force_replace;
            self.options.tint |= *tint;
            self.options.demo |= *demo;
            if let Some(port) = port {
                self.serve.port = *port;
            }
        }
        if let Commands::Serve { port } = &cli.command
            && let Some(port) = port
        {
            self.serve.port = *port;
        }
    }

    /// Validate the configuration for the selected command.
    ///
    /// The merge pipeline needs both the source directory and the target
    /// module; normalization only needs the source directory.
    fn validate(&self, cli: &Cli) -> Result<(), ConfigError> {
        if !self.paths.source.is_dir() {
            return Err(ConfigError::Validation(format!(
                "source directory `{}` does not exist",
                self.paths.source.display()
            )));
        }

        let merging = matches!(cli.command, Commands::Merge { .. }) && !self.options.direct;
        if merging && !self.paths.target.is_file() {
            return Err(ConfigError::Validation(format!(
                "target module `{}` does not exist",
                self.paths.target.display()
            )));
        }
        Ok(())
    }

    /// Path of the preview copy of the generated module.
    pub fn preview_module(&self) -> PathBuf {
        self.paths.preview.join("svg_preview.js")
    }

    /// Path of the preview index artifact.
    pub fn preview_index(&self) -> PathBuf {
        self.paths.preview.join("preview.json")
    }
}
