//! Configuration management for `pagedeck.toml`.
//!
//! # Sections
//!
//! | Section     | Purpose                                |
//! |-------------|----------------------------------------|
//! | `[content]` | Location of the pages folder           |
//! | `[serve]`   | HTTP API server (interface, port)      |
//!
//! # Example
//!
//! ```toml
//! [content]
//! dir = "pages"
//!
//! [serve]
//! port = 5280
//! ```
//!
//! The file is optional: without it every field takes its default.

mod content;
pub mod defaults;
mod error;
mod serve;

use content::ContentConfig;
use error::ConfigError;
use serve::ServeConfig;

use crate::cli::{Cli, Commands};
use anyhow::{Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    net::IpAddr,
    path::{Path, PathBuf},
};

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing pagedeck.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Absolute project root (set after loading)
    #[serde(skip)]
    #[educe(Default = PathBuf::from("./"))]
    pub root: PathBuf,

    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Content discovery settings
    #[serde(default)]
    pub content: ContentConfig,

    /// HTTP API settings
    #[serde(default)]
    pub serve: ServeConfig,
}

impl Config {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Load the config named by the CLI, apply CLI overrides and validate.
    ///
    /// A missing config file falls back to defaults.
    pub fn load(cli: &Cli) -> Result<Self> {
        let root = normalize_path(cli.root.as_deref().unwrap_or(Path::new("./")));
        let config_path = normalize_path(&root.join(&cli.config));

        let mut config = if config_path.exists() {
            Self::from_path(&config_path)?
        } else {
            Self::default()
        };
        config.config_path = config_path;
        config.update_with_cli(cli, &root);
        config.validate()?;

        Ok(config)
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &Cli, root: &Path) {
        self.root = normalize_path(root);

        Self::update_option(&mut self.content.dir, cli.content.as_ref());
        self.content.dir = normalize_path(&self.root.join(&self.content.dir));

        if let Commands::Serve { interface, port } = &cli.command {
            Self::update_option(&mut self.serve.interface, interface.as_ref());
            Self::update_option(&mut self.serve.port, port.as_ref());
        }
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Validate configuration after CLI overrides are applied
    pub fn validate(&self) -> Result<()> {
        let dir = &self.content.dir;
        if !dir.exists() {
            bail!(ConfigError::MissingContentDir(dir.clone()));
        }
        if !dir.is_dir() {
            bail!(ConfigError::ContentDirNotDir(dir.clone()));
        }

        if self.serve.interface.parse::<IpAddr>().is_err() {
            bail!(ConfigError::Interface(self.serve.interface.clone()));
        }

        Ok(())
    }
}

/// Normalize a path to absolute, using canonicalize if the path exists
fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        // For non-existent paths, manually make them absolute
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(path))
                .unwrap_or_else(|_| path.to_path_buf())
        }
    })
}

// ============================================================================
// Tests
// ============================================================================
