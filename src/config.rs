//! Application configuration management.
//!
//! Settings are layered with `figment`, later layers winning:
//!
//! 1. Built-in defaults
//! 2. TOML file (`--config FILE`, or `mediasweep.toml` in the platform
//!    config directory)
//! 3. Environment variables prefixed `MEDIASWEEP_` (e.g.
//!    `MEDIASWEEP_VALIDATION=full`)
//! 4. Command-line flags
//!
//! ```toml
//! corrupted_dir = "/mnt/archive/corrupted"
//! duplicates_dir = "dups"          # relative: resolved against the root
//! follow_symlinks = false
//! skip_hidden = true
//! validation = "full"
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::pipeline::PipelineConfig;
use crate::validation::ValidationDepth;

/// File name looked up in the platform config directory.
pub const CONFIG_FILE_NAME: &str = "mediasweep.toml";

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "MEDIASWEEP_";

/// Errors raised while loading configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist.
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// A layer could not be parsed or has a bad value.
    #[error("Invalid configuration: {0}")]
    Invalid(Box<figment::Error>),
}

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Folder receiving invalid files; `<root>/corrupted` when unset.
    pub corrupted_dir: Option<PathBuf>,
    /// Folder receiving duplicate copies; `<root>/duplicates` when unset.
    pub duplicates_dir: Option<PathBuf>,
    /// Follow symbolic links during the walk.
    pub follow_symlinks: bool,
    /// Skip hidden files and directories.
    pub skip_hidden: bool,
    /// Image validation depth.
    pub validation: ValidationDepth,
}

impl Config {
    /// Default platform-specific configuration file path.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "mediasweep")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Load defaults, the config file and environment overrides.
    ///
    /// With `explicit` set, that file must exist. Without it, the default
    /// file is used when present and silently skipped otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the explicit file is missing or any layer
    /// fails to parse.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) if !path.exists() => Err(ConfigError::NotFound(path.to_path_buf())),
            Some(path) => Self::load_from_path(path),
            None => match Self::default_path() {
                Some(path) => Self::load_from_path(&path),
                None => Self::figment(None)
                    .extract()
                    .map_err(|e| ConfigError::Invalid(Box::new(e))),
            },
        }
    }

    /// Load defaults, the given TOML file (if present) and the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if any layer fails to parse.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        log::debug!("Loading configuration from {}", path.display());
        Self::figment(Some(path))
            .extract()
            .map_err(|e| ConfigError::Invalid(Box::new(e)))
    }

    fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Apply command-line overrides on top of the loaded layers.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(ref dir) = cli.corrupted_dir {
            self.corrupted_dir = Some(dir.clone());
        }
        if let Some(ref dir) = cli.duplicates_dir {
            self.duplicates_dir = Some(dir.clone());
        }
        if cli.follow_symlinks {
            self.follow_symlinks = true;
        }
        if cli.skip_hidden {
            self.skip_hidden = true;
        }
        if let Some(depth) = cli.validation {
            self.validation = depth;
        }
    }

    /// Pipeline configuration for `root`, resolving relative folders.
    #[must_use]
    pub fn pipeline_config(&self, root: &Path) -> PipelineConfig {
        let resolve = |dir: &Path| {
            if dir.is_absolute() {
                dir.to_path_buf()
            } else {
                root.join(dir)
            }
        };

        let mut config = PipelineConfig::for_root(root).with_depth(self.validation);
        if let Some(ref dir) = self.corrupted_dir {
            config.corrupted_dir = resolve(dir);
        }
        if let Some(ref dir) = self.duplicates_dir {
            config.duplicates_dir = resolve(dir);
        }
        config.follow_symlinks = self.follow_symlinks;
        config.skip_hidden = self.skip_hidden;
        config
    }
}
