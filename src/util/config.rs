//! Configuration file support for Wharf.
//!
//! Wharf reads two configuration file locations:
//! - Global: `~/.wharf/config.toml` - User-wide defaults
//! - Project: `.wharf/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::tool::ToolKind;
use crate::resolver::SourceCheck;

/// Wharf configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Resolution settings
    pub resolve: ResolveSettings,

    /// External tool locations
    pub tools: ToolPaths,
}

/// Resolution-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ResolveSettings {
    /// When to fail on source patterns that match nothing
    pub source_check: Option<SourceCheck>,
}

/// Explicit paths to external tools. Unset tools are looked up on `PATH`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolPaths {
    pub coffee: Option<PathBuf>,
    pub webpack: Option<PathBuf>,
}

impl ToolPaths {
    /// Configured path for a tool, if any.
    pub fn get(&self, tool: ToolKind) -> Option<&Path> {
        match tool {
            ToolKind::Coffee => self.coffee.as_deref(),
            ToolKind::Webpack => self.webpack.as_deref(),
        }
    }
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.resolve.source_check.is_some() {
            self.resolve.source_check = other.resolve.source_check;
        }

        if other.tools.coffee.is_some() {
            self.tools.coffee = other.tools.coffee;
        }
        if other.tools.webpack.is_some() {
            self.tools.webpack = other.tools.webpack;
        }
    }

    /// Effective source check policy.
    pub fn source_check(&self) -> SourceCheck {
        self.resolve.source_check.unwrap_or_default()
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.wharf/config.toml)
/// 2. Global config (~/.wharf/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        if global_path.exists() {
            config.merge(Config::load_or_default(global_path));
        }
    }

    if project_path.exists() {
        config.merge(Config::load_or_default(project_path));
    }

    config
}

/// Get the global wharf config directory (~/.wharf).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".wharf"))
}

/// Get the project config path (.wharf/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".wharf").join("config.toml")
}
