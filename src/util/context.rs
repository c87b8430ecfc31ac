//! Global context for Wharf operations.
//!
//! Provides centralized access to the working directory, the user-wide
//! configuration location and output preferences.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::workspace::{find_manifest as ws_find_manifest, ManifestError};
use crate::util::config::{self, Config};

/// Global context containing configuration and paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Home directory for global Wharf data (~/.wharf/)
    home: Option<PathBuf>,

    /// Whether to use verbose output
    verbose: bool,

    /// Whether to use colors in output
    color: bool,
}

impl GlobalContext {
    /// Create a new GlobalContext rooted at the process working directory.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(Self::with_cwd(cwd))
    }

    /// Create a GlobalContext with a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Self {
        GlobalContext {
            cwd,
            home: config::global_config_dir(),
            verbose: false,
            color: true,
        }
    }

    /// Override the global data directory.
    pub fn with_home(mut self, home: Option<PathBuf>) -> Self {
        self.home = home;
        self
    }

    /// Set verbose mode.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Set color output.
    pub fn set_color(&mut self, color: bool) {
        self.color = color;
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn color(&self) -> bool {
        self.color
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Get the global configuration file path.
    pub fn config_path(&self) -> Option<PathBuf> {
        self.home.as_ref().map(|h| h.join("config.toml"))
    }

    /// Load the merged global + project configuration for a project root.
    pub fn load_config(&self, project_root: &Path) -> Config {
        config::load_config(
            self.config_path().as_deref(),
            &config::project_config_path(project_root),
        )
    }

    /// Find the manifest by searching upward from cwd.
    pub fn find_manifest(&self) -> Result<PathBuf, ManifestError> {
        let mut current = self.cwd.clone();
        loop {
            match ws_find_manifest(&current) {
                Ok(path) => return Ok(path),
                Err(ManifestError::NotFound { .. }) => {
                    if !current.pop() {
                        return Err(ManifestError::NotFound {
                            dir: self.cwd.clone(),
                        });
                    }
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Resolve an explicit manifest path, or discover one from cwd.
    pub fn locate_manifest(&self, explicit: Option<&Path>) -> Result<PathBuf> {
        match explicit {
            Some(path) => {
                let path = self.cwd.join(path);
                if path.is_dir() {
                    Ok(ws_find_manifest(&path)?)
                } else if path.is_file() {
                    Ok(path)
                } else {
                    Err(ManifestError::NotFound { dir: path }.into())
                }
            }
            None => Ok(self.find_manifest()?),
        }
    }
}
