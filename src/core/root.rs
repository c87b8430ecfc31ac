//! The project root every relative path is resolved against.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::resolver::errors::ResolveError;
use crate::util::fs::{is_inside, relative_path};

/// Canonical, absolute directory containing the manifest.
///
/// Fixed for the lifetime of the process; there are no setters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRoot(PathBuf);

impl ProjectRoot {
    /// Canonicalize `path` and check that it is a directory.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, ResolveError> {
        let path = path.as_ref();
        let canonical = path
            .canonicalize()
            .map_err(|e| ResolveError::InvalidRoot {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        if !canonical.is_dir() {
            return Err(ResolveError::InvalidRoot {
                path: path.to_path_buf(),
                reason: "not a directory".to_string(),
            });
        }

        Ok(ProjectRoot(canonical))
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// True if `path` is the root or lies beneath it.
    pub fn contains(&self, path: &Path) -> bool {
        is_inside(path, &self.0)
    }

    /// `path` relative to the root, for display.
    pub fn relative(&self, path: &Path) -> PathBuf {
        relative_path(&self.0, path)
    }
}

impl AsRef<Path> for ProjectRoot {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for ProjectRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}
