//! Implementation of `wharf clean`.

use std::path::PathBuf;

use anyhow::Result;

use crate::core::Workspace;
use crate::util::fs::remove_dir_all_if_exists;

/// Remove the workspace's output directory. Returns the directory removed.
///
/// The directory is resolved the same way target outputs are, and symlinks
/// on disk are followed before deleting. Either way, a directory outside the
/// root is refused and nothing is removed.
pub fn clean(ws: &Workspace) -> Result<PathBuf> {
    let resolver = ws.resolver();
    let dir = resolver.output_dir()?;
    resolver.check_contained(&dir)?;
    remove_dir_all_if_exists(&dir)?;
    tracing::debug!("removed {}", dir.display());
    Ok(dir)
}
